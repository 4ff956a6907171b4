#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`NotifyError`)
//! - [`cache`]: Persistent dedup store (`DedupCache`)
//! - [`digest`]: Plain-text digest rendering (`DigestFormatter`, `Digest`)
//! - [`mail`]: Transport (`Dispatcher`, `Recipient`)
//!
//! # 실행당 프로토콜
//!
//! ```text
//! DedupCache::load --> (pipeline, seen_set 사용) --> DigestFormatter::render
//!                                                         |
//!                                                  Dispatcher::dispatch
//!                                                         |  성공 시에만
//!                                        insert_all --> prune --> save
//! ```

pub mod cache;
pub mod digest;
pub mod error;
pub mod mail;

// --- Public API Re-exports ---

// Error
pub use error::NotifyError;

// Cache
pub use cache::DedupCache;

// Digest
pub use digest::{Digest, DigestFormatter};

// Mail
pub use mail::{Dispatcher, Recipient};
