#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`AdvisoryError`)
//! - [`feed`]: NVD JSON 1.1 feed model and parsing (`CveFeed`, `CveItem`, `ConfigNode`)
//! - [`matcher`]: Configuration-tree evaluator (`node_matches`, `ProductMatcher`)
//! - [`extract`]: Record normalization into `Advisory`
//! - [`policy`]: Score / attack-vector admission policy (`SeverityPolicy`)
//! - [`pipeline`]: Stage orchestration (`RelevancePipeline`, `RunReport`)
//!
//! # Architecture
//!
//! ```text
//! CVE_Items --> ProductMatcher 프리필터 --> extract --> SeverityPolicy
//!                                                           |
//!                                                     seen 필터 (dedup)
//!                                                           |
//!                                                     RunReport.advisories
//! ```

pub mod error;
pub mod extract;
pub mod feed;
pub mod matcher;
pub mod pipeline;
pub mod policy;

// --- Public API Re-exports ---

// Error
pub use error::AdvisoryError;

// Feed model
pub use feed::{ConfigNode, Configurations, CpeMatch, CveFeed, CveItem};

// Matcher
pub use matcher::{ProductMatcher, node_matches, record_matches};

// Extractor
pub use extract::extract;

// Policy
pub use policy::SeverityPolicy;

// Pipeline
pub use pipeline::{RelevancePipeline, RunReport};
