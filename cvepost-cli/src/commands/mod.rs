//! Command handlers -- one module per subcommand

pub mod cache;
pub mod config;
pub mod run;
