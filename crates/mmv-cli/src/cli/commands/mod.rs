//! CLI command handlers, one file per command.

pub(crate) mod config;
pub(crate) mod local;
pub(crate) mod run;

pub use config::show_config;
pub use local::run_local;
pub use run::run_remote;
