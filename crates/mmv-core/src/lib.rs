//! MMV core: fetch two square matrices row by row from the numbers service,
//! multiply them, digest the product and submit the digest for verification.
//!
//! Stages, leaves first: [`matrix`] → [`fetch`] → [`acquire`] → [`multiply`]
//! → [`digest`] → [`verify`], sequenced by [`pipeline`].

pub mod config;
pub mod logging;

pub mod acquire;
pub mod api;
pub mod control;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod matrix;
pub mod multiply;
pub mod pipeline;
pub mod retry;
pub mod transport;
pub mod verify;

pub use error::{MultiplyError, PipelineError, RowError};
pub use matrix::Matrix;
