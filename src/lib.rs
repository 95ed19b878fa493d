#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod session;

pub use error::{Error, Result};
