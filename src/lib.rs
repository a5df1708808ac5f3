#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod edition;
pub mod error;
pub mod resource;
pub mod runner;

pub use error::{ApiError, Error, Result};
