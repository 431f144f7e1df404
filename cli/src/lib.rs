//! CLI utilities for pictor.
//!
//! This crate provides the context configuration, output and request file
//! helpers shared by the `pictor` binary.

pub mod config;
pub mod output;
pub mod request;

pub use config::{Config, Context, load_config, mask_api_key};
pub use output::{Output, OutputFormat, print_success, print_verbose};
pub use request::{RequestError, load_request};
