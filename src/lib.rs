pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod ui;
pub mod warning;

pub use error::{GatherError, Result};
