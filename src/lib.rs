pub mod api;
pub mod core;
pub mod error;
pub mod plan;

pub use error::{Error, GraphError, Result, ValidationError};
