#![forbid(unsafe_code)]

//! Error type for binding operations.

use std::fmt;

/// Errors raised synchronously by binding operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// An operation addressed a key with no entry in the container.
    AbsentKey(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsentKey(key) => {
                write!(f, "invalid binding operation: no entry for key '{key}'")
            }
        }
    }
}

impl std::error::Error for BindingError {}
