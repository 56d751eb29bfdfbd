//! Error type for code generation.
//!
//! A well-formed [`luvion_par::ast::Module`] that already passed semantic
//! preparation cannot reach most of these; they exist for the handful of
//! whole-module checks emission itself is responsible for.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("no 'main' function declared")]
    NoEntryPoint,

    #[error("internal code generation error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
