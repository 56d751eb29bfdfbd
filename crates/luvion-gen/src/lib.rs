//! luvion-gen - x86-64 assembly text emission.
//!
//! Lowers a [`luvion_par::ast::Module`] plus the [`luvion_sem::PreparedModule`]
//! computed over it directly into Intel-syntax, NASM-compatible assembly
//! text targeting the System V AMD64 ABI, calling out to an external
//! runtime library (see [`runtime`]) for arithmetic, comparisons, string
//! handling, and printing. There is no intermediate IR: each AST node is
//! walked once and turned straight into instruction text.
//!
//! A malformed AST reaching this stage (e.g. a control-flow branch body
//! that isn't a block) is a bug in an earlier stage, not a recoverable
//! condition here, and is reported with a panic rather than a [`error::CodeGenError`].

pub mod emitter;
pub mod error;
pub mod expr;
pub mod runtime;
pub mod stmt;

pub use emitter::generate_module;
pub use error::{CodeGenError, Result};

#[cfg(test)]
mod edge_cases;
