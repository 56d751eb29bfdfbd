//! luvion-sem - semantic preparation.
//!
//! Runs two pre-passes over each function before code generation:
//!
//! 1. **Symbol seeding** - walk the body, adding every `VAR_DECL` to scope
//!    (block/for bodies push and pop their own scope) so nested references
//!    resolve structurally the same way emission will resolve them.
//! 2. **Stack-usage computation** - the same walk, folding sibling
//!    IF/WHILE/FOR/BLOCK branches by their *peak* offset rather than their
//!    sum (see [`luvion_par::frame`]), producing the function's total
//!    local-variable stack requirement.
//!
//! A lightweight expression pass alongside these records each expression's
//! [`Type`] in a side table keyed by [`ExprId`], and diagnoses the handful of
//! semantic errors this tier of the pipeline is responsible for: undefined
//! identifiers, calling a non-function, and call-argument counts the
//! calling convention cannot carry in registers.

pub mod prepare;

pub use prepare::{prepare_module, PreparedFunction, PreparedModule};

#[cfg(test)]
mod edge_cases;
