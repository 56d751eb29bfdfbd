//! luvion-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation types shared by every stage of the
//! Luvion compiler: string interning, source spans, diagnostics, and
//! definition identifiers. Nothing in here knows about tokens, the AST,
//! or code generation - those live in their own crates.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use error::{
    DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError,
    SourceMapResult, SymbolError, SymbolResult,
};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

/// Fast hash map using FxHash, matching the hasher used throughout rustc-style
/// compilers for non-adversarial, compiler-internal keys.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
/// Fast hash set using FxHash.
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
