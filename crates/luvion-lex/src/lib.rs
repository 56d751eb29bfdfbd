//! luvion-lex - Lexical analysis for the Luvion language.
//!
//! Converts a source buffer into a lazy stream of [`Token`]s, tracking
//! indentation (synthesising `Indent`/`Dedent`/`Newline`) and recognising
//! interpolated string literals. The lexer never aborts on error: it reports
//! a diagnostic via the shared [`luvion_util::Handler`] and continues,
//! emitting an `Error` token where needed so the parser can resynchronise.

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::Token;
