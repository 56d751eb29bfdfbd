//! luvion-par - recursive-descent parser and symbol table.
//!
//! Consumes a [`luvion_lex::Lexer`] through a one-token lookahead buffer and
//! produces a [`Module`] AST plus a [`SymbolTable`] seeded with global
//! declarations. Syntax errors are reported through the shared
//! [`luvion_util::Handler`] and trigger panic-mode recovery rather than
//! aborting the parse.

pub mod ast;
pub mod expr;
pub mod frame;
pub mod items;
pub mod stmt;
pub mod symtab;
pub mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::*;
pub use symtab::{ScopeKind, SymbolId, SymbolKind, SymbolTable};

use luvion_lex::{Lexer, Token};
use luvion_util::{DiagnosticBuilder, Handler, Span};

/// Recursive-descent parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_span: Span,
    previous_span: Span,
    previous_was_terminator: bool,
    panic_mode: bool,
    pub handler: &'a Handler,
    pub symbols: SymbolTable,
    next_expr_id: u32,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        let mut lexer = Lexer::new(source, handler);
        let first = lexer.next_token();
        let span = Span::new(lexer.token_start(), lexer.position(), lexer.line(), lexer.column());
        Self {
            lexer,
            current: first,
            current_span: span,
            previous_span: span,
            previous_was_terminator: false,
            panic_mode: false,
            handler,
            symbols: SymbolTable::new(),
            next_expr_id: 0,
        }
    }

    /// Builds a parser over an already-constructed lexer, taking ownership
    /// of a pre-existing symbol table instead of starting a fresh one.
    /// Used for the nested sub-parser over a `{…}` interpolation
    /// placeholder, which must resolve names in the enclosing scope chain.
    fn from_lexer(mut lexer: Lexer<'a>, handler: &'a Handler, symbols: SymbolTable) -> Self {
        let first = lexer.next_token();
        let span = Span::new(lexer.token_start(), lexer.position(), lexer.line(), lexer.column());
        Self {
            lexer,
            current: first,
            current_span: span,
            previous_span: span,
            previous_was_terminator: false,
            panic_mode: false,
            handler,
            symbols,
            next_expr_id: 0,
        }
    }

    /// Parses a complete source file into a [`Module`].
    pub fn parse_module(&mut self, filename: &str) -> Module {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.check(Token::Eof) {
            match self.parse_declaration() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
            self.skip_newlines();
        }
        Module { stmts, filename: filename.to_string() }
    }

    pub fn next_expr_id(&mut self) -> ExprId {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        id
    }

    // -- token stream plumbing -------------------------------------------------

    pub(crate) fn current(&self) -> Token {
        self.current
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current_span
    }

    pub(crate) fn check(&self, tok: Token) -> bool {
        self.current == tok
    }

    pub(crate) fn advance(&mut self) -> Token {
        let prev = self.current;
        self.previous_span = self.current_span;
        self.previous_was_terminator = matches!(prev, Token::Semicolon | Token::Newline);
        loop {
            self.current = self.lexer.next_token();
            self.current_span = Span::new(
                self.lexer.token_start(),
                self.lexer.position(),
                self.lexer.line(),
                self.lexer.column(),
            );
            if let Token::Error(msg) = self.current {
                if !self.panic_mode {
                    self.panic_mode = true;
                    DiagnosticBuilder::error(msg.as_str().to_string())
                        .span(self.current_span)
                        .emit(self.handler);
                }
                continue;
            }
            break;
        }
        prev
    }

    pub(crate) fn match_token(&mut self, tok: Token) -> bool {
        if self.check(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, tok: Token, what: &str) -> bool {
        if self.check(tok) {
            self.advance();
            true
        } else {
            self.error(format!("expected {}, found {}", what, self.current.describe()));
            false
        }
    }

    /// Consumes a `;`/NEWLINE terminator if present; both are optional
    /// before a token that closes the enclosing construct.
    pub(crate) fn consume_terminator(&mut self) {
        if self.check(Token::Semicolon) || self.check(Token::Newline) {
            self.advance();
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(Token::Newline) {
            self.advance();
        }
    }

    pub(crate) fn error(&mut self, message: String) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        DiagnosticBuilder::error(message).span(self.current_span).emit(self.handler);
    }

    /// Panic-mode recovery: discard tokens until the previous token was a
    /// statement terminator or the current token opens a new
    /// declaration/statement.
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;
        while !self.check(Token::Eof) {
            if self.previous_was_terminator {
                return;
            }
            if self.current.starts_declaration() {
                return;
            }
            self.advance();
        }
    }
}
