//! Core lexer implementation.
//!
//! Owns the indentation algorithm: every logical line's leading whitespace
//! is measured once, compared against a stack of open indent widths, and
//! turned into synthetic `Indent`/`Dedent`/`Newline` tokens around the
//! line's real tokens. Newlines are swallowed while inside `()`/`[]`/`{}`
//! so a call or literal can be split across lines without the parser
//! seeing spurious statement breaks.

use std::collections::VecDeque;

use luvion_util::{DiagnosticBuilder, Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::Token;

/// Lexer for the Luvion language.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub handler: &'a Handler,

    /// Starting byte offset of the current token.
    pub token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,

    /// Whether the BOM (Byte Order Mark) has been checked.
    pub bom_checked: bool,

    /// Stack of open indent widths, bottom is always `0`.
    indent_stack: Vec<u32>,

    /// Depth of open `(`/`[`/`{` nesting; newlines are suppressed while
    /// this is non-zero.
    bracket_depth: u32,

    /// True when the next token must be preceded by an indentation check.
    at_line_start: bool,

    /// Tokens already decided but not yet returned (extra `Dedent`s from a
    /// multi-level unindent, plus a trailing `Eof`).
    pending: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token from the source code.
    pub fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pending.pop_front() {
            return tok;
        }

        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                if let Some(tok) = self.handle_line_start() {
                    return tok;
                }
            }

            self.skip_inline_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                self.at_line_start = false;
                return self.flush_eof();
            }

            let c = self.cursor.current_char();

            if c == '\n' {
                self.cursor.advance();
                if self.bracket_depth > 0 {
                    continue;
                }
                self.at_line_start = true;
                return Token::Newline;
            }

            self.at_line_start = false;

            return match c {
                '(' => {
                    self.cursor.advance();
                    self.bracket_depth += 1;
                    Token::LParen
                },
                ')' => {
                    self.cursor.advance();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    Token::RParen
                },
                '{' => {
                    self.cursor.advance();
                    self.bracket_depth += 1;
                    Token::LBrace
                },
                '}' => {
                    self.cursor.advance();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    Token::RBrace
                },
                '[' => {
                    self.cursor.advance();
                    self.bracket_depth += 1;
                    Token::LBracket
                },
                ']' => {
                    self.cursor.advance();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    Token::RBracket
                },
                ',' => {
                    self.cursor.advance();
                    Token::Comma
                },
                ';' => {
                    self.cursor.advance();
                    Token::Semicolon
                },
                '+' => self.lex_plus(),
                '-' => self.lex_minus(),
                '*' => self.lex_star(),
                '/' => self.lex_slash(),
                '%' => self.lex_percent(),
                '=' => self.lex_equals(),
                '!' => self.lex_bang(),
                '<' => self.lex_less(),
                '>' => self.lex_greater(),
                '&' => self.lex_ampersand(),
                '|' => self.lex_pipe(),
                ':' => self.lex_colon(),
                '.' => self.lex_dot(),
                '"' => self.lex_string(),
                '\'' => self.lex_char(),
                '$' if self.cursor.peek_char(1) == '"' => self.lex_interpolated_string(),
                c if crate::unicode::is_ascii_ident_start(c) => self.lex_identifier(),
                c if c.is_ascii_digit() => self.lex_number(),
                c => {
                    self.report_error(format!("unexpected character '{}'", c));
                    self.cursor.advance();
                    Token::Error(Symbol::intern(&c.to_string()))
                },
            };
        }
    }

    /// Measures the indentation of the upcoming logical line (skipping
    /// blank and comment-only lines along the way) and reconciles it
    /// against `indent_stack`, returning the first token of the reaction
    /// (`Indent` or `Dedent`) if the width changed, or `None` if it is
    /// unchanged and the caller should go on to lex the line's first real
    /// token. Extra `Dedent`s from a multi-level unindent are queued in
    /// `pending`.
    fn handle_line_start(&mut self) -> Option<Token> {
        let width = match self.measure_next_indent() {
            Some(w) => w,
            None => {
                self.at_line_start = false;
                return Some(self.flush_eof());
            },
        };

        self.at_line_start = false;

        let current = *self.indent_stack.last().unwrap();

        if width > current {
            self.indent_stack.push(width);
            return Some(Token::Indent);
        }

        if width < current {
            let mut popped = 0u32;
            while *self.indent_stack.last().unwrap() > width {
                self.indent_stack.pop();
                popped += 1;
            }
            if *self.indent_stack.last().unwrap() != width {
                self.report_error(format!(
                    "inconsistent indentation: column {} does not match any enclosing indent level",
                    width
                ));
                self.indent_stack.push(width);
            }
            for _ in 1..popped {
                self.pending.push_back(Token::Dedent);
            }
            if popped > 0 {
                return Some(Token::Dedent);
            }
        }

        None
    }

    /// Skips blank lines and comment-only lines, then returns the
    /// indentation width (count of leading spaces/tabs) of the next line
    /// with real content, leaving the cursor positioned at that content.
    /// Returns `None` at end of file.
    fn measure_next_indent(&mut self) -> Option<u32> {
        loop {
            let mut width: u32 = 0;

            loop {
                match self.cursor.current_char() {
                    ' ' | '\t' => {
                        width += 1;
                        self.cursor.advance();
                    },
                    _ => break,
                }
            }

            if self.cursor.is_at_end() {
                return None;
            }

            match self.cursor.current_char() {
                '\n' | '\r' => {
                    self.cursor.advance();
                    continue;
                },
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                    continue;
                },
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.skip_block_comment();
                    continue;
                },
                _ => return Some(width),
            }
        }
    }

    /// Pops every remaining indent level, queueing one `Dedent` per level
    /// and a trailing `Eof`, then returns the first of those.
    fn flush_eof(&mut self) -> Token {
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending.push_back(Token::Dedent);
        }
        self.pending.push_back(Token::Eof);
        self.pending.pop_front().unwrap()
    }

    /// Reports a lexical error at the current token position.
    pub(crate) fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the starting byte offset of the current token.
    pub fn token_start(&self) -> usize {
        self.token_start
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token == Token::Eof {
            None
        } else {
            Some(token)
        }
    }
}
