//! Comment skipping.
//!
//! Comments are not part of the surface grammar but every real compiler
//! needs to ignore them; both `//` line comments and `/* */` block comments
//! (non-nesting) are treated as whitespace by the indentation algorithm.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips a `/* ... */` block comment. Does not nest: the first `*/`
    /// closes it.
    pub(crate) fn skip_block_comment(&mut self) {
        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }
        self.report_error("unterminated block comment".to_string());
    }

    /// Skips spaces, tabs, and comments, but stops at a newline so the
    /// indentation algorithm can see it.
    pub(crate) fn skip_inline_whitespace_and_comments(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.remaining().starts_with('\u{FEFF}') {
                self.cursor.advance();
            }
        }

        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                },
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.skip_block_comment();
                },
                _ => return,
            }
        }
    }
}
