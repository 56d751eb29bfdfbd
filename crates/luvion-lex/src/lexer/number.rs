//! Number literal lexing.
//!
//! Only decimal literals are supported: a bare run of digits is an `int`,
//! the same run followed by `L` is a `long`, and a run containing `.` is a
//! `double`.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a decimal integer or double literal.
    pub(crate) fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let is_double =
            self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit();

        if is_double {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(start);
            return match text.parse::<f64>() {
                Ok(value) => Token::DoubleLiteral(value),
                Err(e) => {
                    self.report_error(format!("invalid double literal '{}': {}", text, e));
                    Token::DoubleLiteral(0.0)
                },
            };
        }

        if self.cursor.current_char() == 'L' {
            let text = self.cursor.slice_from(start);
            self.cursor.advance();
            return match text.parse::<i64>() {
                Ok(value) => Token::LongLiteral(value),
                Err(e) => {
                    self.report_error(format!("invalid long literal '{}': {}", text, e));
                    Token::LongLiteral(0)
                },
            };
        }

        let text = self.cursor.slice_from(start);
        match text.parse::<i64>() {
            Ok(value) => Token::IntLiteral(value),
            Err(e) => {
                self.report_error(format!("invalid integer literal '{}': {}", text, e));
                Token::IntLiteral(0)
            },
        }
    }
}
