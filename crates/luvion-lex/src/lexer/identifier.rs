//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token};
use crate::unicode::is_ascii_ident_continue;
use crate::Lexer;
use luvion_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword, by longest maximal munch.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }
}
