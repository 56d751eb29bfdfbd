//! Operator and punctuation lexing.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Handles: `+`, `++`
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            Token::PlusPlus
        } else {
            Token::Plus
        }
    }

    /// Handles: `-`, `--`
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            Token::MinusMinus
        } else {
            Token::Minus
        }
    }

    /// Handles: `*`
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        Token::Star
    }

    /// Handles: `/`. `//` and `/*` are intercepted as comments before this
    /// is ever reached, so a bare `/` is all that remains here.
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        Token::Slash
    }

    /// Handles: `%`
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        Token::Percent
    }

    /// Handles: `=`, `==`, `=>`
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else if self.cursor.match_char('>') {
            Token::FatArrow
        } else {
            Token::Eq
        }
    }

    /// Handles: `!`, `!=`
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    /// Handles: `<`, `<=`
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Handles: `>`, `>=`
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// Handles: `&&`. A lone `&` is not a token in this grammar.
    pub(crate) fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Token::AndAnd
        } else {
            self.report_error("unexpected character '&'; did you mean '&&'?".to_string());
            Token::Error(luvion_util::Symbol::intern("&"))
        }
    }

    /// Handles: `||`. A lone `|` is not a token in this grammar.
    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::OrOr
        } else {
            self.report_error("unexpected character '|'; did you mean '||'?".to_string());
            Token::Error(luvion_util::Symbol::intern("|"))
        }
    }

    /// Handles: `:`
    pub(crate) fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        Token::Colon
    }

    /// Handles: `.`
    pub(crate) fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        Token::Dot
    }
}
