//! String, interpolated-string, and character literal lexing.

use crate::token::Token;
use crate::unicode::parse_hex_codepoint;
use crate::Lexer;
use luvion_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes a plain `"..."` string literal. Escape sequences are processed;
    /// the payload is the decoded content.
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Token::StringLiteral(Symbol::intern(&content))
    }

    /// Lexes a `$"..."` interpolated string literal. Escape processing
    /// applies only to literal runs; the text inside each top-level
    /// `{ ... }` placeholder is copied verbatim (including any nested
    /// string literal it may contain), to be parsed later by the parser's
    /// nested sub-parser. The payload therefore still contains raw `{…}`
    /// spans.
    pub(crate) fn lex_interpolated_string(&mut self) -> Token {
        self.cursor.advance(); // '$'
        self.cursor.advance(); // opening '"'

        let mut content = String::new();
        let mut brace_depth: u32 = 0;

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated interpolated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if brace_depth == 0 && c == '"' {
                self.cursor.advance();
                break;
            }

            if brace_depth == 0 && c == '\n' {
                self.report_error("unterminated interpolated string literal".to_string());
                break;
            }

            if brace_depth == 0 && c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
                continue;
            }

            if brace_depth > 0 && c == '"' {
                // A nested string literal inside a placeholder: copy it raw,
                // including its own escapes, without ending the outer scan.
                content.push('"');
                self.cursor.advance();
                while !self.cursor.is_at_end()
                    && self.cursor.current_char() != '"'
                    && self.cursor.current_char() != '\n'
                {
                    if self.cursor.current_char() == '\\' {
                        content.push(self.cursor.current_char());
                        self.cursor.advance();
                        if !self.cursor.is_at_end() {
                            content.push(self.cursor.current_char());
                            self.cursor.advance();
                        }
                    } else {
                        content.push(self.cursor.current_char());
                        self.cursor.advance();
                    }
                }
                if self.cursor.current_char() == '"' {
                    content.push('"');
                    self.cursor.advance();
                }
                continue;
            }

            if c == '{' {
                brace_depth += 1;
            } else if c == '}' && brace_depth > 0 {
                brace_depth -= 1;
            }

            content.push(c);
            self.cursor.advance();
        }

        Token::InterpolString(Symbol::intern(&content))
    }

    /// Lexes a `'c'` character literal.
    pub(crate) fn lex_char(&mut self) -> Token {
        self.cursor.advance();

        if self.cursor.is_at_end() {
            self.report_error("unterminated character literal".to_string());
            return Token::CharLiteral('\0');
        }

        let c = if self.cursor.current_char() == '\\' {
            self.cursor.advance();
            self.parse_escape().unwrap_or('\0')
        } else {
            let c = self.cursor.current_char();
            if c == '\'' || c == '\n' {
                self.report_error("empty character literal".to_string());
                return Token::CharLiteral('\0');
            }
            self.cursor.advance();
            c
        };

        if self.cursor.current_char() != '\'' {
            self.report_error("unterminated character literal".to_string());
            while !self.cursor.is_at_end()
                && self.cursor.current_char() != '\''
                && self.cursor.current_char() != '\n'
            {
                self.cursor.advance();
            }
        } else {
            self.cursor.advance();
        }

        Token::CharLiteral(c)
    }

    /// Parses a backslash escape sequence: `\n \t \r \\ \" \' \0 \xNN \u{NNNN}`.
    pub(crate) fn parse_escape(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated escape sequence".to_string());
            return None;
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '0' => Some('\0'),
            'x' => {
                let mut hex = String::new();
                for _ in 0..2 {
                    let h = self.cursor.current_char();
                    if h.is_ascii_hexdigit() {
                        hex.push(h);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                if hex.len() == 2 {
                    u8::from_str_radix(&hex, 16).ok().map(|b| b as char)
                } else {
                    self.report_error("invalid hex escape sequence".to_string());
                    None
                }
            },
            'u' => {
                if self.cursor.current_char() != '{' {
                    self.report_error("expected '{' after \\u".to_string());
                    return None;
                }
                self.cursor.advance();
                let mut hex = String::new();
                while self.cursor.current_char() != '}' && !self.cursor.is_at_end() {
                    let h = self.cursor.current_char();
                    if h.is_ascii_hexdigit() {
                        hex.push(h);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                if self.cursor.current_char() == '}' {
                    self.cursor.advance();
                }
                parse_hex_codepoint(&hex).and_then(char::from_u32)
            },
            _ => {
                self.report_error(format!("unknown escape sequence: \\{}", c));
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use luvion_util::{Handler, Symbol};

    fn lex(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(lex("\"hello\""), Token::StringLiteral(Symbol::intern("hello")));
    }

    #[test]
    fn test_string_with_escape() {
        assert_eq!(
            lex("\"hello\\nworld\""),
            Token::StringLiteral(Symbol::intern("hello\nworld"))
        );
    }

    #[test]
    fn test_character() {
        assert_eq!(lex("'a'"), Token::CharLiteral('a'));
    }

    #[test]
    fn test_character_escape() {
        assert_eq!(lex("'\\n'"), Token::CharLiteral('\n'));
    }

    #[test]
    fn test_interpolated_string_plain() {
        assert_eq!(
            lex("$\"abc\""),
            Token::InterpolString(Symbol::intern("abc"))
        );
    }

    #[test]
    fn test_interpolated_string_with_placeholder() {
        assert_eq!(
            lex("$\"x is {x}\""),
            Token::InterpolString(Symbol::intern("x is {x}"))
        );
    }

    #[test]
    fn test_interpolated_string_with_nested_string_in_placeholder() {
        assert_eq!(
            lex("$\"{\"a\" + \"b\"}\""),
            Token::InterpolString(Symbol::intern("{\"a\" + \"b\"}"))
        );
    }

    #[test]
    fn test_interpolated_string_escape_outside_placeholder() {
        assert_eq!(
            lex("$\"line\\n{x}\""),
            Token::InterpolString(Symbol::intern("line\n{x}"))
        );
    }
}
