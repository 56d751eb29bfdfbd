//! Edge case tests for luvion-lex.

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use luvion_util::{Handler, Symbol};

    fn lex_all(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x\n");
        assert_eq!(t[0], Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&format!("var {} = 1\n", name));
        assert!(t.contains(&Token::Ident(Symbol::intern(&name))));
    }

    #[test]
    fn test_edge_keyword_prefix_is_not_keyword() {
        let t = lex_all("variable\n");
        assert_eq!(t[0], Token::Ident(Symbol::intern("variable")));
    }

    #[test]
    fn test_edge_all_keywords() {
        let t = lex_all("fn var return if else for while import nil int long double char str bool void true false\n");
        assert!(t.contains(&Token::Fn));
        assert!(t.contains(&Token::Var));
        assert!(t.contains(&Token::Return));
        assert!(t.contains(&Token::If));
        assert!(t.contains(&Token::Else));
        assert!(t.contains(&Token::For));
        assert!(t.contains(&Token::While));
        assert!(t.contains(&Token::Import));
        assert!(t.contains(&Token::Nil));
        assert!(t.contains(&Token::KwInt));
        assert!(t.contains(&Token::KwLong));
        assert!(t.contains(&Token::KwDouble));
        assert!(t.contains(&Token::KwChar));
        assert!(t.contains(&Token::KwStr));
        assert!(t.contains(&Token::KwBool));
        assert!(t.contains(&Token::KwVoid));
        assert!(t.contains(&Token::True));
        assert!(t.contains(&Token::False));
    }

    #[test]
    fn test_edge_all_operators() {
        let t = lex_all("+ - * / % == != < > <= >= && || ! ++ --\n");
        assert!(t.contains(&Token::Plus));
        assert!(t.contains(&Token::EqEq));
        assert!(t.contains(&Token::PlusPlus));
        assert!(t.contains(&Token::MinusMinus));
    }

    #[test]
    fn test_edge_all_delimiters() {
        let t = lex_all("( ) { } [ ] , ; : . =>\n");
        assert!(t.contains(&Token::LParen));
        assert!(t.contains(&Token::FatArrow));
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = lex_all("((()))\n");
        assert_eq!(t.iter().filter(|x| **x == Token::LParen).count(), 3);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("Fn fn\n");
        assert_eq!(t[0], Token::Ident(Symbol::intern("Fn")));
        assert_eq!(t[1], Token::Fn);
    }

    #[test]
    fn test_edge_bools() {
        let t = lex_all("true false\n");
        assert_eq!(t[0], Token::True);
        assert_eq!(t[1], Token::False);
    }

    #[test]
    fn test_edge_long_and_double_suffixes() {
        let t = lex_all("42L 3.5\n");
        assert_eq!(t[0], Token::LongLiteral(42));
        assert_eq!(t[1], Token::DoubleLiteral(3.5));
    }

    #[test]
    fn test_edge_all_escape_kinds() {
        let t = lex_all(r#""\n\t\r\\\"\'\0\x41\u{1F600}""#);
        match &t[0] {
            Token::StringLiteral(s) => {
                let text = s.as_str();
                assert!(text.contains('\n'));
                assert!(text.contains('A'));
                assert!(text.contains('😀'));
            },
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_interpolated_string_multiple_placeholders() {
        let t = lex_all(r#"$"{a} and {b} and {c}""#);
        assert_eq!(
            t[0],
            Token::InterpolString(Symbol::intern("{a} and {b} and {c}"))
        );
    }

    #[test]
    fn test_edge_deeply_nested_dedents() {
        let source = "if true\n    if true\n        if true\n            var x = 1\nvar y = 2\n";
        let t = lex_all(source);
        assert_eq!(t.iter().filter(|x| **x == Token::Indent).count(), 3);
        assert_eq!(t.iter().filter(|x| **x == Token::Dedent).count(), 3);
    }

    #[test]
    fn test_edge_tabs_and_spaces_both_count_as_indentation() {
        let t = lex_all("if true\n\tvar x = 1\nvar y = 2\n");
        assert!(t.contains(&Token::Indent));
        assert!(t.contains(&Token::Dedent));
    }

    #[test]
    fn test_err_unterminated_string() {
        let handler = Handler::new();
        let _ = Lexer::new("\"unterminated", &handler).next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_unterminated_char() {
        let handler = Handler::new();
        let _ = Lexer::new("'x", &handler).next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_unterminated_block_comment() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("/* never closed", &handler);
        while lexer.next_token() != Token::Eof {}
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_inconsistent_dedent() {
        // Dedents to a width that was never pushed onto the indent stack.
        let handler = Handler::new();
        let mut lexer = Lexer::new("if true\n        var x = 1\n   var y = 2\n", &handler);
        while lexer.next_token() != Token::Eof {}
        assert!(handler.has_errors());
    }

    #[test]
    fn test_err_lone_ampersand_and_pipe() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a & b | c\n", &handler);
        while lexer.next_token() != Token::Eof {}
        assert!(handler.has_errors());
    }

    #[test]
    fn test_edge_consecutive_increment_operators() {
        let t = lex_all("x+++y\n");
        // Maximal munch: "++" then "+".
        assert!(t.contains(&Token::PlusPlus));
        assert!(t.contains(&Token::Plus));
    }

    #[test]
    fn test_edge_whitespace_only_line_between_statements() {
        let t = lex_all("var x = 1\n   \nvar y = 2\n");
        assert_eq!(t.iter().filter(|x| **x == Token::Newline).count(), 2);
    }
}
