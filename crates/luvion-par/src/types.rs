//! Type parsing - primitive keyword types and array types.

use luvion_lex::Token;

use crate::ast::Type;
use crate::Parser;

impl<'a> Parser<'a> {
    /// `type := 'int' | 'long' | 'double' | 'char' | 'str' | 'bool' | 'void' | '[' type ']'`
    pub(crate) fn parse_type(&mut self) -> Option<Type> {
        let ty = match self.current() {
            Token::KwInt => Type::Int,
            Token::KwLong => Type::Long,
            Token::KwDouble => Type::Double,
            Token::KwChar => Type::Char,
            Token::KwStr => Type::Str,
            Token::KwBool => Type::Bool,
            Token::KwVoid => Type::Void,
            Token::LBracket => {
                self.advance();
                let elem = self.parse_type()?;
                self.expect(Token::RBracket, "']'");
                return Some(Type::Array(Box::new(elem)));
            },
            other => {
                self.error(format!("expected a type, found {}", other.describe()));
                return None;
            },
        };
        self.advance();
        Some(ty)
    }
}
