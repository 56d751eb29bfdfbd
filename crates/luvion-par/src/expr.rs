//! Expression parsing, precedence-climbing over a fixed operator table.
//!
//! Precedence (low to high), all left-associative except assignment (right):
//! assignment `=` -> `||` -> `&&` -> `==`/`!=` -> `<`/`<=`/`>`/`>=` ->
//! `+`/`-` -> `*`/`/`/`%` -> unary prefix `!`/`-` -> postfix
//! `()`/`[]`/`++`/`--` -> primary.

use luvion_lex::{Lexer, Token};
use luvion_util::{Handler, Span, Symbol};

use crate::ast::{BinOp, Expr, ExprKind, Literal, UnOp};
use crate::Parser;

const MAX_CALL_ARGS: usize = 255;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let lhs = self.parse_or()?;
        if self.match_token(Token::Eq) {
            let value = self.parse_assignment()?;
            return match lhs.kind {
                ExprKind::Variable(name) => Some(self.make_expr(
                    ExprKind::Assign { name, value: Box::new(value) },
                    start,
                )),
                _ => {
                    self.error("invalid assignment target".to_string());
                    None
                },
            };
        }
        Some(lhs)
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_and()?;
        while self.check(Token::OrOr) {
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = self.make_expr(
                ExprKind::Binary { op: BinOp::Or, left: Box::new(lhs), right: Box::new(rhs) },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.check(Token::AndAnd) {
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = self.make_expr(
                ExprKind::Binary { op: BinOp::And, left: Box::new(lhs), right: Box::new(rhs) },
                span,
            );
        }
        Some(lhs)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.current() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = self.make_expr(ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) }, span);
        }
        Some(lhs)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.current() {
                Token::Lt => BinOp::Lt,
                Token::LtEq => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = self.make_expr(ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) }, span);
        }
        Some(lhs)
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = self.make_expr(ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) }, span);
        }
        Some(lhs)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = self.make_expr(ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) }, span);
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current() {
            Token::Minus => UnOp::Neg,
            Token::Bang => UnOp::Not,
            _ => return self.parse_postfix(),
        };
        let span = self.current_span();
        self.advance();
        let operand = self.parse_unary()?;
        Some(self.make_expr(ExprKind::Unary { op, operand: Box::new(operand) }, span))
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current() {
                Token::LParen => {
                    let span = self.current_span();
                    self.advance();
                    let args = self.parse_call_args()?;
                    expr = self.make_expr(
                        ExprKind::Call { callee: Box::new(expr), args },
                        span,
                    );
                },
                Token::LBracket => {
                    let span = self.current_span();
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(Token::RBracket, "']'");
                    expr = self.make_expr(
                        ExprKind::ArrayAccess { array: Box::new(expr), index: Box::new(index) },
                        span,
                    );
                },
                Token::PlusPlus => {
                    let span = self.current_span();
                    self.advance();
                    expr = self.make_expr(ExprKind::Increment { operand: Box::new(expr), is_inc: true }, span);
                },
                Token::MinusMinus => {
                    let span = self.current_span();
                    self.advance();
                    expr = self.make_expr(ExprKind::Increment { operand: Box::new(expr), is_inc: false }, span);
                },
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(Token::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'");
        if args.len() > MAX_CALL_ARGS {
            self.error(format!("too many call arguments: {} exceeds the limit of {}", args.len(), MAX_CALL_ARGS));
        }
        Some(args)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.current() {
            Token::IntLiteral(n) => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Int(n)), span))
            },
            Token::LongLiteral(n) => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Long(n)), span))
            },
            Token::DoubleLiteral(n) => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Double(n)), span))
            },
            Token::CharLiteral(c) => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Char(c)), span))
            },
            Token::StringLiteral(s) => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Str(s)), span))
            },
            Token::InterpolString(s) => {
                self.advance();
                Some(self.parse_interpolated(s, span))
            },
            Token::True => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Bool(true)), span))
            },
            Token::False => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Bool(false)), span))
            },
            Token::Nil => {
                self.advance();
                Some(self.make_expr(ExprKind::Literal(Literal::Nil), span))
            },
            Token::Ident(name) => {
                self.advance();
                Some(self.make_expr(ExprKind::Variable(name), span))
            },
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'");
                Some(inner)
            },
            Token::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(Token::RBracket) {
                    loop {
                        elements.push(self.parse_expr()?);
                        if !self.match_token(Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::RBracket, "']'");
                Some(self.make_expr(ExprKind::Array(elements), span))
            },
            other => {
                self.error(format!("expected expression, found {}", other.describe()));
                None
            },
        }
    }

    /// Splits an interpolated string's raw payload into literal-run and
    /// `{…}`-placeholder parts. Placeholder text is parsed by a fresh
    /// nested parser over a fresh lexer, sharing this parser's symbol
    /// table (moved in and handed back) so names resolved inside a
    /// placeholder see the same scope chain as the surrounding expression.
    fn parse_interpolated(&mut self, payload: Symbol, span: Span) -> Expr {
        let text = payload.as_str();
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if c == '{' {
                if !literal.is_empty() {
                    parts.push(self.make_expr(
                        ExprKind::Literal(Literal::Str(Symbol::intern(&literal))),
                        span,
                    ));
                    literal.clear();
                }
                let mut depth = 1u32;
                let mut placeholder = String::new();
                for (_, c) in chars.by_ref() {
                    if c == '{' {
                        depth += 1;
                    } else if c == '}' {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    placeholder.push(c);
                }
                if depth != 0 {
                    self.error("unterminated '{' in interpolated string".to_string());
                }
                if let Some(expr) = self.parse_nested_placeholder(&placeholder) {
                    parts.push(expr);
                }
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            parts.push(self.make_expr(ExprKind::Literal(Literal::Str(Symbol::intern(&literal))), span));
        }
        self.make_expr(ExprKind::Interpolated(parts), span)
    }

    fn parse_nested_placeholder(&mut self, text: &str) -> Option<Expr> {
        let symbols = std::mem::take(&mut self.symbols);
        let lexer = Lexer::new(text, self.handler);
        let mut nested = Parser::from_lexer(lexer, self.handler, symbols);
        let expr = nested.parse_expr();
        self.symbols = nested.symbols;
        expr
    }

    pub(crate) fn make_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        Expr { id: self.next_expr_id(), span, kind }
    }
}

#[cfg(test)]
mod tests {
    use luvion_util::Handler;

    use crate::ast::{BinOp, ExprKind, Literal};
    use crate::Parser;

    fn parse(src: &str) -> crate::ast::Expr {
        let handler = Handler::new();
        let mut parser = Parser::new(src, &handler);
        parser.parse_expr().expect("expression should parse")
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary { op: BinOp::Add, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
            },
            other => panic!("expected addition at the top, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let expr = parse("a = b = c");
        match expr.kind {
            ExprKind::Assign { name, value } => {
                assert_eq!(name.as_str(), "a");
                assert!(matches!(value.kind, ExprKind::Assign { .. }));
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn interpolated_string_parts_count_matches_literals_and_placeholders() {
        let expr = parse(r#"$"x is {x} and {y}!""#);
        match expr.kind {
            ExprKind::Interpolated(parts) => assert_eq!(parts.len(), 4),
            other => panic!("expected interpolated expression, got {:?}", other),
        }
    }

    #[test]
    fn postfix_increment_wraps_operand() {
        let expr = parse("i++");
        assert!(matches!(expr.kind, ExprKind::Increment { is_inc: true, .. }));
    }

    #[test]
    fn call_with_arguments() {
        let expr = parse("foo(1, 2, 3)");
        match expr.kind {
            ExprKind::Call { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn array_literal_and_index() {
        let expr = parse("[1, 2, 3][0]");
        assert!(matches!(expr.kind, ExprKind::ArrayAccess { .. }));
    }

    #[test]
    fn bare_literal_int() {
        let expr = parse("42");
        assert!(matches!(expr.kind, ExprKind::Literal(Literal::Int(42))));
    }
}
