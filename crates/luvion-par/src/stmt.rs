//! Statement parsing: `if`/`while`/`for`/`return`/block/expression-statement.

use luvion_lex::Token;

use crate::ast::{ForStmt, IfStmt, Stmt, WhileStmt};
use crate::symtab::ScopeKind;
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current() {
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::For => self.parse_for(),
            Token::Return => self.parse_return(),
            _ => self.parse_expr_statement(),
        }
    }

    /// `if := 'if' expression '=>' body ('else' '=>' body)?`
    fn parse_if(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let cond = self.parse_expr()?;
        self.expect(Token::FatArrow, "'=>'");
        let then_branch = self.parse_block_body();
        let else_branch = if self.match_token(Token::Else) {
            self.expect(Token::FatArrow, "'=>'");
            Some(Box::new(self.parse_block_body()))
        } else {
            None
        };
        Some(Stmt::If(IfStmt { cond, then_branch: Box::new(then_branch), else_branch, span: start }))
    }

    /// `while := 'while' expression '=>' body`
    fn parse_while(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let cond = self.parse_expr()?;
        self.expect(Token::FatArrow, "'=>'");
        let body = self.parse_block_body();
        Some(Stmt::While(WhileStmt { cond, body: Box::new(body), span: start }))
    }

    /// `for := 'for' (var_decl | expression_stmt | ';')
    ///         expression? ';' expression? '=>' body`
    ///
    /// The whole clause lives in one scope so the loop variable declared in
    /// `init` is visible to `cond`, `increment`, and the body.
    fn parse_for(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        self.symbols.push_scope(ScopeKind::Block);

        let init = if self.match_token(Token::Semicolon) {
            None
        } else if self.check(Token::Var) {
            self.parse_var_decl().map(Box::new)
        } else {
            let stmt = self.parse_expr_statement()?;
            Some(Box::new(stmt))
        };

        let cond = if self.check(Token::Semicolon) { None } else { self.parse_expr() };
        self.expect(Token::Semicolon, "';'");

        let increment = if self.check(Token::FatArrow) { None } else { self.parse_expr() };
        self.expect(Token::FatArrow, "'=>'");

        let body = self.parse_body();
        self.symbols.pop_scope();

        Some(Stmt::For(ForStmt {
            init,
            cond,
            increment,
            body: Box::new(Stmt::Block(body)),
            span: start,
        }))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let value = if self.check(Token::Semicolon) || self.check(Token::Newline) || self.check(Token::Dedent) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume_terminator();
        Some(Stmt::Return(value, start))
    }

    fn parse_expr_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr()?;
        self.consume_terminator();
        Some(Stmt::Expr(expr))
    }

    /// A `body` used as an `if`/`while` branch: a single statement, or a
    /// `NEWLINE INDENT ... DEDENT` block, wrapped as a single [`Stmt::Block`]
    /// so the branch always has its own scope to push and pop.
    fn parse_block_body(&mut self) -> Stmt {
        self.symbols.push_scope(ScopeKind::Block);
        let stmts = self.parse_body();
        self.symbols.pop_scope();
        Stmt::Block(stmts)
    }
}
