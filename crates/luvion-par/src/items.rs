//! Top-level declaration parsing: `var_decl | fn_decl | import | statement`.

use luvion_lex::Token;
use luvion_util::Symbol;

use crate::ast::{FnDecl, Param, Stmt, Type, VarDecl};
use crate::symtab::{ScopeKind, SymbolKind};
use crate::Parser;

const MAX_PARAMS: usize = 255;

impl<'a> Parser<'a> {
    /// `declaration := var_decl | fn_decl | import | statement`
    pub(crate) fn parse_declaration(&mut self) -> Option<Stmt> {
        match self.current() {
            Token::Var => self.parse_var_decl(),
            Token::Fn => self.parse_fn_decl(),
            Token::Import => self.parse_import(),
            _ => self.parse_statement(),
        }
    }

    /// `var_decl := 'var' IDENT ':' type ('=' expression)? terminator`
    pub(crate) fn parse_var_decl(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let name = self.expect_ident()?;
        self.expect(Token::Colon, "':'");
        let ty = self.parse_type()?;
        let init = if self.match_token(Token::Eq) { Some(self.parse_expr()?) } else { None };
        self.consume_terminator();

        if self.symbols.lookup_current(name).is_some() {
            self.error(format!("'{}' is already declared in this scope", name.as_str()));
        }
        let kind = if self.symbols.scope_kind(self.symbols.current_scope()) == ScopeKind::Global {
            SymbolKind::Global
        } else {
            SymbolKind::Local
        };
        self.symbols.add_local(name, ty.clone(), kind);

        Some(Stmt::VarDecl(VarDecl { name, ty, init, span: start }))
    }

    /// `fn_decl := 'fn' IDENT '(' (param (',' param)*)? ')' (':' type)? '=>'
    ///             NEWLINE INDENT declaration+ DEDENT`
    fn parse_fn_decl(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let name = self.expect_ident()?;

        if self.symbols.lookup_current(name).is_some() {
            self.error(format!("'{}' is already declared in this scope", name.as_str()));
        }

        self.expect(Token::LParen, "'('");
        let mut params = Vec::new();
        if !self.check(Token::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'");
        if params.len() > MAX_PARAMS {
            self.error(format!("too many parameters: {} exceeds the limit of {}", params.len(), MAX_PARAMS));
        }

        let ret_type = if self.match_token(Token::Colon) { self.parse_type()? } else { Type::Void };

        let param_types: Vec<_> = params.iter().map(|p| p.ty.clone()).collect();
        self.symbols.add_local(
            name,
            Type::Function { params: param_types, ret: Box::new(ret_type.clone()) },
            SymbolKind::Global,
        );

        self.expect(Token::FatArrow, "'=>'");
        self.symbols.begin_function_scope();
        for param in &params {
            self.symbols.add_param(param.name, param.ty.clone());
        }
        let body = self.parse_body();
        self.symbols.pop_scope();

        Some(Stmt::Function(FnDecl { name, params, ret_type, body, span: start }))
    }

    /// `param := IDENT ':' type`
    fn parse_param(&mut self) -> Option<Param> {
        let name = self.expect_ident()?;
        self.expect(Token::Colon, "':'");
        let ty = self.parse_type()?;
        Some(Param { name, ty })
    }

    fn parse_import(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance();
        let name = self.expect_ident()?;
        self.consume_terminator();
        Some(Stmt::Import(name, start))
    }

    fn expect_ident(&mut self) -> Option<Symbol> {
        match self.current() {
            Token::Ident(name) => {
                self.advance();
                Some(name)
            },
            other => {
                self.error(format!("expected an identifier, found {}", other.describe()));
                None
            },
        }
    }

    /// `body := single_statement | (NEWLINE INDENT declaration+ DEDENT)`
    pub(crate) fn parse_body(&mut self) -> Vec<Stmt> {
        if self.match_token(Token::Newline) {
            let mut stmts = Vec::new();
            self.expect(Token::Indent, "indented block");
            self.skip_newlines();
            while !self.check(Token::Dedent) && !self.check(Token::Eof) {
                match self.parse_declaration() {
                    Some(stmt) => stmts.push(stmt),
                    None => self.synchronize(),
                }
                self.skip_newlines();
            }
            self.expect(Token::Dedent, "dedent");
            stmts
        } else {
            match self.parse_declaration() {
                Some(stmt) => vec![stmt],
                None => Vec::new(),
            }
        }
    }
}
