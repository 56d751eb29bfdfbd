//! Edge case tests for luvion-par.

#[cfg(test)]
mod tests {
    use crate::ast::{ExprKind, Stmt};
    use crate::Parser;
    use luvion_util::Handler;

    fn parse(source: &str) -> (crate::Module, Handler) {
        let handler = Handler::new();
        let mut parser = Parser::new(source, &handler);
        let module = parser.parse_module("edge.lv");
        (module, handler)
    }

    /// EDGE CASE: empty source.
    #[test]
    fn empty_source() {
        let (module, handler) = parse("");
        assert!(module.stmts.is_empty());
        assert!(!handler.has_errors());
    }

    /// EDGE CASE: whitespace- and blank-line-only source.
    #[test]
    fn whitespace_only() {
        let (module, handler) = parse("   \n\t  \n  \n");
        assert!(module.stmts.is_empty());
        assert!(!handler.has_errors());
    }

    /// EDGE CASE: deeply nested if/while/for all sharing one scope chain.
    #[test]
    fn deeply_nested_control_flow() {
        let source = "fn f(): void =>\n    if true =>\n        while true =>\n            for var i: int = 0; i < 1; i++ =>\n                return\n";
        let (module, handler) = parse(source);
        assert!(!handler.has_errors());
        assert_eq!(module.stmts.len(), 1);
    }

    /// EDGE CASE: function with the maximum number of declared parameters
    /// does not trip the limit.
    #[test]
    fn exactly_255_params_is_allowed() {
        let params = (0..255).map(|i| format!("p{}: int", i)).collect::<Vec<_>>().join(", ");
        let source = format!("fn f({}): void =>\n    return\n", params);
        let (_, handler) = parse(&source);
        assert!(!handler.has_errors());
    }

    /// EDGE CASE: 256 parameters is diagnosed but parsing still completes.
    #[test]
    fn over_255_params_is_diagnosed_but_recovers() {
        let params = (0..256).map(|i| format!("p{}: int", i)).collect::<Vec<_>>().join(", ");
        let source = format!("fn f({}): void =>\n    return\n", params);
        let (module, handler) = parse(&source);
        assert!(handler.has_errors());
        assert_eq!(module.stmts.len(), 1);
    }

    /// EDGE CASE: redeclaring a name in the same scope is diagnosed, not
    /// panicked on.
    #[test]
    fn duplicate_global_declaration_is_diagnosed() {
        let (_, handler) = parse("var x: int = 1\nvar x: int = 2\n");
        assert!(handler.has_errors());
    }

    /// EDGE CASE: shadowing a global with a local of the same name in a
    /// function body is fine, since it's a different scope.
    #[test]
    fn shadowing_across_scopes_is_not_an_error() {
        let (_, handler) = parse("var x: int = 1\nfn f(): void =>\n    var x: int = 2\n    return\n");
        assert!(!handler.has_errors());
    }

    /// EDGE CASE: a syntax error inside one top-level declaration does not
    /// swallow the declarations that follow it - recovery must resync.
    #[test]
    fn error_recovery_still_parses_following_declarations() {
        let (module, handler) = parse("var : int = 1\nvar y: int = 2\n");
        assert!(handler.has_errors());
        assert!(module.stmts.iter().any(|s| matches!(s, Stmt::VarDecl(v) if v.name.as_str() == "y")));
    }

    /// EDGE CASE: an interpolated string with no placeholders at all is
    /// still a valid (degenerate) interpolation.
    #[test]
    fn interpolation_with_no_placeholder() {
        let source = r#"var s: str = $"just text""#;
        let (module, handler) = parse(source);
        assert!(!handler.has_errors());
        match &module.stmts[0] {
            Stmt::VarDecl(v) => match &v.init.as_ref().unwrap().kind {
                ExprKind::Interpolated(parts) => assert_eq!(parts.len(), 1),
                other => panic!("expected interpolated expr, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    /// EDGE CASE: nested braces inside a placeholder (an array literal)
    /// must not prematurely close the placeholder on the inner brace.
    #[test]
    fn interpolation_placeholder_can_contain_brace_depth() {
        let source = r#"print($"len {[1,2,3][0]}")"#;
        let (_, handler) = parse(source);
        assert!(!handler.has_errors());
    }

    /// EDGE CASE: every clause of a `for` loop can be elided.
    #[test]
    fn for_loop_with_all_clauses_elided() {
        let source = "fn f(): void =>\n    for ;; => return\n";
        let (module, handler) = parse(source);
        assert!(!handler.has_errors());
        match &module.stmts[0] {
            Stmt::Function(decl) => match &decl.body[0] {
                Stmt::For(for_stmt) => {
                    assert!(for_stmt.init.is_none());
                    assert!(for_stmt.cond.is_none());
                    assert!(for_stmt.increment.is_none());
                },
                other => panic!("expected for, got {:?}", other),
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    /// EDGE CASE: an unterminated interpolation placeholder is diagnosed
    /// rather than looping forever.
    #[test]
    fn unterminated_interpolation_placeholder_is_diagnosed() {
        let source = r#"var s: str = $"x is {x""#;
        let (_, handler) = parse(source);
        assert!(handler.has_errors());
    }
}
