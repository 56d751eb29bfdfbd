//! The two pre-passes plus a light expression type pass.

use luvion_par::ast::{BinOp, Expr, ExprId, ExprKind, FnDecl, Literal, Module, Stmt, Type, UnOp};
use luvion_par::frame;
use luvion_par::symtab::{ScopeKind, SymbolKind, SymbolTable};
use luvion_util::{DiagnosticBuilder, Handler, Idx, IndexVec, Symbol};

/// Maximum integer/pointer arguments the System V calling convention can
/// carry in registers (RDI, RSI, RDX, RCX, R8, R9).
pub const MAX_REGISTER_ARGS: usize = 6;

/// Everything code generation needs about one function beyond its AST.
pub struct PreparedFunction {
    pub name: Symbol,
    /// Total bytes of local-variable stack space this function requires,
    /// computed by the branch-max traversal in [`luvion_par::frame`].
    pub frame_size: i64,
    /// Per-expression inferred types, indexed by [`ExprId`].
    pub types: IndexVec<ExprId, Option<Type>>,
}

pub struct PreparedModule {
    pub functions: Vec<PreparedFunction>,
}

/// Runs semantic preparation over every function declared in `module`,
/// resolving identifiers against `symbols` (seeded with globals by the
/// parser) and reporting diagnostics through `handler`.
pub fn prepare_module(module: &Module, symbols: &mut SymbolTable, handler: &Handler) -> PreparedModule {
    let mut functions = Vec::new();
    for stmt in &module.stmts {
        if let Stmt::Function(decl) = stmt {
            functions.push(prepare_function(decl, symbols, handler));
        }
    }
    PreparedModule { functions }
}

fn prepare_function(decl: &FnDecl, symbols: &mut SymbolTable, handler: &Handler) -> PreparedFunction {
    symbols.begin_function_scope();
    for param in &decl.params {
        symbols.add_param(param.name, param.ty.clone());
    }

    let mut types = IndexVec::new();
    for stmt in &decl.body {
        check_stmt(stmt, symbols, handler, &mut types);
    }

    // The checking pass above advanced the function scope's local-offset
    // counter as a side effect of resolving names; reset it so the frame
    // pass below computes real offsets from a clean slate.
    symbols.set_local_offset(luvion_par::symtab::LOCAL_BASE);
    let frame_size = frame::walk_frame(symbols, &decl.body, &mut |table, v| {
        table.add_local(v.name, v.ty.clone(), SymbolKind::Local);
    });
    symbols.set_local_offset(luvion_par::symtab::LOCAL_BASE);
    symbols.pop_scope();

    PreparedFunction { name: decl.name, frame_size, types }
}

fn record(types: &mut IndexVec<ExprId, Option<Type>>, id: ExprId, ty: Type) -> Type {
    if types.len() <= id.index() {
        types.resize(id, None);
        types.push(Some(ty.clone()));
    } else {
        types[id] = Some(ty.clone());
    }
    ty
}

fn check_stmt(
    stmt: &Stmt,
    symbols: &mut SymbolTable,
    handler: &Handler,
    types: &mut IndexVec<ExprId, Option<Type>>,
) {
    match stmt {
        Stmt::Expr(e) => {
            check_expr(e, symbols, handler, types);
        },
        Stmt::VarDecl(v) => {
            if let Some(init) = &v.init {
                let init_ty = check_expr(init, symbols, handler, types);
                if !types_compatible(&v.ty, &init_ty) {
                    error(
                        handler,
                        format!(
                            "cannot initialize '{}' of type {:?} with a value of type {:?}",
                            v.name.as_str(),
                            v.ty,
                            init_ty
                        ),
                    );
                }
            }
            // Offsets assigned here are throwaway (reset before the frame
            // pass re-adds every declaration for real); this only needs to
            // make the name visible to statements later in the same scope.
            symbols.add_local(v.name, v.ty.clone(), SymbolKind::Local);
        },
        Stmt::Return(value, _) => {
            if let Some(e) = value {
                check_expr(e, symbols, handler, types);
            }
        },
        Stmt::Block(stmts) => {
            symbols.push_scope(ScopeKind::Block);
            for s in stmts {
                check_stmt(s, symbols, handler, types);
            }
            symbols.pop_scope();
        },
        Stmt::If(s) => {
            check_expr(&s.cond, symbols, handler, types);
            check_stmt(&s.then_branch, symbols, handler, types);
            if let Some(else_branch) = &s.else_branch {
                check_stmt(else_branch, symbols, handler, types);
            }
        },
        Stmt::While(s) => {
            check_expr(&s.cond, symbols, handler, types);
            check_stmt(&s.body, symbols, handler, types);
        },
        Stmt::For(s) => {
            symbols.push_scope(ScopeKind::Block);
            if let Some(init) = &s.init {
                check_stmt(init, symbols, handler, types);
            }
            if let Some(cond) = &s.cond {
                check_expr(cond, symbols, handler, types);
            }
            if let Some(inc) = &s.increment {
                check_expr(inc, symbols, handler, types);
            }
            check_stmt(&s.body, symbols, handler, types);
            symbols.pop_scope();
        },
        Stmt::Function(_) | Stmt::Import(..) => {},
    }
}

fn check_expr(
    expr: &Expr,
    symbols: &SymbolTable,
    handler: &Handler,
    types: &mut IndexVec<ExprId, Option<Type>>,
) -> Type {
    let ty = match &expr.kind {
        ExprKind::Literal(lit) => literal_type(lit),
        ExprKind::Variable(name) => match symbols.lookup(*name) {
            Some(sym) => sym.ty.clone(),
            None => {
                error(handler, format!("undefined identifier '{}'", name.as_str()));
                Type::Void
            },
        },
        ExprKind::Assign { name, value } => {
            let value_ty = check_expr(value, symbols, handler, types);
            match symbols.lookup(*name) {
                Some(sym) => {
                    if !types_compatible(&sym.ty, &value_ty) {
                        error(
                            handler,
                            format!("cannot assign a value of type {:?} to '{}'", value_ty, name.as_str()),
                        );
                    }
                    sym.ty.clone()
                },
                None => {
                    error(handler, format!("undefined identifier '{}'", name.as_str()));
                    Type::Void
                },
            }
        },
        ExprKind::Binary { op, left, right } => {
            let lhs = check_expr(left, symbols, handler, types);
            let rhs = check_expr(right, symbols, handler, types);
            binary_result_type(*op, &lhs, &rhs, handler)
        },
        ExprKind::Unary { op, operand } => {
            let operand_ty = check_expr(operand, symbols, handler, types);
            match op {
                UnOp::Neg if is_numeric(&operand_ty) => operand_ty,
                UnOp::Neg => {
                    error(handler, format!("cannot negate a value of type {:?}", operand_ty));
                    operand_ty
                },
                UnOp::Not if operand_ty == Type::Bool => Type::Bool,
                UnOp::Not => {
                    error(handler, format!("'!' requires a bool operand, found {:?}", operand_ty));
                    Type::Bool
                },
            }
        },
        ExprKind::Call { callee, args } => {
            let arg_types: Vec<Type> = args.iter().map(|a| check_expr(a, symbols, handler, types)).collect();
            if args.len() > MAX_REGISTER_ARGS {
                error(
                    handler,
                    format!(
                        "call has {} arguments, exceeding the {} the calling convention can pass in registers",
                        args.len(),
                        MAX_REGISTER_ARGS
                    ),
                );
            }
            match &callee.kind {
                ExprKind::Variable(name) if name.as_str() == "print" => {
                    if arg_types.len() != 1 {
                        error(
                            handler,
                            format!("'print' expects 1 argument, found {}", arg_types.len()),
                        );
                    }
                    Type::Void
                },
                ExprKind::Variable(name) => match symbols.lookup(*name) {
                    Some(sym) => match &sym.ty {
                        Type::Function { params, ret } => {
                            if params.len() != arg_types.len() {
                                error(
                                    handler,
                                    format!(
                                        "'{}' expects {} argument(s), found {}",
                                        name.as_str(),
                                        params.len(),
                                        arg_types.len()
                                    ),
                                );
                            }
                            (**ret).clone()
                        },
                        other => {
                            error(handler, format!("'{}' is not callable (found {:?})", name.as_str(), other));
                            Type::Void
                        },
                    },
                    None => {
                        error(handler, format!("undefined function '{}'", name.as_str()));
                        Type::Void
                    },
                },
                _ => {
                    error(handler, "call target must be a named function".to_string());
                    Type::Void
                },
            }
        },
        ExprKind::Array(elements) => {
            let mut element_ty = Type::Void;
            for (i, e) in elements.iter().enumerate() {
                let t = check_expr(e, symbols, handler, types);
                if i == 0 {
                    element_ty = t;
                }
            }
            Type::Array(Box::new(element_ty))
        },
        ExprKind::ArrayAccess { array, index } => {
            let array_ty = check_expr(array, symbols, handler, types);
            let index_ty = check_expr(index, symbols, handler, types);
            if !is_numeric(&index_ty) {
                error(handler, format!("array index must be numeric, found {:?}", index_ty));
            }
            match array_ty {
                Type::Array(elem) => *elem,
                other => {
                    error(handler, format!("cannot index a value of type {:?}", other));
                    Type::Void
                },
            }
        },
        ExprKind::Increment { operand, .. } => check_expr(operand, symbols, handler, types),
        ExprKind::Interpolated(parts) => {
            for part in parts {
                check_expr(part, symbols, handler, types);
            }
            Type::Str
        },
    };
    record(types, expr.id, ty)
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::Int,
        Literal::Long(_) => Type::Long,
        Literal::Double(_) => Type::Double,
        Literal::Char(_) => Type::Char,
        Literal::Str(_) => Type::Str,
        Literal::Bool(_) => Type::Bool,
        Literal::Nil => Type::Nil,
    }
}

fn is_numeric(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Long | Type::Double)
}

fn types_compatible(declared: &Type, actual: &Type) -> bool {
    declared == actual || (is_numeric(declared) && is_numeric(actual)) || *actual == Type::Nil
}

fn binary_result_type(op: BinOp, lhs: &Type, rhs: &Type, handler: &Handler) -> Type {
    match op {
        BinOp::Add if *lhs == Type::Str || *rhs == Type::Str => Type::Str,
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            if !is_numeric(lhs) || !is_numeric(rhs) {
                error(handler, format!("arithmetic requires numeric operands, found {:?} and {:?}", lhs, rhs));
            }
            widen(lhs, rhs)
        },
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            if !is_numeric(lhs) || !is_numeric(rhs) {
                error(handler, format!("comparison requires numeric operands, found {:?} and {:?}", lhs, rhs));
            }
            Type::Bool
        },
        BinOp::Eq | BinOp::Ne => Type::Bool,
        BinOp::And | BinOp::Or => {
            if *lhs != Type::Bool || *rhs != Type::Bool {
                error(handler, format!("'&&'/'||' require bool operands, found {:?} and {:?}", lhs, rhs));
            }
            Type::Bool
        },
    }
}

fn widen(lhs: &Type, rhs: &Type) -> Type {
    if *lhs == Type::Double || *rhs == Type::Double {
        Type::Double
    } else if *lhs == Type::Long || *rhs == Type::Long {
        Type::Long
    } else {
        Type::Int
    }
}

fn error(handler: &Handler, message: String) {
    DiagnosticBuilder::error(message).emit(handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use luvion_par::Parser;

    fn prepare(src: &str) -> (PreparedModule, Handler) {
        let handler = Handler::new();
        let mut parser = Parser::new(src, &handler);
        let module = parser.parse_module("sem_test.lv");
        let prepared = prepare_module(&module, &mut parser.symbols, &handler);
        (prepared, handler)
    }

    #[test]
    fn undefined_identifier_is_diagnosed() {
        let (_, handler) = prepare("fn f(): void =>\n    return x\n");
        assert!(handler.has_errors());
    }

    #[test]
    fn straight_line_locals_have_expected_frame_size() {
        let (prepared, handler) = prepare("fn f(): void =>\n    var a: int = 1\n    var b: int = 2\n    return\n");
        assert!(!handler.has_errors());
        assert_eq!(prepared.functions[0].frame_size, luvion_par::symtab::LOCAL_BASE + 2 * luvion_par::symtab::OFFSET_STEP);
    }

    #[test]
    fn branch_max_keeps_frame_small() {
        let (prepared, handler) = prepare(
            "fn f(): void =>\n    if true =>\n        var a: int = 1\n        var b: int = 2\n    else =>\n        var c: int = 1\n    return\n",
        );
        assert!(!handler.has_errors());
        assert_eq!(prepared.functions[0].frame_size, luvion_par::symtab::LOCAL_BASE + 2 * luvion_par::symtab::OFFSET_STEP);
    }

    #[test]
    fn call_with_too_many_register_arguments_is_diagnosed() {
        let src = "fn g(a:int,b:int,c:int,d:int,e:int,f:int,h:int): void =>\n    return\nfn f(): void =>\n    g(1,2,3,4,5,6,7)\n";
        let (_, handler) = prepare(src);
        assert!(handler.has_errors());
    }

    #[test]
    fn string_concatenation_yields_str() {
        let (prepared, handler) =
            prepare(r#"fn f(): void =>
    var s: str = "hello" + " world"
    return
"#);
        assert!(!handler.has_errors());
        let _ = prepared;
    }
}
