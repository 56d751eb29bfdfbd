//! The branch-max stack-frame traversal shared by semantic preparation's
//! stack-usage pre-pass and code generation's emission-time offset
//! assignment, so the two cannot drift apart.
//!
//! Sibling branches of an `if`/`while`/`for`/block are mutually exclusive at
//! runtime, so only one executes per pass through the construct: their peak
//! local usage is folded back with [`SymbolTable::set_local_offset`] as a
//! *maximum*, not a sum.

use crate::ast::{Stmt, VarDecl};
use crate::symtab::{ScopeKind, SymbolTable};

/// Walks `body`, calling `on_decl` for every `VAR_DECL` encountered in
/// program order, and returns the peak local-offset reached across the
/// whole body. `on_decl` is responsible for actually registering the
/// symbol (its exact effect differs between the pre-pass, which only wants
/// the symbol recorded, and emission, which may also need to act on it).
pub fn walk_frame<F>(table: &mut SymbolTable, body: &[Stmt], on_decl: &mut F) -> i64
where
    F: FnMut(&mut SymbolTable, &VarDecl),
{
    for stmt in body {
        walk_stmt(table, stmt, on_decl);
    }
    table.current_local_offset()
}

fn walk_stmt<F>(table: &mut SymbolTable, stmt: &Stmt, on_decl: &mut F)
where
    F: FnMut(&mut SymbolTable, &VarDecl),
{
    match stmt {
        Stmt::VarDecl(v) => on_decl(table, v),
        Stmt::Block(stmts) => {
            let peak = branch(table, stmts, on_decl);
            table.set_local_offset(peak);
        },
        Stmt::If(s) => {
            let start = table.current_local_offset();
            let then_peak = branch_of(table, &s.then_branch, on_decl);
            let peak = match &s.else_branch {
                Some(e) => {
                    table.set_local_offset(start);
                    then_peak.max(branch_of(table, e, on_decl))
                },
                None => then_peak,
            };
            table.set_local_offset(peak);
        },
        Stmt::While(s) => {
            let peak = branch_of(table, &s.body, on_decl);
            table.set_local_offset(peak);
        },
        Stmt::For(s) => {
            let start = table.current_local_offset();
            table.push_scope(ScopeKind::Block);
            if let Some(init) = &s.init {
                walk_stmt(table, init, on_decl);
            }
            match s.body.as_ref() {
                Stmt::Block(stmts) => {
                    for st in stmts {
                        walk_stmt(table, st, on_decl);
                    }
                },
                other => panic!("for-loop body must be a block, found {:?}", other),
            }
            let peak = table.current_local_offset();
            table.pop_scope();
            table.set_local_offset(peak.max(start));
        },
        Stmt::Expr(_) | Stmt::Return(..) | Stmt::Import(..) | Stmt::Function(_) => {},
    }
}

fn branch_of<F>(table: &mut SymbolTable, branch_stmt: &Stmt, on_decl: &mut F) -> i64
where
    F: FnMut(&mut SymbolTable, &VarDecl),
{
    match branch_stmt {
        Stmt::Block(stmts) => branch(table, stmts, on_decl),
        other => panic!("control-flow branch body must be a block, found {:?}", other),
    }
}

fn branch<F>(table: &mut SymbolTable, stmts: &[Stmt], on_decl: &mut F) -> i64
where
    F: FnMut(&mut SymbolTable, &VarDecl),
{
    table.push_scope(ScopeKind::Block);
    for st in stmts {
        walk_stmt(table, st, on_decl);
    }
    let peak = table.current_local_offset();
    table.pop_scope();
    peak
}
