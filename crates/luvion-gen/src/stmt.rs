//! Statement and function emission.
//!
//! Walks each function body with the same push/pop-scope and branch-max
//! choreography as [`luvion_par::frame::walk_frame`] (see that module's
//! doc comment), so every local gets exactly the offset semantic
//! preparation already reserved stack space for, but interleaves real
//! instruction emission at each step instead of only tallying an offset.

use luvion_par::ast::{FnDecl, Stmt, Type, VarDecl};
use luvion_par::symtab::{ScopeKind, SymbolKind, SymbolTable};
use luvion_sem::PreparedFunction;

use crate::emitter::Emitter;
use crate::expr::emit_expr;
use crate::runtime;

/// Stack space reserved beyond locals for the two callee-saved spill slots
/// (RBX, R15), rounded so the total frame stays 16-byte aligned.
fn frame_bytes(local_bytes: i64) -> i64 {
    let total = local_bytes + 16;
    let rounded = ((total + 15) / 16) * 16;
    rounded.max(128)
}

pub fn emit_function(out: &mut Emitter, decl: &FnDecl, prepared: &PreparedFunction, symbols: &mut SymbolTable) {
    symbols.begin_function_scope();
    for param in &decl.params {
        symbols.add_param(param.name, param.ty.clone());
    }

    let name = decl.name.as_str();
    out.label(name);
    out.line("    push rbp");
    out.line("    mov rbp, rsp");
    out.line(&format!("    sub rsp, {}", frame_bytes(prepared.frame_size)));
    out.line("    mov [rbp-8], rbx");
    out.line("    mov [rbp-16], r15");

    for stmt in &decl.body {
        emit_stmt(out, stmt, symbols, &prepared.types, name);
    }

    out.label(&format!("{}_return", name));
    free_locals_for_return(out, symbols.locals_in_current_scope());
    out.line("    mov rbx, [rbp-8]");
    out.line("    mov r15, [rbp-16]");
    out.line("    mov rsp, rbp");
    out.line("    pop rbp");
    out.line("    ret");

    symbols.set_local_offset(luvion_par::symtab::LOCAL_BASE);
    symbols.pop_scope();
}

fn emit_stmt(
    out: &mut Emitter,
    stmt: &Stmt,
    symbols: &mut SymbolTable,
    types: &luvion_util::IndexVec<luvion_par::ast::ExprId, Option<Type>>,
    return_label: &str,
) {
    match stmt {
        Stmt::Expr(e) => {
            emit_expr(out, e, symbols, types);
        },
        Stmt::VarDecl(v) => emit_var_decl(out, v, symbols, types),
        Stmt::Return(value, _) => {
            if let Some(e) = value {
                emit_expr(out, e, symbols, types);
            }
            free_locals_for_return(out, symbols.locals_in_enclosing_block_scopes());
            out.line(&format!("    jmp {}", return_label));
        },
        Stmt::Block(stmts) => {
            symbols.push_scope(ScopeKind::Block);
            for s in stmts {
                emit_stmt(out, s, symbols, types, return_label);
            }
            let peak = symbols.current_local_offset();
            free_locals_in_scope(out, symbols);
            symbols.pop_scope();
            symbols.set_local_offset(peak);
        },
        Stmt::If(s) => {
            emit_expr(out, &s.cond, symbols, types);
            out.line("    cmp rax, 0");
            let start = symbols.current_local_offset();
            match &s.else_branch {
                Some(else_branch) => {
                    let else_label = out.fresh_label("else");
                    let end_label = out.fresh_label("endif");
                    out.line(&format!("    je {}", else_label));
                    emit_stmt(out, &s.then_branch, symbols, types, return_label);
                    out.line(&format!("    jmp {}", end_label));
                    out.label(&else_label);
                    symbols.set_local_offset(start);
                    emit_stmt(out, else_branch, symbols, types, return_label);
                    out.label(&end_label);
                },
                None => {
                    let end_label = out.fresh_label("endif");
                    out.line(&format!("    je {}", end_label));
                    emit_stmt(out, &s.then_branch, symbols, types, return_label);
                    out.label(&end_label);
                },
            }
        },
        Stmt::While(s) => {
            let top = out.fresh_label("while");
            let end = out.fresh_label("endwhile");
            out.label(&top);
            emit_expr(out, &s.cond, symbols, types);
            out.line("    cmp rax, 0");
            out.line(&format!("    je {}", end));
            emit_stmt(out, &s.body, symbols, types, return_label);
            out.line(&format!("    jmp {}", top));
            out.label(&end);
        },
        Stmt::For(s) => {
            let start = symbols.current_local_offset();
            symbols.push_scope(ScopeKind::Block);
            if let Some(init) = &s.init {
                emit_stmt(out, init, symbols, types, return_label);
            }
            let top = out.fresh_label("for");
            let end = out.fresh_label("endfor");
            out.label(&top);
            if let Some(cond) = &s.cond {
                emit_expr(out, cond, symbols, types);
                out.line("    cmp rax, 0");
                out.line(&format!("    je {}", end));
            }
            match s.body.as_ref() {
                Stmt::Block(stmts) => {
                    for st in stmts {
                        emit_stmt(out, st, symbols, types, return_label);
                    }
                },
                other => panic!("for-loop body must be a block, found {:?}", other),
            }
            if let Some(inc) = &s.increment {
                emit_expr(out, inc, symbols, types);
            }
            out.line(&format!("    jmp {}", top));
            out.label(&end);
            let peak = symbols.current_local_offset();
            free_locals_in_scope(out, symbols);
            symbols.pop_scope();
            symbols.set_local_offset(peak.max(start));
        },
        Stmt::Function(_) | Stmt::Import(..) => {},
    }
}

fn emit_var_decl(
    out: &mut Emitter,
    v: &VarDecl,
    symbols: &mut SymbolTable,
    types: &luvion_util::IndexVec<luvion_par::ast::ExprId, Option<Type>>,
) {
    match &v.init {
        Some(init) => emit_expr(out, init, symbols, types),
        None => out.line("    xor rax, rax"),
    }
    symbols.add_local(v.name, v.ty.clone(), SymbolKind::Local);
    let offset = symbols.lookup_current(v.name).expect("just inserted").offset;
    out.line(&format!("    mov [rbp-{}], rax", offset));
}

/// Frees every string-typed local declared in the current scope, in
/// declaration order, as that scope is about to be popped.
fn free_locals_in_scope(out: &mut Emitter, symbols: &SymbolTable) {
    for (name, ty, offset) in symbols.locals_in_current_scope() {
        if ty.is_string() {
            out.line(&format!("    mov rdi, [rbp-{}]", offset));
            out.line("    mov r15, rsp");
            out.line("    and r15, 15");
            out.line("    sub rsp, r15");
            out.line(&format!("    call {}", runtime::FREE));
            out.line("    add rsp, r15");
            let _ = name;
        }
    }
}

/// Frees every string-typed local in `locals`, skipping whichever slot (if
/// any) currently holds the same pointer as RAX. A `return` leaves its
/// value in RAX before jumping here (or before falling through into the
/// function epilogue), and if that value came from a bare local variable,
/// the slot and RAX hold the exact same heap pointer — freeing it would
/// hand the caller a dangling pointer. RAX is parked in RBX (callee-saved,
/// and left alone by every runtime helper call) for the duration of the
/// loop, since the `free` calls themselves clobber RAX.
fn free_locals_for_return(out: &mut Emitter, locals: Vec<(luvion_util::Symbol, Type, i64)>) {
    if !locals.iter().any(|(_, ty, _)| ty.is_string()) {
        return;
    }
    out.line("    mov rbx, rax");
    for (name, ty, offset) in locals {
        let _ = name;
        if !ty.is_string() {
            continue;
        }
        let skip = out.fresh_label("skip_free");
        out.line(&format!("    cmp rbx, [rbp-{}]", offset));
        out.line(&format!("    je {}", skip));
        out.line(&format!("    mov rdi, [rbp-{}]", offset));
        out.line("    mov r15, rsp");
        out.line("    and r15, 15");
        out.line("    sub rsp, r15");
        out.line(&format!("    call {}", runtime::FREE));
        out.line("    add rsp, r15");
        out.label(&skip);
    }
    out.line("    mov rax, rbx");
}
