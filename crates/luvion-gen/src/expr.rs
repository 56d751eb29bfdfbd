//! Expression emission. Every expression leaves its result in RAX (or, for
//! doubles staged through an integer register per the calling convention,
//! its bit pattern in RAX) once `emit_expr` returns.

use luvion_par::ast::{BinOp, Expr, ExprId, ExprKind, Literal, Type, UnOp};
use luvion_par::symtab::{SymbolKind, SymbolTable};
use luvion_util::IndexVec;

use crate::emitter::Emitter;
use crate::runtime;

fn expr_type<'a>(types: &'a IndexVec<ExprId, Option<Type>>, id: ExprId) -> &'a Type {
    types[id].as_ref().expect("every expression is typed during semantic preparation")
}

/// `[rbp+off]` for a parameter, `[rbp-off]` for a local; globals (function
/// symbols referenced as bare values rather than called) have no runtime
/// storage and are not readable as expressions.
fn operand_of(symbols: &SymbolTable, name: luvion_util::Symbol) -> String {
    let sym = symbols.lookup(name).expect("undefined identifiers are diagnosed during semantic preparation");
    match sym.kind {
        SymbolKind::Param => format!("[rbp+{}]", sym.offset),
        SymbolKind::Local => format!("[rbp-{}]", sym.offset),
        SymbolKind::Global => format!("[rel {}]", name.as_str()),
    }
}

pub fn emit_expr(out: &mut Emitter, expr: &Expr, symbols: &SymbolTable, types: &IndexVec<ExprId, Option<Type>>) {
    match &expr.kind {
        ExprKind::Literal(lit) => emit_literal(out, lit),
        ExprKind::Variable(name) => {
            out.line(&format!("    mov rax, {}", operand_of(symbols, *name)));
        },
        ExprKind::Assign { name, value } => {
            emit_expr(out, value, symbols, types);
            let target_ty = symbols.lookup(*name).map(|s| s.ty.clone()).unwrap_or(Type::Void);
            let dest = operand_of(symbols, *name);
            if target_ty.is_string() {
                out.line("    push rax");
                free_owned_temporary(out, &dest);
                out.line("    pop rax");
            }
            out.line(&format!("    mov {}, rax", dest));
        },
        ExprKind::Binary { op, left, right } => emit_binary(out, *op, left, right, symbols, types),
        ExprKind::Unary { op, operand } => {
            emit_expr(out, operand, symbols, types);
            match op {
                UnOp::Neg if *expr_type(types, operand.id) == Type::Double => {
                    call_runtime_unary(out, runtime::NEG_DOUBLE);
                },
                UnOp::Neg => call_runtime_unary(out, runtime::NEG_LONG),
                UnOp::Not => call_runtime_unary(out, runtime::NOT_BOOL),
            }
        },
        ExprKind::Call { callee, args } => emit_call(out, callee, args, symbols, types),
        ExprKind::Array(_elements) => {
            // Array values are not yet realized; see the driver-level note
            // on array support.
            out.line("    xor rax, rax");
        },
        ExprKind::ArrayAccess { array, index } => {
            emit_expr(out, array, symbols, types);
            emit_expr(out, index, symbols, types);
            out.line("    xor rax, rax");
        },
        ExprKind::Increment { operand, is_inc } => {
            let dest = match &operand.kind {
                ExprKind::Variable(name) => operand_of(symbols, *name),
                other => panic!("increment target must be a variable, found {:?}", other),
            };
            out.line(&format!("    lea rdi, {}", dest));
            align_call(out, if *is_inc { runtime::POST_INC_LONG } else { runtime::POST_DEC_LONG });
        },
        ExprKind::Interpolated(parts) => emit_interpolation(out, parts, symbols, types),
    }
}

fn emit_literal(out: &mut Emitter, lit: &Literal) {
    match lit {
        Literal::Int(v) => out.line(&format!("    mov rax, {}", v)),
        Literal::Long(v) => out.line(&format!("    mov rax, {}", v)),
        Literal::Double(v) => out.line(&format!("    mov rax, 0x{:x}", v.to_bits())),
        Literal::Char(c) => out.line(&format!("    mov rax, {}", *c as u32)),
        Literal::Bool(b) => out.line(&format!("    mov rax, {}", if *b { 1 } else { 0 })),
        Literal::Nil => out.line("    xor rax, rax"),
        Literal::Str(s) => {
            let label = out.intern_string(s.as_str());
            out.line(&format!("    lea rax, [rel {}]", label));
            align_call(out, runtime::TO_STRING_STRING);
        },
    }
}

fn emit_binary(
    out: &mut Emitter,
    op: BinOp,
    left: &Expr,
    right: &Expr,
    symbols: &SymbolTable,
    types: &IndexVec<ExprId, Option<Type>>,
) {
    if matches!(op, BinOp::And | BinOp::Or) {
        emit_short_circuit(out, op, left, right, symbols, types);
        return;
    }

    let lhs_ty = expr_type(types, left.id).clone();
    let rhs_ty = expr_type(types, right.id).clone();

    if op == BinOp::Add && (lhs_ty == Type::Str || rhs_ty == Type::Str) {
        emit_expr(out, left, symbols, types);
        out.line("    push rax");
        emit_expr(out, right, symbols, types);
        out.line("    push rax");
        out.line("    mov rdi, [rsp+8]");
        out.line("    mov rsi, [rsp]");
        align_call(out, runtime::STR_CONCAT);
        out.line("    push rax");
        // A bare variable reference is still owned by its slot; only
        // operands that came from a temporary-producing expression are
        // ours to free here. The callee-saved stack slots (not the
        // registers the call just clobbered) are what we read back from.
        if !matches!(right.kind, ExprKind::Variable(_)) {
            out.line("    mov rdi, [rsp+8]");
            align_call(out, runtime::FREE);
        }
        if !matches!(left.kind, ExprKind::Variable(_)) {
            out.line("    mov rdi, [rsp+16]");
            align_call(out, runtime::FREE);
        }
        out.line("    pop rax");
        out.line("    add rsp, 16");
        return;
    }

    emit_expr(out, left, symbols, types);
    out.line("    push rax");
    emit_expr(out, right, symbols, types);
    out.line("    mov rsi, rax");
    out.line("    pop rdi");

    let is_double = lhs_ty == Type::Double || rhs_ty == Type::Double;
    let is_str = lhs_ty == Type::Str && rhs_ty == Type::Str;
    let helper = match (op, is_double, is_str) {
        (BinOp::Add, true, _) => runtime::ADD_DOUBLE,
        (BinOp::Sub, true, _) => runtime::SUB_DOUBLE,
        (BinOp::Mul, true, _) => runtime::MUL_DOUBLE,
        (BinOp::Div, true, _) => runtime::DIV_DOUBLE,
        (BinOp::Add, false, _) => runtime::ADD_LONG,
        (BinOp::Sub, false, _) => runtime::SUB_LONG,
        (BinOp::Mul, false, _) => runtime::MUL_LONG,
        (BinOp::Div, false, _) => runtime::DIV_LONG,
        (BinOp::Mod, _, _) => runtime::MOD_LONG,
        (BinOp::Eq, _, true) => runtime::EQ_STRING,
        (BinOp::Ne, _, true) => runtime::NE_STRING,
        (BinOp::Eq, true, _) => runtime::EQ_DOUBLE,
        (BinOp::Ne, true, _) => runtime::NE_DOUBLE,
        (BinOp::Lt, true, _) => runtime::LT_DOUBLE,
        (BinOp::Le, true, _) => runtime::LE_DOUBLE,
        (BinOp::Gt, true, _) => runtime::GT_DOUBLE,
        (BinOp::Ge, true, _) => runtime::GE_DOUBLE,
        (BinOp::Eq, false, _) => runtime::EQ_LONG,
        (BinOp::Ne, false, _) => runtime::NE_LONG,
        (BinOp::Lt, false, _) => runtime::LT_LONG,
        (BinOp::Le, false, _) => runtime::LE_LONG,
        (BinOp::Gt, false, _) => runtime::GT_LONG,
        (BinOp::Ge, false, _) => runtime::GE_LONG,
        (BinOp::And, ..) | (BinOp::Or, ..) => unreachable!("handled above"),
    };
    call_runtime_binary(out, helper);
}

fn emit_short_circuit(
    out: &mut Emitter,
    op: BinOp,
    left: &Expr,
    right: &Expr,
    symbols: &SymbolTable,
    types: &IndexVec<ExprId, Option<Type>>,
) {
    let end = out.fresh_label("sc_end");
    emit_expr(out, left, symbols, types);
    out.line("    cmp rax, 0");
    match op {
        BinOp::And => out.line(&format!("    je {}", end)),
        BinOp::Or => out.line(&format!("    jne {}", end)),
        _ => unreachable!(),
    }
    emit_expr(out, right, symbols, types);
    out.label(&end);
}

fn call_runtime_unary(out: &mut Emitter, helper: &str) {
    out.line("    mov rdi, rax");
    align_call(out, helper);
}

fn call_runtime_binary(out: &mut Emitter, helper: &str) {
    align_call(out, helper);
}

/// Wraps `call helper` with the System V 16-byte stack-alignment dance.
fn align_call(out: &mut Emitter, helper: &str) {
    out.line("    mov r15, rsp");
    out.line("    and r15, 15");
    out.line("    sub rsp, r15");
    out.line(&format!("    call {}", helper));
    out.line("    add rsp, r15");
}

fn free_owned_temporary(out: &mut Emitter, operand: &str) {
    out.line(&format!("    mov rdi, {}", operand));
    align_call(out, runtime::FREE);
}

fn emit_call(
    out: &mut Emitter,
    callee: &Expr,
    args: &[Expr],
    symbols: &SymbolTable,
    types: &IndexVec<ExprId, Option<Type>>,
) {
    let name = match &callee.kind {
        ExprKind::Variable(name) => *name,
        other => panic!("call target must be a named function, found {:?}", other),
    };

    if name.as_str() == "print" {
        emit_print(out, &args[0], symbols, types);
        return;
    }

    for arg in args {
        emit_expr(out, arg, symbols, types);
        out.line("    push rax");
    }
    const ARG_REGS: [&str; 6] = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
    for reg in ARG_REGS.iter().take(args.len()).rev() {
        out.line(&format!("    pop {}", reg));
    }
    align_call(out, name.as_str());
}

fn emit_print(out: &mut Emitter, arg: &Expr, symbols: &SymbolTable, types: &IndexVec<ExprId, Option<Type>>) {
    if let ExprKind::Interpolated(parts) = &arg.kind {
        for part in parts {
            emit_print_one(out, part, symbols, types);
        }
        return;
    }
    emit_print_one(out, arg, symbols, types);
}

fn emit_print_one(out: &mut Emitter, arg: &Expr, symbols: &SymbolTable, types: &IndexVec<ExprId, Option<Type>>) {
    emit_expr(out, arg, symbols, types);
    let is_owned_temp = expr_type(types, arg.id).is_string() && !matches!(arg.kind, ExprKind::Variable(_));
    if is_owned_temp {
        out.line("    push rax");
    }
    out.line("    mov rdi, rax");
    let helper = match expr_type(types, arg.id) {
        Type::Double => runtime::PRINT_DOUBLE,
        Type::Char => runtime::PRINT_CHAR,
        Type::Str => runtime::PRINT_STRING,
        Type::Bool => runtime::PRINT_BOOL,
        _ => runtime::PRINT_LONG,
    };
    align_call(out, helper);
    if is_owned_temp {
        out.line("    pop rdi");
        align_call(out, runtime::FREE);
    }
}

fn emit_interpolation(out: &mut Emitter, parts: &[Expr], symbols: &SymbolTable, types: &IndexVec<ExprId, Option<Type>>) {
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => {
            out.line("    xor rax, rax");
            return;
        },
    };
    emit_expr(out, first, symbols, types);
    out.line("    mov rdi, rax");
    align_call(out, to_string_helper(expr_type(types, first.id)));

    for part in rest {
        out.line("    push rax"); // accumulator so far
        emit_expr(out, part, symbols, types);
        out.line("    mov rdi, rax");
        align_call(out, to_string_helper(expr_type(types, part.id)));
        out.line("    push rax"); // this part as a fresh heap string
        out.line("    mov rdi, [rsp+8]"); // accumulator
        out.line("    mov rsi, [rsp]"); // part
        align_call(out, runtime::STR_CONCAT);
        out.line("    push rax"); // new accumulator
        out.line("    mov rdi, [rsp+8]");
        align_call(out, runtime::FREE); // free the part string
        out.line("    mov rdi, [rsp+16]");
        align_call(out, runtime::FREE); // free the old accumulator
        out.line("    pop rax");
        out.line("    add rsp, 16");
    }
}

fn to_string_helper(ty: &Type) -> &'static str {
    match ty {
        Type::Double => runtime::TO_STRING_DOUBLE,
        Type::Char => runtime::TO_STRING_CHAR,
        Type::Bool => runtime::TO_STRING_BOOL,
        Type::Str => runtime::TO_STRING_STRING,
        _ => runtime::TO_STRING_LONG,
    }
}
