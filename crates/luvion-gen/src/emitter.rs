//! Top-level module emission: section layout, `extern`/`global` directives,
//! and the string-literal pool.

use luvion_par::ast::{Module, Stmt};
use luvion_par::symtab::SymbolTable;
use luvion_sem::PreparedModule;

use crate::error::{CodeGenError, Result};
use crate::runtime;
use crate::stmt::emit_function;

/// Accumulates the text of the generated assembly plus the pool of string
/// literals that get appended as a `.data` section once every function has
/// been emitted.
pub struct Emitter {
    pub text: String,
    literals: Vec<(String, String)>,
    next_label: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Self { text: String::new(), literals: Vec::new(), next_label: 0 }
    }

    pub fn line(&mut self, s: &str) {
        self.text.push_str(s);
        self.text.push('\n');
    }

    pub fn label(&mut self, name: &str) {
        self.text.push_str(name);
        self.text.push_str(":\n");
    }

    /// Allocates a fresh, module-unique label, e.g. for `if`/`while`
    /// branch targets.
    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let id = self.next_label;
        self.next_label += 1;
        format!(".L{}_{}", prefix, id)
    }

    /// Interns a string literal, returning the `.data` label that will
    /// hold its NASM `db` encoding.
    pub fn intern_string(&mut self, value: &str) -> String {
        let label = format!("str_{}", self.literals.len());
        self.literals.push((label.clone(), value.to_string()));
        label
    }

    fn emit_data_section(&mut self) {
        if self.literals.is_empty() {
            return;
        }
        self.line("section .data");
        for (label, value) in std::mem::take(&mut self.literals) {
            self.line(&format!("{}: db {}, 0", label, nasm_byte_string(&value)));
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a Rust string as a NASM-style comma-separated byte list, e.g.
/// `"ab"` -> `` `a`,`b` ``, escaping nothing further since the lexer has
/// already decoded the literal's escapes into real characters.
fn nasm_byte_string(value: &str) -> String {
    value.bytes().map(|b| format!("{}", b)).collect::<Vec<_>>().join(",")
}

/// Generates the full assembly text for `module`.
///
/// `symbols` must be the same table the parser and [`luvion_sem::prepare_module`]
/// used, still holding the global scope with every function's symbol (so
/// calls resolve) but with each function's own scope already popped;
/// emission re-opens a function scope per declaration and re-walks its body
/// to assign the exact same offsets semantic preparation already decided on.
pub fn generate_module(module: &Module, prepared: &PreparedModule, symbols: &mut SymbolTable) -> Result<String> {
    let has_main = module.stmts.iter().any(|s| matches!(s, Stmt::Function(f) if f.name.as_str() == "main"));
    if !has_main {
        return Err(CodeGenError::NoEntryPoint);
    }

    let mut out = Emitter::new();
    out.line("section .text");
    out.line("global main");
    for helper in runtime::ALL_HELPERS {
        out.line(&format!("extern {}", helper));
    }
    out.line(&format!("extern {}", runtime::FREE));
    out.line("");

    let mut prepared_iter = prepared.functions.iter();
    for stmt in &module.stmts {
        if let Stmt::Function(decl) = stmt {
            let prepared_fn = prepared_iter.next().ok_or_else(|| {
                CodeGenError::Internal(format!("no prepared entry for function '{}'", decl.name.as_str()))
            })?;
            emit_function(&mut out, decl, prepared_fn, symbols);
        }
    }

    out.emit_data_section();
    out.line("section .note.GNU-stack noalloc noexec nowrite progbits");
    Ok(out.text)
}
