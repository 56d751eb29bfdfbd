//! Scope-nested symbol table and x86-64 frame-offset assignment.
//!
//! Scopes are an arena of [`ScopeNode`]s; each scope's symbols form a
//! singly-linked list (`SymbolNode::next`) rather than a hash map, per the
//! data model this table implements. Lookup always walks from the current
//! scope outward through `enclosing`, so once `pop_scope` moves `current`
//! back to the parent, a popped scope's symbols are unreachable even though
//! their storage lingers in the arena.

use luvion_util::{define_idx, IndexVec, Symbol};

use crate::ast::Type;

define_idx!(SymbolId);
define_idx!(ScopeId);

/// PARAM base offset from the frame pointer (above saved RBP/return addr).
pub const PARAM_BASE: i64 = 16;
/// LOCAL base offset from the frame pointer.
pub const LOCAL_BASE: i64 = 8;
/// Per-symbol alignment step: every value occupies one full 64-bit slot.
pub const OFFSET_STEP: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
    Param,
}

#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub name: Symbol,
    pub ty: Type,
    pub kind: SymbolKind,
    pub offset: i64,
    next: Option<SymbolId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

struct ScopeNode {
    head: Option<SymbolId>,
    enclosing: Option<ScopeId>,
    kind: ScopeKind,
    next_local_offset: i64,
    next_param_offset: i64,
}

pub struct SymbolTable {
    symbols: IndexVec<SymbolId, SymbolNode>,
    scopes: IndexVec<ScopeId, ScopeNode>,
    current: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let global = scopes.push(ScopeNode {
            head: None,
            enclosing: None,
            kind: ScopeKind::Global,
            next_local_offset: LOCAL_BASE,
            next_param_offset: PARAM_BASE,
        });
        Self { symbols: IndexVec::new(), scopes, current: global }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Pushes a new scope whose offset counters start from the current
    /// scope's counters, so nested declarations continue the same running
    /// allocation. `begin_function_scope` is the one exception that resets
    /// to the base values instead.
    pub fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = &self.scopes[self.current];
        let (local, param) = (parent.next_local_offset, parent.next_param_offset);
        let id = self.scopes.push(ScopeNode {
            head: None,
            enclosing: Some(self.current),
            kind,
            next_local_offset: local,
            next_param_offset: param,
        });
        self.current = id;
        id
    }

    /// Pushes a function scope with offset counters reset to their bases,
    /// so each function gets an independent frame.
    pub fn begin_function_scope(&mut self) -> ScopeId {
        let id = self.scopes.push(ScopeNode {
            head: None,
            enclosing: Some(self.current),
            kind: ScopeKind::Function,
            next_local_offset: LOCAL_BASE,
            next_param_offset: PARAM_BASE,
        });
        self.current = id;
        id
    }

    /// Returns to the enclosing scope. Symbols added to the popped scope
    /// stop resolving; its final offset counters are discarded unless the
    /// caller explicitly folds them back with [`Self::set_local_offset`].
    pub fn pop_scope(&mut self) {
        if let Some(enclosing) = self.scopes[self.current].enclosing {
            self.current = enclosing;
        }
    }

    pub fn current_local_offset(&self) -> i64 {
        self.scopes[self.current].next_local_offset
    }

    pub fn current_param_offset(&self) -> i64 {
        self.scopes[self.current].next_param_offset
    }

    /// Overwrites the current scope's local-offset counter; used by the
    /// branch-max stack computation to fold the winning branch's peak back
    /// into the enclosing scope once all sibling branches are visited.
    pub fn set_local_offset(&mut self, offset: i64) {
        self.scopes[self.current].next_local_offset = offset;
    }

    pub fn scope_kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope].kind
    }

    /// Adds a GLOBAL or LOCAL symbol to the current scope, consuming and
    /// advancing `next_local_offset`. Globals get offset `0` (they live in
    /// `.data`, not on the stack).
    pub fn add_local(&mut self, name: Symbol, ty: Type, kind: SymbolKind) -> SymbolId {
        debug_assert!(kind != SymbolKind::Param);
        let offset = if kind == SymbolKind::Global { 0 } else { self.scopes[self.current].next_local_offset };
        if kind != SymbolKind::Global {
            self.scopes[self.current].next_local_offset += OFFSET_STEP;
        }
        self.insert(name, ty, kind, offset)
    }

    /// Adds a PARAM symbol to the current scope, consuming and advancing
    /// `next_param_offset`.
    pub fn add_param(&mut self, name: Symbol, ty: Type) -> SymbolId {
        let offset = self.scopes[self.current].next_param_offset;
        self.scopes[self.current].next_param_offset += OFFSET_STEP;
        self.insert(name, ty, SymbolKind::Param, offset)
    }

    fn insert(&mut self, name: Symbol, ty: Type, kind: SymbolKind, offset: i64) -> SymbolId {
        let head = self.scopes[self.current].head;
        let id = self.symbols.push(SymbolNode { name, ty, kind, offset, next: head });
        self.scopes[self.current].head = Some(id);
        id
    }

    /// Looks up `name` starting at the current scope and walking outward.
    pub fn lookup(&self, name: Symbol) -> Option<&SymbolNode> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let mut cursor = self.scopes[id].head;
            while let Some(sym_id) = cursor {
                let node = &self.symbols[sym_id];
                if node.name == name {
                    return Some(node);
                }
                cursor = node.next;
            }
            scope = self.scopes[id].enclosing;
        }
        None
    }

    /// Looks up `name` in the current scope only, for duplicate-declaration
    /// detection.
    pub fn lookup_current(&self, name: Symbol) -> Option<&SymbolNode> {
        let mut cursor = self.scopes[self.current].head;
        while let Some(sym_id) = cursor {
            let node = &self.symbols[sym_id];
            if node.name == name {
                return Some(node);
            }
            cursor = node.next;
        }
        None
    }

    /// Every LOCAL symbol declared directly in the current scope, oldest
    /// first, for code generation's scope-exit free pass.
    pub fn locals_in_current_scope(&self) -> Vec<(Symbol, Type, i64)> {
        let mut out = Vec::new();
        let mut cursor = self.scopes[self.current].head;
        while let Some(sym_id) = cursor {
            let node = &self.symbols[sym_id];
            if node.kind == SymbolKind::Local {
                out.push((node.name, node.ty.clone(), node.offset));
            }
            cursor = node.next;
        }
        out.reverse();
        out
    }

    /// Every LOCAL symbol in every currently open BLOCK scope, innermost
    /// first, stopping before the enclosing function scope. A `return`
    /// nested inside one or more blocks jumps straight past those blocks'
    /// own scope-exit free code, so code generation uses this to free them
    /// at the `return` site itself; the function scope's own locals are
    /// deliberately excluded here since the function-return epilogue frees
    /// those once, unconditionally, regardless of which path reached it.
    pub fn locals_in_enclosing_block_scopes(&self) -> Vec<(Symbol, Type, i64)> {
        let mut out = Vec::new();
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            if self.scopes[id].kind == ScopeKind::Function {
                break;
            }
            let mut scope_locals = Vec::new();
            let mut cursor = self.scopes[id].head;
            while let Some(sym_id) = cursor {
                let node = &self.symbols[sym_id];
                if node.kind == SymbolKind::Local {
                    scope_locals.push((node.name, node.ty.clone(), node.offset));
                }
                cursor = node.next;
            }
            scope_locals.reverse();
            out.extend(scope_locals);
            scope = self.scopes[id].enclosing;
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
