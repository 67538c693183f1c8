use crate::ast::NodeId;
use ahash::AHashMap;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;

pub type Identifier = String;

#[derive(Clone, Debug)]
pub struct Symbol {
    // The pattern node that first declared this name.
    pub declarator: NodeId,
    pub is_param: bool,
    pub is_function: bool,
}

impl Symbol {
    pub fn new(declarator: NodeId) -> Symbol {
        Symbol {
            declarator,
            is_param: false,
            is_function: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeType {
    Global,
    // A function body, including its parameters.
    Closure,
    // Holds only the caught exception name; `var` inside a catch block still
    // binds in the enclosing closure.
    Catch,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn id(&self) -> usize {
        self.0
    }
}

impl Debug for ScopeId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Scope #{}", self.0)
    }
}

pub struct ScopeData {
    symbols: AHashMap<Identifier, Symbol>,
    // Order of first declaration, which AHashMap does not preserve.
    declaration_order: Vec<Identifier>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    // The nearest self-or-ancestor scope that `var` and function declarations
    // bind in. A Catch scope points at its enclosing closure; every other
    // scope points at itself.
    variable_scope: ScopeId,
    typ: ScopeType,
}

impl ScopeData {
    pub fn typ(&self) -> ScopeType {
        self.typ
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn variable_scope(&self) -> ScopeId {
        self.variable_scope
    }

    /// Adds a symbol if the name is not already declared here. Redeclaring
    /// keeps the first symbol but merges the declaration kind flags.
    pub fn declare(&mut self, name: Identifier, symbol: Symbol) {
        match self.symbols.get_mut(&name) {
            Some(existing) => {
                existing.is_param |= symbol.is_param;
                existing.is_function |= symbol.is_function;
            }
            None => {
                self.declaration_order.push(name.clone());
                self.symbols.insert(name, symbol);
            }
        };
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn symbol_count(&self) -> usize {
        self.declaration_order.len()
    }

    pub fn symbol_names(&self) -> &[Identifier] {
        &self.declaration_order
    }

    /// Applies a set of renames as one step, so a new name may equal another
    /// entry's old name without clobbering it.
    pub fn apply_renames(&mut self, renames: &AHashMap<Identifier, Identifier>) {
        let mut moved = Vec::<(Identifier, Symbol)>::new();
        for (old, new) in renames {
            if let Some(symbol) = self.symbols.remove(old) {
                moved.push((new.clone(), symbol));
            };
        }
        for name in self.declaration_order.iter_mut() {
            if let Some(new) = renames.get(name) {
                *name = new.clone();
            };
        }
        for (new, symbol) in moved {
            self.symbols.insert(new, symbol);
        }
    }

    /// Rebinds a symbol under a new name, preserving declaration order.
    /// Panics if the old name is not declared here or the new one is.
    pub fn rename_symbol(&mut self, old: &str, new: Identifier) {
        match self.symbols.remove(old) {
            Some(symbol) => {
                debug_assert!(!self.symbols.contains_key(&new));
                for name in self.declaration_order.iter_mut() {
                    if name == old {
                        *name = new.clone();
                    };
                }
                self.symbols.insert(new, symbol);
            }
            None => panic!("symbol `{}` is not declared in this scope", old),
        };
    }
}

pub struct ScopeMap {
    scopes: Vec<ScopeData>,
}

impl ScopeMap {
    pub fn new() -> ScopeMap {
        ScopeMap { scopes: Vec::new() }
    }

    pub fn create_global_scope(&mut self) -> ScopeId {
        self.create_scope(None, ScopeType::Global)
    }

    pub fn create_scope(&mut self, parent: Option<ScopeId>, typ: ScopeType) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let variable_scope = match typ {
            ScopeType::Catch => match parent {
                Some(p) => self.scopes[p.0].variable_scope,
                None => id,
            },
            _ => id,
        };
        self.scopes.push(ScopeData {
            symbols: AHashMap::new(),
            declaration_order: Vec::new(),
            parent,
            children: Vec::new(),
            variable_scope,
            typ,
        });
        if let Some(p) = parent {
            self.scopes[p.0].children.push(id);
        };
        id
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Walks the scope chain from `scope` outwards, returning the scope that
    /// declares `name`, or None for an undeclared (global object) reference.
    pub fn resolve_symbol(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut cur = Some(scope);
        while let Some(s) = cur {
            if self.scopes[s.0].has_symbol(name) {
                return Some(s);
            };
            cur = self.scopes[s.0].parent;
        }
        None
    }
}

impl Index<ScopeId> for ScopeMap {
    type Output = ScopeData;

    fn index(&self, s: ScopeId) -> &Self::Output {
        &self.scopes[s.0]
    }
}

impl IndexMut<ScopeId> for ScopeMap {
    fn index_mut(&mut self, s: ScopeId) -> &mut Self::Output {
        &mut self.scopes[s.0]
    }
}
