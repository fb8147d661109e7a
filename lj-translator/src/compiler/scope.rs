use std::collections::{HashMap, HashSet};

use super::reserved;

/// Names seen and renamed within one lexical block.
#[derive(Debug, Clone)]
pub struct VarsScope {
    read_vars: HashSet<String>,
    shadowed_vars: HashMap<String, String>,
    declared: HashSet<String>,
    renames_all: bool,
}

/// Where a name resolves after walking the scope stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Renamed(String),
    Local,
    Global,
}

impl VarsScope {
    /// Reserved words start out as "read" so a `local` with one of those
    /// names always gets a fresh temp name.
    pub fn new() -> Self {
        Self {
            read_vars: reserved::reserved_words().map(str::to_string).collect(),
            shadowed_vars: HashMap::new(),
            declared: HashSet::new(),
            renames_all: false,
        }
    }

    /// Branch scopes of an `if` share one wrapper function, so every local
    /// declared in them gets a temp name.
    pub fn set_renames_all(&mut self, renames_all: bool) {
        self.renames_all = renames_all;
    }

    pub fn renames_all(&self) -> bool {
        self.renames_all
    }

    pub fn has_read(&self, name: &str) -> bool {
        self.read_vars.contains(name)
    }

    pub fn record_read(&mut self, name: &str) {
        if !self.read_vars.contains(name) {
            self.read_vars.insert(name.to_string());
        }
    }

    pub fn shadow(&mut self, name: &str, replacement: String) {
        self.declared.remove(name);
        self.shadowed_vars.insert(name.to_string(), replacement);
    }

    pub fn declare(&mut self, name: &str) {
        self.shadowed_vars.remove(name);
        self.declared.insert(name.to_string());
    }

    pub fn shadowed(&self, name: &str) -> Option<&str> {
        self.shadowed_vars.get(name).map(String::as_str)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }
}

impl Default for VarsScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of lexical scopes, innermost last.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<VarsScope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![VarsScope::new()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(VarsScope::new());
    }

    pub fn pop(&mut self) {
        // the root scope lives for the whole translation
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> &VarsScope {
        self.scopes
            .last()
            .expect("scope stack always holds the root scope")
    }

    pub fn current_mut(&mut self) -> &mut VarsScope {
        self.scopes
            .last_mut()
            .expect("scope stack always holds the root scope")
    }

    /// Resolves `name` innermost-first. Unrenamed reads are recorded in every
    /// scope up to the one that declares the name (all of them for globals),
    /// since a JavaScript reference from an inner closure is hoisting-sensitive
    /// in each of those function bodies.
    pub fn resolve_read(&mut self, name: &str) -> Resolution {
        let mut found = None;
        for (depth, scope) in self.scopes.iter().enumerate().rev() {
            if let Some(renamed) = scope.shadowed(name) {
                return Resolution::Renamed(renamed.to_string());
            }
            if scope.is_declared(name) {
                found = Some(depth);
                break;
            }
        }
        let lowest = found.unwrap_or(0);
        for scope in &mut self.scopes[lowest..] {
            scope.record_read(name);
        }
        if found.is_some() {
            Resolution::Local
        } else {
            Resolution::Global
        }
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Wrapper that contains a native loop, so `break` stays native.
    Loop,
    /// `do` / `if` wrapper: `break` must be signalled to the caller.
    Plain,
}

/// Per-wrapper record of control flow that has to escape the synthesized
/// closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopScope {
    pub kind: BlockKind,
    pub returned: bool,
    pub broke: bool,
}

impl LoopScope {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            returned: false,
            broke: false,
        }
    }
}
