//! JSON-backed symbol model.
//!
//! A `SymbolTable` is a flat list of declarations plus an optional description of
//! which declarations appear in which processing pass:
//!
//! ```json
//! {
//!   "declarations": [
//!     { "id": "svc.Greeter", "simple_name": "Greeter", "kind": "interface",
//!       "enclosing": { "namespace": "svc" } },
//!     { "id": "impl.EnglishGreeter", "simple_name": "EnglishGreeter",
//!       "enclosing": { "namespace": "impl" },
//!       "supertypes": ["svc.Greeter"], "marker": "svc.Greeter" }
//!   ],
//!   "rounds": [["impl.EnglishGreeter"]]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::symbol_model::{
    DeclId, Declaration, EnclosingScope, MarkerArgument, Round, SymbolError, SymbolModel,
    SymbolResult, TypeRef,
};

/// In-memory symbol model loaded from (or saved to) JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    declarations: Vec<Declaration>,
    /// Declarations introduced by each pass. `None` means a single pass containing everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rounds: Option<Vec<Vec<DeclId>>>,
    #[serde(skip)]
    index: BTreeMap<DeclId, usize>,
}

impl SymbolTable {
    /// Build a table from declarations, all introduced in a single pass.
    pub fn new(declarations: Vec<Declaration>) -> Self {
        let mut table = Self { declarations, rounds: None, index: BTreeMap::new() };
        table.reindex();
        table
    }

    /// Build a table whose declarations are spread over several passes.
    pub fn with_rounds(declarations: Vec<Declaration>, rounds: Vec<Vec<DeclId>>) -> Self {
        let mut table = Self::new(declarations);
        table.rounds = Some(rounds);
        table
    }

    /// Parse a table from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let mut table: Self = serde_json::from_str(json)?;
        table.reindex();
        Ok(table)
    }

    /// Load a table from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Save the table to a JSON file with pretty formatting
    pub fn to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }

    /// All declarations in insertion order.
    pub fn declarations(&self) -> &[Declaration] { &self.declarations }

    /// Number of processing passes the table describes (at least one).
    pub fn round_count(&self) -> usize {
        match &self.rounds {
            Some(rounds) => rounds.len().max(1),
            None => 1,
        }
    }

    /// Check the table for structural problems a host compiler would never produce.
    ///
    /// Returns one message per problem; an empty list means the table is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for decl in &self.declarations {
            if !seen.insert(&decl.id) {
                errors.push(format!("Duplicate declaration id: {}", decl.id));
            }
            if decl.simple_name.trim().is_empty() {
                errors.push(format!("Declaration `{}` has an empty simple name", decl.id));
            } else if let Some(problem) = name_problem(&decl.simple_name) {
                errors.push(format!("Declaration `{}` simple name {}", decl.id, problem));
            }
            match &decl.enclosing {
                EnclosingScope::Declaration(outer) if !self.index.contains_key(outer) => {
                    errors.push(format!(
                        "Declaration `{}` is nested in unknown declaration `{}`",
                        decl.id, outer
                    ));
                }
                EnclosingScope::Namespace(namespace) if !namespace.is_empty() => {
                    if let Some(problem) = name_problem(namespace) {
                        errors.push(format!("Declaration `{}` namespace {}", decl.id, problem));
                    }
                }
                _ => {}
            }
            for sup in &decl.supertypes {
                if !self.index.contains_key(sup) {
                    errors.push(format!("Declaration `{}` extends unknown type `{}`", decl.id, sup));
                }
            }
        }

        if let Some(rounds) = &self.rounds {
            for (i, round) in rounds.iter().enumerate() {
                for id in round {
                    if !self.index.contains_key(id) {
                        errors.push(format!("Round {} lists unknown declaration `{}`", i, id));
                    }
                }
            }
        }

        errors
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, decl) in self.declarations.iter().enumerate() {
            // First occurrence wins; duplicates are reported by `validate`.
            self.index.entry(decl.id.clone()).or_insert(i);
        }
    }

    fn lookup(&self, id: &DeclId) -> Option<&Declaration> {
        self.index.get(id).map(|&i| &self.declarations[i])
    }
}

// Names end up in registry entries and resource paths.
fn name_problem(name: &str) -> Option<String> {
    if name != name.trim() {
        return Some(format!("{:?} has surrounding whitespace", name));
    }
    if name.contains(['/', '\\']) {
        return Some(format!("{:?} contains a path separator", name));
    }
    if name.split('.').any(|segment| segment.is_empty()) {
        return Some(format!("{:?} has an empty segment", name));
    }
    None
}

impl SymbolModel for SymbolTable {
    fn marked_declarations(&self, round: &Round) -> Vec<DeclId> {
        let carries_marker = |id: &DeclId| self.lookup(id).is_some_and(|d| d.marker.is_some());

        match &self.rounds {
            Some(rounds) => rounds
                .get(round.index)
                .map(|ids| ids.iter().filter(|&id| carries_marker(id)).cloned().collect())
                .unwrap_or_default(),
            None if round.index == 0 => self
                .declarations
                .iter()
                .filter(|d| d.marker.is_some())
                .map(|d| d.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn marker_argument(&self, decl: &DeclId) -> SymbolResult<&MarkerArgument> {
        self.declaration(decl)?.marker.as_ref().ok_or_else(|| SymbolError::NotMarked(decl.clone()))
    }

    fn resolve(&self, type_ref: &TypeRef) -> SymbolResult<&Declaration> {
        self.lookup(type_ref.target())
            .ok_or_else(|| SymbolError::UnresolvedType(type_ref.target().clone()))
    }

    fn declaration(&self, id: &DeclId) -> SymbolResult<&Declaration> {
        self.lookup(id).ok_or_else(|| SymbolError::UnknownDeclaration(id.clone()))
    }

    fn is_subtype(&self, sub: &DeclId, sup: &DeclId) -> SymbolResult<bool> {
        self.declaration(sub)?;
        self.declaration(sup)?;

        let mut visited = HashSet::new();
        let mut stack = vec![sub];
        while let Some(current) = stack.pop() {
            if current == sup {
                return Ok(true);
            }
            if !visited.insert(current) {
                continue;
            }
            // Dangling supertypes are ignored here and reported by `validate`.
            if let Some(decl) = self.lookup(current) {
                stack.extend(decl.supertypes.iter());
            }
        }
        Ok(false)
    }
}
