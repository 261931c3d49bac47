//! Binary Name Resolution
//!
//! Computes canonical names for declarations. The binary name separates the
//! namespace from the outermost declaration with `.` and nested declarations
//! from their enclosing declaration with `$`, so `C` nested in `B` nested in `A`
//! in namespace `p` is `p.A$B$C`. This is the name registry entries use, because
//! it identifies a nested type unambiguously at runtime.
//!
//! The qualified name uses `.` throughout (`p.A.B.C`) and is only used in
//! human-readable messages.

use std::collections::HashSet;

use ir::{DeclId, EnclosingScope, SymbolError, SymbolModel, SymbolResult};

/// Separator between a namespace and its top-level declaration
pub const NAMESPACE_SEPARATOR: char = '.';
/// Separator between an enclosing declaration and a nested one
pub const NESTING_SEPARATOR: char = '$';

/// Canonical binary name of `id`, e.g. `p.A$B$C`.
pub fn binary_name<M: SymbolModel + ?Sized>(model: &M, id: &DeclId) -> SymbolResult<String> {
    resolve_name(model, id, NESTING_SEPARATOR)
}

/// Source-level qualified name of `id`, e.g. `p.A.B.C`.
pub fn qualified_name<M: SymbolModel + ?Sized>(model: &M, id: &DeclId) -> SymbolResult<String> {
    resolve_name(model, id, NAMESPACE_SEPARATOR)
}

fn resolve_name<M: SymbolModel + ?Sized>(
    model: &M,
    id: &DeclId,
    nesting_separator: char,
) -> SymbolResult<String> {
    let mut current = model.declaration(id)?;
    let mut name = current.simple_name.clone();
    let mut visited = HashSet::from([&current.id]);

    loop {
        match &current.enclosing {
            EnclosingScope::Namespace(namespace) if namespace.is_empty() => return Ok(name),
            EnclosingScope::Namespace(namespace) =>
                return Ok(format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, name)),
            EnclosingScope::Declaration(outer) => {
                let outer = model.declaration(outer)?;
                if !visited.insert(&outer.id) {
                    return Err(SymbolError::NestingCycle(id.clone()));
                }
                name = format!("{}{}{}", outer.simple_name, nesting_separator, name);
                current = outer;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ir::{DeclKind, Declaration, SymbolTable};

    use super::*;

    fn decl(id: &str, name: &str, enclosing: EnclosingScope) -> Declaration {
        Declaration {
            id: DeclId::new(id),
            simple_name: name.to_string(),
            kind: DeclKind::Class,
            enclosing,
            supertypes: vec![],
            marker: None,
        }
    }

    fn ns(name: &str) -> EnclosingScope { EnclosingScope::Namespace(name.to_string()) }

    fn inside(id: &str) -> EnclosingScope { EnclosingScope::Declaration(DeclId::new(id)) }

    fn nested_table() -> SymbolTable {
        SymbolTable::new(vec![
            decl("p.A", "A", ns("p")),
            decl("p.A.B", "B", inside("p.A")),
            decl("p.A.B.C", "C", inside("p.A.B")),
            decl("Top", "Top", ns("")),
            decl("Top.Inner", "Inner", inside("Top")),
            decl("a.b.c.D", "D", ns("a.b.c")),
        ])
    }

    #[test]
    fn test_binary_name_of_nested_declarations() {
        let table = nested_table();
        assert_eq!(binary_name(&table, &DeclId::new("p.A")).expect("A"), "p.A");
        assert_eq!(binary_name(&table, &DeclId::new("p.A.B")).expect("B"), "p.A$B");
        assert_eq!(binary_name(&table, &DeclId::new("p.A.B.C")).expect("C"), "p.A$B$C");
    }

    #[test]
    fn test_binary_name_in_unnamed_namespace() {
        let table = nested_table();
        assert_eq!(binary_name(&table, &DeclId::new("Top")).expect("Top"), "Top");
        assert_eq!(binary_name(&table, &DeclId::new("Top.Inner")).expect("Inner"), "Top$Inner");
    }

    #[test]
    fn test_binary_name_keeps_dotted_namespace() {
        let table = nested_table();
        assert_eq!(binary_name(&table, &DeclId::new("a.b.c.D")).expect("D"), "a.b.c.D");
    }

    #[test]
    fn test_qualified_name_uses_dots() {
        let table = nested_table();
        assert_eq!(qualified_name(&table, &DeclId::new("p.A.B.C")).expect("C"), "p.A.B.C");
        assert_eq!(qualified_name(&table, &DeclId::new("Top.Inner")).expect("Inner"), "Top.Inner");
    }

    #[test]
    fn test_unknown_declarations_are_errors() {
        let table = SymbolTable::new(vec![decl("p.X.Y", "Y", inside("p.X"))]);
        assert_eq!(
            binary_name(&table, &DeclId::new("missing")),
            Err(SymbolError::UnknownDeclaration(DeclId::new("missing")))
        );
        assert_eq!(
            binary_name(&table, &DeclId::new("p.X.Y")),
            Err(SymbolError::UnknownDeclaration(DeclId::new("p.X")))
        );
    }

    #[test]
    fn test_nesting_cycle_is_detected() {
        let table =
            SymbolTable::new(vec![decl("p.A", "A", inside("p.B")), decl("p.B", "B", inside("p.A"))]);
        assert_eq!(
            binary_name(&table, &DeclId::new("p.A")),
            Err(SymbolError::NestingCycle(DeclId::new("p.A")))
        );
    }
}
