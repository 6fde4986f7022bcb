//! Deterministic multi-file ordering (§5): a topological sort of compilation units by
//! source-level class-hierarchy references — which unit declares a class another unit `extends`
//! or `implements` — falling back to file-list order when a cycle is found.
//!
//! Two-phase compilation (see [`crate::signature`]) makes this an ordering nicety rather than a
//! correctness requirement: every class's signature is registered before any unit's method bodies
//! are compiled, regardless of order. A deterministic order still keeps diagnostics and the
//! output listing reproducible across runs of the same input.

use javac_ast::{ClassDecl, CompilationUnit, Type};
use std::collections::HashMap;

/// Returns unit indices in dependency order: if unit A declares a superclass/interface that unit
/// B declares, B's index precedes A's. Falls back to input order wherever a cycle makes that
/// impossible, and preserves input order between unrelated units.
pub(crate) fn topological_order(units: &[CompilationUnit]) -> Vec<usize> {
    let declared = declared_classes(units);
    let edges: Vec<Vec<usize>> = units
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let mut deps = Vec::new();
            for class in &unit.types {
                collect_deps(class, index, &declared, &mut deps);
            }
            deps
        })
        .collect();

    let mut visited = vec![false; units.len()];
    let mut on_stack = vec![false; units.len()];
    let mut order = Vec::with_capacity(units.len());
    for start in 0..units.len() {
        visit(start, &edges, &mut visited, &mut on_stack, &mut order);
    }
    order
}

fn visit(node: usize, edges: &[Vec<usize>], visited: &mut [bool], on_stack: &mut [bool], order: &mut Vec<usize>) {
    if visited[node] || on_stack[node] {
        return;
    }
    on_stack[node] = true;
    for &dep in &edges[node] {
        visit(dep, edges, visited, on_stack, order);
    }
    on_stack[node] = false;
    visited[node] = true;
    order.push(node);
}

fn declared_classes(units: &[CompilationUnit]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (index, unit) in units.iter().enumerate() {
        for class in &unit.types {
            collect_names(unit.package.as_deref(), &[], class, index, &mut map);
        }
    }
    map
}

fn collect_names(package: Option<&str>, enclosing: &[String], class: &ClassDecl, unit_index: usize, map: &mut HashMap<String, usize>) {
    let name = crate::signature::internal_name(package, enclosing, &class.name);
    map.insert(name.clone(), unit_index);
    if !class.nested.is_empty() {
        let mut child_enclosing = enclosing.to_vec();
        child_enclosing.push(name);
        for nested in &class.nested {
            collect_names(package, &child_enclosing, nested, unit_index, map);
        }
    }
}

fn collect_deps(class: &ClassDecl, unit_index: usize, declared: &HashMap<String, usize>, deps: &mut Vec<usize>) {
    if let Some(Type::Reference(name)) = &class.superclass {
        add_dep(name, unit_index, declared, deps);
    }
    for interface in &class.interfaces {
        if let Type::Reference(name) = interface {
            add_dep(name, unit_index, declared, deps);
        }
    }
    for nested in &class.nested {
        collect_deps(nested, unit_index, declared, deps);
    }
}

fn add_dep(name: &str, unit_index: usize, declared: &HashMap<String, usize>, deps: &mut Vec<usize>) {
    if let Some(&owner) = declared.get(name) {
        if owner != unit_index && !deps.contains(&owner) {
            deps.push(owner);
        }
    }
}
