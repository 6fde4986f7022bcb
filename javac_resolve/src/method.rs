//! Method (overload) resolution (§4.5): collects every member named `name` reachable from
//! `owner`'s hierarchy, narrows to the applicable ones, and picks the most specific.

use crate::conversion::{is_assignable, Phase};
use crate::error::{Error, Result};
use javac_ast::Type;
use javac_classpath::{Classpath, MethodInfo};
use std::collections::HashSet;

pub fn resolve_method(
    classpath: &Classpath,
    owner: &str,
    name: &str,
    argument_types: &[Type],
) -> Result<MethodInfo> {
    let candidates = collect_candidates(classpath, owner, name)?;

    // Non-varargs candidates are preferred outright; varargs ones are only considered if none of
    // the fixed-arity candidates apply in either phase.
    let (fixed, varargs): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|m| !m.is_varargs);

    for phase in [Phase::Strict, Phase::LooseInvocation] {
        let applicable: Vec<_> = fixed
            .iter()
            .filter(|m| is_applicable_fixed(m, argument_types, phase))
            .collect();
        if let Some(method) = most_specific(owner, name, &applicable)? {
            return Ok(method.clone());
        }
    }

    let applicable: Vec<_> = varargs
        .iter()
        .filter(|m| is_applicable_varargs(m, argument_types))
        .collect();
    if let Some(method) = most_specific(owner, name, &applicable)? {
        return Ok(method.clone());
    }

    Err(Error::NoApplicableMethod {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

fn collect_candidates(classpath: &Classpath, owner: &str, name: &str) -> Result<Vec<MethodInfo>> {
    let mut frontier = vec![owner.to_string()];
    let mut visited = HashSet::new();
    let mut candidates = Vec::new();

    while let Some(current) = frontier.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let Some(info) = classpath.find(&current)? else {
            continue;
        };
        candidates.extend(info.methods_named(name).cloned());
        frontier.extend(info.interfaces.iter().cloned());
        if let Some(super_name) = info.super_name {
            frontier.push(super_name);
        }
    }

    Ok(candidates)
}

fn is_applicable_fixed(method: &MethodInfo, arguments: &[Type], phase: Phase) -> bool {
    if method.params.len() != arguments.len() {
        return false;
    }
    method
        .params
        .iter()
        .zip(arguments)
        .all(|(param, arg)| is_assignable(arg, param, phase))
}

/// A varargs method `(T..., V)` is applicable if the leading fixed parameters match normally and
/// every trailing argument is assignable to the array's element type.
fn is_applicable_varargs(method: &MethodInfo, arguments: &[Type]) -> bool {
    let Some((last, fixed)) = method.params.split_last() else {
        return arguments.is_empty();
    };
    let Type::Array(element, 1) = last else {
        return false;
    };
    if arguments.len() < fixed.len() {
        return false;
    }
    let (fixed_args, trailing) = arguments.split_at(fixed.len());
    let fixed_ok = fixed
        .iter()
        .zip(fixed_args)
        .all(|(param, arg)| is_assignable(arg, param, Phase::LooseInvocation));
    fixed_ok
        && trailing
            .iter()
            .all(|arg| is_assignable(arg, element, Phase::LooseInvocation))
}

/// `true` if every parameter of `a` is assignable from the corresponding parameter of `b`,
/// i.e. `a` is at least as specific as `b` (JLS 15.12.2.5, simplified to our closed type model).
fn at_least_as_specific(a: &MethodInfo, b: &MethodInfo) -> bool {
    a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(pa, pb)| is_assignable(pb, pa, Phase::LooseInvocation))
}

fn most_specific<'a>(owner: &str, name: &str, candidates: &[&'a MethodInfo]) -> Result<Option<&'a MethodInfo>> {
    let Some(mut most) = candidates.first().copied() else {
        return Ok(None);
    };
    for &candidate in &candidates[1..] {
        if at_least_as_specific(candidate, most) && !at_least_as_specific(most, candidate) {
            most = candidate;
        }
    }
    let ambiguous = candidates
        .iter()
        .any(|&m| !std::ptr::eq(m, most) && !at_least_as_specific(most, m));
    if ambiguous {
        return Err(Error::AmbiguousMethod {
            owner: owner.to_string(),
            name: name.to_string(),
        });
    }
    Ok(Some(most))
}
