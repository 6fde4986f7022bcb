//! Assignment compatibility used by overload resolution (§4.5): widening primitive conversion,
//! boxing/unboxing, and reference widening to `Object`.

use javac_ast::{Primitive, Type};

/// Primitive widening conversions legal without a cast, per JLS 5.1.2.
fn widens_to(from: Primitive, to: Primitive) -> bool {
    use Primitive::{Byte, Char, Double, Float, Int, Long, Short};
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (Byte, Short | Int | Long | Float | Double)
            | (Short, Int | Long | Float | Double)
            | (Char, Int | Long | Float | Double)
            | (Int, Long | Float | Double)
            | (Long, Float | Double)
            | (Float, Double)
    )
}

/// `true` if a value of type `from` can be passed where `to` is expected.
///
/// `phase` controls how permissive the check is, matching the three-phase overload resolution
/// algorithm (JLS 15.12.2): phase 1 allows only strict invocation (widening, no boxing), phase 2
/// additionally allows boxing/unboxing, phase 3 (not modeled here, see `is_applicable_varargs`)
/// additionally allows variable arity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Strict,
    LooseInvocation,
}

#[must_use]
pub fn is_assignable(from: &Type, to: &Type, phase: Phase) -> bool {
    match (from, to) {
        (Type::Primitive(f), Type::Primitive(t)) => widens_to(*f, *t),
        (Type::Reference(f), Type::Reference(t)) => f == t || t == "java/lang/Object",
        (Type::Array(_, _), Type::Reference(t)) => t == "java/lang/Object",
        (Type::Array(fe, fd), Type::Array(te, td)) => fd == td && is_assignable(fe, te, phase),
        (Type::Primitive(p), Type::Reference(boxed)) if phase == Phase::LooseInvocation => {
            boxed == Type::boxed_name(*p)
        }
        (Type::Reference(boxed), Type::Primitive(p)) if phase == Phase::LooseInvocation => {
            boxed == Type::boxed_name(*p)
        }
        _ => false,
    }
}
