//! Phase 1 of two-phase compilation (§9): registers every class's *signature* — its hierarchy and
//! member shapes, with no method bodies — into the [`Classpath`] before any method body is
//! compiled. This is what lets one compilation unit's body reference a class declared in another
//! unit (or later in the same unit) regardless of file or declaration order.
//!
//! Mirrors `javac_codegen::class_builder`'s own signature-shape decisions (constructor defaulting,
//! enum constant fields, the enum constructor's implicit `(String, int)` prefix, `values()`/
//! `valueOf()`) without compiling any bytecode, so the two phases can never disagree about what a
//! class looks like from the outside.

use javac_ast::{ClassDecl, ClassKind, FieldDecl, MethodDecl, Primitive, Type};
use javac_classpath::{ClassInfo, Classpath, FieldInfo, MethodInfo};

/// Computes `class`'s internal (binary) name given its enclosing chain, the same rule
/// `class_builder::compile_class` uses.
#[must_use]
pub(crate) fn internal_name(package: Option<&str>, enclosing: &[String], class_name: &str) -> String {
    match enclosing.last() {
        Some(outer) => format!("{outer}${class_name}"),
        None => match package {
            Some(pkg) if !pkg.is_empty() => format!("{}/{class_name}", pkg.replace('.', "/")),
            _ => class_name.to_string(),
        },
    }
}

/// Registers `class` and, recursively, every static nested class it declares.
pub(crate) fn register_class(classpath: &mut Classpath, package: Option<&str>, enclosing: &[String], class: &ClassDecl) {
    let name = internal_name(package, enclosing, &class.name);
    let info = build_class_info(&name, class);
    classpath.register_in_process(info);

    if !class.nested.is_empty() {
        let mut child_enclosing = enclosing.to_vec();
        child_enclosing.push(name);
        for nested in &class.nested {
            register_class(classpath, package, &child_enclosing, nested);
        }
    }
}

fn build_class_info(internal_name: &str, class: &ClassDecl) -> ClassInfo {
    let is_enum = matches!(class.kind, ClassKind::Enum);
    let is_interface = matches!(class.kind, ClassKind::Interface);

    let super_name = if is_enum {
        Some("java/lang/Enum".to_string())
    } else {
        match &class.superclass {
            Some(Type::Reference(name)) => Some(name.clone()),
            _ => Some("java/lang/Object".to_string()),
        }
    };

    let interfaces = class
        .interfaces
        .iter()
        .filter_map(|ty| match ty {
            Type::Reference(name) => Some(name.clone()),
            _ => None,
        })
        .collect();

    let mut fields: Vec<FieldInfo> = Vec::new();
    if is_enum {
        let constant_ty = Type::reference(internal_name.to_string());
        for constant in &class.enum_constants {
            fields.push(FieldInfo {
                name: constant.name.clone(),
                ty: constant_ty.clone(),
                is_static: true,
                is_final: true,
            });
        }
        fields.push(FieldInfo {
            name: "$VALUES".to_string(),
            ty: Type::array(constant_ty, 1),
            is_static: true,
            is_final: true,
        });
    }
    fields.extend(class.fields.iter().map(field_info));

    let mut methods: Vec<MethodInfo> = class.methods.iter().map(|method| method_info(method, is_enum)).collect();
    if !is_interface && !class.methods.iter().any(MethodDecl::is_constructor) {
        methods.push(default_constructor_info(is_enum));
    }
    if is_enum {
        methods.push(MethodInfo {
            name: "values".to_string(),
            params: Vec::new(),
            return_type: Type::array(Type::reference(internal_name.to_string()), 1),
            is_static: true,
            is_varargs: false,
            is_abstract: false,
        });
        methods.push(MethodInfo {
            name: "valueOf".to_string(),
            params: vec![Type::string()],
            return_type: Type::reference(internal_name.to_string()),
            is_static: true,
            is_varargs: false,
            is_abstract: false,
        });
    }

    ClassInfo {
        internal_name: internal_name.to_string(),
        super_name,
        interfaces,
        is_interface,
        fields,
        methods,
    }
}

fn field_info(field: &FieldDecl) -> FieldInfo {
    FieldInfo {
        name: field.name.clone(),
        ty: field.ty.clone(),
        is_static: field.modifiers.is_static,
        is_final: field.modifiers.is_final,
    }
}

/// An enum constructor's signature gets an implicit `(String, int)` prefix ahead of its declared
/// parameters; `class_builder::compile_method` relies on this being reflected here so that
/// `new EnumType(name, ordinal, ...)` resolves against the right overload during phase 2.
fn method_info(method: &MethodDecl, is_enum: bool) -> MethodInfo {
    let mut params = Vec::new();
    if method.is_constructor() && is_enum {
        params.push(Type::string());
        params.push(Type::Primitive(Primitive::Int));
    }
    params.extend(method.params.iter().map(|p| p.ty.clone()));

    MethodInfo {
        name: method.name.clone(),
        params,
        return_type: method.return_type.clone(),
        is_static: method.modifiers.is_static,
        is_varargs: method.is_varargs,
        is_abstract: method.modifiers.is_abstract || method.body.is_none(),
    }
}

fn default_constructor_info(is_enum: bool) -> MethodInfo {
    MethodInfo {
        name: "<init>".to_string(),
        params: if is_enum { vec![Type::string(), Type::Primitive(Primitive::Int)] } else { Vec::new() },
        return_type: Type::Void,
        is_static: false,
        is_varargs: false,
        is_abstract: false,
    }
}
