//! The CLI's `compile`/`parse` driver surface consumes a JSON-serialized AST (the parser itself
//! is out of scope; see the crate's module docs), so the tree must round-trip through `serde_json`.

use javac_ast::ast::{ClassDecl, ClassKind, CompilationUnit, FieldDecl, Modifiers};
use javac_ast::{Span, Type};

fn sample_unit() -> CompilationUnit {
    CompilationUnit {
        package: Some("com.example".to_string()),
        imports: vec![],
        types: vec![ClassDecl {
            kind: ClassKind::Class,
            modifiers: Modifiers::public(),
            name: "Point".to_string(),
            superclass: Some(Type::object()),
            interfaces: vec![],
            fields: vec![FieldDecl {
                modifiers: Modifiers::default(),
                name: "x".to_string(),
                ty: Type::Primitive(javac_ast::Primitive::Int),
                initializer: None,
                span: Span::synthetic(),
            }],
            methods: vec![],
            enum_constants: vec![],
            nested: vec![],
            span: Span::synthetic(),
        }],
    }
}

#[test]
fn compilation_unit_round_trips_through_json() {
    let unit = sample_unit();
    let json = serde_json::to_string(&unit).expect("serialize");
    let restored: CompilationUnit = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored.package.as_deref(), Some("com.example"));
    assert_eq!(restored.types.len(), 1);
    assert_eq!(restored.types[0].name, "Point");
    assert_eq!(restored.types[0].fields[0].ty, Type::Primitive(javac_ast::Primitive::Int));
}
