//! Field resolution: walks a class's superclass and interface hierarchy looking for the first
//! declaration of a given name (§4.5).

use crate::error::{Error, Result};
use javac_classpath::{Classpath, FieldInfo};

/// Resolves `field_name` starting at `owner` (an internal class name), walking superclasses then
/// superinterfaces breadth-first. Returns the class that declares the field alongside its
/// description.
pub fn resolve_field(classpath: &Classpath, owner: &str, field_name: &str) -> Result<(String, FieldInfo)> {
    let mut frontier = vec![owner.to_string()];
    let mut visited = std::collections::HashSet::new();

    while let Some(current) = frontier.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let Some(info) = classpath.find(&current)? else {
            continue;
        };
        if let Some(field) = info.field(field_name) {
            return Ok((current, field.clone()));
        }
        frontier.extend(info.interfaces.iter().cloned());
        if let Some(super_name) = info.super_name {
            frontier.push(super_name);
        }
    }

    Err(Error::FieldNotFound {
        owner: owner.to_string(),
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use javac_ast::{Primitive, Type};
    use javac_classpath::ClassInfo;

    #[test]
    fn finds_field_declared_on_superclass() -> Result<()> {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(ClassInfo {
            internal_name: "Base".to_string(),
            super_name: None,
            interfaces: vec![],
            is_interface: false,
            fields: vec![FieldInfo {
                name: "count".to_string(),
                ty: Type::Primitive(Primitive::Int),
                is_static: false,
                is_final: false,
            }],
            methods: vec![],
        });
        classpath.register_in_process(ClassInfo {
            internal_name: "Derived".to_string(),
            super_name: Some("Base".to_string()),
            interfaces: vec![],
            is_interface: false,
            fields: vec![],
            methods: vec![],
        });

        let (owner, field) = resolve_field(&classpath, "Derived", "count")?;
        assert_eq!(owner, "Base");
        assert_eq!(field.ty, Type::Primitive(Primitive::Int));
        Ok(())
    }

    #[test]
    fn missing_field_is_an_error() {
        let classpath = Classpath::empty();
        assert!(resolve_field(&classpath, "Anything", "missing").is_err());
    }
}
