//! Class-name resolution (§4.5): turns a source-level name into an internal (`/`-separated)
//! binary name, trying each candidate in the order the Java Language Specification searches them.

use crate::error::{Error, Result};
use javac_ast::Import;
use javac_classpath::Classpath;

/// The lexical context a name is resolved against: the enclosing compilation unit's package and
/// imports, plus the chain of enclosing classes (innermost last) for nested-class lookup.
#[derive(Debug)]
pub struct NameScope<'a> {
    pub package: Option<&'a str>,
    pub imports: &'a [Import],
    /// Internal names of enclosing classes, outermost first.
    pub enclosing: &'a [String],
}

impl<'a> NameScope<'a> {
    #[must_use]
    pub fn new(package: Option<&'a str>, imports: &'a [Import], enclosing: &'a [String]) -> NameScope<'a> {
        NameScope {
            package,
            imports,
            enclosing,
        }
    }

    /// Resolves `name` (simple or dotted) to an internal class name.
    pub fn resolve(&self, classpath: &Classpath, name: &str) -> Result<String> {
        if let Some(found) = self.resolve_qualified(classpath, name)? {
            return Ok(found);
        }
        if let Some(found) = self.resolve_single_type_import(classpath, name)? {
            return Ok(found);
        }
        if let Some(found) = self.resolve_same_package(classpath, name)? {
            return Ok(found);
        }
        if let Some(found) = self.resolve_nested_in_enclosing(classpath, name)? {
            return Ok(found);
        }
        if let Some(found) = self.resolve_on_demand_import(classpath, name)? {
            return Ok(found);
        }
        if let Some(found) = self.resolve_implicit_java_lang(classpath, name)? {
            return Ok(found);
        }
        Err(Error::ClassNotFound(name.to_string()))
    }

    fn resolve_qualified(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        if !name.contains('.') {
            return Ok(None);
        }
        let direct = name.replace('.', "/");
        if classpath.exists(&direct)? {
            return Ok(Some(direct));
        }
        // A qualified name may address a nested class through its outer type, e.g.
        // `pkg.Outer.Inner`; try progressively folding trailing segments into `$`.
        let mut candidate = direct;
        while let Some(index) = candidate.rfind('/') {
            candidate.replace_range(index..=index, "$");
            if classpath.exists(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn resolve_single_type_import(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        for import in self.imports {
            if import.on_demand {
                continue;
            }
            if import.qualified_name.rsplit('.').next() == Some(name) {
                let internal = import.qualified_name.replace('.', "/");
                if classpath.exists(&internal)? {
                    return Ok(Some(internal));
                }
            }
        }
        Ok(None)
    }

    fn resolve_same_package(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        let Some(package) = self.package else {
            return Ok(None);
        };
        let internal = format!("{}/{name}", package.replace('.', "/"));
        if classpath.exists(&internal)? {
            return Ok(Some(internal));
        }
        Ok(None)
    }

    fn resolve_nested_in_enclosing(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        for enclosing in self.enclosing.iter().rev() {
            let internal = format!("{enclosing}${name}");
            if classpath.exists(&internal)? {
                return Ok(Some(internal));
            }
        }
        Ok(None)
    }

    fn resolve_on_demand_import(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        for import in self.imports {
            if !import.on_demand {
                continue;
            }
            let internal = format!("{}/{name}", import.qualified_name.replace('.', "/"));
            if classpath.exists(&internal)? {
                return Ok(Some(internal));
            }
        }
        Ok(None)
    }

    fn resolve_implicit_java_lang(&self, classpath: &Classpath, name: &str) -> Result<Option<String>> {
        let internal = format!("java/lang/{name}");
        if classpath.exists(&internal)? {
            return Ok(Some(internal));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javac_classpath::ClassInfo;

    fn class(name: &str) -> ClassInfo {
        ClassInfo {
            internal_name: name.to_string(),
            super_name: Some("java/lang/Object".to_string()),
            interfaces: vec![],
            is_interface: false,
            fields: vec![],
            methods: vec![],
        }
    }

    #[test]
    fn resolves_same_package_class() -> Result<()> {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(class("com/acme/Widget"));
        let scope = NameScope::new(Some("com.acme"), &[], &[]);
        assert_eq!(scope.resolve(&classpath, "Widget")?, "com/acme/Widget");
        Ok(())
    }

    #[test]
    fn resolves_single_type_import() -> Result<()> {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(class("java/util/List"));
        let imports = vec![Import {
            qualified_name: "java.util.List".to_string(),
            on_demand: false,
        }];
        let scope = NameScope::new(None, &imports, &[]);
        assert_eq!(scope.resolve(&classpath, "List")?, "java/util/List");
        Ok(())
    }

    #[test]
    fn falls_back_to_implicit_java_lang() -> Result<()> {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(class("java/lang/String"));
        let scope = NameScope::new(None, &[], &[]);
        assert_eq!(scope.resolve(&classpath, "String")?, "java/lang/String");
        Ok(())
    }

    #[test]
    fn resolves_nested_class_of_enclosing() -> Result<()> {
        let mut classpath = Classpath::empty();
        classpath.register_in_process(class("com/acme/Outer$Inner"));
        let enclosing = vec!["com/acme/Outer".to_string()];
        let scope = NameScope::new(Some("com.acme"), &[], &enclosing);
        assert_eq!(scope.resolve(&classpath, "Inner")?, "com/acme/Outer$Inner");
        Ok(())
    }

    #[test]
    fn unknown_name_is_an_error() {
        let classpath = Classpath::empty();
        let scope = NameScope::new(None, &[], &[]);
        assert!(scope.resolve(&classpath, "DoesNotExist").is_err());
    }
}
