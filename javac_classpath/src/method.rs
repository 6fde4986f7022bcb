//! A method description as seen by the resolver: name, erased parameter/return types, and the
//! `static`/`varargs` bits that drive invocation-opcode selection and overload applicability.

use crate::descriptor::parse_method_descriptor;
use javac_ast::Type;
use javac_classfile::ClassFile;

#[derive(Clone, Debug, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

impl MethodInfo {
    pub(crate) fn from_class_file(class_file: &ClassFile) -> crate::Result<Vec<MethodInfo>> {
        let pool = &class_file.constant_pool;
        let mut methods = Vec::with_capacity(class_file.methods.len());
        for method in &class_file.methods {
            let name = pool.try_get_utf8(method.name_index)?.to_string();
            let descriptor = pool.try_get_utf8(method.descriptor_index)?.to_string();
            let (params, return_type) = parse_method_descriptor(&descriptor)?;
            methods.push(MethodInfo {
                name,
                params,
                return_type,
                is_static: method.access_flags.contains(javac_classfile::MethodAccessFlags::STATIC),
                is_varargs: method.access_flags.contains(javac_classfile::MethodAccessFlags::VARARGS),
                is_abstract: method.access_flags.contains(javac_classfile::MethodAccessFlags::ABSTRACT),
            });
        }
        Ok(methods)
    }
}
