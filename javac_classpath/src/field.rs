//! A field description as seen by the resolver: enough to answer "what type is this field" and
//! "is it static", regardless of whether it came from a binary class file or an in-process one.

use crate::descriptor::field_type_to_ast;
use javac_ast::Type;
use javac_classfile::ClassFile;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
    pub is_final: bool,
}

impl FieldInfo {
    pub(crate) fn from_class_file(class_file: &ClassFile) -> javac_classfile::Result<Vec<FieldInfo>> {
        let pool = &class_file.constant_pool;
        let mut fields = Vec::with_capacity(class_file.fields.len());
        for field in &class_file.fields {
            let name = pool.try_get_utf8(field.name_index)?.to_string();
            fields.push(FieldInfo {
                name,
                ty: field_type_to_ast(&field.field_type),
                is_static: field.access_flags.contains(javac_classfile::FieldAccessFlags::STATIC),
                is_final: field.access_flags.contains(javac_classfile::FieldAccessFlags::FINAL),
            });
        }
        Ok(fields)
    }
}
