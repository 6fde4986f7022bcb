//! `ClassInfo`: the resolved description of one class, answering exactly the questions §4.4 of
//! the governing specification asks of the classpath — does this class exist, what is its
//! superclass/interfaces, what fields/methods does it declare, is it an interface.

use crate::field::FieldInfo;
use crate::method::MethodInfo;
use javac_classfile::ClassFile;

#[derive(Clone, Debug, PartialEq)]
pub struct ClassInfo {
    pub internal_name: String,
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub is_interface: bool,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub(crate) fn from_class_file(class_file: &ClassFile) -> crate::Result<ClassInfo> {
        let pool = &class_file.constant_pool;
        let internal_name = class_file.class_name()?.to_string();

        let super_name = if class_file.super_class == 0 {
            None
        } else {
            let javac_classfile::Constant::Class(name_index) = pool.try_get(class_file.super_class)? else {
                return Err(javac_classfile::Error::InvalidConstantPoolIndexType(class_file.super_class).into());
            };
            Some(pool.try_get_utf8(*name_index)?.to_string())
        };

        let mut interfaces = Vec::with_capacity(class_file.interfaces.len());
        for index in &class_file.interfaces {
            let javac_classfile::Constant::Class(name_index) = pool.try_get(*index)? else {
                return Err(javac_classfile::Error::InvalidConstantPoolIndexType(*index).into());
            };
            interfaces.push(pool.try_get_utf8(*name_index)?.to_string());
        }

        Ok(ClassInfo {
            internal_name,
            super_name,
            interfaces,
            is_interface: class_file
                .access_flags
                .contains(javac_classfile::ClassAccessFlags::INTERFACE),
            fields: FieldInfo::from_class_file(class_file)?,
            methods: MethodInfo::from_class_file(class_file)?,
        })
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> {
        self.methods.iter().filter(move |method| method.name == name)
    }
}
