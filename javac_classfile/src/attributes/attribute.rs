use crate::Error::InvalidInstructionOffset;
use crate::attributes::bootstrap_method::BootstrapMethod;
use crate::attributes::inner_class::InnerClass;
use crate::attributes::offset_utils;
use crate::attributes::{ExceptionTableEntry, Instruction};
use crate::constant::Constant;
use crate::constant_pool::ConstantPool;
use crate::display::indent_lines;
use crate::error::Error::{InvalidAttributeLength, InvalidAttributeNameIndex};
use crate::error::Result;
use crate::version::Version;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Cursor, Read};

const VERSION_45_3: Version = Version::Java1_0_2 { minor: 3 };
const VERSION_49_0: Version = Version::Java5 { minor: 0 };
const VERSION_51_0: Version = Version::Java7 { minor: 0 };

/// Attribute.
///
/// Trimmed to the attribute kinds a Java 8 bytecode compiler back-end produces or consumes.
/// `StackMapTable`, module-system attributes, annotations, `MethodParameters`, records, and the
/// debugging attributes (`LineNumberTable`, `LocalVariable(Type)Table`, `SourceDebugExtension`)
/// are out of scope; see Non-goals and `DESIGN.md`.
///
/// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7>
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.2>
    ConstantValue {
        name_index: u16,
        constant_value_index: u16,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.3>
    Code {
        name_index: u16,
        max_stack: u16,
        max_locals: u16,
        code: Vec<Instruction>,
        exception_table: Vec<ExceptionTableEntry>,
        attributes: Vec<Attribute>,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.5>
    Exceptions {
        name_index: u16,
        exception_indexes: Vec<u16>,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.6>
    InnerClasses {
        name_index: u16,
        classes: Vec<InnerClass>,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.8>
    Synthetic { name_index: u16 },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.9>
    Signature {
        name_index: u16,
        signature_index: u16,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.10>
    SourceFile {
        name_index: u16,
        source_file_index: u16,
    },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.15>
    Deprecated { name_index: u16 },
    /// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.7.23>
    BootstrapMethods {
        name_index: u16,
        methods: Vec<BootstrapMethod>,
    },
    /// Used to support reading classes that carry attributes this compiler does not model
    /// (annotations, `MethodParameters`, module-system attributes).
    Unknown { name_index: u16, info: Vec<u8> },
}

impl Attribute {
    /// Get the name of the Attribute.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::ConstantValue { .. } => "ConstantValue",
            Attribute::Code { .. } => "Code",
            Attribute::Exceptions { .. } => "Exceptions",
            Attribute::InnerClasses { .. } => "InnerClasses",
            Attribute::Synthetic { .. } => "Synthetic",
            Attribute::Signature { .. } => "Signature",
            Attribute::SourceFile { .. } => "SourceFile",
            Attribute::Deprecated { .. } => "Deprecated",
            Attribute::BootstrapMethods { .. } => "BootstrapMethods",
            Attribute::Unknown { .. } => "Unknown",
        }
    }

    /// Check if the Attribute is valid for the given version.
    #[must_use]
    pub fn valid_for_version(&self, version: &Version) -> bool {
        match self {
            Attribute::ConstantValue { .. }
            | Attribute::Code { .. }
            | Attribute::Exceptions { .. }
            | Attribute::InnerClasses { .. }
            | Attribute::Synthetic { .. }
            | Attribute::SourceFile { .. }
            | Attribute::Deprecated { .. }
            | Attribute::Unknown { .. } => *version >= VERSION_45_3,
            Attribute::Signature { .. } => *version >= VERSION_49_0,
            Attribute::BootstrapMethods { .. } => *version >= VERSION_51_0,
        }
    }

    /// Deserialize the Attribute from bytes.
    ///
    /// # Errors
    /// - If the attribute name index is invalid.
    /// - If the attribute length is invalid.
    #[expect(clippy::too_many_lines)]
    pub fn from_bytes(
        constant_pool: &ConstantPool,
        bytes: &mut Cursor<Vec<u8>>,
    ) -> Result<Attribute> {
        let name_index = bytes.read_u16::<BigEndian>()?;
        let Some(Constant::Utf8(attribute_name)) = constant_pool.get(name_index) else {
            return Err(InvalidAttributeNameIndex(name_index));
        };

        let info_length = bytes.read_u32::<BigEndian>()?;

        let attribute = match attribute_name.as_str() {
            "ConstantValue" => {
                if info_length != 2 {
                    return Err(InvalidAttributeLength(info_length));
                }
                Attribute::ConstantValue {
                    name_index,
                    constant_value_index: bytes.read_u16::<BigEndian>()?,
                }
            }
            "Code" => {
                // Instruction pointers are converted from byte offsets to instruction offsets to
                // facilitate easier instruction manipulation; the instruction offset can be used
                // directly without recomputing byte offsets on every traversal.
                let max_stack = bytes.read_u16::<BigEndian>()?;
                let max_locals = bytes.read_u16::<BigEndian>()?;

                let code_length = bytes.read_u32::<BigEndian>()?;
                let mut code = vec![0; code_length as usize];
                bytes.read_exact(&mut code)?;
                let (byte_to_instruction_map, instructions) =
                    offset_utils::instructions_from_bytes(&mut Cursor::new(code))?;

                let exception_length = bytes.read_u16::<BigEndian>()?;
                let mut exception_table = Vec::with_capacity(exception_length as usize);
                for _ in 0..exception_length {
                    let mut exception = ExceptionTableEntry::from_bytes(bytes)?;
                    exception.range_pc.start = *byte_to_instruction_map
                        .get(&exception.range_pc.start)
                        .ok_or(InvalidInstructionOffset(u32::from(
                            exception.range_pc.start,
                        )))?;
                    exception.range_pc.end = byte_to_instruction_map
                        .iter()
                        .filter(|&(&k, _)| k <= exception.range_pc.end)
                        .max_by_key(|&(&k, _)| k)
                        .map(|(_, &v)| v)
                        .ok_or(InvalidInstructionOffset(u32::from(exception.range_pc.end)))?;
                    exception.handler_pc = *byte_to_instruction_map
                        .get(&exception.handler_pc)
                        .ok_or(InvalidInstructionOffset(u32::from(exception.handler_pc)))?;
                    exception_table.push(exception);
                }
                let attributes_count = bytes.read_u16::<BigEndian>()?;
                let mut attributes = Vec::with_capacity(attributes_count as usize);
                for _ in 0..attributes_count {
                    attributes.push(Attribute::from_bytes(constant_pool, bytes)?);
                }
                Attribute::Code {
                    name_index,
                    max_stack,
                    max_locals,
                    code: instructions,
                    exception_table,
                    attributes,
                }
            }
            "Exceptions" => {
                let exception_indexes_count = bytes.read_u16::<BigEndian>()?;
                let mut exception_indexes = Vec::with_capacity(exception_indexes_count as usize);
                for _ in 0..exception_indexes_count {
                    exception_indexes.push(bytes.read_u16::<BigEndian>()?);
                }
                Attribute::Exceptions {
                    name_index,
                    exception_indexes,
                }
            }
            "InnerClasses" => {
                let classes_count = bytes.read_u16::<BigEndian>()?;
                let mut classes = Vec::with_capacity(classes_count as usize);
                for _ in 0..classes_count {
                    let inner_class = InnerClass::from_bytes(bytes)?;
                    classes.push(inner_class);
                }
                Attribute::InnerClasses {
                    name_index,
                    classes,
                }
            }
            "Synthetic" => {
                if info_length != 0 {
                    return Err(InvalidAttributeLength(info_length));
                }
                Attribute::Synthetic { name_index }
            }
            "Signature" => {
                if info_length != 2 {
                    return Err(InvalidAttributeLength(info_length));
                }
                Attribute::Signature {
                    name_index,
                    signature_index: bytes.read_u16::<BigEndian>()?,
                }
            }
            "SourceFile" => {
                if info_length != 2 {
                    return Err(InvalidAttributeLength(info_length));
                }
                Attribute::SourceFile {
                    name_index,
                    source_file_index: bytes.read_u16::<BigEndian>()?,
                }
            }
            "Deprecated" => {
                if info_length != 0 {
                    return Err(InvalidAttributeLength(info_length));
                }
                Attribute::Deprecated { name_index }
            }
            "BootstrapMethods" => {
                let bootstrap_methods_count = bytes.read_u16::<BigEndian>()?;
                let mut methods = Vec::with_capacity(bootstrap_methods_count as usize);
                for _ in 0..bootstrap_methods_count {
                    let bootstrap_method = BootstrapMethod::from_bytes(bytes)?;
                    methods.push(bootstrap_method);
                }
                Attribute::BootstrapMethods {
                    name_index,
                    methods,
                }
            }
            _ => {
                let mut info = vec![0; info_length as usize];
                bytes.read_exact(&mut info)?;
                Attribute::Unknown { name_index, info }
            }
        };
        Ok(attribute)
    }

    /// Serialize the Attribute to bytes.
    ///
    /// # Errors
    /// If there is an issue serializing an attribute
    #[expect(clippy::too_many_lines)]
    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<()> {
        let (name_index, info) = match self {
            Attribute::ConstantValue {
                name_index,
                constant_value_index,
            } => (name_index, constant_value_index.to_be_bytes().to_vec()),
            Attribute::Code {
                name_index,
                max_stack,
                max_locals,
                code,
                exception_table,
                attributes,
            } => {
                let mut bytes = Vec::new();
                bytes.write_u16::<BigEndian>(*max_stack)?;
                bytes.write_u16::<BigEndian>(*max_locals)?;

                let (instruction_to_byte_map, code_bytes) =
                    offset_utils::instructions_to_bytes(code)?;
                let code_length = u32::try_from(code_bytes.len())?;
                bytes.write_u32::<BigEndian>(code_length)?;
                bytes.extend_from_slice(code_bytes.as_slice());

                let exceptions_length = u16::try_from(exception_table.len())?;
                bytes.write_u16::<BigEndian>(exceptions_length)?;
                for exception in &mut exception_table.clone() {
                    // Convert the instruction offset to byte offset
                    exception.range_pc.start = *instruction_to_byte_map
                        .get(&exception.range_pc.start)
                        .ok_or(InvalidInstructionOffset(u32::from(
                            exception.range_pc.start,
                        )))?;
                    exception.range_pc.end = instruction_to_byte_map
                        .iter()
                        .filter(|&(&k, _)| k <= exception.range_pc.end)
                        .max_by_key(|&(&k, _)| k)
                        .map(|(_, &v)| v)
                        .ok_or(InvalidInstructionOffset(u32::from(exception.range_pc.end)))?;
                    exception.handler_pc = *instruction_to_byte_map
                        .get(&exception.handler_pc)
                        .ok_or(InvalidInstructionOffset(u32::from(exception.handler_pc)))?;
                    exception.to_bytes(&mut bytes)?;
                }

                let attributes_length = u16::try_from(attributes.len())?;
                bytes.write_u16::<BigEndian>(attributes_length)?;
                for attribute in attributes {
                    attribute.to_bytes(&mut bytes)?;
                }
                (name_index, bytes)
            }
            Attribute::Exceptions {
                name_index,
                exception_indexes,
            } => {
                let mut bytes = Vec::new();
                let exception_indexes_length = u16::try_from(exception_indexes.len())?;
                bytes.write_u16::<BigEndian>(exception_indexes_length)?;
                for exception_index in exception_indexes {
                    bytes.write_u16::<BigEndian>(*exception_index)?;
                }
                (name_index, bytes)
            }
            Attribute::InnerClasses {
                name_index,
                classes,
            } => {
                let mut bytes = Vec::new();
                let classes_length = u16::try_from(classes.len())?;
                bytes.write_u16::<BigEndian>(classes_length)?;
                for inner_class in classes {
                    inner_class.to_bytes(&mut bytes)?;
                }
                (name_index, bytes)
            }
            Attribute::Synthetic { name_index } => (name_index, Vec::new()),
            Attribute::Signature {
                name_index,
                signature_index,
            } => (name_index, signature_index.to_be_bytes().to_vec()),
            Attribute::SourceFile {
                name_index,
                source_file_index,
            } => (name_index, source_file_index.to_be_bytes().to_vec()),
            Attribute::Deprecated { name_index } => (name_index, Vec::new()),
            Attribute::BootstrapMethods {
                name_index,
                methods,
            } => {
                let mut bytes = Vec::new();
                let methods_length = u16::try_from(methods.len())?;
                bytes.write_u16::<BigEndian>(methods_length)?;
                for method in methods {
                    method.to_bytes(&mut bytes)?;
                }
                (name_index, bytes)
            }
            Attribute::Unknown { name_index, info } => (name_index, info.clone()),
        };

        bytes.write_u16::<BigEndian>(*name_index)?;

        let info_length = u32::try_from(info.len())?;
        bytes.write_u32::<BigEndian>(info_length)?;
        bytes.extend_from_slice(info.as_slice());
        Ok(())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Code {
                max_stack,
                max_locals,
                code,
                exception_table,
                attributes,
                ..
            } => {
                writeln!(f, "Code:")?;
                writeln!(f, "  stack={max_stack}, locals={max_locals}")?;

                let (instruction_to_byte_map, code_bytes) =
                    offset_utils::instructions_to_bytes(code).map_err(|_| fmt::Error)?;
                let code_length = u64::try_from(code_bytes.len()).map_err(|_| fmt::Error)?;
                let mut cursor = Cursor::new(code_bytes.clone());
                while cursor.position() < code_length {
                    let index = cursor.position();
                    let mut instruction =
                        Instruction::from_bytes(&mut cursor).map_err(|_| fmt::Error)?;
                    match instruction {
                        Instruction::Tableswitch(ref mut table_switch) => {
                            let position = i32::try_from(index).map_err(|_| fmt::Error)?;
                            table_switch.default += position;
                            for offset in &mut table_switch.offsets {
                                *offset += position;
                            }
                        }
                        Instruction::Lookupswitch(ref mut lookup_switch) => {
                            let position = i32::try_from(index).map_err(|_| fmt::Error)?;
                            lookup_switch.default += position;
                            for offset in lookup_switch.pairs.values_mut() {
                                *offset += position;
                            }
                        }
                        _ => {}
                    }
                    let value = instruction.to_string();
                    let (name, value) = value.split_once(' ').unwrap_or((value.as_str(), ""));
                    let value = format!("{name:<13} {value}");
                    writeln!(f, "{index:>6}: {}", value.trim())?;
                }

                let mut exception_table = exception_table.clone();
                for exception in &mut exception_table {
                    exception.range_pc.start = *instruction_to_byte_map
                        .get(&exception.range_pc.start)
                        .ok_or(fmt::Error)?;
                    exception.range_pc.end = instruction_to_byte_map
                        .iter()
                        .filter(|&(&k, _)| k <= exception.range_pc.end)
                        .max_by_key(|&(&k, _)| k)
                        .map(|(_, &v)| v + 1)
                        .ok_or(fmt::Error)?;
                    exception.handler_pc = *instruction_to_byte_map
                        .get(&exception.handler_pc)
                        .ok_or(fmt::Error)?;
                }
                if !exception_table.is_empty() {
                    writeln!(f, "  {exception_table:?}")?;
                }

                for attribute in attributes {
                    writeln!(f, "{}", indent_lines(&attribute.to_string(), "  "))?;
                }
            }
            _ => write!(f, "{self:?}")?,
        }

        Ok(())
    }
}
