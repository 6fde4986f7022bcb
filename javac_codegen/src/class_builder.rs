//! Class assembly (§4.7, §9): turns one resolved `ClassDecl` into one or more `ClassFile`s.
//!
//! A single top-level declaration can produce more than one class file once static nested classes
//! are accounted for, so [`compile_class`] returns a list of `(internal_name, ClassFile)` pairs
//! rather than a single one; the first entry is always the declaration's own class, the rest are
//! its nested classes (recursively).
//!
//! Field initializers are not compiled where they're written. `static` initializers are
//! desugared into synthetic assignment statements appended to `<clinit>`; instance initializers
//! are spliced into every constructor right after its (explicit or implicit) `super`/`this` call,
//! skipped entirely for constructors that delegate via `this(...)` since the target constructor
//! already runs them. Both reuse `compile_assign`'s existing handling of `Expr::FieldAccess`
//! targets rather than any new codegen path.

use crate::context::{ClassContext, VarScope};
use crate::error::{Error, Result};
use crate::expr::{compile_expr, emit_conversion};
use crate::stmt::compile_stmt;
use javac_ast::{ClassDecl, ClassKind, Expr, FieldDecl, Import, LambdaBody, Literal, MethodDecl, Modifiers, Primitive, Stmt, Type};
use javac_bytecode::MethodBuilder;
use javac_classfile::attributes::{Attribute, InnerClass, Instruction, NestedClassAccessFlags};
use javac_classfile::{
    ClassAccessFlags, ClassFile, ConstantPool, Field, FieldAccessFlags, FieldType, Method, MethodAccessFlags, Version,
};
use javac_classpath::Classpath;
use javac_resolve::NameScope;

/// A synthetic carrier method produced by desugaring a lambda body (§4.6): always `private
/// static`, optionally with a leading `this$0` parameter when the lambda references the
/// enclosing instance.
#[derive(Clone, Debug)]
pub(crate) struct PendingMethod {
    pub name: String,
    pub param_names: Vec<String>,
    pub param_types: Vec<Type>,
    pub return_type: Type,
    pub captures_this: bool,
    pub body: LambdaBody,
}

/// Compiles `class` (and, recursively, its static nested classes) into class files. `enclosing`
/// lists the internal names of enclosing classes, outermost first; empty for a top-level
/// declaration.
pub(crate) fn compile_class(
    classpath: &Classpath,
    package: Option<&str>,
    imports: &[Import],
    enclosing: &[String],
    class: &ClassDecl,
) -> Result<Vec<(String, ClassFile)>> {
    let internal_name = match enclosing.last() {
        Some(outer) => format!("{outer}${}", class.name),
        None => match package {
            Some(pkg) if !pkg.is_empty() => format!("{}/{}", pkg.replace('.', "/"), class.name),
            _ => class.name.clone(),
        },
    };

    let is_enum = matches!(class.kind, ClassKind::Enum);
    let is_interface = matches!(class.kind, ClassKind::Interface);
    let super_name = if is_enum {
        "java/lang/Enum".to_string()
    } else {
        match &class.superclass {
            Some(Type::Reference(name)) => name.clone(),
            Some(other) => {
                return Err(Error::InvariantViolation(format!("superclass must be a reference type, found {other}")))
            }
            None => "java/lang/Object".to_string(),
        }
    };

    let mut constant_pool = ConstantPool::new();
    let this_class = constant_pool.add_class(&internal_name)?;
    let super_class = constant_pool.add_class(&super_name)?;
    let mut interfaces = Vec::new();
    for interface in &class.interfaces {
        let Type::Reference(name) = interface else {
            return Err(Error::InvariantViolation("implemented interface must be a reference type".to_string()));
        };
        interfaces.push(constant_pool.add_class(name)?);
    }

    let name_scope = NameScope::new(package, imports, enclosing);
    let mut ctx = ClassContext::new(classpath, name_scope, internal_name.clone(), super_name, is_interface, is_enum, enclosing.to_vec());

    let mut fields = Vec::new();
    let mut instance_inits = Vec::new();
    let mut static_inits = Vec::new();

    if is_enum {
        compile_enum_constants(&mut constant_pool, &internal_name, class, &mut fields)?;
    }

    for field in &class.fields {
        let (compiled, has_constant_value) = compile_field(&mut constant_pool, field)?;
        fields.push(compiled);
        if has_constant_value {
            continue;
        }
        if let Some(initializer) = &field.initializer {
            let assign = Stmt::Expr(Expr::Assign {
                target: Box::new(Expr::FieldAccess {
                    target: Box::new(Expr::This),
                    name: field.name.clone(),
                }),
                compound_op: None,
                value: Box::new(initializer.clone()),
            });
            if field.modifiers.is_static {
                static_inits.push(assign);
            } else {
                instance_inits.push(assign);
            }
        }
    }

    let mut methods = Vec::new();
    let mut has_constructor = false;
    for method in &class.methods {
        if method.is_constructor() {
            has_constructor = true;
        }
        methods.push(compile_method(&mut ctx, &mut constant_pool, method, &instance_inits)?);
    }
    if !has_constructor && !is_interface {
        methods.push(compile_default_constructor(&mut ctx, &mut constant_pool, &instance_inits)?);
    }

    if is_enum {
        methods.push(compile_enum_values_method(&ctx, &mut constant_pool)?);
        methods.push(compile_enum_value_of_method(&ctx, &mut constant_pool)?);
    }

    if !static_inits.is_empty() || (is_enum && !class.enum_constants.is_empty()) {
        methods.push(compile_clinit(&mut ctx, &mut constant_pool, class, &static_inits)?);
    }

    for carrier in std::mem::take(&mut ctx.synthetic_methods) {
        methods.push(compile_carrier_method(&mut ctx, &mut constant_pool, &carrier)?);
    }

    let mut attributes = Vec::new();
    if !ctx.bootstrap_methods.is_empty() {
        let name_index = constant_pool.add_utf8("BootstrapMethods")?;
        attributes.push(Attribute::BootstrapMethods {
            name_index,
            methods: std::mem::take(&mut ctx.bootstrap_methods),
        });
    }

    let mut nested_outputs = Vec::new();
    if !class.nested.is_empty() {
        let mut child_enclosing = enclosing.to_vec();
        child_enclosing.push(internal_name.clone());
        let mut inner_classes = Vec::new();
        for nested in &class.nested {
            let nested_internal = format!("{internal_name}${}", nested.name);
            let class_info_index = constant_pool.add_class(&nested_internal)?;
            let outer_class_info_index = constant_pool.add_class(&internal_name)?;
            let name_index = constant_pool.add_utf8(&nested.name)?;
            inner_classes.push(InnerClass {
                class_info_index,
                outer_class_info_index,
                name_index,
                access_flags: nested_class_flags(&nested.modifiers, matches!(nested.kind, ClassKind::Interface)),
            });
            nested_outputs.extend(compile_class(classpath, package, imports, &child_enclosing, nested)?);
        }
        let name_index = constant_pool.add_utf8("InnerClasses")?;
        attributes.push(Attribute::InnerClasses {
            name_index,
            classes: inner_classes,
        });
    }

    let version = if ctx.requires_java8 {
        Version::Java8 { minor: 0 }
    } else {
        Version::Java6 { minor: 0 }
    };

    let class_file = ClassFile {
        version,
        constant_pool,
        access_flags: class_access_flags(&class.modifiers, &class.kind),
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
        attributes,
    };

    let mut out = vec![(internal_name, class_file)];
    out.extend(nested_outputs);
    Ok(out)
}

fn class_access_flags(modifiers: &Modifiers, kind: &ClassKind) -> ClassAccessFlags {
    let mut flags = ClassAccessFlags::SUPER;
    if modifiers.public {
        flags |= ClassAccessFlags::PUBLIC;
    }
    if modifiers.is_final {
        flags |= ClassAccessFlags::FINAL;
    }
    if modifiers.is_abstract {
        flags |= ClassAccessFlags::ABSTRACT;
    }
    if modifiers.synthetic {
        flags |= ClassAccessFlags::SYNTHETIC;
    }
    match kind {
        ClassKind::Interface => flags |= ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
        // No constant carries its own class body in this AST, so every enum class is concrete.
        ClassKind::Enum => flags |= ClassAccessFlags::ENUM | ClassAccessFlags::FINAL,
        ClassKind::Class => {}
    }
    flags
}

fn nested_class_flags(modifiers: &Modifiers, is_interface: bool) -> NestedClassAccessFlags {
    let mut flags = NestedClassAccessFlags::STATIC;
    if modifiers.public {
        flags |= NestedClassAccessFlags::PUBLIC;
    }
    if modifiers.private {
        flags |= NestedClassAccessFlags::PRIVATE;
    }
    if modifiers.protected {
        flags |= NestedClassAccessFlags::PROTECTED;
    }
    if modifiers.is_final {
        flags |= NestedClassAccessFlags::FINAL;
    }
    if modifiers.is_abstract || is_interface {
        flags |= NestedClassAccessFlags::ABSTRACT;
    }
    if is_interface {
        flags |= NestedClassAccessFlags::INTERFACE;
    }
    flags
}

fn method_access_flags(modifiers: &Modifiers) -> MethodAccessFlags {
    let mut flags = MethodAccessFlags::empty();
    if modifiers.public {
        flags |= MethodAccessFlags::PUBLIC;
    }
    if modifiers.private {
        flags |= MethodAccessFlags::PRIVATE;
    }
    if modifiers.protected {
        flags |= MethodAccessFlags::PROTECTED;
    }
    if modifiers.is_static {
        flags |= MethodAccessFlags::STATIC;
    }
    if modifiers.is_final {
        flags |= MethodAccessFlags::FINAL;
    }
    if modifiers.is_abstract {
        flags |= MethodAccessFlags::ABSTRACT;
    }
    if modifiers.synthetic {
        flags |= MethodAccessFlags::SYNTHETIC;
    }
    flags
}

fn field_access_flags(modifiers: &Modifiers) -> FieldAccessFlags {
    let mut flags = FieldAccessFlags::empty();
    if modifiers.public {
        flags |= FieldAccessFlags::PUBLIC;
    }
    if modifiers.private {
        flags |= FieldAccessFlags::PRIVATE;
    }
    if modifiers.protected {
        flags |= FieldAccessFlags::PROTECTED;
    }
    if modifiers.is_static {
        flags |= FieldAccessFlags::STATIC;
    }
    if modifiers.is_final {
        flags |= FieldAccessFlags::FINAL;
    }
    if modifiers.synthetic {
        flags |= FieldAccessFlags::SYNTHETIC;
    }
    flags
}

fn compile_field(pool: &mut ConstantPool, field: &FieldDecl) -> Result<(Field, bool)> {
    let descriptor = field.ty.descriptor();
    let name_index = pool.add_utf8(&field.name)?;
    let descriptor_index = pool.add_utf8(&descriptor)?;
    let field_type = FieldType::parse(&descriptor)?;

    let mut attributes = Vec::new();
    let mut has_constant_value = false;
    if field.modifiers.is_static && field.modifiers.is_final {
        if let Some(constant_value_index) = constant_value_index(pool, &field.ty, field.initializer.as_ref())? {
            let name_index = pool.add_utf8("ConstantValue")?;
            attributes.push(Attribute::ConstantValue { name_index, constant_value_index });
            has_constant_value = true;
        }
    }

    Ok((
        Field {
            access_flags: field_access_flags(&field.modifiers),
            name_index,
            descriptor_index,
            field_type,
            attributes,
        },
        has_constant_value,
    ))
}

/// A `static final` field whose initializer is a single literal matching its declared type gets a
/// `ConstantValue` attribute, set by the class loader with no `<clinit>` code required; anything
/// else (a method call, a reference to another field, string concatenation) still runs as an
/// ordinary assignment inside `<clinit>`.
fn constant_value_index(pool: &mut ConstantPool, ty: &Type, initializer: Option<&Expr>) -> Result<Option<u16>> {
    let Some(Expr::Literal(literal)) = initializer else {
        return Ok(None);
    };
    let index = match (ty, literal) {
        (Type::Primitive(Primitive::Int | Primitive::Short | Primitive::Byte), Literal::Int(value)) => pool.add_integer(*value)?,
        (Type::Primitive(Primitive::Char), Literal::Char(value)) => pool.add_integer(*value as i32)?,
        (Type::Primitive(Primitive::Boolean), Literal::Boolean(value)) => pool.add_integer(i32::from(*value))?,
        (Type::Primitive(Primitive::Long), Literal::Long(value)) => pool.add_long(*value)?,
        (Type::Primitive(Primitive::Float), Literal::Float(value)) => pool.add_float(*value)?,
        (Type::Primitive(Primitive::Double), Literal::Double(value)) => pool.add_double(*value)?,
        (Type::Reference(name), Literal::String(value)) if name == "java/lang/String" => pool.add_string(value)?,
        _ => return Ok(None),
    };
    Ok(Some(index))
}

fn compile_method(ctx: &mut ClassContext, pool: &mut ConstantPool, method: &MethodDecl, instance_inits: &[Stmt]) -> Result<Method> {
    let is_constructor = method.is_constructor();
    let is_enum_constructor = is_constructor && ctx.is_enum;
    let is_static = method.modifiers.is_static;

    let mut param_types = Vec::new();
    if is_enum_constructor {
        // Every enum constructor gets `(String, int, ...)`: the JVM-level name/ordinal pair
        // `javac` itself inserts ahead of whatever the source declared.
        param_types.push(Type::string());
        param_types.push(Type::Primitive(Primitive::Int));
    }
    param_types.extend(method.params.iter().map(|p| p.ty.clone()));

    let mut access_flags = method_access_flags(&method.modifiers);
    if method.is_varargs {
        access_flags |= MethodAccessFlags::VARARGS;
    }

    let descriptor = javac_ast::method_descriptor(&param_types, &method.return_type);
    let name_index = pool.add_utf8(&method.name)?;
    let descriptor_index = pool.add_utf8(&descriptor)?;

    let mut attributes = Vec::new();
    if !method.throws.is_empty() {
        let mut exception_indexes = Vec::new();
        for thrown in &method.throws {
            if let Type::Reference(name) = thrown {
                exception_indexes.push(pool.add_class(name)?);
            }
        }
        let name_index = pool.add_utf8("Exceptions")?;
        attributes.push(Attribute::Exceptions { name_index, exception_indexes });
    }

    let Some(source_body) = &method.body else {
        return Ok(Method {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        });
    };

    let prepared_body = if is_constructor {
        splice_constructor_prologue(source_body, instance_inits, ctx.is_enum)
    } else {
        source_body.clone()
    };

    let mut builder = MethodBuilder::new(pool, is_static, &param_types);
    let mut vars = VarScope::new();
    let mut slot: u16 = if is_static { 0 } else { 1 };
    if is_enum_constructor {
        vars.declare("$enum$name", slot, Type::string());
        slot += 1;
        vars.declare("$enum$ordinal", slot, Type::Primitive(Primitive::Int));
        slot += 1;
    }
    for param in &method.params {
        vars.declare(&param.name, slot, param.ty.clone());
        slot += u16::from(param.ty.category());
    }

    for stmt in &prepared_body {
        compile_stmt(ctx, &mut builder, &mut vars, stmt)?;
    }
    if !builder.terminated && matches!(method.return_type, Type::Void) {
        builder.emit_terminal(Instruction::Return)?;
    }

    let code_name_index = builder.constant_pool().add_utf8("Code")?;
    attributes.push(builder.finish(code_name_index)?);

    Ok(Method {
        access_flags,
        name_index,
        descriptor_index,
        attributes,
    })
}

/// Splices the desugared field initializers into a constructor body at the point real `javac`
/// runs them: right after the explicit or implicit `super(...)` call, never at all for a
/// constructor that delegates via `this(...)` (the target constructor already ran them). An enum
/// constructor's implicit `super` always forwards the synthetic `$enum$name`/`$enum$ordinal`
/// parameters, since JLS forbids writing that call explicitly.
fn splice_constructor_prologue(body: &[Stmt], instance_inits: &[Stmt], is_enum: bool) -> Vec<Stmt> {
    if let Some(Stmt::Expr(Expr::MethodCall { target, name, .. })) = body.first() {
        if name == "<init>" {
            if target.is_none() {
                return body.to_vec();
            }
            let mut out = Vec::with_capacity(body.len() + instance_inits.len());
            out.push(body[0].clone());
            out.extend_from_slice(instance_inits);
            out.extend(body[1..].iter().cloned());
            return out;
        }
    }

    let mut out = Vec::with_capacity(body.len() + instance_inits.len() + 1);
    let implicit_super = if is_enum {
        vec![Expr::Name("$enum$name".to_string()), Expr::Name("$enum$ordinal".to_string())]
    } else {
        Vec::new()
    };
    out.push(Stmt::Expr(Expr::MethodCall {
        target: Some(Box::new(Expr::Super)),
        name: "<init>".to_string(),
        arguments: implicit_super,
    }));
    out.extend_from_slice(instance_inits);
    out.extend(body.iter().cloned());
    out
}

fn compile_default_constructor(ctx: &mut ClassContext, pool: &mut ConstantPool, instance_inits: &[Stmt]) -> Result<Method> {
    let synthetic = MethodDecl {
        modifiers: Modifiers::public(),
        name: "<init>".to_string(),
        params: Vec::new(),
        return_type: Type::Void,
        is_varargs: false,
        throws: Vec::new(),
        body: Some(vec![Stmt::Return(None)]),
        span: javac_ast::Span::synthetic(),
    };
    compile_method(ctx, pool, &synthetic, instance_inits)
}

/// Enum constant fields (`public static final` of the enum's own type, in declaration order) plus
/// the synthetic `private static final $VALUES` array `values()`/`<clinit>` rely on. The constants
/// are constructed and `$VALUES` is assembled in `<clinit>`, not here; see [`compile_clinit`].
fn compile_enum_constants(pool: &mut ConstantPool, internal_name: &str, class: &ClassDecl, fields: &mut Vec<Field>) -> Result<()> {
    let constant_ty = Type::reference(internal_name.to_string());
    let descriptor = constant_ty.descriptor();
    for constant in &class.enum_constants {
        let name_index = pool.add_utf8(&constant.name)?;
        let descriptor_index = pool.add_utf8(&descriptor)?;
        fields.push(Field {
            access_flags: FieldAccessFlags::PUBLIC | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL | FieldAccessFlags::ENUM,
            name_index,
            descriptor_index,
            field_type: FieldType::parse(&descriptor)?,
            attributes: Vec::new(),
        });
    }

    let values_descriptor = Type::array(constant_ty, 1).descriptor();
    let name_index = pool.add_utf8("$VALUES")?;
    let descriptor_index = pool.add_utf8(&values_descriptor)?;
    fields.push(Field {
        access_flags: FieldAccessFlags::PRIVATE | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL | FieldAccessFlags::SYNTHETIC,
        name_index,
        descriptor_index,
        field_type: FieldType::parse(&values_descriptor)?,
        attributes: Vec::new(),
    });
    Ok(())
}

/// `<clinit>`: for an enum, constructs every constant in declaration order (each via `new` +
/// the `(String, int, ...)` constructor, assigned to its own static field) and only then
/// assembles `$VALUES` from those fields, matching the ordering real `javac` uses so that a
/// constant's own constructor can never observe a partially-built `$VALUES`. Desugared `static`
/// field initializers run last, after every constant exists.
fn compile_clinit(ctx: &mut ClassContext, pool: &mut ConstantPool, class: &ClassDecl, static_inits: &[Stmt]) -> Result<Method> {
    let mut body = Vec::new();

    if ctx.is_enum {
        for (ordinal, constant) in class.enum_constants.iter().enumerate() {
            let mut arguments = vec![
                Expr::Literal(Literal::String(constant.name.clone())),
                Expr::Literal(Literal::Int(i32::try_from(ordinal).unwrap_or(i32::MAX))),
            ];
            arguments.extend(constant.arguments.iter().cloned());
            body.push(Stmt::Expr(Expr::Assign {
                target: Box::new(Expr::FieldAccess {
                    target: Box::new(Expr::This),
                    name: constant.name.clone(),
                }),
                compound_op: None,
                value: Box::new(Expr::New {
                    ty: Type::reference(ctx.internal_name.clone()),
                    arguments,
                }),
            }));
        }

        let elements = class.enum_constants.iter().map(|constant| Expr::Name(constant.name.clone())).collect();
        body.push(Stmt::Expr(Expr::Assign {
            target: Box::new(Expr::FieldAccess {
                target: Box::new(Expr::This),
                name: "$VALUES".to_string(),
            }),
            compound_op: None,
            value: Box::new(Expr::NewArray {
                element_type: Type::reference(ctx.internal_name.clone()),
                dimensions: Vec::new(),
                initializer: Some(elements),
            }),
        }));
    }

    body.extend_from_slice(static_inits);
    body.push(Stmt::Return(None));

    let synthetic = MethodDecl {
        modifiers: Modifiers {
            is_static: true,
            ..Modifiers::default()
        },
        name: "<clinit>".to_string(),
        params: Vec::new(),
        return_type: Type::Void,
        is_varargs: false,
        throws: Vec::new(),
        body: Some(body),
        span: javac_ast::Span::synthetic(),
    };
    compile_method(ctx, pool, &synthetic, &[])
}

/// `public static T[] values() { return (T[]) $VALUES.clone(); }`, emitted by hand rather than
/// through the expression compiler since cloning an array and casting to an array type isn't
/// otherwise expressible through this AST.
fn compile_enum_values_method(ctx: &ClassContext, pool: &mut ConstantPool) -> Result<Method> {
    let array_ty = Type::array(Type::reference(ctx.internal_name.clone()), 1);
    let descriptor = javac_ast::method_descriptor(&[], &array_ty);
    let mut builder = MethodBuilder::new(pool, true, &[]);

    let array_class = builder.constant_pool().add_class(&array_ty.descriptor())?;
    let field_class = builder.constant_pool().add_class(&ctx.internal_name)?;
    let values_field = builder
        .constant_pool()
        .add_field_ref(field_class, "$VALUES", array_ty.descriptor().as_str())?;
    builder.emit(Instruction::Getstatic(values_field))?;
    let clone_method = builder.constant_pool().add_method_ref(array_class, "clone", "()Ljava/lang/Object;")?;
    builder.emit(Instruction::Invokevirtual(clone_method))?;
    builder.emit(Instruction::Checkcast(array_class))?;
    builder.emit_terminal(Instruction::Areturn)?;

    let name_index = builder.constant_pool().add_utf8("values")?;
    let descriptor_index = builder.constant_pool().add_utf8(&descriptor)?;
    let code_name_index = builder.constant_pool().add_utf8("Code")?;
    let code_attr = builder.finish(code_name_index)?;
    Ok(Method {
        access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        name_index,
        descriptor_index,
        attributes: vec![code_attr],
    })
}

/// `public static T valueOf(String name) { return (T) Enum.valueOf(T.class, name); }`
fn compile_enum_value_of_method(ctx: &ClassContext, pool: &mut ConstantPool) -> Result<Method> {
    let descriptor = javac_ast::method_descriptor(&[Type::string()], &Type::reference(ctx.internal_name.clone()));
    let mut builder = MethodBuilder::new(pool, true, &[Type::string()]);

    let self_class = builder.constant_pool().add_class(&ctx.internal_name)?;
    builder.emit(Instruction::Ldc_w(self_class))?;
    builder.emit(Instruction::Aload_0)?;
    let enum_class = builder.constant_pool().add_class("java/lang/Enum")?;
    let value_of = builder.constant_pool().add_method_ref(
        enum_class,
        "valueOf",
        "(Ljava/lang/Class;Ljava/lang/String;)Ljava/lang/Enum;",
    )?;
    builder.emit(Instruction::Invokestatic(value_of))?;
    builder.emit(Instruction::Checkcast(self_class))?;
    builder.emit_terminal(Instruction::Areturn)?;

    let name_index = builder.constant_pool().add_utf8("valueOf")?;
    let descriptor_index = builder.constant_pool().add_utf8(&descriptor)?;
    let code_name_index = builder.constant_pool().add_utf8("Code")?;
    let code_attr = builder.finish(code_name_index)?;
    Ok(Method {
        access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        name_index,
        descriptor_index,
        attributes: vec![code_attr],
    })
}

/// Compiles one lambda's carrier method (§4.6): always `private static`, with the captured `this`
/// (if any) as an implicit leading parameter that the call site at the `invokedynamic` site
/// pushes before its real arguments.
fn compile_carrier_method(ctx: &mut ClassContext, pool: &mut ConstantPool, carrier: &PendingMethod) -> Result<Method> {
    let mut param_types = Vec::new();
    if carrier.captures_this {
        param_types.push(Type::reference(ctx.internal_name.clone()));
    }
    param_types.extend(carrier.param_types.iter().cloned());

    let mut builder = MethodBuilder::new(pool, true, &param_types);
    let mut vars = VarScope::new();
    let mut slot: u16 = if carrier.captures_this { 1 } else { 0 };
    for (name, ty) in carrier.param_names.iter().zip(carrier.param_types.iter()) {
        vars.declare(name, slot, ty.clone());
        slot += u16::from(ty.category());
    }

    match &carrier.body {
        LambdaBody::Expr(expr) => {
            let value_ty = compile_expr(ctx, &mut builder, &vars, expr)?;
            emit_return_value(&mut builder, &value_ty, &carrier.return_type)?;
        }
        LambdaBody::Block(stmts) => {
            for stmt in stmts {
                compile_stmt(ctx, &mut builder, &mut vars, stmt)?;
            }
            if !builder.terminated {
                builder.emit_terminal(Instruction::Return)?;
            }
        }
    }

    let descriptor = javac_ast::method_descriptor(&param_types, &carrier.return_type);
    let name_index = builder.constant_pool().add_utf8(&carrier.name)?;
    let descriptor_index = builder.constant_pool().add_utf8(&descriptor)?;
    let code_name_index = builder.constant_pool().add_utf8("Code")?;
    let code_attr = builder.finish(code_name_index)?;
    Ok(Method {
        access_flags: MethodAccessFlags::PRIVATE | MethodAccessFlags::STATIC | MethodAccessFlags::SYNTHETIC,
        name_index,
        descriptor_index,
        attributes: vec![code_attr],
    })
}

fn emit_return_value(builder: &mut MethodBuilder, value_ty: &Type, return_ty: &Type) -> Result<()> {
    if matches!(return_ty, Type::Void) {
        return builder.emit_terminal(Instruction::Return);
    }
    emit_conversion(builder, value_ty, return_ty)?;
    let instruction = match return_ty {
        Type::Primitive(Primitive::Long) => Instruction::Lreturn,
        Type::Primitive(Primitive::Float) => Instruction::Freturn,
        Type::Primitive(Primitive::Double) => Instruction::Dreturn,
        Type::Reference(_) | Type::Array(..) => Instruction::Areturn,
        Type::Void => Instruction::Return,
        Type::Primitive(_) => Instruction::Ireturn,
    };
    builder.emit_terminal(instruction)
}
