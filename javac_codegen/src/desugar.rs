//! String concatenation desugaring (§4.6): `a + b + c` where any operand is a `String` compiles
//! to a `StringBuilder` chain, the same strategy `javac` itself used before `invokedynamic`-based
//! `StringConcatFactory` (JEP 280, Java 9) — appropriate here since this back-end's default
//! target is Java 6 and its Java 8 ceiling predates that JEP.

use crate::context::{ClassContext, VarScope};
use crate::error::Result;
use javac_ast::{BinaryOp, Expr, Type};
use javac_bytecode::MethodBuilder;
use javac_classfile::attributes::Instruction;

const STRING_BUILDER: &str = "java/lang/StringBuilder";

pub(crate) fn compile_string_concat(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &VarScope,
    left: &Expr,
    right: &Expr,
) -> Result<Type> {
    let class_index = builder.constant_pool().add_class(STRING_BUILDER)?;
    builder.emit(Instruction::New(class_index))?;
    builder.emit(Instruction::Dup)?;
    let ctor = builder.constant_pool().add_method_ref(class_index, "<init>", "()V")?;
    builder.emit(Instruction::Invokespecial(ctor))?;

    let mut operands = Vec::new();
    flatten_concat_chain(left, &mut operands);
    flatten_concat_chain(right, &mut operands);
    for operand in operands {
        append_operand(ctx, builder, vars, operand, class_index)?;
    }

    let to_string = builder.constant_pool().add_method_ref(class_index, "toString", "()Ljava/lang/String;")?;
    builder.emit(Instruction::Invokevirtual(to_string))?;
    Ok(Type::string())
}

/// Flattens a left-associative chain of `+` where at least one operand anywhere in the chain is a
/// `String`, so `a + b + c` appends `a`, `b`, `c` individually rather than nesting builders.
fn flatten_concat_chain<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    if let Expr::Binary {
        op: BinaryOp::Add,
        left,
        right,
    } = expr
    {
        flatten_concat_chain(left, out);
        flatten_concat_chain(right, out);
    } else {
        out.push(expr);
    }
}

fn append_operand(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &VarScope,
    operand: &Expr,
    builder_class_index: u16,
) -> Result<()> {
    let operand_ty = crate::expr::compile_expr(ctx, builder, vars, operand)?;
    let descriptor = append_descriptor(&operand_ty);
    let index = builder.constant_pool().add_method_ref(builder_class_index, "append", descriptor)?;
    builder.emit(Instruction::Invokevirtual(index))?;
    Ok(())
}

/// `StringBuilder.append` is overloaded per primitive plus `String`/`Object`; anything that is not
/// one of the primitive overloads falls back to `append(Object)`, which calls `String.valueOf`
/// internally and is what the JLS specifies for reference-typed concatenation operands.
fn append_descriptor(ty: &Type) -> &'static str {
    match ty {
        Type::Primitive(javac_ast::Primitive::Boolean) => "(Z)Ljava/lang/StringBuilder;",
        Type::Primitive(javac_ast::Primitive::Char) => "(C)Ljava/lang/StringBuilder;",
        Type::Primitive(javac_ast::Primitive::Int | javac_ast::Primitive::Byte | javac_ast::Primitive::Short) => {
            "(I)Ljava/lang/StringBuilder;"
        }
        Type::Primitive(javac_ast::Primitive::Long) => "(J)Ljava/lang/StringBuilder;",
        Type::Primitive(javac_ast::Primitive::Float) => "(F)Ljava/lang/StringBuilder;",
        Type::Primitive(javac_ast::Primitive::Double) => "(D)Ljava/lang/StringBuilder;",
        Type::Reference(name) if name == "java/lang/String" => "(Ljava/lang/String;)Ljava/lang/StringBuilder;",
        _ => "(Ljava/lang/Object;)Ljava/lang/StringBuilder;",
    }
}
