//! Lambda desugaring (§4.6, §4.7 "unsupported"): a lambda with a known target functional
//! interface compiles to `invokedynamic` against `LambdaMetafactory.metafactory`, backed by a
//! synthetic `private static` carrier method holding the lambda's body.
//!
//! Capturing enclosing local variables is not implemented: a carrier method only ever sees its
//! own declared parameters plus, for a lambda written inside an instance method, the enclosing
//! `this` as an implicit leading parameter. A real `javac` threads every captured local through
//! as extra leading parameters and bootstrap arguments; this back-end's lambdas are restricted to
//! bodies that reference only their own parameters, static members, and (for instance-context
//! lambdas) instance members through implicit `this`.

use crate::context::{ClassContext, VarScope};
use crate::error::{Error, Result};
use javac_ast::{Expr, LambdaBody, LambdaParam, Type};
use javac_bytecode::MethodBuilder;
use javac_classfile::attributes::{BootstrapMethod, Instruction};
use javac_classfile::ReferenceKind;

const SPAN: fn() -> javac_ast::Span = javac_ast::Span::synthetic;
const METAFACTORY_DESCRIPTOR: &str = "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;";

pub(crate) fn compile_lambda(
    ctx: &mut ClassContext,
    builder: &mut MethodBuilder,
    vars: &VarScope,
    params: &[LambdaParam],
    body: &LambdaBody,
    target_type: Option<&Type>,
) -> Result<Type> {
    let Some(Type::Reference(interface_name)) = target_type else {
        return Err(Error::UnsupportedFeature {
            span: SPAN(),
            feature: "lambda expression without a statically known functional-interface target".to_string(),
        });
    };
    let interface = ctx.classpath.require(interface_name)?;
    let sam = interface
        .methods
        .iter()
        .find(|method| method.is_abstract && !method.is_static)
        .ok_or_else(|| Error::UnsupportedFeature {
            span: SPAN(),
            feature: format!("{interface_name} has no single abstract method"),
        })?
        .clone();

    let captures_this = body_references_this(body);
    let param_types: Vec<Type> = if params.iter().all(|p| p.ty.is_some()) {
        params.iter().map(|p| p.ty.clone().unwrap()).collect()
    } else {
        sam.params.clone()
    };
    let carrier_name = ctx.next_lambda_name();
    ctx.synthetic_methods.push(crate::class_builder::PendingMethod {
        name: carrier_name.clone(),
        param_names: params.iter().map(|p| p.name.clone()).collect(),
        param_types: param_types.clone(),
        return_type: sam.return_type.clone(),
        captures_this,
        body: body.clone(),
    });
    ctx.requires_java8 = true;

    if captures_this {
        builder.emit(Instruction::Aload_0)?;
    }
    let captured_types: Vec<Type> = if captures_this {
        vec![Type::reference(ctx.internal_name.clone())]
    } else {
        Vec::new()
    };

    let sam_descriptor = javac_ast::method_descriptor(&sam.params, &sam.return_type);
    let sam_method_type_index = builder.constant_pool().add_method_type(&sam_descriptor)?;

    let carrier_descriptor = javac_ast::method_descriptor(&param_types, &sam.return_type);
    let full_carrier_descriptor = {
        let mut descriptor_params = captured_types.clone();
        descriptor_params.extend(param_types.iter().cloned());
        javac_ast::method_descriptor(&descriptor_params, &sam.return_type)
    };
    let class_index = builder.constant_pool().add_class(&ctx.internal_name)?;
    let carrier_method_ref = builder
        .constant_pool()
        .add_method_ref(class_index, &carrier_name, &full_carrier_descriptor)?;
    let carrier_handle = builder
        .constant_pool()
        .add_method_handle(ReferenceKind::InvokeStatic, carrier_method_ref)?;
    let _ = carrier_descriptor;

    let bootstrap_index = {
        let mh_class_index = builder.constant_pool().add_class("java/lang/invoke/LambdaMetafactory")?;
        let mh_ref = builder
            .constant_pool()
            .add_method_ref(mh_class_index, "metafactory", METAFACTORY_DESCRIPTOR)?;
        let bootstrap_method_ref = builder.constant_pool().add_method_handle(ReferenceKind::InvokeStatic, mh_ref)?;
        ctx.bootstrap_methods.push(BootstrapMethod {
            bootstrap_method_ref,
            arguments: vec![sam_method_type_index, carrier_handle, sam_method_type_index],
        });
        u16::try_from(ctx.bootstrap_methods.len() - 1).map_err(|_| {
            Error::InvariantViolation("more bootstrap methods than a class file can hold".to_string())
        })?
    };

    let indy_descriptor = javac_ast::method_descriptor(&captured_types, &Type::reference(interface_name.clone()));
    let indy_index = builder
        .constant_pool()
        .add_invoke_dynamic(bootstrap_index, &sam.name, &indy_descriptor)?;
    builder.emit(Instruction::Invokedynamic(indy_index))?;
    Ok(Type::reference(interface_name.clone()))
}

pub(crate) fn compile_method_reference(
    _ctx: &mut ClassContext,
    _builder: &mut MethodBuilder,
    _vars: &VarScope,
    _target: &javac_ast::MethodReferenceTarget,
    method_name: &str,
) -> Result<Type> {
    Err(Error::UnsupportedFeature {
        span: SPAN(),
        feature: format!(
            "method reference `::{method_name}` (no statically known functional-interface target is carried by this AST node)"
        ),
    })
}

fn body_references_this(body: &LambdaBody) -> bool {
    match body {
        LambdaBody::Expr(expr) => expr_references_this(expr),
        LambdaBody::Block(stmts) => stmts.iter().any(stmt_references_this),
    }
}

fn expr_references_this(expr: &Expr) -> bool {
    match expr {
        Expr::This => true,
        Expr::Name(_) | Expr::Literal(_) | Expr::Super => false,
        Expr::FieldAccess { target, .. } => expr_references_this(target),
        Expr::ArrayAccess { array, index } => expr_references_this(array) || expr_references_this(index),
        Expr::Binary { left, right, .. } => expr_references_this(left) || expr_references_this(right),
        Expr::Unary { operand, .. } => expr_references_this(operand),
        Expr::Assign { target, value, .. } => expr_references_this(target) || expr_references_this(value),
        Expr::Cast { operand, .. } => expr_references_this(operand),
        Expr::InstanceOf { operand, .. } => expr_references_this(operand),
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => expr_references_this(condition) || expr_references_this(then_expr) || expr_references_this(else_expr),
        Expr::MethodCall { target, arguments, .. } => {
            // An unqualified call (`foo()`) implicitly dispatches on `this` unless it turns out to
            // resolve to a static method; conservatively treat it as a `this` reference.
            target.as_deref().map_or(true, expr_references_this) || arguments.iter().any(expr_references_this)
        }
        Expr::New { arguments, .. } => arguments.iter().any(expr_references_this),
        Expr::NewArray {
            dimensions, initializer, ..
        } => dimensions.iter().any(expr_references_this) || initializer.iter().flatten().any(expr_references_this),
        Expr::Lambda { .. } | Expr::MethodReference { .. } => false,
    }
}

fn stmt_references_this(stmt: &javac_ast::Stmt) -> bool {
    use javac_ast::Stmt;
    match stmt {
        Stmt::Expr(expr) | Stmt::Throw(expr) => expr_references_this(expr),
        Stmt::LocalVarDecl { initializer, .. } => initializer.as_ref().is_some_and(expr_references_this),
        Stmt::Block(stmts) => stmts.iter().any(stmt_references_this),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            expr_references_this(condition)
                || stmt_references_this(then_branch)
                || else_branch.as_deref().is_some_and(stmt_references_this)
        }
        Stmt::While { condition, body, .. } => expr_references_this(condition) || stmt_references_this(body),
        Stmt::DoWhile { body, condition, .. } => stmt_references_this(body) || expr_references_this(condition),
        Stmt::For {
            init,
            condition,
            update,
            body,
            ..
        } => {
            init.iter().any(stmt_references_this)
                || condition.as_ref().is_some_and(expr_references_this)
                || update.iter().any(expr_references_this)
                || stmt_references_this(body)
        }
        Stmt::ForEach { iterable, body, .. } => expr_references_this(iterable) || stmt_references_this(body),
        Stmt::Switch { selector, cases, .. } => {
            expr_references_this(selector) || cases.iter().any(|c| c.body.iter().any(stmt_references_this))
        }
        Stmt::Return(expr) => expr.as_ref().is_some_and(expr_references_this),
        Stmt::Try { body, catches, finally } => {
            body.iter().any(stmt_references_this)
                || catches.iter().any(|c| c.body.iter().any(stmt_references_this))
                || finally.iter().flatten().any(stmt_references_this)
        }
        Stmt::Labeled(_, inner) => stmt_references_this(inner),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty => false,
    }
}
