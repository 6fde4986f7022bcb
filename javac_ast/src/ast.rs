//! The typed abstract syntax tree consumed by the resolver and code generator.
//!
//! Shapes follow the Java 8 grammar restricted to the constructs this compiler actually
//! translates (see the governing specification's Non-goals): no inner-class capture, anonymous
//! classes, try-with-resources, multi-catch, assertions, or synchronized blocks.

use crate::span::Span;
use crate::ty::Type;
use serde::{Deserialize, Serialize};

/// A modifier set shared by classes, fields, and methods. Not every flag applies to every
/// declaration kind; the resolver/codegen stages validate which combinations are legal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub public: bool,
    pub private: bool,
    pub protected: bool,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub synthetic: bool,
}

impl Modifiers {
    #[must_use]
    pub fn public() -> Modifiers {
        Modifiers {
            public: true,
            ..Modifiers::default()
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

/// One parsed and resolved-AST-shaped source file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<ClassDecl>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Import {
    /// Fully qualified name, e.g. `java.util.List` or `java.util.*` for on-demand imports.
    pub qualified_name: String,
    pub on_demand: bool,
}

/// A top-level, static-nested, or enum class declaration. Non-static inner classes and
/// anonymous classes are out of scope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    /// Simple name; the enclosing class's binary name, if any, is tracked by the resolver so
    /// that `Outer$Inner` naming and `InnerClasses` entries can be produced.
    pub name: String,
    pub superclass: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    /// Enum constants, in declaration order; empty unless `kind == Enum`.
    pub enum_constants: Vec<EnumConstant>,
    pub nested: Vec<ClassDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub ty: Type,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    /// `<init>` for constructors, `<clinit>` for the static initializer, otherwise the source name.
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    /// `true` if the last parameter is a Java varargs parameter (erased to an array).
    pub is_varargs: bool,
    pub throws: Vec<Type>,
    /// `None` for abstract/interface methods without a body.
    pub body: Option<Vec<Stmt>>,
    pub span: Span,
}

impl MethodDecl {
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    LocalVarDecl {
        name: String,
        ty: Type,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        label: Option<String>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        label: Option<String>,
    },
    For {
        init: Vec<Stmt>,
        condition: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
        label: Option<String>,
    },
    /// `for (T x : expr) body`, desugared by the code generator into an index- or
    /// iterator-based `For`/`While` depending on whether `expr`'s static type is an array.
    ForEach {
        var_name: String,
        var_type: Type,
        iterable: Expr,
        body: Box<Stmt>,
        label: Option<String>,
    },
    Switch {
        selector: Expr,
        cases: Vec<SwitchCase>,
        label: Option<String>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Return(Option<Expr>),
    Throw(Expr),
    Try {
        body: Vec<Stmt>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<Stmt>>,
    },
    Labeled(String, Box<Stmt>),
    Empty,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` marks the `default:` case.
    pub labels: Vec<Option<ConstExpr>>,
    pub body: Vec<Stmt>,
    /// `true` when this case falls through to the next one (no `break`).
    pub falls_through: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatchClause {
    pub exception_type: Type,
    pub var_name: String,
    pub body: Vec<Stmt>,
}

/// A compile-time constant usable as a `switch` label: an integer/char literal, a `String`
/// literal, or an enum constant's simple name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConstExpr {
    Int(i32),
    String(String),
    EnumConstant(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    And,
    Or,
    Xor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Null,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LambdaParam {
    pub name: String,
    pub ty: Option<Type>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    /// A simple or qualified name the resolver must classify as a local, a field, or a type.
    Name(String),
    This,
    Super,
    FieldAccess {
        target: Box<Expr>,
        name: String,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        /// `None` for plain `=`; `Some(op)` for compound assignment (`+=`, `&=`, ...).
        compound_op: Option<BinaryOp>,
        value: Box<Expr>,
    },
    Cast {
        ty: Type,
        operand: Box<Expr>,
    },
    InstanceOf {
        operand: Box<Expr>,
        ty: Type,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    MethodCall {
        /// `None` for an unqualified call (`foo()`), resolved against the enclosing class.
        target: Option<Box<Expr>>,
        name: String,
        arguments: Vec<Expr>,
    },
    New {
        ty: Type,
        arguments: Vec<Expr>,
    },
    NewArray {
        element_type: Type,
        dimensions: Vec<Expr>,
        initializer: Option<Vec<Expr>>,
    },
    /// A lambda expression; the code generator desugars this into a synthetic carrier method
    /// plus an `invokedynamic` call site bound through a metafactory bootstrap.
    Lambda {
        params: Vec<LambdaParam>,
        body: LambdaBody,
        /// The functional interface type this lambda is being assigned/passed as, once known.
        target_type: Option<Type>,
    },
    /// `Type::method` or `instance::method`, desugared the same way as an explicit lambda.
    MethodReference {
        target: MethodReferenceTarget,
        method_name: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MethodReferenceTarget {
    Type(Type),
    Instance(Box<Expr>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypedExpr {
    pub expr: Expr,
    pub ty: Type,
    pub span: Span,
}
