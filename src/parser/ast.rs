// AST (Abstract Syntax Tree) definitions for the front end

use crate::types::value::Scalar;
use crate::types::var_type::VarType;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Base types of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    Void,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Float => write!(f, "float"),
            BaseType::Void => write!(f, "void"),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus, // +x
    Neg,  // -x
    Not,  // !x
}

/// An expression node.
///
/// `ty` is empty straight out of the parser and filled in by the static
/// checker; after a successful check every reachable expression carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
    pub ty: Option<VarType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Variable(String),
    IntLiteral(i32),
    FloatLiteral(f32),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Expr {
            kind,
            location,
            ty: None,
        }
    }

    /// Build an already-typed literal node holding `value`
    pub fn literal(value: Scalar, location: SourceLocation) -> Self {
        let kind = match value {
            Scalar::Int(n) => ExprKind::IntLiteral(n),
            Scalar::Float(x) => ExprKind::FloatLiteral(x),
        };
        Expr {
            kind,
            location,
            ty: Some(VarType::constant(value)),
        }
    }

    /// The value of this node if it is an int or float literal
    pub fn literal_value(&self) -> Option<Scalar> {
        match self.kind {
            ExprKind::IntLiteral(n) => Some(Scalar::Int(n)),
            ExprKind::FloatLiteral(x) => Some(Scalar::Float(x)),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal_value().is_some()
    }
}

/// A declared type as written in source: base type plus dimension expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub base: BaseType,
    pub dims: Vec<Expr>,
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            dims: Vec::new(),
        }
    }
}

/// Variable initializer: a single expression or a brace-delimited list
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    Expr(Expr),
    List(Vec<Initializer>, SourceLocation),
}

/// Variable declaration (one declarator of a declaration list)
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub is_const: bool,
    pub ty: Type,
    pub init: Option<Initializer>,
    pub location: SourceLocation,
    /// Resolved type, recorded by the checker
    pub resolved: Option<VarType>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    /// Written with an empty first bracket pair (`int a[]`, `int a[][3]`)
    pub decays: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: BaseType,
    pub params: Vec<Param>,
    pub body: Block,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<BlockItem>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Decl(Decl),
    Stmt(Stmt),
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty {
        location: SourceLocation,
    },
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    Block(Block),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Empty { location } => location,
            Stmt::Expr { location, .. } => location,
            Stmt::Block(block) => &block.location,
            Stmt::If { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::Break { location } => location,
            Stmt::Continue { location } => location,
            Stmt::Return { location, .. } => location,
        }
    }
}

/// A compilation unit: exactly one global declaration or function definition
#[derive(Debug, Clone, PartialEq)]
pub enum CompUnit {
    Decl(Decl),
    Function(FunctionDef),
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub units: Vec<CompUnit>, // Source order
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Iterate over the function definitions in source order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.units.iter().filter_map(|unit| match unit {
            CompUnit::Function(func) => Some(func),
            CompUnit::Decl(_) => None,
        })
    }

    /// Iterate over the global declarations in source order
    pub fn globals(&self) -> impl Iterator<Item = &Decl> {
        self.units.iter().filter_map(|unit| match unit {
            CompUnit::Decl(decl) => Some(decl),
            CompUnit::Function(_) => None,
        })
    }
}
