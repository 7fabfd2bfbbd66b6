use crate::span::{Span, Spanned};

/// One parsed program: the import block, at most one application class with
/// its member implementations, and (for non-class programs) top-level
/// functions and statements.
#[derive(Debug)]
pub struct Program {
    pub imports: Vec<Spanned<ImportDecl>>,
    pub class: Option<Spanned<ClassDecl>>,
    pub implementations: Vec<Spanned<MemberImpl>>,
    pub functions: Vec<Spanned<FunctionDecl>>,
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Colon-delimited package and class segments, as written.
    pub path: Vec<Spanned<String>>,
    /// True for `import PKG:SUB:*;`.
    pub wildcard: bool,
}

impl ImportDecl {
    pub fn full_path(&self) -> String {
        let joined = self
            .path
            .iter()
            .map(|s| s.node.as_str())
            .collect::<Vec<_>>()
            .join(":");
        if self.wildcard { format!("{joined}:*") } else { joined }
    }

    /// Package segments: the path minus the class-name (or wildcard) tail.
    pub fn package(&self) -> Vec<&str> {
        if self.wildcard {
            self.path.iter().map(|s| s.node.as_str()).collect()
        } else {
            self.path[..self.path.len().saturating_sub(1)]
                .iter()
                .map(|s| s.node.as_str())
                .collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    pub extends: Option<Spanned<TypePath>>,
    pub sections: Vec<MemberSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// One visibility section of a class header. Sections group declarations
/// only; they are not scopes.
#[derive(Debug, Clone)]
pub struct MemberSection {
    pub visibility: Visibility,
    pub members: Vec<Spanned<MemberDecl>>,
}

#[derive(Debug, Clone)]
pub enum MemberDecl {
    Method(MethodDecl),
    Property(PropertyDecl),
    Instance(InstanceDecl),
    Constant(ConstantDecl),
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub returns: Option<Spanned<TypePath>>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub ty: Spanned<TypePath>,
    pub name: Spanned<String>,
    pub has_get: bool,
    pub has_set: bool,
    pub readonly: bool,
}

/// `instance Type &name;` — the name keeps its `&` sigil.
#[derive(Debug, Clone)]
pub struct InstanceDecl {
    pub ty: Spanned<TypePath>,
    pub names: Vec<Spanned<String>>,
}

/// `constant &NAME = literal;`
#[derive(Debug, Clone)]
pub struct ConstantDecl {
    pub name: Spanned<String>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Option<Spanned<TypePath>>,
    pub is_out: bool,
}

/// A (possibly qualified) type or class reference: `number`, `MyClass`,
/// `PKG:SUB:MyClass`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePath {
    pub segments: Vec<Spanned<String>>,
}

impl TypePath {
    pub fn full_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.node.as_str())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// True for `PKG:SUB:Class`-style references that need an import.
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn span(&self) -> Span {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::dummy(),
        }
    }
}

/// A class-body implementation block.
#[derive(Debug, Clone)]
pub enum MemberImpl {
    /// `method Name ... end-method;`
    Method(MethodImpl),
    /// `get Name ... end-get;`
    Getter(AccessorImpl),
    /// `set Name ... end-set;`
    Setter(AccessorImpl),
}

impl MemberImpl {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            MemberImpl::Method(m) => &m.name,
            MemberImpl::Getter(a) | MemberImpl::Setter(a) => &a.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodImpl {
    pub name: Spanned<String>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct AccessorImpl {
    pub name: Spanned<String>,
    pub body: Spanned<Block>,
}

/// `Function Name(params) [Returns Type] ... End-Function;` in a non-class
/// program.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub returns: Option<Spanned<TypePath>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `Local Type &a, &b = expr;`
    LocalDecl {
        ty: Spanned<TypePath>,
        names: Vec<Spanned<String>>,
        init: Option<Spanned<Expr>>,
    },
    Assign {
        target: Spanned<Expr>,
        value: Spanned<Expr>,
    },
    If {
        condition: Spanned<Expr>,
        then_block: Spanned<Block>,
        else_block: Option<Spanned<Block>>,
    },
    For {
        var: Spanned<String>,
        from: Spanned<Expr>,
        to: Spanned<Expr>,
        step: Option<Spanned<Expr>>,
        body: Spanned<Block>,
    },
    While {
        condition: Spanned<Expr>,
        body: Spanned<Block>,
    },
    Return(Option<Spanned<Expr>>),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    NumberLit(f64),
    StringLit(String),
    BoolLit(bool),
    Null,
    /// `&name`, sigil included.
    UserVar(String),
    /// `%This`, `%Session`, ... sigil included.
    SystemVar(String),
    /// A bare name: a function, a method of the current class, a property.
    Ident(String),
    /// A qualified static reference, `PKG:SUB:Class`.
    Path(TypePath),
    Create {
        path: Spanned<TypePath>,
        args: Vec<Spanned<Expr>>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Member {
        object: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Concat,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}
