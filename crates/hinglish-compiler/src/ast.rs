//! ast.rs — Arbre syntaxique Hinglish
//!
//! `Display` rend la notation de débogage historique du projet
//! (`VarDecl(ank, x, Literal(5))`, `If(Binary(Variable(x), <, Literal(10)), ...)`),
//! utilisée par `hpc --dump-ast` et par les tests.

use std::fmt;

/// Types déclarables dans la source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// `ank` → `int`
    Ank,
    /// `sankhya` → `float`
    Sankhya,
    /// `vakya` → `char*`
    Vakya,
    /// `akshar` → `char`
    Akshar,
}

impl TypeName {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ank => "ank",
            Self::Sankhya => "sankhya",
            Self::Vakya => "vakya",
            Self::Akshar => "akshar",
        }
    }

    pub fn c_type(self) -> &'static str {
        match self {
            Self::Ank => "int",
            Self::Sankhya => "float",
            Self::Vakya => "char*",
            Self::Akshar => "char",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` → `void` (sauf `main`, qui rend toujours `int`).
    pub ret: Option<TypeName>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl { ty: TypeName, name: String, init: Option<Expr> },
    Function(Function),
    Block(Vec<Stmt>),
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    While { cond: Expr, body: Box<Stmt> },
    For { init: Box<Stmt>, cond: Option<Expr>, incr: Option<Expr>, body: Box<Stmt> },
    Print(Expr),
    Return(Option<Expr>),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Ne | Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "aur",
            Self::Or => "ya",
        }
    }

    pub fn c_symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "nahi",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable(String),
    Assign { name: String, value: Box<Expr> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Logical { op: LogicalOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Unary { op: UnaryOp, rhs: Box<Expr> },
    Grouping(Box<Expr>),
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

/* ───────────────────────── Rendu de débogage ───────────────────────── */

struct List<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for List<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

struct Opt<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program({})", List(self.items.as_slice()))
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({}, {})", self.ty, self.name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FuncDecl({}, {}, {}, Block({}))",
            self.name,
            List(self.params.as_slice()),
            Opt(self.ret.as_ref()),
            List(self.body.as_slice())
        )
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarDecl { ty, name, init } => write!(f, "VarDecl({ty}, {name}, {})", Opt(init.as_ref())),
            Self::Function(func) => write!(f, "{func}"),
            Self::Block(stmts) => write!(f, "Block({})", List(stmts.as_slice())),
            Self::If { cond, then_branch, else_branch } => {
                write!(f, "If({cond}, {then_branch}, {})", Opt(else_branch.as_deref()))
            }
            Self::While { cond, body } => write!(f, "While({cond}, {body})"),
            Self::For { init, cond, incr, body } => {
                write!(f, "For({init}, {}, {}, {body})", Opt(cond.as_ref()), Opt(incr.as_ref()))
            }
            Self::Print(e) => write!(f, "Print({e})"),
            Self::Return(v) => write!(f, "Return({})", Opt(v.as_ref())),
            Self::Expr(e) => write!(f, "ExprStmt({e})"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "Literal({lit})"),
            Self::Variable(name) => write!(f, "Variable({name})"),
            Self::Assign { name, value } => write!(f, "Assign({name}, {value})"),
            Self::Binary { op, lhs, rhs } => write!(f, "Binary({lhs}, {}, {rhs})", op.symbol()),
            Self::Logical { op, lhs, rhs } => write!(f, "Logical({lhs}, {}, {rhs})", op.keyword()),
            Self::Unary { op, rhs } => write!(f, "Unary({}, {rhs})", op.keyword()),
            Self::Grouping(e) => write!(f, "Grouping({e})"),
            Self::Call { callee, args } => write!(f, "Call({callee}, {})", List(args.as_slice())),
        }
    }
}
