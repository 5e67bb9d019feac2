use core::fmt;

use super::syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};

/// A node of the syntax tree produced by the parser.
///
/// The parser recognises a wider grammar than payoff expressions may use.
/// Constructs such as attribute access or string literals are represented
/// here so that the validator can reject them with a precise diagnosis.
///
/// Equality is structural: spans are not compared.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a and b and c`, flattened. Always holds two or more operands.
    Bool {
        op: BoolOp,
        operands: Vec<Expr>,
    },
    /// `a < b <= c`: `ops.len() == comparators.len()`.
    Compare {
        left: Box<Expr>,
        ops: Vec<ComparisonOp>,
        comparators: Vec<Expr>,
    },
    /// `then_branch if test else else_branch`
    If {
        test: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    /// `target := value`
    Named {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Str(String),
    None,
}

/// A `name=value` argument of a call.
#[derive(Debug, Clone)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Short human-readable name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(Literal::Number(_)) => "number literal",
            ExprKind::Literal(Literal::Bool(_)) => "boolean literal",
            ExprKind::Literal(Literal::Str(_)) => "string literal",
            ExprKind::Literal(Literal::None) => "None literal",
            ExprKind::Ident(_) => "identifier",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Bool { .. } => "boolean operation",
            ExprKind::Compare { .. } => "comparison",
            ExprKind::If { .. } => "conditional expression",
            ExprKind::Call { .. } => "function call",
            ExprKind::Attribute { .. } => "attribute access",
            ExprKind::Subscript { .. } => "subscript",
            ExprKind::Lambda { .. } => "lambda",
            ExprKind::Named { .. } => "assignment expression",
            ExprKind::List(_) => "list display",
            ExprKind::Tuple(_) => "tuple display",
            ExprKind::Set(_) => "set display",
            ExprKind::Dict(_) => "dict display",
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

/// Renders the tree as a fully parenthesised prefix form, e.g. `(+ a (* b c))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(Literal::Number(n)) => write!(f, "{}", n),
            ExprKind::Literal(Literal::Bool(b)) => f.write_str(if *b { "True" } else { "False" }),
            ExprKind::Literal(Literal::Str(s)) => write!(f, "{:?}", s),
            ExprKind::Literal(Literal::None) => f.write_str("None"),
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Unary { op, operand } => write!(f, "({} {})", op, operand),
            ExprKind::Binary { op, left, right } => write!(f, "({} {} {})", op, left, right),
            ExprKind::Bool { op, operands } => {
                write!(f, "({}", op)?;
                write_all(f, operands)?;
                f.write_str(")")
            }
            ExprKind::Compare {
                left,
                ops,
                comparators,
            } => {
                write!(f, "(cmp {}", left)?;
                for (op, right) in ops.iter().zip(comparators) {
                    write!(f, " {} {}", op, right)?;
                }
                f.write_str(")")
            }
            ExprKind::If {
                test,
                then_branch,
                else_branch,
            } => write!(f, "(if {} {} {})", test, then_branch, else_branch),
            ExprKind::Call {
                callee,
                args,
                keywords,
            } => {
                write!(f, "(call {}", callee)?;
                write_all(f, args)?;
                for keyword in keywords {
                    write!(f, " {}={}", keyword.name, keyword.value)?;
                }
                f.write_str(")")
            }
            ExprKind::Attribute { value, attr } => write!(f, "(. {} {})", value, attr),
            ExprKind::Subscript { value, index } => write!(f, "([] {} {})", value, index),
            ExprKind::Lambda { params, body } => {
                write!(f, "(lambda ({}) {})", params.join(" "), body)
            }
            ExprKind::Named { target, value } => write!(f, "(:= {} {})", target, value),
            ExprKind::List(items) => {
                f.write_str("(list")?;
                write_all(f, items)?;
                f.write_str(")")
            }
            ExprKind::Tuple(items) => {
                f.write_str("(tuple")?;
                write_all(f, items)?;
                f.write_str(")")
            }
            ExprKind::Set(items) => {
                f.write_str("(set")?;
                write_all(f, items)?;
                f.write_str(")")
            }
            ExprKind::Dict(entries) => {
                f.write_str("(dict")?;
                for (key, value) in entries {
                    write!(f, " {}:{}", key, value)?;
                }
                f.write_str(")")
            }
        }
    }
}
