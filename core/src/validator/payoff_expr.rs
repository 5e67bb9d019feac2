use core::fmt;

use crate::parser::{BoolOp, Span};

/// A validated payoff expression.
///
/// Only the eight node kinds and the operators a payoff may use can be
/// represented, so anything holding a `PayoffExpr` went through validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffExpr {
    /// The expression text, for error reporting.
    pub src: String,
    pub root: Node,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Constant),
    Identifier(String),
    UnaryOp {
        op: SignOp,
        operand: Box<Node>,
    },
    BinaryOp {
        op: ArithOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    BoolOp {
        op: BoolOp,
        operands: Vec<Node>,
    },
    Compare {
        left: Box<Node>,
        ops: Vec<CompareOp>,
        comparators: Vec<Node>,
    },
    Conditional {
        test: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Call {
        function: String,
        args: Vec<Node>,
        keywords: Vec<(String, Node)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Number(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl SignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            SignOp::Plus => "+",
            SignOp::Minus => "-",
        }
    }
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::Pow => "**",
        }
    }
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtE => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtE => ">=",
        }
    }
}

impl fmt::Display for PayoffExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Same prefix form as the parser's tree, e.g. `(call maximum (- S_T K) 0)`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Literal(Constant::Number(n)) => write!(f, "{}", n),
            NodeKind::Literal(Constant::Bool(b)) => f.write_str(if *b { "True" } else { "False" }),
            NodeKind::Identifier(name) => f.write_str(name),
            NodeKind::UnaryOp { op, operand } => write!(f, "({} {})", op.symbol(), operand),
            NodeKind::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", op.symbol(), left, right)
            }
            NodeKind::BoolOp { op, operands } => {
                write!(f, "({}", op)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                f.write_str(")")
            }
            NodeKind::Compare {
                left,
                ops,
                comparators,
            } => {
                write!(f, "(cmp {}", left)?;
                for (op, right) in ops.iter().zip(comparators) {
                    write!(f, " {} {}", op.symbol(), right)?;
                }
                f.write_str(")")
            }
            NodeKind::Conditional {
                test,
                then_branch,
                else_branch,
            } => write!(f, "(if {} {} {})", test, then_branch, else_branch),
            NodeKind::Call {
                function,
                args,
                keywords,
            } => {
                write!(f, "(call {}", function)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                for (name, value) in keywords {
                    write!(f, " {}={}", name, value)?;
                }
                f.write_str(")")
            }
        }
    }
}
