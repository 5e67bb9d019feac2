use crate::api::CALL_VARIABLES;
use crate::parser::{BinaryOp, ComparisonOp, Expr, ExprKind, Literal, UnaryOp};
use crate::stdlib::{REGISTRY, Registry};

use super::error::{ValidationError, ValidationErrorKind};
use super::payoff_expr::{ArithOp, CompareOp, Constant, Node, NodeKind, PayoffExpr, SignOp};

/// Validate a parsed expression against the standard registry.
pub fn validate(expr: &Expr, src: &str) -> Result<PayoffExpr, ValidationError> {
    validate_with_registry(expr, src, &REGISTRY)
}

/// Validate a parsed expression, resolving names against `registry`.
///
/// Every node is checked before its children. The first offending construct
/// is reported and no partial result is produced.
pub fn validate_with_registry(
    expr: &Expr,
    src: &str,
    registry: &Registry,
) -> Result<PayoffExpr, ValidationError> {
    let validator = Validator { registry, src };
    let root = validator.node(expr)?;
    tracing::debug!(expression = %root, "validated payoff expression");
    Ok(PayoffExpr {
        src: src.to_string(),
        root,
    })
}

struct Validator<'a> {
    registry: &'a Registry,
    src: &'a str,
}

impl Validator<'_> {
    fn reject(&self, kind: ValidationErrorKind, expr: &Expr) -> ValidationError {
        ValidationError::new(kind, self.src.to_string(), expr.span.clone())
    }

    fn disallowed_node(&self, expr: &Expr) -> ValidationError {
        self.reject(
            ValidationErrorKind::DisallowedNode {
                node: expr.kind_name(),
            },
            expr,
        )
    }

    fn disallowed_operator(&self, op: &'static str, expr: &Expr) -> ValidationError {
        self.reject(ValidationErrorKind::DisallowedOperator { op }, expr)
    }

    fn boxed(&self, expr: &Expr) -> Result<Box<Node>, ValidationError> {
        self.node(expr).map(Box::new)
    }

    fn all(&self, exprs: &[Expr]) -> Result<Vec<Node>, ValidationError> {
        exprs.iter().map(|expr| self.node(expr)).collect()
    }

    // No wildcard arm: a new parser node kind must be classified here.
    fn node(&self, expr: &Expr) -> Result<Node, ValidationError> {
        let kind = match &expr.kind {
            ExprKind::Literal(Literal::Number(n)) => NodeKind::Literal(Constant::Number(*n)),
            ExprKind::Literal(Literal::Bool(b)) => NodeKind::Literal(Constant::Bool(*b)),
            ExprKind::Literal(Literal::Str(_)) | ExprKind::Literal(Literal::None) => {
                return Err(self.disallowed_node(expr));
            }

            ExprKind::Ident(name) => {
                if !CALL_VARIABLES.contains(&name.as_str()) && !self.registry.contains(name) {
                    let mut names = CALL_VARIABLES.to_vec();
                    names.extend(self.registry.names());
                    return Err(self
                        .reject(
                            ValidationErrorKind::UnknownIdentifier { name: name.clone() },
                            expr,
                        )
                        .with_suggestions(names));
                }
                NodeKind::Identifier(name.clone())
            }

            ExprKind::Unary { op, operand } => {
                let op = match op {
                    UnaryOp::Pos => SignOp::Plus,
                    UnaryOp::Neg => SignOp::Minus,
                    UnaryOp::Not | UnaryOp::Invert => {
                        return Err(self.disallowed_operator(op.symbol(), expr));
                    }
                };
                NodeKind::UnaryOp {
                    op,
                    operand: self.boxed(operand)?,
                }
            }

            ExprKind::Binary { op, left, right } => {
                let op = match op {
                    BinaryOp::Add => ArithOp::Add,
                    BinaryOp::Sub => ArithOp::Sub,
                    BinaryOp::Mul => ArithOp::Mul,
                    BinaryOp::Div => ArithOp::Div,
                    BinaryOp::Mod => ArithOp::Mod,
                    BinaryOp::Pow => ArithOp::Pow,
                    BinaryOp::FloorDiv
                    | BinaryOp::MatMul
                    | BinaryOp::BitOr
                    | BinaryOp::BitXor
                    | BinaryOp::BitAnd
                    | BinaryOp::LShift
                    | BinaryOp::RShift => {
                        return Err(self.disallowed_operator(op.symbol(), expr));
                    }
                };
                NodeKind::BinaryOp {
                    op,
                    left: self.boxed(left)?,
                    right: self.boxed(right)?,
                }
            }

            ExprKind::Bool { op, operands } => NodeKind::BoolOp {
                op: *op,
                operands: self.all(operands)?,
            },

            ExprKind::Compare {
                left,
                ops,
                comparators,
            } => {
                let ops = ops
                    .iter()
                    .map(|op| match op {
                        ComparisonOp::Eq => Ok(CompareOp::Eq),
                        ComparisonOp::NotEq => Ok(CompareOp::NotEq),
                        ComparisonOp::Lt => Ok(CompareOp::Lt),
                        ComparisonOp::LtE => Ok(CompareOp::LtE),
                        ComparisonOp::Gt => Ok(CompareOp::Gt),
                        ComparisonOp::GtE => Ok(CompareOp::GtE),
                        ComparisonOp::In
                        | ComparisonOp::NotIn
                        | ComparisonOp::Is
                        | ComparisonOp::IsNot => Err(self.disallowed_operator(op.symbol(), expr)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                NodeKind::Compare {
                    left: self.boxed(left)?,
                    ops,
                    comparators: self.all(comparators)?,
                }
            }

            ExprKind::If {
                test,
                then_branch,
                else_branch,
            } => NodeKind::Conditional {
                test: self.boxed(test)?,
                then_branch: self.boxed(then_branch)?,
                else_branch: self.boxed(else_branch)?,
            },

            ExprKind::Call {
                callee,
                args,
                keywords,
            } => {
                let ExprKind::Ident(name) = &callee.kind else {
                    return Err(self.reject(
                        ValidationErrorKind::DisallowedCallTarget {
                            target: callee.kind_name(),
                        },
                        callee,
                    ));
                };
                if self.registry.function(name).is_none() {
                    return Err(self
                        .reject(
                            ValidationErrorKind::NotAFunction { name: name.clone() },
                            callee,
                        )
                        .with_suggestions(self.registry.function_names()));
                }
                let args = self.all(args)?;
                let keywords = keywords
                    .iter()
                    .map(|keyword| Ok((keyword.name.clone(), self.node(&keyword.value)?)))
                    .collect::<Result<Vec<_>, ValidationError>>()?;
                NodeKind::Call {
                    function: name.clone(),
                    args,
                    keywords,
                }
            }

            ExprKind::Attribute { .. }
            | ExprKind::Subscript { .. }
            | ExprKind::Lambda { .. }
            | ExprKind::Named { .. }
            | ExprKind::List(_)
            | ExprKind::Tuple(_)
            | ExprKind::Set(_)
            | ExprKind::Dict(_) => return Err(self.disallowed_node(expr)),
        };
        Ok(Node::new(kind, expr.span.clone()))
    }
}
