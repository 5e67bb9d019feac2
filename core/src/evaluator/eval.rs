//! Core evaluation logic.

use bumpalo::Bump;

use crate::{
    api::{Binding, Environment, EvaluatorOptions},
    evaluator::{
        ExecutionError, ExecutionErrorKind,
        ResourceExceededError::*,
        RuntimeError::{self, *},
        operators::{eval_arith, eval_compare},
    },
    parser::BoolOp,
    validator::{CompareOp, Constant, Node, NodeKind, PayoffExpr, SignOp},
    values::{Value, map_numbers, map_truth},
};

/// Evaluator for validated payoff expressions.
pub struct Evaluator<'e, 'a> {
    options: EvaluatorOptions,
    arena: &'a Bump,
    env: &'e Environment<'a>,
    /// The expression being evaluated (used for error context).
    expr: &'e PayoffExpr,
    depth: usize,
}

impl<'e, 'a> Evaluator<'e, 'a> {
    pub fn new(
        options: EvaluatorOptions,
        arena: &'a Bump,
        expr: &'e PayoffExpr,
        env: &'e Environment<'a>,
    ) -> Self {
        Self {
            options,
            arena,
            env,
            expr,
            depth: 0,
        }
    }

    fn error(&self, node: &Node, kind: impl Into<ExecutionErrorKind>) -> ExecutionError {
        ExecutionError::new(kind.into(), self.expr.src.clone(), node.span.clone())
    }

    /// Evaluate the whole expression.
    pub fn eval(&mut self) -> Result<Value<'a>, ExecutionError> {
        let expr = self.expr;
        self.eval_node(&expr.root)
    }

    fn eval_node(&mut self, node: &'e Node) -> Result<Value<'a>, ExecutionError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                node,
                StackOverflow {
                    depth: self.depth,
                    max_depth: self.options.max_depth,
                },
            ));
        }

        self.depth += 1;
        let result = self.eval_node_inner(node);
        self.depth -= 1;

        result
    }

    fn eval_node_inner(&mut self, node: &'e Node) -> Result<Value<'a>, ExecutionError> {
        match &node.kind {
            NodeKind::Literal(constant) => Ok(match *constant {
                Constant::Number(n) => Value::Number(n),
                Constant::Bool(b) => Value::Bool(b),
            }),

            NodeKind::Identifier(name) => match self.env.lookup(name) {
                Some(Binding::Value(value)) => Ok(value),
                Some(Binding::Function(_)) => Err(self.error(
                    node,
                    FunctionAsValue {
                        name: name.clone(),
                    },
                )),
                None => Err(self.error(node, UndefinedName { name: name.clone() })),
            },

            NodeKind::UnaryOp { op, operand } => {
                let value = self.eval_node(operand)?;
                let op = *op;
                map_numbers(self.arena, [value], |[x]| {
                    Ok::<_, RuntimeError>(match op {
                        SignOp::Plus => x,
                        SignOp::Minus => -x,
                    })
                })
                .map_err(|e| self.error(node, e))
            }

            NodeKind::BinaryOp { op, left, right } => {
                let left = self.eval_node(left)?;
                let right = self.eval_node(right)?;
                let op = *op;
                map_numbers(self.arena, [left, right], |[a, b]| {
                    Ok::<_, RuntimeError>(eval_arith(op, a, b))
                })
                .map_err(|e| self.error(node, e))
            }

            NodeKind::BoolOp { op, operands } => self.eval_bool_op(node, *op, operands),

            NodeKind::Compare {
                left,
                ops,
                comparators,
            } => self.eval_compare_chain(node, left, ops, comparators),

            NodeKind::Conditional {
                test,
                then_branch,
                else_branch,
            } => {
                let test = self.eval_node(test)?;
                match test.truthy() {
                    Some(true) => self.eval_node(then_branch),
                    Some(false) => self.eval_node(else_branch),
                    // A vector test selects per path from both branches.
                    None => {
                        let then_value = self.eval_node(then_branch)?;
                        let else_value = self.eval_node(else_branch)?;
                        map_numbers(self.arena, [test, then_value, else_value], |[c, a, b]| {
                            Ok::<_, RuntimeError>(if c != 0.0 { a } else { b })
                        })
                        .map_err(|e| self.error(node, e))
                    }
                }
            }

            NodeKind::Call {
                function,
                args,
                keywords,
            } => {
                let Some(callee) = self.env.function(function) else {
                    let kind = match self.env.lookup(function) {
                        Some(_) => NotAFunction {
                            name: function.clone(),
                        },
                        None => UndefinedName {
                            name: function.clone(),
                        },
                    };
                    return Err(self.error(node, kind));
                };

                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_node(arg)?);
                }
                let mut keyword_values = Vec::with_capacity(keywords.len());
                for (name, value) in keywords {
                    keyword_values.push((name.as_str(), self.eval_node(value)?));
                }

                callee
                    .bind(&arg_values, &keyword_values)
                    .and_then(|bound| callee.call(self.arena, &bound))
                    .map_err(|e| self.error(node, e))
            }
        }
    }

    /// `and`/`or` over two or more operands.
    ///
    /// While the accumulated value is a scalar this short-circuits and returns
    /// an operand, as Python does. Once a vector is involved the remaining
    /// operands are all evaluated and combined elementwise into a mask.
    fn eval_bool_op(
        &mut self,
        node: &'e Node,
        op: BoolOp,
        operands: &'e [Node],
    ) -> Result<Value<'a>, ExecutionError> {
        let Some((first, rest)) = operands.split_first() else {
            return Ok(Value::Bool(op == BoolOp::And));
        };

        let mut acc = self.eval_node(first)?;
        for operand in rest {
            match acc.truthy() {
                Some(truth) => {
                    let decided = match op {
                        BoolOp::And => !truth,
                        BoolOp::Or => truth,
                    };
                    if decided {
                        return Ok(acc);
                    }
                    acc = self.eval_node(operand)?;
                }
                None => {
                    let value = self.eval_node(operand)?;
                    acc = map_truth(self.arena, [acc, value], |[a, b]| match op {
                        BoolOp::And => a != 0.0 && b != 0.0,
                        BoolOp::Or => a != 0.0 || b != 0.0,
                    })
                    .map_err(|e| self.error(node, RuntimeError::from(e)))?;
                }
            }
        }
        Ok(acc)
    }

    /// `a < b <= c` as `(a < b) and (b <= c)` with `b` evaluated once.
    fn eval_compare_chain(
        &mut self,
        node: &'e Node,
        left: &'e Node,
        ops: &[CompareOp],
        comparators: &'e [Node],
    ) -> Result<Value<'a>, ExecutionError> {
        let mut left = self.eval_node(left)?;
        let mut acc: Option<Value<'a>> = None;

        for (op, comparator) in ops.iter().zip(comparators) {
            let right = self.eval_node(comparator)?;
            let op = *op;
            let link = map_truth(self.arena, [left, right], |[a, b]| eval_compare(op, a, b))
                .map_err(|e| self.error(node, RuntimeError::from(e)))?;

            let combined = match acc {
                None => link,
                Some(prev) => map_truth(self.arena, [prev, link], |[a, b]| a != 0.0 && b != 0.0)
                    .map_err(|e| self.error(node, RuntimeError::from(e)))?,
            };
            if combined == Value::Bool(false) {
                return Ok(combined);
            }
            acc = Some(combined);
            left = right;
        }

        Ok(acc.unwrap_or(Value::Bool(true)))
    }
}
