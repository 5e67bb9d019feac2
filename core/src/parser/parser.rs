use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use super::error::{ParseError, ParseErrorKind, convert_pest_error};
use super::parsed_expr::{Expr, ExprKind, Keyword, Literal};
use super::syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
use crate::api::ParserOptions;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::walrus, Assoc::Right))       // `:=`
        .op(Op::prefix(Rule::lambda_op))                 // `lambda x:`
        .op(Op::infix(Rule::if_op, Assoc::Right))        // `a if t else b`

        // Logical operators.
        .op(Op::infix(Rule::or, Assoc::Left))            // `or`
        .op(Op::infix(Rule::and, Assoc::Left))           // `and`
        .op(Op::prefix(Rule::not))                       // `not`

        // Comparisons (chained).
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::in_op, Assoc::Left) |
            Op::infix(Rule::not_in, Assoc::Left) |
            Op::infix(Rule::is_op, Assoc::Left) |
            Op::infix(Rule::is_not, Assoc::Left)
        )

        // Bitwise operators.
        .op(Op::infix(Rule::bit_or, Assoc::Left))        // `|`
        .op(Op::infix(Rule::bit_xor, Assoc::Left))       // `^`
        .op(Op::infix(Rule::bit_and, Assoc::Left))       // `&`
        .op(
            Op::infix(Rule::lshift, Assoc::Left) |
            Op::infix(Rule::rshift, Assoc::Left)
        )                                                // `<<`, `>>`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::floor_div, Assoc::Left) |
            Op::infix(Rule::modulo, Assoc::Left) |
            Op::infix(Rule::matmul, Assoc::Left)
        )                                                // `*`, `/`, `//`, `%`, `@`
        .op(
            Op::prefix(Rule::pos) |
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::invert)
        )                                                // `+`, `-`, `~`
        .op(Op::infix(Rule::pow, Assoc::Right))          // `**` (right-assoc)

        // Postfix operators.
        .op(
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::attr_op)
        )
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

/// An expression under construction.
///
/// `sealed` is set for primaries (including parenthesised groups) so that
/// `(a < b) < c` is not merged into the chain `a < b < c`, and `(a and b) and c`
/// stays nested.
struct Node {
    expr: Expr,
    depth: usize,
    sealed: bool,
}

struct Builder<'s> {
    source: &'s str,
    max_depth: usize,
}

impl<'s> Builder<'s> {
    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source.to_string(), span)
    }

    fn custom(&self, message: &str, span: impl Into<Span>) -> ParseError {
        self.error(
            ParseErrorKind::Other {
                message: message.to_string(),
            },
            span.into(),
        )
    }

    fn node(&self, kind: ExprKind, span: Span, depth: usize) -> Result<Node, ParseError> {
        if depth > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth,
                    max_depth: self.max_depth,
                },
                span,
            ));
        }
        Ok(Node {
            expr: Expr::new(kind, span),
            depth,
            sealed: false,
        })
    }

    fn leaf(&self, kind: ExprKind, span: Span) -> Node {
        Node {
            expr: Expr::new(kind, span),
            depth: 1,
            sealed: true,
        }
    }

    fn children(&self, pairs: Pairs<'s, Rule>) -> Result<(Vec<Expr>, usize), ParseError> {
        let mut items = Vec::new();
        let mut depth = 0;
        for pair in pairs {
            let node = self.parse_expr(pair)?;
            depth = depth.max(node.depth);
            items.push(node.expr);
        }
        Ok((items, depth))
    }

    fn parse_expr(&self, pair: Pair<'s, Rule>) -> Result<Node, ParseError> {
        match pair.as_rule() {
            Rule::expression => PRATT_PARSER
                .map_primary(|primary| self.parse_primary(primary))
                .map_prefix(|op, rhs| self.parse_prefix(op, rhs?))
                .map_infix(|lhs, op, rhs| self.parse_infix(lhs?, op, rhs?))
                .map_postfix(|lhs, op| self.parse_postfix(lhs?, op))
                .parse(pair.into_inner()),
            _ => self.parse_primary(pair),
        }
    }

    fn parse_primary(&self, pair: Pair<'s, Rule>) -> Result<Node, ParseError> {
        let span: Span = pair.as_span().into();
        match pair.as_rule() {
            Rule::expression => self.parse_expr(pair),

            Rule::number => {
                let text = pair.as_str();
                let cleaned: String = text.chars().filter(|c| *c != '_').collect();
                let value = cleaned.parse::<f64>().map_err(|_| {
                    self.error(
                        ParseErrorKind::InvalidNumber {
                            text: text.to_string(),
                        },
                        span.clone(),
                    )
                })?;
                Ok(self.leaf(ExprKind::Literal(Literal::Number(value)), span))
            }

            Rule::string => {
                let s = pair.as_str();
                let inner = &s[1..s.len() - 1];
                Ok(self.leaf(ExprKind::Literal(Literal::Str(inner.to_string())), span))
            }

            Rule::boolean => {
                let value = pair.as_str() == "True";
                Ok(self.leaf(ExprKind::Literal(Literal::Bool(value)), span))
            }

            Rule::none => Ok(self.leaf(ExprKind::Literal(Literal::None), span)),

            Rule::ident => Ok(self.leaf(ExprKind::Ident(pair.as_str().to_string()), span)),

            Rule::grouped => {
                let inner = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.custom("missing expression in parentheses", span.clone()))?;
                let mut node = self.parse_expr(inner)?;
                node.sealed = true;
                Ok(node)
            }

            Rule::tuple | Rule::list | Rule::set => {
                let rule = pair.as_rule();
                let (items, depth) = self.children(pair.into_inner())?;
                let kind = match rule {
                    Rule::tuple => ExprKind::Tuple(items),
                    Rule::list => ExprKind::List(items),
                    _ => ExprKind::Set(items),
                };
                let mut node = self.node(kind, span, depth + 1)?;
                node.sealed = true;
                Ok(node)
            }

            Rule::dict => {
                let mut entries = Vec::new();
                let mut depth = 0;
                for entry in pair.into_inner() {
                    let entry_span = entry.as_span();
                    let mut inner = entry.into_inner();
                    let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                        return Err(self.custom("malformed dict entry", entry_span));
                    };
                    let key = self.parse_expr(key)?;
                    let value = self.parse_expr(value)?;
                    depth = depth.max(key.depth).max(value.depth);
                    entries.push((key.expr, value.expr));
                }
                let mut node = self.node(ExprKind::Dict(entries), span, depth + 1)?;
                node.sealed = true;
                Ok(node)
            }

            _ => Err(self.custom(
                &format!("unhandled rule: {:?}", pair.as_rule()),
                pair.as_span(),
            )),
        }
    }

    fn parse_prefix(&self, op: Pair<'s, Rule>, rhs: Node) -> Result<Node, ParseError> {
        let span = Span::combine(&op.as_span().into(), &rhs.expr.span);
        let op = match op.as_rule() {
            Rule::pos => UnaryOp::Pos,
            Rule::neg => UnaryOp::Neg,
            Rule::invert => UnaryOp::Invert,
            Rule::not => UnaryOp::Not,
            Rule::lambda_op => {
                let params = op
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::lambda_params)
                    .flat_map(|p| p.into_inner())
                    .map(|p| p.as_str().to_string())
                    .collect();
                return self.node(
                    ExprKind::Lambda {
                        params,
                        body: Box::new(rhs.expr),
                    },
                    span,
                    rhs.depth + 1,
                );
            }
            rule => {
                return Err(self.custom(
                    &format!("unknown prefix operator: {:?}", rule),
                    op.as_span(),
                ));
            }
        };
        self.node(
            ExprKind::Unary {
                op,
                operand: Box::new(rhs.expr),
            },
            span,
            rhs.depth + 1,
        )
    }

    fn parse_infix(&self, lhs: Node, op: Pair<'s, Rule>, rhs: Node) -> Result<Node, ParseError> {
        let span = Span::combine(&lhs.expr.span, &rhs.expr.span);
        let depth = lhs.depth.max(rhs.depth) + 1;

        let binary = match op.as_rule() {
            Rule::add => Some(BinaryOp::Add),
            Rule::sub => Some(BinaryOp::Sub),
            Rule::mul => Some(BinaryOp::Mul),
            Rule::div => Some(BinaryOp::Div),
            Rule::floor_div => Some(BinaryOp::FloorDiv),
            Rule::modulo => Some(BinaryOp::Mod),
            Rule::pow => Some(BinaryOp::Pow),
            Rule::matmul => Some(BinaryOp::MatMul),
            Rule::bit_or => Some(BinaryOp::BitOr),
            Rule::bit_xor => Some(BinaryOp::BitXor),
            Rule::bit_and => Some(BinaryOp::BitAnd),
            Rule::lshift => Some(BinaryOp::LShift),
            Rule::rshift => Some(BinaryOp::RShift),
            _ => None,
        };
        if let Some(op) = binary {
            return self.node(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs.expr),
                    right: Box::new(rhs.expr),
                },
                span,
                depth,
            );
        }

        let comparison = match op.as_rule() {
            Rule::eq => Some(ComparisonOp::Eq),
            Rule::ne => Some(ComparisonOp::NotEq),
            Rule::lt => Some(ComparisonOp::Lt),
            Rule::le => Some(ComparisonOp::LtE),
            Rule::gt => Some(ComparisonOp::Gt),
            Rule::ge => Some(ComparisonOp::GtE),
            Rule::in_op => Some(ComparisonOp::In),
            Rule::not_in => Some(ComparisonOp::NotIn),
            Rule::is_op => Some(ComparisonOp::Is),
            Rule::is_not => Some(ComparisonOp::IsNot),
            _ => None,
        };
        if let Some(op) = comparison {
            return match lhs.expr.kind {
                ExprKind::Compare {
                    left,
                    mut ops,
                    mut comparators,
                } if !lhs.sealed => {
                    ops.push(op);
                    comparators.push(rhs.expr);
                    self.node(
                        ExprKind::Compare {
                            left,
                            ops,
                            comparators,
                        },
                        span,
                        depth,
                    )
                }
                kind => self.node(
                    ExprKind::Compare {
                        left: Box::new(Expr::new(kind, lhs.expr.span)),
                        ops: vec![op],
                        comparators: vec![rhs.expr],
                    },
                    span,
                    depth,
                ),
            };
        }

        match op.as_rule() {
            Rule::and | Rule::or => {
                let op = if op.as_rule() == Rule::and {
                    BoolOp::And
                } else {
                    BoolOp::Or
                };
                match lhs.expr.kind {
                    ExprKind::Bool {
                        op: inner,
                        mut operands,
                    } if inner == op && !lhs.sealed => {
                        operands.push(rhs.expr);
                        self.node(ExprKind::Bool { op, operands }, span, depth)
                    }
                    kind => self.node(
                        ExprKind::Bool {
                            op,
                            operands: vec![Expr::new(kind, lhs.expr.span), rhs.expr],
                        },
                        span,
                        depth,
                    ),
                }
            }
            Rule::if_op => {
                let op_span = op.as_span();
                let test = op
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::expression)
                    .ok_or_else(|| self.custom("missing condition in conditional expression", op_span))?;
                let test = self.parse_expr(test)?;
                let depth = depth.max(test.depth + 1);
                self.node(
                    ExprKind::If {
                        test: Box::new(test.expr),
                        then_branch: Box::new(lhs.expr),
                        else_branch: Box::new(rhs.expr),
                    },
                    span,
                    depth,
                )
            }
            Rule::walrus => self.node(
                ExprKind::Named {
                    target: Box::new(lhs.expr),
                    value: Box::new(rhs.expr),
                },
                span,
                depth,
            ),
            rule => Err(self.custom(
                &format!("unknown infix operator: {:?}", rule),
                op.as_span(),
            )),
        }
    }

    fn parse_postfix(&self, lhs: Node, op: Pair<'s, Rule>) -> Result<Node, ParseError> {
        let span = Span::new(lhs.expr.span.0.start, op.as_span().end());
        match op.as_rule() {
            Rule::call_op => {
                let mut args = Vec::new();
                let mut keywords = Vec::new();
                let mut depth = lhs.depth;
                for arg in op.into_inner() {
                    match arg.as_rule() {
                        Rule::keyword_arg => {
                            let arg_span = arg.as_span();
                            let mut inner = arg.into_inner();
                            let (Some(name), Some(value)) = (inner.next(), inner.next()) else {
                                return Err(self.custom("malformed keyword argument", arg_span));
                            };
                            let value = self.parse_expr(value)?;
                            depth = depth.max(value.depth);
                            keywords.push(Keyword {
                                name: name.as_str().to_string(),
                                value: value.expr,
                                span: arg_span.into(),
                            });
                        }
                        _ if !keywords.is_empty() => {
                            return Err(self.custom(
                                "positional argument follows keyword argument",
                                arg.as_span(),
                            ));
                        }
                        _ => {
                            let value = self.parse_expr(arg)?;
                            depth = depth.max(value.depth);
                            args.push(value.expr);
                        }
                    }
                }
                self.node(
                    ExprKind::Call {
                        callee: Box::new(lhs.expr),
                        args,
                        keywords,
                    },
                    span,
                    depth + 1,
                )
            }
            Rule::index_op => {
                let op_span = op.as_span();
                let index = op
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.custom("missing subscript", op_span))?;
                let index = self.parse_expr(index)?;
                let depth = lhs.depth.max(index.depth) + 1;
                self.node(
                    ExprKind::Subscript {
                        value: Box::new(lhs.expr),
                        index: Box::new(index.expr),
                    },
                    span,
                    depth,
                )
            }
            Rule::attr_op => {
                let op_span = op.as_span();
                let attr = op
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.custom("missing attribute name", op_span))?
                    .as_str()
                    .to_string();
                self.node(
                    ExprKind::Attribute {
                        value: Box::new(lhs.expr),
                        attr,
                    },
                    span,
                    lhs.depth + 1,
                )
            }
            rule => Err(self.custom(
                &format!("unknown postfix operator: {:?}", rule),
                op.as_span(),
            )),
        }
    }
}

/// An opener tracked by [`check_nesting`].
enum Opener {
    Bracket(char, usize),
    /// `if` nests an expression until its `else`.
    If,
}

/// Checks bracket and `if ... else` nesting before handing the input to
/// pest, whose descent is recursive. Also reports the first unclosed
/// delimiter.
fn check_nesting(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut open: Vec<Opener> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_word = false;

    for (pos, c) in source.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q || c == '\n' {
                quote = None;
            }
            continue;
        }

        let is_word_char = c.is_ascii_alphanumeric() || c == '_';
        let word_start = is_word_char && !in_word;
        in_word = is_word_char;
        if word_start {
            let rest = &source[pos..];
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            match &rest[..len] {
                "if" => open.push(Opener::If),
                "else" => {
                    if matches!(open.last(), Some(Opener::If)) {
                        open.pop();
                    }
                    continue;
                }
                _ => continue,
            }
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                continue;
            }
            '(' | '[' | '{' => open.push(Opener::Bracket(c, pos)),
            ')' | ']' | '}' => {
                // Mismatched closers are left for the grammar to report.
                while let Some(Opener::If) = open.pop() {}
                continue;
            }
            _ if word_start => {}
            _ => continue,
        }

        if open.len() > max_depth {
            let end = if word_start { pos + 2 } else { pos + 1 };
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded {
                    depth: open.len(),
                    max_depth,
                },
                source.to_string(),
                Span::new(pos, end),
            ));
        }
    }

    let unclosed = open.iter().rev().find_map(|opener| match opener {
        Opener::Bracket(delimiter, pos) => Some((*delimiter, *pos)),
        Opener::If => None,
    });
    match unclosed {
        Some((delimiter, pos)) => Err(ParseError::new(
            ParseErrorKind::UnclosedDelimiter { delimiter },
            source.to_string(),
            Span::new(pos, pos + 1),
        )),
        None => Ok(()),
    }
}

/// Upper bound on the recursion the Pratt parser needs for an `expression`
/// pair. Prefix operators and right-associative links each recurse once, and
/// every nested expression adds its own bound on top.
fn recursion_bound(expression: Pair<'_, Rule>) -> usize {
    let mut own = 0;
    let mut nested = 0;
    for pair in expression.into_inner() {
        match pair.as_rule() {
            Rule::pos | Rule::neg | Rule::invert | Rule::not | Rule::lambda_op => own += 1,
            Rule::pow | Rule::walrus => own += 1,
            Rule::if_op => {
                own += 1;
                nested = nested.max(nested_bound(pair));
            }
            _ => nested = nested.max(nested_bound(pair)),
        }
    }
    own + nested
}

fn nested_bound(pair: Pair<'_, Rule>) -> usize {
    pair.into_inner()
        .map(|inner| match inner.as_rule() {
            Rule::expression => recursion_bound(inner) + 1,
            _ => nested_bound(inner),
        })
        .max()
        .unwrap_or(0)
}

/// Parse a payoff expression with the default limits.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_with_options(source, &ParserOptions::default())
}

/// Parse a payoff expression, rejecting trees deeper than `max_depth`.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr, ParseError> {
    parse_with_options(
        source,
        &ParserOptions {
            max_depth,
            ..ParserOptions::default()
        },
    )
}

pub fn parse_with_options(source: &str, options: &ParserOptions) -> Result<Expr, ParseError> {
    check_nesting(source, options.max_nesting)?;

    let mut pairs = ExpressionParser::parse(Rule::main, source)
        .map_err(|e| convert_pest_error(e, source))?;
    let builder = Builder {
        source,
        max_depth: options.max_depth,
    };
    let main = pairs
        .next()
        .ok_or_else(|| builder.custom("missing expected pair in rule", Span::new(0, 0)))?;
    let main_span = main.as_span();
    let expression = main
        .into_inner()
        .find(|p| p.as_rule() == Rule::expression)
        .ok_or_else(|| builder.custom("missing expression", main_span))?;

    let bound = recursion_bound(expression.clone());
    if bound > options.max_depth {
        return Err(builder.error(
            ParseErrorKind::MaxDepthExceeded {
                depth: bound,
                max_depth: options.max_depth,
            },
            expression.as_span().into(),
        ));
    }

    let node = builder.parse_expr(expression)?;
    tracing::debug!(depth = node.depth, "parsed payoff expression");
    Ok(node.expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Number(n)), Span::default())
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Ident(name.to_string()), Span::default())
    }

    #[test]
    fn test_simple_binary_expr() {
        let parsed = parse("1 + 2").unwrap();
        assert_eq!(
            parsed.kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(num(1.0)),
                right: Box::new(num(2.0)),
            }
        );
        assert_eq!(parsed.span, Span::new(0, 5));
    }

    #[test]
    fn test_call_with_positional_and_keyword_args() {
        let parsed = parse("clip(S_T, a_min=0, a_max=K)").unwrap();
        assert_eq!(
            parsed.kind,
            ExprKind::Call {
                callee: Box::new(ident("clip")),
                args: vec![ident("S_T")],
                keywords: vec![
                    Keyword {
                        name: "a_min".to_string(),
                        value: num(0.0),
                        span: Span::default(),
                    },
                    Keyword {
                        name: "a_max".to_string(),
                        value: ident("K"),
                        span: Span::default(),
                    },
                ],
            }
        );
    }

    #[test]
    fn test_conditional_expr() {
        let parsed = parse("S_T - K if S_T > K else 0").unwrap();
        assert_eq!(parsed.to_string(), "(if (cmp S_T > K) (- S_T K) 0)");
    }

    #[test]
    fn test_comparison_chain_is_flattened() {
        assert_eq!(parse("a < b <= c").unwrap().to_string(), "(cmp a < b <= c)");
        assert_eq!(
            parse("(a < b) <= c").unwrap().to_string(),
            "(cmp (cmp a < b) <= c)"
        );
    }

    #[test]
    fn test_bool_op_is_flattened() {
        assert_eq!(parse("a and b and c").unwrap().to_string(), "(and a b c)");
        assert_eq!(parse("(a and b) and c").unwrap().to_string(), "(and (and a b) c)");
        assert_eq!(parse("a and b or c").unwrap().to_string(), "(or (and a b) c)");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("1_000.5").unwrap(), num(1000.5));
        assert_eq!(parse(".5").unwrap(), num(0.5));
        assert_eq!(parse("1.").unwrap(), num(1.0));
        assert_eq!(parse("2.5e-3").unwrap(), num(0.0025));
        assert_eq!(parse("1E3").unwrap(), num(1000.0));
    }

    #[test]
    fn test_disallowed_constructs_still_parse() {
        let cases = [
            ("__import__('os').system('ls')", "(call (. (call __import__ \"os\") system) \"ls\")"),
            ("(1).bit_length()", "(call (. 1 bit_length))"),
            ("S_T[0]", "([] S_T 0)"),
            ("lambda x: x", "(lambda (x) x)"),
            ("(y := 1)", "(:= y 1)"),
            ("[1, 2]", "(list 1 2)"),
            ("(1,)", "(tuple 1)"),
            ("{1: 2}", "(dict 1:2)"),
            ("{1, 2}", "(set 1 2)"),
            ("a is not None", "(cmp a is not None)"),
            ("a not in b", "(cmp a not in b)"),
            ("~a & b", "(& (~ a) b)"),
        ];
        for (input, expected) in cases {
            let parsed = parse(input).unwrap_or_else(|e| panic!("failed to parse '{}': {}", input, e));
            assert_eq!(parsed.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_statements_do_not_parse() {
        for input in ["import os", "x = 1", "S_T +", "", "1 2", "def f(): 1"] {
            assert!(parse(input).is_err(), "expected '{}' to be rejected", input);
        }
    }

    #[test]
    fn test_unclosed_delimiter() {
        let err = parse("maximum(S_T - K, 0").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter { delimiter: '(' });
        assert_eq!(err.span, Span::new(7, 8));
        assert_eq!(err.src, "maximum(S_T - K, 0");
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let err = parse(&deep).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::MaxDepthExceeded { .. }));

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse(&shallow).unwrap(), num(1.0));
    }

    #[test]
    fn test_tree_depth_limit() {
        let long_sum = vec!["1"; 40].join(" + ");
        assert!(parse_with_max_depth(&long_sum, 100).is_ok());
        let err = parse_with_max_depth(&long_sum, 10).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::MaxDepthExceeded { max_depth: 10, .. }
        ));
    }

    fn assert_too_deep(source: &str) {
        let err = parse(source).unwrap_err();
        assert!(
            matches!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth, .. } if max_depth > 0),
            "unexpected error: {:?}",
            err.kind
        );
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("P004"));
    }

    #[test]
    fn test_long_prefix_runs_are_rejected() {
        assert_too_deep(&format!("{}1", "-".repeat(5_000)));
        assert_too_deep(&format!("{}1", "- ".repeat(5_000)));
        assert_too_deep(&format!("{}S_T", "not ".repeat(5_000)));
        assert_too_deep(&format!("{}1", "~".repeat(5_000)));
        assert_too_deep(&format!("({}1)", "+".repeat(5_000)));
    }

    #[test]
    fn test_long_right_associative_chains_are_rejected() {
        assert_too_deep(&vec!["1"; 5_000].join("**"));
        assert_too_deep(&vec!["1"; 5_000].join(" if 1 else "));
        assert_too_deep(&vec!["1"; 5_000].join("**-"));
    }

    #[test]
    fn test_nested_conditionals_are_rejected() {
        let nested = format!("{}1{}", "1 if ".repeat(2_000), " else 1".repeat(2_000));
        assert_too_deep(&nested);
        let err = parse(&nested).unwrap_err();
        assert_eq!(err.span.str_of(&err.src), "if");

        let shallow = format!("{}1{}", "1 if ".repeat(10), " else 1".repeat(10));
        assert!(parse(&shallow).is_ok());
    }

    #[test]
    fn test_operator_runs_within_limit_parse() {
        let run = format!("{}1", "-".repeat(100));
        assert!(parse(&run).is_ok());
        assert!(parse(&vec!["2"; 100].join(" ** ")).is_ok());

        let err = parse_with_max_depth(&format!("{}1", "-".repeat(20)), 10).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::MaxDepthExceeded { max_depth: 10, .. }
        ));
    }

    #[test]
    fn test_positional_after_keyword_is_rejected() {
        let err = parse("clip(a_min=0, S_T, K)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Other {
                message: "positional argument follows keyword argument".to_string()
            }
        );
        assert_eq!(err.span.str_of(&err.src), "S_T");
    }

    #[test]
    fn test_parens_inside_strings_do_not_count() {
        assert!(parse("f(')')").is_ok());
        assert!(parse("f(\"((\")").is_ok());
    }
}
