use crate::parser::Expr;

use super::parser::parse;

// Helper function to parse an expression and return the AST.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same AST.
fn ast(source: &str) -> Expr {
    parse(source).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e + f"),
        ast("((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b * c"), ast("(a / b) * c"));
    assert_eq!(ast("a % b * c"), ast("(a % b) * c"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
    assert_eq!(ast("S_T - K % 3"), ast("S_T - (K % 3)"));
}

#[test]
fn test_and_vs_or() {
    assert_eq!(ast("a and b or c"), ast("(a and b) or c"));
    assert_eq!(ast("a or b and c"), ast("a or (b and c)"));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(ast("not a < b"), ast("not (a < b)"));
    assert_eq!(ast("not a and b"), ast("(not a) and b"));
}

#[test]
fn test_comparison_vs_arithmetic() {
    assert_eq!(ast("S_T - K > 0"), ast("(S_T - K) > 0"));
    assert_eq!(ast("a < b and b < c"), ast("(a < b) and (b < c)"));
}

#[test]
fn test_unary_vs_binary() {
    assert_eq!(ast("--a"), ast("-(-a)"));
    assert_eq!(ast("-a + b"), ast("(-a) + b"));
    assert_eq!(ast("a + -b"), ast("a + (-b)"));
    assert_eq!(ast("a * -b"), ast("a * (-b)"));
}

#[test]
fn test_exponentiation() {
    assert_eq!(ast("a ** b ** c"), ast("a ** (b ** c)"));
    assert_eq!(ast("a ** b ** c ** d"), ast("a ** (b ** (c ** d))"));
}

#[test]
fn test_exponentiation_vs_unary() {
    // Power binds tighter than a unary operator on its left...
    assert_eq!(ast("-2 ** 2"), ast("-(2 ** 2)"));
    // ...but accepts one on its right.
    assert_eq!(ast("2 ** -1"), ast("2 ** (-1)"));
    assert_eq!(ast("2 ** -1 * 3"), ast("(2 ** (-1)) * 3"));
}

#[test]
fn test_exponentiation_vs_multiplication() {
    assert_eq!(ast("a * b ** c"), ast("a * (b ** c)"));
    assert_eq!(ast("a ** b * c"), ast("(a ** b) * c"));
}

#[test]
fn test_conditional() {
    assert_eq!(
        ast("a if b else c if d else e"),
        ast("a if b else (c if d else e)")
    );
    assert_eq!(ast("a + 1 if b else c"), ast("(a + 1) if b else c"));
    assert_eq!(ast("a if b or c else d"), ast("a if (b or c) else d"));
}

#[test]
fn test_calls_bind_tightest() {
    assert_eq!(ast("-exp(x) ** 2"), ast("-((exp(x)) ** 2)"));
    assert_eq!(ast("f(x).y[0]"), ast("((f(x)).y)[0]"));
}
