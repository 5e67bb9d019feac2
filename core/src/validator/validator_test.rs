use pretty_assertions::assert_eq;

use super::*;
use crate::parser::{self, Span};
use crate::stdlib::Registry;

fn check(source: &str) -> Result<PayoffExpr, ValidationError> {
    let parsed = parser::parse(source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e));
    validate(&parsed, source)
}

fn rejection(source: &str) -> ValidationError {
    match check(source) {
        Ok(expr) => panic!("expected '{}' to be rejected, got {}", source, expr),
        Err(err) => err,
    }
}

#[test]
fn test_accepts_payoff_expressions() {
    let cases = [
        "maximum(S_T - K, 0)",
        "max(S_T - K, 0) + min(K - S_T, 0)",
        "clip(S_T, 0, K)",
        "clip(S_T, a_min=0, a_max=K)",
        "exp(-r) * abs(S_T - S0)",
        "sqrt(S_T) + log(S_T / K)",
        "S_T ** 2 % 7 / pi - e",
        "+S_T",
        "S_T - K if S_T > K else 0",
        "(S_T > K) and (S_T < 2 * K) or False",
        "0 < S_T - K <= 10",
        "S_T != K == True",
        "1.5e3",
    ];
    for source in cases {
        assert!(check(source).is_ok(), "expected '{}' to be accepted", source);
    }
}

#[test]
fn test_validated_tree_shape() {
    let expr = check("maximum(S_T - K, 0)").unwrap();
    assert_eq!(
        expr.root.kind,
        NodeKind::Call {
            function: "maximum".to_string(),
            args: vec![
                Node::new(
                    NodeKind::BinaryOp {
                        op: ArithOp::Sub,
                        left: Box::new(Node::new(
                            NodeKind::Identifier("S_T".to_string()),
                            Span::default()
                        )),
                        right: Box::new(Node::new(
                            NodeKind::Identifier("K".to_string()),
                            Span::default()
                        )),
                    },
                    Span::default()
                ),
                Node::new(NodeKind::Literal(Constant::Number(0.0)), Span::default()),
            ],
            keywords: vec![],
        }
    );
    assert_eq!(expr.src, "maximum(S_T - K, 0)");
    assert_eq!(expr.root.span, Span::new(0, 19));
}

#[test]
fn test_rejects_import_call() {
    let err = rejection("__import__('os').system('ls')");
    assert_eq!(
        err.kind,
        ValidationErrorKind::DisallowedCallTarget {
            target: "attribute access"
        }
    );
    assert_eq!(err.span.str_of(&err.src), "__import__('os').system");
}

#[test]
fn test_rejects_method_call_on_literal() {
    let err = rejection("(1).bit_length()");
    assert_eq!(
        err.kind,
        ValidationErrorKind::DisallowedCallTarget {
            target: "attribute access"
        }
    );
}

#[test]
fn test_rejects_disallowed_nodes() {
    let cases = [
        ("S_T[0]", "subscript"),
        ("K.real", "attribute access"),
        ("lambda x: x", "lambda"),
        ("(k := 1)", "assignment expression"),
        ("'abc'", "string literal"),
        ("None", "None literal"),
        ("[S_T]", "list display"),
        ("(S_T, K)", "tuple display"),
        ("{S_T}", "set display"),
        ("{1: 2}", "dict display"),
    ];
    for (source, node) in cases {
        assert_eq!(
            rejection(source).kind,
            ValidationErrorKind::DisallowedNode { node },
            "source: {}",
            source
        );
    }
}

#[test]
fn test_rejects_disallowed_operators() {
    let cases = [
        ("S_T // K", "//"),
        ("S_T @ K", "@"),
        ("S_T | K", "|"),
        ("S_T ^ K", "^"),
        ("S_T & K", "&"),
        ("S_T << 1", "<<"),
        ("S_T >> 1", ">>"),
        ("~S_T", "~"),
        ("not S_T", "not"),
        ("S_T in K", "in"),
        ("S_T not in K", "not in"),
        ("S_T is K", "is"),
        ("S_T is not K", "is not"),
        ("0 < S_T is K", "is"),
    ];
    for (source, op) in cases {
        assert_eq!(
            rejection(source).kind,
            ValidationErrorKind::DisallowedOperator { op },
            "source: {}",
            source
        );
    }
}

#[test]
fn test_rejects_unknown_names() {
    for name in ["x", "sigma", "np", "__builtins__", "os", "s_t", "k"] {
        assert_eq!(
            rejection(name).kind,
            ValidationErrorKind::UnknownIdentifier {
                name: name.to_string()
            }
        );
    }
}

#[test]
fn test_rejects_non_function_call_targets() {
    assert_eq!(
        rejection("eval('1')").kind,
        ValidationErrorKind::NotAFunction {
            name: "eval".to_string()
        }
    );
    assert_eq!(
        rejection("pi(2)").kind,
        ValidationErrorKind::NotAFunction {
            name: "pi".to_string()
        }
    );
    assert_eq!(
        rejection("S_T(2)").kind,
        ValidationErrorKind::NotAFunction {
            name: "S_T".to_string()
        }
    );
    // Parentheses around a bare name still leave a bare name.
    assert!(check("(exp)(1)").is_ok());
    assert_eq!(
        rejection("exp(1)(2)").kind,
        ValidationErrorKind::DisallowedCallTarget {
            target: "function call"
        }
    );
}

#[test]
fn test_rejection_at_any_depth() {
    let cases = [
        "maximum(S_T - K, 0) + S_T.real",
        "exp(exp(exp(exp(sqrt(S_T[0])))))",
        "clip(S_T, a_min=0, a_max=secret)",
        "S_T if S_T > K else (lambda: 1)",
        "1 if 'x' else 0",
        "(S_T > K) and os",
        "-(-(-(-(S_T // 2))))",
    ];
    for source in cases {
        assert!(check(source).is_err(), "expected '{}' to be rejected", source);
    }
}

#[test]
fn test_first_offending_construct_is_reported() {
    // The attribute on the left is visited before the unknown name on the right.
    let err = rejection("S_T.real + x");
    assert!(matches!(
        err.kind,
        ValidationErrorKind::DisallowedNode {
            node: "attribute access"
        }
    ));

    // The operator of a node is checked before its operands.
    let err = rejection("x // y");
    assert!(matches!(
        err.kind,
        ValidationErrorKind::DisallowedOperator { op: "//" }
    ));
}

#[test]
fn test_function_names_pass_as_identifiers() {
    // Evaluating a bare function name fails later, at run time.
    assert!(check("exp + 1").is_ok());
}

#[test]
fn test_diagnostic_codes() {
    let codes = [
        ("S_T[0]", "V001"),
        ("S_T // 2", "V002"),
        ("sigma", "V003"),
        ("K.real()", "V004"),
        ("eval(1)", "V005"),
    ];
    for (source, code) in codes {
        let diagnostic = rejection(source).to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some(code), "source: {}", source);
        assert!(diagnostic.help.is_some());
    }

    let help = rejection("sigma").to_diagnostic().help.unwrap();
    assert!(help.contains("S_T"));
    assert!(help.contains("maximum"));
}

#[test]
fn test_suggestions_come_from_the_validating_registry() {
    let registry = Registry::standard();
    let source = "sigma + pi(2)";
    let parsed = parser::parse(source).unwrap();
    let err = validate_with_registry(&parsed, source, &registry).unwrap_err();
    let mut expected = crate::api::CALL_VARIABLES.to_vec();
    expected.extend(registry.names());
    assert_eq!(err.suggestions, expected);

    let source = "pi(2)";
    let parsed = parser::parse(source).unwrap();
    let err = validate_with_registry(&parsed, source, &registry).unwrap_err();
    assert_eq!(err.suggestions, registry.function_names());
    assert!(!err.suggestions.contains(&"pi"));
    assert_eq!(
        err.to_diagnostic().help.as_deref(),
        Some("callable functions: abs, clip, exp, log, max, maximum, min, minimum, sqrt")
    );
}

#[test]
fn test_structural_errors_carry_no_suggestions() {
    assert!(rejection("S_T[0]").suggestions.is_empty());
    assert!(rejection("S_T // 2").suggestions.is_empty());
}

#[test]
fn test_error_message_names_construct() {
    assert_eq!(
        rejection("sigma * 2").to_string(),
        "name 'sigma' is not allowed in a payoff expression"
    );
    assert_eq!(
        rejection("S_T // 2").to_string(),
        "operator '//' is not allowed in a payoff expression"
    );
}
