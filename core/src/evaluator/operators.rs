//! Scalar semantics of the arithmetic and comparison operators.
//!
//! Broadcasting over paths is handled by the caller. Arithmetic follows
//! IEEE 754: division by zero gives an infinity or NaN instead of failing.

use crate::validator::{ArithOp, CompareOp};

pub(super) fn eval_arith(op: ArithOp, left: f64, right: f64) -> f64 {
    match op {
        ArithOp::Add => left + right,
        ArithOp::Sub => left - right,
        ArithOp::Mul => left * right,
        ArithOp::Div => left / right,
        ArithOp::Mod => floored_mod(left, right),
        ArithOp::Pow => left.powf(right),
    }
}

pub(super) fn eval_compare(op: CompareOp, left: f64, right: f64) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => left < right,
        CompareOp::LtE => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::GtE => left >= right,
    }
}

/// Modulo with the sign of the divisor. `x % 0` is NaN.
fn floored_mod(left: f64, right: f64) -> f64 {
    let rem = left % right;
    if rem != 0.0 && (rem < 0.0) != (right < 0.0) {
        rem + right
    } else {
        rem
    }
}
