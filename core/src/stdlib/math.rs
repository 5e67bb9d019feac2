//! Scalar kernels behind the registry functions.
//!
//! Each kernel works on one element. Broadcasting over paths is done by the
//! caller. Domain failures are reported as a message; everything else follows
//! IEEE-754 and lets NaN through.

/// Error message of a kernel whose argument is outside its domain.
pub type DomainError = &'static str;

pub fn exp(x: f64) -> Result<f64, DomainError> {
    Ok(x.exp())
}

/// Natural logarithm. `log(0)` is `-inf`; negative input fails.
pub fn log(x: f64) -> Result<f64, DomainError> {
    if x < 0.0 {
        Err("logarithm of a negative number")
    } else {
        Ok(x.ln())
    }
}

pub fn sqrt(x: f64) -> Result<f64, DomainError> {
    if x < 0.0 {
        Err("square root of a negative number")
    } else {
        Ok(x.sqrt())
    }
}

pub fn abs(x: f64) -> Result<f64, DomainError> {
    Ok(x.abs())
}

/// Elementwise maximum. NaN in either argument gives NaN.
pub fn maximum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Elementwise minimum. NaN in either argument gives NaN.
pub fn minimum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// `minimum(maximum(a, a_min), a_max)`; an inverted range yields `a_max`.
pub fn clip(a: f64, a_min: f64, a_max: f64) -> f64 {
    minimum(maximum(a, a_min), a_max)
}
