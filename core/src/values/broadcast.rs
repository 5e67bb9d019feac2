//! Elementwise application with scalar broadcasting.

use bumpalo::Bump;

use super::Value;

/// Two vector operands with different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operands could not be broadcast together with shapes ({expected},) ({found},)")]
pub struct ShapeMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Common vector length of `values`, or `None` if all of them are scalars.
pub fn broadcast_len(values: &[Value<'_>]) -> Result<Option<usize>, ShapeMismatch> {
    let mut len = None;
    for value in values {
        match (len, value.vector_len()) {
            (_, None) => {}
            (None, Some(found)) => len = Some(found),
            (Some(expected), Some(found)) if expected != found => {
                return Err(ShapeMismatch { expected, found });
            }
            (Some(_), Some(_)) => {}
        }
    }
    Ok(len)
}

/// Applies `f` to the numeric view of `args`, element by element.
///
/// All-scalar arguments give a [`Value::Number`]; otherwise the result is a
/// [`Value::Array`] allocated in `arena`. The first error returned by `f`
/// stops the loop.
pub fn map_numbers<'a, const N: usize, E>(
    arena: &'a Bump,
    args: [Value<'a>; N],
    mut f: impl FnMut([f64; N]) -> Result<f64, E>,
) -> Result<Value<'a>, E>
where
    E: From<ShapeMismatch>,
{
    match broadcast_len(&args)? {
        None => Ok(Value::Number(f(args.map(|v| v.number_at(0)))?)),
        Some(len) => {
            let out = arena.alloc_slice_fill_copy(len, 0.0);
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = f(args.map(|v| v.number_at(i)))?;
            }
            Ok(Value::Array(out))
        }
    }
}

/// Like [`map_numbers`], for predicates. Produces a [`Value::Bool`] or a
/// [`Value::Mask`].
pub fn map_truth<'a, const N: usize>(
    arena: &'a Bump,
    args: [Value<'a>; N],
    mut f: impl FnMut([f64; N]) -> bool,
) -> Result<Value<'a>, ShapeMismatch> {
    match broadcast_len(&args)? {
        None => Ok(Value::Bool(f(args.map(|v| v.number_at(0))))),
        Some(len) => {
            let out = arena.alloc_slice_fill_copy(len, false);
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = f(args.map(|v| v.number_at(i)));
            }
            Ok(Value::Mask(out))
        }
    }
}
