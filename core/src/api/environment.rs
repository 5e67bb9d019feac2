//! Per-call bindings visible to a payoff expression.

use crate::stdlib::{Entry, Function, Registry};
use crate::values::Value;

/// Names bound by every pricing call, in addition to the registry.
pub const CALL_VARIABLES: [&str; 4] = ["S_T", "K", "S0", "r"];

/// What a name resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    Value(Value<'a>),
    Function(&'a Function),
}

/// The registry plus the call-scoped variables `S_T`, `K`, `S0` and `r`.
///
/// Built for one evaluation and dropped afterwards. `S_T` borrows the
/// simulated terminal prices.
///
/// # Example
///
/// ```
/// use payoff_core::api::{Binding, Environment};
/// use payoff_core::stdlib::REGISTRY;
///
/// let paths = [95.0, 105.0];
/// let env = Environment::new(&REGISTRY, &paths, 100.0, 100.0, 0.03);
/// assert_eq!(env.path_count(), 2);
/// assert!(matches!(env.lookup("exp"), Some(Binding::Function(_))));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    registry: &'a Registry,
    s_t: &'a [f64],
    strike: f64,
    spot: f64,
    rate: f64,
}

impl<'a> Environment<'a> {
    pub fn new(registry: &'a Registry, s_t: &'a [f64], strike: f64, spot: f64, rate: f64) -> Self {
        debug_assert!(
            CALL_VARIABLES.iter().all(|name| !registry.contains(name)),
            "call variables must not collide with registry names"
        );
        Self {
            registry,
            s_t,
            strike,
            spot,
            rate,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'a>> {
        let variable = match name {
            "S_T" => Some(Value::Array(self.s_t)),
            "K" => Some(Value::Number(self.strike)),
            "S0" => Some(Value::Number(self.spot)),
            "r" => Some(Value::Number(self.rate)),
            _ => None,
        };
        if let Some(value) = variable {
            return Some(Binding::Value(value));
        }

        let registry: &'a Registry = self.registry;
        match registry.get(name)? {
            Entry::Constant(value) => Some(Binding::Value(Value::Number(*value))),
            Entry::Function(function) => Some(Binding::Function(function)),
        }
    }

    pub fn function(&self, name: &str) -> Option<&'a Function> {
        match self.lookup(name)? {
            Binding::Function(function) => Some(function),
            Binding::Value(_) => None,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Number of simulated paths bound to `S_T`.
    pub fn path_count(&self) -> usize {
        self.s_t.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::REGISTRY;

    #[test]
    fn test_lookup_variables_and_registry() {
        let paths = [90.0, 110.0];
        let env = Environment::new(&REGISTRY, &paths, 100.0, 95.0, 0.05);

        assert!(matches!(env.lookup("S_T"), Some(Binding::Value(Value::Array(p))) if p == paths));
        assert!(matches!(env.lookup("K"), Some(Binding::Value(Value::Number(k))) if k == 100.0));
        assert!(matches!(env.lookup("S0"), Some(Binding::Value(Value::Number(s))) if s == 95.0));
        assert!(matches!(env.lookup("r"), Some(Binding::Value(Value::Number(r))) if r == 0.05));
        assert!(
            matches!(env.lookup("pi"), Some(Binding::Value(Value::Number(pi))) if pi == core::f64::consts::PI)
        );
        assert_eq!(env.function("clip").map(|f| f.name()), Some("clip"));
        assert!(env.function("K").is_none());
        assert!(env.lookup("sigma").is_none());
    }

    #[test]
    fn test_call_variables_do_not_shadow_registry() {
        for name in CALL_VARIABLES {
            assert!(!REGISTRY.contains(name), "{} collides with the registry", name);
        }
    }
}
