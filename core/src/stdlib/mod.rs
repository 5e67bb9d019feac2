//! Registry of the constants and functions a payoff expression may use.
//!
//! Constants: pi, e
//! Functions: exp, log, sqrt, abs, max, maximum, min, minimum, clip
//!
//! The registry is built once and never mutated. [`REGISTRY`] is shared by
//! reference across pricing calls and threads.

pub mod math;

use bumpalo::Bump;
use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::evaluator::RuntimeError;
use crate::values::{Value, map_numbers};

/// The process-wide standard registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::standard);

#[derive(Debug, Clone, Copy)]
enum Kernel {
    Unary(fn(f64) -> Result<f64, math::DomainError>),
    Binary(fn(f64, f64) -> f64),
    Ternary(fn(f64, f64, f64) -> f64),
}

/// A registry function applied elementwise over its arguments.
#[derive(Debug, Clone, Copy)]
pub struct Function {
    name: &'static str,
    params: &'static [&'static str],
    keywords: bool,
    kernel: Kernel,
}

impl Function {
    fn unary(name: &'static str, kernel: fn(f64) -> Result<f64, math::DomainError>) -> Self {
        Self {
            name,
            params: &["x"],
            keywords: false,
            kernel: Kernel::Unary(kernel),
        }
    }

    fn binary(name: &'static str, kernel: fn(f64, f64) -> f64) -> Self {
        Self {
            name,
            params: &["x1", "x2"],
            keywords: false,
            kernel: Kernel::Binary(kernel),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }

    /// Whether parameters can be passed by keyword.
    pub fn accepts_keywords(&self) -> bool {
        self.keywords
    }

    /// Orders positional and keyword arguments by parameter.
    pub fn bind<'a>(
        &self,
        args: &[Value<'a>],
        keywords: &[(&str, Value<'a>)],
    ) -> Result<Vec<Value<'a>>, RuntimeError> {
        let arity = self.params.len();
        if args.len() > arity {
            return Err(RuntimeError::ArgumentCount {
                function: self.name,
                expected: arity,
                found: args.len() + keywords.len(),
            });
        }

        let mut slots: Vec<Option<Value<'a>>> = vec![None; arity];
        for (slot, arg) in slots.iter_mut().zip(args) {
            *slot = Some(*arg);
        }

        for (keyword, value) in keywords {
            let position = self
                .params
                .iter()
                .position(|param| param == keyword)
                .filter(|_| self.keywords)
                .ok_or_else(|| RuntimeError::UnexpectedKeyword {
                    function: self.name,
                    keyword: keyword.to_string(),
                })?;
            if slots[position].is_some() {
                return Err(RuntimeError::DuplicateArgument {
                    function: self.name,
                    param: self.params[position],
                });
            }
            slots[position] = Some(*value);
        }

        slots
            .into_iter()
            .zip(self.params)
            .map(|(slot, param)| {
                slot.ok_or_else(|| {
                    if self.keywords {
                        RuntimeError::MissingArgument {
                            function: self.name,
                            param: *param,
                        }
                    } else {
                        RuntimeError::ArgumentCount {
                            function: self.name,
                            expected: arity,
                            found: args.len(),
                        }
                    }
                })
            })
            .collect()
    }

    /// Applies the function to bound arguments, broadcasting over paths.
    pub fn call<'a>(&self, arena: &'a Bump, args: &[Value<'a>]) -> Result<Value<'a>, RuntimeError> {
        match (self.kernel, args) {
            (Kernel::Unary(f), [x]) => map_numbers(arena, [*x], |[x]| {
                f(x).map_err(|message| RuntimeError::Domain {
                    function: self.name,
                    message,
                })
            }),
            (Kernel::Binary(f), [a, b]) => map_numbers(arena, [*a, *b], |[a, b]| Ok(f(a, b))),
            (Kernel::Ternary(f), [a, b, c]) => {
                map_numbers(arena, [*a, *b, *c], |[a, b, c]| Ok(f(a, b, c)))
            }
            _ => Err(RuntimeError::ArgumentCount {
                function: self.name,
                expected: self.params.len(),
                found: args.len(),
            }),
        }
    }
}

/// A registry entry.
#[derive(Debug, Clone, Copy)]
pub enum Entry {
    Constant(f64),
    Function(Function),
}

/// Immutable mapping from names to constants and functions.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<&'static str, Entry>,
}

impl Registry {
    /// The standard set of payoff constants and functions.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        entries.insert("pi", Entry::Constant(core::f64::consts::PI));
        entries.insert("e", Entry::Constant(core::f64::consts::E));

        let functions = [
            Function::unary("exp", math::exp),
            Function::unary("log", math::log),
            Function::unary("sqrt", math::sqrt),
            Function::unary("abs", math::abs),
            Function::binary("maximum", math::maximum),
            Function::binary("max", math::maximum),
            Function::binary("minimum", math::minimum),
            Function::binary("min", math::minimum),
            Function {
                name: "clip",
                params: &["a", "a_min", "a_max"],
                keywords: true,
                kernel: Kernel::Ternary(math::clip),
            },
        ];
        for function in functions {
            entries.insert(function.name, Entry::Function(function));
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Entry::Constant(value) => Some(*value),
            Entry::Function(_) => None,
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        match self.get(name)? {
            Entry::Function(function) => Some(function),
            Entry::Constant(_) => None,
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Names of registered functions, sorted.
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Function(_)))
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
