//! Named easing lookup.
//!
//! Curves are supplied by the host; the engine only calls them. Unknown names
//! resolve to [`linear`].

use hashbrown::HashMap;

/// Pure timing curve `[0, 1] -> R`, conventionally `f(0) = 0` and `f(1) = 1`.
pub type EasingFn = fn(f64) -> f64;

#[inline]
pub fn linear(p: f64) -> f64 {
    p
}

pub const LINEAR: &str = "linear";

#[derive(Clone, Debug)]
pub struct EasingTable {
    curves: HashMap<String, EasingFn>,
}

impl Default for EasingTable {
    fn default() -> Self {
        let mut curves = HashMap::new();
        curves.insert(LINEAR.to_string(), linear as EasingFn);
        Self { curves }
    }
}

impl EasingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a curve, returning the previous one.
    pub fn register(&mut self, name: impl Into<String>, curve: EasingFn) -> Option<EasingFn> {
        self.curves.insert(name.into(), curve)
    }

    pub fn with(mut self, name: impl Into<String>, curve: EasingFn) -> Self {
        self.register(name, curve);
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<EasingFn> {
        self.curves.get(name).copied()
    }

    /// Look up `name`, falling back to linear.
    pub fn resolve(&self, name: &str) -> EasingFn {
        match self.get(name) {
            Some(curve) => curve,
            None => {
                log::warn!("unknown easing {name:?}, using linear");
                linear
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }
}
