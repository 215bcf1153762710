//! Addition helper

/// Left operand used by every request
pub const LHS: i64 = 1;

/// Right operand used by every request
pub const RHS: i64 = 2;

/// Sum of two integers.
#[inline]
pub fn calc(a: i64, b: i64) -> i64 {
    a + b
}

/// A labelled reference to the helper.
///
/// The handler logs the helper's result once per call site; both sites
/// resolve to the same `calc`.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    pub label: &'static str,
    pub func: fn(i64, i64) -> i64,
}

impl CallSite {
    pub const fn new(label: &'static str) -> Self {
        Self { label, func: calc }
    }

    /// Invoke the helper with the fixed request operands
    pub fn invoke(&self) -> i64 {
        (self.func)(LHS, RHS)
    }

    /// Render as `<label> ::  <result>`
    pub fn line(&self) -> String {
        format!("{} ::  {}", self.label, self.invoke())
    }
}
