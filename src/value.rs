//! Terminal values.
//!
//! A terminal holds a boolean or a number. Numbers are kept in a canonical
//! form so that hash-consing terminals by value gives exactly one terminal per
//! distinct number:
//!
//! - a float with an integral value that fits into `i64` is stored as [`Value::Int`],
//!   so `8.0` and `8` are the same terminal (and so are `-0.0` and `0`);
//! - every NaN is the same value.
//!
//! Arithmetic and ordering comparisons coerce booleans to `0`/`1`, which lets
//! pricing rules multiply a price by an option selection directly.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use ordered_float::OrderedFloat;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
}

#[derive(Debug, Copy, Clone)]
enum Num {
    I(i64),
    F(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::I(i) => i as f64,
            Num::F(f) => f,
        }
    }
}

impl Value {
    /// Canonical numeric value for a float.
    pub fn number(x: f64) -> Self {
        // `i64::MAX as f64` is 2^63, which does not fit, hence the strict bound.
        if x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
            Value::Int(x as i64)
        } else {
            Value::Float(OrderedFloat(x))
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Numeric view of the value, with booleans coerced to `0`/`1`.
    pub fn as_f64(&self) -> f64 {
        self.num().as_f64()
    }

    fn num(&self) -> Num {
        match *self {
            Value::Bool(b) => Num::I(b as i64),
            Value::Int(i) => Num::I(i),
            Value::Float(f) => Num::F(f.0),
        }
    }

    fn int_or_float(
        self,
        other: Value,
        int_op: impl FnOnce(i64, i64) -> Option<i64>,
        float_op: impl FnOnce(f64, f64) -> f64,
    ) -> Value {
        match (self.num(), other.num()) {
            (Num::I(a), Num::I(b)) => match int_op(a, b) {
                Some(r) => Value::Int(r),
                None => Value::number(float_op(a as f64, b as f64)),
            },
            (a, b) => Value::number(float_op(a.as_f64(), b.as_f64())),
        }
    }

    pub fn add(self, other: Value) -> Value {
        self.int_or_float(other, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(self, other: Value) -> Value {
        self.int_or_float(other, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(self, other: Value) -> Value {
        self.int_or_float(other, i64::checked_mul, |a, b| a * b)
    }

    /// Numeric minimum; NaN on either side yields NaN.
    pub fn min(self, other: Value) -> Value {
        match self.compare(other) {
            Some(Ordering::Greater) => other.numeric(),
            Some(_) => self.numeric(),
            None => Value::number(f64::NAN),
        }
    }

    /// Numeric maximum; NaN on either side yields NaN.
    pub fn max(self, other: Value) -> Value {
        match self.compare(other) {
            Some(Ordering::Less) => other.numeric(),
            Some(_) => self.numeric(),
            None => Value::number(f64::NAN),
        }
    }

    pub fn negate(self) -> Value {
        match self.num() {
            Num::I(i) => i.checked_neg().map_or_else(|| Value::number(-(i as f64)), Value::Int),
            Num::F(f) => Value::number(-f),
        }
    }

    pub fn abs(self) -> Value {
        match self.num() {
            Num::I(i) => i.checked_abs().map_or_else(|| Value::number((i as f64).abs()), Value::Int),
            Num::F(f) => Value::number(f.abs()),
        }
    }

    pub fn ceil(self) -> Value {
        match self.num() {
            Num::I(i) => Value::Int(i),
            Num::F(f) => Value::number(f.ceil()),
        }
    }

    pub fn floor(self) -> Value {
        match self.num() {
            Num::I(i) => Value::Int(i),
            Num::F(f) => Value::number(f.floor()),
        }
    }

    /// The value as a number (booleans become `0`/`1`).
    fn numeric(self) -> Value {
        match self {
            Value::Bool(b) => Value::Int(b as i64),
            v => v,
        }
    }

    /// Numeric ordering; `None` when either side is NaN.
    pub fn compare(self, other: Value) -> Option<Ordering> {
        match (self.num(), other.num()) {
            (Num::I(a), Num::I(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Equality as used by the `EQUAL` operator: booleans compare as booleans,
    /// anything else compares numerically.
    pub fn equals(self, other: Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x.0),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::number(x)
    }
}
