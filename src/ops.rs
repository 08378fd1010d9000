//! Operators accepted by [`Mtbdd::apply`][crate::mtbdd::Mtbdd::apply] and
//! [`Mtbdd::apply_unary`][crate::mtbdd::Mtbdd::apply_unary].
//!
//! Each operator knows its terminal-to-terminal function; the recursive engine
//! only decides *where* to call it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{MtbddError, Result};
use crate::value::Value;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Implies,
    Equiv,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Min,
    Max,
    Equal,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
    Abs,
    Ceil,
    Floor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 17] = [
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
        BinaryOp::Implies,
        BinaryOp::Equiv,
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Modulo,
        BinaryOp::Min,
        BinaryOp::Max,
        BinaryOp::Equal,
        BinaryOp::LessThan,
        BinaryOp::LessEqual,
        BinaryOp::GreaterThan,
        BinaryOp::GreaterEqual,
    ];

    /// Operators that are defined only over boolean terminals.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor | BinaryOp::Implies | BinaryOp::Equiv
        )
    }

    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::Equiv
                | BinaryOp::Add
                | BinaryOp::Multiply
                | BinaryOp::Min
                | BinaryOp::Max
                | BinaryOp::Equal
        )
    }

    /// Whether the operator always yields a boolean terminal.
    pub fn yields_boolean(self) -> bool {
        self.is_boolean()
            || matches!(
                self,
                BinaryOp::Equal
                    | BinaryOp::LessThan
                    | BinaryOp::LessEqual
                    | BinaryOp::GreaterThan
                    | BinaryOp::GreaterEqual
            )
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
            BinaryOp::Implies => "IMPLIES",
            BinaryOp::Equiv => "EQUIV",
            BinaryOp::Add => "ADD",
            BinaryOp::Subtract => "SUBTRACT",
            BinaryOp::Multiply => "MULTIPLY",
            BinaryOp::Divide => "DIVIDE",
            BinaryOp::Modulo => "MODULO",
            BinaryOp::Min => "MIN",
            BinaryOp::Max => "MAX",
            BinaryOp::Equal => "EQUAL",
            BinaryOp::LessThan => "LESS_THAN",
            BinaryOp::LessEqual => "LESS_EQUAL",
            BinaryOp::GreaterThan => "GREATER_THAN",
            BinaryOp::GreaterEqual => "GREATER_EQUAL",
        }
    }

    /// Infix symbol used when rendering expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Xor => "^",
            BinaryOp::Implies => "->",
            BinaryOp::Equiv => "<->",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
            BinaryOp::Equal => "==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterEqual => ">=",
        }
    }

    /// Fails for operators the engine never supports, whatever the operands.
    pub fn check_supported(self) -> Result<()> {
        match self {
            BinaryOp::Divide | BinaryOp::Modulo => Err(MtbddError::UnsupportedOperation(format!(
                "{} is not supported on decision diagrams",
                self
            ))),
            _ => Ok(()),
        }
    }

    /// Terminal-to-terminal function of the operator.
    pub fn eval(self, a: Value, b: Value) -> Result<Value> {
        self.check_supported()?;
        if self.is_boolean() {
            let (x, y) = match (a.as_bool(), b.as_bool()) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(MtbddError::UnsupportedOperation(format!(
                        "{} requires boolean operands, got {} and {}",
                        self, a, b
                    )))
                }
            };
            let r = match self {
                BinaryOp::And => x && y,
                BinaryOp::Or => x || y,
                BinaryOp::Xor => x ^ y,
                BinaryOp::Implies => !x || y,
                BinaryOp::Equiv => x == y,
                _ => unreachable!(),
            };
            return Ok(Value::Bool(r));
        }
        let r = match self {
            BinaryOp::Add => a.add(b),
            BinaryOp::Subtract => a.sub(b),
            BinaryOp::Multiply => a.mul(b),
            BinaryOp::Min => a.min(b),
            BinaryOp::Max => a.max(b),
            BinaryOp::Equal => Value::Bool(a.equals(b)),
            BinaryOp::LessThan => Value::Bool(a.compare(b).is_some_and(|o| o.is_lt())),
            BinaryOp::LessEqual => Value::Bool(a.compare(b).is_some_and(|o| o.is_le())),
            BinaryOp::GreaterThan => Value::Bool(a.compare(b).is_some_and(|o| o.is_gt())),
            BinaryOp::GreaterEqual => Value::Bool(a.compare(b).is_some_and(|o| o.is_ge())),
            _ => unreachable!(),
        };
        Ok(r)
    }
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 5] = [
        UnaryOp::Not,
        UnaryOp::Negate,
        UnaryOp::Abs,
        UnaryOp::Ceil,
        UnaryOp::Floor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Negate => "NEGATE",
            UnaryOp::Abs => "ABS",
            UnaryOp::Ceil => "CEIL",
            UnaryOp::Floor => "FLOOR",
        }
    }

    pub fn eval(self, a: Value) -> Result<Value> {
        let r = match self {
            UnaryOp::Not => match a.as_bool() {
                Some(x) => Value::Bool(!x),
                None => {
                    return Err(MtbddError::UnsupportedOperation(format!(
                        "NOT requires a boolean operand, got {}",
                        a
                    )))
                }
            },
            UnaryOp::Negate => a.negate(),
            UnaryOp::Abs => a.abs(),
            UnaryOp::Ceil => a.ceil(),
            UnaryOp::Floor => a.floor(),
        };
        Ok(r)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BinaryOp {
    type Err = MtbddError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        BinaryOp::ALL
            .into_iter()
            .find(|op| op.name() == upper)
            .ok_or_else(|| MtbddError::UnsupportedOperation(format!("unknown operator: {}", s)))
    }
}

impl FromStr for UnaryOp {
    type Err = MtbddError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        UnaryOp::ALL
            .into_iter()
            .find(|op| op.name() == upper)
            .ok_or_else(|| MtbddError::UnsupportedOperation(format!("unknown operator: {}", s)))
    }
}
