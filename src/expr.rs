//! Expression trees compiled by [`CompilationContext`][crate::context::CompilationContext].

use std::fmt::{Display, Formatter};
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Sub};

use crate::ops::{BinaryOp, UnaryOp};
use crate::value::Value;

/// Byte range of an expression in its source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Bool(bool),
    Number(Value),
    Var(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Ite(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `e >= k`, as a boolean function.
    Threshold(Box<Expr>, Value),
    Exists(Vec<String>, Box<Expr>),
    ForAll(Vec<String>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Option<Span>,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Self { kind, span: None }
    }
}

impl Expr {
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn bool(b: bool) -> Self {
        ExprKind::Bool(b).into()
    }

    pub fn number(value: impl Into<Value>) -> Self {
        ExprKind::Number(value.into()).into()
    }

    pub fn var(name: impl Into<String>) -> Self {
        ExprKind::Var(name.into()).into()
    }

    pub fn unary(op: UnaryOp, e: Self) -> Self {
        ExprKind::Unary(op, Box::new(e)).into()
    }

    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)).into()
    }

    pub fn ite(cond: Self, then: Self, else_: Self) -> Self {
        ExprKind::Ite(Box::new(cond), Box::new(then), Box::new(else_)).into()
    }

    pub fn threshold(e: Self, k: impl Into<Value>) -> Self {
        ExprKind::Threshold(Box::new(e), k.into()).into()
    }

    pub fn exists<I, S>(names: I, e: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExprKind::Exists(names.into_iter().map(Into::into).collect(), Box::new(e)).into()
    }

    pub fn forall<I, S>(names: I, e: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExprKind::ForAll(names.into_iter().map(Into::into).collect(), Box::new(e)).into()
    }

    pub fn implies(self, rhs: Self) -> Self {
        Expr::binary(BinaryOp::Implies, self, rhs)
    }

    pub fn equiv(self, rhs: Self) -> Self {
        Expr::binary(BinaryOp::Equiv, self, rhs)
    }

    /// Variable names mentioned anywhere in the expression (bound ones
    /// included), in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        fn push(names: &mut Vec<String>, name: &String) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        match &self.kind {
            ExprKind::Bool(_) | ExprKind::Number(_) => {}
            ExprKind::Var(name) => push(names, name),
            ExprKind::Exists(bound, e) | ExprKind::ForAll(bound, e) => {
                for name in bound {
                    push(names, name);
                }
                e.collect_variables(names);
            }
            ExprKind::Unary(_, e) | ExprKind::Threshold(e, _) => e.collect_variables(names),
            ExprKind::Binary(_, a, b) => {
                a.collect_variables(names);
                b.collect_variables(names);
            }
            ExprKind::Ite(c, t, e) => {
                c.collect_variables(names);
                t.collect_variables(names);
                e.collect_variables(names);
            }
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Bool(b) => write!(f, "{}", b),
            ExprKind::Number(v) => write!(f, "{}", v),
            ExprKind::Var(name) => write!(f, "{}", VarName(name)),
            ExprKind::Unary(UnaryOp::Not, e) => write!(f, "!{}", e),
            ExprKind::Unary(UnaryOp::Negate, e) => write!(f, "-{}", e),
            ExprKind::Unary(op, e) => write!(f, "{}({})", op.name().to_ascii_lowercase(), e),
            ExprKind::Binary(op, a, b) => {
                let symbol = op.symbol();
                if symbol.starts_with(char::is_alphabetic) {
                    write!(f, "{}({}, {})", symbol, a, b)
                } else {
                    write!(f, "({} {} {})", a, symbol, b)
                }
            }
            ExprKind::Ite(c, t, e) => write!(f, "ite({}, {}, {})", c, t, e),
            ExprKind::Threshold(e, k) => write!(f, "threshold({}, {})", e, k),
            ExprKind::Exists(names, e) => write!(f, "(exists {}. {})", VarList(names), e),
            ExprKind::ForAll(names, e) => write!(f, "(forall {}. {})", VarList(names), e),
        }
    }
}

/// Words a plain variable name must not render as, since literals print the same.
const RESERVED: [&str; 4] = ["true", "false", "inf", "NaN"];

/// A variable name as rendered in source form.
///
/// Names that are not identifiers, or that clash with a literal, are quoted
/// in backticks so that distinct expressions never render alike.
struct VarName<'a>(&'a str);

impl Display for VarName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.0;
        let mut chars = name.chars();
        let plain = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
            && !RESERVED.contains(&name);
        if plain {
            return f.write_str(name);
        }
        f.write_str("`")?;
        for c in name.chars() {
            if c == '`' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{}", c)?;
        }
        f.write_str("`")
    }
}

struct VarList<'a>(&'a [String]);

impl Display for VarList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", VarName(name))?;
        }
        Ok(())
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::unary(UnaryOp::Not, self)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::unary(UnaryOp::Negate, self)
    }
}

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Self) -> Self::Output {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

impl_binary_operator!(BitAnd, bitand, BinaryOp::And);
impl_binary_operator!(BitOr, bitor, BinaryOp::Or);
impl_binary_operator!(BitXor, bitxor, BinaryOp::Xor);
impl_binary_operator!(Add, add, BinaryOp::Add);
impl_binary_operator!(Sub, sub, BinaryOp::Subtract);
impl_binary_operator!(Mul, mul, BinaryOp::Multiply);
