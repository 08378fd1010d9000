//! The Apply/ITE engine.
//!
//! Every combinator here follows the same recursive scheme over Shannon
//! cofactors:
//!
//! 1. terminal operands are combined directly by the operator's
//!    terminal-to-terminal function;
//! 2. otherwise the operation cache is consulted;
//! 3. otherwise the top-most (minimum level) variable `v` among the operands
//!    is chosen, the operands are split into their `v = 0` and `v = 1`
//!    cofactors, both halves are combined recursively, and the result is
//!    rebuilt with [`NodeStore::mk_node`][crate::store::NodeStore::mk_node],
//!    which applies the reduction rule and hash-consing.
//!
//! Nodes are only ever created bottom-up, so an error in a sub-computation
//! aborts the operation before any node referring to a partial result exists.

use log::debug;

use crate::cache::CacheKey;
use crate::error::{MtbddError, Result};
use crate::mtbdd::Mtbdd;
use crate::ops::{BinaryOp, UnaryOp};
use crate::reference::NodeId;
use crate::value::Value;

impl Mtbdd {
    pub(crate) fn expect_boolean(&self, what: &str, f: NodeId) -> Result<()> {
        if self.node(f)?.is_boolean() {
            Ok(())
        } else {
            Err(MtbddError::UnsupportedOperation(format!(
                "{} requires a boolean-valued operand, but {} has non-boolean terminals",
                what, f
            )))
        }
    }

    /// Combines two functions point-wise with a binary operator.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtbdd::mtbdd::Mtbdd;
    /// use mtbdd::ops::BinaryOp;
    /// use mtbdd::value::Value;
    ///
    /// let mut mgr = Mtbdd::new();
    /// let five = mgr.constant(5);
    /// let three = mgr.constant(3);
    /// let sum = mgr.apply(BinaryOp::Add, five, three).unwrap();
    /// assert_eq!(mgr.terminal_value(sum), Some(Value::Int(8)));
    /// ```
    pub fn apply(&mut self, op: BinaryOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        debug!("apply(op = {}, a = {}, b = {})", op, a, b);
        op.check_supported()?;
        if op.is_boolean() {
            self.expect_boolean(op.name(), a)?;
            self.expect_boolean(op.name(), b)?;
        }
        self.apply_rec(op, a, b)
    }

    fn apply_rec(&mut self, op: BinaryOp, a: NodeId, b: NodeId) -> Result<NodeId> {
        let na = *self.node(a)?;
        let nb = *self.node(b)?;

        if let (Some(x), Some(y)) = (na.value(), nb.value()) {
            let res = self.store.mk_terminal(op.eval(x, y)?);
            debug!("terminal: {}({}, {}) -> {}", op, x, y, res);
            return Ok(res);
        }

        if op.is_boolean() {
            if let Some(res) = self.boolean_shortcut(op, a, b) {
                debug!("shortcut: {}({}, {}) -> {}", op, a, b, res);
                return Ok(res);
            }
        }

        let key = CacheKey::binary(op, a, b);
        if let Some(res) = self.cache.get(&key) {
            debug!("cache: apply({}, {}, {}) -> {}", op, a, b, res);
            return Ok(res);
        }

        let m = na.level().min(nb.level());
        let (a0, a1) = self.top_cofactors(a, m)?;
        let (b0, b1) = self.top_cofactors(b, m)?;

        let low = self.apply_rec(op, a0, b0)?;
        let high = self.apply_rec(op, a1, b1)?;

        let res = self.store.mk_node(m.var(), low, high)?;
        debug!("computed: apply({}, {}, {}) -> {}", op, a, b, res);
        self.cache.insert(key, res);
        Ok(res)
    }

    /// Identity and absorbing elements of the boolean connectives.
    ///
    /// Both operands are known to be boolean-valued.
    fn boolean_shortcut(&self, op: BinaryOp, a: NodeId, b: NodeId) -> Option<NodeId> {
        let (zero, one) = (NodeId::FALSE, NodeId::TRUE);
        match op {
            BinaryOp::And => {
                if a == b || b == one {
                    Some(a)
                } else if a == zero || b == zero {
                    Some(zero)
                } else if a == one {
                    Some(b)
                } else {
                    None
                }
            }
            BinaryOp::Or => {
                if a == b || b == zero {
                    Some(a)
                } else if a == one || b == one {
                    Some(one)
                } else if a == zero {
                    Some(b)
                } else {
                    None
                }
            }
            BinaryOp::Xor => {
                if a == b {
                    Some(zero)
                } else if a == zero {
                    Some(b)
                } else if b == zero {
                    Some(a)
                } else {
                    None
                }
            }
            BinaryOp::Equiv => {
                if a == b {
                    Some(one)
                } else if a == one {
                    Some(b)
                } else if b == one {
                    Some(a)
                } else {
                    None
                }
            }
            BinaryOp::Implies => {
                if a == b || a == zero || b == one {
                    Some(one)
                } else if a == one {
                    Some(b)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Transforms every terminal of `f` with a unary operator.
    pub fn apply_unary(&mut self, op: UnaryOp, f: NodeId) -> Result<NodeId> {
        debug!("apply_unary(op = {}, f = {})", op, f);
        if op == UnaryOp::Not {
            self.expect_boolean(op.name(), f)?;
        }
        self.apply_unary_rec(op, f)
    }

    fn apply_unary_rec(&mut self, op: UnaryOp, f: NodeId) -> Result<NodeId> {
        let node = *self.node(f)?;
        if let Some(x) = node.value() {
            return Ok(self.store.mk_terminal(op.eval(x)?));
        }

        let key = CacheKey::unary(op, f);
        if let Some(res) = self.cache.get(&key) {
            debug!("cache: apply_unary({}, {}) -> {}", op, f, res);
            return Ok(res);
        }

        let m = node.level();
        let (f0, f1) = self.top_cofactors(f, m)?;
        let low = self.apply_unary_rec(op, f0)?;
        let high = self.apply_unary_rec(op, f1)?;

        let res = self.store.mk_node(m.var(), low, high)?;
        debug!("computed: apply_unary({}, {}) -> {}", op, f, res);
        self.cache.insert(key, res);
        Ok(res)
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = if f then g else h
    /// ```
    ///
    /// The condition `f` must be boolean-valued; `g` and `h` may have arbitrary
    /// terminals.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtbdd::mtbdd::Mtbdd;
    ///
    /// let mut mgr = Mtbdd::new();
    /// mgr.declare(["x", "y", "z"]).unwrap();
    /// let x = mgr.var("x").unwrap();
    /// let y = mgr.var("y").unwrap();
    /// let z = mgr.var("z").unwrap();
    /// let f = mgr.ite(x, y, z).unwrap();
    ///
    /// let x_and_y = mgr.apply_and(x, y).unwrap();
    /// let not_x = mgr.apply_not(x).unwrap();
    /// let not_x_and_z = mgr.apply_and(not_x, z).unwrap();
    /// assert_eq!(f, mgr.apply_or(x_and_y, not_x_and_z).unwrap());
    /// ```
    pub fn ite(&mut self, f: NodeId, g: NodeId, h: NodeId) -> Result<NodeId> {
        debug!("ite(f = {}, g = {}, h = {})", f, g, h);
        self.expect_boolean("ITE", f)?;
        self.node(g)?;
        self.node(h)?;
        self.ite_rec(f, g, h)
    }

    fn ite_rec(&mut self, f: NodeId, g: NodeId, h: NodeId) -> Result<NodeId> {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        if f == NodeId::TRUE {
            return Ok(g);
        }
        if f == NodeId::FALSE {
            return Ok(h);
        }
        if g == h {
            return Ok(g);
        }
        if g == NodeId::TRUE && h == NodeId::FALSE {
            return Ok(f);
        }

        let key = CacheKey::ite(f, g, h);
        if let Some(res) = self.cache.get(&key) {
            debug!("cache: ite({}, {}, {}) -> {}", f, g, h, res);
            return Ok(res);
        }

        let m = self.top_level(&[f, g, h])?;
        let (f0, f1) = self.top_cofactors(f, m)?;
        let (g0, g1) = self.top_cofactors(g, m)?;
        let (h0, h1) = self.top_cofactors(h, m)?;

        let e = self.ite_rec(f0, g0, h0)?;
        let t = self.ite_rec(f1, g1, h1)?;

        let res = self.store.mk_node(m.var(), e, t)?;
        debug!("computed: ite({}, {}, {}) -> {}", f, g, h, res);
        self.cache.insert(key, res);
        Ok(res)
    }

    /// Replaces every terminal `t` of `f` with the boolean `t >= constant`.
    ///
    /// Shared sub-graphs are transformed once.
    pub fn threshold(&mut self, f: NodeId, constant: impl Into<Value>) -> Result<NodeId> {
        let constant = constant.into();
        debug!("threshold(f = {}, constant = {})", f, constant);
        let k = self.store.mk_terminal(constant);
        self.threshold_rec(f, k, constant)
    }

    fn threshold_rec(&mut self, f: NodeId, k: NodeId, constant: Value) -> Result<NodeId> {
        let node = *self.node(f)?;
        if let Some(x) = node.value() {
            let r = BinaryOp::GreaterEqual.eval(x, constant)?;
            return Ok(self.store.mk_terminal(r));
        }

        let key = CacheKey::threshold(f, k);
        if let Some(res) = self.cache.get(&key) {
            return Ok(res);
        }

        let m = node.level();
        let (f0, f1) = self.top_cofactors(f, m)?;
        let low = self.threshold_rec(f0, k, constant)?;
        let high = self.threshold_rec(f1, k, constant)?;

        let res = self.store.mk_node(m.var(), low, high)?;
        self.cache.insert(key, res);
        Ok(res)
    }
}

// Named wrappers
impl Mtbdd {
    pub fn apply_not(&mut self, f: NodeId) -> Result<NodeId> {
        self.apply_unary(UnaryOp::Not, f)
    }

    pub fn apply_and(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::And, u, v)
    }

    pub fn apply_or(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Or, u, v)
    }

    pub fn apply_xor(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Xor, u, v)
    }

    pub fn apply_implies(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Implies, u, v)
    }

    pub fn apply_equiv(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Equiv, u, v)
    }

    pub fn apply_and_many(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> Result<NodeId> {
        let mut res = NodeId::TRUE;
        for node in nodes {
            res = self.apply_and(res, node)?;
        }
        Ok(res)
    }

    pub fn apply_or_many(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> Result<NodeId> {
        let mut res = NodeId::FALSE;
        for node in nodes {
            res = self.apply_or(res, node)?;
        }
        Ok(res)
    }

    pub fn apply_add(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Add, u, v)
    }

    pub fn apply_sub(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Subtract, u, v)
    }

    pub fn apply_mul(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Multiply, u, v)
    }

    pub fn apply_min(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Min, u, v)
    }

    pub fn apply_max(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Max, u, v)
    }

    pub fn apply_neg(&mut self, f: NodeId) -> Result<NodeId> {
        self.apply_unary(UnaryOp::Negate, f)
    }

    pub fn apply_abs(&mut self, f: NodeId) -> Result<NodeId> {
        self.apply_unary(UnaryOp::Abs, f)
    }

    pub fn apply_ceil(&mut self, f: NodeId) -> Result<NodeId> {
        self.apply_unary(UnaryOp::Ceil, f)
    }

    pub fn apply_floor(&mut self, f: NodeId) -> Result<NodeId> {
        self.apply_unary(UnaryOp::Floor, f)
    }

    pub fn apply_eq(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::Equal, u, v)
    }

    pub fn apply_lt(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::LessThan, u, v)
    }

    pub fn apply_le(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::LessEqual, u, v)
    }

    pub fn apply_gt(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::GreaterThan, u, v)
    }

    pub fn apply_ge(&mut self, u: NodeId, v: NodeId) -> Result<NodeId> {
        self.apply(BinaryOp::GreaterEqual, u, v)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn xyz() -> (Mtbdd, NodeId, NodeId, NodeId) {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y", "z"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        let z = mgr.var("z").unwrap();
        (mgr, x, y, z)
    }

    #[test]
    fn test_de_morgan_and() {
        let (mut mgr, x, y, _) = xyz();

        let xy = mgr.apply_and(x, y).unwrap();
        let f = mgr.apply_not(xy).unwrap();
        let nx = mgr.apply_not(x).unwrap();
        let ny = mgr.apply_not(y).unwrap();
        let g = mgr.apply_or(nx, ny).unwrap();
        assert_eq!(f, g);
    }

    #[test]
    fn test_de_morgan_or() {
        let (mut mgr, x, y, _) = xyz();

        let xy = mgr.apply_or(x, y).unwrap();
        let f = mgr.apply_not(xy).unwrap();
        let nx = mgr.apply_not(x).unwrap();
        let ny = mgr.apply_not(y).unwrap();
        let g = mgr.apply_and(nx, ny).unwrap();
        assert_eq!(f, g);
    }

    #[test]
    fn test_xor_itself() {
        let (mut mgr, x, y, _) = xyz();
        let f = mgr.apply_and(x, y).unwrap();
        assert_eq!(mgr.apply_xor(f, f).unwrap(), mgr.zero());
    }

    #[test]
    fn test_xor_contrary() {
        let (mut mgr, x, y, _) = xyz();
        let f = mgr.apply_and(x, y).unwrap();
        let nf = mgr.apply_not(f).unwrap();
        assert_eq!(mgr.apply_xor(f, nf).unwrap(), mgr.one());
    }

    #[test]
    fn test_idempotence() {
        let (mut mgr, x, y, z) = xyz();
        let yz = mgr.apply_or(y, z).unwrap();
        let f = mgr.apply_xor(x, yz).unwrap();
        assert_eq!(mgr.apply_and(f, f).unwrap(), f);
        assert_eq!(mgr.apply_or(f, f).unwrap(), f);
        let nf = mgr.apply_not(f).unwrap();
        assert_eq!(mgr.apply_not(nf).unwrap(), f);
    }

    #[test]
    fn test_commutative_ops_share_cache() {
        let (mut mgr, x, y, z) = xyz();
        let yz = mgr.apply_xor(y, z).unwrap();
        let a = mgr.apply_and(x, yz).unwrap();
        let hits = mgr.memory_stats().cache_hits;
        let b = mgr.apply_and(yz, x).unwrap();
        assert_eq!(a, b);
        assert!(mgr.memory_stats().cache_hits > hits);
    }

    #[test]
    fn test_apply_ite() {
        let (mut mgr, x, y, z) = xyz();

        // Terminal cases
        assert_eq!(mgr.ite(mgr.one(), y, z).unwrap(), y);
        assert_eq!(mgr.ite(mgr.zero(), y, z).unwrap(), z);
        assert_eq!(mgr.ite(x, y, y).unwrap(), y);
        assert_eq!(mgr.ite(x, mgr.one(), mgr.zero()).unwrap(), x);
        let nx = mgr.apply_not(x).unwrap();
        assert_eq!(mgr.ite(x, mgr.zero(), mgr.one()).unwrap(), nx);

        // ite(f, f, h) == f | h
        let f = mgr.apply_or(x, z).unwrap();
        let lhs = mgr.ite(f, f, y).unwrap();
        let rhs = mgr.apply_or(f, y).unwrap();
        assert_eq!(lhs, rhs);

        // ite(f, g, f) == f & g
        let lhs = mgr.ite(f, y, f).unwrap();
        let rhs = mgr.apply_and(f, y).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_ite_multi_terminal() {
        let (mut mgr, x, _, _) = xyz();
        let ten = mgr.constant(10);
        let twenty = mgr.constant(20);
        let f = mgr.ite(x, ten, twenty).unwrap();
        assert_eq!(mgr.low(f).unwrap(), twenty);
        assert_eq!(mgr.high(f).unwrap(), ten);
        assert!(!mgr.is_boolean(f).unwrap());
    }

    #[test]
    fn test_ite_rejects_numeric_condition() {
        let (mut mgr, x, y, _) = xyz();
        let five = mgr.constant(5);
        let r = mgr.ite(five, x, y);
        assert!(matches!(r, Err(MtbddError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_terminal_arithmetic() {
        let mut mgr = Mtbdd::new();
        let five = mgr.constant(5);
        let three = mgr.constant(3);
        let sum = mgr.apply_add(five, three).unwrap();
        assert_eq!(mgr.terminal_value(sum), Some(Value::Int(8)));
        let diff = mgr.apply_sub(three, five).unwrap();
        assert_eq!(mgr.terminal_value(diff), Some(Value::Int(-2)));
        let prod = mgr.apply_mul(five, three).unwrap();
        assert_eq!(mgr.terminal_value(prod), Some(Value::Int(15)));
    }

    #[test]
    fn test_symbolic_arithmetic() {
        let (mut mgr, x, y, _) = xyz();
        let ten = mgr.constant(10);
        let five = mgr.constant(5);
        let zero = mgr.constant(0);
        let px = mgr.ite(x, ten, zero).unwrap();
        let py = mgr.ite(y, five, zero).unwrap();
        let total = mgr.apply_add(px, py).unwrap();

        let values = mgr.terminal_values(total).unwrap();
        assert_eq!(values.len(), 4);

        // Adding zero everywhere gives back the same function.
        assert_eq!(mgr.apply_add(total, zero).unwrap(), total);
        let max = mgr.apply_max(px, py).unwrap();
        let min = mgr.apply_min(px, py).unwrap();
        let sum = mgr.apply_add(max, min).unwrap();
        assert_eq!(sum, total);
    }

    #[test]
    fn test_comparisons() {
        let (mut mgr, x, _, _) = xyz();
        let ten = mgr.constant(10);
        let twenty = mgr.constant(20);
        let fifteen = mgr.constant(15);
        let f = mgr.ite(x, twenty, ten).unwrap();
        assert_eq!(mgr.apply_gt(f, fifteen).unwrap(), x);
        assert_eq!(mgr.apply_le(f, fifteen).unwrap(), mgr.apply_not(x).unwrap());
        assert_eq!(mgr.apply_eq(f, twenty).unwrap(), x);
        assert_eq!(mgr.apply_lt(f, twenty).unwrap(), mgr.apply_not(x).unwrap());
        assert_eq!(mgr.apply_ge(f, ten).unwrap(), mgr.one());
    }

    #[test]
    fn test_unary_numeric() {
        let (mut mgr, x, _, _) = xyz();
        let a = mgr.constant(-2.5);
        let b = mgr.constant(3.5);
        let f = mgr.ite(x, a, b).unwrap();

        let neg = mgr.apply_neg(f).unwrap();
        let abs = mgr.apply_abs(f).unwrap();
        let ceil = mgr.apply_ceil(f).unwrap();
        let floor = mgr.apply_floor(f).unwrap();

        let at = |mgr: &Mtbdd, g: NodeId, v: bool| mgr.evaluate(g, &[("x", v)].into()).unwrap();
        assert_eq!(at(&mgr, neg, true), Value::number(2.5));
        assert_eq!(at(&mgr, abs, true), Value::number(2.5));
        assert_eq!(at(&mgr, ceil, true), Value::Int(-2));
        assert_eq!(at(&mgr, floor, false), Value::Int(3));
    }

    #[test]
    fn test_boolean_ops_reject_numbers() {
        let (mut mgr, x, _, _) = xyz();
        let five = mgr.constant(5);
        let g = mgr.ite(x, five, mgr.zero()).unwrap();
        assert!(matches!(mgr.apply_and(x, g), Err(MtbddError::UnsupportedOperation(_))));
        assert!(matches!(mgr.apply_not(g), Err(MtbddError::UnsupportedOperation(_))));
        assert!(matches!(mgr.apply_or(five, x), Err(MtbddError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_division_unsupported() {
        let mut mgr = Mtbdd::new();
        let six = mgr.constant(6);
        let two = mgr.constant(2);
        let n = mgr.memory_stats().total_nodes;
        assert!(matches!(
            mgr.apply(BinaryOp::Divide, six, two),
            Err(MtbddError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            mgr.apply(BinaryOp::Modulo, six, two),
            Err(MtbddError::UnsupportedOperation(_))
        ));
        assert_eq!(mgr.memory_stats().total_nodes, n);
    }

    #[test]
    fn test_invalid_handle() {
        let (mut mgr, x, _, _) = xyz();
        let bogus = NodeId::new(9999);
        assert_eq!(mgr.apply_add(x, bogus), Err(MtbddError::InvalidHandle(bogus)));
        assert_eq!(mgr.apply_and(NodeId::NULL, x), Err(MtbddError::InvalidHandle(NodeId::NULL)));
    }

    #[test]
    fn test_threshold() {
        let mut mgr = Mtbdd::new();
        let twelve = mgr.constant(12);
        let t = mgr.threshold(twelve, 10).unwrap();
        assert_eq!(t, mgr.one());
        let t = mgr.threshold(twelve, 13).unwrap();
        assert_eq!(t, mgr.zero());
    }

    #[test]
    fn test_threshold_symbolic() {
        let (mut mgr, x, y, _) = xyz();
        let eight = mgr.constant(8);
        let four = mgr.constant(4);
        let zero = mgr.constant(0);
        let px = mgr.ite(x, eight, zero).unwrap();
        let py = mgr.ite(y, four, zero).unwrap();
        let total = mgr.apply_add(px, py).unwrap();

        // total >= 10 only when both are selected
        let t = mgr.threshold(total, 10).unwrap();
        assert_eq!(t, mgr.apply_and(x, y).unwrap());
        // total >= 4 when either is selected
        let t = mgr.threshold(total, 4).unwrap();
        assert_eq!(t, mgr.apply_or(x, y).unwrap());
    }

    #[test]
    fn test_and_or_many() {
        let (mut mgr, x, y, z) = xyz();
        let all = mgr.apply_and_many([x, y, z]).unwrap();
        let xy = mgr.apply_and(x, y).unwrap();
        assert_eq!(all, mgr.apply_and(xy, z).unwrap());
        assert_eq!(mgr.apply_and_many([]).unwrap(), mgr.one());
        assert_eq!(mgr.apply_or_many([]).unwrap(), mgr.zero());
    }

    #[test]
    fn test_min_max_with_nan_ignore_operand_order() {
        let (mut mgr, x, _, _) = xyz();
        let nan = mgr.constant(f64::NAN);
        let one = mgr.constant(1);
        let two = mgr.constant(2);
        assert_eq!(mgr.apply_min(nan, one).unwrap(), mgr.apply_min(one, nan).unwrap());
        assert_eq!(mgr.apply_max(one, nan).unwrap(), nan);

        let f = mgr.ite(x, nan, two).unwrap();
        let g = mgr.ite(x, one, two).unwrap();
        let fg = mgr.apply_min(f, g).unwrap();
        let gf = mgr.apply_min(g, f).unwrap();
        assert_eq!(fg, gf);
        assert_eq!(fg, f);
        let hi = mgr.apply_max(g, f).unwrap();
        assert_eq!(hi, f);
    }
}
