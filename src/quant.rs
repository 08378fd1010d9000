//! Restriction (cofactoring) and quantification.

use std::collections::HashMap;

use log::debug;

use crate::error::Result;
use crate::eval::Assignment;
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::ops::BinaryOp;
use crate::reference::NodeId;
use crate::types::{Level, Var};

/// Which way [`Mtbdd::quantify`] combines the two cofactors of a variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Quantifier {
    /// `f|v=0 OR f|v=1`.
    Exists,
    /// `f|v=0 AND f|v=1`.
    ForAll,
}

impl Quantifier {
    fn op(self) -> BinaryOp {
        match self {
            Quantifier::Exists => BinaryOp::Or,
            Quantifier::ForAll => BinaryOp::And,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Quantifier::Exists => "EXISTS",
            Quantifier::ForAll => "FORALL",
        }
    }
}

impl Mtbdd {
    /// Cofactor `f|name<-value`.
    pub fn restrict(&mut self, f: NodeId, name: &str, value: bool) -> Result<NodeId> {
        let var = self.registry.var_of(name)?;
        self.restrict_var(f, var, value)
    }

    /// Cofactor `f|v<-b`.
    pub fn restrict_var(&mut self, f: NodeId, v: Var, b: bool) -> Result<NodeId> {
        let mut cache = HashMap::new();
        self.restrict_(f, v.level(), b, &mut cache)
    }

    fn restrict_(
        &mut self,
        f: NodeId,
        level: Level,
        b: bool,
        cache: &mut HashMap<NodeId, NodeId>,
    ) -> Result<NodeId> {
        let (i, low, high) = match *self.node(f)? {
            Node::Terminal { .. } => return Ok(f),
            Node::Internal { level, low, high, .. } => (level, low, high),
        };

        if level < i {
            // 'f' does not depend on 'v'
            return Ok(f);
        }
        if level == i {
            return Ok(if b { high } else { low });
        }

        if let Some(&res) = cache.get(&f) {
            return Ok(res);
        }

        let low = self.restrict_(low, level, b, cache)?;
        let high = self.restrict_(high, level, b, cache)?;
        let res = self.store.mk_node(i.var(), low, high)?;
        cache.insert(f, res);
        Ok(res)
    }

    /// Cofactor of `f` with respect to every variable bound in `values`.
    pub fn restrict_many(&mut self, f: NodeId, values: &Assignment) -> Result<NodeId> {
        debug!("restrict_many(f = {}, values = {:?})", f, values);
        let mut levels = HashMap::new();
        for (name, value) in values.iter() {
            levels.insert(self.registry.level_of(name)?, value);
        }
        let mut cache = HashMap::new();
        self.restrict_many_(f, &levels, &mut cache)
    }

    fn restrict_many_(
        &mut self,
        f: NodeId,
        values: &HashMap<Level, bool>,
        cache: &mut HashMap<NodeId, NodeId>,
    ) -> Result<NodeId> {
        let (i, low, high) = match *self.node(f)? {
            Node::Terminal { .. } => return Ok(f),
            Node::Internal { level, low, high, .. } => (level, low, high),
        };

        if values.is_empty() {
            return Ok(f);
        }

        if let Some(&res) = cache.get(&f) {
            return Ok(res);
        }

        let res = match values.get(&i) {
            Some(true) => self.restrict_many_(high, values, cache)?,
            Some(false) => self.restrict_many_(low, values, cache)?,
            None => {
                let low = self.restrict_many_(low, values, cache)?;
                let high = self.restrict_many_(high, values, cache)?;
                self.store.mk_node(i.var(), low, high)?
            }
        };
        cache.insert(f, res);
        Ok(res)
    }

    /// Existential quantification: `∃ names. f`.
    ///
    /// Defined for boolean-valued `f` only.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtbdd::mtbdd::Mtbdd;
    ///
    /// let mut mgr = Mtbdd::new();
    /// mgr.declare(["x", "y"]).unwrap();
    /// let x = mgr.var("x").unwrap();
    /// let y = mgr.var("y").unwrap();
    /// let f = mgr.apply_and(x, y).unwrap();
    /// assert_eq!(mgr.exists(f, ["y"]).unwrap(), x);
    /// ```
    pub fn exists<I, S>(&mut self, f: NodeId, names: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vars = self.resolve(names)?;
        self.quantify(Quantifier::Exists, f, vars)
    }

    /// Universal quantification: `∀ names. f`.
    ///
    /// Defined for boolean-valued `f` only.
    pub fn forall<I, S>(&mut self, f: NodeId, names: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vars = self.resolve(names)?;
        self.quantify(Quantifier::ForAll, f, vars)
    }

    fn resolve<I, S>(&self, names: I) -> Result<Vec<Var>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.registry.var_of(name.as_ref()))
            .collect()
    }

    /// Eliminates `vars` one by one, deepest level first, combining the two
    /// cofactors as `quantifier` says.
    pub fn quantify(&mut self, quantifier: Quantifier, f: NodeId, mut vars: Vec<Var>) -> Result<NodeId> {
        debug!("quantify({:?}, f = {}, vars = {:?})", quantifier, f, vars);
        self.expect_boolean(quantifier.name(), f)?;
        let op = quantifier.op();

        vars.sort_unstable_by(|a, b| b.cmp(a));
        vars.dedup();

        let mut res = f;
        for v in vars {
            let f0 = self.restrict_var(res, v, false)?;
            let f1 = self.restrict_var(res, v, true)?;
            res = self.apply(op, f0, f1)?;
        }
        Ok(res)
    }
}
