//! Compiling expression trees onto a shared manager.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::error::MtbddError;
use crate::expr::{Expr, ExprKind, Span};
use crate::mtbdd::Mtbdd;
use crate::reference::NodeId;
use crate::shared::SharedMtbdd;
use crate::types::Var;
use crate::value::Value;

/// An engine error attributed to the sub-expression that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error} in `{source_text}`{}", .span.map(|s| format!(" at {}", s)).unwrap_or_default())]
pub struct CompileError {
    /// Rendered form of the failing sub-expression.
    pub source_text: String,
    pub span: Option<Span>,
    #[source]
    pub error: MtbddError,
}

/// Front-end state: a [`SharedMtbdd`] plus a cache from rendered
/// expressions to the functions they compiled to.
///
/// Cached functions are retained as garbage-collection roots until
/// [`CompilationContext::clear_cache`].
#[derive(Debug, Default)]
pub struct CompilationContext {
    mtbdd: SharedMtbdd,
    cache: HashMap<String, NodeId>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mtbdd(mtbdd: SharedMtbdd) -> Self {
        Self {
            mtbdd,
            cache: HashMap::new(),
        }
    }

    pub fn mtbdd(&self) -> &SharedMtbdd {
        &self.mtbdd
    }

    pub fn declare_variable(&self, name: &str) -> Result<Var, MtbddError> {
        self.mtbdd.write().declare_var(name)
    }

    /// The single-variable function for an already declared `name`.
    pub fn get_variable(&self, name: &str) -> Result<NodeId, MtbddError> {
        self.mtbdd.write().var(name)
    }

    /// Declares every name not known yet, keeping the given order.
    pub fn auto_declare_variables<I, S>(&self, names: I) -> Result<Vec<Var>, MtbddError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mtbdd.write().declare(names)
    }

    pub fn create_constant(&self, value: impl Into<Value>) -> NodeId {
        self.mtbdd.write().constant(value)
    }

    pub fn get_cached(&self, source: &str) -> Option<NodeId> {
        self.cache.get(source).copied()
    }

    pub fn set_cached(&mut self, source: &str, f: NodeId) -> Result<(), MtbddError> {
        let mut mgr = self.mtbdd.write();
        Self::insert_cached(&mut mgr, &mut self.cache, source.to_string(), f)
    }

    fn insert_cached(
        mgr: &mut Mtbdd,
        cache: &mut HashMap<String, NodeId>,
        source: String,
        f: NodeId,
    ) -> Result<(), MtbddError> {
        mgr.retain(f)?;
        if let Some(old) = cache.insert(source, f) {
            mgr.release(old);
        }
        Ok(())
    }

    /// Drops every cached entry and releases the corresponding roots.
    pub fn clear_cache(&mut self) {
        let mut mgr = self.mtbdd.write();
        for (_, f) in self.cache.drain() {
            mgr.release(f);
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn wrap_error(&self, error: MtbddError, source: &str, span: Option<Span>) -> CompileError {
        CompileError {
            source_text: source.to_string(),
            span,
            error,
        }
    }

    /// Compiles `expr`, reusing cached results for sub-expressions that were
    /// compiled before.
    ///
    /// Variables must be declared beforehand, for example with
    /// `ctx.auto_declare_variables(expr.variables())`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtbdd::context::CompilationContext;
    /// use mtbdd::expr::Expr;
    /// use mtbdd::value::Value;
    ///
    /// let mut ctx = CompilationContext::new();
    /// let e = Expr::ite(Expr::var("x"), Expr::number(5), Expr::number(3));
    /// ctx.auto_declare_variables(e.variables()).unwrap();
    /// let f = ctx.compile(&e).unwrap();
    /// let v = ctx.mtbdd().read().evaluate(f, &[("x", true)].into()).unwrap();
    /// assert_eq!(v, Value::Int(5));
    /// ```
    pub fn compile(&mut self, expr: &Expr) -> Result<NodeId, CompileError> {
        let mut mgr = self.mtbdd.write();
        Self::compile_rec(&mut mgr, &mut self.cache, expr)
    }

    fn compile_rec(
        mgr: &mut Mtbdd,
        cache: &mut HashMap<String, NodeId>,
        expr: &Expr,
    ) -> Result<NodeId, CompileError> {
        let source = expr.to_string();
        if let Some(&f) = cache.get(&source) {
            debug!("compile: cached `{}` -> {}", source, f);
            return Ok(f);
        }

        let res = match &expr.kind {
            ExprKind::Bool(b) => Ok(mgr.constant(*b)),
            ExprKind::Number(v) => Ok(mgr.constant(*v)),
            ExprKind::Var(name) => mgr.var(name),
            ExprKind::Unary(op, e) => {
                let f = Self::compile_rec(mgr, cache, e)?;
                mgr.apply_unary(*op, f)
            }
            ExprKind::Binary(op, a, b) => {
                let f = Self::compile_rec(mgr, cache, a)?;
                let g = Self::compile_rec(mgr, cache, b)?;
                mgr.apply(*op, f, g)
            }
            ExprKind::Ite(c, t, e) => {
                let f = Self::compile_rec(mgr, cache, c)?;
                let g = Self::compile_rec(mgr, cache, t)?;
                let h = Self::compile_rec(mgr, cache, e)?;
                mgr.ite(f, g, h)
            }
            ExprKind::Threshold(e, k) => {
                let f = Self::compile_rec(mgr, cache, e)?;
                mgr.threshold(f, *k)
            }
            ExprKind::Exists(names, e) => {
                let f = Self::compile_rec(mgr, cache, e)?;
                mgr.exists(f, names)
            }
            ExprKind::ForAll(names, e) => {
                let f = Self::compile_rec(mgr, cache, e)?;
                mgr.forall(f, names)
            }
        };

        let wrap = |error| CompileError {
            source_text: source.clone(),
            span: expr.span,
            error,
        };
        let f = res.map_err(wrap)?;
        debug!("compile: `{}` -> {}", source, f);
        Self::insert_cached(mgr, cache, source.clone(), f).map_err(wrap)?;
        Ok(f)
    }
}

impl Drop for CompilationContext {
    fn drop(&mut self) {
        self.clear_cache();
    }
}
