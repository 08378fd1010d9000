//! # mtbdd: Multi-Terminal Binary Decision Diagrams in Rust
//!
//! **`mtbdd`** is a manager-centric library for **Multi-Terminal Binary Decision Diagrams**:
//! decision diagrams whose leaves carry arbitrary values (booleans, integers, floats)
//! instead of just `0` and `1`.
//! They represent functions from boolean assignments to values, such as the price of a
//! product configuration or a score computed from a set of feature flags.
//!
//! ## What is an MTBDD?
//!
//! An MTBDD is a directed acyclic graph where every internal node tests one variable and
//! every terminal holds a value. For a fixed variable ordering, the reduced and
//! hash-consed diagram is **canonical**: two handles are equal if and only if they denote
//! the same function.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`Mtbdd`][crate::mtbdd::Mtbdd] manager,
//!   which owns the node store, the unique tables and the operation cache.
//! - **Lightweight handles**: Functions are referred to by [`NodeId`][crate::reference::NodeId] indices.
//! - **Rich operator set**: boolean connectives, arithmetic (`+`, `-`, `*`, `min`, `max`),
//!   comparisons, if-then-else, thresholding and quantification over boolean sub-functions.
//! - **Lifecycle**: reference-counted roots and mark-and-sweep garbage collection.
//! - **Persistence**: a compact, versioned binary format.
//!
//! ## Basic Usage
//!
//! ```rust
//! use mtbdd::mtbdd::Mtbdd;
//! use mtbdd::value::Value;
//!
//! let mut mgr = Mtbdd::new();
//! mgr.declare(["premium", "support"]).unwrap();
//! let premium = mgr.var("premium").unwrap();
//! let support = mgr.var("support").unwrap();
//!
//! // price = 100 + (premium ? 50 : 0) + (support ? 20 : 0)
//! let base = mgr.constant(100);
//! let zero = mgr.constant(0);
//! let fifty = mgr.constant(50);
//! let twenty = mgr.constant(20);
//! let p = mgr.ite(premium, fifty, zero).unwrap();
//! let s = mgr.ite(support, twenty, zero).unwrap();
//! let extras = mgr.apply_add(p, s).unwrap();
//! let price = mgr.apply_add(base, extras).unwrap();
//!
//! let value = mgr.evaluate(price, &[("premium", true), ("support", false)].into()).unwrap();
//! assert_eq!(value, Value::Int(150));
//!
//! // Which configurations cost at least 150?
//! let expensive = mgr.threshold(price, 150).unwrap();
//! assert_eq!(expensive, premium);
//! ```
//!
//! ## Core Components
//!
//! - **[`mtbdd`]**: The [`Mtbdd`][crate::mtbdd::Mtbdd] manager: declaration, construction, inspection.
//! - **[`apply`]**: The recursive Apply/ITE engine and its named wrappers.
//! - **[`quant`]**: Restriction and quantification.
//! - **[`gc`]**: Roots and garbage collection.
//! - **[`io`]**: Binary serialization.
//! - **[`context`]** and **[`expr`]**: Compiling expression trees on a [`SharedMtbdd`][crate::shared::SharedMtbdd].

pub mod apply;
pub mod cache;
pub mod context;
pub mod dot;
pub mod error;
pub mod eval;
pub mod expr;
pub mod gc;
pub mod io;
pub mod mtbdd;
pub mod node;
pub mod ops;
pub mod quant;
pub mod reference;
pub mod registry;
pub mod sat;
pub mod shared;
pub mod store;
pub mod types;
pub mod value;
