//! MTBDD to DOT (Graphviz) conversion.
//!
//! The generated graph follows these conventions:
//! - **Terminal nodes** are rendered as boxes at the bottom (sink rank), labeled with their value
//! - **Internal nodes** are rendered as circles labeled with the variable name, grouped by level
//! - **Edges**: solid for high (then), dashed for low (else)
//! - **Roots** are rendered as plain text at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use mtbdd::mtbdd::Mtbdd;
//!
//! let mut mgr = Mtbdd::new();
//! mgr.declare(["x", "y"]).unwrap();
//! let x = mgr.var("x").unwrap();
//! let y = mgr.var("y").unwrap();
//! let f = mgr.apply_and(x, y).unwrap();
//!
//! let dot = mgr.to_dot(&[f]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::{MtbddError, Result};
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::reference::NodeId;
use crate::types::Level;

/// Visual options for [`Mtbdd::to_dot_with_config`].
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for internal nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for terminal nodes (default: "box")
    pub terminal_shape: &'static str,
    /// Shape for root labels (default: "plaintext")
    pub root_shape: &'static str,
    /// Style for high (then) edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low (else) edges (default: "dashed")
    pub low_edge_style: &'static str,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "box",
            root_shape: "plaintext",
            high_edge_style: "solid",
            low_edge_style: "dashed",
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Mtbdd {
    /// Renders the diagrams rooted at `roots` in DOT format.
    ///
    /// Shared sub-graphs appear once.
    pub fn to_dot(&self, roots: &[NodeId]) -> Result<String> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    pub fn to_dot_with_config(&self, roots: &[NodeId], config: &DotConfig) -> Result<String> {
        // Group nodes by level; terminals share the bottom rank.
        let mut levels = BTreeMap::<Level, Vec<(NodeId, Node)>>::new();
        for id in self.descendants(roots.iter().copied())? {
            let node = *self.node(id)?;
            levels.entry(node.level()).or_default().push((id, node));
        }
        for nodes in levels.values_mut() {
            nodes.sort_unstable_by_key(|&(id, _)| id);
        }

        self.render_dot(roots, &levels, config)
            .map_err(|e| MtbddError::UnsupportedOperation(format!("DOT rendering failed: {}", e)))
    }

    fn render_dot(
        &self,
        roots: &[NodeId],
        levels: &BTreeMap<Level, Vec<(NodeId, Node)>>,
        config: &DotConfig,
    ) -> std::result::Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        for (level, nodes) in levels.iter() {
            if level.is_terminal() {
                writeln!(dot, "{{ rank=sink")?;
            } else {
                writeln!(dot, "{{ rank=same")?;
            }
            for &(id, node) in nodes {
                match node {
                    Node::Terminal { value } => {
                        writeln!(dot, "{} [shape={}, label=\"{}\"];", id.raw(), config.terminal_shape, value)?;
                    }
                    Node::Internal { var, .. } => {
                        let name = self.registry.name_of(var).map_or_else(|| var.to_string(), str::to_string);
                        writeln!(dot, "{} [label=\"{}\"];", id.raw(), escape(&name))?;
                    }
                }
            }
            writeln!(dot, "}}")?;
        }

        // High edges are solid, low edges are dashed
        for nodes in levels.values() {
            for &(id, node) in nodes {
                if let Some((low, high)) = node.children() {
                    writeln!(dot, "{} -- {} [style={}];", id.raw(), high.raw(), config.high_edge_style)?;
                    writeln!(dot, "{} -- {} [style={}];", id.raw(), low.raw(), config.low_edge_style)?;
                }
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;

        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -- {};", i, root.raw())?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
