//! Binary persistence of diagrams.
//!
//! # Format
//!
//! ```text
//! magic    "MTBD"
//! version  u8
//! vars     <count> { <level> <len> <utf8 bytes> }*   # referenced variables, by level
//! nodes    <count> { <node> }*                       # bottom-up: children first
//! roots    <count> { <node index> }*
//!
//! node  = 0x00 <u8>            # Bool
//!       | 0x01 <zigzag>        # Int
//!       | 0x02 <f64 LE bits>   # Float
//!       | 0x03 <var> <low> <high>
//! ```
//!
//! All counts and indices are unsigned LEB128 varints. `<var>` indexes the
//! variable list, `<low>` and `<high>` index earlier entries of the node list.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::{MtbddError, Result};
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::reference::NodeId;
use crate::types::Var;
use crate::value::Value;

const MAGIC: &[u8; 4] = b"MTBD";
const VERSION: u8 = 1;

const TAG_BOOL: u8 = 0;
const TAG_INT: u8 = 1;
const TAG_FLOAT: u8 = 2;
const TAG_NODE: u8 = 3;

fn write_varint(out: &mut Vec<u8>, mut x: u64) {
    while x >= 0x80 {
        out.push((x as u8) | 0x80);
        x >>= 7;
    }
    out.push(x as u8);
}

fn zigzag(x: i64) -> u64 {
    ((x << 1) ^ (x >> 63)) as u64
}

fn unzigzag(x: u64) -> i64 {
    ((x >> 1) as i64) ^ -((x & 1) as i64)
}

fn malformed(message: impl Into<String>) -> MtbddError {
    MtbddError::SerializationError(message.into())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(malformed(format!("unexpected end of input at byte {}", self.pos))),
        }
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn varint(&mut self) -> Result<u64> {
        let mut x = 0u64;
        let mut shift = 0;
        loop {
            let b = self.byte()?;
            if shift >= 64 || (shift == 63 && b > 1) {
                return Err(malformed(format!("varint overflow at byte {}", self.pos)));
            }
            x |= u64::from(b & 0x7f) << shift;
            if b & 0x80 == 0 {
                return Ok(x);
            }
            shift += 7;
        }
    }

    /// A varint used as a count or index; must be below `bound`.
    fn index(&mut self, bound: usize, what: &str) -> Result<usize> {
        let x = self.varint()?;
        usize::try_from(x)
            .ok()
            .filter(|&i| i < bound)
            .ok_or_else(|| malformed(format!("{} {} out of range (< {})", what, x, bound)))
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        // Every entry takes at least one byte.
        let remaining = self.bytes.len() - self.pos;
        self.index(remaining + 1, what)
    }

    fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }
}

impl Mtbdd {
    /// Encodes the functions `roots` (and everything they reach) into a
    /// self-contained byte buffer.
    pub fn serialize(&self, roots: &[NodeId]) -> Result<Vec<u8>> {
        let order = self.bottom_up(roots)?;

        let mut vars: Vec<Var> = Vec::new();
        for &id in &order {
            if let Some(var) = self.node(id)?.var() {
                vars.push(var);
            }
        }
        vars.sort_unstable();
        vars.dedup();
        let var_index: HashMap<Var, usize> = vars.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let node_index: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.push(VERSION);

        write_varint(&mut out, vars.len() as u64);
        for &var in &vars {
            let name = self
                .registry
                .name_of(var)
                .ok_or_else(|| MtbddError::VariableNotDeclared(var.to_string()))?;
            write_varint(&mut out, u64::from(var.level().raw()));
            write_varint(&mut out, name.len() as u64);
            out.extend_from_slice(name.as_bytes());
        }

        write_varint(&mut out, order.len() as u64);
        for &id in &order {
            match *self.node(id)? {
                Node::Terminal { value: Value::Bool(b) } => {
                    out.push(TAG_BOOL);
                    out.push(u8::from(b));
                }
                Node::Terminal { value: Value::Int(x) } => {
                    out.push(TAG_INT);
                    write_varint(&mut out, zigzag(x));
                }
                Node::Terminal { value: Value::Float(x) } => {
                    out.push(TAG_FLOAT);
                    out.extend_from_slice(&x.into_inner().to_bits().to_le_bytes());
                }
                Node::Internal { var, low, high, .. } => {
                    out.push(TAG_NODE);
                    write_varint(&mut out, var_index[&var] as u64);
                    write_varint(&mut out, node_index[&low] as u64);
                    write_varint(&mut out, node_index[&high] as u64);
                }
            }
        }

        write_varint(&mut out, roots.len() as u64);
        for root in roots {
            write_varint(&mut out, node_index[root] as u64);
        }

        debug!(
            "serialize: {} roots, {} nodes, {} vars -> {} bytes",
            roots.len(),
            order.len(),
            vars.len(),
            out.len()
        );
        Ok(out)
    }

    /// Nodes reachable from `roots`, children before parents.
    fn bottom_up(&self, roots: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(NodeId, bool)> = roots.iter().rev().map(|&r| (r, false)).collect();

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            if let Some((low, high)) = self.node(id)?.children() {
                stack.push((high, false));
                stack.push((low, false));
            }
        }

        Ok(order)
    }

    /// Decodes `bytes` into a fresh manager, returning it with the decoded roots.
    pub fn deserialize(bytes: &[u8]) -> Result<(Mtbdd, Vec<NodeId>)> {
        let mut mgr = Mtbdd::new();
        let roots = mgr.load_into(bytes)?;
        Ok((mgr, roots))
    }

    /// Decodes `bytes` into this manager, declaring variables it does not
    /// know yet, and returns the decoded roots.
    ///
    /// The whole buffer is decoded and checked first: on malformed input
    /// nothing is declared or built.
    pub fn load_into(&mut self, bytes: &[u8]) -> Result<Vec<NodeId>> {
        let snapshot = Snapshot::decode(bytes)?;

        let vars = self.declare(&snapshot.names)?;
        // Levels here may disagree with the encoded order if this manager already
        // knew some of the names; nodes are then rebuilt with ITE.
        let monotone = vars.windows(2).all(|w| w[0] < w[1]);

        let mut ids: Vec<NodeId> = Vec::with_capacity(snapshot.entries.len());
        for entry in &snapshot.entries {
            let id = match *entry {
                Entry::Terminal(value) => self.constant(value),
                Entry::Node { var, low, high } => {
                    let (var, low, high) = (vars[var], ids[low], ids[high]);
                    if monotone {
                        self.mk_node(var, low, high)?
                    } else {
                        let v = self.mk_var(var)?;
                        self.ite(v, high, low)?
                    }
                }
            };
            ids.push(id);
        }

        let roots: Vec<NodeId> = snapshot.roots.iter().map(|&i| ids[i]).collect();
        debug!("load_into: {} nodes, {} roots", ids.len(), roots.len());
        Ok(roots)
    }
}

/// A decoded node entry; indices refer to the variable list and to earlier entries.
#[derive(Debug, Copy, Clone)]
enum Entry {
    Terminal(Value),
    Node { var: usize, low: usize, high: usize },
}

/// A fully decoded and validated buffer, not yet attached to any manager.
#[derive(Debug)]
struct Snapshot {
    names: Vec<String>,
    entries: Vec<Entry>,
    roots: Vec<usize>,
}

impl Snapshot {
    fn decode(bytes: &[u8]) -> Result<Snapshot> {
        let mut r = Reader::new(bytes);

        if r.take(MAGIC.len()).ok() != Some(&MAGIC[..]) {
            return Err(malformed("bad magic"));
        }
        let version = r.byte()?;
        if version != VERSION {
            return Err(malformed(format!("unsupported format version {}", version)));
        }

        let var_count = r.count("variable count")?;
        let mut names = Vec::with_capacity(var_count);
        let mut seen = HashSet::with_capacity(var_count);
        let mut last_level = None;
        for _ in 0..var_count {
            let level = r.varint()?;
            if last_level.is_some_and(|last| level <= last) {
                return Err(malformed(format!("variable levels not increasing at {}", level)));
            }
            last_level = Some(level);
            let len = r.count("name length")?;
            let name = std::str::from_utf8(r.take(len)?).map_err(|e| malformed(format!("variable name: {}", e)))?;
            if name.is_empty() {
                return Err(malformed("empty variable name"));
            }
            if !seen.insert(name) {
                return Err(malformed(format!("duplicate variable name '{}'", name)));
            }
            names.push(name.to_string());
        }

        let node_count = r.count("node count")?;
        let mut entries = Vec::with_capacity(node_count);
        // Position of each entry in the variable order; terminals sort last.
        let mut rank: Vec<usize> = Vec::with_capacity(node_count);
        for i in 0..node_count {
            let entry = match r.byte()? {
                TAG_BOOL => match r.byte()? {
                    0 => Entry::Terminal(Value::Bool(false)),
                    1 => Entry::Terminal(Value::Bool(true)),
                    b => return Err(malformed(format!("bad boolean byte {}", b))),
                },
                TAG_INT => Entry::Terminal(Value::Int(unzigzag(r.varint()?))),
                TAG_FLOAT => {
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(r.take(8)?);
                    Entry::Terminal(Value::number(f64::from_bits(u64::from_le_bytes(buf))))
                }
                TAG_NODE => {
                    let var = r.index(names.len(), "variable index")?;
                    let low = r.index(i, "child index")?;
                    let high = r.index(i, "child index")?;
                    if rank[low] <= var || rank[high] <= var {
                        return Err(malformed(format!("node {} is not ordered above its children", i)));
                    }
                    Entry::Node { var, low, high }
                }
                tag => return Err(malformed(format!("unknown node tag {}", tag))),
            };
            rank.push(match entry {
                Entry::Terminal(_) => usize::MAX,
                Entry::Node { var, .. } => var,
            });
            entries.push(entry);
        }

        let root_count = r.count("root count")?;
        let mut roots = Vec::with_capacity(root_count);
        for _ in 0..root_count {
            roots.push(r.index(entries.len(), "root index")?);
        }

        if !r.is_empty() {
            return Err(malformed(format!("{} trailing bytes", bytes.len() - r.pos)));
        }

        Ok(Snapshot { names, entries, roots })
    }
}
