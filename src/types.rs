//! Type-safe wrappers for MTBDD variables and levels.
//!
//! Variables are identified by the order of their first declaration, and the
//! engine never reorders them, so a variable's [`Level`] never changes once it
//! has been assigned. The two newtypes are still kept apart so that code walking
//! the diagram (which compares levels) reads differently from code talking
//! about variables (which are named by the caller).
use std::fmt;

/// A variable identifier (0-indexed, in declaration order).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    pub const fn new(id: u32) -> Self {
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the level this variable occupies in the (fixed) ordering.
    pub const fn level(self) -> Level {
        Level(self.0)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// A level in the variable ordering (0 = top, closest to the roots).
///
/// Terminals sit below every variable; see [`Level::TERMINAL`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(u32);

impl Level {
    /// Pseudo-level of terminal nodes, greater than any variable level.
    pub const TERMINAL: Level = Level(u32::MAX);

    pub const fn new(level: u32) -> Self {
        Level(level)
    }

    /// Returns the raw level value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the level as usize for indexing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == u32::MAX
    }

    /// Returns the variable sitting at this level.
    pub const fn var(self) -> Var {
        Var(self.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "L⊥")
        } else {
            write!(f, "L{}", self.0)
        }
    }
}

impl From<u32> for Level {
    fn from(level: u32) -> Self {
        Level::new(level)
    }
}
