//! Front queue trait definition
//!
//! The spread simulator never decides in which order burning cells are
//! expanded; it delegates to a `FrontQueue`. The FIFO and arrival-time
//! implementations live in `queue.rs`.

use crate::core_types::units::Hours;

/// A cell waiting to spread fire to its neighbours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontEntry {
    /// Arrival time at this cell
    pub time: Hours,
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl FrontEntry {
    /// Create a new entry
    pub fn new(time: Hours, row: usize, col: usize) -> Self {
        Self { time, row, col }
    }
}

/// Worklist strategy for front expansion
///
/// # Contract
///
/// Implementations that return `false` from `revisits_reached_cells` are
/// expanded with first-arrival-wins semantics: once a cell has a time it is
/// never updated. Implementations returning `true` may see the same cell
/// pushed several times with decreasing times; the simulator skips entries
/// whose time is later than the cell's recorded arrival.
pub trait FrontQueue: Send {
    /// Add an entry to the worklist
    fn push(&mut self, entry: FrontEntry);

    /// Remove the next entry to expand
    fn pop(&mut self) -> Option<FrontEntry>;

    /// Number of pending entries
    fn len(&self) -> usize;

    /// Whether no entries are pending
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all pending entries
    fn clear(&mut self);

    /// Whether reached cells may be improved by a faster route found later
    fn revisits_reached_cells(&self) -> bool;

    /// Name used in logs
    fn name(&self) -> &'static str;
}
