//! Fire spread solver module
//!
//! Propagates fire across a `RateField` and records the time of arrival in
//! each cell. The expansion order is abstracted behind the `FrontQueue`
//! trait, which has a FIFO and an earliest-arrival implementation.
//!
//! # Traversal Selection
//!
//! `SpreadConfig::traversal` picks the queue:
//! 1. `Fifo` (default): insertion-order wave expansion, first arrival wins
//! 2. `ArrivalTime`: earliest-arrival-first with improvement of reached cells
//!
//! # Example
//!
//! ```rust
//! use fire_spread_core::core_types::units::{Feet, FeetPerMinute, Hours};
//! use fire_spread_core::grid::RateField;
//! use fire_spread_core::solver::SpreadSimulator;
//!
//! let field = RateField::uniform(5, 5, FeetPerMinute::new(10.0)).unwrap();
//! let outcome = SpreadSimulator::default()
//!     .simulate(&field, 2, 2, Hours::new(1.0), Feet::new(98.4))
//!     .unwrap();
//! assert_eq!(outcome.burned_cells(), 25);
//! ```

pub mod arrival;
pub mod cancel;
pub mod config;
pub mod queue;
pub mod spread;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use arrival::{ArrivalTimeGrid, CellState};
pub use cancel::CancelToken;
pub use config::{SpreadConfig, TraversalOrder};
pub use queue::{ArrivalTimeQueue, FifoQueue};
pub use r#trait::{FrontEntry, FrontQueue};
pub use spread::{IgnitionPoint, SpreadOutcome, SpreadRequest, SpreadSimulator};

use tracing::debug;

/// Create the front queue for a traversal order
///
/// # Arguments
///
/// * `order` - Expansion order to implement
///
/// # Returns
///
/// A boxed `FrontQueue` trait object
pub fn create_front_queue(order: TraversalOrder) -> Box<dyn FrontQueue> {
    debug!("Using {} front queue", order.name());
    match order {
        TraversalOrder::Fifo => Box::new(FifoQueue::new()),
        TraversalOrder::ArrivalTime => Box::new(ArrivalTimeQueue::new()),
    }
}
