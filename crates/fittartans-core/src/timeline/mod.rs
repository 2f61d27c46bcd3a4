//! Timeline model and reconciliation.
//!
//! This module provides:
//! - The canonical [`Event`] shared by every source
//! - Priority-based conflict resolution into one merged timeline
//! - Free-time computation inside the daily active window

mod event;
mod free;
mod resolver;

pub use event::{Event, EventSource, Interval, SourcePriority};
pub use free::{
    compute_availability, compute_free_time, ActiveWindow, DateRange, DayAvailability, FreeTimeComputer,
};
pub use resolver::{resolve_conflicts, ConflictResolver, RemovalReason, RemovedEvent, ResolveOutcome};
