//! Domain layer: the loan aggregate, its money types and the events that drive it.

pub mod event;
pub mod loan;
pub mod money;
