//! Domain model types for risk-aware routing.
//!
//! Provides the core abstractions: sites with uncertain demand and time
//! windows, the immutable instance (demand statistics, factor loadings,
//! depot), routes with order-independent aggregate statistics, and the
//! decision events construction emits.

mod decision;
mod instance;
mod route;
mod site;

pub use decision::{DecisionEvent, DecisionReason, Verdict};
pub use instance::{Instance, InstanceConfig};
pub use route::{Aggregates, Route};
pub use site::{Site, TimeWindow};
