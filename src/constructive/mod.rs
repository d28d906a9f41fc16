//! Constructive heuristics.
//!
//! Provides the greedy risk-gated constructor that seeds local search.

mod greedy;

pub use greedy::build_greedy_route;
