//! # risk-routing
//!
//! Risk-aware single-vehicle routing under uncertain, correlated demand:
//! chance-constrained route construction with a Bernstein tail-bound
//! admission oracle, bandit-guided local search, and Monte Carlo
//! validation of the resulting overflow risk.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Site, TimeWindow, Instance, Route with
//!   order-independent aggregates, decision events)
//! - [`distance`] — Dense depot-plus-sites distance matrix
//! - [`oracle`] — Quantile route oracle (Bernstein-bound admission test)
//! - [`feasibility`] — Forward time-window simulation and first-fit insertion
//! - [`constructive`] — Greedy risk-gated route construction
//! - [`search`] — UCB1 bandit-guided local search operators
//! - [`validation`] — Monte Carlo overflow estimation and weekly union bound
//!
//! ## Example
//!
//! ```
//! use risk_routing::constructive::build_greedy_route;
//! use risk_routing::models::{Instance, InstanceConfig};
//! use risk_routing::search::{improve_route, SearchConfig};
//! use risk_routing::validation::validate_route_seeded;
//!
//! let config = InstanceConfig::default().with_num_sites(10).with_seed(42);
//! let instance = Instance::generate_seeded(&config).unwrap();
//!
//! let capacity = 60.0;
//! let (mut route, events) = build_greedy_route(&instance, capacity, 0.05, 5.0, 50.0);
//! assert_eq!(events.len(), 10);
//!
//! let search = SearchConfig::default().with_iterations(300).with_seed(7);
//! improve_route(&instance, &mut route, capacity, 0.05, 50.0, &search).unwrap();
//!
//! let report = validate_route_seeded(&instance, &route, capacity, 10_000, 5, 1);
//! assert!(report.per_route_overflow <= 1.0);
//! ```

pub mod constructive;
pub mod distance;
pub mod feasibility;
pub mod models;
pub mod oracle;
pub mod search;
pub mod validation;
