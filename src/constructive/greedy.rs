//! Greedy risk-gated route construction.
//!
//! # Algorithm
//!
//! Sites are processed in a fixed priority order: descending mean demand,
//! ties broken by ascending depot distance, so high-value central sites are
//! front-loaded. Each site must clear the quantile oracle (tail bound under
//! capacity) and then find a first-fit insertion position that keeps every
//! time window satisfied. Sites that fail either check are skipped
//! permanently; construction never aborts.
//!
//! Every decision is emitted as a [`DecisionEvent`] carrying the site, the
//! PASS/SKIP verdict, and a reason from the fixed vocabulary.

use crate::feasibility::first_fit_position;
use crate::models::{DecisionEvent, DecisionReason, Instance, Route, Verdict};
use crate::oracle::{admit, Admission};

/// Builds an initial route, returning it with the per-site decision log.
///
/// `capacity` is the vehicle capacity, `eps` the admitted overflow risk per
/// route (clamped to `[1e-6, 0.5]` by the oracle), `skip_penalty` the cost
/// threshold used to classify feasibility skips, and `speed` the travel
/// speed used by the time simulation.
///
/// A feasibility skip is classified "remote" when `skip_penalty` is less
/// than half the marginal distance from the route's last stop (or the
/// depot) to the site; the classification only affects the event detail,
/// never the verdict.
///
/// # Examples
///
/// ```
/// use risk_routing::constructive::build_greedy_route;
/// use risk_routing::models::{Instance, InstanceConfig, Verdict};
///
/// let config = InstanceConfig::default().with_num_sites(6).with_seed(11);
/// let inst = Instance::generate_seeded(&config).unwrap();
///
/// let (route, events) = build_greedy_route(&inst, 1e6, 0.05, 5.0, 50.0);
/// assert_eq!(events.len(), 6);
/// assert_eq!(
///     route.len(),
///     events.iter().filter(|e| e.verdict == Verdict::Pass).count()
/// );
/// ```
pub fn build_greedy_route(
    instance: &Instance,
    capacity: f64,
    eps: f64,
    skip_penalty: f64,
    speed: f64,
) -> (Route, Vec<DecisionEvent>) {
    let mut route = Route::empty(instance);
    let mut events = Vec::with_capacity(instance.num_sites());

    for j in priority_order(instance) {
        match admit(instance, route.aggregates(), j, capacity, eps) {
            Admission::Admit { aggregates, bound } => {
                match first_fit_position(instance, route.sequence(), j, speed) {
                    Some(pos) => {
                        route.commit_insert(pos, j, aggregates);
                        events.push(DecisionEvent::new(
                            j,
                            Verdict::Pass,
                            DecisionReason::Pass,
                            format!("bound {bound:.2} within capacity {capacity:.2}"),
                        ));
                    }
                    None => {
                        let marginal = marginal_distance(instance, &route, j);
                        let detail = if skip_penalty < marginal / 2.0 {
                            format!("no feasible insertion position (remote, marginal {marginal:.2})")
                        } else {
                            format!("no feasible insertion position (marginal {marginal:.2})")
                        };
                        events.push(DecisionEvent::new(
                            j,
                            Verdict::Skip,
                            DecisionReason::TimeWindowFailure,
                            detail,
                        ));
                    }
                }
            }
            Admission::Reject { bound } => {
                events.push(DecisionEvent::new(
                    j,
                    Verdict::Skip,
                    DecisionReason::GateFailure,
                    format!("bound {bound:.2} exceeds capacity {capacity:.2}"),
                ));
            }
        }
    }

    (route, events)
}

/// Site indices ordered by descending mean demand, then depot distance.
fn priority_order(instance: &Instance) -> Vec<usize> {
    let mut order: Vec<usize> = (0..instance.num_sites()).collect();
    order.sort_by(|&a, &b| {
        let key_a = (-instance.site(a).mean_demand(), instance.depot_distance(a));
        let key_b = (-instance.site(b).mean_demand(), instance.depot_distance(b));
        key_a
            .partial_cmp(&key_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Distance from the route's current last stop (or the depot) to `site`.
fn marginal_distance(instance: &Instance, route: &Route, site: usize) -> f64 {
    match route.sequence().last() {
        Some(&last) => instance.site_distance(last, site),
        None => instance.depot_distance(site),
    }
}
