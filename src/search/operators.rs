//! Perturbation operators for bandit-guided local search.
//!
//! Each operator mutates the route in place and reports whether it left an
//! accepted change behind. Failed attempts restore the route exactly, so an
//! operator returning `false` guarantees the route is untouched.
//!
//! Swap and relocate reorder visits without changing the included set, so
//! the cached aggregates remain valid and only time-window feasibility is
//! re-checked. Remove-and-reinsert changes the set transiently and must go
//! back through the full oracle + feasibility pipeline.

use rand::Rng;

use crate::feasibility::{first_fit_position, forward_feasible};
use crate::models::{Instance, Route};
use crate::oracle::{admit, Admission};

/// The operator portfolio available to local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Remove a random site and reinsert it through the admission pipeline.
    RemoveReinsert,
    /// Exchange two random positions.
    Swap,
    /// Move one random site to a different position.
    Relocate,
}

impl OperatorKind {
    /// All operators in selection order.
    pub const ALL: [OperatorKind; 3] = [
        OperatorKind::RemoveReinsert,
        OperatorKind::Swap,
        OperatorKind::Relocate,
    ];

    /// Human-readable operator name.
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::RemoveReinsert => "remove-reinsert",
            OperatorKind::Swap => "swap",
            OperatorKind::Relocate => "relocate",
        }
    }
}

/// Removes a uniformly random site and reinserts it via oracle + first-fit.
///
/// Returns `true` iff the reinsertion succeeded at a different position.
/// When the reinsertion is rejected, or lands back on the removal
/// position, the original sequence and aggregates are restored exactly.
pub fn remove_reinsert<R: Rng>(
    instance: &Instance,
    route: &mut Route,
    capacity: f64,
    eps: f64,
    speed: f64,
    rng: &mut R,
) -> bool {
    if route.is_empty() {
        return false;
    }
    let pos = rng.random_range(0..route.len());
    let saved_aggregates = route.aggregates().clone();
    let Some(site) = route.remove(pos, instance) else {
        return false;
    };

    if let Admission::Admit { aggregates, .. } = admit(instance, route.aggregates(), site, capacity, eps)
    {
        if let Some(new_pos) = first_fit_position(instance, route.sequence(), site, speed) {
            if new_pos != pos {
                route.commit_insert(new_pos, site, aggregates);
                return true;
            }
            // Landed back where it started: keep the incrementally
            // accumulated cache instead of the rebuilt one.
            route.commit_insert(pos, site, saved_aggregates);
            return false;
        }
    }

    // Reinsertion rejected: put the site back where it was.
    route.commit_insert(pos, site, saved_aggregates);
    false
}

/// Exchanges two distinct random positions, keeping the result only if the
/// reordered sequence stays time-window feasible.
///
/// The included set is unchanged, so no oracle re-check is needed.
pub fn swap<R: Rng>(instance: &Instance, route: &mut Route, speed: f64, rng: &mut R) -> bool {
    if route.len() < 2 {
        return false;
    }
    let a = rng.random_range(0..route.len());
    let mut b = rng.random_range(0..route.len() - 1);
    if b >= a {
        b += 1;
    }

    route.swap(a, b);
    if forward_feasible(instance, route.sequence(), speed) {
        true
    } else {
        route.swap(a, b);
        false
    }
}

/// Moves one random site to a different random position, keeping the
/// result only if the reordered sequence stays time-window feasible.
///
/// The included set is unchanged, so no oracle re-check is needed.
pub fn relocate<R: Rng>(instance: &Instance, route: &mut Route, speed: f64, rng: &mut R) -> bool {
    if route.len() < 2 {
        return false;
    }
    let from = rng.random_range(0..route.len());
    let mut to = rng.random_range(0..route.len() - 1);
    if to >= from {
        to += 1;
    }

    route.relocate(from, to);
    if forward_feasible(instance, route.sequence(), speed) {
        true
    } else {
        route.relocate(to, from);
        false
    }
}
