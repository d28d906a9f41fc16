//! Time-window feasibility checking by forward time simulation.
//!
//! # Algorithm
//!
//! Simulates a vehicle leaving the depot at a fixed departure clock and
//! visiting a sequence of sites in order. At each site the clock advances
//! by travel time (Euclidean distance over the configured speed), waits for
//! the window to open if early (waiting is free), fails if the window has
//! already closed, and then adds the service duration. The return leg to
//! the depot is deliberately not checked: feasibility is defined only over
//! the visited sites.
//!
//! Insertion positions are searched first-fit: candidate positions are
//! scanned in increasing index order and the first feasible one wins. No
//! attempt is made to pick among feasible positions by added distance.

use crate::models::Instance;

/// Fixed depot-departure clock for every simulation.
pub const DEPOT_DEPARTURE: f64 = 0.0;

/// Floor applied to `speed` so travel times stay finite.
const MIN_SPEED: f64 = 1e-9;

/// Returns `true` if visiting `sequence` in order satisfies every site's
/// time window.
///
/// Pure function of its inputs: repeated evaluation over the same instance
/// and sequence yields identical results. The empty sequence is feasible.
///
/// # Examples
///
/// ```
/// use risk_routing::models::{Instance, Site, TimeWindow};
/// use risk_routing::feasibility::forward_feasible;
///
/// let sites = vec![
///     Site::new(0, 10.0, 0.0, 5.0, 1.0, 0.5, 2.0)
///         .with_time_window(TimeWindow::new(0.0, 50.0).unwrap()),
///     Site::new(1, 20.0, 0.0, 5.0, 1.0, 0.5, 2.0)
///         .with_time_window(TimeWindow::new(0.0, 5.0).unwrap()),
/// ];
/// let inst = Instance::new((0.0, 0.0), sites, vec![vec![0.0]; 2], 1).unwrap();
///
/// assert!(forward_feasible(&inst, &[0], 1.0));
/// // Site 1's window closes at 5 but it is 20 away from the depot.
/// assert!(!forward_feasible(&inst, &[1], 1.0));
/// ```
pub fn forward_feasible(instance: &Instance, sequence: &[usize], speed: f64) -> bool {
    let speed = speed.max(MIN_SPEED);
    let mut clock = DEPOT_DEPARTURE;
    let mut prev: Option<usize> = None;

    for &site in sequence {
        let distance = match prev {
            Some(p) => instance.site_distance(p, site),
            None => instance.depot_distance(site),
        };
        clock += distance / speed;

        if let Some(tw) = instance.site(site).time_window() {
            clock = clock.max(tw.open());
            if clock > tw.close() {
                return false;
            }
        }
        clock += instance.site(site).service_duration();
        prev = Some(site);
    }
    true
}

/// Finds the first insertion position for `candidate` that keeps the whole
/// sequence feasible.
///
/// Positions `0..=sequence.len()` are scanned in increasing order and the
/// first one whose full sequence passes [`forward_feasible`] is returned.
/// Returns `None` when no position works.
pub fn first_fit_position(
    instance: &Instance,
    sequence: &[usize],
    candidate: usize,
    speed: f64,
) -> Option<usize> {
    let mut trial = Vec::with_capacity(sequence.len() + 1);
    for pos in 0..=sequence.len() {
        trial.clear();
        trial.extend_from_slice(&sequence[..pos]);
        trial.push(candidate);
        trial.extend_from_slice(&sequence[pos..]);
        if forward_feasible(instance, &trial, speed) {
            return Some(pos);
        }
    }
    None
}
