//! Monte Carlo validation of a route's overflow risk.
//!
//! # Sampling model
//!
//! Each trial draws `rank` standard-normal latent factors shared across all
//! sites, then per-site demand
//! `X_i = mu_i + Σ_k loadings[i][k]·z_k + sqrt(max(D_i, 1e-6))·ε_i`
//! with an independent standard-normal `ε_i`, floored at zero. Sites with
//! large loadings on the same factor move together across trials, which
//! reproduces the low-rank-plus-diagonal correlation the oracle assumes.
//!
//! Trials are independent, so the estimate sharpens as the trial count
//! grows; the weekly figure is a Boole union bound over days, a loose
//! upper bound rather than a tight estimate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::models::{Instance, Route};

/// Floor applied to per-site variance before the square root.
const VARIANCE_FLOOR: f64 = 1e-6;

/// Cap on the weekly union bound.
const WEEKLY_CAP: f64 = 0.99;

/// Empirical risk estimates for a completed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Fraction of trials in which the route's total demand exceeded
    /// capacity, in `[0, 1]`.
    pub per_route_overflow: f64,

    /// Union-bound weekly risk `clamp(days · per_route_overflow, 0, 0.99)`.
    ///
    /// Assumes independence across days; loose upper bound only.
    pub weekly_bound: f64,
}

/// Boole union bound over `days` independent repetitions.
///
/// Non-decreasing in `days` and at least `per_route` whenever `days >= 1`.
///
/// # Examples
///
/// ```
/// use risk_routing::validation::weekly_bound;
///
/// assert_eq!(weekly_bound(0.02, 5), 0.10);
/// assert_eq!(weekly_bound(0.5, 7), 0.99); // capped
/// assert_eq!(weekly_bound(0.1, 0), 0.0);
/// ```
pub fn weekly_bound(per_route: f64, days: u32) -> f64 {
    (days as f64 * per_route).clamp(0.0, WEEKLY_CAP)
}

/// Estimates the route's overflow probability over `trials` Monte Carlo
/// draws from the instance's demand model.
///
/// Zero trials (or an empty route over a non-negative capacity) yield an
/// overflow probability of zero.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use risk_routing::constructive::build_greedy_route;
/// use risk_routing::models::{Instance, InstanceConfig};
/// use risk_routing::validation::validate_route;
///
/// let config = InstanceConfig::default().with_num_sites(6).with_seed(3);
/// let inst = Instance::generate_seeded(&config).unwrap();
/// let (route, _) = build_greedy_route(&inst, 100.0, 0.05, 5.0, 50.0);
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let report = validate_route(&inst, &route, 100.0, 2_000, 5, &mut rng);
/// assert!(report.per_route_overflow >= 0.0 && report.per_route_overflow <= 1.0);
/// assert!(report.weekly_bound >= report.per_route_overflow);
/// ```
pub fn validate_route<R: Rng>(
    instance: &Instance,
    route: &Route,
    capacity: f64,
    trials: usize,
    days: u32,
    rng: &mut R,
) -> ValidationReport {
    let mut overflows = 0usize;
    let mut factors = vec![0.0f64; instance.rank()];

    for _ in 0..trials {
        for z in factors.iter_mut() {
            *z = rng.sample(StandardNormal);
        }

        let mut total = 0.0;
        for &i in route.sequence() {
            let site = instance.site(i);
            let shared: f64 = instance
                .loading(i)
                .iter()
                .zip(&factors)
                .map(|(l, z)| l * z)
                .sum();
            let noise: f64 = rng.sample(StandardNormal);
            let demand =
                site.mean_demand() + shared + site.variance().max(VARIANCE_FLOOR).sqrt() * noise;
            total += demand.max(0.0);
        }
        if total > capacity {
            overflows += 1;
        }
    }

    let per_route_overflow = if trials == 0 {
        0.0
    } else {
        overflows as f64 / trials as f64
    };
    ValidationReport {
        per_route_overflow,
        weekly_bound: weekly_bound(per_route_overflow, days),
    }
}

/// Runs [`validate_route`] with a generator seeded from `seed`.
pub fn validate_route_seeded(
    instance: &Instance,
    route: &Route,
    capacity: f64,
    trials: usize,
    days: u32,
    seed: u64,
) -> ValidationReport {
    let mut rng = StdRng::seed_from_u64(seed);
    validate_route(instance, route, capacity, trials, days, &mut rng)
}
