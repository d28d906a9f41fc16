//! Quantile route oracle: Bernstein-bound admission testing.
//!
//! # Algorithm
//!
//! The oracle bounds the upper ε-quantile of a route's total demand with a
//! Bernstein-style concentration inequality over the route's aggregate
//! statistics:
//!
//! ```text
//! q = mean + sqrt(2·sigma²·ln(1/ε)) + (range/3)·ln(1/ε)
//! ```
//!
//! where `sigma²` is the low-rank-plus-diagonal variance proxy
//! `||factor_sum||² + variance_sum` and `range` the largest per-site
//! boundedness parameter. A site is admitted iff the hypothetical
//! post-insertion quantile stays at or under capacity.
//!
//! The oracle is stateless and never mutates a route; on success it hands
//! the hypothetical aggregates back so the caller can commit them.
//!
//! # Reference
//!
//! Boucheron, Lugosi & Massart (2013), *Concentration Inequalities*,
//! Bernstein's inequality (Theorem 2.10).

use crate::models::{Aggregates, Instance};

/// Lower clamp for the risk level ε.
pub const EPS_MIN: f64 = 1e-6;

/// Upper clamp for the risk level ε.
pub const EPS_MAX: f64 = 0.5;

/// Clamps ε to `[EPS_MIN, EPS_MAX]`.
///
/// Keeps `ln(1/ε)` finite and positive, so the quantile is well defined
/// and non-increasing in ε over the admissible interval.
pub fn clamp_eps(eps: f64) -> f64 {
    if eps.is_nan() {
        return EPS_MAX;
    }
    eps.clamp(EPS_MIN, EPS_MAX)
}

/// Closed-form Bernstein upper quantile for the given moments.
///
/// `variance` and `range` are floored at zero before use; ε is clamped to
/// `[1e-6, 0.5]`. The empty route (`mean = variance = range = 0`) yields 0.
///
/// # Examples
///
/// ```
/// use risk_routing::oracle::quantile;
///
/// let tight = quantile(10.0, 5.0, 2.0, 0.05);
/// let loose = quantile(10.0, 5.0, 2.0, 0.10);
/// assert!((tight - 17.47).abs() < 0.01);
/// assert!((loose - 16.33).abs() < 0.01);
/// assert!(tight >= loose);
/// ```
pub fn quantile(mean: f64, variance: f64, range: f64, eps: f64) -> f64 {
    let log_term = (1.0 / clamp_eps(eps)).ln();
    let variance = variance.max(0.0);
    let range = range.max(0.0);
    mean + (2.0 * variance * log_term).sqrt() + (range / 3.0) * log_term
}

/// Outcome of an admission test.
///
/// On success the hypothetical post-insertion aggregates are returned for
/// the caller to commit; the oracle itself never mutates route state.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// The tail bound stays at or under capacity.
    Admit {
        /// Aggregates after the candidate insertion.
        aggregates: Aggregates,
        /// The admission quantile that passed the gate.
        bound: f64,
    },
    /// Gate failure: the tail bound exceeds capacity.
    Reject {
        /// The admission quantile that failed the gate.
        bound: f64,
    },
}

impl Admission {
    /// Returns `true` for [`Admission::Admit`].
    pub fn is_admit(&self) -> bool {
        matches!(self, Admission::Admit { .. })
    }

    /// The admission quantile, whichever way the gate went.
    pub fn bound(&self) -> f64 {
        match self {
            Admission::Admit { bound, .. } | Admission::Reject { bound } => *bound,
        }
    }
}

/// Tests whether adding `site` keeps the route's demand tail bound under
/// `capacity` at risk level `eps`.
///
/// Computes hypothetical aggregates in O(rank) via
/// [`Aggregates::with_site`] and gates on the Bernstein quantile.
///
/// # Examples
///
/// ```
/// use risk_routing::models::{Aggregates, Instance, InstanceConfig, Route};
/// use risk_routing::oracle::admit;
///
/// let config = InstanceConfig::default().with_num_sites(3).with_seed(5);
/// let inst = Instance::generate_seeded(&config).unwrap();
/// let route = Route::empty(&inst);
///
/// let outcome = admit(&inst, route.aggregates(), 0, 1e9, 0.05);
/// assert!(outcome.is_admit());
/// ```
pub fn admit(
    instance: &Instance,
    current: &Aggregates,
    site: usize,
    capacity: f64,
    eps: f64,
) -> Admission {
    let aggregates = current.with_site(instance, site);
    let bound = quantile(
        aggregates.mean_sum(),
        aggregates.sigma2(),
        aggregates.max_range(),
        eps,
    );
    if bound <= capacity {
        Admission::Admit { aggregates, bound }
    } else {
        Admission::Reject { bound }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstanceConfig, Route, Site};
    use proptest::prelude::*;

    #[test]
    fn test_quantile_reference_values() {
        assert!((quantile(10.0, 5.0, 2.0, 0.05) - 17.47).abs() < 0.01);
        assert!((quantile(10.0, 5.0, 2.0, 0.10) - 16.33).abs() < 0.01);
    }

    #[test]
    fn test_quantile_monotone_in_eps() {
        let q1 = quantile(10.0, 5.0, 2.0, 0.05);
        let q2 = quantile(10.0, 5.0, 2.0, 0.10);
        assert!(q1 >= q2);
    }

    #[test]
    fn test_quantile_empty_route_is_zero() {
        assert_eq!(quantile(0.0, 0.0, 0.0, 0.05), 0.0);
    }

    #[test]
    fn test_quantile_clamps_degenerate_eps() {
        // ε outside (0, 0.5] is clamped, so these stay finite
        assert!(quantile(10.0, 5.0, 2.0, 0.0).is_finite());
        assert!(quantile(10.0, 5.0, 2.0, 1.0).is_finite());
        assert!(quantile(10.0, 5.0, 2.0, f64::NAN).is_finite());
        assert_eq!(quantile(10.0, 5.0, 2.0, 0.0), quantile(10.0, 5.0, 2.0, EPS_MIN));
        assert_eq!(quantile(10.0, 5.0, 2.0, 1.0), quantile(10.0, 5.0, 2.0, EPS_MAX));
    }

    #[test]
    fn test_quantile_floors_negative_moments() {
        let q = quantile(10.0, -5.0, -2.0, 0.05);
        assert_eq!(q, 10.0);
    }

    #[test]
    fn test_gate_boundary_flip() {
        // With mean=10, variance=5, range=2, C=20 the gate flips
        // between ε=0.01 (q≈19.86, pass) and ε=0.005 (q≈20.81, fail).
        let capacity = 20.0;
        assert!(quantile(10.0, 5.0, 2.0, 0.01) <= capacity);
        assert!(quantile(10.0, 5.0, 2.0, 0.005) > capacity);
    }

    fn single_site_instance(mean: f64, variance: f64, range: f64) -> crate::models::Instance {
        let sites = vec![Site::new(0, 0.0, 0.0, mean, variance, range, 0.0)];
        crate::models::Instance::new((0.0, 0.0), sites, vec![vec![0.0]], 1).expect("valid")
    }

    #[test]
    fn test_admit_flips_at_boundary() {
        let inst = single_site_instance(10.0, 5.0, 2.0);
        let route = Route::empty(&inst);
        let pass = admit(&inst, route.aggregates(), 0, 20.0, 0.01);
        let fail = admit(&inst, route.aggregates(), 0, 20.0, 0.005);
        assert!(pass.is_admit());
        assert!(!fail.is_admit());
        assert!((pass.bound() - 19.86).abs() < 0.01);
        assert!((fail.bound() - 20.81).abs() < 0.01);
    }

    #[test]
    fn test_admit_does_not_mutate_caller_state() {
        let inst = single_site_instance(10.0, 5.0, 2.0);
        let route = Route::empty(&inst);
        let before = route.aggregates().clone();
        let _ = admit(&inst, route.aggregates(), 0, 20.0, 0.01);
        assert_eq!(route.aggregates(), &before);
        assert!(route.is_empty());
    }

    #[test]
    fn test_admit_carries_hypothetical_aggregates() {
        let config = InstanceConfig::default().with_num_sites(4).with_seed(3);
        let inst = crate::models::Instance::generate_seeded(&config).expect("valid");
        let route = Route::empty(&inst);
        match admit(&inst, route.aggregates(), 2, 1e9, 0.05) {
            Admission::Admit { aggregates, .. } => {
                assert!((aggregates.mean_sum() - inst.site(2).mean_demand()).abs() < 1e-10);
            }
            Admission::Reject { .. } => panic!("huge capacity should admit"),
        }
    }

    proptest! {
        #[test]
        fn prop_quantile_monotone_in_eps(
            mean in 0.0..100.0f64,
            variance in 0.0..50.0f64,
            range in 0.0..10.0f64,
            e1 in 1e-6..0.5f64,
            e2 in 1e-6..0.5f64,
        ) {
            let (lo, hi) = if e1 <= e2 { (e1, e2) } else { (e2, e1) };
            prop_assert!(quantile(mean, variance, range, lo) >= quantile(mean, variance, range, hi));
        }

        #[test]
        fn prop_quantile_monotone_in_moments(
            mean in 0.0..100.0f64,
            variance in 0.0..50.0f64,
            range in 0.0..10.0f64,
            dv in 0.0..10.0f64,
            dr in 0.0..5.0f64,
        ) {
            let base = quantile(mean, variance, range, 0.05);
            prop_assert!(quantile(mean, variance + dv, range, 0.05) >= base - 1e-12);
            prop_assert!(quantile(mean, variance, range + dr, 0.05) >= base - 1e-12);
        }
    }
}
