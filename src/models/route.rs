//! Route and its order-independent aggregate statistics.

use super::Instance;

/// Sufficient statistics for a route's total-demand distribution.
///
/// All fields depend only on the *set* of included sites, never on visit
/// order, which keeps admission checks O(rank) per insertion regardless of
/// route length. Rebuilding from a site set must reproduce the same values
/// as incremental accumulation.
///
/// # Examples
///
/// ```
/// use risk_routing::models::{Aggregates, Instance, InstanceConfig};
///
/// let config = InstanceConfig::default().with_num_sites(4).with_seed(1);
/// let inst = Instance::generate_seeded(&config).unwrap();
///
/// let incremental = Aggregates::empty(inst.rank())
///     .with_site(&inst, 0)
///     .with_site(&inst, 2);
/// let rebuilt = Aggregates::from_sites(&inst, [2, 0]);
/// assert!((incremental.mean_sum() - rebuilt.mean_sum()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    factor_sum: Vec<f64>,
    mean_sum: f64,
    variance_sum: f64,
    max_range: f64,
}

impl Aggregates {
    /// Aggregates of the empty site set.
    pub fn empty(rank: usize) -> Self {
        Self {
            factor_sum: vec![0.0; rank],
            mean_sum: 0.0,
            variance_sum: 0.0,
            max_range: 0.0,
        }
    }

    /// Returns the hypothetical aggregates after adding site `j`.
    ///
    /// Pure: the receiver is untouched. Callers commit the result to a
    /// route only once admission succeeds.
    pub fn with_site(&self, instance: &Instance, j: usize) -> Self {
        let site = instance.site(j);
        let mut factor_sum = self.factor_sum.clone();
        for (sum, load) in factor_sum.iter_mut().zip(instance.loading(j)) {
            *sum += load;
        }
        Self {
            factor_sum,
            mean_sum: self.mean_sum + site.mean_demand(),
            variance_sum: self.variance_sum + site.variance(),
            max_range: self.max_range.max(site.bernstein_range()),
        }
    }

    /// Rebuilds aggregates from scratch over a set of sites.
    pub fn from_sites<I: IntoIterator<Item = usize>>(instance: &Instance, sites: I) -> Self {
        sites
            .into_iter()
            .fold(Self::empty(instance.rank()), |acc, j| {
                acc.with_site(instance, j)
            })
    }

    /// Total variance proxy of the route's summed demand:
    /// `||factor_sum||² + variance_sum`.
    pub fn sigma2(&self) -> f64 {
        let factor: f64 = self.factor_sum.iter().map(|v| v * v).sum();
        factor + self.variance_sum
    }

    /// Per-factor loading sums (length `rank`).
    pub fn factor_sum(&self) -> &[f64] {
        &self.factor_sum
    }

    /// Sum of mean demands over included sites.
    pub fn mean_sum(&self) -> f64 {
        self.mean_sum
    }

    /// Sum of idiosyncratic variances over included sites.
    pub fn variance_sum(&self) -> f64 {
        self.variance_sum
    }

    /// Largest Bernstein range parameter among included sites.
    pub fn max_range(&self) -> f64 {
        self.max_range
    }
}

/// An ordered sequence of distinct site visits with cached aggregates.
///
/// Populated by the greedy constructor, mutated in place by local search,
/// and read-only input to the Monte Carlo validator. The cached
/// [`Aggregates`] always reflect the current included set; order-only
/// mutations ([`swap`](Route::swap), [`relocate`](Route::relocate)) leave
/// them untouched.
#[derive(Debug, Clone)]
pub struct Route {
    sequence: Vec<usize>,
    included: Vec<bool>,
    aggregates: Aggregates,
}

impl Route {
    /// Creates an empty route for the given instance.
    pub fn empty(instance: &Instance) -> Self {
        Self {
            sequence: Vec::new(),
            included: vec![false; instance.num_sites()],
            aggregates: Aggregates::empty(instance.rank()),
        }
    }

    /// Visit order as site indices.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Number of visited sites.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if no site is visited.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns `true` if the given site is on this route.
    pub fn contains(&self, site: usize) -> bool {
        self.included.get(site).copied().unwrap_or(false)
    }

    /// Cached aggregate statistics over the included set.
    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Inserts `site` at `pos`, committing pre-validated aggregates.
    ///
    /// The aggregates are those returned by
    /// [`Aggregates::with_site`] for this site; admission is expected to
    /// have succeeded on them already. Returns `false` (and leaves the
    /// route unchanged) if the site is already included or `pos` is out
    /// of bounds.
    pub fn commit_insert(&mut self, pos: usize, site: usize, aggregates: Aggregates) -> bool {
        if pos > self.sequence.len() || self.contains(site) || site >= self.included.len() {
            return false;
        }
        self.sequence.insert(pos, site);
        self.included[site] = true;
        self.aggregates = aggregates;
        true
    }

    /// Removes the visit at `pos`, returning the site index.
    ///
    /// Aggregates are rebuilt from the remaining set (`max_range` cannot
    /// be decremented incrementally). Returns `None` if `pos` is out of
    /// bounds.
    pub fn remove(&mut self, pos: usize, instance: &Instance) -> Option<usize> {
        if pos >= self.sequence.len() {
            return None;
        }
        let site = self.sequence.remove(pos);
        self.included[site] = false;
        self.rebuild_aggregates(instance);
        Some(site)
    }

    /// Recomputes the cached aggregates from the current site set.
    pub fn rebuild_aggregates(&mut self, instance: &Instance) {
        self.aggregates = Aggregates::from_sites(instance, self.sequence.iter().copied());
    }

    /// Exchanges the visits at positions `a` and `b`.
    ///
    /// The included set is unchanged, so aggregates stay valid.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.sequence.swap(a, b);
    }

    /// Moves the visit at `from` to position `to`.
    ///
    /// The included set is unchanged, so aggregates stay valid. Returns
    /// `false` if either position is out of bounds.
    pub fn relocate(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sequence.len() || to >= self.sequence.len() {
            return false;
        }
        let site = self.sequence.remove(from);
        self.sequence.insert(to, site);
        true
    }

    /// Total travel distance from the depot through all visits in order.
    ///
    /// The return leg to the depot is excluded, matching the feasibility
    /// checker's scope.
    pub fn total_distance(&self, instance: &Instance) -> f64 {
        let mut total = 0.0;
        let mut prev: Option<usize> = None;
        for &site in &self.sequence {
            total += match prev {
                Some(p) => instance.site_distance(p, site),
                None => instance.depot_distance(site),
            };
            prev = Some(site);
        }
        total
    }
}
