//! Immutable problem instance and synthetic instance generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::Site;
use crate::distance::DistanceMatrix;

/// Configuration for synthetic instance generation.
///
/// Demand statistics are drawn uniformly from the configured intervals and
/// coordinates uniformly from a square grid; factor loadings are drawn from
/// a standard normal and unit-normalized per column during construction.
///
/// # Examples
///
/// ```
/// use risk_routing::models::InstanceConfig;
///
/// let config = InstanceConfig::default()
///     .with_num_sites(12)
///     .with_rank(3)
///     .with_mean_range(4.0, 12.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Number of candidate sites (p).
    pub num_sites: usize,

    /// Number of latent correlation factors.
    pub rank: usize,

    /// Side length of the square grid sites are placed on.
    pub grid_size: f64,

    /// Interval `[lo, hi]` for per-site mean demand.
    pub mean_range: (f64, f64),

    /// Interval `[lo, hi]` for per-site idiosyncratic variance.
    pub variance_range: (f64, f64),

    /// Interval `[lo, hi]` for the per-site Bernstein range parameter.
    pub bernstein_range: (f64, f64),

    /// Width of each site's time window.
    pub window_width: f64,

    /// Latest time at which a window may open.
    pub horizon: f64,

    /// Service duration at every site.
    pub service_duration: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            num_sites: 10,
            rank: 3,
            grid_size: 100.0,
            mean_range: (2.0, 10.0),
            variance_range: (0.5, 4.0),
            bernstein_range: (0.5, 2.0),
            window_width: 120.0,
            horizon: 240.0,
            service_duration: 10.0,
            seed: None,
        }
    }
}

impl InstanceConfig {
    pub fn with_num_sites(mut self, n: usize) -> Self {
        self.num_sites = n;
        self
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    pub fn with_mean_range(mut self, lo: f64, hi: f64) -> Self {
        self.mean_range = (lo, hi);
        self
    }

    pub fn with_variance_range(mut self, lo: f64, hi: f64) -> Self {
        self.variance_range = (lo.max(0.0), hi.max(0.0));
        self
    }

    pub fn with_bernstein_range(mut self, lo: f64, hi: f64) -> Self {
        self.bernstein_range = (lo.max(0.0), hi.max(0.0));
        self
    }

    pub fn with_windows(mut self, width: f64, horizon: f64) -> Self {
        self.window_width = width;
        self.horizon = horizon;
        self
    }

    pub fn with_service_duration(mut self, d: f64) -> Self {
        self.service_duration = d;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size <= 0.0 {
            return Err("grid_size must be positive".into());
        }
        for (name, (lo, hi)) in [
            ("mean_range", self.mean_range),
            ("variance_range", self.variance_range),
            ("bernstein_range", self.bernstein_range),
        ] {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(format!("{name} must be a finite interval [lo, hi]"));
            }
        }
        if self.variance_range.0 < 0.0 || self.bernstein_range.0 < 0.0 {
            return Err("variance_range and bernstein_range must be non-negative".into());
        }
        if self.window_width < 0.0 || self.horizon < 0.0 {
            return Err("window_width and horizon must be non-negative".into());
        }
        Ok(())
    }
}

/// An immutable routing instance: sites, factor loadings, and the depot.
///
/// Demand at site `i` is `mu_i + Σ_k loadings[i][k]·z_k + sqrt(D_i)·ε_i`
/// where the `z_k` are latent standard-normal factors shared across sites.
/// Loading columns are unit-normalized at construction, which stabilizes
/// the scale of the tail bound; all-zero columns are left untouched.
///
/// Instances are created once per generation and never mutated.
#[derive(Debug, Clone)]
pub struct Instance {
    sites: Vec<Site>,
    loadings: Vec<Vec<f64>>,
    rank: usize,
    depot: (f64, f64),
    distances: DistanceMatrix,
}

impl Instance {
    /// Creates an instance from explicit sites and factor loadings.
    ///
    /// `loadings` must have one row per site, each of length `rank`.
    /// Columns are unit-normalized in place.
    pub fn new(
        depot: (f64, f64),
        sites: Vec<Site>,
        mut loadings: Vec<Vec<f64>>,
        rank: usize,
    ) -> Result<Self, String> {
        if loadings.len() != sites.len() {
            return Err(format!(
                "expected {} loading rows, got {}",
                sites.len(),
                loadings.len()
            ));
        }
        if let Some(row) = loadings.iter().find(|r| r.len() != rank) {
            return Err(format!(
                "loading rows must have length {rank}, got {}",
                row.len()
            ));
        }

        for k in 0..rank {
            let norm: f64 = loadings.iter().map(|r| r[k] * r[k]).sum::<f64>().sqrt();
            if norm > 0.0 {
                for row in loadings.iter_mut() {
                    row[k] /= norm;
                }
            }
        }

        let distances = DistanceMatrix::from_sites(depot, &sites);
        Ok(Self {
            sites,
            loadings,
            rank,
            depot,
            distances,
        })
    }

    /// Generates a synthetic instance using the supplied random generator.
    pub fn generate<R: Rng>(config: &InstanceConfig, rng: &mut R) -> Result<Self, String> {
        config.validate()?;

        let depot = (config.grid_size / 2.0, config.grid_size / 2.0);
        let normal = Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;

        let mut sites = Vec::with_capacity(config.num_sites);
        let mut loadings = Vec::with_capacity(config.num_sites);
        for id in 0..config.num_sites {
            let x = rng.random_range(0.0..=config.grid_size);
            let y = rng.random_range(0.0..=config.grid_size);
            let mean = rng.random_range(config.mean_range.0..=config.mean_range.1);
            let variance = rng.random_range(config.variance_range.0..=config.variance_range.1);
            let range = rng.random_range(config.bernstein_range.0..=config.bernstein_range.1);
            let open = rng.random_range(0.0..=config.horizon);

            let mut site = Site::new(id, x, y, mean, variance, range, config.service_duration);
            if let Some(tw) = super::TimeWindow::new(open, open + config.window_width) {
                site = site.with_time_window(tw);
            }
            sites.push(site);
            loadings.push((0..config.rank).map(|_| normal.sample(&mut *rng)).collect());
        }

        Self::new(depot, sites, loadings, config.rank)
    }

    /// Generates a synthetic instance seeded from `config.seed`.
    ///
    /// Falls back to an OS-sourced seed when none is configured.
    pub fn generate_seeded(config: &InstanceConfig) -> Result<Self, String> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::generate(config, &mut rng)
    }

    /// Number of candidate sites (p).
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of latent correlation factors.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// All sites.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// The site with the given index.
    pub fn site(&self, i: usize) -> &Site {
        &self.sites[i]
    }

    /// Factor loading row for site `i` (length `rank`).
    pub fn loading(&self, i: usize) -> &[f64] {
        &self.loadings[i]
    }

    /// Depot coordinate.
    pub fn depot(&self) -> (f64, f64) {
        self.depot
    }

    /// Euclidean distance between two sites.
    pub fn site_distance(&self, a: usize, b: usize) -> f64 {
        self.distances.between_sites(a, b)
    }

    /// Euclidean distance from the depot to a site.
    pub fn depot_distance(&self, i: usize) -> f64 {
        self.distances.depot_to_site(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_sites(n: usize) -> Vec<Site> {
        (0..n)
            .map(|i| Site::new(i, i as f64, 0.0, 5.0, 1.0, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn test_config_default_valid() {
        assert!(InstanceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_bad_grid() {
        let config = InstanceConfig::default().with_grid_size(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_bad_range() {
        let config = InstanceConfig::default().with_mean_range(10.0, 2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_new_dimension_mismatch() {
        let sites = uniform_sites(3);
        assert!(Instance::new((0.0, 0.0), sites.clone(), vec![vec![1.0]; 2], 1).is_err());
        assert!(Instance::new((0.0, 0.0), sites, vec![vec![1.0, 2.0]; 3], 1).is_err());
    }

    #[test]
    fn test_new_normalizes_columns() {
        let sites = uniform_sites(2);
        let loadings = vec![vec![3.0, 0.0], vec![4.0, 0.0]];
        let inst = Instance::new((0.0, 0.0), sites, loadings, 2).expect("valid");
        let norm: f64 = (0..2)
            .map(|i| inst.loading(i)[0] * inst.loading(i)[0])
            .sum::<f64>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-10);
        // All-zero column stays zero
        assert_eq!(inst.loading(0)[1], 0.0);
        assert_eq!(inst.loading(1)[1], 0.0);
    }

    #[test]
    fn test_generate_dimensions() {
        let config = InstanceConfig::default()
            .with_num_sites(8)
            .with_rank(2)
            .with_seed(7);
        let inst = Instance::generate_seeded(&config).expect("valid config");
        assert_eq!(inst.num_sites(), 8);
        assert_eq!(inst.rank(), 2);
        assert_eq!(inst.loading(0).len(), 2);
        for site in inst.sites() {
            assert!(site.variance() >= 0.0);
            assert!(site.bernstein_range() >= 0.0);
            assert!(site.time_window().is_some());
        }
    }

    #[test]
    fn test_generate_deterministic_under_seed() {
        let config = InstanceConfig::default().with_num_sites(5).with_seed(99);
        let a = Instance::generate_seeded(&config).expect("valid");
        let b = Instance::generate_seeded(&config).expect("valid");
        for i in 0..5 {
            assert_eq!(a.site(i).x(), b.site(i).x());
            assert_eq!(a.site(i).mean_demand(), b.site(i).mean_demand());
            assert_eq!(a.loading(i), b.loading(i));
        }
    }

    #[test]
    fn test_generate_empty_instance() {
        let config = InstanceConfig::default().with_num_sites(0).with_seed(1);
        let inst = Instance::generate_seeded(&config).expect("valid");
        assert_eq!(inst.num_sites(), 0);
    }
}
