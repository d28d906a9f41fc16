//! Dense distance matrix over depot and sites.

use crate::models::Site;

/// A dense (p+1)×(p+1) distance matrix stored in row-major order.
///
/// Index 0 is the depot; index `i + 1` is site `i`. Built once per instance
/// from Euclidean coordinates, or supplied explicitly for tests.
///
/// # Examples
///
/// ```
/// use risk_routing::models::Site;
/// use risk_routing::distance::DistanceMatrix;
///
/// let sites = vec![
///     Site::new(0, 3.0, 4.0, 10.0, 1.0, 0.5, 5.0),
///     Site::new(1, 6.0, 8.0, 20.0, 1.0, 0.5, 5.0),
/// ];
/// let dm = DistanceMatrix::from_sites((0.0, 0.0), &sites);
/// assert!((dm.depot_to_site(0) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from a depot coordinate and sites.
    pub fn from_sites(depot: (f64, f64), sites: &[Site]) -> Self {
        let n = sites.len() + 1;
        let mut dm = Self::new(n);
        for (i, site) in sites.iter().enumerate() {
            let d = site.distance_to_point(depot.0, depot.1);
            dm.set(0, i + 1, d);
            dm.set(i + 1, 0, d);
        }
        for i in 0..sites.len() {
            for j in (i + 1)..sites.len() {
                let d = sites[i].distance_to(&sites[j]);
                dm.set(i + 1, j + 1, d);
                dm.set(j + 1, i + 1, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance between matrix indices (0 = depot, i+1 = site i).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance between matrix indices.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Distance between two sites.
    pub fn between_sites(&self, a: usize, b: usize) -> f64 {
        self.get(a + 1, b + 1)
    }

    /// Distance from the depot to a site.
    pub fn depot_to_site(&self, site: usize) -> f64 {
        self.get(0, site + 1)
    }

    /// Number of locations (depot + sites) in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sites() -> Vec<Site> {
        vec![
            Site::new(0, 3.0, 4.0, 10.0, 1.0, 0.5, 5.0),
            Site::new(1, 0.0, 8.0, 20.0, 1.0, 0.5, 5.0),
        ]
    }

    #[test]
    fn test_from_sites() {
        let dm = DistanceMatrix::from_sites((0.0, 0.0), &sample_sites());
        assert_eq!(dm.size(), 3);
        assert!((dm.depot_to_site(0) - 5.0).abs() < 1e-10);
        assert!((dm.depot_to_site(1) - 8.0).abs() < 1e-10);
        assert!((dm.get(0, 0)).abs() < 1e-10);
        // (3,4) to (0,8) is 5
        assert!((dm.between_sites(0, 1) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_sites((0.0, 0.0), &sample_sites());
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }
}
