//! Delivery site and time window types.

/// A time window constraint for service at a delivery site.
///
/// The vehicle must arrive no later than `close` and may arrive as early as
/// `open` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use risk_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.open() <= tw.close());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    open: f64,
    close: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `open > close` or either value is non-finite.
    pub fn new(open: f64, close: f64) -> Option<Self> {
        if !open.is_finite() || !close.is_finite() || open > close {
            return None;
        }
        Some(Self { open, close })
    }

    /// Earliest allowable service start time.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Latest allowable arrival time.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.open && time <= self.close
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.open {
            self.open - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.close
    }
}

/// A candidate delivery site with uncertain demand.
///
/// Demand at site `i` is modeled as `mu + Σ_k loading_k·z_k + sqrt(D)·ε`
/// where the `z_k` are latent factors shared across sites (stored on the
/// [`Instance`](super::Instance)), `mu` is the mean, and `D` the
/// idiosyncratic variance. `bernstein_range` is the boundedness parameter
/// the tail inequality uses for this site.
///
/// Variance and Bernstein range are floored at zero on construction.
///
/// # Examples
///
/// ```
/// use risk_routing::models::Site;
///
/// let s = Site::new(3, 41.0, 49.0, 10.0, 2.5, 1.0, 5.0);
/// assert_eq!(s.id(), 3);
/// assert_eq!(s.mean_demand(), 10.0);
/// assert_eq!(s.variance(), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct Site {
    id: usize,
    x: f64,
    y: f64,
    mean_demand: f64,
    variance: f64,
    bernstein_range: f64,
    service_duration: f64,
    time_window: Option<TimeWindow>,
}

impl Site {
    /// Creates a new site.
    ///
    /// Negative `variance` or `bernstein_range` values are clamped to zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        x: f64,
        y: f64,
        mean_demand: f64,
        variance: f64,
        bernstein_range: f64,
        service_duration: f64,
    ) -> Self {
        Self {
            id,
            x,
            y,
            mean_demand,
            variance: variance.max(0.0),
            bernstein_range: bernstein_range.max(0.0),
            service_duration,
            time_window: None,
        }
    }

    /// Sets a time window for this site.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Site ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Mean demand `mu`.
    pub fn mean_demand(&self) -> f64 {
        self.mean_demand
    }

    /// Idiosyncratic demand variance `D` (non-negative).
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Per-site boundedness parameter used by the tail inequality.
    pub fn bernstein_range(&self) -> f64 {
        self.bernstein_range
    }

    /// Service duration at this site.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Time window constraint, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Euclidean distance to another site.
    pub fn distance_to(&self, other: &Site) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance to an arbitrary point.
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert_eq!(tw.open(), 10.0);
        assert_eq!(tw.close(), 20.0);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(tw.contains(10.0));
        assert!(tw.contains(15.0));
        assert!(tw.contains(20.0));
        assert!(!tw.contains(9.9));
        assert!(!tw.contains(20.1));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!((tw.waiting_time(5.0) - 5.0).abs() < 1e-10);
        assert!((tw.waiting_time(10.0)).abs() < 1e-10);
        assert!((tw.waiting_time(15.0)).abs() < 1e-10);
    }

    #[test]
    fn test_time_window_violated() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(!tw.is_violated(10.0));
        assert!(!tw.is_violated(20.0));
        assert!(tw.is_violated(20.1));
    }

    #[test]
    fn test_site_new() {
        let s = Site::new(1, 10.0, 20.0, 5.0, 3.0, 1.5, 4.0);
        assert_eq!(s.id(), 1);
        assert_eq!(s.x(), 10.0);
        assert_eq!(s.y(), 20.0);
        assert_eq!(s.mean_demand(), 5.0);
        assert_eq!(s.variance(), 3.0);
        assert_eq!(s.bernstein_range(), 1.5);
        assert_eq!(s.service_duration(), 4.0);
        assert!(s.time_window().is_none());
    }

    #[test]
    fn test_site_clamps_negative_inputs() {
        let s = Site::new(0, 0.0, 0.0, 5.0, -1.0, -2.0, 0.0);
        assert_eq!(s.variance(), 0.0);
        assert_eq!(s.bernstein_range(), 0.0);
    }

    #[test]
    fn test_site_with_time_window() {
        let tw = TimeWindow::new(100.0, 200.0).expect("valid");
        let s = Site::new(1, 10.0, 20.0, 5.0, 3.0, 1.0, 0.0).with_time_window(tw);
        assert!(s.time_window().is_some());
        assert_eq!(s.time_window().expect("has tw").open(), 100.0);
    }

    #[test]
    fn test_site_distance() {
        let a = Site::new(0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let b = Site::new(1, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to_point(3.0, 4.0) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_site_distance_symmetric() {
        let a = Site::new(0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0);
        let b = Site::new(1, 4.0, 6.0, 0.0, 0.0, 0.0, 0.0);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }
}
