//! UCB1 multi-armed bandit for operator selection.
//!
//! # Algorithm
//!
//! At iteration `t`, arm `k` scores
//! `mean_k + c·sqrt(ln(max(2, t)) / max(1, count_k))`
//! and the highest score wins, ties broken by first occurrence. Unplayed
//! arms keep a full exploration bonus, so every arm is tried early.
//!
//! # Reference
//!
//! Auer, Cesa-Bianchi & Fischer (2002), "Finite-time Analysis of the
//! Multiarmed Bandit Problem", *Machine Learning* 47, 235-256.

/// Per-arm play counts and running mean rewards.
///
/// Scoped to a single improvement run and discarded afterward.
///
/// # Examples
///
/// ```
/// use risk_routing::search::BanditStats;
///
/// let mut bandit = BanditStats::new(3);
/// let arm = bandit.select(1, 1.2);
/// assert_eq!(arm, 0); // fresh arms tie; first occurrence wins
/// bandit.update(arm, 1.0);
/// assert_eq!(bandit.count(arm), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BanditStats {
    counts: Vec<usize>,
    means: Vec<f64>,
}

impl BanditStats {
    /// Creates fresh statistics for `num_arms` arms.
    pub fn new(num_arms: usize) -> Self {
        Self {
            counts: vec![0; num_arms],
            means: vec![0.0; num_arms],
        }
    }

    /// Number of arms.
    pub fn num_arms(&self) -> usize {
        self.counts.len()
    }

    /// Times arm `k` has been updated.
    pub fn count(&self, k: usize) -> usize {
        self.counts[k]
    }

    /// Running mean reward of arm `k`.
    pub fn mean(&self, k: usize) -> f64 {
        self.means[k]
    }

    /// Selects the arm with the highest UCB1 score for iteration `t`.
    ///
    /// `exploration` is the constant `c` weighting the exploration bonus.
    pub fn select(&self, t: usize, exploration: f64) -> usize {
        let log_t = (t.max(2) as f64).ln();
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for k in 0..self.counts.len() {
            let visits = self.counts[k].max(1) as f64;
            let score = self.means[k] + exploration * (log_t / visits).sqrt();
            if score > best_score {
                best = k;
                best_score = score;
            }
        }
        best
    }

    /// Records a reward for arm `k`, updating its running mean.
    pub fn update(&mut self, k: usize, reward: f64) {
        self.counts[k] += 1;
        self.means[k] += (reward - self.means[k]) / self.counts[k] as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_stats_tie_breaks_to_first() {
        let bandit = BanditStats::new(3);
        assert_eq!(bandit.select(1, 1.2), 0);
        assert_eq!(bandit.select(100, 1.2), 0);
    }

    #[test]
    fn test_running_mean() {
        let mut bandit = BanditStats::new(2);
        bandit.update(0, 1.0);
        bandit.update(0, 0.0);
        assert_eq!(bandit.count(0), 2);
        assert!((bandit.mean(0) - 0.5).abs() < 1e-10);
        assert_eq!(bandit.count(1), 0);
    }

    #[test]
    fn test_exploration_bonus_revives_rare_arm() {
        // Arm 0 pays well but has been played often; arm 1 paid nothing
        // once. At t=10 with c=1.2 the exploration bonus favors arm 1:
        // 1.0 + 1.2·sqrt(ln10/10) ≈ 1.58 < 0.0 + 1.2·sqrt(ln10/1) ≈ 1.82.
        let mut bandit = BanditStats::new(2);
        for _ in 0..10 {
            bandit.update(0, 1.0);
        }
        bandit.update(1, 0.0);
        assert_eq!(bandit.select(10, 1.2), 1);
    }

    #[test]
    fn test_zero_exploration_is_pure_greedy() {
        let mut bandit = BanditStats::new(3);
        bandit.update(0, 0.1);
        bandit.update(1, 0.9);
        bandit.update(2, 0.5);
        assert_eq!(bandit.select(50, 0.0), 1);
    }

    #[test]
    fn test_small_t_clamped() {
        // t=0 and t=1 use ln(2); scores stay finite and selection works
        let bandit = BanditStats::new(2);
        assert_eq!(bandit.select(0, 1.2), 0);
        assert_eq!(bandit.select(1, 1.2), 0);
    }
}
