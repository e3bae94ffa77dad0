use std::time::Duration;

/// Weights applied to the four scoring criteria.
///
/// Weights are independent tunables and are not required to sum to 1;
/// the total score is a plain weighted sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub price: f64,
    pub performance: f64,
    pub reliability: f64,
    pub location: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            price: 0.3,
            performance: 0.2,
            reliability: 0.3,
            location: 0.2,
        }
    }
}

/// Configuration for the matching pipeline.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub weights: ScoreWeights,
    /// Reference price used for the price score when a job declares no
    /// price ceiling of its own.
    pub baseline_price: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            baseline_price: 100.0,
        }
    }
}

impl MatcherConfig {
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_baseline_price(mut self, baseline_price: f64) -> Self {
        self.baseline_price = baseline_price;
        self
    }
}

/// Configuration for the periodic scheduling loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between scheduling ticks.
    pub tick_interval: Duration,
    /// Delay before the first tick after startup.
    pub initial_delay: Duration,
    /// Maximum number of jobs pulled per tick.
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            initial_delay: Duration::from_secs(5),
            batch_size: 10,
        }
    }
}

impl SchedulerConfig {
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_weights_default() {
        let w = ScoreWeights::default();
        assert_eq!(w.price, 0.3);
        assert_eq!(w.performance, 0.2);
        assert_eq!(w.reliability, 0.3);
        assert_eq!(w.location, 0.2);
    }

    #[test]
    fn matcher_config_default() {
        let cfg = MatcherConfig::default();
        assert_eq!(cfg.baseline_price, 100.0);
        assert_eq!(cfg.weights, ScoreWeights::default());
    }

    #[test]
    fn scheduler_config_default() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.tick_interval, Duration::from_secs(60));
        assert_eq!(cfg.initial_delay, Duration::from_secs(5));
        assert_eq!(cfg.batch_size, 10);
    }

    #[test]
    fn scheduler_config_builders() {
        let cfg = SchedulerConfig::default()
            .with_tick_interval(Duration::from_millis(50))
            .with_initial_delay(Duration::ZERO)
            .with_batch_size(3);
        assert_eq!(cfg.tick_interval, Duration::from_millis(50));
        assert_eq!(cfg.initial_delay, Duration::ZERO);
        assert_eq!(cfg.batch_size, 3);
    }

    #[test]
    fn matcher_config_builders() {
        let cfg = MatcherConfig::default()
            .with_baseline_price(50.0)
            .with_weights(ScoreWeights {
                price: 1.0,
                performance: 0.0,
                reliability: 0.0,
                location: 0.0,
            });
        assert_eq!(cfg.baseline_price, 50.0);
        assert_eq!(cfg.weights.price, 1.0);
    }
}
