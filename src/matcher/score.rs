use serde::Serialize;

use crate::config::{MatcherConfig, ScoreWeights};
use crate::resource::{GeoPoint, Resource};

/// Distance at which location stops contributing to the score.
const LOCATION_HORIZON_KM: f64 = 5000.0;

/// Component score when a resource declares no benchmark result.
const NEUTRAL_PERFORMANCE: f64 = 0.5;

/// Component score when either side has no coordinates.
const NEUTRAL_LOCATION: f64 = 0.5;

/// A candidate resource with its per-criterion and total scores.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResource {
    pub resource: Resource,
    pub price_score: f64,
    pub performance_score: f64,
    pub reliability_score: f64,
    pub location_score: f64,
    pub total: f64,
}

/// Score a single candidate. All component scores are in [0, 1],
/// higher is better; the total is the weighted sum.
pub fn score_resource(
    resource: &Resource,
    price_ceiling: f64,
    reference_point: Option<&GeoPoint>,
    weights: &ScoreWeights,
) -> ScoredResource {
    let price_score = if price_ceiling > 0.0 {
        (1.0 - resource.price_per_unit / price_ceiling).max(0.0)
    } else {
        0.0
    };

    let performance_score = resource
        .performance_score
        .map(|s| f64::from(s) / 100.0)
        .unwrap_or(NEUTRAL_PERFORMANCE);

    let reliability_score = resource.metrics.reliability / 100.0;

    let location_score = match (reference_point, &resource.location) {
        (Some(user), Some(loc)) => {
            let distance = user.distance_km(loc);
            (1.0 - distance / LOCATION_HORIZON_KM).max(0.0)
        }
        _ => NEUTRAL_LOCATION,
    };

    let total = weights.price * price_score
        + weights.performance * performance_score
        + weights.reliability * reliability_score
        + weights.location * location_score;

    ScoredResource {
        resource: resource.clone(),
        price_score,
        performance_score,
        reliability_score,
        location_score,
        total,
    }
}

/// Score every candidate and rank best-first.
///
/// The sort is stable: candidates with equal totals keep the order the
/// repository returned them in.
pub fn rank_candidates(
    candidates: Vec<Resource>,
    price_ceiling: Option<f64>,
    reference_point: Option<&GeoPoint>,
    config: &MatcherConfig,
) -> Vec<ScoredResource> {
    let ceiling = price_ceiling.unwrap_or(config.baseline_price);
    let mut scored: Vec<ScoredResource> = candidates
        .iter()
        .map(|r| score_resource(r, ceiling, reference_point, &config.weights))
        .collect();
    scored.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::PricingModel;

    fn resource(price: f64) -> Resource {
        Resource::new("o", 8, 16, 100).with_price(price, PricingModel::Hourly)
    }

    #[test]
    fn price_score_linear_under_ceiling() {
        let w = ScoreWeights::default();
        let s = score_resource(&resource(5.0), 10.0, None, &w);
        assert!((s.price_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn price_at_or_above_ceiling_scores_zero() {
        let w = ScoreWeights::default();
        assert_eq!(score_resource(&resource(10.0), 10.0, None, &w).price_score, 0.0);
        assert_eq!(score_resource(&resource(20.0), 10.0, None, &w).price_score, 0.0);
    }

    #[test]
    fn unscored_performance_is_neutral() {
        let w = ScoreWeights::default();
        let s = score_resource(&resource(1.0), 10.0, None, &w);
        assert_eq!(s.performance_score, 0.5);

        let scored = resource(1.0).with_performance_score(80);
        let s = score_resource(&scored, 10.0, None, &w);
        assert!((s.performance_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn location_neutral_without_both_points() {
        let w = ScoreWeights::default();
        let user = GeoPoint { lon: 0.0, lat: 0.0 };
        assert_eq!(score_resource(&resource(1.0), 10.0, None, &w).location_score, 0.5);
        assert_eq!(
            score_resource(&resource(1.0), 10.0, Some(&user), &w).location_score,
            0.5
        );
    }

    #[test]
    fn location_decays_with_distance() {
        let w = ScoreWeights::default();
        let user = GeoPoint { lon: 2.35, lat: 48.85 };
        let close = resource(1.0).with_location(2.35, 48.85);
        let far = resource(1.0).with_location(139.69, 35.68); // ~9700 km away
        let s_close = score_resource(&close, 10.0, Some(&user), &w);
        let s_far = score_resource(&far, 10.0, Some(&user), &w);
        assert!((s_close.location_score - 1.0).abs() < 1e-6);
        assert_eq!(s_far.location_score, 0.0);
    }

    #[test]
    fn component_scores_bounded() {
        let w = ScoreWeights::default();
        let r = resource(0.0)
            .with_performance_score(100)
            .with_reliability(100.0);
        let s = score_resource(&r, 10.0, None, &w);
        for v in [s.price_score, s.performance_score, s.reliability_score, s.location_score] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn total_is_weighted_sum() {
        let w = ScoreWeights {
            price: 1.0,
            performance: 2.0,
            reliability: 3.0,
            location: 4.0,
        };
        let s = score_resource(&resource(5.0), 10.0, None, &w);
        let expected = 1.0 * s.price_score
            + 2.0 * s.performance_score
            + 3.0 * s.reliability_score
            + 4.0 * s.location_score;
        assert!((s.total - expected).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let config = MatcherConfig::default();
        let a = resource(5.0);
        let b = resource(5.0);
        let (id_a, id_b) = (a.id, b.id);
        let ranked = rank_candidates(vec![a, b], Some(10.0), None, &config);
        assert_eq!(ranked[0].resource.id, id_a);
        assert_eq!(ranked[1].resource.id, id_b);
    }

    #[test]
    fn ranking_sorts_descending() {
        let config = MatcherConfig::default();
        let cheap = resource(1.0);
        let pricey = resource(9.0);
        let cheap_id = cheap.id;
        let ranked = rank_candidates(vec![pricey, cheap], Some(10.0), None, &config);
        assert_eq!(ranked[0].resource.id, cheap_id);
    }
}
