use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing cadence used to convert a unit price into a job-duration cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    PerJob,
}

impl PricingModel {
    /// Number of billing units a job of the given duration consumes.
    /// Partial periods are billed in full.
    pub fn billing_units(self, duration_hours: f64) -> f64 {
        match self {
            PricingModel::Hourly => duration_hours,
            PricingModel::Daily => (duration_hours / 24.0).ceil(),
            PricingModel::Weekly => (duration_hours / 168.0).ceil(),
            PricingModel::Monthly => (duration_hours / 720.0).ceil(),
            PricingModel::PerJob => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuSpec {
    pub count: u32,
    pub model: Option<String>,
    pub memory_gb: Option<u32>,
}

/// Geographic point as (longitude, latitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

impl GeoPoint {
    /// Great-circle distance in kilometers (haversine). Coarse locality
    /// measure only; no ellipsoidal correction.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

/// Weekly availability window, declared in the owner's local offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub always_available: bool,
    /// Days of week the window applies to. Ignored when
    /// `always_available` is set.
    pub days: Vec<Weekday>,
    /// Window start hour, 0-23, in local time.
    pub start_hour: u8,
    /// Window end hour, exclusive. An end at or before the start wraps
    /// past midnight.
    pub end_hour: u8,
    pub utc_offset_minutes: i32,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl Availability {
    pub fn always() -> Self {
        Self {
            always_available: true,
            days: Vec::new(),
            start_hour: 0,
            end_hour: 24,
            utc_offset_minutes: 0,
            valid_from: None,
            valid_until: None,
        }
    }

    pub fn weekly(days: Vec<Weekday>, start_hour: u8, end_hour: u8, utc_offset_minutes: i32) -> Self {
        Self {
            always_available: false,
            days,
            start_hour,
            end_hour,
            utc_offset_minutes,
            valid_from: None,
            valid_until: None,
        }
    }

    fn within_validity(&self, at: DateTime<Utc>) -> bool {
        if let Some(from) = self.valid_from {
            if at < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if at > until {
                return false;
            }
        }
        true
    }

    /// Whether the resource is available at the given instant.
    pub fn is_available_at(&self, at: DateTime<Utc>) -> bool {
        if !self.within_validity(at) {
            return false;
        }
        if self.always_available {
            return true;
        }
        let Some(offset) = FixedOffset::east_opt(self.utc_offset_minutes * 60) else {
            return false;
        };
        let local = at.with_timezone(&offset);
        let hour = local.hour() as u8;
        if self.start_hour < self.end_hour {
            self.days.contains(&local.weekday()) && hour >= self.start_hour && hour < self.end_hour
        } else {
            // Window wraps past midnight: the evening part lies on a
            // listed day, the morning part on the day after it.
            (self.days.contains(&local.weekday()) && hour >= self.start_hour)
                || (self.days.contains(&local.weekday().pred()) && hour < self.end_hour)
        }
    }

    /// Earliest instant at or after `after` when the window opens.
    ///
    /// Scans at most 14 days ahead; availability declarations are
    /// weekly, so any evaluable schedule opens within that horizon.
    pub fn next_window_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_available_at(after) {
            return Some(after);
        }
        if self.always_available {
            // Only a future validity start can open the window
            let from = self.valid_from?;
            return (from > after && self.within_validity(from)).then_some(from);
        }
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)?;
        let local = after.with_timezone(&offset);
        for day in 0..14i64 {
            let date = local.date_naive() + Duration::days(day);
            if !self.days.contains(&date.weekday()) {
                continue;
            }
            let start = date.and_hms_opt(self.start_hour as u32, 0, 0)?;
            let candidate = start
                .and_local_timezone(offset)
                .single()?
                .with_timezone(&Utc);
            if candidate > after && self.within_validity(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Rolling operational metrics for a resource. Fed back after each
/// completed or failed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceMetrics {
    pub successful_jobs: u64,
    pub failed_jobs: u64,
    /// Historical success ratio as a percentage. 100 with no history.
    pub reliability: f64,
    pub uptime: f64,
    pub total_compute_hours: f64,
}

impl Default for ResourceMetrics {
    fn default() -> Self {
        Self {
            successful_jobs: 0,
            failed_jobs: 0,
            reliability: 100.0,
            uptime: 100.0,
            total_compute_hours: 0.0,
        }
    }
}

impl ResourceMetrics {
    /// Record a finished job and recompute reliability.
    pub fn record_outcome(&mut self, success: bool, compute_hours: f64) {
        if success {
            self.successful_jobs += 1;
        } else {
            self.failed_jobs += 1;
        }
        let total = self.successful_jobs + self.failed_jobs;
        self.reliability = self.successful_jobs as f64 / total as f64 * 100.0;
        self.total_compute_hours += compute_hours;
    }
}

/// An advertised compute resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub owner: String,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub storage_gb: u32,
    pub gpu: Option<GpuSpec>,
    /// Declared benchmark score, 0-100. None means unscored.
    pub performance_score: Option<u8>,
    pub price_per_unit: f64,
    pub pricing: PricingModel,
    pub availability: Availability,
    pub metrics: ResourceMetrics,
    pub location: Option<GeoPoint>,
    pub tags: Vec<String>,
    /// Inactive resources are invisible to matching.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(owner: impl Into<String>, cpu_cores: u32, memory_gb: u32, storage_gb: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            cpu_cores,
            memory_gb,
            storage_gb,
            gpu: None,
            performance_score: None,
            price_per_unit: 0.0,
            pricing: PricingModel::Hourly,
            availability: Availability::always(),
            metrics: ResourceMetrics::default(),
            location: None,
            tags: Vec::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_price(mut self, price_per_unit: f64, pricing: PricingModel) -> Self {
        self.price_per_unit = price_per_unit;
        self.pricing = pricing;
        self
    }

    pub fn with_gpu(mut self, count: u32, model: Option<String>, memory_gb: Option<u32>) -> Self {
        self.gpu = Some(GpuSpec {
            count,
            model,
            memory_gb,
        });
        self
    }

    pub fn with_performance_score(mut self, score: u8) -> Self {
        self.performance_score = Some(score.min(100));
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_location(mut self, lon: f64, lat: f64) -> Self {
        self.location = Some(GeoPoint { lon, lat });
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_reliability(mut self, reliability: f64) -> Self {
        self.metrics.reliability = reliability.clamp(0.0, 100.0);
        self
    }
}
