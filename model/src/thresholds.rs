/// Every tunable cutoff the analyses use, in one place instead of scattered
/// inline literals. Defaults match the numbers the analyses were designed
/// around.
#[derive(Clone, Debug)]
pub struct Thresholds {
    /// How far back the short-term utilization window reaches, in days.
    pub recent_window_days: i64,
    /// Default short-term cutoffs, per metric.
    pub min_recent_trips: f64,
    pub min_recent_distance_km: f64,
    /// Vehicles active fewer days than this are too new to classify against
    /// the fleet average.
    pub maturity_days: i64,
    /// A gap between consecutive trips longer than this counts as idling.
    pub idle_gap_hrs: f64,
    /// Assumed fleet cruising speed, for expected trip durations.
    pub assumed_speed_kmh: f64,
    /// Trips slower than this are flagged as anomalies.
    pub slow_speed_kmh: f64,
    /// Whether a trip whose end time precedes its start time gets its
    /// duration clamped to zero instead of kept negative.
    pub clamp_negative_durations: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            recent_window_days: 7,
            min_recent_trips: 3.0,
            min_recent_distance_km: 100.0,
            maturity_days: 28,
            idle_gap_hrs: 6.0,
            assumed_speed_kmh: 40.0,
            slow_speed_kmh: 10.0,
            clamp_negative_durations: false,
        }
    }
}
