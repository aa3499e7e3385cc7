//! Engine tunables.
//!
//! Every struct implements `Default` and deserializes with `#[serde(default)]`,
//! so a JSON config file only has to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::layout::timeline::Granularity;

/// Top-level configuration handed to every pass of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length in days of the interval inferred for tasks without dates.
    pub placeholder_days: i64,
    pub timeline: TimelineConfig,
    pub routing: RoutingConfig,
    pub force: ForceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_days: 7,
            timeline: TimelineConfig::default(),
            routing: RoutingConfig::default(),
            force: ForceConfig::default(),
        }
    }
}

/// Per-granularity widths and padding for the Gantt timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Pixels per day at zoom 1.0, one entry per granularity.
    pub day_width_day: f32,
    pub day_width_week: f32,
    pub day_width_month: f32,
    pub day_width_year: f32,
    /// Days of padding added on both sides of the task span.
    pub padding_day: i64,
    pub padding_week: i64,
    pub padding_month: i64,
    pub padding_year: i64,
    /// Width of the window centred on today when no task carries a date.
    pub empty_window_days: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            day_width_day: 40.0,
            day_width_week: 16.0,
            day_width_month: 5.0,
            day_width_year: 1.5,
            padding_day: 3,
            padding_week: 7,
            padding_month: 30,
            padding_year: 90,
            empty_window_days: 30,
        }
    }
}

impl TimelineConfig {
    pub fn base_day_width(&self, granularity: Granularity) -> f32 {
        match granularity {
            Granularity::Day => self.day_width_day,
            Granularity::Week => self.day_width_week,
            Granularity::Month => self.day_width_month,
            Granularity::Year => self.day_width_year,
        }
    }

    pub fn padding_days(&self, granularity: Granularity) -> i64 {
        match granularity {
            Granularity::Day => self.padding_day,
            Granularity::Week => self.padding_week,
            Granularity::Month => self.padding_month,
            Granularity::Year => self.padding_year,
        }
    }
}

/// Dependency line drawing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Horizontal run out of / into a bar before the orthogonal jog.
    pub stub_px: f32,
    /// Curve control offset as a fraction of the horizontal distance.
    pub curve_factor: f32,
    pub max_curve_offset: f32,
    pub arrow_size: f32,
    pub marker_radius: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            stub_px: 12.0,
            curve_factor: 0.5,
            max_curve_offset: 80.0,
            arrow_size: 6.0,
            marker_radius: 2.5,
        }
    }
}

/// Constants of the force-directed simulation.
///
/// Two linked nodes settle where `k_repulsion / d^2 == d * k_attraction`,
/// i.e. at `d = (k_repulsion / k_attraction)^(1/3)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub k_repulsion: f32,
    pub k_attraction: f32,
    /// Velocity multiplier applied every step, must stay below 1.
    pub damping: f32,
    /// Upper bound on distance travelled per step.
    pub max_speed: f32,
    /// Initial circle radius as a fraction of the smaller half-extent:
    /// 0.7 on an 800x600 canvas gives 210 px.
    pub radius_fraction: f32,
    pub iterations: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 40.0,
            k_repulsion: 20_000.0,
            k_attraction: 0.02,
            damping: 0.85,
            max_speed: 20.0,
            radius_fraction: 0.7,
            iterations: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "placeholder_days": 3, "force": { "iterations": 50 } }"#)
                .unwrap();
        assert_eq!(cfg.placeholder_days, 3);
        assert_eq!(cfg.force.iterations, 50);
        assert_eq!(cfg.force.damping, ForceConfig::default().damping);
        assert_eq!(cfg.timeline, TimelineConfig::default());
    }

    #[test]
    fn widths_shrink_with_coarser_granularity() {
        let cfg = TimelineConfig::default();
        assert!(cfg.base_day_width(Granularity::Day) > cfg.base_day_width(Granularity::Week));
        assert!(cfg.base_day_width(Granularity::Week) > cfg.base_day_width(Granularity::Month));
        assert!(cfg.base_day_width(Granularity::Month) > cfg.base_day_width(Granularity::Year));
        assert!(cfg.padding_days(Granularity::Year) > cfg.padding_days(Granularity::Day));
    }
}
