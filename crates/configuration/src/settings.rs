use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; a missing section falls back to
/// the documented defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statistics: StatisticsSettings,
    pub alerts: AlertThresholds,
    pub breeds: Vec<BreedStandard>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            statistics: StatisticsSettings::default(),
            alerts: AlertThresholds::default(),
            breeds: default_breeds(),
        }
    }
}

impl Config {
    /// Looks up the laying standard for a breed, ignoring case and surrounding whitespace.
    pub fn breed(&self, name: &str) -> Option<&BreedStandard> {
        let name = name.trim();
        self.breeds
            .iter()
            .find(|b| b.breed.trim().eq_ignore_ascii_case(name))
    }
}

/// Longest analysis window accepted anywhere, roughly ten years of daily records.
pub const MAX_WINDOW_DAYS: u32 = 3_660;

/// Parameters for the rolling statistics window and trend classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Length of the analysis window in days, ending on the as-of date.
    pub window_days: u32,
    /// Relative change (in percent) between the two halves of the window's
    /// cost series that is needed to call a trend. 5 means 5%.
    pub trend_threshold_pct: Decimal,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            window_days: 30,
            trend_threshold_pct: dec!(5),
        }
    }
}

/// Thresholds used by the alert rules. Percentages are expressed as 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Highest acceptable cost per egg.
    pub max_cost_per_unit: Decimal,
    /// How far above `max_cost_per_unit` (in percent) the cost must be to become critical.
    pub critical_cost_overrun_pct: Decimal,
    /// Lowest acceptable production efficiency against the breed standard.
    pub min_efficiency_pct: Decimal,
    /// Efficiency below `min_efficiency_pct * critical_efficiency_factor` is critical.
    pub critical_efficiency_factor: Decimal,
    /// Largest tolerated drop of a day's production below the window average.
    pub max_production_drop_pct: Decimal,
    /// Largest tolerated day-over-day increase of total expense.
    pub max_daily_cost_increase_pct: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_cost_per_unit: dec!(0.25),
            critical_cost_overrun_pct: dec!(50),
            min_efficiency_pct: dec!(85),
            critical_efficiency_factor: dec!(0.5),
            max_production_drop_pct: dec!(15),
            max_daily_cost_increase_pct: dec!(20),
        }
    }
}

/// The theoretical laying curve of a breed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedStandard {
    pub breed: String,
    /// Points of the curve, each valid from its week of age until the next one.
    pub laying_curve: Vec<LayingPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayingPoint {
    /// Age of the birds in weeks from which `rate_pct` applies.
    pub from_week: u32,
    /// Eggs per hundred birds per day.
    pub rate_pct: Decimal,
}

impl BreedStandard {
    /// The expected laying rate at the given age, or `None` before the curve starts.
    pub fn rate_at_week(&self, age_weeks: u32) -> Option<Decimal> {
        self.laying_curve
            .iter()
            .filter(|p| p.from_week <= age_weeks)
            .max_by_key(|p| p.from_week)
            .map(|p| p.rate_pct)
    }
}

fn curve(points: &[(u32, Decimal)]) -> Vec<LayingPoint> {
    points
        .iter()
        .map(|&(from_week, rate_pct)| LayingPoint { from_week, rate_pct })
        .collect()
}

/// Commercial brown-egg layer curves used when `config.toml` defines no breeds.
fn default_breeds() -> Vec<BreedStandard> {
    vec![
        BreedStandard {
            breed: "Hy-Line Brown".to_string(),
            laying_curve: curve(&[
                (18, dec!(10)),
                (19, dec!(35)),
                (20, dec!(62)),
                (21, dec!(80)),
                (22, dec!(90)),
                (24, dec!(94)),
                (30, dec!(93)),
                (40, dec!(90)),
                (50, dec!(87)),
                (60, dec!(83)),
                (70, dec!(78)),
                (80, dec!(73)),
            ]),
        },
        BreedStandard {
            breed: "Lohmann Brown".to_string(),
            laying_curve: curve(&[
                (19, dec!(20)),
                (20, dec!(50)),
                (21, dec!(75)),
                (22, dec!(88)),
                (24, dec!(93)),
                (35, dec!(91)),
                (45, dec!(88)),
                (55, dec!(84)),
                (65, dec!(80)),
                (75, dec!(75)),
            ]),
        },
    ]
}
