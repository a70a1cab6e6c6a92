use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of the cost per egg over an analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostTrend {
    #[serde(rename = "INCREMENTO")]
    Increasing,
    #[serde(rename = "DECREMENTO")]
    Decreasing,
    #[serde(rename = "ESTABLE")]
    Stable,
}

/// Compares the mean of the second half of `values` against the first half.
///
/// `threshold_pct` is the relative change, in percent of the first-half mean, that must be
/// exceeded before the series counts as moving. With an odd length the middle value goes to
/// the second half. Fewer than two values are always `Stable`.
pub fn classify_trend(values: &[Decimal], threshold_pct: Decimal) -> CostTrend {
    if values.len() < 2 {
        return CostTrend::Stable;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let (Some(first_mean), Some(second_mean)) = (mean(first), mean(second)) else {
        return CostTrend::Stable;
    };

    let Some(change) = second_mean.checked_sub(first_mean) else {
        return if second_mean > first_mean {
            CostTrend::Increasing
        } else {
            CostTrend::Decreasing
        };
    };
    // A tolerance too large to represent cannot be exceeded.
    let Some(tolerance) = first_mean
        .abs()
        .checked_mul(threshold_pct)
        .and_then(|t| t.checked_div(Decimal::ONE_HUNDRED))
    else {
        return CostTrend::Stable;
    };

    if change > tolerance {
        CostTrend::Increasing
    } else if change < -tolerance {
        CostTrend::Decreasing
    } else {
        CostTrend::Stable
    }
}

/// Arithmetic mean, `None` for an empty slice or a sum outside the `Decimal` range.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))?;
    sum.checked_div(Decimal::from(values.len()))
}
