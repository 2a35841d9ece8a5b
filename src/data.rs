use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Historical price peak acting as one milestone ("boss level") on the ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub value: f64,
    pub label: Option<String>,
    pub date: Option<NaiveDate>,
    pub tier: Option<String>,
    pub image: Option<String>,
    pub lore: Option<String>,
}

#[cfg(test)]
impl Threshold {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            label: None,
            date: None,
            tier: None,
            image: None,
            lore: None,
        }
    }

    pub fn labeled(value: f64, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(value)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Resting,
    Approaching,
    HeatingUp,
    Critical,
    FinalAssault,
    Defeated,
}

impl BattleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BattleStatus::Resting => "resting",
            BattleStatus::Approaching => "approaching",
            BattleStatus::HeatingUp => "heating_up",
            BattleStatus::Critical => "critical",
            BattleStatus::FinalAssault => "final_assault",
            BattleStatus::Defeated => "defeated",
        }
    }
}

/// Immutable snapshot of where a price sits on the threshold ladder.
///
/// `current_target` is `None` once every threshold is at or below the price
/// (including the empty ladder). `progress` is always within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleState {
    pub current_target: Option<Threshold>,
    pub next_target: Option<Threshold>,
    pub current_price: f64,
    pub progress: f64,
    pub status: BattleStatus,
    pub cleared_count: usize,
    pub total_count: usize,
    pub advance_amount: f64,
    pub remaining_amount: f64,
}

/// Transition detected between two snapshots taken at different times.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    /// Threshold crossed upward; `rank` is its 1-based position on the ladder.
    ThresholdCleared { threshold: Threshold, rank: usize },
    /// Price fell back under a cleared threshold, which became the target again.
    TargetSwitched {
        from: Option<Threshold>,
        to: Threshold,
        price_drop: f64,
    },
}

/// Price observation as served by a price source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub price_usd: f64,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}
