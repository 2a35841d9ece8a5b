use crate::analysis::sequence::sequence;
use crate::data::{BattleState, BattleStatus, Threshold};

/// Locate `current_price` on the threshold ladder and derive progress metrics.
///
/// A threshold whose value equals the price counts as cleared. Progress toward
/// the first threshold is measured from zero. Inputs are assumed finite;
/// callers reject NaN and infinite prices before getting here.
pub fn analyze(current_price: f64, thresholds: &[Threshold]) -> BattleState {
    let sorted = sequence(thresholds);

    let cleared_count = sorted
        .iter()
        .position(|threshold| threshold.value > current_price)
        .unwrap_or(sorted.len());
    let current_target = sorted.get(cleared_count).cloned();
    let previous_value = if cleared_count > 0 {
        sorted[cleared_count - 1].value
    } else {
        0.0
    };

    let (progress, status, remaining_amount) = match &current_target {
        Some(target) => {
            let progress = progress_between(current_price, previous_value, target.value);
            (
                progress,
                classify_progress(progress),
                (target.value - current_price).max(0.0),
            )
        }
        None => (1.0, BattleStatus::Defeated, 0.0),
    };

    BattleState {
        next_target: sorted.get(cleared_count + 1).cloned(),
        current_target,
        current_price,
        progress,
        status,
        cleared_count,
        total_count: sorted.len(),
        advance_amount: (current_price - previous_value).max(0.0),
        remaining_amount,
    }
}

/// Bucket a progress fraction into its status label.
pub fn classify_progress(progress: f64) -> BattleStatus {
    if progress < 0.25 {
        BattleStatus::Resting
    } else if progress < 0.5 {
        BattleStatus::Approaching
    } else if progress < 0.75 {
        BattleStatus::HeatingUp
    } else if progress < 0.9 {
        BattleStatus::Critical
    } else {
        BattleStatus::FinalAssault
    }
}

fn progress_between(price: f64, floor: f64, target: f64) -> f64 {
    let span = target - floor;
    let raw = if span == 0.0 {
        if price >= target {
            1.0
        } else {
            0.0
        }
    } else {
        (price - floor) / span
    };
    raw.clamp(0.0, 1.0)
}
