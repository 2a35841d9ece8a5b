use crate::analysis::sequence::sequence;
use crate::data::{BattleEvent, BattleState, Threshold};

/// Compare an earlier and a later snapshot of the same ladder.
///
/// Every threshold in `(earlier.current_price, later.current_price]` yields a
/// `ThresholdCleared`, lowest first. A `TargetSwitched` is reported when the
/// target changed while the price fell.
pub fn diff(
    earlier: &BattleState,
    later: &BattleState,
    thresholds: &[Threshold],
) -> Vec<BattleEvent> {
    let mut events: Vec<BattleEvent> = sequence(thresholds)
        .into_iter()
        .enumerate()
        .filter(|(_, threshold)| {
            threshold.value > earlier.current_price && threshold.value <= later.current_price
        })
        .map(|(idx, threshold)| BattleEvent::ThresholdCleared {
            threshold,
            rank: idx + 1,
        })
        .collect();

    if later.current_price < earlier.current_price
        && later.current_target != earlier.current_target
    {
        if let Some(to) = &later.current_target {
            events.push(BattleEvent::TargetSwitched {
                from: earlier.current_target.clone(),
                to: to.clone(),
                price_drop: earlier.current_price - later.current_price,
            });
        }
    }

    events
}
