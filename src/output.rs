use anyhow::Result;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::analysis::sequence;
use crate::data::{BattleEvent, BattleState, BattleStatus, Threshold};

const HP_BAR_CELLS: usize = 10;

pub fn status_text(status: BattleStatus) -> &'static str {
    match status {
        BattleStatus::Resting => "Boss is resting",
        BattleStatus::Approaching => "Battle begins!",
        BattleStatus::HeatingUp => "HEATING UP",
        BattleStatus::Critical => "CRITICAL BATTLE",
        BattleStatus::FinalAssault => "FINAL ASSAULT",
        BattleStatus::Defeated => "ALL BOSSES DEFEATED!",
    }
}

pub fn status_icon(status: BattleStatus) -> &'static str {
    match status {
        BattleStatus::Resting => "😴",
        BattleStatus::Approaching => "⚡",
        BattleStatus::HeatingUp => "🔥",
        BattleStatus::Critical => "🚨",
        BattleStatus::FinalAssault => "⚔️",
        BattleStatus::Defeated => "🏆",
    }
}

pub fn progress_percent(progress: f64) -> u32 {
    (progress.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Ten-cell bar: dealt damage as `█`, remaining hit points as `░`.
pub fn hp_bar(progress: f64) -> String {
    let remaining = (((1.0 - progress.clamp(0.0, 1.0)) * HP_BAR_CELLS as f64).round() as usize)
        .min(HP_BAR_CELLS);
    format!(
        "{}{}",
        "█".repeat(HP_BAR_CELLS - remaining),
        "░".repeat(remaining)
    )
}

/// Threshold label, falling back to its 1-based ladder position.
pub fn display_label(threshold: &Threshold, rank: usize) -> String {
    threshold
        .label
        .clone()
        .unwrap_or_else(|| format!("Boss Level {rank}"))
}

pub fn describe_event(event: &BattleEvent) -> String {
    match event {
        BattleEvent::ThresholdCleared { threshold, rank } => format!(
            "💀 {} defeated at {:.2} (level {rank})",
            display_label(threshold, *rank),
            threshold.value
        ),
        BattleEvent::TargetSwitched {
            from,
            to,
            price_drop,
        } => {
            let from = from
                .as_ref()
                .and_then(|t| t.label.clone())
                .unwrap_or_else(|| "-".to_string());
            let to_label = to.label.clone().unwrap_or_else(|| format!("{:.2}", to.value));
            format!("↔️ Target switched {from} -> {to_label} after a {price_drop:.2} drop")
        }
    }
}

#[derive(Tabled)]
struct LadderRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Boss")]
    label: String,
    #[tabled(rename = "Spawned")]
    date: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "State")]
    state: &'static str,
}

pub fn print_report(state: &BattleState, thresholds: &[Threshold], events: &[BattleEvent]) {
    println!("\n=== Boss Ladder ===\n");
    println!("Current Price: {:.2}", state.current_price);
    println!(
        "Defeated: {}/{} | {} {}",
        state.cleared_count,
        state.total_count,
        status_icon(state.status),
        status_text(state.status)
    );

    match &state.current_target {
        Some(target) => {
            println!(
                "Target: {} at {:.2} | {:.2} to go | {:.2} dealt",
                display_label(target, state.cleared_count + 1),
                target.value,
                state.remaining_amount,
                state.advance_amount
            );
            println!(
                "HP: {} {}%",
                hp_bar(state.progress),
                progress_percent(state.progress)
            );
            if let Some(next) = &state.next_target {
                println!(
                    "Next: {} at {:.2}",
                    display_label(next, state.cleared_count + 2),
                    next.value
                );
            }
        }
        None => println!("Every boss on the ladder has fallen."),
    }

    if !events.is_empty() {
        println!();
        for event in events {
            println!("{}", describe_event(event));
        }
    }

    if thresholds.is_empty() {
        return;
    }

    let rows: Vec<LadderRow> = sequence(thresholds)
        .iter()
        .enumerate()
        .map(|(idx, threshold)| LadderRow {
            rank: idx + 1,
            label: display_label(threshold, idx + 1),
            date: threshold
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            tier: threshold.tier.clone().unwrap_or_else(|| "-".to_string()),
            price: format!("{:.2}", threshold.value),
            state: ladder_state(idx, state.cleared_count),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");
}

fn ladder_state(idx: usize, cleared_count: usize) -> &'static str {
    if idx < cleared_count {
        "Defeated"
    } else if idx == cleared_count {
        "Target"
    } else {
        "Waiting"
    }
}

pub fn print_boss_detail(boss: &Threshold, rank: usize, current_price: Option<f64>) {
    println!("\n=== {} ===\n", display_label(boss, rank));
    println!("Level: {rank}");
    println!("Price: {:.2}", boss.value);
    if let Some(date) = boss.date {
        println!("Spawned: {}", date.format("%Y-%m-%d"));
    }
    println!("Tier: {}", boss.tier.as_deref().unwrap_or("COMMON"));
    if let Some(image) = &boss.image {
        println!("Image: {image}");
    }
    if let Some(price) = current_price {
        if boss.value <= price {
            println!("State: Defeated at {price:.2}");
        } else {
            println!("State: Standing, {:.2} to go", boss.value - price);
        }
    }
    if let Some(lore) = &boss.lore {
        println!("\n{lore}");
    }
    println!();
}

#[derive(Serialize)]
struct BossDetail<'a> {
    rank: usize,
    #[serde(flatten)]
    boss: &'a Threshold,
    #[serde(skip_serializing_if = "Option::is_none")]
    defeated: Option<bool>,
}

pub fn render_boss_json(
    boss: &Threshold,
    rank: usize,
    current_price: Option<f64>,
) -> Result<String> {
    let detail = BossDetail {
        rank,
        boss,
        defeated: current_price.map(|price| boss.value <= price),
    };
    Ok(serde_json::to_string_pretty(&detail)?)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    state: &'a BattleState,
    events: &'a [BattleEvent],
}

pub fn render_json(state: &BattleState, events: &[BattleEvent]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport { state, events })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn test_hp_bar_fills_with_progress() {
        assert_eq!(hp_bar(0.0), "░░░░░░░░░░");
        assert_eq!(hp_bar(0.6289), "██████░░░░");
        assert_eq!(hp_bar(1.0), "██████████");
        assert_eq!(hp_bar(0.9912).chars().count(), 10);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(0.6289), 63);
        assert_eq!(progress_percent(0.9912), 99);
        assert_eq!(progress_percent(1.0), 100);
    }

    #[test]
    fn test_display_label_fallback() {
        assert_eq!(display_label(&Threshold::new(4071.0), 2), "Boss Level 2");
        assert_eq!(display_label(&Threshold::labeled(4071.0, "Gorath"), 2), "Gorath");
    }

    #[test]
    fn test_status_text_for_every_label() {
        assert_eq!(status_text(BattleStatus::HeatingUp), "HEATING UP");
        assert_eq!(status_text(BattleStatus::Defeated), "ALL BOSSES DEFEATED!");
        assert_eq!(status_icon(BattleStatus::Critical), "🚨");
    }

    #[test]
    fn test_ladder_state_marks_target() {
        assert_eq!(ladder_state(0, 1), "Defeated");
        assert_eq!(ladder_state(1, 1), "Target");
        assert_eq!(ladder_state(2, 1), "Waiting");
    }

    #[test]
    fn test_json_uses_snake_case_status() {
        let thresholds = vec![Threshold::labeled(4027.88, "A"), Threshold::labeled(4071.0, "B")];
        let state = analyze(4055.0, &thresholds);
        let json = render_json(&state, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"]["status"], "heating_up");
        assert_eq!(value["state"]["cleared_count"], 1);
        assert_eq!(value["state"]["current_target"]["label"], "B");
        assert!(value["state"]["next_target"].is_null());
    }

    #[test]
    fn test_boss_json_carries_rank_and_lore() {
        let mut boss = Threshold::labeled(4071.0, "Athion");
        boss.tier = Some("LEGENDARY".to_string());
        boss.lore = Some("First of the peaks.".to_string());

        let json = render_boss_json(&boss, 3, Some(4100.0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rank"], 3);
        assert_eq!(value["label"], "Athion");
        assert_eq!(value["tier"], "LEGENDARY");
        assert_eq!(value["lore"], "First of the peaks.");
        assert_eq!(value["defeated"], true);

        let json = render_boss_json(&boss, 3, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("defeated").is_none());
    }

    #[test]
    fn test_event_descriptions() {
        let cleared = BattleEvent::ThresholdCleared {
            threshold: Threshold::new(4071.0),
            rank: 2,
        };
        assert!(describe_event(&cleared).contains("Boss Level 2"));

        let switched = BattleEvent::TargetSwitched {
            from: None,
            to: Threshold::labeled(4071.0, "B"),
            price_drop: 12.5,
        };
        assert!(describe_event(&switched).contains("-> B"));
    }
}
