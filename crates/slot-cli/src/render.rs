//! Output formats for the slot list.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use slot_engine::Interval;

const RULE_WIDTH: usize = 70;

/// JSON array of `{start, end, timezone}` objects.
pub fn json(slots: &[Interval]) -> Result<String> {
    Ok(serde_json::to_string_pretty(slots)? + "\n")
}

/// Plain-text listing grouped by ISO week, then by day.
pub fn text(slots: &[Interval], title: &str, generated_at: &str) -> String {
    if slots.is_empty() {
        return "No available time slots found.\n".to_string();
    }

    let mut weeks: BTreeMap<(i32, u32), BTreeMap<NaiveDate, Vec<&Interval>>> = BTreeMap::new();
    for slot in slots {
        let day = slot.start().date_naive();
        let week = day.iso_week();
        weeks
            .entry((week.year(), week.week()))
            .or_default()
            .entry(day)
            .or_default()
            .push(slot);
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        format!("{:^width$}", title, width = RULE_WIDTH),
        rule.clone(),
        String::new(),
    ];

    for (index, days) in weeks.values().enumerate() {
        let Some(first_day) = days.keys().next().copied() else {
            continue;
        };
        if index > 0 {
            lines.push(String::new());
        }
        let monday = first_day - Days::new(u64::from(first_day.weekday().num_days_from_monday()));
        lines.push(format!(
            "WEEK OF {}",
            monday.format("%B %d, %Y").to_string().to_uppercase()
        ));
        lines.push("-".repeat(RULE_WIDTH));

        for (day, day_slots) in days {
            lines.push(format!("\n  {}", day.format("%A, %B %d")));
            for slot in day_slots {
                lines.push(format!(
                    "    {} - {} ({})",
                    slot.start().format("%H:%M"),
                    slot.end().format("%H:%M"),
                    human_duration(slot)
                ));
            }
        }
    }

    lines.extend([
        String::new(),
        rule,
        format!("Generated on {}", generated_at),
        String::new(),
    ]);
    lines.join("\n")
}

/// `1.5h` for an hour or more, otherwise `45min`.
pub fn human_duration(slot: &Interval) -> String {
    let minutes = slot.duration_minutes();
    if minutes >= 60 {
        format!("{:.1}h", minutes as f64 / 60.0)
    } else {
        format!("{}min", minutes)
    }
}
