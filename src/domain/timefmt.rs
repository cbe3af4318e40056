// src/domain/timefmt.rs

use chrono::NaiveDateTime;

/// Human "how long ago" label for ledger entries and comment footers.
/// Picks the coarsest unit that fits, so labels stay short.
pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = now - then;
    let days = delta.num_days();

    if days >= 365 {
        return plural(days / 365, "year");
    }
    if days >= 30 {
        return plural(days / 30, "month");
    }
    if days >= 7 {
        return plural(days / 7, "week");
    }
    if days >= 2 {
        return plural(days, "day");
    }
    if days == 1 {
        return "yesterday".to_string();
    }

    let hours = delta.num_hours();
    if hours >= 1 {
        return plural(hours, "hour");
    }

    let minutes = delta.num_minutes();
    if minutes >= 1 {
        return plural(minutes, "minute");
    }

    "moments ago".to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
