use chrono::{Datelike, NaiveDate};

/// Approximate league week for a game date. September–December map onto
/// regular-season weeks 1–17, January onto playoff weeks 18–22; anything else
/// is treated as week 1.
pub fn estimate_week(date: NaiveDate) -> u32 {
    let month = date.month();
    let day = date.day();
    match month {
        9..=12 => ((month - 9) * 4 + day / 7).clamp(1, 17),
        1 => (18 + day / 7).min(22),
        _ => 1,
    }
}

/// Winter months for temperature modelling.
pub fn is_winter(date: NaiveDate) -> bool {
    matches!(date.month(), 11 | 12 | 1 | 2)
}
