use itertools::Itertools;

/// Countdown displays treat anything at or above one day as "24 hours".
pub const COUNTDOWN_CAP_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Hours(i64),
    Minutes(i64),
    Seconds(i64),
}

/// A time span broken into the minimal units needed for display, largest
/// first. Sub-minute precision is dropped once the span reaches an hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDuration {
    pub units: Vec<DurationUnit>,
}

pub fn normalize(ms: f64) -> NormalizedDuration {
    let total_seconds = (ms.max(0.0) / 1000.0).round() as i64;

    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    let mut units = Vec::new();

    if hours > 0 {
        units.push(DurationUnit::Hours(hours));
    }
    if minutes > 0 {
        units.push(DurationUnit::Minutes(minutes));
    }
    if seconds > 0 && hours == 0 {
        units.push(DurationUnit::Seconds(seconds));
    }

    if units.is_empty() {
        units.push(DurationUnit::Seconds(0));
    }

    NormalizedDuration { units }
}

pub fn normalize_capped(ms: f64) -> NormalizedDuration {
    normalize(ms.min(COUNTDOWN_CAP_MS))
}

/// English fallback rendering, e.g. "3 hours and 14 minutes". Localized
/// deployments format the unit breakdown themselves.
pub fn english_units(duration: &NormalizedDuration) -> String {
    duration
        .units
        .iter()
        .map(|unit| match unit {
            DurationUnit::Hours(1) => "1 hour".to_owned(),
            DurationUnit::Hours(n) => format!("{} hours", n),
            DurationUnit::Minutes(1) => "1 minute".to_owned(),
            DurationUnit::Minutes(n) => format!("{} minutes", n),
            DurationUnit::Seconds(1) => "1 second".to_owned(),
            DurationUnit::Seconds(n) => format!("{} seconds", n),
        })
        .join(" and ")
}
