//! Plain-text availability and weather reports.

use chrono::{DateTime, Utc};
use fishwatch_common::{EarthInstant, EorzeaInstant, FishId, TimeRange, ZoneId};
use fishwatch_core::{AvailabilityEngine, Fish};

/// Formats an Earth instant as a UTC timestamp.
pub fn format_earth(instant: EarthInstant) -> String {
    match DateTime::<Utc>::from_timestamp_millis(instant.as_millis()) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} ms", instant.as_millis()),
    }
}

/// Formats the Earth time between two Eorzea instants, e.g. `1h 05m`.
pub fn format_wait(from: EorzeaInstant, to: EorzeaInstant) -> String {
    let millis = to.to_earth().as_millis() - from.to_earth().as_millis();
    let wait = chrono::Duration::milliseconds(millis.max(0));
    let hours = wait.num_hours();
    let minutes = wait.num_minutes() % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {:02}s", wait.num_seconds() % 60)
    }
}

/// One window, in both clocks.
pub fn format_window(range: TimeRange, now: EorzeaInstant) -> String {
    let earth = format_earth(range.start.to_earth());
    if range.contains(now) {
        format!("{range} (now, {} left)", format_wait(now, range.end))
    } else {
        format!("{range} ({earth}, in {})", format_wait(now, range.start))
    }
}

/// Status of one fish and its next windows.
pub fn fish_report(
    engine: &AvailabilityEngine,
    fish: &Fish,
    now: EorzeaInstant,
    windows: usize,
) -> String {
    let mut out = format!("{} {}", fish.id, fish.name);
    if let Some(zone) = engine.catalog().zone_name(fish.zone) {
        out.push_str(&format!(" [{zone}]"));
    }

    if engine.is_always_available(fish.id) {
        out.push_str(": always available");
        return out;
    }

    let ranges = engine.catchable_ranges(fish.id);
    if ranges.is_empty() {
        out.push_str(": no windows found");
        return out;
    }
    let status = if engine.is_catchable(fish.id, now) { "up" } else { "waiting" };
    out.push_str(&format!(": {status}, uptime {:.1}%", engine.uptime(fish.id) * 100.0));
    for range in ranges.iter().take(windows) {
        out.push_str("\n  ");
        out.push_str(&format_window(*range, now));
    }
    out
}

/// Report for every fish, or for the fish listed in `only`.
pub fn catalog_report(
    engine: &AvailabilityEngine,
    now: EorzeaInstant,
    windows: usize,
    only: Option<FishId>,
) -> String {
    let mut out = format!(
        "Eorzea time {now} ({})\n",
        format_earth(now.to_earth())
    );
    for fish in engine.catalog().iter() {
        if only.is_some_and(|id| id != fish.id) {
            continue;
        }
        out.push_str(&fish_report(engine, fish, now, windows));
        out.push('\n');
    }
    out
}

/// Weather for the next `count` periods in a zone.
pub fn zone_weather_report(
    engine: &mut AvailabilityEngine,
    zone: ZoneId,
    now: EorzeaInstant,
    count: usize,
) -> anyhow::Result<String> {
    let name = engine.catalog().zone_name(zone).unwrap_or("unnamed").to_string();
    let upcoming = engine.weather_mut().upcoming_weather(zone, now, count)?;

    let mut out = format!("Weather in {zone} ({name})\n");
    for (period, weather) in upcoming {
        out.push_str(&format!(
            "  {} {:<14} target {:>2}  {}\n",
            period.start,
            weather.display_name(),
            period.target,
            format_earth(period.start.to_earth())
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishwatch_core::{Catalog, SchedulerConfig};

    const CATALOG: &str = r#"{
        "zones": [{ "id": 1, "name": "Lake", "weather_rates": [[2, 100]] }],
        "fish": [
            { "id": 1, "name": "Minnow", "zone": 1 },
            { "id": 2, "name": "Dawn Bass", "zone": 1, "start_hour": 4, "end_hour": 6 }
        ]
    }"#;

    fn engine() -> AvailabilityEngine {
        AvailabilityEngine::new(Catalog::from_json_str(CATALOG).unwrap(), SchedulerConfig::default())
    }

    #[test]
    fn test_format_earth() {
        let instant = EarthInstant::from_unix_seconds(1_700_000_000);
        assert_eq!(format_earth(instant), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_format_wait() {
        // One bell is 175 Earth seconds.
        let from = EorzeaInstant::from_day_hour(10, 0);
        assert_eq!(format_wait(from, EorzeaInstant::from_day_hour(10, 1)), "2m 55s");
        assert_eq!(format_wait(from, EorzeaInstant::from_day_hour(11, 0)), "1h 10m");
        assert_eq!(format_wait(from, from), "0m 00s");
    }

    #[test]
    fn test_fish_report() {
        let mut engine = engine();
        let now = EorzeaInstant::from_day_hour(10, 5);
        engine.run_pass(now);
        let catalog = engine.catalog();

        let minnow = catalog.get(FishId::new(1)).unwrap();
        assert_eq!(fish_report(&engine, minnow, now, 2), "#1 Minnow [Lake]: always available");

        let bass = catalog.get(FishId::new(2)).unwrap();
        let report = fish_report(&engine, bass, now, 2);
        assert!(report.starts_with("#2 Dawn Bass [Lake]: up"));
        assert_eq!(report.lines().count(), 3);
        assert!(report.contains("(now, 2m 55s left)"));
    }

    #[test]
    fn test_catalog_report() {
        let mut engine = engine();
        let now = EorzeaInstant::from_day_hour(10, 5);
        engine.run_pass(now);

        let report = catalog_report(&engine, now, 2, None);
        assert!(report.starts_with("Eorzea time "));
        assert!(report.ends_with('\n'));
        assert_eq!(report.lines().count(), 5);
        assert_eq!(report.lines().nth(1), Some("#1 Minnow [Lake]: always available"));

        let report = catalog_report(&engine, now, 2, Some(FishId::new(1)));
        assert_eq!(report.lines().count(), 2);
        assert!(!report.contains("Dawn Bass"));
    }

    #[test]
    fn test_zone_weather_report() {
        let mut engine = engine();
        let now = EorzeaInstant::from_day_hour(10, 0);
        let report = zone_weather_report(&mut engine, ZoneId::new(1), now, 3).unwrap();
        assert_eq!(report.lines().count(), 4);
        assert!(report.starts_with("Weather in zone 1 (Lake)"));
        assert!(report.contains("Fair Skies"));
        assert!(report.lines().skip(1).all(|line| line.contains("target")));

        assert!(zone_weather_report(&mut engine, ZoneId::new(9), now, 3).is_err());
    }
}
