//! Derived-Metric Calculator
//!
//! Pure functions over the completed [`AggregateState`]: peaks, streaks,
//! averages, percentages and bar ratios. Everything here is deterministic;
//! identical input always yields identical output, and every tie-break is
//! explicit (lexicographic date, lowest starting hour, canonical weekday
//! order).

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Fixed width all bar-chart ratios are scaled against.
pub const BAR_WIDTH: u64 = 20;

/// Size of the peak-hours window.
const PEAK_WINDOW_HOURS: usize = 3;

/// Canonical weekday order, matching the Monday-first bucket layout.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Integer percentage of `value` against `total`; 0 when the total is 0.
pub fn percentage(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((value as f64 / total as f64) * 100.0).round() as u64
}

/// Bar length for one value of a distribution, scaled to [`BAR_WIDTH`].
/// A zero maximum renders every bar empty.
pub fn bar_length(value: u64, max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as u64
}

/// Date with the highest message count. Ties resolve to the
/// lexicographically earliest date, which the BTreeMap iteration order
/// provides for free.
pub fn busiest_day(daily_messages: &BTreeMap<String, u64>) -> Option<(&str, u64)> {
    let mut best: Option<(&str, u64)> = None;
    for (date, &count) in daily_messages {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((date, count));
        }
    }
    best
}

/// Contiguous wrapping window of [`PEAK_WINDOW_HOURS`] hours with the
/// highest summed count. Ties resolve to the lowest starting hour.
pub fn peak_hours(hourly: &[u64; 24]) -> (u8, u64) {
    let mut best_start = 0u8;
    let mut best_sum = 0u64;
    for start in 0..24usize {
        let sum: u64 = (0..PEAK_WINDOW_HOURS).map(|i| hourly[(start + i) % 24]).sum();
        if sum > best_sum {
            best_sum = sum;
            best_start = start as u8;
        }
    }
    (best_start, best_sum)
}

/// Hour the peak window closes at, wrapping past midnight.
pub fn peak_window_end(start: u8) -> u8 {
    ((start as usize + PEAK_WINDOW_HOURS) % 24) as u8
}

/// Weekday (Monday-first index) with the highest prompt count. Ties resolve
/// to canonical weekday order.
pub fn power_day(weekday_prompts: &[u64; 7]) -> (usize, u64) {
    let mut best_index = 0;
    let mut best_count = weekday_prompts[0];
    for (index, &count) in weekday_prompts.iter().enumerate().skip(1) {
        if count > best_count {
            best_count = count;
            best_index = index;
        }
    }
    (best_index, best_count)
}

/// Prompts divided by distinct active days, to one decimal place. Days with
/// zero activity are not part of the denominator.
pub fn average_per_day(total: u64, active_days: u64) -> f64 {
    if active_days == 0 {
        return 0.0;
    }
    let avg = total as f64 / active_days as f64;
    (avg * 10.0).round() / 10.0
}

/// Milliseconds to hours, to one decimal place.
pub fn duration_hours(millis: u64) -> f64 {
    (millis as f64 / 3_600_000.0 * 10.0).round() / 10.0
}

/// Whole days covered by the observed period, inclusive of both ends.
pub fn period_days(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> u64 {
    let span = latest.date_naive() - earliest.date_naive();
    (span.num_days() + 1) as u64
}

/// Longest run of consecutive active dates.
pub fn longest_streak(daily_messages: &BTreeMap<String, u64>) -> u64 {
    let mut longest = 0u64;
    let mut current = 0u64;
    let mut previous: Option<NaiveDate> = None;

    for date_str in daily_messages.keys() {
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            continue;
        };
        current = match previous {
            Some(prev) if (date - prev).num_days() == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(d, c)| (d.to_string(), *c))
            .collect()
    }

    #[test]
    fn test_percentage_rounding_and_zero_total() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn test_bar_length_zero_max() {
        assert_eq!(bar_length(0, 0), 0);
        assert_eq!(bar_length(10, 10), BAR_WIDTH);
        assert_eq!(bar_length(5, 10), BAR_WIDTH / 2);
    }

    #[test]
    fn test_busiest_day_tie_breaks_to_earliest() {
        let days = daily(&[("2024-05-02", 9), ("2024-05-01", 9), ("2024-04-30", 3)]);
        assert_eq!(busiest_day(&days), Some(("2024-05-01", 9)));
    }

    #[test]
    fn test_busiest_day_empty() {
        assert_eq!(busiest_day(&BTreeMap::new()), None);
    }

    #[test]
    fn test_peak_hours_wraps_midnight() {
        let mut hourly = [0u64; 24];
        hourly[21] = 1;
        hourly[22] = 1;
        hourly[23] = 1;
        hourly[9] = 1;
        let (start, sum) = peak_hours(&hourly);
        assert_eq!(start, 21);
        assert_eq!(sum, 3);
        assert_eq!(peak_window_end(start), 0);
    }

    #[test]
    fn test_peak_hours_tie_breaks_to_lowest_start() {
        let mut hourly = [0u64; 24];
        hourly[2] = 2;
        hourly[10] = 2;
        let (start, sum) = peak_hours(&hourly);
        assert_eq!(start, 0); // window 0-2 reaches the count at hour 2 first
        assert_eq!(sum, 2);
    }

    #[test]
    fn test_power_day_tie_breaks_to_canonical_order() {
        let weekday = [4, 1, 4, 0, 0, 0, 0];
        let (index, count) = power_day(&weekday);
        assert_eq!(index, 0); // Monday beats Wednesday on a tie
        assert_eq!(count, 4);
        assert_eq!(WEEKDAY_NAMES[index], "Monday");
    }

    #[test]
    fn test_average_per_day() {
        assert_eq!(average_per_day(4, 2), 2.0);
        assert_eq!(average_per_day(7, 3), 2.3);
        assert_eq!(average_per_day(10, 0), 0.0);
    }

    #[test]
    fn test_duration_hours_rounding() {
        assert_eq!(duration_hours(5_400_000), 1.5);
        assert_eq!(duration_hours(3_790_000), 1.1);
        assert_eq!(duration_hours(0), 0.0);
    }

    #[test]
    fn test_period_days_inclusive() {
        let a = crate::timestamp::TimestampParser::parse("2024-01-01T23:00:00Z").unwrap();
        let b = crate::timestamp::TimestampParser::parse("2024-01-03T01:00:00Z").unwrap();
        assert_eq!(period_days(a, b), 3);
        assert_eq!(period_days(a, a), 1);
    }

    #[test]
    fn test_longest_streak() {
        let days = daily(&[
            ("2024-01-01", 1),
            ("2024-01-02", 1),
            ("2024-01-03", 1),
            ("2024-01-05", 1),
            ("2024-01-06", 1),
        ]);
        assert_eq!(longest_streak(&days), 3);
        assert_eq!(longest_streak(&BTreeMap::new()), 0);
    }
}
