//! Temporal bucketing for the life calendar.
//!
//! Everything in this module is pure date arithmetic over naive wall-clock
//! timestamps: classify a fixed-duration bucket (week/day/hour/minute/second)
//! against a reference "now", map week indices to date ranges, and parse the
//! user's birth date. The UI recomputes all of it from scratch on every clock
//! tick, so nothing here holds state.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Weeks shown per year row. The year grid deliberately uses a flat
/// 52-week year rather than calendar years, matching the linear
/// `weeks since birth` model.
pub const WEEKS_PER_YEAR: u32 = 52;

/// Life expectancy bounds accepted from user input, in years.
pub const MIN_LIFE_EXPECTANCY: u32 = 1;
pub const MAX_LIFE_EXPECTANCY: u32 = 120;

/// One 7-day week.
pub fn week() -> Duration {
    Duration::days(7)
}

/// One 24-hour day.
pub fn day() -> Duration {
    Duration::days(1)
}

pub fn hour() -> Duration {
    Duration::hours(1)
}

pub fn minute() -> Duration {
    Duration::minutes(1)
}

pub fn second() -> Duration {
    Duration::seconds(1)
}

/// Relationship of a time bucket to the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketClass {
    Past,
    Current,
    Future,
}

/// Classify a half-open bucket `[start, start + duration)` against `now`.
///
/// Returns the classification and, only for the current bucket, the elapsed
/// fraction in `[0, 1)`. The end boundary is exclusive: at exactly
/// `start + duration` the bucket is already past.
pub fn classify(
    bucket_start: NaiveDateTime,
    bucket_duration: Duration,
    now: NaiveDateTime,
) -> (BucketClass, Option<f64>) {
    debug_assert!(bucket_duration > Duration::zero());

    if now < bucket_start {
        return (BucketClass::Future, None);
    }
    if now >= bucket_start + bucket_duration {
        return (BucketClass::Past, None);
    }

    let elapsed = (now - bucket_start).num_milliseconds() as f64;
    let total = bucket_duration.num_milliseconds() as f64;
    (BucketClass::Current, Some(elapsed / total))
}

/// Zero-based index of the 7-day period containing `now`, counted from the
/// birth instant. Negative before birth.
pub fn week_index(birth: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let ms = (now - birth).num_milliseconds();
    ms.div_euclid(week().num_milliseconds())
}

/// Half-open date range `[birth + i*7d, birth + (i+1)*7d)` of week `i`.
/// The end of week `i` is exactly the start of week `i + 1`.
pub fn week_index_to_range(birth: NaiveDateTime, index: i64) -> (NaiveDateTime, NaiveDateTime) {
    let start = birth + week() * index as i32;
    (start, start + week())
}

/// Total number of week cells in the year grid.
pub fn total_weeks(life_expectancy: u32) -> i64 {
    i64::from(life_expectancy) * i64::from(WEEKS_PER_YEAR)
}

/// Parse a strict `YYYY-MM-DD` birth date into local midnight.
///
/// Rejects anything that is not exactly four digits, dash, two digits, dash,
/// two digits, and any component triple that does not survive a round-trip
/// through calendar normalization (e.g. `2023-02-30`). Invalid input yields
/// `None`; it is a representable state, never an error.
pub fn parse_birth_date(input: &str) -> Option<NaiveDateTime> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
    {
        return None;
    }

    let year: i32 = input[0..4].parse().ok()?;
    let month: u32 = input[5..7].parse().ok()?;
    let day: u32 = input[8..10].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // Round-trip guard against component rollover.
    if date.year() != year || date.month() != month || date.day() != day {
        return None;
    }
    date.and_hms_opt(0, 0, 0)
}

/// Projected death instant: birth plus `life_expectancy` calendar years.
/// A Feb 29 birth date in a non-leap target year lands on Mar 1.
pub fn death_date(birth: NaiveDateTime, life_expectancy: u32) -> NaiveDateTime {
    let target_year = birth.year() + life_expectancy as i32;
    let date = birth
        .date()
        .with_year(target_year)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(target_year, 3, 1).unwrap_or(birth.date()));
    NaiveDateTime::new(date, birth.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn classify_future_before_start() {
        let start = dt(2024, 6, 1, 14, 0, 0);
        let (class, progress) = classify(start, hour(), dt(2024, 6, 1, 13, 59, 59));
        assert_eq!(class, BucketClass::Future);
        assert_eq!(progress, None);
    }

    #[test]
    fn classify_past_at_and_after_end() {
        let start = dt(2024, 6, 1, 14, 0, 0);
        // End boundary is exclusive: exactly 15:00 is already past.
        let (class, progress) = classify(start, hour(), dt(2024, 6, 1, 15, 0, 0));
        assert_eq!(class, BucketClass::Past);
        assert_eq!(progress, None);

        let (class, _) = classify(start, hour(), dt(2024, 6, 2, 0, 0, 0));
        assert_eq!(class, BucketClass::Past);
    }

    #[test]
    fn classify_current_with_half_progress() {
        // Hour bucket [14:00, 15:00), now = 14:30 -> progress 0.5.
        let start = dt(2024, 6, 1, 14, 0, 0);
        let (class, progress) = classify(start, hour(), dt(2024, 6, 1, 14, 30, 0));
        assert_eq!(class, BucketClass::Current);
        assert_eq!(progress, Some(0.5));
    }

    #[test]
    fn classify_current_at_exact_start() {
        let start = dt(2024, 6, 1, 14, 0, 0);
        let (class, progress) = classify(start, hour(), start);
        assert_eq!(class, BucketClass::Current);
        assert_eq!(progress, Some(0.0));
    }

    #[test]
    fn classify_progress_stays_below_one() {
        let start = dt(2024, 6, 1, 14, 0, 0);
        let (class, progress) = classify(start, minute(), start + Duration::milliseconds(59_999));
        assert_eq!(class, BucketClass::Current);
        let p = progress.unwrap();
        assert!((0.0..1.0).contains(&p));
    }

    #[test]
    fn classify_is_pure() {
        let start = dt(2024, 6, 1, 0, 0, 0);
        let now = dt(2024, 6, 4, 12, 0, 0);
        assert_eq!(classify(start, week(), now), classify(start, week(), now));
    }

    #[test]
    fn week_ranges_tile_without_gaps() {
        let birth = dt(2003, 8, 15, 0, 0, 0);
        for i in 0..200 {
            let (_, end) = week_index_to_range(birth, i);
            let (next_start, _) = week_index_to_range(birth, i + 1);
            assert_eq!(end, next_start, "week {i} end must equal week {} start", i + 1);
        }
    }

    #[test]
    fn week_range_is_seven_days() {
        let birth = dt(2003, 8, 15, 0, 0, 0);
        let (start, end) = week_index_to_range(birth, 42);
        assert_eq!(end - start, week());
        assert_eq!(start, birth + Duration::days(42 * 7));
    }

    #[test]
    fn week_index_of_birth_instant_is_zero() {
        let birth = dt(2003, 8, 15, 0, 0, 0);
        assert_eq!(week_index(birth, birth), 0);
        assert_eq!(week_index(birth, birth + Duration::days(6)), 0);
        assert_eq!(week_index(birth, birth + Duration::days(7)), 1);
    }

    #[test]
    fn week_index_before_birth_is_negative() {
        let birth = dt(2003, 8, 15, 0, 0, 0);
        assert_eq!(week_index(birth, birth - Duration::seconds(1)), -1);
    }

    #[test]
    fn parse_accepts_valid_date_at_midnight() {
        let parsed = parse_birth_date("2003-08-15").unwrap();
        assert_eq!(parsed, dt(2003, 8, 15, 0, 0, 0));
    }

    #[test]
    fn parse_rejects_nonexistent_calendar_date() {
        assert_eq!(parse_birth_date("2023-02-30"), None);
        assert_eq!(parse_birth_date("2023-13-01"), None);
        assert_eq!(parse_birth_date("2023-04-31"), None);
    }

    #[test]
    fn parse_accepts_leap_day_only_in_leap_years() {
        assert!(parse_birth_date("2024-02-29").is_some());
        assert_eq!(parse_birth_date("2023-02-29"), None);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for s in ["", "2003-8-15", "15-08-2003", "2003/08/15", "2003-08-15 ", "20030815", "abcd-ef-gh"] {
            assert_eq!(parse_birth_date(s), None, "should reject {s:?}");
        }
    }

    #[test]
    fn twenty_year_scenario_matches_reference_computation() {
        // birth 2003-08-15, now 2023-08-15T00:00 local, expectancy 100.
        let birth = dt(2003, 8, 15, 0, 0, 0);
        let now = dt(2023, 8, 15, 0, 0, 0);

        let ms_in_week = 7 * 24 * 60 * 60 * 1000i64;
        let expected = (now - birth).num_milliseconds() / ms_in_week;
        let passed = week_index(birth, now);
        assert_eq!(passed, expected);

        let total = total_weeks(100);
        assert_eq!(total, 5200);

        // The containing week is current; everything below is past and
        // everything above (within the lifespan) is future.
        let (start, _) = week_index_to_range(birth, passed);
        assert_eq!(classify(start, week(), now).0, BucketClass::Current);

        for i in [0, passed / 2, passed - 1] {
            let (s, _) = week_index_to_range(birth, i);
            assert_eq!(classify(s, week(), now).0, BucketClass::Past, "week {i}");
        }
        for i in [passed + 1, passed + 100, total - 1] {
            let (s, _) = week_index_to_range(birth, i);
            assert_eq!(classify(s, week(), now).0, BucketClass::Future, "week {i}");
        }
    }

    #[test]
    fn death_date_adds_calendar_years() {
        let birth = dt(2003, 8, 15, 0, 0, 0);
        assert_eq!(death_date(birth, 100), dt(2103, 8, 15, 0, 0, 0));
    }

    #[test]
    fn death_date_handles_leap_day_birth() {
        let birth = dt(2024, 2, 29, 0, 0, 0);
        assert_eq!(death_date(birth, 1), dt(2025, 3, 1, 0, 0, 0));
        assert_eq!(death_date(birth, 4), dt(2028, 2, 29, 0, 0, 0));
    }
}
