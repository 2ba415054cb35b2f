use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Compute the next occurrence of `hour:minute` in `tz` strictly after
/// `after`.
///
/// "Strictly after" closes the boundary race: when `after` falls exactly on
/// hour:minute, the result is the next day's occurrence, never the current
/// instant.
///
/// A local time erased by a daylight-saving gap skips to the next day's
/// occurrence; an ambiguous local time (the fall-back overlap) resolves to
/// the earlier UTC mapping.
///
/// Returns `None` only for an hour/minute pair that is not a valid time of
/// day — stored preferences are validated at write time, so a `None` here
/// means the row is corrupt.
pub fn next_occurrence(
    hour: u8,
    minute: u8,
    tz: Tz,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    let start = after.with_timezone(&tz).date_naive();

    // A DST gap can erase at most one consecutive day's candidate, so three
    // days of lookahead always finds an occurrence.
    for offset in 0..3u64 {
        let date = start.checked_add_days(Days::new(offset))?;
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            let candidate = candidate.with_timezone(&Utc);
            if candidate > after {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use chrono_tz::{America::New_York, Europe::Moscow};

    fn utc(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn before_todays_time_schedules_today() {
        let after = utc(Moscow, 2025, 6, 10, 6, 0, 0);
        let next = next_occurrence(8, 0, Moscow, after).unwrap();
        assert_eq!(next, utc(Moscow, 2025, 6, 10, 8, 0, 0));
    }

    #[test]
    fn exactly_at_the_time_schedules_tomorrow() {
        // Strictly-after: now == hour:minute must never fire "now".
        let after = utc(Moscow, 2025, 6, 10, 8, 0, 0);
        let next = next_occurrence(8, 0, Moscow, after).unwrap();
        assert_eq!(next, utc(Moscow, 2025, 6, 11, 8, 0, 0));
    }

    #[test]
    fn one_second_past_schedules_tomorrow() {
        // 08:00 Europe/Moscow, observed at 08:00:01 local the same day.
        let after = utc(Moscow, 2025, 6, 10, 8, 0, 1);
        let next = next_occurrence(8, 0, Moscow, after).unwrap();
        assert_eq!(next, utc(Moscow, 2025, 6, 11, 8, 0, 0));
    }

    #[test]
    fn dst_gap_skips_to_next_day() {
        // US DST starts 2025-03-09 at 02:00; 02:30 does not exist that day.
        let after = utc(New_York, 2025, 3, 8, 3, 0, 0);
        let next = next_occurrence(2, 30, New_York, after).unwrap();
        assert_eq!(next, utc(New_York, 2025, 3, 10, 2, 30, 0));
    }

    #[test]
    fn successive_occurrences_are_24h_apart_on_the_local_clock() {
        // Across the 2025-11-02 fall-back the local clock stays at 08:00
        // while the UTC gap stretches to 25 hours.
        let after = utc(New_York, 2025, 10, 31, 9, 0, 0);
        let first = next_occurrence(8, 0, New_York, after).unwrap();
        let second = next_occurrence(8, 0, New_York, first).unwrap();

        let first_local = first.with_timezone(&New_York);
        let second_local = second.with_timezone(&New_York);
        assert_eq!((first_local.hour(), first_local.minute()), (8, 0));
        assert_eq!((second_local.hour(), second_local.minute()), (8, 0));
        assert_eq!(second_local.date_naive(), first_local.date_naive().succ_opt().unwrap());
        assert_eq!((second - first).num_hours(), 25);
    }

    #[test]
    fn spring_forward_shortens_the_utc_gap() {
        let after = utc(New_York, 2025, 3, 8, 7, 0, 0);
        let first = next_occurrence(8, 0, New_York, after).unwrap();
        let second = next_occurrence(8, 0, New_York, first).unwrap();
        assert_eq!((second - first).num_hours(), 23);
    }

    #[test]
    fn fall_back_overlap_resolves_to_earlier_mapping() {
        // 01:30 occurs twice on 2025-11-02 in New York; take the first.
        let after = utc(New_York, 2025, 11, 1, 12, 0, 0);
        let next = next_occurrence(1, 30, New_York, after).unwrap();
        let local = next.with_timezone(&New_York);
        assert_eq!(local.day(), 2);
        // The earlier mapping is still EDT (UTC-4): 01:30 EDT == 05:30 UTC.
        assert_eq!(next.hour(), 5);
    }

    #[test]
    fn invalid_time_of_day_yields_none() {
        let after = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        assert!(next_occurrence(24, 0, Moscow, after).is_none());
        assert!(next_occurrence(8, 60, Moscow, after).is_none());
    }
}
