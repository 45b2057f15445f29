use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Half-open intervals `[start, start + minutes)` overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_minutes: i32,
    b_start: DateTime<Utc>,
    b_minutes: i32,
) -> bool {
    let a_end = a_start + Duration::minutes(a_minutes as i64);
    let b_end = b_start + Duration::minutes(b_minutes as i64);
    a_start < b_end && b_start < a_end
}

/// UTC calendar-day window `[00:00, next 00:00)` containing `at`.
pub fn day_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 25, h, m, 0).unwrap()
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!intervals_overlap(at(10, 0), 30, at(10, 30), 30));
        assert!(!intervals_overlap(at(10, 30), 30, at(10, 0), 30));
    }

    #[test]
    fn partial_and_contained_overlaps() {
        assert!(intervals_overlap(at(10, 0), 30, at(10, 15), 30));
        assert!(intervals_overlap(at(9, 0), 240, at(10, 0), 15));
        assert!(intervals_overlap(at(10, 0), 15, at(9, 0), 240));
    }

    #[test]
    fn day_window_bounds() {
        let (start, end) = day_window(at(17, 45));
        assert_eq!(start, at(0, 0));
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 12, 26, 0, 0, 0).unwrap());
    }
}
