use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::DayCount;

/// Monday of the week containing `today` and the Monday after it.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(7))
}

/// UTC midnight of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Seven `yyyy-MM-dd` buckets starting at `monday`. Timestamps outside the
/// week are ignored.
pub fn bucket_by_day<I>(monday: NaiveDate, timestamps: I) -> Vec<DayCount>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut counts = [0i64; 7];
    for at in timestamps {
        let offset = (at.date_naive() - monday).num_days();
        if (0..7).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, count)| DayCount {
            date: (monday + Duration::days(i as i64)).format("%Y-%m-%d").to_string(),
            count: *count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-12-25 is a Wednesday
        assert_eq!(week_bounds(date(2024, 12, 25)), (date(2024, 12, 23), date(2024, 12, 30)));
        assert_eq!(week_bounds(date(2024, 12, 23)), (date(2024, 12, 23), date(2024, 12, 30)));
        assert_eq!(week_bounds(date(2024, 12, 29)), (date(2024, 12, 23), date(2024, 12, 30)));
    }

    #[test]
    fn empty_week_still_has_seven_days() {
        let days = bucket_by_day(date(2024, 12, 23), Vec::new());
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2024-12-23");
        assert_eq!(days[6].date, "2024-12-29");
        assert!(days.iter().all(|d| d.count == 0));
    }

    #[test]
    fn counts_by_calendar_date() {
        let stamps = vec![
            Utc.with_ymd_and_hms(2024, 12, 23, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 23, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 30, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 22, 23, 0, 0).unwrap(),
        ];

        let counts: Vec<i64> = bucket_by_day(date(2024, 12, 23), stamps).iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![2, 0, 1, 0, 0, 0, 0]);
    }
}
