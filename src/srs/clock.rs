use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Local calendar date right now.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Instant of local midnight at the start of `date`.
///
/// When midnight falls in a DST gap, returns the first local instant that
/// exists on `date`.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(&Local, date)
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    if let Some(local) = tz.from_local_datetime(&naive).earliest() {
        return local.with_timezone(&Utc);
    }
    // 跳变不超过一天，按分钟向后找到当天第一个存在的时刻
    for minutes in 1..(24 * 60) {
        let candidate = naive + Duration::minutes(minutes);
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&naive)
}

/// `YYYY-MM-DD` form used as the session's day of validity.
pub fn day_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, LocalResult, NaiveDateTime};

    use super::*;

    #[test]
    fn midnight_is_start_of_local_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let m = midnight(date);
        let local = m.with_timezone(&Local);
        assert_eq!(local.date_naive(), date);
        assert_eq!(local.time(), NaiveTime::MIN);
    }

    /// Fixed-offset zone whose clocks jump from 00:00 to 01:00 on one day.
    #[derive(Clone)]
    struct MidnightGap {
        gap_day: NaiveDate,
    }

    impl TimeZone for MidnightGap {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            unreachable!("not used")
        }

        fn offset_from_local_date(&self, _: &NaiveDate) -> LocalResult<FixedOffset> {
            LocalResult::Single(self.after())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap_start = self.gap_day.and_time(NaiveTime::MIN);
            let gap_end = gap_start + Duration::hours(1);
            if *local < gap_start {
                LocalResult::Single(self.before())
            } else if *local < gap_end {
                LocalResult::None
            } else {
                LocalResult::Single(self.after())
            }
        }

        fn offset_from_utc_date(&self, _: &NaiveDate) -> FixedOffset {
            self.after()
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            // 切换时刻：当地 00:00（UTC-3）即 UTC 03:00
            if *utc < self.gap_day.and_hms_opt(3, 0, 0).unwrap() {
                self.before()
            } else {
                self.after()
            }
        }
    }

    impl MidnightGap {
        fn before(&self) -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn after(&self) -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }
    }

    #[test]
    fn midnight_in_dst_gap_is_first_instant_of_that_day() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 6).unwrap();
        let tz = MidnightGap { gap_day: day };
        let start = start_of_day(&tz, day);

        let local = start.with_timezone(&tz);
        assert_eq!(local.date_naive(), day);
        assert_eq!(local.time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 10, 6, 3, 0, 0).unwrap());
    }

    #[test]
    fn day_string_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(day_string(date), "2025-12-01");
        assert_eq!(parse_day("2025-12-01"), Some(date));
        assert_eq!(parse_day("12/01/2025"), None);
    }
}
