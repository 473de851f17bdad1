//! Calendar-day arithmetic in the user's local offset.
//!
//! Timestamps are stored in UTC. Everything that reasons about "today",
//! weekdays or the hour of day goes through a [`DayClock`] so the answer does
//! not depend on the host's locale or time zone settings.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, Months, NaiveDate, NaiveTime, Offset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Sunday=1 .. Saturday=7.
pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.number_from_sunday() as u8
}

/// Reporting window used by the habit and mood reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportRange {
    Week,
    Month,
    Year,
}

/// Converts UTC instants into calendar days at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    offset: FixedOffset,
}

impl DayClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Offset of the host's local time zone right now.
    pub fn system() -> Self {
        Self::new(Local::now().offset().fix())
    }

    /// Offset given in minutes east of UTC. Out-of-range values fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .unwrap_or_else(Self::utc)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn time_of(&self, at: DateTime<Utc>) -> NaiveTime {
        at.with_timezone(&self.offset).time()
    }

    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Weekday number of the local day containing `at`.
    pub fn weekday_of(&self, at: DateTime<Utc>) -> u8 {
        weekday_number(self.day_of(at).weekday())
    }

    pub fn same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }

    /// UTC instant of local midnight starting `day`.
    pub fn start_of(&self, day: NaiveDate) -> DateTime<Utc> {
        let local = day.and_time(NaiveTime::MIN);
        (local - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }

    /// First calendar day included in `range`, counted back from the day of `now`.
    pub fn range_start(&self, range: ReportRange, now: DateTime<Utc>) -> NaiveDate {
        let today = self.day_of(now);
        match range {
            ReportRange::Week => today - Duration::days(7),
            ReportRange::Month => today.checked_sub_months(Months::new(1)).unwrap_or(today),
            ReportRange::Year => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        }
    }

    /// Instant `range` before `now`; used as an inclusive lower bound.
    pub fn range_cutoff(&self, range: ReportRange, now: DateTime<Utc>) -> DateTime<Utc> {
        match range {
            ReportRange::Week => now - Duration::days(7),
            ReportRange::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            ReportRange::Year => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        }
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn weekday_numbering_starts_on_sunday() {
        assert_eq!(weekday_number(Weekday::Sun), 1);
        assert_eq!(weekday_number(Weekday::Mon), 2);
        assert_eq!(weekday_number(Weekday::Sat), 7);
    }

    #[test]
    fn weekday_of_is_independent_of_host_zone() {
        // 2024-06-02 was a Sunday.
        let clock = DayClock::utc();
        let at = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        assert_eq!(clock.weekday_of(at), 1);
        let at = Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap();
        assert_eq!(clock.weekday_of(at), 7);
    }

    #[test]
    fn offset_moves_day_boundary() {
        let tokyo = DayClock::from_offset_minutes(9 * 60);
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        assert_eq!(tokyo.day_of(at), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(tokyo.hour_of(at), 5);
        assert_eq!(DayClock::utc().day_of(at), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn start_of_round_trips_through_day_of() {
        let clock = DayClock::from_offset_minutes(-5 * 60);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let start = clock.start_of(day);
        assert_eq!(clock.day_of(start), day);
        assert_eq!(clock.hour_of(start), 0);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 5, 0, 0).unwrap());
    }

    #[test]
    fn range_start_counts_back_from_today() {
        let clock = DayClock::utc();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap();
        assert_eq!(
            clock.range_start(ReportRange::Week, now),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
        );
        assert_eq!(
            clock.range_start(ReportRange::Month, now),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            clock.range_start(ReportRange::Year, now),
            NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()
        );
    }

    #[test]
    fn range_cutoff_keeps_time_of_day() {
        let clock = DayClock::utc();
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 10, 30, 0).unwrap();
        assert_eq!(
            clock.range_cutoff(ReportRange::Week, now),
            Utc.with_ymd_and_hms(2024, 3, 24, 10, 30, 0).unwrap()
        );
        assert_eq!(
            clock.range_cutoff(ReportRange::Month, now),
            Utc.with_ymd_and_hms(2024, 2, 29, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn invalid_offset_falls_back_to_utc() {
        assert_eq!(DayClock::from_offset_minutes(100 * 60), DayClock::utc());
        assert_eq!(DayClock::from_offset_minutes(100_000_000), DayClock::utc());
        assert_eq!(DayClock::from_offset_minutes(i32::MIN), DayClock::utc());
    }
}
