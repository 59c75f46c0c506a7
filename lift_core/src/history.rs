//! Completed-workout history grouped by calendar period.
//!
//! Periods are exclusive and checked from the narrowest: a workout from
//! this ISO week is listed under "this week" only, not again under month
//! or year. Dates are compared in the offset of `now`.

use crate::Workout;
use chrono::{DateTime, Datelike, FixedOffset};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    ThisWeek,
    ThisMonth,
    ThisYear,
    Older,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::ThisWeek,
        Period::ThisMonth,
        Period::ThisYear,
        Period::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Period::ThisWeek => "This Week",
            Period::ThisMonth => "This Month",
            Period::ThisYear => "This Year",
            Period::Older => "Older",
        }
    }

    /// Which period `date` falls into, seen from `now`
    pub fn of(date: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Period {
        let date = date.with_timezone(now.offset()).date_naive();
        let today = now.date_naive();

        if date.iso_week() == today.iso_week() {
            Period::ThisWeek
        } else if date.year() == today.year() && date.month() == today.month() {
            Period::ThisMonth
        } else if date.year() == today.year() {
            Period::ThisYear
        } else {
            Period::Older
        }
    }
}

/// Completed workouts bucketed by period, newest first within each
#[derive(Clone, Debug, Default)]
pub struct PastWorkouts<'a> {
    pub this_week: Vec<&'a Workout>,
    pub this_month: Vec<&'a Workout>,
    pub this_year: Vec<&'a Workout>,
    pub older: Vec<&'a Workout>,
}

impl<'a> PastWorkouts<'a> {
    pub fn get(&self, period: Period) -> &[&'a Workout] {
        match period {
            Period::ThisWeek => &self.this_week,
            Period::ThisMonth => &self.this_month,
            Period::ThisYear => &self.this_year,
            Period::Older => &self.older,
        }
    }

    pub fn len(&self) -> usize {
        Period::ALL.iter().map(|p| self.get(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group completed workouts relative to `now`
///
/// Entries without a completion date are skipped.
pub fn group_completed<'a>(workouts: &'a [Workout], now: DateTime<FixedOffset>) -> PastWorkouts<'a> {
    let mut sorted: Vec<&Workout> = workouts
        .iter()
        .filter(|w| w.completion_date.is_some())
        .collect();
    sorted.sort_by(|a, b| b.completion_date.cmp(&a.completion_date));

    let mut past = PastWorkouts::default();
    for workout in sorted {
        let Some(completed_at) = workout.completion_date else {
            continue;
        };
        let bucket = match Period::of(completed_at.fixed_offset(), now) {
            Period::ThisWeek => &mut past.this_week,
            Period::ThisMonth => &mut past.this_month,
            Period::ThisYear => &mut past.this_year,
            Period::Older => &mut past.older,
        };
        bucket.push(workout);
    }
    past
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn completed(name: &str, when: &str) -> Workout {
        Workout::new(name, vec![]).completed_copy(at(when).with_timezone(&Utc))
    }

    #[test]
    fn test_periods_are_exclusive() {
        // Wednesday, 2024-06-12
        let now = at("2024-06-12T12:00:00Z");
        let workouts = vec![
            completed("monday", "2024-06-10T08:00:00Z"),
            completed("last week", "2024-06-05T08:00:00Z"),
            completed("march", "2024-03-01T08:00:00Z"),
            completed("last year", "2023-12-20T08:00:00Z"),
        ];

        let past = group_completed(&workouts, now);
        assert_eq!(past.this_week.len(), 1);
        assert_eq!(past.this_week[0].name, "monday");
        assert_eq!(past.this_month[0].name, "last week");
        assert_eq!(past.this_year[0].name, "march");
        assert_eq!(past.older[0].name, "last year");
        assert_eq!(past.len(), 4);
    }

    #[test]
    fn test_week_spanning_new_year() {
        // 2024-12-30 is in ISO week 1 of 2025
        let now = at("2025-01-02T09:00:00Z");
        assert_eq!(Period::of(at("2024-12-30T18:00:00Z"), now), Period::ThisWeek);
        assert_eq!(Period::of(at("2024-12-27T18:00:00Z"), now), Period::Older);
    }

    #[test]
    fn test_dates_compared_in_local_offset() {
        // Sunday 23:30 local is still last week even though it is Monday in UTC
        let now = at("2024-06-12T12:00:00-05:00");
        let sunday_night = at("2024-06-09T23:30:00-05:00");
        assert_eq!(Period::of(sunday_night, now), Period::ThisMonth);
    }

    #[test]
    fn test_newest_first_and_templates_skipped() {
        let now = at("2024-06-12T12:00:00Z");
        let workouts = vec![
            completed("older session", "2024-06-10T08:00:00Z"),
            Workout::new("template", vec![]),
            completed("newer session", "2024-06-11T08:00:00Z"),
        ];

        let past = group_completed(&workouts, now);
        let names: Vec<_> = past.this_week.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["newer session", "older session"]);
        assert!(group_completed(&[], now).is_empty());
    }
}
