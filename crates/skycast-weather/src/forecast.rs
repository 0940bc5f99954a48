//! Collapse the 3-hour forecast feed into one summary per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{DailySummary, ForecastSample};

/// Maximum number of days presented
pub const FORECAST_DAYS: usize = 5;

/// Local hour the representative sample is chosen around
const TARGET_HOUR: u32 = 12;

/// Aggregate with the default [`FORECAST_DAYS`] limit.
pub fn daily_summaries(samples: &[ForecastSample]) -> Vec<DailySummary> {
    aggregate_daily(samples, FORECAST_DAYS)
}

/// Group samples by date and summarise each day, earliest first.
///
/// All samples are grouped before the limit is applied, so input order does
/// not affect which days are kept. Within a day the min/max come from the
/// per-sample `temp_min`/`temp_max` fields, and the icon and description
/// come from the sample closest to noon (first one wins on a tie).
pub fn aggregate_daily(samples: &[ForecastSample], limit: usize) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        by_date.entry(sample.date()).or_default().push(sample);
    }

    by_date
        .into_iter()
        .take(limit)
        .filter_map(|(date, day)| summarize_day(date, &day))
        .collect()
}

fn summarize_day(date: NaiveDate, day: &[&ForecastSample]) -> Option<DailySummary> {
    let representative = day
        .iter()
        .min_by_key(|s| s.hour().abs_diff(TARGET_HOUR))?;

    let low = day.iter().map(|s| s.temp_min).fold(f64::INFINITY, f64::min);
    let high = day.iter().map(|s| s.temp_max).fold(f64::NEG_INFINITY, f64::max);
    // A feed with min > max on every sample would otherwise invert the range
    let (temp_min, temp_max) = if low <= high { (low, high) } else { (high, low) };

    Some(DailySummary {
        date,
        temp_min,
        temp_max,
        icon: representative.icon.clone(),
        description: representative.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn sample(ts: &str, min: f64, max: f64, icon: &str) -> ForecastSample {
        ForecastSample {
            time: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature: (min + max) / 2.0,
            temp_min: min,
            temp_max: max,
            icon: icon.to_string(),
            description: format!("desc {}", icon),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_two_days_grouped_with_noon_representative() {
        let samples = vec![
            sample("2024-05-01 00:00:00", 10.0, 12.0, "01n"),
            sample("2024-05-01 06:00:00", 13.0, 16.0, "02d"),
            sample("2024-05-01 12:00:00", 18.0, 25.0, "03d"),
            sample("2024-05-01 18:00:00", 22.0, 23.0, "04d"),
            sample("2024-05-02 00:00:00", 9.0, 11.0, "09n"),
            sample("2024-05-02 06:00:00", 11.0, 14.0, "10d"),
            sample("2024-05-02 12:00:00", 15.0, 21.0, "11d"),
            sample("2024-05-02 18:00:00", 14.0, 17.0, "13d"),
        ];

        let days = daily_summaries(&samples);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2024-05-01"));
        assert_eq!(days[0].temp_min, 10.0);
        assert_eq!(days[0].temp_max, 25.0);
        assert_eq!(days[0].icon, "03d");
        assert_eq!(days[0].description, "desc 03d");
        assert_eq!(days[1].date, date("2024-05-02"));
        assert_eq!(days[1].temp_min, 9.0);
        assert_eq!(days[1].temp_max, 21.0);
        assert_eq!(days[1].icon, "11d");
    }

    #[test]
    fn test_empty_feed_yields_no_days() {
        assert!(daily_summaries(&[]).is_empty());
    }

    #[test]
    fn test_never_more_than_five_days() {
        let samples: Vec<_> = (1..=12)
            .map(|d| sample(&format!("2024-05-{:02} 12:00:00", d), 1.0, 2.0, "01d"))
            .collect();

        let days = daily_summaries(&samples);

        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].date, date("2024-05-01"));
        assert_eq!(days[4].date, date("2024-05-05"));
    }

    #[test]
    fn test_custom_limit() {
        let samples: Vec<_> = (1..=4)
            .map(|d| sample(&format!("2024-05-{:02} 12:00:00", d), 1.0, 2.0, "01d"))
            .collect();
        assert_eq!(aggregate_daily(&samples, 2).len(), 2);
        assert!(aggregate_daily(&samples, 0).is_empty());
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_date() {
        let samples = vec![
            sample("2024-05-03 12:00:00", 1.0, 2.0, "a"),
            sample("2024-05-01 12:00:00", 1.0, 2.0, "b"),
            sample("2024-05-02 12:00:00", 1.0, 2.0, "c"),
        ];

        let days = daily_summaries(&samples);
        let dates: Vec<_> = days.iter().map(|d| d.date).collect();

        assert_eq!(dates, vec![date("2024-05-01"), date("2024-05-02"), date("2024-05-03")]);
    }

    #[test]
    fn test_limit_applies_after_full_grouping() {
        // Later dates appear first in the feed; the earliest five must still win
        let mut samples: Vec<_> = (6..=8)
            .map(|d| sample(&format!("2024-05-{:02} 12:00:00", d), 1.0, 2.0, "late"))
            .collect();
        samples.extend(
            (1..=5).map(|d| sample(&format!("2024-05-{:02} 12:00:00", d), 1.0, 2.0, "early")),
        );

        let days = daily_summaries(&samples);

        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| d.icon == "early"));
    }

    #[test]
    fn test_tie_resolves_to_first_in_input_order() {
        // 09:00 and 15:00 are both three hours from noon
        let samples = vec![
            sample("2024-05-01 15:00:00", 1.0, 2.0, "afternoon"),
            sample("2024-05-01 09:00:00", 1.0, 2.0, "morning"),
            sample("2024-05-01 21:00:00", 1.0, 2.0, "night"),
        ];

        let days = daily_summaries(&samples);

        assert_eq!(days[0].icon, "afternoon");
    }

    #[test]
    fn test_partial_day_uses_closest_available_hour() {
        // Feed starting late in the day: only 18:00 and 21:00 exist
        let samples = vec![
            sample("2024-05-01 21:00:00", 5.0, 6.0, "21h"),
            sample("2024-05-01 18:00:00", 7.0, 9.0, "18h"),
        ];

        let days = daily_summaries(&samples);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "18h");
        assert_eq!(days[0].temp_min, 5.0);
        assert_eq!(days[0].temp_max, 9.0);
    }

    #[test]
    fn test_range_uses_min_max_fields_not_point_temperature() {
        let mut s = sample("2024-05-01 12:00:00", 10.0, 20.0, "01d");
        s.temperature = 50.0;

        let days = daily_summaries(&[s]);

        assert_eq!(days[0].temp_min, 10.0);
        assert_eq!(days[0].temp_max, 20.0);
    }

    #[test]
    fn test_min_never_exceeds_max() {
        let inverted = sample("2024-05-01 12:00:00", 20.0, 10.0, "01d");

        let days = daily_summaries(&[inverted]);

        assert!(days[0].temp_min <= days[0].temp_max);
    }
}
