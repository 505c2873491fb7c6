//! Alignment of observed case counts against a growth model.
//!
//! Steps:
//! 1. daily active counts (`positive - recovered - dead`) and their running sum
//! 2. left-truncation at the first day the running sum reaches the onset threshold
//! 3. modeled values over `1..=horizon`
//! 4. forecast dates appended after the last observation until both axes match

use chrono::{Days, NaiveDate};

use crate::domain::{AlignedSeries, CountryConfig, RawRecord, next_day};
use crate::error::CurveError;

/// Running sum of daily active counts, in record order.
pub fn cumulative_active(records: &[RawRecord]) -> Result<Vec<i64>, CurveError> {
    let mut total = 0i64;
    records
        .iter()
        .enumerate()
        .map(|(index, r)| -> Result<i64, CurveError> {
            total = r
                .active()
                .and_then(|active| total.checked_add(active))
                .ok_or(CurveError::CountOverflow { index })?;
            Ok(total)
        })
        .collect()
}

/// Index of the first element `>= threshold`.
///
/// Everything from that index onward is kept, even if the sum dips back below
/// the threshold later.
pub fn onset_index(cumulative: &[i64], threshold: i64) -> Option<usize> {
    cumulative.iter().position(|&v| v >= threshold)
}

/// `count` consecutive calendar days starting the day after `last`.
pub fn forecast_dates(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut date = last;
    for _ in 0..count {
        date = next_day(date);
        out.push(date);
    }
    out
}

/// Build the aligned observed/modeled series for one country.
///
/// Records must cover consecutive calendar days in increasing order. Errors
/// are returned unchanged to the caller; nothing partial is produced.
pub fn align_series(config: &CountryConfig, records: &[RawRecord]) -> Result<AlignedSeries, CurveError> {
    if records.is_empty() {
        return Err(CurveError::NoData);
    }
    ensure_daily(records)?;

    let cumulative = cumulative_active(records)?;
    let start = onset_index(&cumulative, config.onset_threshold).ok_or_else(|| {
        CurveError::ThresholdNeverReached {
            threshold: config.onset_threshold,
            max_cumulative: cumulative.iter().copied().max().unwrap_or(0),
        }
    })?;

    let observed: Vec<f64> = cumulative[start..].iter().map(|&v| v as f64).collect();
    let mut date_index: Vec<NaiveDate> = records[start..].iter().map(|r| r.date).collect();

    let horizon = config.model.horizon();
    if observed.len() > horizon as usize {
        return Err(CurveError::ModelHorizonTooShort {
            horizon,
            observed: observed.len(),
        });
    }

    let mut day_index: Vec<u32> = (1..=horizon).collect();

    if day_index.len() > date_index.len() {
        // `date_index` is non-empty: `start` indexes into `records`.
        let last = date_index[date_index.len() - 1];
        let missing = day_index.len() - date_index.len();
        if last.checked_add_days(Days::new(missing as u64)).is_none() {
            return Err(CurveError::DateOutOfRange { last, days: missing });
        }
        date_index.extend(forecast_dates(last, missing));
    }
    day_index.truncate(date_index.len());

    let modeled = config.model.evaluate_many(&day_index)?;

    Ok(AlignedSeries {
        country: config.name.clone(),
        model: config.model,
        onset_threshold: config.onset_threshold,
        day_index,
        date_index,
        observed,
        modeled,
    })
}

/// Day N of the aligned axis must be N-1 days after onset, so every calendar
/// day has to be present exactly once.
fn ensure_daily(records: &[RawRecord]) -> Result<(), CurveError> {
    for (i, pair) in records.windows(2).enumerate() {
        let (previous, current) = (pair[0].date, pair[1].date);
        if current <= previous {
            return Err(CurveError::UnsortedInput {
                index: i + 1,
                previous,
                current,
            });
        }
        if previous.succ_opt() != Some(current) {
            return Err(CurveError::MissingDays {
                index: i + 1,
                previous,
                current,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrowthModel;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Records whose cumulative active count follows `cumulative`, starting at `first`.
    fn records_from_cumulative(first: NaiveDate, cumulative: &[i64]) -> Vec<RawRecord> {
        let mut prev = 0;
        let mut date = first;
        let mut out = Vec::new();
        for &c in cumulative {
            out.push(RawRecord {
                date,
                positive: c - prev,
                recovered: 0,
                dead: 0,
            });
            prev = c;
            date = next_day(date);
        }
        out
    }

    fn power_law_config(threshold: i64, horizon: u32) -> CountryConfig {
        CountryConfig::new("Testland", GrowthModel::power_law(8.0, 1.28, horizon).unwrap(), threshold)
    }

    #[test]
    fn truncation_keeps_first_crossing_onward() {
        let records = records_from_cumulative(d(2020, 3, 1), &[3, 5, 9, 12, 20]);
        let aligned = align_series(&power_law_config(10, 10), &records).unwrap();

        assert_eq!(aligned.observed(), &[12.0, 20.0]);
        assert_eq!(aligned.date_index()[0], d(2020, 3, 4));
        assert_eq!(aligned.date_index()[1], d(2020, 3, 5));
        assert_eq!(aligned.day_index()[0], 1);
    }

    #[test]
    fn truncation_keeps_later_dips_below_threshold() {
        let records = records_from_cumulative(d(2020, 3, 1), &[5, 15, 8, 30]);
        let aligned = align_series(&power_law_config(10, 10), &records).unwrap();
        assert_eq!(aligned.observed(), &[15.0, 8.0, 30.0]);
    }

    #[test]
    fn active_counts_subtract_recovered_and_dead() {
        let records = vec![
            RawRecord { date: d(2020, 3, 1), positive: 10, recovered: 2, dead: 1 },
            RawRecord { date: d(2020, 3, 2), positive: 20, recovered: 5, dead: 0 },
        ];
        assert_eq!(cumulative_active(&records), Ok(vec![7, 22]));
    }

    #[test]
    fn cumulative_overflow_is_an_error() {
        let big = i64::MAX / 2 + 10;
        let records = vec![
            RawRecord { date: d(2020, 3, 1), positive: big, recovered: 0, dead: 0 },
            RawRecord { date: d(2020, 3, 2), positive: big, recovered: 0, dead: 0 },
        ];
        assert_eq!(cumulative_active(&records), Err(CurveError::CountOverflow { index: 1 }));
        assert_eq!(
            align_series(&power_law_config(10, 10), &records),
            Err(CurveError::CountOverflow { index: 1 })
        );
    }

    #[test]
    fn skipped_days_are_rejected() {
        let mut records = records_from_cumulative(d(2020, 3, 1), &[10, 20]);
        records[1].date = d(2020, 3, 3);
        assert_eq!(
            align_series(&power_law_config(10, 10), &records),
            Err(CurveError::MissingDays {
                index: 1,
                previous: d(2020, 3, 1),
                current: d(2020, 3, 3),
            })
        );
    }

    #[test]
    fn forecast_past_calendar_end_is_an_error() {
        let last = NaiveDate::MAX;
        let records = vec![RawRecord { date: last, positive: 50, recovered: 0, dead: 0 }];
        assert_eq!(
            align_series(&power_law_config(10, 5), &records),
            Err(CurveError::DateOutOfRange { last, days: 4 })
        );
    }

    #[test]
    fn forecast_dates_extend_consecutively() {
        let records = records_from_cumulative(d(2020, 3, 11), &[10, 11, 12, 13, 14]);
        let aligned = align_series(&power_law_config(10, 10), &records).unwrap();

        assert_eq!(aligned.last_observed_date(), d(2020, 3, 15));
        let expected: Vec<NaiveDate> = (16..=20).map(|day| d(2020, 3, day)).collect();
        assert_eq!(aligned.forecast_dates(), expected.as_slice());
        assert_eq!(aligned.date_index().len(), 10);
        for pair in aligned.date_index()[4..].windows(2) {
            assert_eq!(pair[1], next_day(pair[0]));
        }
    }

    #[test]
    fn axes_have_equal_length() {
        let records = records_from_cumulative(d(2020, 2, 20), &[250, 400, 700, 900, 1500, 2600]);
        let config = CountryConfig::new("Italy", GrowthModel::richards_like(7.8, 4417.0).unwrap(), 200);
        let aligned = align_series(&config, &records).unwrap();

        assert_eq!(aligned.day_index().len(), 69);
        assert_eq!(aligned.date_index().len(), aligned.day_index().len());
        assert_eq!(aligned.modeled().len(), aligned.day_index().len());
        assert_eq!(aligned.day_index()[68], 69);
        assert!((aligned.modeled()[0] - config.model.evaluate(1.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn alignment_is_deterministic() {
        let records = records_from_cumulative(d(2020, 3, 1), &[100, 210, 330, 480]);
        let config = CountryConfig::new("Spain", GrowthModel::richards_like(6.4, 3665.0).unwrap(), 200);
        let a = align_series(&config, &records).unwrap();
        let b = align_series(&config, &records).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.modeled().iter().zip(b.modeled()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn threshold_never_reached_is_an_error() {
        let records = records_from_cumulative(d(2020, 3, 1), &[1, 2, 3]);
        let err = align_series(&power_law_config(10, 10), &records).unwrap_err();
        assert_eq!(
            err,
            CurveError::ThresholdNeverReached {
                threshold: 10,
                max_cumulative: 3
            }
        );
    }

    #[test]
    fn empty_records_are_an_error() {
        assert_eq!(align_series(&power_law_config(10, 10), &[]), Err(CurveError::NoData));
    }

    #[test]
    fn unsorted_or_duplicate_dates_are_rejected() {
        let mut records = records_from_cumulative(d(2020, 3, 1), &[10, 20, 30]);
        records.swap(1, 2);
        assert!(matches!(
            align_series(&power_law_config(10, 10), &records),
            Err(CurveError::UnsortedInput { index: 1, .. })
        ));

        let mut records = records_from_cumulative(d(2020, 3, 1), &[10, 20]);
        records[1].date = records[0].date;
        assert!(matches!(
            align_series(&power_law_config(10, 10), &records),
            Err(CurveError::UnsortedInput { .. })
        ));
    }

    #[test]
    fn horizon_shorter_than_observed_is_an_error() {
        let records = records_from_cumulative(d(2020, 3, 1), &[10, 20, 30, 40]);
        assert_eq!(
            align_series(&power_law_config(10, 3), &records),
            Err(CurveError::ModelHorizonTooShort {
                horizon: 3,
                observed: 4
            })
        );
    }

    #[test]
    fn horizon_equal_to_observed_needs_no_forecast() {
        let records = records_from_cumulative(d(2020, 3, 1), &[10, 20, 30]);
        let aligned = align_series(&power_law_config(10, 3), &records).unwrap();
        assert!(aligned.forecast_dates().is_empty());
        assert_eq!(aligned.len(), 3);
    }
}
