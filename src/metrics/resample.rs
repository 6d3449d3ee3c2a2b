use crate::data::{EquitySeries, ReturnSample, ReturnSeries};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    #[error("Equity is zero at index {index} ({timestamp}); percent change to the next sample is undefined")]
    ZeroEquity {
        index: usize,
        timestamp: DateTime<Utc>,
    },
    #[error("Non-finite equity value {value} at index {index} ({timestamp})")]
    NonFiniteEquity {
        index: usize,
        timestamp: DateTime<Utc>,
        value: f64,
    },
    #[error("Return at index {index} ({timestamp}) is not finite: {value}")]
    NonFiniteReturn {
        index: usize,
        timestamp: DateTime<Utc>,
        value: f64,
    },
    #[error("Equity samples out of order at index {index}: {current} precedes {previous}")]
    OutOfOrder {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

//fractional change between two consecutive samples, stamped with the later one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentChange {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub change: f64,
}

//computes (v[i] - v[i-1]) / v[i-1] for every sample after the first
//input must be non-decreasing in time; it is never re-sorted
pub fn percent_changes(series: &EquitySeries) -> Result<Vec<PercentChange>, ResampleError> {
    let samples = series.samples();
    if samples.len() < 2 {
        return Ok(vec![]);
    }

    if !samples[0].value.is_finite() {
        return Err(ResampleError::NonFiniteEquity {
            index: 0,
            timestamp: samples[0].timestamp,
            value: samples[0].value,
        });
    }

    let mut changes = Vec::with_capacity(samples.len() - 1);
    for (i, pair) in samples.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let index = i + 1;

        if curr.timestamp < prev.timestamp {
            return Err(ResampleError::OutOfOrder {
                index,
                previous: prev.timestamp,
                current: curr.timestamp,
            });
        }

        if !curr.value.is_finite() {
            return Err(ResampleError::NonFiniteEquity {
                index,
                timestamp: curr.timestamp,
                value: curr.value,
            });
        }

        if prev.value == 0.0 {
            return Err(ResampleError::ZeroEquity {
                index: i,
                timestamp: prev.timestamp,
            });
        }

        //tiny predecessors or huge swings can still overflow
        let change = (curr.value - prev.value) / prev.value;
        if !change.is_finite() {
            return Err(ResampleError::NonFiniteReturn {
                index,
                timestamp: curr.timestamp,
                value: change,
            });
        }

        changes.push(PercentChange {
            index,
            timestamp: curr.timestamp,
            change,
        });
    }

    Ok(changes)
}

//sums changes per utc calendar day and scales the sums to percent
//changes must already be in time order
pub fn sum_by_day(changes: &[PercentChange]) -> Result<ReturnSeries, ResampleError> {
    let mut buckets: Vec<ReturnSample> = Vec::new();
    let mut current: Option<(NaiveDate, f64, &PercentChange)> = None;

    for pc in changes {
        let day = pc.timestamp.date_naive();
        current = match current {
            Some((open_day, sum, _)) if open_day == day => Some((open_day, sum + pc.change, pc)),
            Some((open_day, sum, last)) => {
                buckets.push(to_pct(open_day, sum, last)?);
                Some((day, pc.change, pc))
            }
            None => Some((day, pc.change, pc)),
        };
    }

    if let Some((open_day, sum, last)) = current {
        buckets.push(to_pct(open_day, sum, last)?);
    }

    Ok(ReturnSeries::from_sorted(buckets))
}

//last is the change that closed the bucket, reported if the sum overflows
fn to_pct(
    day: NaiveDate,
    fractional: f64,
    last: &PercentChange,
) -> Result<ReturnSample, ResampleError> {
    let pct_return = fractional * 100.0;
    ReturnSample::new(day, pct_return).map_err(|_| ResampleError::NonFiniteReturn {
        index: last.index,
        timestamp: last.timestamp,
        value: pct_return,
    })
}

//converts an equity curve into summed daily percentage returns
//intraday changes are added, not compounded
pub fn resample_daily(series: &EquitySeries) -> Result<ReturnSeries, ResampleError> {
    let changes = percent_changes(series)?;
    let daily = sum_by_day(&changes)?;

    debug!(
        samples = series.len(),
        changes = changes.len(),
        days = daily.len(),
        "resampled equity curve to daily returns"
    );

    Ok(daily)
}

//stateless handle for callers that want to pass the resampler around
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyReturnResampler;

impl DailyReturnResampler {
    pub fn resample(&self, series: &EquitySeries) -> Result<ReturnSeries, ResampleError> {
        resample_daily(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(points: &[(DateTime<Utc>, f64)]) -> EquitySeries {
        EquitySeries::from_pairs(points.iter().copied())
    }

    #[test]
    fn empty_and_singleton_give_empty_series() {
        assert!(resample_daily(&EquitySeries::default()).unwrap().is_empty());
        assert!(resample_daily(&series(&[(at(1, 9), 100.0)]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn transition_across_midnight_belongs_to_later_day() {
        let eq = series(&[(at(1, 9), 100.0), (at(1, 15), 101.0), (at(2, 9), 99.0)]);
        let daily = resample_daily(&eq).unwrap();

        assert_eq!(daily.len(), 2);
        assert_eq!(daily.samples()[0].day, date(1));
        assert!((daily.samples()[0].pct_return - 1.0).abs() < 1e-12);
        assert_eq!(daily.samples()[1].day, date(2));
        assert!((daily.samples()[1].pct_return - (-200.0 / 101.0)).abs() < 1e-12);
    }

    #[test]
    fn intraday_changes_are_summed_not_compounded() {
        //+10% then -10% compounds to -1%, but sums to 0%
        let eq = series(&[(at(1, 9), 100.0), (at(1, 10), 110.0), (at(1, 11), 99.0)]);
        let daily = resample_daily(&eq).unwrap();

        assert_eq!(daily.len(), 1);
        assert!(daily.samples()[0].pct_return.abs() < 1e-12);
    }

    #[test]
    fn distinct_days_match_simple_returns() {
        let values = [100.0, 105.0, 102.9, 110.0];
        let eq = series(
            &values
                .iter()
                .enumerate()
                .map(|(i, v)| (at(i as u32 + 1, 16), *v))
                .collect::<Vec<_>>(),
        );
        let daily = resample_daily(&eq).unwrap();

        assert_eq!(daily.len(), values.len() - 1);
        for (i, sample) in daily.samples().iter().enumerate() {
            let expected = 100.0 * ((values[i + 1] - values[i]) / values[i]);
            assert_eq!(sample.pct_return, expected);
            assert_eq!(sample.day, date(i as u32 + 2));
        }
    }

    #[test]
    fn gaps_between_days_are_not_filled() {
        let eq = series(&[(at(1, 9), 100.0), (at(5, 9), 120.0)]);
        let daily = resample_daily(&eq).unwrap();
        assert_eq!(daily.days().collect::<Vec<_>>(), vec![date(5)]);
    }

    #[test]
    fn zero_predecessor_is_an_error() {
        let eq = series(&[(at(1, 9), 0.0), (at(1, 10), 50.0)]);
        let err = resample_daily(&eq).unwrap_err();
        assert_eq!(
            err,
            ResampleError::ZeroEquity {
                index: 0,
                timestamp: at(1, 9)
            }
        );
    }

    #[test]
    fn trailing_zero_is_allowed() {
        //only a zero predecessor is a problem
        let eq = series(&[(at(1, 9), 50.0), (at(2, 9), 0.0)]);
        let daily = resample_daily(&eq).unwrap();
        assert_eq!(daily.samples()[0].pct_return, -100.0);
    }

    #[test]
    fn negative_equity_is_not_rejected() {
        let eq = series(&[(at(1, 9), -100.0), (at(2, 9), -50.0)]);
        let daily = resample_daily(&eq).unwrap();
        assert_eq!(daily.samples()[0].pct_return, -50.0);
    }

    #[test]
    fn tiny_predecessor_overflow_is_an_error() {
        let eq = series(&[(at(1, 9), 5e-324), (at(2, 9), 100.0)]);
        match resample_daily(&eq) {
            Err(ResampleError::NonFiniteReturn { index, timestamp, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(timestamp, at(2, 9));
            }
            other => panic!("expected non-finite return, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_difference_is_an_error() {
        let eq = series(&[(at(1, 9), -1e308), (at(2, 9), 1e308)]);
        assert!(matches!(
            resample_daily(&eq),
            Err(ResampleError::NonFiniteReturn { index: 1, .. })
        ));
    }

    #[test]
    fn overflowing_daily_sum_is_an_error() {
        //each change is finite but the day's percentage is not
        let eq = series(&[
            (at(1, 9), 1.0),
            (at(1, 10), 1e307),
            (at(1, 11), 1e307),
            (at(2, 9), 1e307),
        ]);
        match resample_daily(&eq) {
            Err(ResampleError::NonFiniteReturn {
                index,
                timestamp,
                value,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(timestamp, at(1, 11));
                assert!(value.is_infinite());
            }
            other => panic!("expected non-finite return, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_input_fails_fast() {
        let eq = series(&[(at(2, 9), 100.0), (at(1, 9), 101.0)]);
        match resample_daily(&eq) {
            Err(ResampleError::OutOfOrder { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected ordering error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_timestamps_are_accepted() {
        let eq = series(&[(at(1, 9), 100.0), (at(1, 9), 102.0), (at(1, 9), 102.0)]);
        let daily = resample_daily(&eq).unwrap();
        assert_eq!(daily.len(), 1);
        assert!((daily.samples()[0].pct_return - 2.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_values_are_reported() {
        let eq = series(&[(at(1, 9), 100.0), (at(1, 10), f64::NAN)]);
        assert!(matches!(
            resample_daily(&eq),
            Err(ResampleError::NonFiniteEquity { index: 1, .. })
        ));
    }

    #[test]
    fn offset_timestamps_bucket_by_utc_date() {
        //22:30 at -05:00 is already the next day in utc
        let late = DateTime::parse_from_rfc3339("2024-03-04T22:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        let eq = series(&[(at(4, 12), 100.0), (late, 101.0)]);
        let daily = resample_daily(&eq).unwrap();
        assert_eq!(daily.samples()[0].day, date(5));
    }

    #[test]
    fn resampling_is_repeatable() {
        let eq = series(&[(at(1, 9), 100.0), (at(1, 12), 100.3), (at(2, 9), 99.7)]);
        let resampler = DailyReturnResampler;
        assert_eq!(resampler.resample(&eq), resampler.resample(&eq));
    }
}
