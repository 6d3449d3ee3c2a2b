use chrono::{DateTime, Duration, TimeZone, Utc};
use daily_returns::prelude::*;
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

//non-decreasing timestamps built from minute gaps (zero gaps give duplicates)
fn curve(gaps: &[i64], values: &[f64]) -> EquitySeries {
    let mut ts = base();
    EquitySeries::from_pairs(gaps.iter().zip(values.iter()).map(|(&gap, &value)| {
        ts += Duration::minutes(gap);
        (ts, value)
    }))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn days_are_strictly_increasing(
        points in prop::collection::vec((0i64..3_000, 0.01f64..100_000.0), 0..120)
    ) {
        let (gaps, values): (Vec<i64>, Vec<f64>) = points.into_iter().unzip();
        let daily = resample_daily(&curve(&gaps, &values)).unwrap();

        prop_assert!(daily.samples().windows(2).all(|w| w[0].day < w[1].day));
        prop_assert!(daily.len() <= values.len().saturating_sub(1));
        prop_assert!(daily.values().all(|v| v.is_finite()));
    }

    #[test]
    fn resampling_is_deterministic(
        points in prop::collection::vec((0i64..3_000, 0.01f64..100_000.0), 0..60)
    ) {
        let (gaps, values): (Vec<i64>, Vec<f64>) = points.into_iter().unzip();
        let series = curve(&gaps, &values);
        let before = series.clone();

        let first = resample_daily(&series).unwrap();
        let second = resample_daily(&series).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(series, before);
    }

    #[test]
    fn one_sample_per_day_gives_simple_returns(
        values in prop::collection::vec(0.01f64..100_000.0, 2..60)
    ) {
        let series = EquitySeries::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (base() + Duration::days(i as i64) + Duration::hours(15), v)),
        );
        let daily = resample_daily(&series).unwrap();

        prop_assert_eq!(daily.len(), values.len() - 1);
        for (i, sample) in daily.samples().iter().enumerate() {
            let expected = 100.0 * ((values[i + 1] - values[i]) / values[i]);
            prop_assert_eq!(sample.pct_return, expected);
        }
    }

    #[test]
    fn daily_values_sum_to_total_of_changes(
        points in prop::collection::vec((0i64..1_500, 0.01f64..100_000.0), 2..80)
    ) {
        let (gaps, values): (Vec<i64>, Vec<f64>) = points.into_iter().unzip();
        let series = curve(&gaps, &values);

        let total_changes: f64 = values
            .windows(2)
            .map(|w| (w[1] - w[0]) / w[0])
            .sum::<f64>() * 100.0;
        let total_daily: f64 = resample_daily(&series).unwrap().values().sum();

        prop_assert!((total_changes - total_daily).abs() <= 1e-6 * (1.0 + total_changes.abs()));
    }

    #[test]
    fn zero_anywhere_before_the_end_fails(
        values in prop::collection::vec(0.01f64..1_000.0, 2..40),
        zero_at in 0usize..39
    ) {
        let zero_at = zero_at % (values.len() - 1);
        let mut values = values;
        values[zero_at] = 0.0;
        let gaps = vec![60; values.len()];

        let result = resample_daily(&curve(&gaps, &values));
        let is_zero_error = matches!(
            result,
            Err(ResampleError::ZeroEquity { index, .. }) if index == zero_at
        );
        prop_assert!(is_zero_error);
    }
}
