use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SampleError {
    #[error("Non-finite equity value {value} at {timestamp}")]
    NonFiniteEquity {
        timestamp: DateTime<Utc>,
        value: f64,
    },
    #[error("Non-finite return value {value} on {day}")]
    NonFiniteReturn { day: NaiveDate, value: f64 },
}

//a single timestamped portfolio value from an equity curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EquitySample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl EquitySample {
    //creates a new EquitySample with validation
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Result<Self, SampleError> {
        if !value.is_finite() {
            return Err(SampleError::NonFiniteEquity { timestamp, value });
        }

        Ok(EquitySample { timestamp, value })
    }

    //creates an EquitySample without validation
    pub fn new_unchecked(timestamp: DateTime<Utc>, value: f64) -> Self {
        EquitySample { timestamp, value }
    }

    //calendar day the sample falls on (utc)
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

//ordered equity curve, ascending by timestamp
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EquitySeries {
    samples: Vec<EquitySample>,
}

impl EquitySeries {
    //wraps samples as given; ordering is checked when resampling
    pub fn new(samples: Vec<EquitySample>) -> Self {
        EquitySeries { samples }
    }

    //builds a series from (timestamp, value) pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        EquitySeries {
            samples: pairs
                .into_iter()
                .map(|(timestamp, value)| EquitySample::new_unchecked(timestamp, value))
                .collect(),
        }
    }

    pub fn samples(&self) -> &[EquitySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    //first and last timestamps, if any
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}

impl From<Vec<EquitySample>> for EquitySeries {
    fn from(samples: Vec<EquitySample>) -> Self {
        EquitySeries::new(samples)
    }
}

//one day's summed return, in percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReturnSample {
    pub day: NaiveDate,
    pub pct_return: f64,
}

impl ReturnSample {
    pub fn new(day: NaiveDate, pct_return: f64) -> Result<Self, SampleError> {
        if !pct_return.is_finite() {
            return Err(SampleError::NonFiniteReturn {
                day,
                value: pct_return,
            });
        }

        Ok(ReturnSample { day, pct_return })
    }
}

//daily return series; days are unique and strictly increasing
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ReturnSeries {
    samples: Vec<ReturnSample>,
}

impl ReturnSeries {
    //callers inside the crate uphold the ordering invariant
    pub(crate) fn from_sorted(samples: Vec<ReturnSample>) -> Self {
        debug_assert!(samples.windows(2).all(|w| w[0].day < w[1].day));
        ReturnSeries { samples }
    }

    pub fn empty() -> Self {
        ReturnSeries::default()
    }

    pub fn samples(&self) -> &[ReturnSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.samples.iter().map(|s| s.day)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.pct_return)
    }

    //looks up the return for a given day
    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.samples
            .binary_search_by(|s| s.day.cmp(&day))
            .ok()
            .map(|idx| self.samples[idx].pct_return)
    }
}
