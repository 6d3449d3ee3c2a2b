use crate::data::{EquitySeries, EquitySource, ReturnSeries};
use crate::metrics::resample::{resample_daily, ResampleError};
use crate::metrics::DailyReturnSummary;
use crate::report::presenter::Presenter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info_span, warn};

//how a failure on the live curve is treated; backtest failures are always fatal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveFailurePolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Failed to resample backtest equity curve")]
    Backtest(#[source] ResampleError),
    #[error("Failed to resample live equity curve")]
    Live(#[source] ResampleError),
}

//why the live series came out empty under LiveFailurePolicy::Skip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiveFailure {
    #[error("live equity could not be read: {0}")]
    Unreadable(String),
    #[error(transparent)]
    Resample(ResampleError),
}

//daily returns for a backtest and, optionally, a live session
//the two series are kept exactly as resampled, with no alignment between them
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReturnsReport {
    pub backtest: ReturnSeries,
    pub live: ReturnSeries,
    //set when the live curve failed and the policy said to skip it
    pub live_error: Option<LiveFailure>,
}

impl DailyReturnsReport {
    //resamples both curves independently (in parallel when there is a live curve)
    pub fn build(
        backtest: &EquitySeries,
        live: Option<&EquitySeries>,
        policy: LiveFailurePolicy,
    ) -> Result<Self, ReportError> {
        let (backtest_result, live_result) = match live {
            Some(live) if !live.is_empty() => {
                let (b, l) = rayon::join(|| resample_daily(backtest), || resample_daily(live));
                (b, Some(l))
            }
            _ => (resample_daily(backtest), None),
        };

        let backtest = backtest_result.map_err(ReportError::Backtest)?;

        let (live, live_error) = match live_result {
            None => (ReturnSeries::empty(), None),
            Some(Ok(series)) => (series, None),
            Some(Err(err)) => match policy {
                LiveFailurePolicy::Fail => return Err(ReportError::Live(err)),
                LiveFailurePolicy::Skip => {
                    warn!(error = %err, "skipping live equity curve");
                    (ReturnSeries::empty(), Some(LiveFailure::Resample(err)))
                }
            },
        };

        Ok(DailyReturnsReport {
            backtest,
            live,
            live_error,
        })
    }

    //pulls the curves from their sources, then builds the report
    pub fn from_sources(
        backtest: &dyn EquitySource,
        live: Option<&dyn EquitySource>,
        policy: LiveFailurePolicy,
    ) -> Result<Self> {
        let _span = info_span!("daily_returns_report", backtest = backtest.name()).entered();

        let backtest_series = backtest
            .equity_series()
            .context(format!("Failed to read backtest equity from {}", backtest.name()))?;

        let mut unreadable = None;
        let live_series = match live {
            None => None,
            Some(source) => match source.equity_series() {
                Ok(series) => Some(series),
                Err(err) if policy == LiveFailurePolicy::Skip => {
                    let reason = format!("{err:#}");
                    warn!(
                        source = source.name(),
                        error = %reason,
                        "live equity unavailable, skipping"
                    );
                    unreadable = Some(LiveFailure::Unreadable(reason));
                    None
                }
                Err(err) => {
                    return Err(err.context(format!(
                        "Failed to read live equity from {}",
                        source.name()
                    )))
                }
            },
        };

        let mut report =
            DailyReturnsReport::build(&backtest_series, live_series.as_ref(), policy)?;
        if unreadable.is_some() {
            report.live_error = unreadable;
        }
        Ok(report)
    }

    pub fn has_live(&self) -> bool {
        !self.live.is_empty()
    }

    pub fn backtest_summary(&self) -> DailyReturnSummary {
        DailyReturnSummary::from_series(&self.backtest)
    }

    pub fn live_summary(&self) -> DailyReturnSummary {
        DailyReturnSummary::from_series(&self.live)
    }

    //hands both series to the presenter unchanged
    pub fn render(&self, presenter: &mut dyn Presenter) -> Result<()> {
        presenter.present(&self.backtest, &self.live)
    }
}
