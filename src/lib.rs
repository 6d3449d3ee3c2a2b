//daily percentage returns from backtest and live equity curves

pub mod config;
pub mod data;
pub mod metrics;
pub mod report;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ReportConfiguration;
    pub use crate::data::{
        load_equity_csv, CsvEquitySource, EquitySample, EquitySeries, EquitySource, ReturnSample,
        ReturnSeries, SampleError,
    };
    pub use crate::metrics::{
        resample_daily, DailyReturnResampler, DailyReturnSummary, ResampleError,
    };
    pub use crate::report::{
        CsvPresenter, DailyReturnsReport, JsonPresenter, LiveFailure, LiveFailurePolicy,
        Presenter, ReportError, TablePresenter,
    };
}
