pub mod resample;
pub mod summary;

pub use resample::{
    percent_changes, resample_daily, sum_by_day, DailyReturnResampler, PercentChange,
    ResampleError,
};
pub use summary::DailyReturnSummary;
