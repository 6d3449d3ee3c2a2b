pub mod loader;
pub mod sample;

pub use loader::{load_equity_csv, read_equity_csv, CsvEquitySource, EquitySource};
pub use sample::{EquitySample, EquitySeries, ReturnSample, ReturnSeries, SampleError};
