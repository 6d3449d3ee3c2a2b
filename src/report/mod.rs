pub mod coordinator;
pub mod presenter;

pub use coordinator::{DailyReturnsReport, LiveFailure, LiveFailurePolicy, ReportError};
pub use presenter::{CsvPresenter, JsonPresenter, Presenter, TablePresenter};
