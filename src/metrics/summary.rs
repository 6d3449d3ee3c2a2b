use crate::data::ReturnSeries;
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary statistics over one daily return series
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyReturnSummary {
    pub num_days: usize,
    pub num_positive_days: usize,
    pub num_negative_days: usize,
    pub num_flat_days: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub best_day: Option<(NaiveDate, f64)>,
    pub worst_day: Option<(NaiveDate, f64)>,
    pub mean_pct: f64,
    pub std_dev_pct: f64,
    pub total_pct: f64,
}

impl DailyReturnSummary {
    //calculate summary statistics from a daily return series
    pub fn from_series(series: &ReturnSeries) -> Self {
        if series.is_empty() {
            return DailyReturnSummary::default();
        }

        let values: Vec<f64> = series.values().collect();

        let num_positive_days = values.iter().filter(|&&r| r > 0.0).count();
        let num_negative_days = values.iter().filter(|&&r| r < 0.0).count();

        let mut best: Option<(NaiveDate, f64)> = None;
        let mut worst: Option<(NaiveDate, f64)> = None;
        for sample in series.samples() {
            if best.map_or(true, |(_, r)| sample.pct_return > r) {
                best = Some((sample.day, sample.pct_return));
            }
            if worst.map_or(true, |(_, r)| sample.pct_return < r) {
                worst = Some((sample.day, sample.pct_return));
            }
        }

        //sample std dev is undefined for a single day
        let std_dev_pct = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        DailyReturnSummary {
            num_days: values.len(),
            num_positive_days,
            num_negative_days,
            num_flat_days: values.len() - num_positive_days - num_negative_days,
            first_day: series.samples().first().map(|s| s.day),
            last_day: series.samples().last().map(|s| s.day),
            best_day: best,
            worst_day: worst,
            mean_pct: values.iter().mean(),
            std_dev_pct,
            total_pct: values.iter().sum(),
        }
    }

    //win rate over days with a non-zero return
    pub fn positive_day_ratio(&self) -> f64 {
        let active = self.num_positive_days + self.num_negative_days;
        if active == 0 {
            0.0
        } else {
            self.num_positive_days as f64 / active as f64
        }
    }

    fn display_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Days", format!("{}", self.num_days)),
            ("First Day", fmt_day(self.first_day)),
            ("Last Day", fmt_day(self.last_day)),
            (
                "Up / Down / Flat",
                format!(
                    "{} / {} / {}",
                    self.num_positive_days, self.num_negative_days, self.num_flat_days
                ),
            ),
            (
                "Positive Days",
                format!("{:.2}%", self.positive_day_ratio() * 100.0),
            ),
            ("Best Day", fmt_extreme(self.best_day)),
            ("Worst Day", fmt_extreme(self.worst_day)),
            ("Mean Daily", format!("{:.3}%", self.mean_pct)),
            ("Std Dev Daily", format!("{:.3}%", self.std_dev_pct)),
            ("Sum of Daily", format!("{:.2}%", self.total_pct)),
        ]
    }

    //prints the backtest and live summaries side by side
    pub fn pretty_print_pair(backtest: &Self, live: &Self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![
            Cell::new("Metric"),
            Cell::new("Backtest"),
            Cell::new("Live"),
        ]));

        for ((label, bt), (_, lv)) in backtest.display_rows().into_iter().zip(live.display_rows()) {
            table.add_row(Row::new(vec![
                Cell::new(label),
                Cell::new(&bt),
                Cell::new(&lv),
            ]));
        }

        table.printstd();
    }
}

fn fmt_day(day: Option<NaiveDate>) -> String {
    day.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_extreme(extreme: Option<(NaiveDate, f64)>) -> String {
    match extreme {
        Some((day, pct)) => format!("{:.2}% ({})", pct, day),
        None => "-".to_string(),
    }
}
