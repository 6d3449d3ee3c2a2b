use crate::data::ReturnSeries;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;

//receives the backtest and live daily returns (live may be empty) and renders them
pub trait Presenter {
    fn present(&mut self, backtest: &ReturnSeries, live: &ReturnSeries) -> Result<()>;
}

//day-by-day table with one column per series
pub struct TablePresenter<W: Write> {
    out: W,
}

impl<W: Write> TablePresenter<W> {
    pub fn new(out: W) -> Self {
        TablePresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TablePresenter<W> {
    fn present(&mut self, backtest: &ReturnSeries, live: &ReturnSeries) -> Result<()> {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Day"),
            Cell::new("Backtest"),
            Cell::new("Live"),
        ]));

        //union of days, display only
        let days: BTreeSet<NaiveDate> = backtest.days().chain(live.days()).collect();
        for day in days {
            table.add_row(Row::new(vec![
                Cell::new(&day.to_string()),
                Cell::new(&fmt_pct(backtest.get(day))),
                Cell::new(&fmt_pct(live.get(day))),
            ]));
        }

        table
            .print(&mut self.out)
            .context("Failed to write daily returns table")?;
        Ok(())
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}%", v))
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    series: &'a str,
    day: NaiveDate,
    pct_return: f64,
}

//long-format csv: series,day,pct_return
pub struct CsvPresenter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvPresenter<W> {
    pub fn new(out: W) -> Self {
        CsvPresenter {
            writer: csv::Writer::from_writer(out),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Failed to flush CSV output: {}", err.error()))
    }
}

impl<W: Write> Presenter for CsvPresenter<W> {
    fn present(&mut self, backtest: &ReturnSeries, live: &ReturnSeries) -> Result<()> {
        for (series, returns) in [("backtest", backtest), ("live", live)] {
            for sample in returns.samples() {
                self.writer
                    .serialize(CsvRow {
                        series,
                        day: sample.day,
                        pct_return: sample.pct_return,
                    })
                    .context("Failed to write daily return row")?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    backtest: &'a ReturnSeries,
    live: &'a ReturnSeries,
}

//{ "backtest": [{day, pct_return}, ...], "live": [...] }
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, backtest: &ReturnSeries, live: &ReturnSeries) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &JsonReport { backtest, live })
            .context("Failed to write daily returns JSON")?;
        self.out.flush()?;
        Ok(())
    }
}
