use crate::report::LiveFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//complete daily returns report configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfiguration {
    //inputs
    pub backtest_equity_csv: PathBuf,
    #[serde(default)]
    pub live_equity_csv: Option<PathBuf>,

    //what to do when the live curve cannot be resampled
    #[serde(default)]
    pub live_failure_policy: LiveFailurePolicy,

    //optional output paths
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
    #[serde(default)]
    pub output_json: Option<PathBuf>,

    //print the side-by-side day table
    #[serde(default = "default_print_table")]
    pub print_table: bool,
}

fn default_print_table() -> bool {
    true
}

impl Default for ReportConfiguration {
    fn default() -> Self {
        ReportConfiguration {
            backtest_equity_csv: PathBuf::from("equity.csv"),
            live_equity_csv: None,
            live_failure_policy: LiveFailurePolicy::default(),
            output_csv: None,
            output_json: None,
            print_table: true,
        }
    }
}

impl ReportConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ReportConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
