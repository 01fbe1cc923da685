use crate::policy::below_moving_average::BelowMovingAveragePolicy;
use crate::policy::dip_below_extreme::DipBelowExtremePolicy;
use crate::policy::fixed_amount::FixedAmountPolicy;
use crate::policy::DecisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//policy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyType {
    FixedAmount,
    DipBelowExtreme,
    BelowMovingAverage,
}

impl PolicyType {
    //parse policy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed_amount" | "dca" => Some(PolicyType::FixedAmount),
            "dip" | "dip_below_extreme" | "ath_dip" => Some(PolicyType::DipBelowExtreme),
            "ma" | "moving_average" | "below_moving_average" => Some(PolicyType::BelowMovingAverage),
            _ => None,
        }
    }
}

//dip policy parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DipParams {
    //fraction below the running extreme that triggers a deployment
    pub dip_fraction: f64,
}

impl Default for DipParams {
    fn default() -> Self {
        DipParams { dip_fraction: 0.20 }
    }
}

//moving-average policy parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovingAverageParams {
    //trailing window size in days
    pub window: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        MovingAverageParams { window: 20 }
    }
}

//policy-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PolicyParams {
    Fixed,
    Dip(DipParams),
    MovingAverage(MovingAverageParams),
}

impl PolicyParams {
    //builds the boxed policy for this parameter set
    pub fn build(&self) -> Box<dyn DecisionPolicy> {
        match self {
            PolicyParams::Fixed => Box::new(FixedAmountPolicy::new()),
            PolicyParams::Dip(params) => Box::new(DipBelowExtremePolicy::new(params.dip_fraction)),
            PolicyParams::MovingAverage(params) => {
                Box::new(BelowMovingAveragePolicy::new(params.window))
            }
        }
    }

    //short label used in comparison tables
    pub fn label(&self, daily_budget: f64) -> String {
        match self {
            PolicyParams::Fixed => format!("fixed ${:.2}/day", daily_budget),
            PolicyParams::Dip(params) => format!("dip {:.0}%", params.dip_fraction * 100.0),
            PolicyParams::MovingAverage(params) => format!("ma {}", params.window),
        }
    }

    pub fn policy_type(&self) -> PolicyType {
        match self {
            PolicyParams::Fixed => PolicyType::FixedAmount,
            PolicyParams::Dip(_) => PolicyType::DipBelowExtreme,
            PolicyParams::MovingAverage(_) => PolicyType::BelowMovingAverage,
        }
    }
}

//complete backtest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,

    //cash accrued per day
    pub daily_budget: f64,

    //policy
    pub policy: PolicyParams,

    //optional output paths
    pub output_events_csv: Option<PathBuf>,
    pub output_valuations_csv: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            daily_budget: 1.0,
            policy: PolicyParams::Dip(DipParams::default()),
            output_events_csv: None,
            output_valuations_csv: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_aliases() {
        assert_eq!(PolicyType::parse("fixed"), Some(PolicyType::FixedAmount));
        assert_eq!(PolicyType::parse("DCA"), Some(PolicyType::FixedAmount));
        assert_eq!(PolicyType::parse("dip"), Some(PolicyType::DipBelowExtreme));
        assert_eq!(
            PolicyType::parse("ath_dip"),
            Some(PolicyType::DipBelowExtreme)
        );
        assert_eq!(
            PolicyType::parse("ma"),
            Some(PolicyType::BelowMovingAverage)
        );
        assert_eq!(PolicyType::parse("unknown"), None);
    }

    #[test]
    fn labels_name_the_swept_parameter() {
        assert_eq!(PolicyParams::Fixed.label(5.0), "fixed $5.00/day");
        assert_eq!(
            PolicyParams::Dip(DipParams { dip_fraction: 0.25 }).label(1.0),
            "dip 25%"
        );
        assert_eq!(
            PolicyParams::MovingAverage(MovingAverageParams { window: 50 }).label(1.0),
            "ma 50"
        );
    }

    #[test]
    fn configuration_round_trips_through_json() {
        let config = BacktestConfiguration {
            data_path: PathBuf::from("bitcoin.csv"),
            daily_budget: 2.5,
            policy: PolicyParams::MovingAverage(MovingAverageParams { window: 50 }),
            output_events_csv: Some(PathBuf::from("events.csv")),
            output_valuations_csv: None,
        };

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        config.to_json_file(&path).unwrap();

        let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded.data_path, config.data_path);
        assert_eq!(loaded.daily_budget, 2.5);
        assert!(matches!(
            loaded.policy,
            PolicyParams::MovingAverage(MovingAverageParams { window: 50 })
        ));
        assert_eq!(loaded.output_events_csv, config.output_events_csv);
    }
}
