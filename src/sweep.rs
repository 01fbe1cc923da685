use crate::config::{DipParams, MovingAverageParams, PolicyParams};
use crate::data::Bar;
use crate::engine::{SimulationConfig, SimulationEngine, SimulationError};
use crate::metrics::SummaryMetrics;
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use rayon::prelude::*;

//one combination of policy parameters and daily budget to sweep
#[derive(Debug, Clone)]
pub struct SweepSpec {
    pub params: PolicyParams,
    pub daily_budget: f64,
}

impl SweepSpec {
    pub fn new(params: PolicyParams, daily_budget: f64) -> Self {
        SweepSpec {
            params,
            daily_budget,
        }
    }

    //row label used to key and print results
    pub fn label(&self) -> String {
        self.params.label(self.daily_budget)
    }
}

//one row of a comparison sweep
//a failing combination carries its error instead of aborting the sweep
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub label: String,
    pub daily_budget: f64,
    pub outcome: Result<SummaryMetrics, SimulationError>,
}

//sweep results keyed by combination label, in grid order
pub type SweepResults = IndexMap<String, SweepRow>;

//builds specs for a grid of dip fractions at a fixed daily budget
pub fn dip_fraction_grid(fractions: &[f64], daily_budget: f64) -> Vec<SweepSpec> {
    fractions
        .iter()
        .map(|&dip_fraction| {
            SweepSpec::new(PolicyParams::Dip(DipParams { dip_fraction }), daily_budget)
        })
        .collect()
}

//builds specs for a grid of fixed daily investment amounts
pub fn daily_budget_grid(budgets: &[f64]) -> Vec<SweepSpec> {
    budgets
        .iter()
        .map(|&budget| SweepSpec::new(PolicyParams::Fixed, budget))
        .collect()
}

//builds specs for a grid of moving-average windows at a fixed daily budget
pub fn ma_window_grid(windows: &[usize], daily_budget: f64) -> Vec<SweepSpec> {
    windows
        .iter()
        .map(|&window| {
            SweepSpec::new(
                PolicyParams::MovingAverage(MovingAverageParams { window }),
                daily_budget,
            )
        })
        .collect()
}

//runs one independent simulation per combination, in parallel
//every run owns its own state, the bar series is shared read-only
pub fn run_sweep(bars: &[Bar], specs: &[SweepSpec]) -> SweepResults {
    let rows: Vec<SweepRow> = specs
        .par_iter()
        .map(|spec| {
            let policy = spec.params.build();
            let config = SimulationConfig {
                daily_budget: spec.daily_budget,
            };

            let mut engine = SimulationEngine::new(config, bars);
            let outcome = engine.run(policy.as_ref()).map(|result| result.summary);

            SweepRow {
                label: spec.label(),
                daily_budget: spec.daily_budget,
                outcome,
            }
        })
        .collect();

    rows.into_iter()
        .map(|row| (row.label.clone(), row))
        .collect()
}

//prints sweep results in a formatted table, one row per combination
pub fn print_table(results: &SweepResults) {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Combination"),
        Cell::new("Purchases"),
        Cell::new("Total Invested"),
        Cell::new("Total Return"),
        Cell::new("Return %"),
        Cell::new("Final Value"),
    ]));

    for row in results.values() {
        match &row.outcome {
            Ok(summary) => {
                table.add_row(Row::new(vec![
                    Cell::new(&row.label),
                    Cell::new(&format!("{}", summary.num_purchases)),
                    Cell::new(&format!("${:.2}", summary.total_invested)),
                    Cell::new(&format!("${:.2}", summary.total_return)),
                    Cell::new(&format!("{:.2}%", summary.return_percentage)),
                    Cell::new(&format!("${:.2}", summary.final_value)),
                ]));
            }
            Err(err) => {
                table.add_row(Row::new(vec![
                    Cell::new(&row.label),
                    Cell::new(&format!("failed: {}", err)),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]));
            }
        }
    }

    table.printstd();
}
