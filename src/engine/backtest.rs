use crate::data::Bar;
use crate::engine::deployment::{execute_directive, AllocationEvent, SimulationError};
use crate::metrics::{SummaryMetrics, ValuationSnapshot};
use crate::policy::DecisionPolicy;
use crate::portfolio::SimulationState;

//result of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub summary: SummaryMetrics,
    pub events: Vec<AllocationEvent>,
    pub valuations: Vec<ValuationSnapshot>,
    pub final_state: SimulationState,
}

//configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    //cash accrued at the start of every bar
    pub daily_budget: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig { daily_budget: 1.0 }
    }
}

//main simulation engine
//drives a single linear pass over the bars: accrue, decide, deploy, snapshot
pub struct SimulationEngine<'a> {
    config: SimulationConfig,
    bars: &'a [Bar],
    state: SimulationState,
    events: Vec<AllocationEvent>,
    valuations: Vec<ValuationSnapshot>,
}

impl<'a> SimulationEngine<'a> {
    //creates a new simulation engine over a borrowed, read-only bar series
    pub fn new(config: SimulationConfig, bars: &'a [Bar]) -> Self {
        SimulationEngine {
            config,
            bars,
            state: SimulationState::new(),
            events: Vec::new(),
            valuations: Vec::with_capacity(bars.len()),
        }
    }

    //runs the simulation with the given policy
    //fails fast on the first bar whose close cannot be deployed against,
    //an empty series yields an empty, zero-valued result
    pub fn run(&mut self, policy: &dyn DecisionPolicy) -> Result<SimulationResult, SimulationError> {
        //reset so repeated runs of one engine start identical
        self.state = SimulationState::new();
        self.events.clear();
        self.valuations.clear();

        for bar in self.bars {
            //accrue the daily budget before any decision
            self.state.accrue(self.config.daily_budget);

            //query the policy for a directive
            if let Some(directive) = policy.decide(&mut self.state, bar) {
                if directive.amount > 0.0 {
                    let event = execute_directive(
                        &mut self.state,
                        bar,
                        directive,
                        self.events.len() + 1,
                    )?;
                    self.events.push(event);
                }
            }

            //record the valuation after the deployment step
            self.valuations.push(ValuationSnapshot::capture(bar, &self.state));
        }

        Ok(self.build_result())
    }

    fn build_result(&self) -> SimulationResult {
        let summary = SummaryMetrics::from_run(
            &self.events,
            &self.valuations,
            &self.state,
            self.bars.last(),
        );

        SimulationResult {
            summary,
            events: self.events.clone(),
            valuations: self.valuations.clone(),
            final_state: self.state.clone(),
        }
    }

    //returns a reference to the current state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    //returns the bar series under simulation
    pub fn bars(&self) -> &[Bar] {
        self.bars
    }
}
