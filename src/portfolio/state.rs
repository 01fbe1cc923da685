use crate::portfolio::window::PriceWindow;

//mutable accounting state, exclusively owned by one simulation run
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    //uninvested capital accrued but not yet deployed
    pub accumulated_cash: f64,

    //cumulative capital deployed, never decreases
    pub total_invested: f64,

    //cumulative units of the asset acquired, never decreases
    pub total_holding: f64,

    //running maximum of bar highs seen so far
    pub running_extreme: f64,

    //trailing window of recent closes, created by the moving-average policy on first use
    pub window: Option<PriceWindow>,
}

impl SimulationState {
    //creates a zero-valued state
    pub fn new() -> Self {
        Self::default()
    }

    //adds the daily budget to idle cash
    pub fn accrue(&mut self, amount: f64) {
        self.accumulated_cash += amount;
    }

    //raises the running extreme to cover the given high
    pub fn observe_high(&mut self, high: f64) {
        self.running_extreme = self.running_extreme.max(high);
    }

    //converts cash into units at the given price and returns the units acquired
    //the caller guarantees price > 0
    pub fn deploy(&mut self, amount: f64, price: f64) -> f64 {
        let units = amount / price;
        self.total_holding += units;
        self.total_invested += amount;
        self.accumulated_cash -= amount;
        units
    }

    //marks the portfolio to the given price (idle cash plus holdings)
    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.accumulated_cash + self.total_holding * price
    }
}
