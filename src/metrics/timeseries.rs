use crate::data::Bar;
use crate::portfolio::SimulationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//the portfolio marked to market at one bar's close
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationSnapshot {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub accumulated_cash: f64,
    pub portfolio_value: f64,
    pub total_invested: f64,
    pub unrealized_return: f64,
}

impl ValuationSnapshot {
    //captures the state after the bar's deployment step has run
    pub fn capture(bar: &Bar, state: &SimulationState) -> Self {
        let portfolio_value = state.portfolio_value(bar.close);

        let unrealized_return = if state.total_invested > 0.0 {
            portfolio_value - state.total_invested - state.accumulated_cash
        } else {
            0.0
        };

        ValuationSnapshot {
            date: bar.date,
            price: bar.close,
            accumulated_cash: state.accumulated_cash,
            portfolio_value,
            total_invested: state.total_invested,
            unrealized_return,
        }
    }
}

//percentage appreciation from the first close to the last close
pub fn buy_and_hold_return_pct(bars: &[Bar]) -> f64 {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) if first.close > 0.0 => {
            (last.close - first.close) / first.close * 100.0
        }
        _ => 0.0,
    }
}
