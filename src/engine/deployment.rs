use crate::data::Bar;
use crate::portfolio::SimulationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Non-positive close price {close} on {date}")]
    NonPositivePrice { date: DateTime<Utc>, close: f64 },
}

//policy-specific context attached to a deployment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DirectiveContext {
    //fixed daily schedule, no price condition
    FixedSchedule,
    //price dipped below the running extreme
    DipFromExtreme { extreme: f64, dip_pct: f64 },
    //price closed below the trailing moving average
    BelowAverage { average: f64 },
}

//a policy's instruction to deploy cash on the current bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationDirective {
    pub amount: f64,
    pub context: DirectiveContext,
}

impl AllocationDirective {
    pub fn new(amount: f64, context: DirectiveContext) -> Self {
        AllocationDirective { amount, context }
    }
}

//an executed deployment of cash into units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationEvent {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub amount: f64,
    pub units: f64,
    pub total_holding: f64,
    pub total_invested: f64,
    pub purchase_number: usize,
    pub context: DirectiveContext,
}

//executes a directive against the current bar and records the event
//fails if the close price cannot be divided by
pub fn execute_directive(
    state: &mut SimulationState,
    bar: &Bar,
    directive: AllocationDirective,
    purchase_number: usize,
) -> Result<AllocationEvent, SimulationError> {
    if bar.close <= 0.0 {
        return Err(SimulationError::NonPositivePrice {
            date: bar.date,
            close: bar.close,
        });
    }

    let units = state.deploy(directive.amount, bar.close);

    Ok(AllocationEvent {
        date: bar.date,
        price: bar.close,
        amount: directive.amount,
        units,
        total_holding: state.total_holding,
        total_invested: state.total_invested,
        purchase_number,
        context: directive.context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(close: f64) -> Bar {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        Bar::new_unchecked(date, close, close, close, close, 0.0)
    }

    #[test]
    fn deployment_updates_running_totals() {
        let mut state = SimulationState::new();
        state.accrue(10.0);

        let directive = AllocationDirective::new(10.0, DirectiveContext::FixedSchedule);
        let event = execute_directive(&mut state, &bar(100.0), directive, 1).unwrap();

        assert_eq!(event.units, 0.1);
        assert_eq!(event.total_invested, 10.0);
        assert_eq!(event.total_holding, 0.1);
        assert_eq!(event.purchase_number, 1);
        assert_eq!(state.accumulated_cash, 0.0);
    }

    #[test]
    fn non_positive_close_fails() {
        let mut state = SimulationState::new();
        state.accrue(10.0);

        let directive = AllocationDirective::new(10.0, DirectiveContext::FixedSchedule);
        let err = execute_directive(&mut state, &bar(0.0), directive, 1).unwrap_err();

        assert!(matches!(err, SimulationError::NonPositivePrice { .. }));
        //state is untouched on failure
        assert_eq!(state.total_invested, 0.0);
        assert_eq!(state.accumulated_cash, 10.0);
    }
}
