use crate::data::Bar;
use crate::engine::deployment::{AllocationDirective, DirectiveContext};
use crate::policy::DecisionPolicy;
use crate::portfolio::SimulationState;

//fixed-amount policy
//deploys the full accrued cash every day regardless of price, so under the
//engine's accrue-then-decide contract it invests exactly the daily budget
//each day and cash never idles
#[derive(Debug, Clone, Default)]
pub struct FixedAmountPolicy;

impl FixedAmountPolicy {
    pub fn new() -> Self {
        FixedAmountPolicy
    }
}

impl DecisionPolicy for FixedAmountPolicy {
    fn decide(&self, state: &mut SimulationState, _bar: &Bar) -> Option<AllocationDirective> {
        if state.accumulated_cash > 0.0 {
            Some(AllocationDirective::new(
                state.accumulated_cash,
                DirectiveContext::FixedSchedule,
            ))
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "Fixed Amount"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(close: f64) -> Bar {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        Bar::new_unchecked(date, close, close, close, close, 0.0)
    }

    #[test]
    fn deploys_the_full_accrual_every_day() {
        let policy = FixedAmountPolicy::new();
        let mut state = SimulationState::new();
        state.accrue(10.0);

        let directive = policy.decide(&mut state, &bar(100.0)).unwrap();
        assert_eq!(directive.amount, 10.0);
        assert_eq!(directive.context, DirectiveContext::FixedSchedule);
    }

    #[test]
    fn withholds_with_no_cash() {
        let policy = FixedAmountPolicy::new();
        let mut state = SimulationState::new();

        assert!(policy.decide(&mut state, &bar(100.0)).is_none());
    }
}
