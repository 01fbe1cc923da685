use crate::data::Bar;
use crate::engine::deployment::{AllocationDirective, DirectiveContext};
use crate::policy::DecisionPolicy;
use crate::portfolio::{PriceWindow, SimulationState};

//below-moving-average policy
//maintains a trailing window of the last `window` closes (including today's)
//and deploys the full accrued cash when the close is strictly below the mean;
//inactive until the window fills
#[derive(Debug, Clone)]
pub struct BelowMovingAveragePolicy {
    window: usize,
}

impl BelowMovingAveragePolicy {
    pub fn new(window: usize) -> Self {
        BelowMovingAveragePolicy { window }
    }
}

impl DecisionPolicy for BelowMovingAveragePolicy {
    fn decide(&self, state: &mut SimulationState, bar: &Bar) -> Option<AllocationDirective> {
        let window = state
            .window
            .get_or_insert_with(|| PriceWindow::new(self.window));
        window.push(bar.close);

        //withholds until enough closes have been observed
        let average = window.mean()?;

        //strictly below the average, never on equality
        if bar.close < average && state.accumulated_cash > 0.0 {
            Some(AllocationDirective::new(
                state.accumulated_cash,
                DirectiveContext::BelowAverage { average },
            ))
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "Below Moving Average"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(day: u32, close: f64) -> Bar {
        let date = Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap();
        Bar::new_unchecked(date, close, close, close, close, 0.0)
    }

    #[test]
    fn inactive_until_the_window_fills() {
        let policy = BelowMovingAveragePolicy::new(3);
        let mut state = SimulationState::new();

        //closes keep falling, which would trigger once active
        for (day, close) in [(1, 100.0), (2, 90.0)] {
            state.accrue(1.0);
            assert!(policy.decide(&mut state, &bar(day, close)).is_none());
        }

        //third close fills the window, average is 90, close 80 is below
        state.accrue(1.0);
        let directive = policy.decide(&mut state, &bar(3, 80.0)).unwrap();
        assert_eq!(directive.amount, 3.0);
        assert_eq!(
            directive.context,
            DirectiveContext::BelowAverage { average: 90.0 }
        );
    }

    #[test]
    fn average_includes_todays_close() {
        let policy = BelowMovingAveragePolicy::new(2);
        let mut state = SimulationState::new();

        state.accrue(1.0);
        assert!(policy.decide(&mut state, &bar(1, 100.0)).is_none());

        //average of [100, 90] is 95, close 90 is below it
        state.accrue(1.0);
        let directive = policy.decide(&mut state, &bar(2, 90.0)).unwrap();
        assert_eq!(
            directive.context,
            DirectiveContext::BelowAverage { average: 95.0 }
        );
    }

    #[test]
    fn equality_with_the_average_withholds() {
        let policy = BelowMovingAveragePolicy::new(2);
        let mut state = SimulationState::new();

        state.accrue(1.0);
        assert!(policy.decide(&mut state, &bar(1, 100.0)).is_none());

        //average of [100, 100] equals the close, strict comparison withholds
        state.accrue(1.0);
        assert!(policy.decide(&mut state, &bar(2, 100.0)).is_none());
    }

    #[test]
    fn withholds_without_cash_and_still_advances_the_window() {
        let policy = BelowMovingAveragePolicy::new(2);
        let mut state = SimulationState::new();

        assert!(policy.decide(&mut state, &bar(1, 100.0)).is_none());
        assert!(policy.decide(&mut state, &bar(2, 50.0)).is_none());
        assert_eq!(state.window.as_ref().unwrap().len(), 2);
    }
}
