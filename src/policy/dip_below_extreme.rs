use crate::data::Bar;
use crate::engine::deployment::{AllocationDirective, DirectiveContext};
use crate::policy::DecisionPolicy;
use crate::portfolio::SimulationState;

//dip-below-extreme policy
//tracks the running maximum of bar highs and deploys the full accrued cash
//when the close is at least dip_fraction below that extreme
#[derive(Debug, Clone)]
pub struct DipBelowExtremePolicy {
    dip_fraction: f64,
}

impl DipBelowExtremePolicy {
    pub fn new(dip_fraction: f64) -> Self {
        DipBelowExtremePolicy { dip_fraction }
    }
}

impl DecisionPolicy for DipBelowExtremePolicy {
    fn decide(&self, state: &mut SimulationState, bar: &Bar) -> Option<AllocationDirective> {
        //the extreme must reflect today's high before the threshold is computed
        state.observe_high(bar.high);

        if state.running_extreme <= 0.0 || state.accumulated_cash <= 0.0 {
            return None;
        }

        let threshold = state.running_extreme * (1.0 - self.dip_fraction);

        //triggers on equality at the threshold
        if bar.close <= threshold {
            let dip_pct = (state.running_extreme - bar.close) / state.running_extreme * 100.0;

            Some(AllocationDirective::new(
                state.accumulated_cash,
                DirectiveContext::DipFromExtreme {
                    extreme: state.running_extreme,
                    dip_pct,
                },
            ))
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "Dip Below Extreme"
    }
}
