pub mod below_moving_average;
pub mod dip_below_extreme;
pub mod fixed_amount;

use crate::data::Bar;
use crate::engine::deployment::AllocationDirective;
use crate::portfolio::SimulationState;

//decision policy interface that all policies must implement
//a policy is a pure function of the accumulated state and the current bar,
//it updates its trigger bookkeeping in the state and may direct a deployment
pub trait DecisionPolicy: Send {
    //decides whether to deploy capital on the current bar
    fn decide(&self, state: &mut SimulationState, bar: &Bar) -> Option<AllocationDirective>;

    //returns the policy name
    fn name(&self) -> &str;
}
