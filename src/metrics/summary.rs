use crate::data::Bar;
use crate::engine::deployment::AllocationEvent;
use crate::metrics::timeseries::ValuationSnapshot;
use crate::portfolio::SimulationState;
use chrono::{DateTime, Utc};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//one purchase singled out by the summary (first, last, best, worst)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseRef {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub units: f64,
}

impl PurchaseRef {
    fn from_event(event: &AllocationEvent) -> Self {
        PurchaseRef {
            date: event.date,
            price: event.price,
            units: event.units,
        }
    }
}

//summary metrics for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_invested: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub return_percentage: f64,
    pub total_holding: f64,
    pub average_cost_basis: f64,
    pub accumulated_cash: f64,
    pub final_price: f64,
    pub num_purchases: usize,
    pub num_days: usize,
    pub first_purchase: Option<PurchaseRef>,
    pub last_purchase: Option<PurchaseRef>,
    pub best_purchase: Option<PurchaseRef>,
    pub worst_purchase: Option<PurchaseRef>,
}

impl SummaryMetrics {
    //calculates summary metrics from a run's events, valuations and final state
    //pure over its inputs, recomputable any number of times
    pub fn from_run(
        events: &[AllocationEvent],
        valuations: &[ValuationSnapshot],
        state: &SimulationState,
        final_bar: Option<&Bar>,
    ) -> Self {
        let final_price = final_bar.map(|bar| bar.close).unwrap_or(0.0);
        let final_value = state.portfolio_value(final_price);
        let total_return = final_value - state.total_invested;

        //idle cash is excluded from return, zero divisors produce zero
        let return_percentage = if state.total_invested > 0.0 {
            total_return / state.total_invested * 100.0
        } else {
            0.0
        };

        let average_cost_basis = if state.total_holding > 0.0 {
            state.total_invested / state.total_holding
        } else {
            0.0
        };

        //extremal purchases by linear scan, first occurrence wins ties
        let mut best: Option<&AllocationEvent> = None;
        let mut worst: Option<&AllocationEvent> = None;
        for event in events {
            if best.map_or(true, |b| event.price < b.price) {
                best = Some(event);
            }
            if worst.map_or(true, |w| event.price > w.price) {
                worst = Some(event);
            }
        }

        SummaryMetrics {
            total_invested: state.total_invested,
            final_value,
            total_return,
            return_percentage,
            total_holding: state.total_holding,
            average_cost_basis,
            accumulated_cash: state.accumulated_cash,
            final_price,
            num_purchases: events.len(),
            num_days: valuations.len(),
            first_purchase: events.first().map(PurchaseRef::from_event),
            last_purchase: events.last().map(PurchaseRef::from_event),
            best_purchase: best.map(PurchaseRef::from_event),
            worst_purchase: worst.map(PurchaseRef::from_event),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Days"),
            Cell::new(&format!("{}", self.num_days)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Purchases"),
            Cell::new(&format!("{}", self.num_purchases)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Invested"),
            Cell::new(&format!("${:.2}", self.total_invested)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Cash Still Accumulating"),
            Cell::new(&format!("${:.2}", self.accumulated_cash)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Units Held"),
            Cell::new(&format!("{:.8}", self.total_holding)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Average Purchase Price"),
            Cell::new(&format!("${:.2}", self.average_cost_basis)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Price"),
            Cell::new(&format!("${:.2}", self.final_price)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Portfolio Value"),
            Cell::new(&format!("${:.2}", self.final_value)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!("${:.2}", self.total_return)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Return Percentage"),
            Cell::new(&format!("{:.2}%", self.return_percentage)),
        ]));

        if let Some(first) = &self.first_purchase {
            table.add_row(Row::new(vec![
                Cell::new("First Purchase"),
                Cell::new(&format!("{} at ${:.2}", first.date.date_naive(), first.price)),
            ]));
        }

        if let Some(last) = &self.last_purchase {
            table.add_row(Row::new(vec![
                Cell::new("Last Purchase"),
                Cell::new(&format!("{} at ${:.2}", last.date.date_naive(), last.price)),
            ]));
        }

        table.printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::deployment::DirectiveContext;
    use chrono::TimeZone;

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap()
    }

    fn event(day: u32, price: f64, amount: f64, number: usize) -> AllocationEvent {
        AllocationEvent {
            date: date(day),
            price,
            amount,
            units: amount / price,
            total_holding: 0.0,
            total_invested: 0.0,
            purchase_number: number,
            context: DirectiveContext::FixedSchedule,
        }
    }

    #[test]
    fn empty_run_yields_zero_valued_summary() {
        let state = SimulationState::new();
        let summary = SummaryMetrics::from_run(&[], &[], &state, None);

        assert_eq!(summary.total_invested, 0.0);
        assert_eq!(summary.final_value, 0.0);
        assert_eq!(summary.return_percentage, 0.0);
        assert_eq!(summary.average_cost_basis, 0.0);
        assert_eq!(summary.num_days, 0);
        assert!(summary.first_purchase.is_none());
        assert!(summary.best_purchase.is_none());
    }

    #[test]
    fn zero_holding_guards_cost_basis() {
        let mut state = SimulationState::new();
        state.accrue(10.0);

        let bar = Bar::new_unchecked(date(1), 100.0, 100.0, 100.0, 100.0, 0.0);
        let summary = SummaryMetrics::from_run(&[], &[], &state, Some(&bar));

        //idle cash is excluded from return
        assert_eq!(summary.final_value, 10.0);
        assert_eq!(summary.total_return, 10.0);
        assert_eq!(summary.return_percentage, 0.0);
        assert_eq!(summary.average_cost_basis, 0.0);
    }

    #[test]
    fn extremal_purchases_break_ties_by_first_occurrence() {
        let events = vec![
            event(1, 100.0, 1.0, 1),
            event(2, 80.0, 1.0, 2),
            event(3, 80.0, 1.0, 3),
            event(4, 120.0, 1.0, 4),
            event(5, 120.0, 1.0, 5),
        ];

        let state = SimulationState::new();
        let summary = SummaryMetrics::from_run(&events, &[], &state, None);

        assert_eq!(summary.best_purchase.as_ref().unwrap().date, date(2));
        assert_eq!(summary.worst_purchase.as_ref().unwrap().date, date(4));
        assert_eq!(summary.first_purchase.as_ref().unwrap().date, date(1));
        assert_eq!(summary.last_purchase.as_ref().unwrap().date, date(5));
    }
}
