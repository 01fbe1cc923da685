use std::collections::VecDeque;

//fixed-capacity fifo of the most recent closing prices
//keeps a running sum so the mean is o(1) per push instead of re-summing
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWindow {
    prices: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl PriceWindow {
    //creates an empty window holding up to capacity closes
    pub fn new(capacity: usize) -> Self {
        PriceWindow {
            prices: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    //pushes the newest close, evicting the oldest once at capacity
    pub fn push(&mut self, close: f64) {
        if self.capacity == 0 {
            return;
        }

        if self.prices.len() == self.capacity {
            if let Some(evicted) = self.prices.pop_front() {
                self.sum -= evicted;
            }
        }

        self.prices.push_back(close);
        self.sum += close;
    }

    //returns true once capacity closes have been observed
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.prices.len() == self.capacity
    }

    //arithmetic mean of the window, None until the window is full
    pub fn mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.sum / self.capacity as f64)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_none_until_full() {
        let mut window = PriceWindow::new(3);
        window.push(10.0);
        assert_eq!(window.mean(), None);
        window.push(20.0);
        assert_eq!(window.mean(), None);
        window.push(30.0);
        assert_eq!(window.mean(), Some(20.0));
    }

    #[test]
    fn eviction_keeps_running_sum_exact() {
        let mut window = PriceWindow::new(3);
        for price in [10.0, 20.0, 30.0, 40.0, 50.0] {
            window.push(price);
        }
        //window is now [30, 40, 50]
        assert_eq!(window.len(), 3);
        assert_eq!(window.mean(), Some(40.0));
    }

    #[test]
    fn running_sum_matches_naive_mean_over_long_series() {
        let mut window = PriceWindow::new(20);
        let prices: Vec<f64> = (1..=500).map(|i| 100.0 + (i % 37) as f64 * 1.25).collect();

        for (i, &price) in prices.iter().enumerate() {
            window.push(price);

            if i + 1 >= 20 {
                let naive: f64 = prices[i + 1 - 20..=i].iter().sum::<f64>() / 20.0;
                let fast = window.mean().unwrap();
                assert!((fast - naive).abs() < 1e-9, "diverged at index {}", i);
            }
        }
    }

    #[test]
    fn zero_capacity_window_never_fills() {
        let mut window = PriceWindow::new(0);
        window.push(10.0);
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
    }
}
