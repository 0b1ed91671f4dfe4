use crate::domain::market_data::{
    CurrentIndices, HistoricalSeries, IndexName, IndexSnapshot, StockPayload,
};
use std::cell::RefCell;
use std::rc::Rc;

/// The banner is on unless something turns it off; nothing does yet.
pub const DEFAULT_ALERT_VISIBLE: bool = true;

/// Everything the dashboard renders from.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub current: CurrentIndices,
    pub historical: HistoricalSeries,
    pub alert_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current: CurrentIndices::default(),
            historical: HistoricalSeries::default(),
            alert_visible: DEFAULT_ALERT_VISIBLE,
        }
    }
}

impl ViewState {
    /// Swap in a fetched payload wholesale. The alert flag is untouched.
    pub fn replace_data(&mut self, payload: StockPayload) {
        let StockPayload { current, historical } = payload;
        self.current = current;
        self.historical = historical;
    }

    pub fn snapshot(&self, name: IndexName) -> IndexSnapshot {
        self.current.snapshot_or_default(name)
    }
}

/// Owner of the live [`ViewState`] that the refresher writes into.
pub trait ViewStateStore {
    fn replace_data(&self, payload: StockPayload);
}

impl ViewStateStore for Rc<RefCell<ViewState>> {
    fn replace_data(&self, payload: StockPayload) {
        self.borrow_mut().replace_data(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::DEFAULT_SNAPSHOT;

    #[test]
    fn defaults_are_zeroed_with_alert_on() {
        let state = ViewState::default();
        assert!(state.alert_visible);
        assert!(state.historical.is_empty());
        assert_eq!(state.snapshot(IndexName::Sp500), DEFAULT_SNAPSHOT);
    }

    #[test]
    fn replace_is_wholesale_not_merge() {
        let mut state = ViewState::default();
        let mut current = CurrentIndices::new(Default::default());
        current.insert(IndexName::Nasdaq, IndexSnapshot::new(15_000.0, 1.2));
        let mut historical = HistoricalSeries::default();
        historical.push("09:30", 1.0, 2.0, 0.5, 1.5);

        state.replace_data(StockPayload { current: current.clone(), historical: historical.clone() });

        assert_eq!(state.current, current);
        assert_eq!(state.historical, historical);
        // SP500 was dropped by the payload, so it reads as the default again
        assert!(state.current.get(IndexName::Sp500).is_none());
        assert_eq!(state.snapshot(IndexName::Sp500), DEFAULT_SNAPSHOT);
        assert!(state.alert_visible);
    }
}
