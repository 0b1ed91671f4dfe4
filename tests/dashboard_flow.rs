use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use once_cell::sync::Lazy;
use stock_dashboard_wasm::application::{DataRefresher, TickOutcome};
use stock_dashboard_wasm::domain::errors::{FetchFailure, FetchResult};
use stock_dashboard_wasm::domain::logging::{LogLevel, init_logger};
use stock_dashboard_wasm::domain::market_data::{IndexName, Quote, StockDataSource, StockPayload};
use stock_dashboard_wasm::infrastructure::services::MemoryLogger;
use stock_dashboard_wasm::presentation::view_model::{self, Tone};
use stock_dashboard_wasm::view_state::ViewState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

const SCENARIO_BODY: &str = r#"{
    "current": {
        "SP500": {"value": 4500, "change": -0.5},
        "NASDAQ": {"value": 15000, "change": 1.2},
        "DOW": {"value": 35000, "change": 0}
    },
    "historical": {
        "datetime": ["09:30"],
        "open": [4490],
        "high": [4510],
        "low": [4480],
        "close": [4500]
    }
}"#;

static LOGS: Lazy<MemoryLogger> = Lazy::new(|| {
    let logger = MemoryLogger::default();
    init_logger(Box::new(logger.clone()));
    logger
});

/// Hands out queued responses, one per fetch.
#[derive(Clone, Default)]
struct ScriptedSource {
    responses: Rc<RefCell<VecDeque<FetchResult<StockPayload>>>>,
}

impl ScriptedSource {
    fn push(&self, response: FetchResult<StockPayload>) {
        self.responses.borrow_mut().push_back(response);
    }
}

impl StockDataSource for ScriptedSource {
    async fn fetch_stock_data(&self) -> FetchResult<StockPayload> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchFailure::Network("no scripted response".to_string())))
    }
}

/// Each fetch waits on the next queued channel, so a test decides the
/// order in which responses arrive.
#[derive(Clone, Default)]
struct GatedSource {
    gates: Rc<RefCell<VecDeque<oneshot::Receiver<FetchResult<StockPayload>>>>>,
}

impl GatedSource {
    fn gate(&self) -> oneshot::Sender<FetchResult<StockPayload>> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }
}

impl StockDataSource for GatedSource {
    async fn fetch_stock_data(&self) -> FetchResult<StockPayload> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchFailure::Network("gate dropped".to_string()))),
            None => Err(FetchFailure::Network("no gate".to_string())),
        }
    }
}

fn scenario_payload() -> StockPayload {
    StockPayload::from_json(SCENARIO_BODY).unwrap()
}

fn payload_with_sp500(value: f64) -> StockPayload {
    StockPayload::from_json(&format!(r#"{{"current": {{"SP500": {{"value": {value}, "change": 0.1}}}}}}"#)).unwrap()
}

#[test]
fn defaults_then_scenario_payload() {
    let state = Rc::new(RefCell::new(ViewState::default()));

    let before = view_model::render(&state.borrow());
    for card in &before.cards {
        assert_eq!(card.value_text, "0");
        assert_eq!(card.change_text, "+0%");
        assert_eq!(card.tone, Tone::Positive);
    }
    assert!(before.chart.trace.is_empty());
    assert!(before.alert.is_some());

    let source = ScriptedSource::default();
    source.push(Ok(scenario_payload()));
    let refresher = DataRefresher::new(source, Rc::clone(&state));
    let outcome = block_on(refresher.fetch_and_update());
    assert!(matches!(outcome, TickOutcome::Applied(_)));

    let after = view_model::render(&state.borrow());
    let sp500 = &after.cards[0];
    assert_eq!(sp500.title, "S&P 500");
    assert_eq!(sp500.value_text, "4,500");
    assert_eq!(sp500.change_text, "-0.5%");
    assert_eq!(sp500.tone, Tone::Negative);
    assert_eq!(sp500.tone.css_class(), "negative");

    assert_eq!(after.chart.trace.len(), 1);
    assert_eq!(after.chart.trace.x[0].to_string(), "09:30");
    assert_eq!(after.chart.trace.open, [4490.0]);
    assert_eq!(after.chart.trace.high, [4510.0]);
    assert_eq!(after.chart.trace.low, [4480.0]);
    assert_eq!(after.chart.trace.close, [4500.0]);
}

#[test]
fn successful_fetch_replaces_state_verbatim() {
    let state = Rc::new(RefCell::new(ViewState::default()));
    let source = ScriptedSource::default();
    let payload = scenario_payload();
    source.push(Ok(payload.clone()));

    block_on(DataRefresher::new(source, Rc::clone(&state)).fetch_and_update());

    let state = state.borrow();
    assert_eq!(state.current, payload.current);
    assert_eq!(state.historical, payload.historical);
    assert!(state.alert_visible);
}

#[test]
fn failed_fetch_leaves_state_identical_and_is_logged() {
    let logs = Lazy::force(&LOGS);
    let state = Rc::new(RefCell::new(ViewState::default()));
    let source = ScriptedSource::default();
    source.push(Ok(scenario_payload()));
    source.push(Err(FetchFailure::HttpStatus { status: 503, status_text: "Service Unavailable".to_string() }));
    source.push(Err(FetchFailure::Network("connection reset".to_string())));

    let refresher = DataRefresher::new(source, Rc::clone(&state));
    block_on(refresher.fetch_and_update());
    let snapshot = state.borrow().clone();

    for _ in 0..2 {
        let outcome = block_on(refresher.fetch_and_update());
        assert!(matches!(outcome, TickOutcome::Failed { .. }));
        assert_eq!(*state.borrow(), snapshot);
    }

    assert!(logs.contains(LogLevel::Error, "Error fetching stock data"));
    assert!(logs.contains(LogLevel::Error, "HTTP error: 503 Service Unavailable"));
    assert!(logs.contains(LogLevel::Error, "connection reset"));
    assert!(logs.entries().iter().any(|entry| {
        entry.level == LogLevel::Error && entry.metadata.as_deref().is_some_and(|m| m.starts_with("tick=#"))
    }));
}

#[test]
fn rejected_payload_is_a_failure_not_an_update() {
    let state = Rc::new(RefCell::new(ViewState::default()));
    let source = ScriptedSource::default();
    source.push(StockPayload::from_json(r#"{"current": {"SP500": {"value": [4500], "change": 0}}}"#));
    source.push(StockPayload::from_json(
        r#"{"current": {}, "historical": {"datetime": ["09:30"], "open": [1, 2], "high": [1], "low": [1], "close": [1]}}"#,
    ));

    let refresher = DataRefresher::new(source, Rc::clone(&state));
    let decode = block_on(refresher.fetch_and_update());
    let misaligned = block_on(refresher.fetch_and_update());

    assert!(matches!(decode, TickOutcome::Failed { failure: FetchFailure::Decode(_), .. }));
    assert!(matches!(
        misaligned,
        TickOutcome::Failed { failure: FetchFailure::MisalignedSeries { open: 2, .. }, .. }
    ));
    assert_eq!(*state.borrow(), ViewState::default());
}

#[test]
fn slow_older_response_does_not_overwrite_newer_data() {
    let state = Rc::new(RefCell::new(ViewState::default()));
    let source = GatedSource::default();
    let first_gate = source.gate();
    let second_gate = source.gate();
    let refresher = DataRefresher::new(source, Rc::clone(&state));

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();
    // one task at a time, so tick #1 takes the first gate
    for _ in 0..2 {
        let refresher = refresher.clone();
        let outcomes = Rc::clone(&outcomes);
        let ticket = refresher.next_ticket();
        pool.spawner()
            .spawn_local(async move {
                let outcome = refresher.run_ticket(ticket).await;
                outcomes.borrow_mut().push(outcome);
            })
            .unwrap();
        pool.run_until_stalled();
    }

    // the newer tick answers first
    second_gate.send(Ok(payload_with_sp500(4600.0))).unwrap();
    pool.run_until_stalled();
    first_gate.send(Ok(payload_with_sp500(4400.0))).unwrap();
    pool.run();

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], TickOutcome::Applied(_)));
    assert!(matches!(outcomes[1], TickOutcome::Stale { .. }));
    assert_eq!(state.borrow().snapshot(IndexName::Sp500).value, Quote::Number(4600.0));
    assert_eq!(refresher.last_applied().map(|t| t.to_string()).as_deref(), Some("#2"));
}

#[test]
fn older_response_applies_when_newer_failed() {
    let state = Rc::new(RefCell::new(ViewState::default()));
    let source = GatedSource::default();
    let first_gate = source.gate();
    let second_gate = source.gate();
    let refresher = DataRefresher::new(source, Rc::clone(&state));

    let mut pool = LocalPool::new();
    for _ in 0..2 {
        let refresher = refresher.clone();
        let ticket = refresher.next_ticket();
        pool.spawner()
            .spawn_local(async move {
                refresher.run_ticket(ticket).await;
            })
            .unwrap();
        pool.run_until_stalled();
    }

    second_gate.send(Err(FetchFailure::Network("timeout".to_string()))).unwrap();
    first_gate.send(Ok(payload_with_sp500(4400.0))).unwrap();
    pool.run();

    assert_eq!(state.borrow().snapshot(IndexName::Sp500).value, Quote::Number(4400.0));
}
