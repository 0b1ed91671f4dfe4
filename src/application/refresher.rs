//! Periodic refresh of the dashboard's view state.
//!
//! One tick = fetch the payload, then replace the view state with it. A
//! tick runs at start and then on every interval until the returned
//! [`RefreshHandle`] is stopped or dropped. Failures are logged and leave
//! the state alone; the next tick is the only retry.

use crate::domain::errors::FetchFailure;
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::domain::market_data::StockDataSource;
use crate::view_state::ViewStateStore;
use crate::{log_debug, log_info};
use derive_more::Display;
use futures::future::{AbortHandle, Abortable};
use gloo_timers::callback::Interval;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

const COMPONENT: LogComponent = LogComponent::Application("Refresher");

/// Sequence number of one tick, in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "#{}", _0)]
pub struct Ticket(u64);

/// Orders overlapping ticks: a response is applied only when its ticket is
/// newer than the last one applied, so a slow old response can never
/// overwrite fresher data.
#[derive(Debug, Default)]
pub struct RefreshSequence {
    last_issued: u64,
    last_applied: Option<Ticket>,
}

impl RefreshSequence {
    pub fn issue(&mut self) -> Ticket {
        self.last_issued += 1;
        Ticket(self.last_issued)
    }

    /// Mark `ticket` as applied, or return the newer ticket that wins.
    pub fn claim(&mut self, ticket: Ticket) -> Result<(), Ticket> {
        match self.last_applied {
            Some(applied) if ticket <= applied => Err(applied),
            _ => {
                self.last_applied = Some(ticket);
                Ok(())
            }
        }
    }

    pub fn last_applied(&self) -> Option<Ticket> {
        self.last_applied
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Applied(Ticket),
    Stale { ticket: Ticket, newest: Ticket },
    Failed { ticket: Ticket, failure: FetchFailure },
}

struct RefreshTask<S, T> {
    source: S,
    store: T,
    sequence: RefCell<RefreshSequence>,
}

/// Fetches from `S` and writes into `T`. Cheap to clone; clones share the
/// same ticket sequence.
pub struct DataRefresher<S, T> {
    task: Rc<RefreshTask<S, T>>,
}

impl<S, T> Clone for DataRefresher<S, T> {
    fn clone(&self) -> Self {
        Self { task: Rc::clone(&self.task) }
    }
}

impl<S, T> DataRefresher<S, T>
where
    S: StockDataSource + 'static,
    T: ViewStateStore + 'static,
{
    pub fn new(source: S, store: T) -> Self {
        Self {
            task: Rc::new(RefreshTask {
                source,
                store,
                sequence: RefCell::new(RefreshSequence::default()),
            }),
        }
    }

    pub fn next_ticket(&self) -> Ticket {
        self.task.sequence.borrow_mut().issue()
    }

    pub fn last_applied(&self) -> Option<Ticket> {
        self.task.sequence.borrow().last_applied()
    }

    /// One full tick under a fresh ticket.
    pub async fn fetch_and_update(&self) -> TickOutcome {
        let ticket = self.next_ticket();
        self.run_ticket(ticket).await
    }

    /// Run a tick for a ticket issued earlier with [`Self::next_ticket`].
    pub async fn run_ticket(&self, ticket: Ticket) -> TickOutcome {
        let task = &self.task;
        match task.source.fetch_stock_data().await {
            Ok(payload) => {
                let claim = task.sequence.borrow_mut().claim(ticket);
                match claim {
                    Ok(()) => {
                        let candles = payload.historical.len();
                        task.store.replace_data(payload);
                        log_info!(COMPONENT, "Stock data updated by tick {} ({} candles)", ticket, candles);
                        TickOutcome::Applied(ticket)
                    }
                    Err(newest) => {
                        log_debug!(
                            COMPONENT,
                            "Dropping response of tick {}: tick {} already applied",
                            ticket,
                            newest
                        );
                        TickOutcome::Stale { ticket, newest }
                    }
                }
            }
            Err(failure) => {
                get_logger().log_with_metadata(
                    LogLevel::Error,
                    COMPONENT,
                    &format!("Error fetching stock data: {}", failure),
                    &format!("tick={}", ticket),
                );
                TickOutcome::Failed { ticket, failure }
            }
        }
    }

    /// Run a tick now, then one every `interval_ms`, until the handle is
    /// stopped.
    pub fn start(self, interval_ms: u32) -> RefreshHandle {
        let inflight = Rc::new(InflightFetches::default());
        spawn_tick(&self, &inflight);

        let tick_inflight = Rc::clone(&inflight);
        let interval = Interval::new(interval_ms, move || spawn_tick(&self, &tick_inflight));

        log_info!(COMPONENT, "Refresh started, every {} ms", interval_ms);
        RefreshHandle { interval: Some(interval), inflight }
    }
}

fn spawn_tick<S, T>(refresher: &DataRefresher<S, T>, inflight: &Rc<InflightFetches>)
where
    S: StockDataSource + 'static,
    T: ViewStateStore + 'static,
{
    if inflight.is_stopped() {
        return;
    }
    let ticket = refresher.next_ticket();
    let (abort_handle, registration) = AbortHandle::new_pair();
    inflight.register(ticket, abort_handle);

    let refresher = refresher.clone();
    let inflight = Rc::clone(inflight);
    spawn_local(async move {
        let tick = refresher.run_ticket(ticket);
        if Abortable::new(tick, registration).await.is_err() {
            log_debug!(COMPONENT, "Tick {} aborted", ticket);
        }
        inflight.release(ticket);
    });
}

#[derive(Default)]
struct InflightFetches {
    handles: RefCell<HashMap<Ticket, AbortHandle>>,
    stopped: Cell<bool>,
}

impl InflightFetches {
    fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    fn register(&self, ticket: Ticket, handle: AbortHandle) {
        self.handles.borrow_mut().insert(ticket, handle);
    }

    fn release(&self, ticket: Ticket) {
        self.handles.borrow_mut().remove(&ticket);
    }

    fn abort_all(&self) -> usize {
        self.stopped.set(true);
        let handles: Vec<AbortHandle> = self.handles.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }
}

/// Live refresh loop. Stopping (or dropping) cancels the timer and aborts
/// any fetch still in flight, so nothing touches the state afterwards.
pub struct RefreshHandle {
    interval: Option<Interval>,
    inflight: Rc<InflightFetches>,
}

impl RefreshHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(interval) = self.interval.take() {
            drop(interval);
            let aborted = self.inflight.abort_all();
            log_info!(COMPONENT, "Refresh stopped ({} in-flight fetch(es) aborted)", aborted);
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
