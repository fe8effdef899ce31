//! Async driver on a single-threaded tokio runtime.
//!
//! Inputs arrive on an unbounded channel and are reduced one at a time.
//! Animation timers are tokio tasks sleeping until their deadline; logo
//! fetches go through a [`LogoLoader`] and post exactly one completion
//! event. Cancelling a timer aborts its task, and teardown aborts everything
//! still in flight.
//!
//! All methods that execute commands spawn tasks and must run inside a tokio
//! runtime.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Duration, Instant};

use crate::config::ViewConfig;
use crate::data::Dataset;
use crate::engine::events::{Command, Event, ResourceEvent, TimerEvent, TimerId, Timestamp};
use crate::engine::reducer::reduce;
use crate::engine::state::ViewState;
use crate::logging::{self, log, log_audit, obj, v_str, Domain, Level};
use crate::render::{render, PageView};

#[async_trait]
pub trait LogoLoader: Send + Sync {
    async fn load(&self, logo_ref: &str) -> Result<()>;
}

/// Serves a fixed set of refs after an optional delay; anything else fails.
pub struct StaticLogoLoader {
    available: HashSet<String>,
    latency: Duration,
}

impl StaticLogoLoader {
    pub fn new<'a>(available: impl IntoIterator<Item = &'a str>, latency: Duration) -> Self {
        Self {
            available: available.into_iter().map(str::to_string).collect(),
            latency,
        }
    }
}

#[async_trait]
impl LogoLoader for StaticLogoLoader {
    async fn load(&self, logo_ref: &str) -> Result<()> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        if self.available.contains(logo_ref) {
            Ok(())
        } else {
            anyhow::bail!("logo {} not found", logo_ref)
        }
    }
}

/// Cloneable sender for posting input events with mount-relative timestamps
#[derive(Clone)]
pub struct RuntimeHandle {
    tx: mpsc::UnboundedSender<Event>,
    epoch: Instant,
}

impl RuntimeHandle {
    pub fn now_ms(&self) -> Timestamp {
        self.epoch.elapsed().as_millis() as Timestamp
    }

    /// Returns false once the runtime is gone.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Build an event stamped with the current time and send it.
    pub fn post(&self, make: impl FnOnce(Timestamp) -> Event) -> bool {
        self.send(make(self.now_ms()))
    }
}

pub struct Runtime<L: LogoLoader + 'static> {
    dataset: Dataset,
    cfg: ViewConfig,
    state: ViewState,
    loader: Arc<L>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    epoch: Instant,
    timers: HashMap<TimerId, JoinHandle<()>>,
    fetches: Vec<JoinHandle<()>>,
    renders: u64,
}

impl<L: LogoLoader + 'static> Runtime<L> {
    pub fn new(dataset: Dataset, cfg: ViewConfig, loader: L) -> Result<Self> {
        cfg.validate()?;
        let state = ViewState::new(&dataset, &cfg)?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            dataset,
            cfg,
            state,
            loader: Arc::new(loader),
            tx,
            rx,
            epoch: Instant::now(),
            timers: HashMap::new(),
            fetches: Vec::new(),
            renders: 0,
        })
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            tx: self.tx.clone(),
            epoch: self.epoch,
        }
    }

    pub fn now_ms(&self) -> Timestamp {
        self.epoch.elapsed().as_millis() as Timestamp
    }

    /// Reduce one event and execute its commands. Returns the state hash.
    pub fn step(&mut self, event: Event) -> u64 {
        let kind = event.kind();
        if let Event::Timer(TimerEvent::Fired { id, .. }) = &event {
            self.timers.remove(id);
        }
        let out = reduce(&mut self.state, &self.dataset, event);
        log_audit(kind, self.state.seq, out.state_hash);
        for cmd in out.commands {
            self.execute(cmd);
        }
        self.fetches.retain(|h| !h.is_finished());
        if self.state.torn_down {
            self.shutdown();
        }
        out.state_hash
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::ScheduleTimer { id, at } => {
                let deadline = match self.epoch.checked_add(Duration::from_millis(at)) {
                    Some(d) => d,
                    None => {
                        log(
                            Level::Warn,
                            Domain::Runtime,
                            "timer_unschedulable",
                            obj(&[("timer_id", serde_json::json!(id)), ("at_ms", serde_json::json!(at))]),
                        );
                        return;
                    }
                };
                let tx = self.tx.clone();
                let task = tokio::spawn(async move {
                    sleep_until(deadline).await;
                    let _ = tx.send(Event::Timer(TimerEvent::Fired { ts: at, id }));
                });
                self.timers.insert(id, task);
            }
            Command::CancelTimer { id } => {
                if let Some(task) = self.timers.remove(&id) {
                    task.abort();
                }
            }
            Command::RequestLogo { card, logo_ref } => {
                let tx = self.tx.clone();
                let loader = Arc::clone(&self.loader);
                let epoch = self.epoch;
                let task = tokio::spawn(async move {
                    let outcome = loader.load(&logo_ref).await;
                    let ts = epoch.elapsed().as_millis() as Timestamp;
                    let event = match outcome {
                        Ok(()) => ResourceEvent::LogoLoaded { ts, card },
                        Err(_) => ResourceEvent::LogoFailed { ts, card },
                    };
                    let _ = tx.send(Event::Resource(event));
                });
                self.fetches.push(task);
            }
            Command::Render => self.renders += 1,
            Command::Log { level, domain, msg } => {
                logging::log(level, domain, "reducer", obj(&[("msg", v_str(&msg))]))
            }
        }
    }

    /// Wait for the next input, or `None` once `deadline` passes.
    async fn next_event(&mut self, deadline: Option<Instant>) -> Option<Event> {
        match deadline {
            Some(deadline) => tokio::select! {
                ev = self.rx.recv() => ev,
                _ = sleep_until(deadline) => None,
            },
            None => self.rx.recv().await,
        }
    }

    /// Process inputs until the view is torn down.
    pub async fn run(&mut self) {
        while !self.state.torn_down {
            match self.next_event(None).await {
                Some(event) => {
                    self.step(event);
                }
                None => break,
            }
        }
        log(Level::Info, Domain::Runtime, "stopped", obj(&[("at_ms", serde_json::json!(self.now_ms()))]));
    }

    /// Process inputs for a bounded stretch of time.
    pub async fn run_for(&mut self, dur: Duration) {
        let deadline = Instant::now() + dur;
        while !self.state.torn_down {
            match self.next_event(Some(deadline)).await {
                Some(event) => {
                    self.step(event);
                }
                None => break,
            }
        }
    }

    /// Abort every timer and fetch still in flight.
    pub fn shutdown(&mut self) {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
        for task in self.fetches.drain(..) {
            task.abort();
        }
    }

    pub fn view(&self) -> PageView {
        render(&self.state, &self.dataset, &self.cfg)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn in_flight_fetches(&self) -> usize {
        self.fetches.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

impl<L: LogoLoader + 'static> Drop for Runtime<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
