//! Deterministic driver: virtual clock, timer heap, manual logo completion.
//!
//! Used by tests and the replay binary. Every event goes through the FIFO
//! bus, then the reducer; commands are executed against the virtual timer
//! queue. Invariants are checked after every step.

use anyhow::Result;

use super::bus::{EventBus, TimerQueue};
use super::events::{Command, Event, ResourceEvent, TimerEvent, Timestamp};
use super::reducer::{reduce, ReducerOutput};
use super::state::ViewState;
use crate::config::ViewConfig;
use crate::data::Dataset;
use crate::logging::{self, log, log_audit, obj, v_str, Domain, Level};
use crate::render::{render, PageView};
use crate::verify::invariants::{check_view, InvariantViolation};

/// Outstanding logo fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoRequest {
    pub card: String,
    pub logo_ref: String,
}

pub struct Session {
    dataset: Dataset,
    cfg: ViewConfig,
    state: ViewState,
    bus: EventBus,
    timers: TimerQueue,
    clock: Timestamp,
    logo_requests: Vec<LogoRequest>,
    renders: u64,
    violations: Vec<InvariantViolation>,
    last_hash: u64,
}

impl Session {
    pub fn new(dataset: Dataset, cfg: ViewConfig) -> Result<Self> {
        cfg.validate()?;
        let state = ViewState::new(&dataset, &cfg)?;
        let last_hash = state.hash();
        Ok(Self {
            dataset,
            cfg,
            state,
            bus: EventBus::new(),
            timers: TimerQueue::new(),
            clock: 0,
            logo_requests: Vec::new(),
            renders: 0,
            violations: Vec::new(),
            last_hash,
        })
    }

    /// Queue an event and process the bus until it is empty.
    pub fn dispatch(&mut self, event: Event) -> u64 {
        self.bus.push(event);
        self.pump();
        self.last_hash
    }

    fn pump(&mut self) {
        while let Some(event) = self.bus.pop() {
            let kind = event.kind();
            self.clock = self.clock.max(event.timestamp());
            let before = self.state.animation.phases();
            let out = reduce(&mut self.state, &self.dataset, event);
            self.last_hash = out.state_hash;
            log_audit(kind, self.state.seq, out.state_hash);
            self.execute(out);
            for v in check_view(&before, &self.state, &self.dataset) {
                log(Level::Error, Domain::Audit, "invariant", obj(&[("msg", v_str(&v.msg))]));
                self.violations.push(v);
            }
        }
    }

    fn execute(&mut self, out: ReducerOutput) {
        for cmd in out.commands {
            match cmd {
                Command::ScheduleTimer { id, at } => self.timers.schedule(id, at),
                Command::CancelTimer { id } => self.timers.cancel(id),
                Command::RequestLogo { card, logo_ref } => {
                    self.logo_requests.push(LogoRequest { card, logo_ref })
                }
                Command::Render => self.renders += 1,
                Command::Log { level, domain, msg } => {
                    logging::log(level, domain, "reducer", obj(&[("msg", v_str(&msg))]))
                }
            }
        }
    }

    /// Move the virtual clock forward, firing due timers in deadline order.
    pub fn advance_to(&mut self, now: Timestamp) {
        while let Some((at, id)) = self.timers.pop_due(now) {
            self.dispatch(Event::Timer(TimerEvent::Fired { ts: at, id }));
        }
        self.clock = self.clock.max(now);
    }

    /// Advance far enough for every scheduled timer to fire.
    pub fn settle(&mut self) {
        let span = self
            .cfg
            .stagger_unit_ms
            .saturating_mul(self.state.animation.groups().count() as u64 + 1)
            .saturating_add(self.cfg.enter_duration_ms);
        let horizon = self.clock.saturating_add(span);
        self.advance_to(horizon);
    }

    /// Tear the view down at the current clock.
    pub fn unmount(&mut self) -> u64 {
        let ts = self.clock;
        self.dispatch(Event::unmount(ts))
    }

    /// Post the completion of a pending logo fetch.
    pub fn resolve_logo(&mut self, card: &str, ok: bool) -> bool {
        let pos = match self.logo_requests.iter().position(|r| r.card == card) {
            Some(p) => p,
            None => return false,
        };
        self.logo_requests.remove(pos);
        let ts = self.clock;
        let event = if ok {
            ResourceEvent::LogoLoaded { ts, card: card.to_string() }
        } else {
            ResourceEvent::LogoFailed { ts, card: card.to_string() }
        };
        self.dispatch(Event::Resource(event));
        true
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

    pub fn config(&self) -> &ViewConfig {
        &self.cfg
    }

    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn logo_requests(&self) -> &[LogoRequest] {
        &self.logo_requests
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    pub fn last_hash(&self) -> u64 {
        self.last_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::Phase;
    use crate::render::{CARD_SET, HEADER_SET};

    fn session() -> Session {
        Session::new(Dataset::builtin(), ViewConfig::default()).unwrap()
    }

    #[test]
    fn test_mount_settles_header() {
        let mut s = session();
        s.dispatch(Event::mount(0));
        assert_eq!(s.logo_requests().len(), 6);
        assert_eq!(s.state().animation.phase(HEADER_SET), Some(Phase::Entering));
        s.advance_to(499);
        assert_eq!(s.state().animation.phase(HEADER_SET), Some(Phase::Entering));
        s.advance_to(500);
        assert_eq!(s.state().animation.phase(HEADER_SET), Some(Phase::Settled));
        assert!(s.violations().is_empty());
    }

    #[test]
    fn test_cards_stagger_at_unit_offsets() {
        let mut s = session();
        s.dispatch(Event::mount(0));
        s.dispatch(Event::viewport_enter(1000, CARD_SET));
        s.settle();
        let entered: Vec<u64> = s
            .dataset()
            .providers
            .iter()
            .map(|p| {
                s.state()
                    .animation
                    .group(&format!("card:{}", p.id()))
                    .and_then(|g| g.entered_at)
                    .unwrap()
            })
            .collect();
        assert_eq!(entered, vec![1000, 1080, 1160, 1240, 1320, 1400]);
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn test_unmount_mid_entrance_leaves_no_timers() {
        let mut s = session();
        s.dispatch(Event::mount(0));
        s.dispatch(Event::viewport_enter(10, CARD_SET));
        s.advance_to(100);
        assert!(s.pending_timers() > 0);
        s.dispatch(Event::unmount(120));
        assert_eq!(s.pending_timers(), 0);
        let hash = s.last_hash();
        s.advance_to(10_000);
        assert_eq!(s.state().animation.phase("card:Eden AI"), Some(Phase::Hidden));
        assert_eq!(s.state().hash(), hash);
    }

    #[test]
    fn test_unmount_drops_pending_logo_completions() {
        let mut s = session();
        s.dispatch(Event::mount(0));
        s.unmount();
        assert!(s.state().torn_down);
        s.resolve_logo("OpenAI", true);
        assert_eq!(
            s.state().logos.state("OpenAI"),
            Some(crate::engine::resource::LoadState::Loading)
        );
    }

    #[test]
    fn test_timestamps_near_max_do_not_overflow() {
        let mut s = session();
        s.dispatch(Event::mount(u64::MAX - 10));
        s.dispatch(Event::viewport_enter(u64::MAX - 100, CARD_SET));
        s.settle();
        assert_eq!(s.state().animation.phase(HEADER_SET), Some(Phase::Settled));
        assert_eq!(s.state().animation.phase("card:OpenAI"), Some(Phase::Settled));
        assert_eq!(s.pending_timers(), 0);
        // Deadlines clamp at the clock ceiling, so late siblings share it.
        let last = s.state().animation.group("card:Eden AI").and_then(|g| g.entered_at);
        assert_eq!(last, Some(u64::MAX));
    }

    #[test]
    fn test_resolve_logo_failure_uses_placeholder() {
        let mut s = session();
        s.dispatch(Event::mount(0));
        assert!(s.resolve_logo("Eden AI", false));
        assert!(!s.resolve_logo("Eden AI", true));
        let view = s.view();
        let card = view.cards.iter().find(|c| c.id == "Eden AI").unwrap();
        assert_eq!(card.logo_src, s.config().placeholder_logo);
    }

    #[test]
    fn test_redundant_hover_not_rendered() {
        let mut s = session();
        let m = *s.state().chart.geometry().marker(2).unwrap();
        s.dispatch(Event::pointer_move(1, m.cx, m.cy));
        let renders = s.render_count();
        s.dispatch(Event::pointer_move(2, m.cx, m.cy + 1.0));
        assert_eq!(s.render_count(), renders);
    }
}
