//! Canonical typed events and the commands the reducer emits in response.

use serde::{Deserialize, Serialize};

use crate::logging::{Domain, Level};

/// Milliseconds since mount of the page
pub type Timestamp = u64;

/// Handle for a scheduled animation timer
pub type TimerId = u64;

/// All inputs that can affect view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Lifecycle(LifecycleEvent),
    Pointer(PointerEvent),
    Click(ClickEvent),
    Viewport(ViewportEvent),
    Timer(TimerEvent),
    Resource(ResourceEvent),
}

impl Event {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::Lifecycle(e) => e.timestamp(),
            Event::Pointer(e) => e.timestamp(),
            Event::Click(e) => e.timestamp(),
            Event::Viewport(e) => e.timestamp(),
            Event::Timer(TimerEvent::Fired { ts, .. }) => *ts,
            Event::Resource(e) => e.timestamp(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Lifecycle(LifecycleEvent::Mount { .. }) => "mount",
            Event::Lifecycle(LifecycleEvent::Unmount { .. }) => "unmount",
            Event::Pointer(PointerEvent::Move { .. }) => "pointer_move",
            Event::Pointer(PointerEvent::Leave { .. }) => "pointer_leave",
            Event::Click(ClickEvent::Card { .. }) => "click_card",
            Event::Click(ClickEvent::Accordion { .. }) => "click_accordion",
            Event::Click(ClickEvent::EdgeSwitch { .. }) => "click_edge_switch",
            Event::Viewport(ViewportEvent::Enter { .. }) => "viewport_enter",
            Event::Viewport(ViewportEvent::Exit { .. }) => "viewport_exit",
            Event::Timer(_) => "timer",
            Event::Resource(ResourceEvent::LogoLoaded { .. }) => "logo_loaded",
            Event::Resource(ResourceEvent::LogoFailed { .. }) => "logo_failed",
        }
    }

    pub fn mount(ts: Timestamp) -> Self {
        Event::Lifecycle(LifecycleEvent::Mount { ts })
    }

    pub fn unmount(ts: Timestamp) -> Self {
        Event::Lifecycle(LifecycleEvent::Unmount { ts })
    }

    pub fn pointer_move(ts: Timestamp, x: f64, y: f64) -> Self {
        Event::Pointer(PointerEvent::Move { ts, x, y })
    }

    pub fn pointer_leave(ts: Timestamp) -> Self {
        Event::Pointer(PointerEvent::Leave { ts })
    }

    pub fn click_card(ts: Timestamp, id: &str) -> Self {
        Event::Click(ClickEvent::Card { ts, id: id.to_string() })
    }

    pub fn viewport_enter(ts: Timestamp, target: &str) -> Self {
        Event::Viewport(ViewportEvent::Enter { ts, target: target.to_string() })
    }

    pub fn viewport_exit(ts: Timestamp, target: &str) -> Self {
        Event::Viewport(ViewportEvent::Exit { ts, target: target.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Mount { ts: Timestamp },
    Unmount { ts: Timestamp },
}

impl LifecycleEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            LifecycleEvent::Mount { ts } => *ts,
            LifecycleEvent::Unmount { ts } => *ts,
        }
    }
}

/// Pointer activity over the chart surface, in surface pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { ts: Timestamp, x: f64, y: f64 },
    Leave { ts: Timestamp },
}

impl PointerEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            PointerEvent::Move { ts, .. } => *ts,
            PointerEvent::Leave { ts } => *ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClickEvent {
    Card { ts: Timestamp, id: String },
    Accordion { ts: Timestamp, item: String },
    EdgeSwitch { ts: Timestamp },
}

impl ClickEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            ClickEvent::Card { ts, .. } => *ts,
            ClickEvent::Accordion { ts, .. } => *ts,
            ClickEvent::EdgeSwitch { ts } => *ts,
        }
    }
}

/// Intersection signal for a reveal set's container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    Enter { ts: Timestamp, target: String },
    Exit { ts: Timestamp, target: String },
}

impl ViewportEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            ViewportEvent::Enter { ts, .. } => *ts,
            ViewportEvent::Exit { ts, .. } => *ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerEvent {
    Fired { ts: Timestamp, id: TimerId },
}

/// Completion of an asynchronous logo fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceEvent {
    LogoLoaded { ts: Timestamp, card: String },
    LogoFailed { ts: Timestamp, card: String },
}

impl ResourceEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            ResourceEvent::LogoLoaded { ts, .. } => *ts,
            ResourceEvent::LogoFailed { ts, .. } => *ts,
        }
    }
}

/// Commands emitted by the reducer, executed by a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    ScheduleTimer { id: TimerId, at: Timestamp },
    CancelTimer { id: TimerId },
    RequestLogo { card: String, logo_ref: String },
    /// Some slice changed; re-derive the render tree
    Render,
    Log { level: Level, domain: Domain, msg: String },
}

impl Command {
    pub fn log(level: Level, domain: Domain, msg: impl Into<String>) -> Self {
        Command::Log {
            level,
            domain,
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_dispatch() {
        assert_eq!(Event::mount(5).timestamp(), 5);
        assert_eq!(Event::pointer_move(7, 1.0, 2.0).timestamp(), 7);
        assert_eq!(Event::Timer(TimerEvent::Fired { ts: 9, id: 3 }).timestamp(), 9);
        assert_eq!(
            Event::Resource(ResourceEvent::LogoFailed { ts: 11, card: "OpenAI".into() }).timestamp(),
            11
        );
    }

    #[test]
    fn test_event_json_shape() {
        let ev: Event = serde_json::from_str(r#"{"Click":{"Card":{"ts":40,"id":"OpenAI"}}}"#).unwrap();
        assert_eq!(ev, Event::click_card(40, "OpenAI"));
        assert_eq!(ev.kind(), "click_card");
    }
}
