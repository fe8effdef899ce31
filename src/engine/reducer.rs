//! Pure reducer: (State, Event) -> (State, Vec<Command>)
//!
//! All view-state transitions happen here. Each event touches exactly one
//! slice; the reducer never couples slices (hovering does not flip, flipping
//! does not move the hover, and neither touches the reveal phases).
//!
//! Invalid interactions (unknown card, unknown reveal set, stale timer) are
//! logged and otherwise ignored.

use super::events::*;
use super::state::ViewState;
use crate::data::Dataset;
use crate::logging::{Domain, Level};

/// Result of processing an event
#[derive(Debug)]
pub struct ReducerOutput {
    pub commands: Vec<Command>,
    /// Some slice changed and the render tree must be re-derived
    pub changed: bool,
    pub state_hash: u64,
}

/// Apply one event to the view state
pub fn reduce(state: &mut ViewState, dataset: &Dataset, event: Event) -> ReducerOutput {
    let mut commands = Vec::new();

    // Nothing mutates after teardown, not even the clock
    if state.torn_down {
        return ReducerOutput {
            commands,
            changed: false,
            state_hash: state.hash(),
        };
    }

    // Update logical time
    state.now = state.now.max(event.timestamp());
    state.seq += 1;

    let changed = match event {
        Event::Lifecycle(e) => handle_lifecycle(state, dataset, e, &mut commands),
        Event::Pointer(e) => handle_pointer(state, e, &mut commands),
        Event::Click(e) => handle_click(state, e, &mut commands),
        Event::Viewport(e) => handle_viewport(state, e, &mut commands),
        Event::Timer(TimerEvent::Fired { ts, id }) => handle_timer(state, ts, id, &mut commands),
        Event::Resource(e) => handle_resource(state, e, &mut commands),
    };

    if changed {
        commands.push(Command::Render);
    }

    ReducerOutput {
        commands,
        changed,
        state_hash: state.hash(),
    }
}

fn handle_lifecycle(
    state: &mut ViewState,
    dataset: &Dataset,
    event: LifecycleEvent,
    commands: &mut Vec<Command>,
) -> bool {
    match event {
        LifecycleEvent::Mount { ts } => {
            if state.mounted {
                commands.push(Command::log(Level::Warn, Domain::Runtime, "mount received twice"));
                return false;
            }
            state.mounted = true;
            for p in &dataset.providers {
                commands.push(Command::RequestLogo {
                    card: p.id().to_string(),
                    logo_ref: p.logo_ref.clone(),
                });
            }
            commands.extend(state.animation.on_mount(ts));
            commands.push(Command::log(
                Level::Info,
                Domain::Runtime,
                format!("mounted at {} with {} cards", ts, dataset.providers.len()),
            ));
            true
        }
        LifecycleEvent::Unmount { ts } => {
            let cancels = state.animation.teardown();
            commands.push(Command::log(
                Level::Info,
                Domain::Runtime,
                format!("unmounted at {}, cancelling {} timers", ts, cancels.len()),
            ));
            commands.extend(cancels);
            state.torn_down = true;
            true
        }
    }
}

fn handle_pointer(state: &mut ViewState, event: PointerEvent, commands: &mut Vec<Command>) -> bool {
    match event {
        PointerEvent::Move { x, y, .. } => {
            if !x.is_finite() || !y.is_finite() {
                commands.push(Command::log(
                    Level::Debug,
                    Domain::Chart,
                    "non-finite pointer position treated as no match",
                ));
            }
            state.chart.on_pointer_move(x, y)
        }
        PointerEvent::Leave { .. } => state.chart.on_pointer_leave(),
    }
}

fn handle_click(state: &mut ViewState, event: ClickEvent, commands: &mut Vec<Command>) -> bool {
    match event {
        ClickEvent::Card { id, .. } => match state.flips.toggle(&id) {
            Ok(flipped) => {
                commands.push(Command::log(
                    Level::Debug,
                    Domain::Flip,
                    format!("card {} flipped={}", id, flipped),
                ));
                true
            }
            Err(err) => {
                commands.push(Command::log(Level::Warn, Domain::Flip, err.to_string()));
                false
            }
        },
        ClickEvent::Accordion { item, .. } => match state.accordion.activate(&item) {
            Ok(open) => {
                let msg = format!("write-up open item: {}", open.unwrap_or("none"));
                commands.push(Command::log(Level::Debug, Domain::Accordion, msg));
                true
            }
            Err(unknown) => {
                commands.push(Command::log(
                    Level::Warn,
                    Domain::Accordion,
                    format!("no write-up item {:?}", unknown),
                ));
                false
            }
        },
        ClickEvent::EdgeSwitch { .. } => {
            let on = state.edge_routing.toggle();
            commands.push(Command::log(Level::Debug, Domain::Switch, format!("edge routing on={}", on)));
            true
        }
    }
}

fn handle_viewport(state: &mut ViewState, event: ViewportEvent, commands: &mut Vec<Command>) -> bool {
    match event {
        ViewportEvent::Enter { ts, target } => match state.animation.on_viewport_enter(&target, ts) {
            Ok(cmds) => {
                let fired = !cmds.is_empty();
                commands.extend(cmds);
                fired
            }
            Err(err) => {
                commands.push(Command::log(Level::Warn, Domain::Animation, err.to_string()));
                false
            }
        },
        // Reveal is one-shot; leaving the viewport never hides a group again.
        ViewportEvent::Exit { .. } => false,
    }
}

fn handle_timer(state: &mut ViewState, ts: Timestamp, id: TimerId, commands: &mut Vec<Command>) -> bool {
    match state.animation.on_timer(id, ts) {
        Some(cmds) => {
            commands.extend(cmds);
            true
        }
        None => {
            commands.push(Command::log(
                Level::Trace,
                Domain::Animation,
                format!("stale timer {} ignored", id),
            ));
            false
        }
    }
}

fn handle_resource(state: &mut ViewState, event: ResourceEvent, commands: &mut Vec<Command>) -> bool {
    let (card, ok) = match event {
        ResourceEvent::LogoLoaded { card, .. } => (card, true),
        ResourceEvent::LogoFailed { card, .. } => (card, false),
    };
    match state.logos.complete(&card, ok) {
        Some(true) => {
            if !ok {
                commands.push(Command::log(
                    Level::Debug,
                    Domain::Resource,
                    format!("logo for {} failed, using placeholder", card),
                ));
            }
            true
        }
        Some(false) => false,
        None => {
            commands.push(Command::log(
                Level::Warn,
                Domain::Resource,
                format!("logo completion for unknown card {}", card),
            ));
            false
        }
    }
}
