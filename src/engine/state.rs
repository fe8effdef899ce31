//! View state with deterministic hashing for replay validation.

use anyhow::{Context, Result};

use super::accordion::Accordion;
use super::animation::AnimationOrchestrator;
use super::chart::ChartController;
use super::events::Timestamp;
use super::flip::FlipRegistry;
use super::resource::LogoRegistry;
use crate::config::ViewConfig;
use crate::data::Dataset;
use crate::render::reveal_plan;

/// Two-position switch, initially on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSwitch {
    pub on: bool,
}

impl Default for EdgeSwitch {
    fn default() -> Self {
        Self { on: true }
    }
}

impl EdgeSwitch {
    pub fn toggle(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    pub fn label(&self) -> &'static str {
        if self.on {
            "On (lower latency, less data egress)"
        } else {
            "Off"
        }
    }
}

/// Complete view state - hashable for replay validation.
///
/// Each slice has exactly one owner; the reducer only routes events.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Current logical time
    pub now: Timestamp,
    /// Events applied so far
    pub seq: u64,
    pub mounted: bool,
    pub torn_down: bool,

    pub chart: ChartController,
    pub flips: FlipRegistry,
    pub animation: AnimationOrchestrator,
    pub logos: LogoRegistry,
    pub accordion: Accordion,
    pub edge_routing: EdgeSwitch,
}

impl ViewState {
    pub fn new(dataset: &Dataset, cfg: &ViewConfig) -> Result<Self> {
        let mut animation = AnimationOrchestrator::new(cfg.stagger_unit_ms, cfg.enter_duration_ms);
        for set in reveal_plan(dataset) {
            let id = set.id.clone();
            animation
                .register(set)
                .with_context(|| format!("register reveal set {}", id))?;
        }
        Ok(Self {
            now: 0,
            seq: 0,
            mounted: false,
            torn_down: false,
            chart: ChartController::new(dataset, cfg),
            flips: FlipRegistry::new(dataset.provider_ids()),
            animation,
            logos: LogoRegistry::new(dataset.provider_ids()),
            accordion: Accordion::new(dataset.writeup.iter().map(|i| i.key.as_str())),
            edge_routing: EdgeSwitch::default(),
        })
    }

    /// Deterministic hash of every observable slice
    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut h = DefaultHasher::new();

        self.now.hash(&mut h);
        self.seq.hash(&mut h);
        self.mounted.hash(&mut h);
        self.torn_down.hash(&mut h);

        self.chart.active_index().hash(&mut h);

        // BTreeMap-backed slices iterate in key order
        for (id, flipped) in self.flips.iter() {
            id.hash(&mut h);
            flipped.hash(&mut h);
        }
        for (group, st) in self.animation.groups() {
            group.hash(&mut h);
            st.phase.hash(&mut h);
            st.entered_at.hash(&mut h);
            st.settled_at.hash(&mut h);
        }
        self.animation.pending_timers().hash(&mut h);
        for (card, st) in self.logos.iter() {
            card.hash(&mut h);
            st.hash(&mut h);
        }
        self.accordion.open_item().hash(&mut h);
        self.edge_routing.on.hash(&mut h);

        h.finish()
    }
}
