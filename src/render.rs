//! Render tree: a pure function of view state plus the static dataset.
//!
//! Also owns the reveal plan, since the visual group ids it registers are the
//! same ids the tree reports phases for.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ViewConfig;
use crate::data::{Dataset, LinkRecord};
use crate::engine::animation::{Phase, RevealSet, Trigger};
use crate::engine::chart::{format_readout, format_value, tooltip_label};
use crate::engine::flip::Face;
use crate::engine::resource::{display_ref, LoadState};
use crate::engine::state::ViewState;

pub const HEADER_SET: &str = "header";
pub const WRITEUP_SET: &str = "writeup";
pub const ACTION_PLAN_SET: &str = "action-plan";
pub const MARKET_SET: &str = "market";
pub const CARD_SET: &str = "providers";
pub const BUSINESS_SET: &str = "business-models";
pub const TEAM_SET: &str = "team";
pub const SOURCES_SET: &str = "sources";

const ACTION_PLAN_COLUMNS: [&str; 3] = ["architecture", "kpis", "governance"];
const BACK_HINT: &str = "Click again to flip back";

pub fn card_group(id: &str) -> String {
    format!("card:{}", id)
}

fn indexed(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}:{}", prefix, i)).collect()
}

/// Entrance plan for the poster, in page order.
pub fn reveal_plan(dataset: &Dataset) -> Vec<RevealSet> {
    vec![
        RevealSet::single(HEADER_SET, Trigger::OnMount),
        RevealSet::new(
            WRITEUP_SET,
            Trigger::OnFirstViewportEntry,
            dataset.writeup.iter().map(|i| format!("writeup:{}", i.key)).collect(),
        ),
        RevealSet::new(
            ACTION_PLAN_SET,
            Trigger::OnFirstViewportEntry,
            ACTION_PLAN_COLUMNS.iter().map(|c| format!("action-plan:{}", c)).collect(),
        ),
        RevealSet::single(MARKET_SET, Trigger::OnFirstViewportEntry),
        RevealSet::new(
            CARD_SET,
            Trigger::OnFirstViewportEntry,
            dataset.provider_ids().map(card_group).collect(),
        ),
        RevealSet::new(
            BUSINESS_SET,
            Trigger::OnFirstViewportEntry,
            indexed("business-model", dataset.business_models.len()),
        ),
        RevealSet::new(TEAM_SET, Trigger::OnFirstViewportEntry, indexed("team", dataset.team.len())),
        RevealSet::new(
            SOURCES_SET,
            Trigger::OnFirstViewportEntry,
            indexed("source", dataset.references.len()),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub year: i32,
    pub value: f64,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipView {
    pub label: String,
    pub value: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub y_max: f64,
    pub markers: Vec<MarkerView>,
    pub readout: Option<String>,
    pub tooltip: Option<TooltipView>,
    pub sources: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub face: Face,
    pub rotate_y_deg: u16,
    pub transition_ms: u64,
    pub logo_src: String,
    pub logo_state: LoadState,
    pub site_url: String,
    pub back_title: String,
    pub insights: Vec<String>,
    pub back_hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteupView {
    pub key: String,
    pub title: String,
    pub body: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchView {
    pub on: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub groups: BTreeMap<String, Phase>,
    pub writeup: Vec<WriteupView>,
    pub chart: ChartView,
    pub cards: Vec<CardView>,
    pub business_models: Vec<String>,
    pub edge_routing: SwitchView,
    pub team: Vec<String>,
    pub references: Vec<LinkRecord>,
}

fn render_chart(state: &ViewState, dataset: &Dataset, cfg: &ViewConfig) -> ChartView {
    let geometry = state.chart.geometry();
    let active = state.chart.active_index();
    let markers = geometry
        .markers()
        .iter()
        .filter_map(|m| {
            let p = dataset.market.get(m.index)?;
            let is_active = active == Some(m.index);
            Some(MarkerView {
                year: p.year,
                value: p.value,
                cx: m.cx,
                cy: m.cy,
                radius: if is_active { cfg.marker_radius + 2.0 } else { cfg.marker_radius },
                active: is_active,
            })
        })
        .collect();

    let hover = state.chart.hover_state(dataset);
    ChartView {
        y_max: geometry.y_max,
        markers,
        readout: hover.map(format_readout),
        tooltip: hover.map(|p| TooltipView {
            label: tooltip_label(p),
            value: format_value(p),
            source: p.source_label.clone(),
        }),
        sources: dataset.chart_sources.clone(),
    }
}

fn render_cards(state: &ViewState, dataset: &Dataset, cfg: &ViewConfig) -> Vec<CardView> {
    dataset
        .providers
        .iter()
        .map(|p| {
            let face = state.flips.face(p.id());
            let logo_state = state.logos.state(p.id()).unwrap_or(LoadState::Loading);
            CardView {
                id: p.id().to_string(),
                name: p.name.clone(),
                face,
                rotate_y_deg: face.rotation_deg(),
                transition_ms: cfg.flip_duration_ms,
                logo_src: display_ref(logo_state, &p.logo_ref, &cfg.placeholder_logo).to_string(),
                logo_state,
                site_url: p.site_url.clone(),
                back_title: format!("{} — Integration Insights", p.name),
                insights: p.insights.clone(),
                back_hint: BACK_HINT,
            }
        })
        .collect()
}

/// Derive the full presentation from state. No side effects.
pub fn render(state: &ViewState, dataset: &Dataset, cfg: &ViewConfig) -> PageView {
    PageView {
        groups: state.animation.phases(),
        writeup: dataset
            .writeup
            .iter()
            .map(|i| WriteupView {
                key: i.key.clone(),
                title: i.title.clone(),
                body: i.body.clone(),
                open: state.accordion.is_open(&i.key),
            })
            .collect(),
        chart: render_chart(state, dataset, cfg),
        cards: render_cards(state, dataset, cfg),
        business_models: dataset.business_models.clone(),
        edge_routing: SwitchView {
            on: state.edge_routing.on,
            label: state.edge_routing.label(),
        },
        team: dataset.team.clone(),
        references: dataset.references.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PLACEHOLDER_LOGO;

    fn setup() -> (ViewState, Dataset, ViewConfig) {
        let ds = Dataset::builtin();
        let cfg = ViewConfig::default();
        let st = ViewState::new(&ds, &cfg).unwrap();
        (st, ds, cfg)
    }

    #[test]
    fn test_plan_covers_every_card_in_order() {
        let ds = Dataset::builtin();
        let plan = reveal_plan(&ds);
        let cards = plan.iter().find(|s| s.id == CARD_SET).unwrap();
        assert_eq!(cards.members[0], "card:OpenAI");
        assert_eq!(cards.members[5], "card:Eden AI");
        assert_eq!(plan[0].trigger, Trigger::OnMount);
    }

    #[test]
    fn test_initial_render() {
        let (st, ds, cfg) = setup();
        let view = render(&st, &ds, &cfg);
        assert!(view.chart.readout.is_none());
        assert!(view.chart.markers.iter().all(|m| !m.active));
        assert!(view.cards.iter().all(|c| c.face == Face::Front && c.rotate_y_deg == 0));
        assert!(view.groups.values().all(|p| *p == Phase::Hidden));
        assert!(view.edge_routing.on);
        assert!(view.writeup.iter().all(|w| !w.open));
    }

    #[test]
    fn test_render_reflects_hover_and_flip() {
        let (mut st, ds, cfg) = setup();
        let m = *st.chart.geometry().marker(1).unwrap();
        st.chart.on_pointer_move(m.cx, m.cy);
        st.flips.toggle("OpenAI").unwrap();
        let view = render(&st, &ds, &cfg);
        assert_eq!(
            view.chart.readout.as_deref(),
            Some("Hovering: 2025 — $64.41B (Precedence Research)")
        );
        assert!(view.chart.markers[1].active);
        assert_eq!(view.chart.markers[1].radius, 6.0);
        let card = &view.cards[0];
        assert_eq!(card.face, Face::Back);
        assert_eq!(card.rotate_y_deg, 180);
        assert_eq!(card.transition_ms, 600);
        assert_eq!(card.back_title, "OpenAI — Integration Insights");
    }

    #[test]
    fn test_failed_logo_renders_placeholder() {
        let (mut st, ds, cfg) = setup();
        st.logos.complete("Stability AI", false);
        let view = render(&st, &ds, &cfg);
        let card = view.cards.iter().find(|c| c.id == "Stability AI").unwrap();
        assert_eq!(card.logo_src, DEFAULT_PLACEHOLDER_LOGO);
        let other = view.cards.iter().find(|c| c.id == "OpenAI").unwrap();
        assert_eq!(other.logo_src, "/images/openai.png");
    }

    #[test]
    fn test_render_is_pure() {
        let (st, ds, cfg) = setup();
        let before = st.hash();
        let a = render(&st, &ds, &cfg);
        let b = render(&st, &ds, &cfg);
        assert_eq!(a, b);
        assert_eq!(before, st.hash());
    }
}
