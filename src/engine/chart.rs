//! Pointer → active point resolution for the market chart.
//!
//! The controller keeps only the last pointer position. The hover state is
//! always derived from that position and the dataset, so it can never drift
//! from what is under the pointer. Resolution snaps to rendered markers only;
//! there is no value interpolation between years.

use serde::Serialize;

use crate::config::ViewConfig;
use crate::data::{Dataset, TimeSeriesPoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// Centre of a plotted dot, indexed into the market series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
}

/// Upper bound of the value axis, rounded to a readable tick.
pub fn nice_ceiling(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let raw = max / 4.0;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    (max / step).ceil() * step
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub surface: Rect,
    pub plot: Rect,
    pub y_min: f64,
    pub y_max: f64,
    markers: Vec<Marker>,
}

impl ChartGeometry {
    /// Lay out one marker per point on a categorical x axis (equal bands,
    /// independent of the gap between years) and a linear y axis.
    pub fn layout(points: &[TimeSeriesPoint], cfg: &ViewConfig) -> Self {
        let m = cfg.chart_margin;
        let surface = Rect {
            x: 0.0,
            y: 0.0,
            w: cfg.chart_width,
            h: cfg.chart_height,
        };
        let plot = Rect {
            x: m.left,
            y: m.top,
            w: (cfg.chart_width - m.left - m.right).max(0.0),
            h: (cfg.chart_height - m.top - m.bottom).max(0.0),
        };

        let lo = points.iter().map(|p| p.value).fold(0.0_f64, f64::min);
        let hi = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        let y_min = if lo < 0.0 { -nice_ceiling(-lo) } else { 0.0 };
        let y_max = nice_ceiling(hi);
        let span = y_max - y_min;

        let band = if points.is_empty() { 0.0 } else { plot.w / points.len() as f64 };
        let markers = points
            .iter()
            .enumerate()
            .map(|(index, p)| Marker {
                index,
                cx: plot.x + band * (index as f64 + 0.5),
                cy: plot.y + plot.h * (1.0 - (p.value - y_min) / span),
            })
            .collect();

        Self {
            surface,
            plot,
            y_min,
            y_max,
            markers,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Nearest marker whose hit disc contains the pointer. Ties go to the
    /// lower index. Non-finite coordinates never match.
    pub fn hit_test(&self, x: f64, y: f64, hit_radius: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() || !self.surface.contains(x, y) {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for m in &self.markers {
            let d = ((m.cx - x).powi(2) + (m.cy - y).powi(2)).sqrt();
            if d > hit_radius {
                continue;
            }
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((m.index, d)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct ChartController {
    geometry: ChartGeometry,
    hit_radius: f64,
    pointer: Option<PointerPos>,
}

impl ChartController {
    pub fn new(dataset: &Dataset, cfg: &ViewConfig) -> Self {
        Self {
            geometry: ChartGeometry::layout(&dataset.market, cfg),
            hit_radius: cfg.hit_radius,
            pointer: None,
        }
    }

    pub fn geometry(&self) -> &ChartGeometry {
        &self.geometry
    }

    pub fn pointer(&self) -> Option<PointerPos> {
        self.pointer
    }

    /// Index of the marker under the pointer, if any.
    pub fn active_index(&self) -> Option<usize> {
        let p = self.pointer?;
        self.geometry.hit_test(p.x, p.y, self.hit_radius)
    }

    /// Record pointer activity. Returns true when the resolved point changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let before = self.active_index();
        self.pointer = if x.is_finite() && y.is_finite() {
            Some(PointerPos { x, y })
        } else {
            None
        };
        before != self.active_index()
    }

    /// Pointer left the chart surface. Returns true when a point was active.
    pub fn on_pointer_leave(&mut self) -> bool {
        let before = self.active_index();
        self.pointer = None;
        before.is_some()
    }

    /// The active point, borrowed from the dataset. `None` when the pointer
    /// is off every marker.
    pub fn hover_state<'a>(&self, dataset: &'a Dataset) -> Option<&'a TimeSeriesPoint> {
        self.active_index().and_then(|i| dataset.market.get(i))
    }
}

/// `Year 2025`
pub fn tooltip_label(p: &TimeSeriesPoint) -> String {
    format!("Year {}", p.year)
}

/// `$64.41B`, literal stored digits
pub fn format_value(p: &TimeSeriesPoint) -> String {
    format!("${}B", p.value)
}

/// Detail readout line shown under the chart
pub fn format_readout(p: &TimeSeriesPoint) -> String {
    format!("Hovering: {} — {} ({})", p.year, format_value(p), p.source_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (ChartController, Dataset) {
        let ds = Dataset::builtin();
        let ctl = ChartController::new(&ds, &ViewConfig::default());
        (ctl, ds)
    }

    #[test]
    fn test_nice_ceiling() {
        assert_eq!(nice_ceiling(750.63), 800.0);
        assert_eq!(nice_ceiling(100.0), 100.0);
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(f64::NAN), 1.0);
    }

    #[test]
    fn test_markers_evenly_spaced() {
        let (ctl, ds) = controller();
        let ms = ctl.geometry().markers();
        assert_eq!(ms.len(), ds.market.len());
        let gap = ms[1].cx - ms[0].cx;
        for w in ms.windows(2) {
            assert!((w[1].cx - w[0].cx - gap).abs() < 1e-9);
        }
        // higher value plots higher up
        assert!(ms[3].cy < ms[0].cy);
    }

    #[test]
    fn test_hover_2025_marker() {
        let (mut ctl, ds) = controller();
        let m = *ctl.geometry().marker(1).unwrap();
        assert!(ctl.on_pointer_move(m.cx + 1.0, m.cy - 1.0));
        let p = ctl.hover_state(&ds).unwrap();
        assert_eq!(p.year, 2025);
        assert_eq!(p.value, 64.41);
        assert_eq!(p.source_label, "Precedence Research");
    }

    #[test]
    fn test_between_markers_is_none() {
        let (mut ctl, ds) = controller();
        let a = *ctl.geometry().marker(0).unwrap();
        let b = *ctl.geometry().marker(1).unwrap();
        ctl.on_pointer_move((a.cx + b.cx) / 2.0, (a.cy + b.cy) / 2.0 - 40.0);
        assert!(ctl.hover_state(&ds).is_none());
    }

    #[test]
    fn test_leave_clears() {
        let (mut ctl, ds) = controller();
        let m = *ctl.geometry().marker(2).unwrap();
        ctl.on_pointer_move(m.cx, m.cy);
        assert!(ctl.hover_state(&ds).is_some());
        assert!(ctl.on_pointer_leave());
        assert!(ctl.hover_state(&ds).is_none());
        assert!(!ctl.on_pointer_leave());
    }

    #[test]
    fn test_same_marker_move_is_not_a_change() {
        let (mut ctl, _) = controller();
        let m = *ctl.geometry().marker(0).unwrap();
        assert!(ctl.on_pointer_move(m.cx, m.cy));
        assert!(!ctl.on_pointer_move(m.cx + 0.5, m.cy));
    }

    #[test]
    fn test_non_finite_pointer_is_no_match() {
        let (mut ctl, ds) = controller();
        let m = *ctl.geometry().marker(0).unwrap();
        ctl.on_pointer_move(m.cx, m.cy);
        assert!(ctl.on_pointer_move(f64::NAN, 3.0));
        assert!(ctl.hover_state(&ds).is_none());
    }

    #[test]
    fn test_outside_surface_is_no_match() {
        let (ctl, _) = controller();
        assert_eq!(ctl.geometry().hit_test(-5.0, -5.0, 1000.0), None);
    }

    #[test]
    fn test_readout_format() {
        let ds = Dataset::builtin();
        let p = ds.point_for_year(2025).unwrap();
        assert_eq!(format_readout(p), "Hovering: 2025 — $64.41B (Precedence Research)");
        assert_eq!(tooltip_label(p), "Year 2025");
        assert_eq!(format_value(ds.point_for_year(2034).unwrap()), "$750.63B");
    }
}
