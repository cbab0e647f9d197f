//! Overlay geometry for a spectrum plot and its egui_plot rendering.
//!
//! [`build_overlays`] turns the session state into plain trace/line/band/curve
//! geometry in data coordinates. [`render_overlays`] draws that geometry into
//! an egui_plot `PlotUi`, mapping y values through `log10` on a log scale.

use egui::{Color32, Stroke};
use egui_plot::{Line, PlotPoints, Polygon, VLine};

use crate::data::marker::Axis;
use crate::data::overlay_look::{axis_color, OverlayLook, ALERT_COLOR, WARNING_COLOR};
use crate::data::thresholds::StepCurve;
use crate::session::AnalysisSession;

const BASE_LINE_OPACITY: f32 = 0.75;
const BASE_BAND_FILL: f32 = 0.2;
const HARMONIC_LINE_OPACITY: f32 = 0.6;
const HARMONIC_BAND_FILL: f32 = 0.1;
/// Bands stop below the top of the plot so labels stay readable.
const BAND_TOP_DIVISOR: f64 = 1.4;

/// Raw samples of one visible channel inside the visible X domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTrace {
    pub axis: Axis,
    pub points: Vec<[f64; 2]>,
    pub look: OverlayLook,
}

/// A vertical marker line.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLine {
    pub x: f64,
    pub label: String,
    pub look: OverlayLook,
    /// Storage index of the owning marker.
    pub marker_index: usize,
    /// Position in the owner's harmonic list; `None` for the base line.
    pub harmonic_index: Option<usize>,
}

/// A shaded band around a marker line.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBand {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub look: OverlayLook,
    pub marker_index: usize,
    pub harmonic_index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    pub traces: Vec<ChannelTrace>,
    pub lines: Vec<MarkerLine>,
    pub bands: Vec<MarkerBand>,
    pub warning: Option<StepCurve>,
    pub alert: Option<StepCurve>,
}

/// Collect the visible channel traces, overlay geometry for every visible
/// marker (in storage order) and, when generated and the whole domain is
/// shown, the threshold curves.
pub fn build_overlays(session: &AnalysisSession) -> Overlays {
    let [y_min, y_max] = session.view().y_range(session.axis_bounds());
    let band_y = [y_min, y_max / BAND_TOP_DIVISOR];
    let mut out = Overlays::default();

    let [x0, x1] = session.x_domain();
    for axis in Axis::ALL {
        if !session.view().visible_axes.is_visible(axis) {
            continue;
        }
        let points: Vec<[f64; 2]> = session
            .samples()
            .iter()
            .filter(|p| p.frequency >= x0 && p.frequency <= x1)
            .map(|p| [p.frequency, p.value(axis)])
            .collect();
        if points.is_empty() {
            continue;
        }
        out.traces.push(ChannelTrace {
            axis,
            points,
            look: OverlayLook::solid(axis_color(axis)),
        });
    }

    for (idx, marker) in session.store().markers().iter().enumerate() {
        if !marker.visible {
            continue;
        }
        let f = marker.frequency as f64;
        let half = marker.band_width / 2.0;
        out.lines.push(MarkerLine {
            x: f,
            label: marker.name.clone(),
            look: OverlayLook::dashed(marker.color, BASE_LINE_OPACITY),
            marker_index: idx,
            harmonic_index: None,
        });
        out.bands.push(MarkerBand {
            x: [f - half, f + half],
            y: band_y,
            look: OverlayLook::band(marker.color, BASE_BAND_FILL),
            marker_index: idx,
            harmonic_index: None,
        });

        for (h_idx, h) in marker.harmonic_markers().iter().enumerate() {
            let half = h.band_width / 2.0;
            out.lines.push(MarkerLine {
                x: h.frequency,
                label: h.label(),
                look: OverlayLook::dashed(marker.color, HARMONIC_LINE_OPACITY),
                marker_index: idx,
                harmonic_index: Some(h_idx),
            });
            out.bands.push(MarkerBand {
                x: [h.frequency - half, h.frequency + half],
                y: band_y,
                look: OverlayLook::band(marker.color, HARMONIC_BAND_FILL),
                marker_index: idx,
                harmonic_index: Some(h_idx),
            });
        }
    }

    if let Some(curves) = session.visible_threshold_curves() {
        out.warning = Some(curves.warning.clone());
        out.alert = Some(curves.alert.clone());
    }
    out
}

fn plot_y(y: f64, log_scale: bool) -> Option<f64> {
    let v = if log_scale { y.log10() } else { y };
    v.is_finite().then_some(v)
}

fn curve_points(curve: &StepCurve, log_scale: bool) -> Vec<[f64; 2]> {
    plot_points(curve.points(), log_scale)
}

fn plot_points(points: &[[f64; 2]], log_scale: bool) -> Vec<[f64; 2]> {
    points
        .iter()
        .filter_map(|[x, y]| plot_y(*y, log_scale).map(|y| [*x, y]))
        .collect()
}

/// Draw `overlays` into an egui_plot. Traces and bands go first so marker
/// lines stay on top.
pub fn render_overlays(plot_ui: &mut egui_plot::PlotUi, overlays: &Overlays, log_scale: bool) {
    for trace in &overlays.traces {
        let pts = plot_points(&trace.points, log_scale);
        if pts.is_empty() {
            continue;
        }
        plot_ui.line(
            Line::new(trace.axis.label(), pts)
                .color(trace.look.effective_color())
                .width(trace.look.width),
        );
    }

    for band in &overlays.bands {
        let (Some(y0), Some(y1)) = (
            plot_y(band.y[0], log_scale),
            plot_y(band.y[1], log_scale),
        ) else {
            continue;
        };
        let pts = vec![
            [band.x[0], y0],
            [band.x[1], y0],
            [band.x[1], y1],
            [band.x[0], y1],
        ];
        let poly = Polygon::new("", PlotPoints::from(pts))
            .fill_color(band.look.effective_color())
            .stroke(Stroke::NONE);
        plot_ui.polygon(poly);
    }

    for line in &overlays.lines {
        let v = VLine::new(line.label.clone(), line.x)
            .color(line.look.effective_color())
            .width(line.look.width)
            .style(line.look.style);
        plot_ui.vline(v);
    }

    let curves: [(&str, &Option<StepCurve>, Color32); 2] = [
        ("Warning", &overlays.warning, WARNING_COLOR),
        ("Alert", &overlays.alert, ALERT_COLOR),
    ];
    for (name, curve, color) in curves {
        let Some(curve) = curve else { continue };
        let pts = curve_points(curve, log_scale);
        if pts.len() < 2 {
            continue;
        }
        let look = OverlayLook::solid(color);
        plot_ui.line(
            Line::new(name, pts)
                .color(look.effective_color())
                .width(2.0)
                .style(look.style),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_drops_non_positive_points() {
        let curve = StepCurve(vec![[0.0, 0.0], [1.0, 10.0], [2.0, -1.0], [3.0, 100.0]]);
        assert_eq!(curve_points(&curve, true), vec![[1.0, 1.0], [3.0, 2.0]]);
        assert_eq!(curve_points(&curve, false).len(), 4);
    }
}
