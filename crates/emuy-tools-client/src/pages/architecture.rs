use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use emuy_shared::{
    architecture::{ArchNode, ArchitectureGraph, NodeKind, SYSTEM_GRAPH},
    internal_error,
    routes::Route,
};
use strum::IntoEnumIterator as _;

use super::DisplayablePage;
use crate::displayable_page_common;

const NODE_SIZE: Vec2 = Vec2::new(140.0, 40.0);
const CANVAS_MIN_SIZE: Vec2 = Vec2::new(720.0, 480.0);

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiArchitecture {
    is_open: bool,
    page_unique_number: usize,
    show_edge_labels: bool,
}

impl DisplayablePage for UiArchitecture {
    displayable_page_common!("Architecture", Route::Architecture);

    fn reset_to_default(&mut self, _: super::private::Token) {}

    fn show(&mut self, ui: &mut eframe::egui::Ui, _data_shared: &mut crate::DataShared) {
        if let Err(e) = SYSTEM_GRAPH.validate() {
            let msg = internal_error!(e);
            ui.colored_label(ui.visuals().error_fg_color, msg);
            return;
        }
        ui.horizontal_wrapped(|ui| {
            ui.checkbox(&mut self.show_edge_labels, "Show connection labels");
            ui.separator();
            for kind in NodeKind::iter() {
                ui.colored_label(kind_color(kind), "■");
                ui.label(kind_label(kind));
            }
        });
        ui.separator();
        ui_graph(ui, &SYSTEM_GRAPH, self.show_edge_labels);
    }
}

fn ui_graph(ui: &mut egui::Ui, graph: &ArchitectureGraph, show_edge_labels: bool) {
    let size = ui.available_size().max(CANVAS_MIN_SIZE);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let canvas = response.rect;
    let visuals = ui.visuals();
    let hovered = response
        .hover_pos()
        .and_then(|pos| graph.nodes.iter().find(|n| node_rect(canvas, n).contains(pos)));

    for edge in graph.edges {
        let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
            // Excluded by validation
            continue;
        };
        let is_highlighted = hovered.is_some_and(|h| h.id == edge.from || h.id == edge.to);
        let stroke = if is_highlighted {
            Stroke::new(2.5, visuals.selection.bg_fill)
        } else {
            Stroke::new(1.5, visuals.weak_text_color())
        };
        let from_rect = node_rect(canvas, from);
        let to_rect = node_rect(canvas, to);
        let start = border_point(from_rect, to_rect.center());
        let end = border_point(to_rect, from_rect.center());
        painter.arrow(start, end - start, stroke);
        if show_edge_labels || is_highlighted {
            painter.text(
                start + (end - start) / 2.0,
                Align2::CENTER_BOTTOM,
                edge.label,
                FontId::proportional(11.0),
                visuals.text_color(),
            );
        }
    }

    for node in graph.nodes {
        let rect = node_rect(canvas, node);
        let stroke = if hovered.is_some_and(|h| h.id == node.id) {
            Stroke::new(2.0, visuals.strong_text_color())
        } else {
            Stroke::NONE
        };
        painter.rect(rect, 6.0, kind_color(node.kind), stroke);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            node.label,
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    if let Some(node) = hovered {
        response.on_hover_text(format!("{} ({})", node.label, kind_label(node.kind)));
    }
}

/// Node positions are fractions of the canvas, the node is centred on it
fn node_rect(canvas: Rect, node: &ArchNode) -> Rect {
    let (x, y) = node.pos;
    // Keep the whole node inside even at the edges
    let usable = canvas.shrink2(NODE_SIZE / 2.0);
    let center = Pos2::new(
        usable.left() + usable.width() * x,
        usable.top() + usable.height() * y,
    );
    Rect::from_center_size(center, NODE_SIZE)
}

/// Where the line from the centre of `rect` towards `target` leaves `rect`
fn border_point(rect: Rect, target: Pos2) -> Pos2 {
    let center = rect.center();
    let dir = target - center;
    if dir == Vec2::ZERO {
        return center;
    }
    let half = rect.size() / 2.0;
    let scale_x = if dir.x == 0.0 {
        f32::INFINITY
    } else {
        half.x / dir.x.abs()
    };
    let scale_y = if dir.y == 0.0 {
        f32::INFINITY
    } else {
        half.y / dir.y.abs()
    };
    center + dir * scale_x.min(scale_y)
}

fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Client => Color32::from_rgb(88, 101, 242),
        NodeKind::Service => Color32::from_rgb(46, 139, 87),
        NodeKind::Worker => Color32::from_rgb(205, 133, 63),
        NodeKind::External => Color32::from_rgb(105, 105, 105),
        NodeKind::Storage => Color32::from_rgb(138, 43, 226),
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Client => "Client",
        NodeKind::Service => "Service",
        NodeKind::Worker => "Worker",
        NodeKind::External => "External",
        NodeKind::Storage => "Storage",
    }
}
