use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Mesh, Pos2, Rect, Response, Sense, Shape, Stroke, Ui};

pub const ICON_SIZE: f32 = 24.0;
pub const LIKED_COLOR: Color32 = Color32::from_rgb(0xF3, 0x12, 0x60);
pub const MUTED_COLOR: Color32 = Color32::from_rgb(0x9B, 0xA1, 0xA6);
const TRASH_FILL: Color32 = Color32::from_rgb(0x20, 0x0E, 0x32);
const HEART_SEGMENTS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconColors {
    pub fill: Option<Color32>,
    pub stroke: Color32,
}

pub fn heart_colors(liked: bool, hovered: bool, hover_enabled: bool) -> IconColors {
    let highlighted = liked || (hover_enabled && hovered);
    IconColors {
        fill: liked.then_some(LIKED_COLOR),
        stroke: if highlighted { LIKED_COLOR } else { MUTED_COLOR },
    }
}

pub fn trash_colors(hovered: bool) -> IconColors {
    IconColors {
        fill: Some(TRASH_FILL),
        stroke: if hovered { LIKED_COLOR } else { MUTED_COLOR },
    }
}

pub fn like_count_color(liked: bool) -> Color32 {
    if liked {
        LIKED_COLOR
    } else {
        MUTED_COLOR
    }
}

/// Heart toggle. Only the click is reported; what it means is up to the card.
pub fn heart(ui: &mut Ui, liked: bool, hover_enabled: bool) -> Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE), Sense::click());
    let response = if hover_enabled {
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    } else {
        response
    };
    if ui.is_rect_visible(rect) {
        let colors = heart_colors(liked, response.hovered(), hover_enabled);
        paint_heart(ui.painter(), rect, colors);
    }
    response
}

pub fn trash(ui: &mut Ui) -> Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE), Sense::click());
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
    if ui.is_rect_visible(rect) {
        paint_trash(ui.painter(), rect, trash_colors(response.hovered()));
    }
    response
}

fn heart_point(rect: Rect, t: f32) -> Pos2 {
    // Classic heart curve, x in [-16, 16] and y in [-17, 12].
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    heart_to_screen(rect, x, y)
}

fn heart_to_screen(rect: Rect, x: f32, y: f32) -> Pos2 {
    let scale = rect.width() * 0.42 / 17.0;
    let center = rect.center();
    egui::pos2(center.x + x * scale, center.y - (y + 2.5) * scale)
}

fn paint_heart(painter: &egui::Painter, rect: Rect, colors: IconColors) {
    let points: Vec<Pos2> = (0..HEART_SEGMENTS)
        .map(|i| heart_point(rect, TAU * i as f32 / HEART_SEGMENTS as f32))
        .collect();

    if let Some(fill) = colors.fill {
        // The outline is not convex, but it is star-shaped around the origin.
        let mut mesh = Mesh::default();
        mesh.colored_vertex(heart_to_screen(rect, 0.0, 0.0), fill);
        for point in &points {
            mesh.colored_vertex(*point, fill);
        }
        let ring = HEART_SEGMENTS as u32;
        for i in 0..ring {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % ring);
        }
        painter.add(Shape::mesh(mesh));
    }

    painter.add(Shape::closed_line(points, Stroke::new(1.5, colors.stroke)));
}

fn paint_trash(painter: &egui::Painter, rect: Rect, colors: IconColors) {
    let stroke = Stroke::new(1.0, colors.stroke);
    let unit = rect.width() / 24.0;
    let at = |x: f32, y: f32| egui::pos2(rect.left() + x * unit, rect.top() + y * unit);

    let handle = Rect::from_min_max(at(9.0, 2.0), at(15.0, 5.0));
    let lid = Rect::from_min_max(at(3.0, 5.2), at(21.0, 7.1));
    let body = Rect::from_min_max(at(4.4, 8.7), at(19.6, 22.0));

    if let Some(fill) = colors.fill {
        painter.rect_filled(lid, 0.7 * unit, fill);
        painter.rect_filled(body, 2.5 * unit, fill);
    }
    painter.rect_stroke(handle, 1.0 * unit, stroke);
    painter.rect_stroke(lid, 0.7 * unit, stroke);
    painter.rect_stroke(body, 2.5 * unit, stroke);
    for x in [9.0, 12.0, 15.0] {
        painter.line_segment([at(x, 11.5), at(x, 19.0)], stroke);
    }
}
