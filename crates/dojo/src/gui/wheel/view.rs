use super::{DIVIDER_LINE_WIDTH, LABEL_FONT_SIZE, RIM_LINE_WIDTH, origin};
use crate::gui::theme::WheelColors;
use cairo::Context;
use palette::Srgba;
use shinobi::wheel::{POINTER_SHADOW_OFFSET, Point, Wheel, WheelGeometry};
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Cairo measures radians clockwise from +x; screen angles start at the top.
fn cairo_angle(screen_degrees: f64) -> f64 {
    (screen_degrees - 90.0).to_radians()
}

pub fn draw(
    cr: &Context,
    wheel: &Wheel,
    colors: &WheelColors,
    width: i32,
    height: i32,
) -> Result<(), cairo::Error> {
    if wheel.segments().is_empty() {
        return Ok(());
    }

    let geo = wheel.geometry();
    let o = origin(width, height, wheel.side());

    cr.save()?;
    cr.translate(o.x, o.y);
    draw_face(cr, &geo, colors)?;
    if let Some(index) = wheel.hover_index() {
        draw_highlight(cr, &geo, index, colors)?;
    }
    draw_dividers(cr, &geo, colors)?;
    draw_labels(cr, &geo, wheel.segments(), colors)?;
    draw_pointer(cr, &geo, colors)?;
    draw_hub(cr, &geo, colors)?;
    cr.restore()
}

fn draw_face(cr: &Context, geo: &WheelGeometry, colors: &WheelColors) -> Result<(), cairo::Error> {
    cr.new_path();
    cr.arc(geo.center.x, geo.center.y, geo.radius, 0.0, 2.0 * PI);
    set_color(cr, colors.face);
    cr.fill_preserve()?;
    set_color(cr, colors.rim);
    cr.set_line_width(RIM_LINE_WIDTH);
    cr.stroke()
}

fn draw_highlight(
    cr: &Context,
    geo: &WheelGeometry,
    index: usize,
    colors: &WheelColors,
) -> Result<(), cairo::Error> {
    let (start, end) = geo.segment_screen_range(index);
    cr.new_path();
    cr.move_to(geo.center.x, geo.center.y);
    cr.arc(
        geo.center.x,
        geo.center.y,
        geo.radius,
        cairo_angle(start),
        cairo_angle(end),
    );
    cr.close_path();
    set_color(cr, colors.highlight);
    cr.fill()
}

fn draw_dividers(
    cr: &Context,
    geo: &WheelGeometry,
    colors: &WheelColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.divider);
    cr.set_line_width(DIVIDER_LINE_WIDTH);
    for (from, to) in geo.dividers() {
        cr.move_to(from.x, from.y);
        cr.line_to(to.x, to.y);
    }
    cr.stroke()
}

fn draw_labels(
    cr: &Context,
    geo: &WheelGeometry,
    labels: &[String],
    colors: &WheelColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.text);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(LABEL_FONT_SIZE);

    for (i, label) in labels.iter().enumerate() {
        let anchor = geo.label_anchor(i);
        if let Ok(ext) = cr.text_extents(label) {
            // upright text, centred on the anchor
            cr.move_to(
                anchor.x - ext.width() / 2.0 - ext.x_bearing(),
                anchor.y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(label)?;
        }
    }
    Ok(())
}

fn trace_triangle(cr: &Context, points: &[Point; 3], offset: f64) {
    let [tip, left, right] = points;
    cr.new_path();
    cr.move_to(tip.x + offset, tip.y + offset);
    cr.line_to(left.x + offset, left.y + offset);
    cr.line_to(right.x + offset, right.y + offset);
    cr.close_path();
}

fn draw_pointer(
    cr: &Context,
    geo: &WheelGeometry,
    colors: &WheelColors,
) -> Result<(), cairo::Error> {
    let points = geo.pointer();

    trace_triangle(cr, &points, POINTER_SHADOW_OFFSET);
    set_color(cr, colors.shadow);
    cr.fill()?;

    trace_triangle(cr, &points, 0.0);
    set_color(cr, colors.pointer);
    cr.fill()
}

fn draw_hub(cr: &Context, geo: &WheelGeometry, colors: &WheelColors) -> Result<(), cairo::Error> {
    cr.new_path();
    cr.arc(geo.center.x, geo.center.y, geo.hub_radius(), 0.0, 2.0 * PI);
    set_color(cr, colors.hub);
    cr.fill()
}
