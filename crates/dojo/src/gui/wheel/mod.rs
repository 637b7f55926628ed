use shinobi::wheel::Point;

pub mod view;

pub use view::draw;

pub const RIM_LINE_WIDTH: f64 = 2.0;
pub const DIVIDER_LINE_WIDTH: f64 = 2.0;
pub const LABEL_FONT_SIZE: f64 = 16.0;

/// Top-left corner of the square wheel inside an allocation of any shape.
pub fn origin(width: i32, height: i32, side: i32) -> Point {
    Point::new(
        f64::from((width - side).max(0)) / 2.0,
        f64::from((height - side).max(0)) / 2.0,
    )
}

/// Converts widget coordinates to the wheel's own square.
pub fn to_wheel_space(point: Point, width: i32, height: i32, side: i32) -> Point {
    let o = origin(width, height, side);
    Point::new(point.x - o.x, point.y - o.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_centred_in_allocation() {
        assert_eq!(origin(500, 300, 300), Point::new(100.0, 0.0));
        assert_eq!(origin(300, 300, 300), Point::new(0.0, 0.0));
        assert_eq!(
            to_wheel_space(Point::new(250.0, 150.0), 500, 300, 300),
            Point::new(150.0, 150.0)
        );
    }
}
