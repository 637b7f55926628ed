use std::time::Duration;

pub mod geometry;
pub mod model;

pub use geometry::{Point, WheelGeometry};
pub use model::{
    OutcomeSource, SeededSource, SpinOutcome, SpinPlan, Wheel, ease_out_cubic, index_at_pointer,
    span,
};

pub const FULL_TURN: f64 = 360.0;
pub const SPIN_DURATION: Duration = Duration::from_millis(3000);
pub const MIN_TRAVEL: f64 = 720.0; // two full turns before alignment
pub const MAX_EXTRA_TRAVEL: u32 = 360;
pub const MIN_SIDE: i32 = 300;
pub const RIM_RADIUS_FACTOR: f64 = 0.4; // relative to the square side
pub const LABEL_RADIUS_FACTOR: f64 = 0.65; // relative to the rim radius
pub const HUB_RADIUS: f64 = 20.0;
pub const POINTER_LENGTH: f64 = 15.0;
pub const POINTER_HALF_WIDTH: f64 = 8.0;
pub const POINTER_SHADOW_OFFSET: f64 = 2.0;
