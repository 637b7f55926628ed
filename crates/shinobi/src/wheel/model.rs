use crate::wheel::geometry::{Point, WheelGeometry};
use crate::wheel::{FULL_TURN, MAX_EXTRA_TRAVEL, MIN_SIDE, MIN_TRAVEL, SPIN_DURATION};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Random draws behind a spin.
pub trait OutcomeSource {
    /// Uniform index in `0..count`. Never called with `count == 0`.
    fn pick_segment(&mut self, count: usize) -> usize;

    /// Extra travel in whole degrees, uniform in `0..=MAX_EXTRA_TRAVEL`.
    fn extra_travel(&mut self) -> u32;
}

pub struct SeededSource(StdRng);

impl SeededSource {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SeededSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl OutcomeSource for SeededSource {
    fn pick_segment(&mut self, count: usize) -> usize {
        self.0.gen_range(0..count)
    }

    fn extra_travel(&mut self) -> u32 {
        self.0.gen_range(0..=MAX_EXTRA_TRAVEL)
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Angular width of one segment in degrees.
pub fn span(count: usize) -> f64 {
    FULL_TURN / count as f64
}

/// Segment under the fixed pointer. At rotation 0 the pointer sits in the
/// middle of segment 0, and every `span` of rotation advances it by one.
pub fn index_at_pointer(rotation: f64, count: usize) -> Option<usize> {
    (count > 0).then(|| {
        let span = span(count);
        let face = (rotation + span / 2.0).rem_euclid(FULL_TURN);
        ((face / span) as usize).min(count - 1)
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub target_index: usize,
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub duration: Duration,
}

impl SpinPlan {
    pub fn rotation_at(&self, elapsed: Duration) -> f64 {
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.start + (self.end - self.start) * ease_out_cubic(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub index: usize,
    pub label: String,
    pub settled: f64,
}

#[derive(Debug, Clone)]
struct Spin {
    plan: SpinPlan,
    started_at: Instant,
}

pub struct Wheel<S = SeededSource> {
    segments: Vec<String>,
    rotation: f64,
    spin: Option<Spin>,
    side: i32,
    hover_index: Option<usize>,
    source: S,
}

impl Wheel<SeededSource> {
    pub fn new() -> Self {
        Self::with_source(SeededSource::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_source(SeededSource::from_seed(seed))
    }
}

impl Default for Wheel<SeededSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: OutcomeSource> Wheel<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            segments: Vec::new(),
            rotation: 0.0,
            spin: None,
            side: MIN_SIDE,
            hover_index: None,
            source,
        }
    }

    /// Replaces the segment list. Rotation is kept, so a different count
    /// only changes the mapping for later spins.
    pub fn set_segments<I, T>(&mut self, labels: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.segments = labels.into_iter().map(Into::into).collect();
        self.hover_index = None;
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        self.spin.as_ref().map(|s| &s.plan)
    }

    /// Starts a spin towards a random segment. Returns `false` and changes
    /// nothing when a spin is already running or there are no segments.
    pub fn spin(&mut self, now: Instant) -> bool {
        if self.is_spinning() {
            return false;
        }
        match self.decide_outcome() {
            Some(index) => self.animate_to(index, now),
            None => false,
        }
    }

    pub fn decide_outcome(&mut self) -> Option<usize> {
        (!self.segments.is_empty()).then(|| self.source.pick_segment(self.segments.len()))
    }

    pub fn animate_to(&mut self, index: usize, now: Instant) -> bool {
        if self.is_spinning() || index >= self.segments.len() {
            return false;
        }
        let plan = self.plan_for(index);
        log::debug!(
            "Spinning to '{}' ({} -> {:.1})",
            plan.label,
            plan.start,
            plan.end
        );
        self.hover_index = None;
        self.spin = Some(Spin {
            plan,
            started_at: now,
        });
        true
    }

    fn plan_for(&mut self, index: usize) -> SpinPlan {
        let start = self.rotation;
        let base = MIN_TRAVEL + f64::from(self.source.extra_travel());
        let target = span(self.segments.len()) * index as f64;
        // forward-only correction so the end angle lands on `target`
        let align = (target - (start + base)).rem_euclid(FULL_TURN);

        SpinPlan {
            target_index: index,
            label: self.segments[index].clone(),
            start,
            end: start + base + align,
            duration: SPIN_DURATION,
        }
    }

    /// Advances the animation to `now`. Returns the outcome once, on the
    /// tick that completes the spin.
    pub fn tick(&mut self, now: Instant) -> Option<SpinOutcome> {
        let spin = self.spin.as_ref()?;
        let elapsed = now.saturating_duration_since(spin.started_at);

        if elapsed < spin.plan.duration {
            self.rotation = self.rotation.max(spin.plan.rotation_at(elapsed));
            return None;
        }

        let Spin { plan, .. } = self.spin.take()?;
        self.rotation = plan.end.rem_euclid(FULL_TURN);

        if self.landed_index() != Some(plan.target_index) {
            log::warn!(
                "Wheel settled at {:.3} off target segment {}",
                self.rotation,
                plan.target_index
            );
        }
        log::debug!("Wheel landed on '{}'", plan.label);

        Some(SpinOutcome {
            index: plan.target_index,
            label: plan.label,
            settled: self.rotation,
        })
    }

    pub fn landed_index(&self) -> Option<usize> {
        index_at_pointer(self.rotation, self.segments.len())
    }

    pub fn landed_label(&self) -> Option<&str> {
        self.landed_index()
            .and_then(|i| self.segments.get(i))
            .map(String::as_str)
    }

    /// Keeps the widget square. Returns the new side.
    pub fn resize(&mut self, width: i32, height: i32) -> i32 {
        self.side = width.min(height);
        self.side
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn size(&self) -> (i32, i32) {
        (self.side, self.side)
    }

    pub fn geometry(&self) -> WheelGeometry {
        WheelGeometry::new(f64::from(self.side), self.rotation, self.segments.len())
    }

    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    /// Tracks the segment under the cursor while idle. Returns whether the
    /// highlight changed.
    pub fn update_hover(&mut self, cursor: Option<Point>) -> bool {
        let new_idx = match cursor {
            Some(p) if !self.is_spinning() => self.geometry().segment_at(p),
            _ => None,
        };
        let changed = self.hover_index != new_idx;
        self.hover_index = new_idx;
        changed
    }
}
