use crate::BoidParams;
use serde::{Deserialize, Serialize};

const INITIAL_SEPARATION_MOD: f32 = 1.25;
const INITIAL_COHESION_MOD: f32 = 6.0;
const INITIAL_ALIGNMENT_MOD: f32 = 0.75;

/// Max speed a live-tuned boid receives when it is first initialized
pub const LIVE_MAX_SPEED: f32 = 5.0;

/// One of the three live-adjustable rule strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knob {
    Separation,
    Cohesion,
    Alignment,
}

/// Modifiers adjusted while a simulation is running.
///
/// Each rule strength is `1 / modifier`. The values are only read when a boid initializes, so
/// boids already flying keep the strengths they started with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LiveTuning {
    pub separation: f32,
    pub cohesion: f32,
    pub alignment: f32,
}

impl Default for LiveTuning {
    fn default() -> Self {
        Self {
            separation: INITIAL_SEPARATION_MOD,
            cohesion: INITIAL_COHESION_MOD,
            alignment: INITIAL_ALIGNMENT_MOD,
        }
    }
}

impl LiveTuning {
    pub fn modifier(&self, knob: Knob) -> f32 {
        match knob {
            Knob::Separation => self.separation,
            Knob::Cohesion => self.cohesion,
            Knob::Alignment => self.alignment,
        }
    }

    pub fn nudge(&mut self, knob: Knob, delta: f32) {
        match knob {
            Knob::Separation => self.separation += delta,
            Knob::Cohesion => self.cohesion += delta,
            Knob::Alignment => self.alignment += delta,
        }
    }

    /// Rule strength for `knob`. A zero modifier disables the rule instead of yielding infinity.
    pub fn strength(&self, knob: Knob) -> f32 {
        let modifier = self.modifier(knob);
        if modifier == 0.0 {
            0.0
        } else {
            1.0 / modifier
        }
    }

    /// Apply a key press: `q`/`a`, `w`/`s` and `e`/`d` lower and raise the separation, cohesion
    /// and alignment modifiers by one. Returns the knob touched, if any.
    pub fn handle_key(&mut self, key: char) -> Option<Knob> {
        let (knob, delta) = match key.to_ascii_lowercase() {
            'q' => (Knob::Separation, -1.0),
            'a' => (Knob::Separation, 1.0),
            'w' => (Knob::Cohesion, -1.0),
            's' => (Knob::Cohesion, 1.0),
            'e' => (Knob::Alignment, -1.0),
            'd' => (Knob::Alignment, 1.0),
            _ => return None,
        };
        self.nudge(knob, delta);
        Some(knob)
    }

    /// Coefficients a live boid takes on at initialization. Radii are kept from `base`.
    pub fn apply(&self, base: BoidParams) -> BoidParams {
        BoidParams {
            separation: self.strength(Knob::Separation),
            cohesion: self.strength(Knob::Cohesion),
            alignment: self.strength(Knob::Alignment),
            max_speed: LIVE_MAX_SPEED,
            ..base
        }
    }
}
