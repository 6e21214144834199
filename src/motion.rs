// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Crowd Motion

use rand::Rng;

use crate::config::DemoConfig;
use crate::types::BoundingBox;

pub const FIELD_MIN: f64 = 0.0;
pub const FIELD_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Scatter `config.box_count` people uniformly over the frame.
pub fn spawn_boxes<R: Rng + ?Sized>(config: &DemoConfig, rng: &mut R) -> Vec<BoundingBox> {
    (0..config.box_count)
        .map(|id| {
            let mut b = BoundingBox {
                id,
                x: rng.gen_range(FIELD_MIN..=FIELD_MAX),
                y: rng.gen_range(FIELD_MIN..=FIELD_MAX),
                vx: symmetric(rng, config.initial_speed),
                vy: symmetric(rng, config.initial_speed),
            };
            cap_speed(&mut b, config.max_speed);
            b
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-tick motion
// ---------------------------------------------------------------------------

/// Move every box by its velocity, bouncing off the frame edges.
pub fn advance(boxes: &mut [BoundingBox]) {
    for b in boxes.iter_mut() {
        let (x, vx) = reflect_axis(b.x + b.vx, b.vx);
        let (y, vy) = reflect_axis(b.y + b.vy, b.vy);
        b.x = x;
        b.y = y;
        b.vx = vx;
        b.vy = vy;
    }
}

/// Bounded random walk on velocities, then re-cap the magnitude.
pub fn perturb<R: Rng + ?Sized>(boxes: &mut [BoundingBox], jitter: f64, max_speed: f64, rng: &mut R) {
    for b in boxes.iter_mut() {
        b.vx += symmetric(rng, jitter);
        b.vy += symmetric(rng, jitter);
        cap_speed(b, max_speed);
    }
}

/// Reflect a position that left `[0, 100]` back inside, pointing the
/// velocity inward. Clamps as a last resort for steps longer than the field.
pub fn reflect_axis(pos: f64, vel: f64) -> (f64, f64) {
    let (pos, vel) = if pos < FIELD_MIN {
        (FIELD_MIN + (FIELD_MIN - pos), vel.abs())
    } else if pos > FIELD_MAX {
        (FIELD_MAX - (pos - FIELD_MAX), -vel.abs())
    } else {
        (pos, vel)
    };
    (pos.clamp(FIELD_MIN, FIELD_MAX), vel)
}

pub fn cap_speed(b: &mut BoundingBox, max_speed: f64) {
    let speed = b.speed();
    if speed > max_speed {
        if max_speed <= 0.0 || !speed.is_finite() {
            b.vx = 0.0;
            b.vy = 0.0;
        } else {
            let scale = max_speed / speed;
            b.vx *= scale;
            b.vy *= scale;
        }
    }
}

/// Pile every box onto one point and stop it. Used by the surge control.
pub fn cluster_at(boxes: &mut [BoundingBox], x: f64, y: f64) {
    let x = x.clamp(FIELD_MIN, FIELD_MAX);
    let y = y.clamp(FIELD_MIN, FIELD_MAX);
    for b in boxes.iter_mut() {
        b.x = x;
        b.y = y;
        b.vx = 0.0;
        b.vy = 0.0;
    }
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}
