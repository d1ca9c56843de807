//! Ring index arithmetic
//!
//! Positions on the ring are continuous real-valued indices. Slot `k` and
//! `k + total` name the same card, so every distance here is measured the
//! short way around.

/// Wrap a continuous index into `[0, total)`
pub fn wrap_index(n: f32, total: usize) -> f32 {
    let total = total as f32;
    ((n % total) + total) % total
}

/// Signed delta from `from` to `to`, taking the shorter way around the ring
///
/// The magnitude never exceeds `total / 2`.
pub fn shortest_delta(from: f32, to: f32, total: usize) -> f32 {
    let total = total as f32;
    let half = total / 2.0;
    let mut d = (to - from) % total;
    if d > half {
        d -= total;
    }
    if d < -half {
        d += total;
    }
    d
}

/// Unsigned distance in slots between a ring slot and a continuous position
pub fn slot_distance(slot: usize, position: f32, total: usize) -> f32 {
    let d = wrap_index(slot as f32 - position, total);
    let total = total as f32;
    if d > total / 2.0 {
        total - d
    } else {
        d
    }
}

/// The ring slot closest to a continuous position
pub fn nearest_slot(position: f32, total: usize) -> usize {
    // Guard against `wrap_index` returning `total` for tiny negative inputs.
    (wrap_index(position.round(), total).round() as usize) % total.max(1)
}
