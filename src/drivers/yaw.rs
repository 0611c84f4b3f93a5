//! Yaw angle from a quadrature encoder with a once-per-revolution index.
//!
//! The estimator is fed from task context only: the interrupt side samples
//! the pins into an [`EncoderSample`] and defers the update.
//!
//! Wrapping assumes at most one slot of travel per update. If edges are
//! coalesced the count can drift until the next reference mark.

use crate::config::ENCODER_SLOTS;

/// Pin levels captured at one encoder edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSample {
    pub channel_a: bool,
    pub channel_b: bool,
    /// Raw level of the reference sensor. It is active low.
    pub reference_level: bool,
}

impl EncoderSample {
    pub const fn new(channel_a: bool, channel_b: bool, reference_level: bool) -> Self {
        Self { channel_a, channel_b, reference_level }
    }

    pub const fn reference_asserted(&self) -> bool {
        !self.reference_level
    }
}

pub struct YawEstimator {
    edge_count: i16,
    previous_b: bool,
    angle_deg: i16,
}

impl YawEstimator {
    pub const fn new() -> Self {
        Self {
            edge_count: 0,
            previous_b: false,
            angle_deg: 0,
        }
    }

    /// Account for one detected transition.
    pub fn on_encoder_edge(&mut self, sample: EncoderSample) {
        // A against the B level seen on the previous edge gives direction.
        if sample.channel_a ^ self.previous_b {
            self.edge_count -= 1;
        } else {
            self.edge_count += 1;
        }

        if sample.reference_asserted() {
            self.edge_count = 0;
        }

        if self.edge_count >= ENCODER_SLOTS {
            self.edge_count -= ENCODER_SLOTS;
        } else if self.edge_count < 0 {
            self.edge_count += ENCODER_SLOTS;
        }

        self.angle_deg = edges_to_degrees(self.edge_count);
        self.previous_b = sample.channel_b;
    }

    pub fn edge_count(&self) -> i16 {
        self.edge_count
    }

    /// Cached angle in `[0, 360)`.
    pub fn angle(&self) -> i16 {
        self.angle_deg
    }
}

impl Default for YawEstimator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn edges_to_degrees(edges: i16) -> i16 {
    (edges as i32 * 360 / ENCODER_SLOTS as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASED: bool = true;

    fn edge(a: bool, b: bool) -> EncoderSample {
        EncoderSample::new(a, b, RELEASED)
    }

    #[test]
    fn same_levels_count_up() {
        let mut yaw = YawEstimator::new();
        // previous_b starts low, so a low A counts forward.
        yaw.on_encoder_edge(edge(false, false));
        yaw.on_encoder_edge(edge(false, false));
        assert_eq!(yaw.edge_count(), 2);
    }

    #[test]
    fn differing_levels_count_down_and_wrap() {
        let mut yaw = YawEstimator::new();
        yaw.on_encoder_edge(edge(true, false));
        assert_eq!(yaw.edge_count(), ENCODER_SLOTS - 1);
        assert_eq!(yaw.angle(), 359);
    }

    #[test]
    fn count_wraps_forward_past_last_slot() {
        let mut yaw = YawEstimator::new();
        for _ in 0..ENCODER_SLOTS {
            yaw.on_encoder_edge(edge(false, false));
        }
        assert_eq!(yaw.edge_count(), 0);
        assert_eq!(yaw.angle(), 0);
    }

    #[test]
    fn matches_weighted_sum_modulo_slots() {
        let mut yaw = YawEstimator::new();
        let mut previous_b = false;
        let mut expected: i32 = 0;
        // Deterministic pseudo-random pin pattern.
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..5_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let a = seed & 0x1_0000 != 0;
            let b = seed & 0x2_0000 != 0;
            expected += if a ^ previous_b { -1 } else { 1 };
            previous_b = b;

            yaw.on_encoder_edge(edge(a, b));
            let count = yaw.edge_count();
            assert!((0..ENCODER_SLOTS).contains(&count));
            assert_eq!(count as i32, expected.rem_euclid(ENCODER_SLOTS as i32));
            assert!((0..360).contains(&yaw.angle()));
        }
    }

    #[test]
    fn reference_mark_resets_count() {
        let mut yaw = YawEstimator::new();
        for _ in 0..100 {
            yaw.on_encoder_edge(edge(false, false));
        }
        assert_eq!(yaw.angle(), 80);

        yaw.on_encoder_edge(EncoderSample::new(true, true, false));
        assert_eq!(yaw.edge_count(), 0);
        assert_eq!(yaw.angle(), 0);
    }

    #[test]
    fn previous_b_is_taken_from_prior_edge() {
        let mut yaw = YawEstimator::new();
        yaw.on_encoder_edge(edge(false, true)); // +1, remembers B high
        yaw.on_encoder_edge(edge(true, true)); // A == previous B: +1
        yaw.on_encoder_edge(edge(false, false)); // A != previous B: -1
        assert_eq!(yaw.edge_count(), 1);
    }

    #[test]
    fn degrees_from_edges() {
        assert_eq!(edges_to_degrees(0), 0);
        assert_eq!(edges_to_degrees(112), 90);
        assert_eq!(edges_to_degrees(224), 180);
        assert_eq!(edges_to_degrees(447), 359);
    }
}
