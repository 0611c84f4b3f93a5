use core::sync::atomic::{AtomicU16, Ordering};

use crate::config::{HEIGHT_RAW_LOWER, HEIGHT_RAW_UPPER};

/// Height from the analog altitude sensor.
///
/// Holds only the latest raw conversion; the percentage is derived on every
/// read. One task writes, any task may read.
pub struct HeightSampler {
    latest_raw: AtomicU16,
}

impl HeightSampler {
    pub const fn new() -> Self {
        Self {
            latest_raw: AtomicU16::new(0),
        }
    }

    pub fn on_raw_sample(&self, raw: u16) {
        self.latest_raw.store(raw, Ordering::Release);
    }

    pub fn raw(&self) -> u16 {
        self.latest_raw.load(Ordering::Acquire)
    }

    pub fn height_percent(&self) -> u8 {
        raw_to_percent(self.raw())
    }
}

impl Default for HeightSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Piecewise-linear map of a raw conversion onto 0–100 %.
pub fn raw_to_percent(raw: u16) -> u8 {
    if raw >= HEIGHT_RAW_UPPER {
        100
    } else if raw < HEIGHT_RAW_LOWER {
        0
    } else {
        let span = (HEIGHT_RAW_UPPER - HEIGHT_RAW_LOWER) as u32;
        ((raw - HEIGHT_RAW_LOWER) as u32 * 100 / span) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_lower_breakpoint_is_grounded() {
        assert_eq!(raw_to_percent(0), 0);
        assert_eq!(raw_to_percent(HEIGHT_RAW_LOWER - 1), 0);
        assert_eq!(raw_to_percent(HEIGHT_RAW_LOWER), 0);
    }

    #[test]
    fn at_or_above_upper_breakpoint_is_full() {
        assert_eq!(raw_to_percent(HEIGHT_RAW_UPPER), 100);
        assert_eq!(raw_to_percent(u16::MAX), 100);
    }

    #[test]
    fn midpoint_is_half() {
        let mid = HEIGHT_RAW_LOWER + (HEIGHT_RAW_UPPER - HEIGHT_RAW_LOWER) / 2;
        assert_eq!(raw_to_percent(mid), 50);
    }

    #[test]
    fn monotonic_and_bounded_over_all_inputs() {
        let mut last = 0;
        for raw in 0..=u16::MAX {
            let pct = raw_to_percent(raw);
            assert!(pct <= 100);
            assert!(pct >= last, "dropped at raw {raw}");
            last = pct;
        }
    }

    #[test]
    fn reads_are_idempotent() {
        let height = HeightSampler::new();
        height.on_raw_sample(1200);
        let first = height.height_percent();
        assert_eq!(height.height_percent(), first);
        assert_eq!(height.raw(), 1200);
    }
}
