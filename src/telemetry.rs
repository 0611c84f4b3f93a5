//! Telemetry sink state.
//!
//! The control loop publishes one batch of [`Reading`]s per tick, closing
//! with the tail duty. The sink folds them into a [`TelemetryFrame`] and
//! prints a report every few batches.

use core::fmt::{self, Write};

use crate::state::{FlightState, Reading};

pub const REPORT_CAPACITY: usize = 192;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub yaw_deg: i16,
    pub reference_yaw_deg: i16,
    pub height_pct: u8,
    pub reference_height_pct: u8,
    pub state: FlightState,
    pub tail_duty: u8,
    batches: u32,
}

impl TelemetryFrame {
    pub const fn new() -> Self {
        Self {
            yaw_deg: 0,
            reference_yaw_deg: 0,
            height_pct: 0,
            reference_height_pct: 0,
            state: FlightState::Idle,
            tail_duty: 0,
            batches: 0,
        }
    }

    /// Fold in one reading. Returns `true` when it completed a batch.
    pub fn apply(&mut self, reading: Reading) -> bool {
        match reading {
            Reading::Yaw(v) => self.yaw_deg = v,
            Reading::ReferenceYaw(v) => self.reference_yaw_deg = v,
            Reading::Height(v) => self.height_pct = v,
            Reading::ReferenceHeight(v) => self.reference_height_pct = v,
            Reading::State(s) => self.state = s,
            Reading::TailDuty(v) => {
                self.tail_duty = v;
                self.batches = self.batches.wrapping_add(1);
                return true;
            }
        }
        false
    }

    pub fn batches(&self) -> u32 {
        self.batches
    }

    /// Whether the latest completed batch should be reported.
    pub fn report_due(&self, every: u32) -> bool {
        every != 0 && self.batches % every == 0
    }

    pub fn render<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "Current Yaw: {}\r\n", self.yaw_deg)?;
        write!(out, "Reference Yaw: {}\r\n", self.reference_yaw_deg)?;
        write!(out, "Current Height: {}\r\n", self.height_pct)?;
        write!(out, "Reference Height: {}\r\n", self.reference_height_pct)?;
        write!(out, "Current State: {}\r\n", self.state.label())?;
        write!(out, "Tail Duty: {}\r\n\r\n", self.tail_duty)
    }

    pub fn report(&self) -> heapless::String<REPORT_CAPACITY> {
        let mut s = heapless::String::new();
        if self.render(&mut s).is_err() {
            warn!("telemetry report truncated at {} bytes", s.len());
        }
        s
    }
}
