//! Shared message types passed between tasks.
//!
//! All types are `Copy` so they move through embassy channels by value.

// ── Flight phase ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlightState {
    #[default]
    Idle,
    Takeoff,
    Flying,
    Landing,
}

impl FlightState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Takeoff => "TAKEOFF",
            Self::Flying => "FLYING",
            Self::Landing => "LANDING",
        }
    }
}

// ── Actuation ─────────────────────────────────────────────────────────────────

/// Duty cycles for one control tick, each 0–100 %.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub tail_duty: u8,
    pub main_duty: u8,
}

impl MotorCommand {
    pub const OFF: Self = Self { tail_duty: 0, main_duty: 0 };

    pub const fn new(tail_duty: u8, main_duty: u8) -> Self {
        Self { tail_duty, main_duty }
    }
}

// ── Operator input ────────────────────────────────────────────────────────────

/// Setpoints supplied by the input collaborator. Read-only to the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceInputs {
    pub yaw_deg: i16,
    pub height_pct: u8,
    /// Takeoff request.
    pub button_pushed: bool,
}

// ── Telemetry ─────────────────────────────────────────────────────────────────

/// One labelled reading for the telemetry sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Yaw(i16),
    ReferenceYaw(i16),
    Height(u8),
    ReferenceHeight(u8),
    State(FlightState),
    TailDuty(u8),
}

impl Reading {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Yaw(_) => "Current Yaw",
            Self::ReferenceYaw(_) => "Reference Yaw",
            Self::Height(_) => "Current Height",
            Self::ReferenceHeight(_) => "Reference Height",
            Self::State(_) => "Current State",
            Self::TailDuty(_) => "Tail Duty",
        }
    }
}
