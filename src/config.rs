//! Compile-time calibration and tuning.

use embassy_time::Duration;

// ── Sensors ───────────────────────────────────────────────────────────────────

/// Quadrature edges per full revolution of the yaw encoder.
pub const ENCODER_SLOTS: i16 = 448;

/// Raw ADC reading with the rig resting on its base.
pub const HEIGHT_RAW_LOWER: u16 = 160;
/// Raw ADC reading at full height.
pub const HEIGHT_RAW_UPPER: u16 = 2240;

// ── Timing ────────────────────────────────────────────────────────────────────

/// Control loop period.
pub const CONTROL_PERIOD: Duration = Duration::from_millis(25);
/// Height conversion trigger period (10 Hz).
pub const ADC_TRIGGER_PERIOD: Duration = Duration::from_millis(100);
/// PWM carrier for both rotors.
pub const ROTOR_PWM_HZ: u32 = 250;

// ── Queues ────────────────────────────────────────────────────────────────────

/// Encoder edges that may be pending before new ones are dropped.
pub const ENCODER_EVENT_DEPTH: usize = 16;
/// ADC conversions that may be pending before new ones are dropped.
pub const ADC_EVENT_DEPTH: usize = 10;
pub const COMMAND_QUEUE_DEPTH: usize = 2;
pub const TELEMETRY_QUEUE_DEPTH: usize = 10;

/// Telemetry batches between two text reports (20 x 25 ms = 500 ms).
pub const REPORT_EVERY: u32 = 20;

// ── Controller ────────────────────────────────────────────────────────────────

/// Fixed tail and main rotor duty, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDuty {
    pub tail: u8,
    pub main: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlConfig {
    pub tail_kp: i32,
    /// Integer division on purpose: the rig has always flown with ki = 0.
    pub tail_ki: i32,
    pub tail_integral_limit: i32,
    /// Base tail duty the PI output is added to.
    pub duty_offset: i32,
    /// Upper bound of the tail duty band. The lower bound is `duty_offset / 2`.
    pub duty_max: i32,
    pub idle: StateDuty,
    pub takeoff: StateDuty,
    /// Only `main` is used; the tail is under closed-loop control while flying.
    pub flying: StateDuty,
    pub landing: StateDuty,
    /// Height (percent) above which takeoff hands over to flying.
    pub takeoff_height: u8,
}

impl ControlConfig {
    #[allow(clippy::eq_op)]
    pub const DEFAULT: Self = Self {
        tail_kp: 5,
        tail_ki: 1 / 1000,
        tail_integral_limit: 5,
        duty_offset: 74,
        duty_max: 95,
        idle: StateDuty { tail: 0, main: 0 },
        takeoff: StateDuty { tail: 74, main: 90 },
        flying: StateDuty { tail: 74, main: 90 },
        landing: StateDuty { tail: 50, main: 30 },
        takeoff_height: 50,
    };

    pub const fn duty_min(&self) -> i32 {
        self.duty_offset / 2
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
