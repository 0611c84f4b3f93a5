use crate::config::ControlConfig;
use crate::drivers::pid::PiController;

/// Signed yaw error along the shorter way round, in `[-180, 180]`.
pub fn yaw_error(reference_deg: i16, current_deg: i16) -> i16 {
    let mut error = reference_deg as i32 - current_deg as i32;
    if error > 180 {
        error -= 360;
    } else if error < -180 {
        error += 360;
    }
    error.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Closed-loop tail rotor duty.
///
/// The PI output is added to a base duty and held inside
/// `[duty_offset / 2, duty_max]` whatever the controller asks for.
pub struct TailController {
    pi: PiController,
    duty_offset: i32,
    duty_min: i32,
    duty_max: i32,
}

impl TailController {
    pub const fn new(config: &ControlConfig) -> Self {
        Self {
            pi: PiController::new(config.tail_kp, config.tail_ki, config.tail_integral_limit),
            duty_offset: config.duty_offset,
            duty_min: config.duty_min(),
            duty_max: config.duty_max,
        }
    }

    pub fn update(&mut self, error: i16, elapsed_ms: u16) -> u8 {
        self.pi.update(error, elapsed_ms);
        self.duty()
    }

    pub fn duty(&self) -> u8 {
        let duty = self.pi.output().saturating_add(self.duty_offset);
        duty.clamp(self.duty_min, self.duty_max) as u8
    }

    pub fn pi(&self) -> &PiController {
        &self.pi
    }
}
