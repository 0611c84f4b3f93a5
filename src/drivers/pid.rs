/// Integer proportional-integral controller.
///
/// The integral is the sum of `error * elapsed_ms`, clamped symmetrically to
/// `[-limit, limit]` after every update.
pub struct PiController {
    kp: i32,
    ki: i32,
    integral_limit: i32,
    integral: i32,
    last_error: i32,
}

impl PiController {
    pub const fn new(kp: i32, ki: i32, integral_limit: i32) -> Self {
        Self {
            kp,
            ki,
            integral_limit: integral_limit.abs(),
            integral: 0,
            last_error: 0,
        }
    }

    /// Replace the gains and clear the accumulated state.
    pub fn init(&mut self, kp: i32, ki: i32, integral_limit: i32) {
        *self = Self::new(kp, ki, integral_limit);
    }

    pub fn reset(&mut self) {
        self.integral = 0;
        self.last_error = 0;
    }

    pub fn update(&mut self, error: i16, elapsed_ms: u16) {
        let step = error as i32 * elapsed_ms as i32;
        self.integral = self
            .integral
            .saturating_add(step)
            .clamp(-self.integral_limit, self.integral_limit);
        self.last_error = error as i32;
    }

    pub fn output(&self) -> i32 {
        self.kp
            .saturating_mul(self.last_error)
            .saturating_add(self.ki.saturating_mul(self.integral))
    }

    pub fn integral(&self) -> i32 {
        self.integral
    }

    pub fn last_error(&self) -> i32 {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_is_clamped_both_ways() {
        let mut pi = PiController::new(5, 0, 5);
        pi.update(100, 25);
        assert_eq!(pi.integral(), 5);
        pi.update(-100, 25);
        assert_eq!(pi.integral(), -5);
        pi.update(1, 2);
        assert_eq!(pi.integral(), -3);
    }

    #[test]
    fn output_is_proportional_only_when_ki_truncates() {
        #[allow(clippy::eq_op)]
        let ki = 1 / 1000;
        let mut pi = PiController::new(5, ki, 5);
        for error in [-180i16, -20, -1, 0, 3, 45, 180] {
            pi.update(error, 25);
            assert!(pi.integral().abs() <= 5);
            assert_eq!(pi.output(), 5 * error as i32);
        }
    }

    #[test]
    fn integral_term_contributes_when_ki_set() {
        let mut pi = PiController::new(2, 3, 100);
        pi.update(4, 10);
        assert_eq!(pi.integral(), 40);
        assert_eq!(pi.output(), 2 * 4 + 3 * 40);
    }

    #[test]
    fn init_clears_state() {
        let mut pi = PiController::new(5, 1, 50);
        pi.update(10, 3);
        pi.init(1, 1, 10);
        assert_eq!(pi.integral(), 0);
        assert_eq!(pi.last_error(), 0);
        assert_eq!(pi.output(), 0);
    }

    #[test]
    fn extreme_inputs_do_not_overflow() {
        let mut pi = PiController::new(i32::MAX, i32::MAX, i32::MAX);
        pi.update(i16::MAX, u16::MAX);
        pi.update(i16::MAX, u16::MAX);
        assert_eq!(pi.output(), i32::MAX);
        pi.reset();
        pi.update(i16::MIN, u16::MAX);
        assert_eq!(pi.output(), i32::MIN);
    }
}
