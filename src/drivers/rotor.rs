use crate::state::MotorCommand;

/// Compare value for a duty percentage on a timer whose full period is
/// `max_duty` counts. Duties above 100 % saturate.
pub fn duty_to_compare(duty_pct: u8, max_duty: u16) -> u16 {
    let pct = duty_pct.min(100) as u32;
    (max_duty as u32 * pct / 100) as u16
}

/// Compare values for both rotors, `(main, tail)`.
pub fn command_to_compare(cmd: MotorCommand, max_duty: u16) -> (u16, u16) {
    (
        duty_to_compare(cmd.main_duty, max_duty),
        duty_to_compare(cmd.tail_duty, max_duty),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_percent_onto_period() {
        assert_eq!(duty_to_compare(0, 4000), 0);
        assert_eq!(duty_to_compare(50, 4000), 2000);
        assert_eq!(duty_to_compare(100, 4000), 4000);
        assert_eq!(duty_to_compare(74, 1000), 740);
    }

    #[test]
    fn saturates_above_full_duty() {
        assert_eq!(duty_to_compare(250, 4000), 4000);
    }

    #[test]
    fn full_scale_period_does_not_overflow() {
        assert_eq!(duty_to_compare(100, u16::MAX), u16::MAX);
    }

    #[test]
    fn command_maps_main_then_tail() {
        let (main, tail) = command_to_compare(MotorCommand::new(50, 30), 1000);
        assert_eq!(main, 300);
        assert_eq!(tail, 500);
    }
}
