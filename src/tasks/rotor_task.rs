use embassy_stm32::peripherals::TIM3;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_stm32::timer::Channel;

use heli_rig::drivers::rotor::command_to_compare;
use heli_rig::sync::CommandLink;

const MAIN: Channel = Channel::Ch1;
const TAIL: Channel = Channel::Ch2;

/// Applies each motor command to the two PWM channels.
#[embassy_executor::task]
pub async fn rotor_task(mut pwm: SimplePwm<'static, TIM3>, commands: &'static CommandLink) {
    let max_duty = pwm.get_max_duty();
    pwm.set_duty(MAIN, 0);
    pwm.set_duty(TAIL, 0);
    pwm.enable(MAIN);
    pwm.enable(TAIL);

    loop {
        let command = commands.receive().await;
        let (main, tail) = command_to_compare(command, max_duty);
        pwm.set_duty(MAIN, main);
        pwm.set_duty(TAIL, tail);
    }
}
