use core::fmt::Write;

use embassy_futures::select::{select, select4, Either, Either4};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::peripherals::{PA8, PB12, PB13, PB14, PB15};
use embassy_time::{Duration, Timer};

use heli_rig::sync::ReferenceStore;

use crate::board::InputPins;
use crate::usb::{self, Console};

const SETTLE: Duration = Duration::from_millis(20);
const YAW_STEP_DEG: i16 = 10;
const HEIGHT_STEP_PCT: i8 = 10;

pub struct Buttons {
    up: ExtiInput<'static, PB12>,
    down: ExtiInput<'static, PB13>,
    left: ExtiInput<'static, PB14>,
    right: ExtiInput<'static, PB15>,
    /// Rising edge requests takeoff, low lands.
    switch: ExtiInput<'static, PA8>,
}

impl Buttons {
    pub fn new(pins: InputPins) -> Self {
        Self {
            up: ExtiInput::new(Input::new(pins.up, Pull::Up), pins.exti_up),
            down: ExtiInput::new(Input::new(pins.down, Pull::Up), pins.exti_down),
            left: ExtiInput::new(Input::new(pins.left, Pull::Up), pins.exti_left),
            right: ExtiInput::new(Input::new(pins.right, Pull::Up), pins.exti_right),
            switch: ExtiInput::new(Input::new(pins.switch, Pull::Down), pins.exti_switch),
        }
    }
}

#[derive(Clone, Copy, defmt::Format)]
enum Press {
    Up,
    Down,
    Left,
    Right,
    Switch,
}

/// Operator input: buttons move the reference, the switch requests flight.
///
/// A switch already up at power-on does not request anything; it has to be
/// moved.
#[embassy_executor::task]
pub async fn input_task(mut buttons: Buttons, reference: &'static ReferenceStore, console: &'static Console) {
    loop {
        let press = match select(
            select4(
                buttons.up.wait_for_falling_edge(),
                buttons.down.wait_for_falling_edge(),
                buttons.left.wait_for_falling_edge(),
                buttons.right.wait_for_falling_edge(),
            ),
            buttons.switch.wait_for_any_edge(),
        )
        .await
        {
            Either::First(Either4::First(_)) => Press::Up,
            Either::First(Either4::Second(_)) => Press::Down,
            Either::First(Either4::Third(_)) => Press::Left,
            Either::First(Either4::Fourth(_)) => Press::Right,
            Either::Second(_) => Press::Switch,
        };

        // Debounce: act on the level once the contact has settled.
        Timer::after(SETTLE).await;

        match press {
            Press::Up if buttons.up.is_low() => reference.nudge_height(HEIGHT_STEP_PCT),
            Press::Down if buttons.down.is_low() => reference.nudge_height(-HEIGHT_STEP_PCT),
            Press::Left if buttons.left.is_low() => reference.nudge_yaw(-YAW_STEP_DEG),
            Press::Right if buttons.right.is_low() => reference.nudge_yaw(YAW_STEP_DEG),
            Press::Switch => apply_switch(buttons.switch.is_high(), reference),
            _ => continue, // bounce
        }

        let now = reference.snapshot();
        defmt::info!("{}: ref yaw {} height {} takeoff pending {}", press, now.yaw_deg, now.height_pct, now.button_pushed);

        let mut line = heapless::String::<64>::new();
        let _ = write!(
            line,
            "> ref yaw {} height {} takeoff {}\r\n",
            now.yaw_deg, now.height_pct, now.button_pushed
        );
        usb::write_chunked(console, line.as_bytes()).await;
    }
}

fn apply_switch(fly: bool, reference: &ReferenceStore) {
    if fly {
        reference.set_button_pushed(true);
    } else {
        reference.set_button_pushed(false);
        reference.set_height(0);
    }
}
