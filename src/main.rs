#![no_std]
#![no_main]

mod board;
mod tasks;
mod usb;

use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::time::hz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::CountingMode;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use heli_rig::config::{CONTROL_PERIOD, ROTOR_PWM_HZ};
use heli_rig::control::ControlIo;
use heli_rig::drivers::height::HeightSampler;
use heli_rig::sync::{AdcEvents, AngleCell, CommandLink, EncoderEvents, ReferenceStore, TelemetryLink};

use crate::board::Board;
use crate::tasks::control_task::control_task;
use crate::tasks::height_task::{adc_trigger_task, height_task};
use crate::tasks::input_task::{input_task, Buttons};
use crate::tasks::rotor_task::rotor_task;
use crate::tasks::telemetry_task::telemetry_task;
use crate::tasks::yaw_task::{encoder_edge_task, yaw_task};

// ── Interrupt-side event queues ───────────────────────────────────────────────
static ENCODER_EDGES: EncoderEvents = EncoderEvents::new();
static ADC_SAMPLES: AdcEvents = AdcEvents::new();

// ── Inter-task links ──────────────────────────────────────────────────────────
static MOTOR_COMMANDS: CommandLink = CommandLink::new();
static TELEMETRY: TelemetryLink = TelemetryLink::new();

// ── Shared readouts (one writer each) ─────────────────────────────────────────
static YAW_ANGLE: AngleCell = AngleCell::new();
static HEIGHT: HeightSampler = HeightSampler::new();
static REFERENCE: ReferenceStore = ReferenceStore::new();

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL)
    let board = Board::init();

    // 2. Rotors, held at zero duty before anything can command them
    let rotors = board.rotors;
    let pwm = SimplePwm::new(
        rotors.timer,
        Some(PwmPin::new_ch1(rotors.main, OutputType::PushPull)),
        Some(PwmPin::new_ch2(rotors.tail, OutputType::PushPull)),
        None,
        None,
        hz(ROTOR_PWM_HZ),
        CountingMode::EdgeAlignedUp,
    );
    spawner.must_spawn(rotor_task(pwm, &MOTOR_COMMANDS));

    // 3. USB console
    let (usb_dev, console) = usb::init(board.usb);
    spawner.must_spawn(usb::usb_task(usb_dev));

    // 4. Height: ADC1 on PC1, 10 Hz
    let adc = Adc::new(board.height.adc, &mut Delay);
    spawner.must_spawn(height_task(&ADC_SAMPLES, &HEIGHT));
    spawner.must_spawn(adc_trigger_task(adc, board.height.sensor, &ADC_SAMPLES));

    // 5. Yaw: quadrature on PC6/PC7, index on PC4
    let encoder = board.encoder;
    let channel_a = ExtiInput::new(Input::new(encoder.channel_a, Pull::None), encoder.exti_a);
    let channel_b = ExtiInput::new(Input::new(encoder.channel_b, Pull::None), encoder.exti_b);
    let index = Input::new(encoder.reference, Pull::Up);
    spawner.must_spawn(yaw_task(&ENCODER_EDGES, &YAW_ANGLE));
    spawner.must_spawn(encoder_edge_task(channel_a, channel_b, index, &ENCODER_EDGES));

    // 6. Operator input and telemetry, both printing on the console
    spawner.must_spawn(input_task(Buttons::new(board.inputs), &REFERENCE, console));
    spawner.must_spawn(telemetry_task(&TELEMETRY, console));

    // 7. Control loop
    spawner.must_spawn(control_task(ControlIo {
        yaw: &YAW_ANGLE,
        height: &HEIGHT,
        reference: &REFERENCE,
        commands: &MOTOR_COMMANDS,
        telemetry: &TELEMETRY,
    }));

    defmt::info!("heli-rig up, control period {} ms", CONTROL_PERIOD.as_millis());

    // 8. Heartbeat LED @ 1 Hz, lost-event counts every 10 s
    let mut led = Output::new(board.led, Level::High, Speed::Low);
    let mut half_seconds: u32 = 0;
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
        half_seconds = half_seconds.wrapping_add(1);
        if half_seconds % 20 == 0 {
            defmt::debug!(
                "dropped events: encoder {} adc {}",
                ENCODER_EDGES.dropped(),
                ADC_SAMPLES.dropped()
            );
        }
    }
}
