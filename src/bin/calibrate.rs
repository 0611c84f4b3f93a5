#![no_std]
#![no_main]

//! # heli-rig height and encoder calibration
//!
//! Streams raw height ADC samples and encoder counts as CSV over USB CDC-ACM,
//! so the height breakpoints can be read off a real rig: log a few seconds
//! resting on the stand, then a few seconds held at full height.
//!
//! ## Usage
//! ```sh
//! cargo flash --release --features firmware --bin calibrate --chip STM32F405RG
//! cat /dev/ttyACM0 > height_calib.csv
//! ```
//!
//! ## CSV format
//! `ts_ms,raw_height,height_pct,edges,yaw_deg`
//!
//! `HEIGHT_RAW_LOWER` is the mean `raw_height` while landed, `HEIGHT_RAW_UPPER`
//! the mean at the top of travel. `edges` should return to 0 each time the
//! index mark passes.

// ── Modules (explicit paths from src/bin/) ────────────────────────────────────
#[allow(dead_code)]
#[path = "../board.rs"]
mod board;
#[path = "../usb.rs"]
mod usb;
#[allow(dead_code)]
#[path = "../tasks/yaw_task.rs"]
mod yaw_task;
#[path = "../tasks/height_task.rs"]
mod height_task;

use core::fmt::Write;
use core::sync::atomic::{AtomicI16, Ordering};
use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use {defmt_rtt as _, panic_probe as _};

use heli_rig::config::ADC_TRIGGER_PERIOD;
use heli_rig::drivers::height::HeightSampler;
use heli_rig::drivers::yaw::YawEstimator;
use heli_rig::sync::{AdcEvents, EncoderEvents};

use crate::board::Board;
use crate::height_task::{adc_trigger_task, height_task};
use crate::yaw_task::encoder_edge_task;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Session length.
const CALIB_DURATION_MS: u64 = 120_000;

// ── Shared state ──────────────────────────────────────────────────────────────
static ENCODER_EDGES: EncoderEvents = EncoderEvents::new();
static ADC_SAMPLES: AdcEvents = AdcEvents::new();
static HEIGHT: HeightSampler = HeightSampler::new();
static EDGES: AtomicI16 = AtomicI16::new(0);
static YAW_DEG: AtomicI16 = AtomicI16::new(0);

// ── Encoder counting ──────────────────────────────────────────────────────────
#[embassy_executor::task]
async fn edge_count_task(events: &'static EncoderEvents) {
    let mut estimator = YawEstimator::new();
    loop {
        estimator.on_encoder_edge(events.take().await);
        EDGES.store(estimator.edge_count(), Ordering::Relaxed);
        YAW_DEG.store(estimator.angle(), Ordering::Relaxed);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init();

    // USB CDC
    let (usb_dev, console) = usb::init(board.usb);
    spawner.must_spawn(usb::usb_task(usb_dev));

    // LED (PC13)
    let mut led = Output::new(board.led, Level::High, Speed::Low);

    // Height ADC
    let adc = Adc::new(board.height.adc, &mut Delay);
    spawner.must_spawn(height_task(&ADC_SAMPLES, &HEIGHT));
    spawner.must_spawn(adc_trigger_task(adc, board.height.sensor, &ADC_SAMPLES));

    // Encoder
    let encoder = board.encoder;
    let channel_a = ExtiInput::new(Input::new(encoder.channel_a, Pull::None), encoder.exti_a);
    let channel_b = ExtiInput::new(Input::new(encoder.channel_b, Pull::None), encoder.exti_b);
    let index = Input::new(encoder.reference, Pull::Up);
    spawner.must_spawn(edge_count_task(&ENCODER_EDGES));
    spawner.must_spawn(encoder_edge_task(channel_a, channel_b, index, &ENCODER_EDGES));

    // ── Wait for a terminal (max 30 s, then start anyway) ─────────────────────
    for _ in 0..300u32 {
        led.toggle();
        Timer::after(Duration::from_millis(100)).await;
        if console.lock().await.dtr() {
            break;
        }
    }
    led.set_high();

    usb::write_chunked(
        console,
        b"# heli-rig height calibration, 10 Hz\r\n\
          # ts_ms,raw_height,height_pct,edges,yaw_deg\r\n",
    )
    .await;

    // ── Acquisition loop ──────────────────────────────────────────────────────
    let start = Instant::now();
    let mut ticker = Ticker::every(ADC_TRIGGER_PERIOD);
    let mut n: u32 = 0;

    loop {
        ticker.next().await;

        let elapsed_ms = start.elapsed().as_millis();
        if elapsed_ms >= CALIB_DURATION_MS {
            break;
        }

        let mut line = heapless::String::<64>::new();
        let _ = write!(
            line,
            "{},{},{},{},{}\r\n",
            elapsed_ms,
            HEIGHT.raw(),
            HEIGHT.height_percent(),
            EDGES.load(Ordering::Relaxed),
            YAW_DEG.load(Ordering::Relaxed),
        );
        usb::write_chunked(console, line.as_bytes()).await;

        n += 1;
        if n % 10 == 0 {
            led.toggle();
        }
    }

    // ── Done ──────────────────────────────────────────────────────────────────
    let mut footer = heapless::String::<96>::new();
    let _ = write!(
        footer,
        "# END: {} samples | dropped encoder {} adc {}\r\n",
        n,
        ENCODER_EDGES.dropped(),
        ADC_SAMPLES.dropped()
    );
    usb::write_chunked(console, footer.as_bytes()).await;

    // Fast blink: session over
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(50)).await;
    }
}
