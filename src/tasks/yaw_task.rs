use embassy_futures::select::select;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;
use embassy_stm32::peripherals::{PC4, PC6, PC7};

use heli_rig::drivers::yaw::{EncoderSample, YawEstimator};
use heli_rig::sync::{AngleCell, EncoderEvents};

/// Interrupt side of the encoder: samples the pins on every edge of A or B
/// and hands the sample on. Never touches the yaw state.
#[embassy_executor::task]
pub async fn encoder_edge_task(
    mut channel_a: ExtiInput<'static, PC6>,
    mut channel_b: ExtiInput<'static, PC7>,
    reference: Input<'static, PC4>,
    events: &'static EncoderEvents,
) {
    loop {
        select(channel_a.wait_for_any_edge(), channel_b.wait_for_any_edge()).await;

        let sample = EncoderSample::new(channel_a.is_high(), channel_b.is_high(), reference.is_high());
        // Drops are counted by the queue.
        let _ = events.give(sample);
    }
}

#[embassy_executor::task]
pub async fn yaw_task(events: &'static EncoderEvents, angle: &'static AngleCell) {
    let mut estimator = YawEstimator::new();
    loop {
        let sample = events.take().await;
        estimator.on_encoder_edge(sample);
        angle.publish(estimator.angle());
    }
}
