use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::peripherals::{ADC1, PC1};
use embassy_time::Ticker;

use heli_rig::config::ADC_TRIGGER_PERIOD;
use heli_rig::drivers::height::HeightSampler;
use heli_rig::sync::AdcEvents;

/// Converts the height channel at a fixed rate and posts each result as an
/// ADC-ready event.
#[embassy_executor::task]
pub async fn adc_trigger_task(mut adc: Adc<'static, ADC1>, mut sensor: PC1, events: &'static AdcEvents) {
    adc.set_sample_time(SampleTime::Cycles480);

    let mut ticker = Ticker::every(ADC_TRIGGER_PERIOD);
    loop {
        ticker.next().await;
        let raw = adc.read(&mut sensor);
        let _ = events.give(raw);
    }
}

#[embassy_executor::task]
pub async fn height_task(events: &'static AdcEvents, height: &'static HeightSampler) {
    loop {
        let raw = events.take().await;
        height.on_raw_sample(raw);
        defmt::trace!("height raw={} pct={}", raw, height.height_percent());
    }
}
