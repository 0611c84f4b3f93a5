use embassy_time::{Instant, Ticker};

use heli_rig::config::{ControlConfig, CONTROL_PERIOD};
use heli_rig::control::{elapsed_ms, ControlIo, ControlLoop};

// ── Control loop (40 Hz) ──────────────────────────────────────────────────────
#[embassy_executor::task]
pub async fn control_task(io: ControlIo<'static>) {
    let mut control = ControlLoop::new(ControlConfig::DEFAULT, io);

    let mut ticker = Ticker::every(CONTROL_PERIOD);
    let mut last = Instant::now();
    let mut overruns: u32 = 0;

    loop {
        ticker.next().await;

        let now = Instant::now();
        let dt_ms = elapsed_ms(now - last);
        last = now;

        // A late tick means a stalled link or a starved executor.
        if u64::from(dt_ms) > CONTROL_PERIOD.as_millis() * 2 {
            overruns = overruns.wrapping_add(1);
            defmt::warn!("control tick late: {} ms ({} total)", dt_ms, overruns);
        }

        control.tick(dt_ms).await;
    }
}
