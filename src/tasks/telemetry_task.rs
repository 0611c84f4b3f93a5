use heli_rig::config::REPORT_EVERY;
use heli_rig::sync::TelemetryLink;
use heli_rig::telemetry::TelemetryFrame;

use crate::usb::{self, Console};

#[embassy_executor::task]
pub async fn telemetry_task(readings: &'static TelemetryLink, console: &'static Console) {
    let mut frame = TelemetryFrame::new();

    loop {
        let reading = readings.receive().await;
        if !frame.apply(reading) || !frame.report_due(REPORT_EVERY) {
            continue;
        }

        defmt::debug!(
            "yaw {}/{} height {}/{} state {} tail {}",
            frame.yaw_deg,
            frame.reference_yaw_deg,
            frame.height_pct,
            frame.reference_height_pct,
            frame.state,
            frame.tail_duty,
        );

        let report = frame.report();
        usb::write_chunked(console, report.as_bytes()).await;
    }
}
