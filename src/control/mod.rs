pub mod fsm;
pub mod tail;

use embassy_time::Duration;

use crate::config::ControlConfig;
use crate::drivers::height::HeightSampler;
use crate::state::{FlightState, Reading};
use crate::sync::{AngleCell, CommandLink, ReferenceStore, TelemetryLink};

pub use fsm::{FlightInputs, FlightStateMachine, Tick};

/// Where the control loop reads its inputs and sends its outputs.
#[derive(Clone, Copy)]
pub struct ControlIo<'a> {
    pub yaw: &'a AngleCell,
    pub height: &'a HeightSampler,
    pub reference: &'a ReferenceStore,
    pub commands: &'a CommandLink,
    pub telemetry: &'a TelemetryLink,
}

/// One periodic control tick: sample, sequence, publish.
pub struct ControlLoop<'a> {
    fsm: FlightStateMachine,
    io: ControlIo<'a>,
}

impl<'a> ControlLoop<'a> {
    pub fn new(config: ControlConfig, io: ControlIo<'a>) -> Self {
        Self {
            fsm: FlightStateMachine::new(config),
            io,
        }
    }

    pub fn state(&self) -> FlightState {
        self.fsm.state()
    }

    /// Run the state machine once and publish its command and readings.
    ///
    /// Only waits if a consumer has stalled and its link is full.
    pub async fn tick(&mut self, elapsed_ms: u16) -> Tick {
        let reference = self.io.reference.take_snapshot();
        let inputs = FlightInputs {
            yaw_deg: self.io.yaw.degrees(),
            height_pct: self.io.height.height_percent(),
            reference,
            elapsed_ms,
        };

        let tick = self.fsm.step(&inputs);

        self.io.commands.publish(tick.command).await;

        let readings = [
            Reading::Yaw(inputs.yaw_deg),
            Reading::ReferenceYaw(reference.yaw_deg),
            Reading::Height(inputs.height_pct),
            Reading::ReferenceHeight(reference.height_pct),
            Reading::State(tick.state),
            Reading::TailDuty(tick.command.tail_duty),
        ];
        for reading in readings {
            self.io.telemetry.publish(reading).await;
        }

        tick
    }
}

/// Whole milliseconds in `elapsed`, saturated to `u16`.
pub fn elapsed_ms(elapsed: Duration) -> u16 {
    elapsed.as_millis().min(u16::MAX as u64) as u16
}
