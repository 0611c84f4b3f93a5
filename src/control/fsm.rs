use crate::config::ControlConfig;
use crate::control::tail::{yaw_error, TailController};
use crate::state::{FlightState, MotorCommand, ReferenceInputs};

/// Everything one tick of the state machine looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlightInputs {
    pub yaw_deg: i16,
    pub height_pct: u8,
    pub reference: ReferenceInputs,
    /// Time since the previous tick.
    pub elapsed_ms: u16,
}

/// Outcome of one tick: the state for the next tick and what to actuate now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    pub state: FlightState,
    pub command: MotorCommand,
}

/// Takeoff / fly / land sequencer.
///
/// | state   | actuation                     | leaves when                  |
/// |---------|-------------------------------|------------------------------|
/// | Idle    | both off                      | button pushed → Takeoff      |
/// | Takeoff | fixed                         | height > threshold → Flying  |
/// | Flying  | tail closed-loop, main fixed  | reference height 0 → Landing |
/// | Landing | fixed                         | height 0 → Idle              |
pub struct FlightStateMachine {
    state: FlightState,
    tail: TailController,
    config: ControlConfig,
}

impl FlightStateMachine {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            state: FlightState::Idle,
            tail: TailController::new(&config),
            config,
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn tail(&self) -> &TailController {
        &self.tail
    }

    pub fn step(&mut self, inputs: &FlightInputs) -> Tick {
        let (next, command) = match self.state {
            FlightState::Idle => self.idle(inputs),
            FlightState::Takeoff => self.takeoff(inputs),
            FlightState::Flying => self.flying(inputs),
            FlightState::Landing => self.landing(inputs),
        };

        if next != self.state {
            info!("flight state {} -> {}", self.state.label(), next.label());
        }
        self.state = next;

        Tick { state: next, command }
    }

    fn idle(&self, inputs: &FlightInputs) -> (FlightState, MotorCommand) {
        let duty = self.config.idle;
        let next = if inputs.reference.button_pushed {
            FlightState::Takeoff
        } else {
            FlightState::Idle
        };
        (next, MotorCommand::new(duty.tail, duty.main))
    }

    fn takeoff(&self, inputs: &FlightInputs) -> (FlightState, MotorCommand) {
        let duty = self.config.takeoff;
        let next = if inputs.height_pct > self.config.takeoff_height {
            FlightState::Flying
        } else {
            FlightState::Takeoff
        };
        (next, MotorCommand::new(duty.tail, duty.main))
    }

    fn flying(&mut self, inputs: &FlightInputs) -> (FlightState, MotorCommand) {
        let error = yaw_error(inputs.reference.yaw_deg, inputs.yaw_deg);
        let tail = self.tail.update(error, inputs.elapsed_ms);
        trace!("yaw error {} tail duty {}", error, tail);

        let next = if inputs.reference.height_pct == 0 {
            FlightState::Landing
        } else {
            FlightState::Flying
        };
        (next, MotorCommand::new(tail, self.config.flying.main))
    }

    fn landing(&self, inputs: &FlightInputs) -> (FlightState, MotorCommand) {
        let duty = self.config.landing;
        let next = if inputs.height_pct == 0 {
            FlightState::Idle
        } else {
            FlightState::Landing
        };
        (next, MotorCommand::new(duty.tail, duty.main))
    }
}

impl Default for FlightStateMachine {
    fn default() -> Self {
        Self::new(ControlConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(height_pct: u8, reference: ReferenceInputs) -> FlightInputs {
        FlightInputs {
            yaw_deg: 0,
            height_pct,
            reference,
            elapsed_ms: 25,
        }
    }

    fn flying_reference(yaw_deg: i16) -> ReferenceInputs {
        ReferenceInputs {
            yaw_deg,
            height_pct: 50,
            button_pushed: true,
        }
    }

    fn machine_in(state: FlightState) -> FlightStateMachine {
        let mut fsm = FlightStateMachine::default();
        let path = [
            inputs(0, ReferenceInputs { button_pushed: true, ..Default::default() }),
            inputs(60, flying_reference(0)),
            inputs(60, ReferenceInputs::default()),
        ];
        for step in path.iter() {
            if fsm.state() == state {
                break;
            }
            fsm.step(step);
        }
        assert_eq!(fsm.state(), state);
        fsm
    }

    #[test]
    fn idle_waits_for_button() {
        let mut fsm = FlightStateMachine::default();
        let tick = fsm.step(&inputs(0, ReferenceInputs::default()));
        assert_eq!(tick.state, FlightState::Idle);
        assert_eq!(tick.command, MotorCommand::OFF);
    }

    #[test]
    fn button_starts_takeoff() {
        let mut fsm = FlightStateMachine::default();
        let pushed = ReferenceInputs { button_pushed: true, ..Default::default() };
        let tick = fsm.step(&inputs(0, pushed));
        assert_eq!(tick.state, FlightState::Takeoff);
        assert_eq!(tick.command, MotorCommand::OFF);
    }

    #[test]
    fn takeoff_climbs_until_threshold() {
        let mut fsm = machine_in(FlightState::Takeoff);
        let tick = fsm.step(&inputs(50, flying_reference(0)));
        assert_eq!(tick.state, FlightState::Takeoff);
        assert_eq!(tick.command, MotorCommand::new(74, 90));

        let tick = fsm.step(&inputs(60, flying_reference(0)));
        assert_eq!(tick.state, FlightState::Flying);
        assert_eq!(tick.command, MotorCommand::new(74, 90));
    }

    #[test]
    fn flying_drives_tail_from_yaw_error() {
        let mut fsm = machine_in(FlightState::Flying);
        let mut hold = inputs(60, flying_reference(30));
        hold.yaw_deg = 27;
        let tick = fsm.step(&hold);
        assert_eq!(tick.state, FlightState::Flying);
        assert_eq!(tick.command, MotorCommand::new(89, 90));
        assert_eq!(fsm.tail().pi().last_error(), 3);
    }

    #[test]
    fn flying_lands_on_zero_reference_height_whatever_the_yaw() {
        for yaw_deg in [0, 90, 179, 270] {
            let mut fsm = machine_in(FlightState::Flying);
            let mut land = inputs(60, ReferenceInputs::default());
            land.yaw_deg = yaw_deg;
            let tick = fsm.step(&land);
            assert_eq!(tick.state, FlightState::Landing);
            assert_eq!(tick.command.main_duty, 90);
        }
    }

    #[test]
    fn landing_returns_to_idle_on_ground() {
        let mut fsm = machine_in(FlightState::Landing);
        let tick = fsm.step(&inputs(10, ReferenceInputs::default()));
        assert_eq!(tick.state, FlightState::Landing);
        assert_eq!(tick.command, MotorCommand::new(50, 30));

        let tick = fsm.step(&inputs(0, ReferenceInputs::default()));
        assert_eq!(tick.state, FlightState::Idle);
        assert_eq!(tick.command, MotorCommand::new(50, 30));
    }
}
