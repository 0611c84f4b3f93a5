pub mod control_task;
pub mod height_task;
pub mod input_task;
pub mod rotor_task;
pub mod telemetry_task;
pub mod yaw_task;
