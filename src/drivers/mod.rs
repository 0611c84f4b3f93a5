pub mod height;
pub mod pid;
pub mod rotor;
pub mod yaw;
