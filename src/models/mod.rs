pub mod attendance;
pub mod completion;
pub mod participant;
pub mod session;
