pub mod event_bus;
pub mod frame;
pub mod tick;

pub use event_bus::*;
pub use frame::*;
pub use tick::*;
