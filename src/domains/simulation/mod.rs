pub mod coordinator;
pub mod event_log;
pub mod events;
pub mod input;
pub mod registry;

pub use coordinator::*;
pub use event_log::*;
pub use events::*;
pub use input::*;
pub use registry::*;
