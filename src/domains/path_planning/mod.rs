pub mod actors;
pub mod ports;
pub mod types;

pub use actors::*;
pub use ports::*;
pub use types::*;
