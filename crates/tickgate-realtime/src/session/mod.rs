//! One live connection: lifecycle state plus the two pumps that move
//! frames between the transport and the hub-fed queue.

pub mod frame;
pub mod handle;
pub mod pumps;
pub mod state;

pub use frame::Frame;
pub use handle::{SessionHandle, SessionInfo};
pub use pumps::{PumpConfig, run_inbound, run_outbound};
pub use state::{CloseReason, Lifecycle, SessionState};
