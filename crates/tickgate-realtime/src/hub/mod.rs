//! The connection hub.
//!
//! A single coordinator task owns the registry of live sessions. Nothing
//! else can touch the map: callers hold a [`HubHandle`] and submit
//! register, unregister and broadcast messages over bounded channels.

mod command;
mod coordinator;
mod handle;

pub use command::{BroadcastReport, HubSnapshot};
pub use coordinator::Hub;
pub use handle::HubHandle;
