//! # tickgate-realtime
//!
//! Live WebSocket sessions for the gateway:
//!
//! - [`hub`]: the single coordinator task that owns session membership
//!   and fans broadcasts out without ever blocking on a slow client
//! - [`session`]: per-connection lifecycle and the inbound/outbound pumps
//! - [`message`]: the JSON envelope pushed to clients
//! - [`server`]: [`RealtimeEngine`], which starts and supervises the hub

pub mod hub;
pub mod message;
pub mod metrics;
pub mod server;
pub mod session;

pub use hub::{BroadcastReport, HubHandle, HubSnapshot};
pub use message::{Envelope, Payload};
pub use server::RealtimeEngine;
pub use session::{Frame, SessionHandle, SessionState};
