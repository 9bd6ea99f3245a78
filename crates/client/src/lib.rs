//! Async UDP client for X-Plane.
//!
//! X-Plane exposes state and controls over a fixed UDP packet protocol
//! (default `127.0.0.1:49000`, configurable in the simulator's network
//! settings). This crate layers three things on top of the
//! [`xplane_connect_protocol`] codec:
//!
//! - **Subscriptions**: [`XPlaneClient::subscribe`] requests continuous
//!   dataref streams; a background listener task keeps the latest value
//!   and observation time per dataref, readable via
//!   [`XPlaneClient::current_values`].
//! - **One-shot queries**: [`XPlaneClient::get_dataref`] and
//!   [`XPlaneClient::get_pose`] block for a single reply on a private
//!   socket, then cancel the stream they implicitly created.
//! - **Fire-and-forget commands**: dataref writes, simulator commands,
//!   pose injection, control surfaces, and pause/resume.
//!
//! UDP gives no delivery guarantee and this crate adds none: a lost packet
//! shows up only as a stale [`ObservedValue`], and callers that need
//! freshness compare timestamps themselves.

#![deny(static_mut_refs)]

mod client;
mod controls;
mod error;
mod listener;
mod registry;

pub use client::{CMND_PAUSE_OFF, CMND_PAUSE_ON, XPlaneClient};
pub use controls::{
    ControlSurfaces, DREF_FLAPS, DREF_GEAR_HANDLE, DREF_PARK_BRAKE, DREF_SPEEDBRAKE, DREF_THROTTLE,
    DREF_YOKE_HEADING, DREF_YOKE_PITCH, DREF_YOKE_ROLL,
};
pub use error::{ClientError, Result};
pub use registry::ObservedValue;

pub use xplane_connect_protocol::{
    DEFAULT_XPLANE_PORT, EncodeError, PoseCommand, PoseSnapshot, ProtocolError,
};
