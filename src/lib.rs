//! Host bridge for the embedded vtk3d scene engine.
//!
//! The engine ships as a pre-built WebAssembly module that draws into a
//! canvas. It cannot route input correctly on its own (it listens on the
//! top-level document and loses modifier keys held while focus is elsewhere),
//! and it knows nothing about the host's configuration or layout. This crate
//! owns both concerns: the input routing layer and the lifecycle orchestrator
//! that keeps the engine in sync with camera, geometry, color map and path
//! prefix configuration and with the container's on-screen size.
//!
//! Everything except [`web`] is browser-independent and tested natively
//! against mock platforms. The `web` feature supplies the web-sys
//! implementations and the `Vtk3dScene` class exported to JavaScript.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | Lifecycle orchestrator ([`host::SceneHost`]) and the [`host::Platform`] seam |
//! | [`router`] | Input routing between the document and the rendering surface |
//! | [`keys`] | Modifier key tracking |
//! | [`redirect`] | Scoped redirection of document listener registration |
//! | [`resize`] | Container size tracking |
//! | [`engine`] | Engine handle and binary module seams |
//! | [`platform`] | Surface, scheduler and subscription primitives |
//! | [`config`] | Scene options and the externally supplied configuration snapshot |
//! | [`event`] | Typed engine events re-emitted to the host |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared constants (locator, default size, event prefix) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod event;
pub mod host;
pub mod keys;
pub mod platform;
pub mod redirect;
pub mod resize;
pub mod router;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod testing;

pub use error::SceneError;
pub use event::SceneEvent;
pub use host::{Phase, Platform, SceneHost};
