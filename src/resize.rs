//! Container size tracking.
//!
//! Keeps the rendering surface's pixel dimensions equal to the container's
//! measured box. Every observed change produces one `setSize` + `render`
//! pair on the engine; there is no debouncing.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use std::cell::{Cell, RefCell};

use crate::engine::SceneEngine;
use crate::error::SceneError;
use crate::platform::{Subscription, Surface};

/// Surface dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a measured `clientWidth`/`clientHeight` pair, clamping
    /// negative values to zero.
    #[must_use]
    pub fn from_client(width: i32, height: i32) -> Self {
        Self { width: u32::try_from(width).unwrap_or(0), height: u32::try_from(height).unwrap_or(0) }
    }
}

/// Outcome of one resize cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The container or the surface is not mounted; nothing changed.
    Detached,
    /// The surface was resized but there is no engine handle to notify.
    SurfaceOnly(ViewportSize),
    /// The engine received `setSize` followed by `render`.
    Applied(ViewportSize),
}

/// Follows the container's size and pushes it into the surface and engine.
#[derive(Debug)]
pub struct ResizeWatcher {
    viewport: Cell<ViewportSize>,
    observation: RefCell<Option<Subscription>>,
}

impl ResizeWatcher {
    #[must_use]
    pub fn new(initial: ViewportSize) -> Self {
        Self { viewport: Cell::new(initial), observation: RefCell::new(None) }
    }

    /// Last size pushed to the surface.
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport.get()
    }

    /// Hold the container observer for the watcher's lifetime. Replaces (and
    /// so disconnects) any earlier observation.
    pub fn observe(&self, observation: Subscription) {
        drop(self.observation.replace(Some(observation)));
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observation.borrow().is_some()
    }

    /// Stop observing. Returns `false` when nothing was being observed.
    pub fn disconnect(&self) -> bool {
        let observation = self.observation.borrow_mut().take();
        match observation {
            Some(observation) => {
                observation.cancel();
                true
            }
            None => false,
        }
    }

    /// Run one resize cycle against the measured container box.
    ///
    /// # Errors
    ///
    /// Propagates a failing `setSize` or `render` engine call.
    pub fn sync<S, E>(
        &self,
        measured: Option<ViewportSize>,
        surface: Option<&S>,
        engine: Option<&E>,
    ) -> Result<ResizeOutcome, SceneError>
    where
        S: Surface + ?Sized,
        E: SceneEngine + ?Sized,
    {
        let (Some(size), Some(surface)) = (measured, surface) else {
            return Ok(ResizeOutcome::Detached);
        };
        self.viewport.set(size);
        surface.set_backing_size(size);
        let Some(engine) = engine else {
            return Ok(ResizeOutcome::SurfaceOnly(size));
        };
        engine.set_size(size.width, size.height)?;
        engine.render()?;
        Ok(ResizeOutcome::Applied(size))
    }
}
