//! Scoped redirection of document-level listener registration.
//!
//! The engine's input layer registers its keyboard and text listeners on the
//! top-level document. While the engine is constructed and started, those
//! registrations must land on the rendering surface instead. A
//! [`RedirectScope`] holds the redirection for exactly that window and
//! restores normal registration when dropped, so the restore also happens on
//! `?` returns and during unwinding.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use crate::error::SceneError;

/// The capability to send document listener registrations to the surface.
pub trait ListenerRedirect {
    /// Start sending document listener registrations to the surface.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Redirect`] when the redirection cannot be put in
    /// place. Nothing is left redirected in that case.
    fn redirect(&self) -> Result<(), SceneError>;

    /// Put the original registration back. Must be safe to call when no
    /// redirection is active.
    fn restore(&self);
}

/// Guard for an active redirection.
#[must_use = "the redirection ends as soon as the scope is dropped"]
pub struct RedirectScope<'a, R: ListenerRedirect + ?Sized> {
    target: &'a R,
}

impl<'a, R: ListenerRedirect + ?Sized> RedirectScope<'a, R> {
    /// Redirect registrations until the returned scope is dropped.
    ///
    /// # Errors
    ///
    /// Propagates the failure from [`ListenerRedirect::redirect`].
    pub fn acquire(target: &'a R) -> Result<Self, SceneError> {
        target.redirect()?;
        log::debug!("document listener registration redirected to surface");
        Ok(Self { target })
    }
}

impl<R: ListenerRedirect + ?Sized> Drop for RedirectScope<'_, R> {
    fn drop(&mut self) {
        self.target.restore();
        log::debug!("document listener registration restored");
    }
}
