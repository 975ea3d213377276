//! Input routing between the host document and the rendering surface.
//!
//! ## Why modifiers go missing
//!
//! Modifier keys pressed while focus is elsewhere never reach the surface, so
//! a drag that starts with Shift already held would look unmodified to the
//! engine. The router watches keydown/keyup on the document and remembers
//! outstanding modifiers in a [`ModifierKeyTracker`]. When the surface takes
//! focus from a pointer-down it replays those keydowns first.
//!
//! The converse case: the surface loses focus while a modifier is still held,
//! and would then miss the keyup. The router pulls focus back on the next
//! event-loop turn (a synchronous refocus from inside a blur handler is
//! ignored by browsers).
//!
//! A window blur (app switch) clears the tracker: the matching keyup is never
//! delivered to the page, so any record would go stale.
//!
//! A modifier released outside the window before the window blur is observed
//! is not handled; the record stays until the next window blur or keyup for
//! that code.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::keys::ModifierKeyTracker;
use crate::platform::{Scheduler, Surface};

/// Routes document-level keyboard state onto the rendering surface.
pub struct EventRouter<S: Surface> {
    surface: Rc<S>,
    scheduler: Rc<dyn Scheduler>,
    tracker: RefCell<ModifierKeyTracker<S::Event>>,
    /// Codes already re-delivered to the surface since they were pressed.
    replayed: RefCell<HashSet<String>>,
}

impl<S: Surface> EventRouter<S> {
    #[must_use]
    pub fn new(surface: Rc<S>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            surface,
            scheduler,
            tracker: RefCell::new(ModifierKeyTracker::new()),
            replayed: RefCell::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    /// Document `keydown`. Returns `true` when a modifier was recorded.
    pub fn on_keydown(&self, key: &str, code: &str, event: &S::Event) -> bool {
        let recorded = self.tracker.borrow_mut().press(key, code, event.clone());
        if recorded {
            log::debug!("modifier held: {key} ({code})");
        }
        recorded
    }

    /// Document `keyup`. Returns how many records were released.
    pub fn on_keyup(&self, code: &str) -> usize {
        self.replayed.borrow_mut().remove(code);
        self.tracker.borrow_mut().release(code)
    }

    /// Surface `blur`. Returns `true` when a refocus was scheduled.
    pub fn on_blur(&self) -> bool {
        if self.tracker.borrow().is_empty() {
            return false;
        }
        let surface = Rc::clone(&self.surface);
        self.scheduler.defer(Box::new(move || surface.focus()));
        log::debug!("surface blurred with modifiers held; refocus scheduled");
        true
    }

    /// Surface `pointerdown`. Captures the pointer, and if the surface was
    /// not focused, focuses it and replays outstanding modifier keydowns.
    /// Returns how many events were replayed.
    pub fn on_pointer_down(&self, pointer_id: i32) -> usize {
        self.surface.capture_pointer(pointer_id);
        if self.surface.is_active() {
            return 0;
        }
        self.surface.focus();
        // Replayed keydowns bubble back to the document listener, so the
        // tracker must not be borrowed while dispatching.
        let pending = self.take_unreplayed();
        for event in &pending {
            self.surface.dispatch(event);
        }
        if !pending.is_empty() {
            log::debug!("replayed {} held modifier(s) onto surface", pending.len());
        }
        pending.len()
    }

    /// Window `blur`. Drops every record. Returns how many were dropped.
    pub fn on_window_blur(&self) -> usize {
        self.replayed.borrow_mut().clear();
        self.tracker.borrow_mut().clear()
    }

    /// Held events not yet re-delivered, in press order. Marks them delivered.
    fn take_unreplayed(&self) -> Vec<S::Event> {
        let tracker = self.tracker.borrow();
        let mut replayed = self.replayed.borrow_mut();
        tracker
            .records()
            .filter(|record| replayed.insert(record.code().to_owned()))
            .map(|record| record.event().clone())
            .collect()
    }

    /// Number of outstanding modifier records.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.borrow().len()
    }

    /// Codes of outstanding modifiers, in press order.
    #[must_use]
    pub fn pending_codes(&self) -> Vec<String> {
        self.tracker.borrow().codes().into_iter().map(str::to_owned).collect()
    }
}
