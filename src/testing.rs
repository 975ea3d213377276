//! In-memory platform for exercising the router and the orchestrator
//! without a browser. Every mock writes to one shared [`Journal`] so tests
//! can assert on cross-component ordering.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use serde_json::Value;

use crate::engine::{EngineCallback, EngineModule, ModuleDescriptor, SceneEngine};
use crate::error::SceneError;
use crate::host::Platform;
use crate::platform::{Scheduler, Subscription, Subscriptions, Surface};
use crate::redirect::ListenerRedirect;
use crate::resize::ViewportSize;
use crate::router::EventRouter;

// =============================================================
// Journal
// =============================================================

#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    /// Index of the first entry equal to `entry`.
    pub(crate) fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }
}

fn render_call(method: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("{method}({})", args.join(","))
}

// =============================================================
// Surface
// =============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyEvent {
    pub key: String,
    pub code: String,
}

impl KeyEvent {
    pub(crate) fn new(key: &str, code: &str) -> Self {
        Self { key: key.to_owned(), code: code.to_owned() }
    }
}

pub(crate) struct MockSurface {
    journal: Journal,
    pub active: Cell<bool>,
    pub backing: Cell<Option<ViewportSize>>,
    /// Router that dispatched events bubble up to, like a document listener.
    pub bubble_to: RefCell<Weak<EventRouter<MockSurface>>>,
}

impl MockSurface {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            active: Cell::new(false),
            backing: Cell::new(None),
            bubble_to: RefCell::new(Weak::new()),
        }
    }
}

impl Surface for MockSurface {
    type Event = KeyEvent;

    fn focus(&self) {
        self.journal.push("focus");
        self.active.set(true);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn capture_pointer(&self, pointer_id: i32) {
        self.journal.push(format!("capture:{pointer_id}"));
    }

    fn dispatch(&self, event: &KeyEvent) {
        self.journal.push(format!("dispatch:{}", event.code));
        let router = self.bubble_to.borrow().upgrade();
        if let Some(router) = router {
            router.on_keydown(&event.key, &event.code, event);
        }
    }

    fn set_backing_size(&self, size: ViewportSize) {
        self.backing.set(Some(size));
    }
}

// =============================================================
// Scheduler
// =============================================================

#[derive(Default)]
pub(crate) struct QueueScheduler {
    tasks: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl QueueScheduler {
    pub(crate) fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run everything queued so far, as the next event-loop turn would.
    pub(crate) fn run_pending(&self) {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        for task in tasks {
            task();
        }
    }
}

impl Scheduler for QueueScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push(task);
    }
}

// =============================================================
// Engine and module
// =============================================================

#[derive(Default)]
pub(crate) struct EngineState {
    journal: Journal,
    pub failing: RefCell<HashSet<String>>,
    pub returns: RefCell<HashMap<String, Value>>,
    /// Event to emit (with a `null` payload) whenever a method is called.
    pub emits: RefCell<HashMap<String, String>>,
    callback: RefCell<Option<EngineCallback>>,
}

impl EngineState {
    pub(crate) fn fail(&self, method: &str) {
        self.failing.borrow_mut().insert(method.to_owned());
    }

    pub(crate) fn has_callback(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Fire the registered callback as the engine would.
    pub(crate) fn emit(&self, name: &str, payload: Value) {
        if let Some(callback) = self.callback.borrow().as_ref() {
            callback(name, payload);
        }
    }
}

pub(crate) struct MockEngine {
    state: Rc<EngineState>,
}

impl SceneEngine for MockEngine {
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, SceneError> {
        self.state.journal.push(render_call(method, args));
        if self.state.failing.borrow().contains(method) {
            return Err(SceneError::Engine { method: method.to_owned(), message: "engine threw".into() });
        }
        let emitted = self.state.emits.borrow().get(method).cloned();
        if let Some(event) = emitted {
            self.state.emit(&event, Value::Null);
        }
        Ok(self.state.returns.borrow().get(method).cloned().unwrap_or(Value::Null))
    }

    fn set_callback(&self, callback: EngineCallback) -> Result<(), SceneError> {
        self.state.journal.push("setCallback");
        *self.state.callback.borrow_mut() = Some(callback);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct ModuleState {
    journal: Journal,
    pub construct_fails: Cell<bool>,
    pub fs_failing: RefCell<HashSet<String>>,
}

pub(crate) struct MockModule {
    state: Rc<ModuleState>,
    engine: Rc<EngineState>,
}

impl EngineModule for MockModule {
    type Engine = MockEngine;

    fn construct(&self) -> Result<MockEngine, SceneError> {
        self.state.journal.push("construct");
        if self.state.construct_fails.get() {
            return Err(SceneError::Construct("Scene is not a constructor".into()));
        }
        Ok(MockEngine { state: Rc::clone(&self.engine) })
    }

    fn fs_call(&self, method: &str, args: &[Value]) -> Result<Value, SceneError> {
        self.state.journal.push(format!("fs:{}", render_call(method, args)));
        if self.state.fs_failing.borrow().contains(method) {
            return Err(SceneError::Fs { method: method.to_owned(), message: "EEXIST".into() });
        }
        Ok(Value::Null)
    }
}

// =============================================================
// Redirect
// =============================================================

#[derive(Default)]
pub(crate) struct MockRedirect {
    journal: Journal,
    pub active: Cell<bool>,
    pub fails: Cell<bool>,
}

impl MockRedirect {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self { journal: journal.clone(), ..Self::default() }
    }
}

impl ListenerRedirect for MockRedirect {
    fn redirect(&self) -> Result<(), SceneError> {
        if self.fails.get() {
            return Err(SceneError::Redirect("Document.prototype is frozen".into()));
        }
        self.journal.push("redirect");
        self.active.set(true);
        Ok(())
    }

    fn restore(&self) {
        self.journal.push("restore");
        self.active.set(false);
    }
}

// =============================================================
// Platform
// =============================================================

pub(crate) struct MockState {
    pub journal: Journal,
    pub surface: Rc<MockSurface>,
    pub surface_mounted: Cell<bool>,
    pub container: Cell<Option<ViewportSize>>,
    pub scheduler: Rc<QueueScheduler>,
    pub redirect: MockRedirect,
    pub engine: Rc<EngineState>,
    pub module: Rc<ModuleState>,
    pub load_error: RefCell<Option<String>>,
    pub gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub router: RefCell<Option<Rc<EventRouter<MockSurface>>>>,
    pub live_listeners: Rc<Cell<usize>>,
    pub listener_removals: Rc<Cell<usize>>,
    pub resize_supported: Cell<bool>,
    pub resize_callback: RefCell<Option<Rc<dyn Fn()>>>,
    pub live_observers: Rc<Cell<usize>>,
}

#[derive(Clone)]
pub(crate) struct MockPlatform(Rc<MockState>);

impl Deref for MockPlatform {
    type Target = MockState;

    fn deref(&self) -> &MockState {
        &self.0
    }
}

impl MockPlatform {
    pub(crate) fn new() -> Self {
        let journal = Journal::default();
        Self(Rc::new(MockState {
            surface: Rc::new(MockSurface::new(&journal)),
            surface_mounted: Cell::new(true),
            container: Cell::new(Some(ViewportSize::new(300, 300))),
            scheduler: Rc::new(QueueScheduler::default()),
            redirect: MockRedirect::new(&journal),
            engine: Rc::new(EngineState { journal: journal.clone(), ..EngineState::default() }),
            module: Rc::new(ModuleState { journal: journal.clone(), ..ModuleState::default() }),
            load_error: RefCell::new(None),
            gate: RefCell::new(None),
            router: RefCell::new(None),
            live_listeners: Rc::new(Cell::new(0)),
            listener_removals: Rc::new(Cell::new(0)),
            resize_supported: Cell::new(true),
            resize_callback: RefCell::new(None),
            live_observers: Rc::new(Cell::new(0)),
            journal,
        }))
    }

    /// Hold module loading until the returned sender fires (or is dropped).
    pub(crate) fn gate_loading(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    /// Simulate the container observer reporting a new box.
    pub(crate) fn resize_container(&self, size: ViewportSize) {
        self.container.set(Some(size));
        let callback = self.resize_callback.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub(crate) fn installed_router(&self) -> Option<Rc<EventRouter<MockSurface>>> {
        self.router.borrow().clone()
    }

    fn subscription(&self, name: &'static str) -> Subscription {
        self.live_listeners.set(self.live_listeners.get() + 1);
        let live = Rc::clone(&self.live_listeners);
        let removals = Rc::clone(&self.listener_removals);
        let journal = self.journal.clone();
        Subscription::new(move || {
            live.set(live.get() - 1);
            removals.set(removals.get() + 1);
            journal.push(format!("unlisten:{name}"));
        })
    }
}

impl Platform for MockPlatform {
    type Surface = MockSurface;
    type Module = MockModule;
    type Redirect = MockRedirect;

    fn load_module(&self, descriptor: &ModuleDescriptor) -> impl Future<Output = Result<MockModule, SceneError>> {
        self.journal.push(format!("load:{}", descriptor.wasm_locator));
        let gate = self.gate.borrow_mut().take();
        let failure = self.load_error.borrow().clone();
        let module = MockModule { state: Rc::clone(&self.module), engine: Rc::clone(&self.engine) };
        async move {
            if let Some(gate) = gate {
                if gate.await.is_err() {
                    return Err(SceneError::ModuleLoad("loader abandoned".into()));
                }
            }
            match failure {
                Some(message) => Err(SceneError::ModuleLoad(message)),
                None => Ok(module),
            }
        }
    }

    fn surface(&self) -> Option<Rc<MockSurface>> {
        self.surface_mounted.get().then(|| Rc::clone(&self.surface))
    }

    fn measure_container(&self) -> Option<ViewportSize> {
        self.container.get()
    }

    fn redirect(&self) -> &MockRedirect {
        &self.redirect
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.scheduler) as Rc<dyn Scheduler>
    }

    fn listen_input(&self, router: &Rc<EventRouter<MockSurface>>) -> Result<Subscriptions, SceneError> {
        self.journal.push("listen");
        *self.router.borrow_mut() = Some(Rc::clone(router));
        *self.surface.bubble_to.borrow_mut() = Rc::downgrade(router);
        let mut subs = Subscriptions::new();
        for name in ["pointerdown", "blur", "keydown", "keyup", "window-blur"] {
            subs.push(self.subscription(name));
        }
        Ok(subs)
    }

    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Option<Subscription> {
        if !self.resize_supported.get() {
            return None;
        }
        self.journal.push("observe");
        *self.resize_callback.borrow_mut() = Some(on_resize);
        self.live_observers.set(self.live_observers.get() + 1);
        let live = Rc::clone(&self.live_observers);
        let journal = self.journal.clone();
        Some(Subscription::new(move || {
            live.set(live.get() - 1);
            journal.push("disconnect");
        }))
    }
}

/// A standalone router over a fresh surface and scheduler.
pub(crate) fn router() -> (Rc<EventRouter<MockSurface>>, Rc<MockSurface>, Rc<QueueScheduler>, Journal) {
    let journal = Journal::default();
    let surface = Rc::new(MockSurface::new(&journal));
    let scheduler = Rc::new(QueueScheduler::default());
    let router = Rc::new(EventRouter::new(Rc::clone(&surface), Rc::clone(&scheduler) as Rc<dyn Scheduler>));
    *surface.bubble_to.borrow_mut() = Rc::downgrade(&router);
    (router, surface, scheduler, journal)
}
