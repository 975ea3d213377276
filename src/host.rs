//! Lifecycle orchestrator for one embedded scene.
//!
//! ARCHITECTURE
//! ============
//! [`SceneHost`] sequences engine startup against a [`Platform`], wires the
//! [`EventRouter`] and the container observer, and keeps the engine in sync
//! with the four configuration inputs. Everything the host page touches goes
//! through it: prop changes, the imperative control surface, and teardown.
//!
//! Phases: `Uninitialized → Initializing → Ready → Disposed`, with `Failed`
//! reachable from `Initializing` when startup throws. Teardown is accepted in
//! every phase and is idempotent. A teardown that lands while startup is
//! suspended wins: the startup continuation sees `Disposed` and leaves
//! without installing anything.
//!
//! The engine handle has one writer (this module) and is cloned out of its
//! cell for every call, so engine callbacks that re-enter the host never
//! observe a held borrow.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use serde_json::Value;

use crate::config::{ConfigField, ConfigSnapshot, SceneOptions, is_truthy};
use crate::engine::{EngineModule, ModuleDescriptor, SceneEngine, start_engine};
use crate::error::SceneError;
use crate::event::SceneEvent;
use crate::platform::{Scheduler, Subscription, Subscriptions, Surface};
use crate::redirect::ListenerRedirect;
use crate::resize::{ResizeOutcome, ResizeWatcher, ViewportSize};
use crate::router::EventRouter;

/// Host page capabilities the orchestrator depends on.
pub trait Platform: 'static {
    type Surface: Surface;
    type Module: EngineModule + 'static;
    type Redirect: ListenerRedirect;

    /// Fetch and initialize the binary module. Resolves once the module has
    /// signalled runtime initialization and its readiness promise settled.
    fn load_module(&self, descriptor: &ModuleDescriptor) -> impl Future<Output = Result<Self::Module, SceneError>>;

    /// The rendering surface, if mounted.
    fn surface(&self) -> Option<Rc<Self::Surface>>;

    /// The container's current box, if mounted.
    fn measure_container(&self) -> Option<ViewportSize>;

    /// Capability that sends document listener registration to the surface.
    fn redirect(&self) -> &Self::Redirect;

    fn scheduler(&self) -> Rc<dyn Scheduler>;

    /// Attach `router` to the surface, document and window events.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Platform`] when a listener cannot be attached.
    fn listen_input(&self, router: &Rc<EventRouter<Self::Surface>>) -> Result<Subscriptions, SceneError>;

    /// Call `on_resize` whenever the container's box changes. `None` when the
    /// host cannot observe size changes.
    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Option<Subscription>;
}

/// Receives every host-visible event with the raw engine payload
/// (`null` for [`SceneEvent::Ready`]).
pub type HostListener = Rc<dyn Fn(&SceneEvent, &Value)>;

type EngineOf<P> = <<P as Platform>::Module as EngineModule>::Engine;

/// Where a [`SceneHost`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    /// Startup threw; the host never became ready.
    Failed,
    Disposed,
}

struct Shared<P: Platform> {
    platform: P,
    options: SceneOptions,
    listener: HostListener,
    phase: Cell<Phase>,
    config: RefCell<ConfigSnapshot>,
    module: RefCell<Option<Rc<P::Module>>>,
    engine: RefCell<Option<Rc<EngineOf<P>>>>,
    router: RefCell<Option<Rc<EventRouter<P::Surface>>>>,
    listeners: RefCell<Option<Subscriptions>>,
    watcher: ResizeWatcher,
}

/// Orchestrates one embedded scene. Cheap to clone; clones share state.
pub struct SceneHost<P: Platform> {
    shared: Rc<Shared<P>>,
}

impl<P: Platform> Clone for SceneHost<P> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<P: Platform> SceneHost<P> {
    pub fn new(platform: P, options: SceneOptions, listener: impl Fn(&SceneEvent, &Value) + 'static) -> Self {
        let watcher = ResizeWatcher::new(options.initial_size());
        Self {
            shared: Rc::new(Shared {
                platform,
                options,
                listener: Rc::new(listener),
                phase: Cell::new(Phase::Uninitialized),
                config: RefCell::new(ConfigSnapshot::default()),
                module: RefCell::new(None),
                engine: RefCell::new(None),
                router: RefCell::new(None),
                listeners: RefCell::new(None),
                watcher,
            }),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.phase.get()
    }

    #[must_use]
    pub fn options(&self) -> &SceneOptions {
        &self.shared.options
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.shared.platform
    }

    /// Snapshot of the configuration inputs as last observed.
    #[must_use]
    pub fn config(&self) -> ConfigSnapshot {
        self.shared.config.borrow().clone()
    }

    /// Size last pushed to the surface.
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.shared.watcher.viewport()
    }

    #[must_use]
    pub fn has_engine(&self) -> bool {
        self.shared.engine.borrow().is_some()
    }

    /// The installed input router, present while ready.
    #[must_use]
    pub fn router(&self) -> Option<Rc<EventRouter<P::Surface>>> {
        self.shared.router.borrow().clone()
    }

    fn engine(&self) -> Option<Rc<EngineOf<P>>> {
        self.shared.engine.borrow().clone()
    }

    fn module(&self) -> Option<Rc<P::Module>> {
        self.shared.module.borrow().clone()
    }

    // --- Lifecycle ---

    /// Start the engine and bring the host to [`Phase::Ready`].
    ///
    /// Runs once; later calls are ignored. Startup failures are logged and
    /// leave the host in [`Phase::Failed`]. A [`SceneHost::teardown`] issued
    /// while this is suspended makes it return without installing anything.
    pub async fn mount(&self) {
        let shared = &self.shared;
        if shared.phase.get() != Phase::Uninitialized {
            log::debug!("mount ignored in phase {:?}", shared.phase.get());
            return;
        }
        shared.phase.set(Phase::Initializing);

        let descriptor = ModuleDescriptor::from_options(&shared.options);
        let loaded = shared.platform.load_module(&descriptor).await;
        if shared.phase.get() == Phase::Disposed {
            log::debug!("scene disposed during startup; discarding loaded module");
            return;
        }

        let started = loaded.and_then(|module| {
            let engine = start_engine(&module, shared.platform.redirect())?;
            Ok((module, engine))
        });
        match started {
            Ok((module, engine)) => self.enter_ready(module, engine),
            Err(e) => {
                log::error!("scene initialization failed: {e}");
                shared.phase.set(Phase::Failed);
            }
        }
    }

    fn enter_ready(&self, module: P::Module, engine: EngineOf<P>) {
        let shared = &self.shared;
        let engine = Rc::new(engine);
        *shared.module.borrow_mut() = Some(Rc::new(module));
        *shared.engine.borrow_mut() = Some(Rc::clone(&engine));

        if let Some(surface) = shared.platform.surface() {
            let router = Rc::new(EventRouter::new(surface, shared.platform.scheduler()));
            match shared.platform.listen_input(&router) {
                Ok(listeners) => *shared.listeners.borrow_mut() = Some(listeners),
                Err(e) => log::warn!("input routing unavailable: {e}"),
            }
            *shared.router.borrow_mut() = Some(router);
        }

        let listener = Rc::clone(&shared.listener);
        let forwarding = engine.set_callback(Box::new(move |name: &str, payload: Value| {
            match SceneEvent::decode(name, &payload) {
                Ok(event) => listener(&event, &payload),
                Err(e) => log::warn!("dropping {e}"),
            }
        }));
        if let Err(e) = forwarding {
            log::warn!("engine events unavailable: {e}");
        }

        if shared.options.observe_resize {
            let weak = Rc::downgrade(shared);
            let on_resize: Rc<dyn Fn()> = Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    if let Err(e) = (SceneHost { shared }).resize() {
                        log::warn!("resize failed: {e}");
                    }
                }
            });
            if let Some(observation) = shared.platform.observe_resize(on_resize) {
                shared.watcher.observe(observation);
            }
        }

        shared.phase.set(Phase::Ready);
        // A listener may tear the host down from inside any of these renders.
        for field in ConfigField::APPLY_ORDER {
            if shared.phase.get() != Phase::Ready {
                break;
            }
            let value = shared.config.borrow().get(field).cloned();
            self.apply(field, value.as_ref());
        }
        if shared.phase.get() != Phase::Ready {
            log::debug!("scene disposed while applying initial configuration");
            return;
        }
        log::debug!("scene ready");
        (shared.listener)(&SceneEvent::Ready, &Value::Null);
    }

    /// Release listeners, the container observer and the engine handle.
    /// Safe to call in any phase and any number of times.
    pub fn teardown(&self) {
        let shared = &self.shared;
        let previous = shared.phase.replace(Phase::Disposed);
        let listeners = shared.listeners.take();
        if let Some(listeners) = listeners {
            listeners.release();
        }
        drop(shared.router.take());
        shared.watcher.disconnect();
        drop(shared.engine.take());
        drop(shared.module.take());
        if previous != Phase::Disposed {
            log::debug!("scene disposed (was {previous:?})");
        }
    }

    // --- Configuration inputs ---

    /// Observe a new value for one configuration input. Runs one
    /// apply+render cycle when the value changed. Returns whether a cycle ran.
    pub fn set_prop(&self, field: ConfigField, value: Option<Value>) -> bool {
        let changed = self.shared.config.borrow_mut().replace(field, value.clone());
        if !changed {
            return false;
        }
        self.apply(field, value.as_ref())
    }

    /// Push one field into the engine and render. Skipped when the value is
    /// falsy or there is no engine handle.
    fn apply(&self, field: ConfigField, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| is_truthy(v)) else {
            return false;
        };
        let Some(engine) = self.engine() else {
            return false;
        };
        let pushed = match field {
            ConfigField::PathPrefix => {
                let Some(path) = value.as_str() else {
                    log::warn!("ignoring non-string pathPrefix: {value}");
                    return false;
                };
                engine.set_path_prefix(path)
            }
            ConfigField::ColorMaps => engine.update_color_maps(value),
            ConfigField::Camera => engine.update_camera(value),
            ConfigField::Geometry => engine.update_geometry(value),
        };
        if let Err(e) = pushed.and_then(|()| engine.render()) {
            log::warn!("applying {} failed: {e}", field.name());
        }
        true
    }

    // --- Control surface ---

    pub fn update_camera(&self, config: &Value) -> bool {
        self.apply(ConfigField::Camera, Some(config))
    }

    pub fn update_geometry(&self, config: &Value) -> bool {
        self.apply(ConfigField::Geometry, Some(config))
    }

    pub fn update_color_maps(&self, config: &Value) -> bool {
        self.apply(ConfigField::ColorMaps, Some(config))
    }

    pub fn set_path_prefix(&self, path: &str) -> bool {
        self.apply(ConfigField::PathPrefix, Some(&Value::from(path)))
    }

    /// Re-apply the current geometry input.
    pub fn update(&self) -> bool {
        let geometry = self.shared.config.borrow().geometry.clone();
        self.apply(ConfigField::Geometry, geometry.as_ref())
    }

    pub fn reset_camera(&self) -> bool {
        let Some(engine) = self.engine() else {
            return false;
        };
        if let Err(e) = engine.reset_camera().and_then(|()| engine.render()) {
            log::warn!("camera reset failed: {e}");
        }
        true
    }

    /// Match the surface to the container's current box.
    ///
    /// # Errors
    ///
    /// Propagates a failing `setSize` or `render` engine call.
    pub fn resize(&self) -> Result<ResizeOutcome, SceneError> {
        if self.phase() == Phase::Disposed {
            return Ok(ResizeOutcome::Detached);
        }
        let surface = self.shared.platform.surface();
        let engine = self.engine();
        let measured = self.shared.platform.measure_container();
        self.shared.watcher.sync(measured, surface.as_deref(), engine.as_deref())
    }

    /// Call an engine method by name. `Ok(None)` when there is no engine.
    ///
    /// # Errors
    ///
    /// Whatever the engine raised, unchanged.
    pub fn scene_exec(&self, method: &str, args: &[Value]) -> Result<Option<Value>, SceneError> {
        self.with_engine(|engine| engine.call(method, args)).transpose()
    }

    /// Call a virtual-filesystem method by name. `Ok(None)` when the module
    /// is not loaded.
    ///
    /// # Errors
    ///
    /// Whatever the filesystem raised, unchanged.
    pub fn fs_exec(&self, method: &str, args: &[Value]) -> Result<Option<Value>, SceneError> {
        self.with_module(|module| module.fs_call(method, args)).transpose()
    }

    /// Run `f` against the live engine handle. `None` before ready and after
    /// teardown. Bindings use this to reach the concrete handle directly.
    pub fn with_engine<R>(&self, f: impl FnOnce(&<P::Module as EngineModule>::Engine) -> R) -> Option<R> {
        self.engine().map(|engine| f(&engine))
    }

    /// Run `f` against the loaded engine module. `None` before ready and
    /// after teardown.
    pub fn with_module<R>(&self, f: impl FnOnce(&P::Module) -> R) -> Option<R> {
        self.module().map(|module| f(&module))
    }

    /// Create a directory in the engine's virtual filesystem.
    ///
    /// # Errors
    ///
    /// See [`SceneHost::fs_exec`].
    pub fn mkdir(&self, path: &str) -> Result<bool, SceneError> {
        self.fs_exec("mkdir", &[Value::from(path)]).map(|r| r.is_some())
    }

    /// Write a text file into the engine's virtual filesystem.
    ///
    /// # Errors
    ///
    /// See [`SceneHost::fs_exec`].
    pub fn write_file(&self, path: &str, contents: &str) -> Result<bool, SceneError> {
        self.fs_exec("writeFile", &[Value::from(path), Value::from(contents)])
            .map(|r| r.is_some())
    }
}
