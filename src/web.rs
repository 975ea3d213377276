//! Browser implementation of the platform seams and the exported
//! `Vtk3dScene` JavaScript class.
//!
//! The engine is an Emscripten module: `window[factory](module)` instantiates
//! it, `module.onRuntimeInitialized` fires once the runtime is up, and
//! `module.ready` settles afterwards. `module.Scene` is the engine class and
//! `module.FS` the virtual filesystem.
//!
//! `sceneExec` and `fsExec` hand their JS arguments and results through
//! untouched, so typed arrays and callbacks reach the engine as they are.
//! Everything the host core drives (configuration, events) crosses as JSON.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent, ResizeObserver};

use crate::config::{ConfigField, SceneOptions};
use crate::engine::{EngineCallback, EngineModule, ModuleDescriptor, SceneEngine};
use crate::error::SceneError;
use crate::host::{Phase, Platform, SceneHost};
use crate::platform::{Scheduler, Subscription, Subscriptions, Surface};
use crate::redirect::ListenerRedirect;
use crate::resize::ViewportSize;
use crate::router::EventRouter;

// =============================================================
// JS value helpers
// =============================================================

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Human-readable text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

fn to_js(value: &Value) -> Result<JsValue, SceneError> {
    let text = serde_json::to_string(value).map_err(|e| SceneError::Platform(e.to_string()))?;
    js_sys::JSON::parse(&text).map_err(|e| SceneError::Platform(describe(&e)))
}

fn from_js(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    if let Some(text) = value.as_string() {
        return Value::String(text);
    }
    match js_sys::JSON::stringify(value) {
        Ok(text) => match text.as_string() {
            Some(text) => serde_json::from_str(&text).unwrap_or(Value::Null),
            None => Value::Null,
        },
        Err(e) => {
            log::debug!("value is not JSON-serializable: {}", describe(&e));
            Value::Null
        }
    }
}

fn args_of(values: &[Value]) -> Result<Array, SceneError> {
    let array = Array::new();
    for value in values {
        array.push(&to_js(value)?);
    }
    Ok(array)
}

fn property(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
}

fn method(target: &JsValue, name: &str) -> Result<Function, String> {
    match property(target, name) {
        Ok(value) => value.dyn_into::<Function>().map_err(|_| format!("`{name}` is not a function")),
        Err(e) => Err(describe(&e)),
    }
}

fn set_property(target: &JsValue, name: &str, value: &JsValue) -> Result<(), String> {
    match Reflect::set(target, &JsValue::from_str(name), value) {
        Ok(true) => Ok(()),
        Ok(false) => Err(format!("`{name}` is read-only")),
        Err(e) => Err(describe(&e)),
    }
}

// =============================================================
// Surface and scheduler
// =============================================================

/// The engine's canvas.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
}

impl Surface for WebSurface {
    type Event = KeyboardEvent;

    fn focus(&self) {
        if let Err(e) = self.canvas.focus() {
            log::debug!("canvas focus failed: {}", describe(&e));
        }
    }

    fn is_active(&self) -> bool {
        let active = web_sys::window().and_then(|w| w.document()).and_then(|d| d.active_element());
        active.is_some_and(|element| &element == self.canvas.unchecked_ref::<Element>())
    }

    fn capture_pointer(&self, pointer_id: i32) {
        if let Err(e) = self.canvas.set_pointer_capture(pointer_id) {
            log::debug!("pointer capture failed: {}", describe(&e));
        }
    }

    fn dispatch(&self, event: &KeyboardEvent) {
        if let Err(e) = self.canvas.dispatch_event(event.unchecked_ref::<Event>()) {
            log::warn!("replaying {} failed: {}", event.code(), describe(&e));
        }
    }

    fn set_backing_size(&self, size: ViewportSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}

/// Defers onto the next event-loop turn with a zero-delay timeout.
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        Timeout::new(0, task).forget();
    }
}

// =============================================================
// Listener redirect
// =============================================================

/// Swaps `Document.prototype.addEventListener` for one that registers on the
/// canvas, so the engine's document-level keyboard listeners end up on it.
pub struct DocumentRedirect {
    canvas: HtmlCanvasElement,
    original: RefCell<Option<JsValue>>,
    forwarder: RefCell<Option<Closure<dyn Fn(JsValue, JsValue, JsValue)>>>,
}

const ADD_EVENT_LISTENER: &str = "addEventListener";

fn document_prototype() -> Result<JsValue, String> {
    let document = property(&js_sys::global(), "Document").map_err(|e| describe(&e))?;
    property(&document, "prototype").map_err(|e| describe(&e))
}

impl DocumentRedirect {
    fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, original: RefCell::new(None), forwarder: RefCell::new(None) }
    }
}

impl ListenerRedirect for DocumentRedirect {
    fn redirect(&self) -> Result<(), SceneError> {
        let prototype = document_prototype().map_err(SceneError::Redirect)?;
        let original = property(&prototype, ADD_EVENT_LISTENER).map_err(|e| SceneError::Redirect(describe(&e)))?;
        let register = method(&self.canvas, ADD_EVENT_LISTENER).map_err(SceneError::Redirect)?;
        let canvas = self.canvas.clone();
        let forwarder = Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(move |kind, listener, options| {
            if let Err(e) = register.call3(&canvas, &kind, &listener, &options) {
                log::warn!("redirected listener registration failed: {}", describe(&e));
            }
        });
        set_property(&prototype, ADD_EVENT_LISTENER, forwarder.as_ref()).map_err(SceneError::Redirect)?;
        *self.original.borrow_mut() = Some(original);
        *self.forwarder.borrow_mut() = Some(forwarder);
        Ok(())
    }

    fn restore(&self) {
        let original = self.original.borrow_mut().take();
        if let Some(original) = original {
            let restored = document_prototype().and_then(|p| set_property(&p, ADD_EVENT_LISTENER, &original));
            if let Err(e) = restored {
                log::error!("could not restore Document.addEventListener: {e}");
            }
        }
        drop(self.forwarder.borrow_mut().take());
    }
}

// =============================================================
// Engine module and handle
// =============================================================

/// Closures handed to the Emscripten module object.
struct ModuleHooks {
    locate_file: Closure<dyn Fn() -> JsValue>,
    set_window_title: Closure<dyn Fn(JsValue)>,
    on_runtime_initialized: Closure<dyn Fn()>,
}

pub struct JsModule {
    module: Object,
    _hooks: ModuleHooks,
}

impl EngineModule for JsModule {
    type Engine = JsEngine;

    fn construct(&self) -> Result<JsEngine, SceneError> {
        let class = method(&self.module, "Scene").map_err(SceneError::Construct)?;
        let scene = Reflect::construct(&class, &Array::new()).map_err(|e| SceneError::Construct(describe(&e)))?;
        Ok(JsEngine { scene, callback: RefCell::new(None) })
    }

    fn fs_call(&self, name: &str, args: &[Value]) -> Result<Value, SceneError> {
        let outcome = self.fs_apply(name, &args_of(args)?)?;
        outcome
            .map(|result| from_js(&result))
            .map_err(|e| SceneError::Fs { method: name.to_owned(), message: describe(&e) })
    }
}

impl JsModule {
    /// Call `module.FS[name]` with JS arguments as given. The outer error is
    /// a failed lookup; the inner result is the call's own outcome, with
    /// whatever it threw.
    fn fs_apply(&self, name: &str, args: &Array) -> Result<Result<JsValue, JsValue>, SceneError> {
        let fail = |message: String| SceneError::Fs { method: name.to_owned(), message };
        let fs = property(&self.module, "FS").map_err(|e| fail(describe(&e)))?;
        let function = method(&fs, name).map_err(fail)?;
        Ok(function.apply(&fs, args))
    }
}

/// A constructed `module.Scene`.
pub struct JsEngine {
    scene: JsValue,
    callback: RefCell<Option<Closure<dyn Fn(JsValue, JsValue)>>>,
}

impl SceneEngine for JsEngine {
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, SceneError> {
        let outcome = self.apply(name, &args_of(args)?)?;
        outcome
            .map(|result| from_js(&result))
            .map_err(|e| SceneError::Engine { method: name.to_owned(), message: describe(&e) })
    }

    fn set_callback(&self, callback: EngineCallback) -> Result<(), SceneError> {
        let fail = |message: String| SceneError::Engine { method: "setCallback".into(), message };
        let closure = Closure::<dyn Fn(JsValue, JsValue)>::new(move |name: JsValue, info: JsValue| {
            let name = name.as_string().unwrap_or_default();
            callback(&name, from_js(&info));
        });
        let register = method(&self.scene, "setCallback").map_err(fail)?;
        register.call1(&self.scene, closure.as_ref()).map_err(|e| fail(describe(&e)))?;
        *self.callback.borrow_mut() = Some(closure);
        Ok(())
    }
}

impl JsEngine {
    /// Call `scene[name]` with JS arguments as given. Errors split as in
    /// [`JsModule::fs_apply`].
    fn apply(&self, name: &str, args: &Array) -> Result<Result<JsValue, JsValue>, SceneError> {
        let function = method(&self.scene, name)
            .map_err(|message| SceneError::Engine { method: name.to_owned(), message })?;
        Ok(function.apply(&self.scene, args))
    }
}

impl Drop for JsEngine {
    fn drop(&mut self) {
        // The engine outlives this handle; detach before the closure is freed.
        if self.callback.borrow().is_none() {
            return;
        }
        let detached = method(&self.scene, "setCallback")
            .and_then(|f| f.call1(&self.scene, &Function::new_no_args("")).map_err(|e| describe(&e)));
        if let Err(e) = detached {
            log::debug!("engine callback not detached: {e}");
        }
    }
}

// =============================================================
// Platform
// =============================================================

/// The container element and its canvas.
pub struct WebPlatform {
    container: HtmlElement,
    surface: Rc<WebSurface>,
    redirect: DocumentRedirect,
}

impl WebPlatform {
    /// # Errors
    ///
    /// Returns [`SceneError::Platform`] when the canvas rejects attributes.
    pub fn new(container: HtmlElement, canvas: HtmlCanvasElement) -> Result<Self, SceneError> {
        canvas.set_attribute("tabindex", "-1").map_err(|e| SceneError::Platform(describe(&e)))?;
        Ok(Self {
            container,
            redirect: DocumentRedirect::new(canvas.clone()),
            surface: Rc::new(WebSurface { canvas }),
        })
    }

    fn canvas(&self) -> &HtmlCanvasElement {
        &self.surface.canvas
    }
}

fn module_error(e: &JsValue) -> SceneError {
    SceneError::ModuleLoad(describe(e))
}

/// Attach `handler` to `kind` on `target`. Dropping the subscription removes it.
fn listen(target: &EventTarget, kind: &'static str, handler: impl Fn(&Event) + 'static) -> Result<Subscription, SceneError> {
    let closure = Closure::<dyn Fn(Event)>::new(move |event: Event| handler(&event));
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(|e| SceneError::Platform(format!("listening for {kind}: {}", describe(&e))))?;
    let target = target.clone();
    Ok(Subscription::new(move || {
        if let Err(e) = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            log::debug!("removing {kind} listener failed: {}", describe(&e));
        }
    }))
}

impl Platform for WebPlatform {
    type Surface = WebSurface;
    type Module = JsModule;
    type Redirect = DocumentRedirect;

    fn load_module(&self, descriptor: &ModuleDescriptor) -> impl Future<Output = Result<JsModule, SceneError>> {
        let canvas = self.canvas().clone();
        let locator = descriptor.wasm_locator.clone();
        let factory = descriptor.factory.clone();
        async move {
            let wasm_path = locator.clone();
            let window = web_sys::window().ok_or_else(|| SceneError::ModuleLoad("no window".into()))?;
            let factory = method(&window, &factory).map_err(SceneError::ModuleLoad)?;

            let (initialized, runtime) = oneshot::channel::<()>();
            let initialized = RefCell::new(Some(initialized));
            let hooks = ModuleHooks {
                locate_file: Closure::<dyn Fn() -> JsValue>::new(move || JsValue::from_str(&wasm_path)),
                set_window_title: Closure::<dyn Fn(JsValue)>::new(|_title: JsValue| {}),
                on_runtime_initialized: Closure::<dyn Fn()>::new(move || {
                    let sender = initialized.borrow_mut().take();
                    if let Some(sender) = sender {
                        if sender.send(()).is_err() {
                            log::debug!("runtime initialized after loader went away");
                        }
                    }
                }),
            };

            let module = Object::new();
            let hook_props: [(&str, &JsValue); 4] = [
                ("locateFile", hooks.locate_file.as_ref()),
                ("canvas", canvas.as_ref()),
                ("setWindowTitle", hooks.set_window_title.as_ref()),
                ("onRuntimeInitialized", hooks.on_runtime_initialized.as_ref()),
            ];
            for (name, value) in hook_props {
                set_property(&module, name, value).map_err(SceneError::ModuleLoad)?;
            }

            let instantiated = factory.call1(&JsValue::NULL, &module).map_err(|e| module_error(&e))?;
            JsFuture::from(Promise::resolve(&instantiated)).await.map_err(|e| module_error(&e))?;
            if runtime.await.is_err() {
                return Err(SceneError::ModuleLoad("runtime never initialized".into()));
            }
            let ready = property(&module, "ready").map_err(|e| module_error(&e))?;
            JsFuture::from(Promise::resolve(&ready)).await.map_err(|e| module_error(&e))?;
            log::info!("engine module loaded from {locator}");
            Ok(JsModule { module, _hooks: hooks })
        }
    }

    fn surface(&self) -> Option<Rc<WebSurface>> {
        Some(Rc::clone(&self.surface))
    }

    fn measure_container(&self) -> Option<ViewportSize> {
        Some(ViewportSize::from_client(self.container.client_width(), self.container.client_height()))
    }

    fn redirect(&self) -> &DocumentRedirect {
        &self.redirect
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::new(TimeoutScheduler)
    }

    fn listen_input(&self, router: &Rc<EventRouter<WebSurface>>) -> Result<Subscriptions, SceneError> {
        let window = web_sys::window().ok_or_else(|| SceneError::Platform("no window".into()))?;
        let document = window.document().ok_or_else(|| SceneError::Platform("no document".into()))?;
        let canvas: &EventTarget = self.canvas().as_ref();
        let mut subs = Subscriptions::new();

        let r = Rc::clone(router);
        subs.push(listen(canvas, "pointerdown", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                r.on_pointer_down(event.pointer_id());
            }
        })?);
        let r = Rc::clone(router);
        subs.push(listen(canvas, "blur", move |_| {
            r.on_blur();
        })?);
        let r = Rc::clone(router);
        subs.push(listen(&document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                r.on_keydown(&event.key(), &event.code(), event);
            }
        })?);
        let r = Rc::clone(router);
        subs.push(listen(&document, "keyup", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                r.on_keyup(&event.code());
            }
        })?);
        let r = Rc::clone(router);
        subs.push(listen(&window, "blur", move |_| {
            r.on_window_blur();
        })?);
        Ok(subs)
    }

    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Option<Subscription> {
        match Reflect::has(&js_sys::global(), &JsValue::from_str("ResizeObserver")) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                log::debug!("ResizeObserver lookup failed: {}", describe(&e));
                return None;
            }
        }
        let closure = Closure::<dyn Fn(JsValue)>::new(move |_entries: JsValue| on_resize());
        let observer = match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("ResizeObserver unavailable: {}", describe(&e));
                return None;
            }
        };
        observer.observe(&self.container);
        Some(Subscription::new(move || {
            observer.disconnect();
            drop(closure);
        }))
    }
}

// =============================================================
// Exported class
// =============================================================

/// Install the console logger and panic hook. `level` is a `log` level name
/// (`error` .. `trace`); defaults to `info`.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();
    let level = match level.as_deref().map(str::parse::<log::Level>) {
        Some(Ok(level)) => level,
        Some(Err(_)) | None => log::Level::Info,
    };
    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already installed");
    }
}

#[wasm_bindgen(inline_js = "export function restForwarder(target) { return (method, ...args) => target(method, args); }")]
extern "C" {
    /// Wrap `target(method, args)` as `(method, ...args)`.
    #[wasm_bindgen(js_name = restForwarder)]
    fn rest_forwarder(target: &Function) -> Function;
}

type Passthrough = dyn Fn(String, Array) -> Result<JsValue, JsValue>;

/// A variadic JS function backed by a Rust closure taking the rest array.
struct RestMethod {
    _target: Closure<Passthrough>,
    function: Function,
}

impl RestMethod {
    fn new(target: impl Fn(&str, &Array) -> Result<JsValue, JsValue> + 'static) -> Self {
        let target = Closure::<Passthrough>::new(move |method: String, args: Array| target(&method, &args));
        let function = rest_forwarder(target.as_ref().unchecked_ref());
        Self { _target: target, function }
    }
}

/// Passthrough result: `undefined` with no handle, the engine's own thrown
/// value rethrown as is.
fn passthrough(outcome: Option<Result<Result<JsValue, JsValue>, SceneError>>) -> Result<JsValue, JsValue> {
    match outcome {
        Some(outcome) => outcome?,
        None => Ok(JsValue::UNDEFINED),
    }
}

fn prop_value(value: &JsValue) -> Option<Value> {
    if value.is_undefined() {
        return None;
    }
    Some(from_js(value))
}

/// One embedded scene bound to a container and its canvas.
#[wasm_bindgen]
pub struct Vtk3dScene {
    host: SceneHost<WebPlatform>,
    context_menu: RefCell<Option<Subscription>>,
    scene_exec: RestMethod,
    fs_exec: RestMethod,
}

#[wasm_bindgen]
impl Vtk3dScene {
    /// `options` is a JSON object (see `SceneOptions`); `on_event` receives
    /// `(name, payload)` for every `on-*` event.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        options: Option<String>,
        on_event: Function,
    ) -> Result<Vtk3dScene, JsValue> {
        let options = match options {
            Some(text) => SceneOptions::from_json(&text)?,
            None => SceneOptions::default(),
        };
        let size = options.initial_size();
        canvas.set_width(size.width);
        canvas.set_height(size.height);

        let context_menu = listen(canvas.as_ref(), "contextmenu", Event::prevent_default)?;
        let platform = WebPlatform::new(container, canvas)?;
        let host = SceneHost::new(platform, options, move |event, payload| {
            let payload = match to_js(payload) {
                Ok(payload) => payload,
                Err(e) => {
                    log::warn!("{} payload not forwarded: {e}", event.name());
                    JsValue::UNDEFINED
                }
            };
            if let Err(e) = on_event.call2(&JsValue::NULL, &JsValue::from_str(&event.host_name()), &payload) {
                log::warn!("{} listener threw: {}", event.host_name(), describe(&e));
            }
        });
        let engine_host = host.clone();
        let scene_exec = RestMethod::new(move |method, args| {
            passthrough(engine_host.with_engine(|engine| engine.apply(method, args)))
        });
        let module_host = host.clone();
        let fs_exec = RestMethod::new(move |method, args| {
            passthrough(module_host.with_module(|module| module.fs_apply(method, args)))
        });
        Ok(Self { host, context_menu: RefCell::new(Some(context_menu)), scene_exec, fs_exec })
    }

    /// Load and start the engine. Resolves once the scene is ready, failed,
    /// or disposed.
    pub fn mount(&self) -> Promise {
        let host = self.host.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            host.mount().await;
            Ok(JsValue::from_str(phase_name(host.phase())))
        })
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        phase_name(self.host.phase()).to_owned()
    }

    /// `sceneExec(method, ...args)`: call an engine method and return its
    /// result. `undefined` while there is no engine.
    #[wasm_bindgen(getter = sceneExec)]
    pub fn scene_exec(&self) -> Function {
        self.scene_exec.function.clone()
    }

    /// `fsExec(method, ...args)`: call a virtual-filesystem method.
    #[wasm_bindgen(getter = fsExec)]
    pub fn fs_exec(&self) -> Function {
        self.fs_exec.function.clone()
    }

    pub fn resize(&self) -> Result<(), JsValue> {
        self.host.resize()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setPathPrefix)]
    pub fn set_path_prefix(&self, path: &str) -> bool {
        self.host.set_path_prefix(path)
    }

    #[wasm_bindgen(js_name = updateCamera)]
    pub fn update_camera(&self, config: JsValue) -> bool {
        self.host.update_camera(&from_js(&config))
    }

    #[wasm_bindgen(js_name = updateGeometry)]
    pub fn update_geometry(&self, config: JsValue) -> bool {
        self.host.update_geometry(&from_js(&config))
    }

    #[wasm_bindgen(js_name = updateColorMaps)]
    pub fn update_color_maps(&self, config: JsValue) -> bool {
        self.host.update_color_maps(&from_js(&config))
    }

    pub fn update(&self) -> bool {
        self.host.update()
    }

    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&self) -> bool {
        self.host.reset_camera()
    }

    #[wasm_bindgen(js_name = setCameraProp)]
    pub fn set_camera_prop(&self, value: JsValue) -> bool {
        self.host.set_prop(ConfigField::Camera, prop_value(&value))
    }

    #[wasm_bindgen(js_name = setGeometryProp)]
    pub fn set_geometry_prop(&self, value: JsValue) -> bool {
        self.host.set_prop(ConfigField::Geometry, prop_value(&value))
    }

    #[wasm_bindgen(js_name = setColorMapsProp)]
    pub fn set_color_maps_prop(&self, value: JsValue) -> bool {
        self.host.set_prop(ConfigField::ColorMaps, prop_value(&value))
    }

    #[wasm_bindgen(js_name = setPathPrefixProp)]
    pub fn set_path_prefix_prop(&self, value: JsValue) -> bool {
        self.host.set_prop(ConfigField::PathPrefix, prop_value(&value))
    }

    /// Tear the scene down. Safe to call more than once.
    pub fn dispose(&self) {
        self.host.teardown();
        drop(self.context_menu.borrow_mut().take());
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Uninitialized => "uninitialized",
        Phase::Initializing => "initializing",
        Phase::Ready => "ready",
        Phase::Failed => "failed",
        Phase::Disposed => "disposed",
    }
}
