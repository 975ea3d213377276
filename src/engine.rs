//! Engine handle and binary module seams.
//!
//! The rendering engine is an opaque object with a fixed method surface
//! ([`EngineMethod`]). Implementations only provide [`SceneEngine::call`] and
//! [`SceneEngine::set_callback`]; the typed operations are thin wrappers so a
//! by-name passthrough and a typed call reach the engine the same way.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde_json::Value;

use crate::config::SceneOptions;
use crate::error::SceneError;
use crate::redirect::{ListenerRedirect, RedirectScope};

/// Callback the engine invokes with `(event_name, payload)`.
pub type EngineCallback = Box<dyn Fn(&str, Value)>;

/// The engine's fixed method surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineMethod {
    FindPointInside,
    FindPointOutside,
    GetBounds,
    GetColorMapPresets,
    GetPathPrefix,
    Inspect,
    ProcessEvents,
    Render,
    ResetCamera,
    ResetCameraTo,
    ResetCameraToBounds,
    Screenshot,
    SetBackground,
    SetCallback,
    SetPathPrefix,
    SetSize,
    Start,
    UpdateCamera,
    UpdateColorMaps,
    UpdateGeometry,
}

impl EngineMethod {
    pub const ALL: [Self; 20] = [
        Self::FindPointInside,
        Self::FindPointOutside,
        Self::GetBounds,
        Self::GetColorMapPresets,
        Self::GetPathPrefix,
        Self::Inspect,
        Self::ProcessEvents,
        Self::Render,
        Self::ResetCamera,
        Self::ResetCameraTo,
        Self::ResetCameraToBounds,
        Self::Screenshot,
        Self::SetBackground,
        Self::SetCallback,
        Self::SetPathPrefix,
        Self::SetSize,
        Self::Start,
        Self::UpdateCamera,
        Self::UpdateColorMaps,
        Self::UpdateGeometry,
    ];

    /// Method name on the engine object.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FindPointInside => "findPointInside",
            Self::FindPointOutside => "findPointOutside",
            Self::GetBounds => "getBounds",
            Self::GetColorMapPresets => "getColorMapPresets",
            Self::GetPathPrefix => "getPathPrefix",
            Self::Inspect => "inspect",
            Self::ProcessEvents => "processEvents",
            Self::Render => "render",
            Self::ResetCamera => "resetCamera",
            Self::ResetCameraTo => "resetCameraTo",
            Self::ResetCameraToBounds => "resetCameraToBounds",
            Self::Screenshot => "screenshot",
            Self::SetBackground => "setBackground",
            Self::SetCallback => "setCallback",
            Self::SetPathPrefix => "setPathPrefix",
            Self::SetSize => "setSize",
            Self::Start => "start",
            Self::UpdateCamera => "updateCamera",
            Self::UpdateColorMaps => "updateColorMaps",
            Self::UpdateGeometry => "updateGeometry",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }
}

/// A live engine object.
pub trait SceneEngine {
    /// Invoke `method` with positional arguments and return its result.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Engine`] when the engine throws.
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, SceneError>;

    /// Register the engine's event callback.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Engine`] when the engine rejects the callback.
    fn set_callback(&self, callback: EngineCallback) -> Result<(), SceneError>;

    // --- Typed operations ---

    fn invoke(&self, method: EngineMethod, args: &[Value]) -> Result<Value, SceneError> {
        self.call(method.name(), args)
    }

    fn start(&self) -> Result<(), SceneError> {
        self.invoke(EngineMethod::Start, &[]).map(drop)
    }

    fn render(&self) -> Result<(), SceneError> {
        self.invoke(EngineMethod::Render, &[]).map(drop)
    }

    fn process_events(&self) -> Result<(), SceneError> {
        self.invoke(EngineMethod::ProcessEvents, &[]).map(drop)
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), SceneError> {
        self.invoke(EngineMethod::SetSize, &[Value::from(width), Value::from(height)]).map(drop)
    }

    fn set_path_prefix(&self, path: &str) -> Result<(), SceneError> {
        self.invoke(EngineMethod::SetPathPrefix, &[Value::from(path)]).map(drop)
    }

    fn get_path_prefix(&self) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::GetPathPrefix, &[])
    }

    fn update_camera(&self, config: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::UpdateCamera, std::slice::from_ref(config)).map(drop)
    }

    fn update_color_maps(&self, config: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::UpdateColorMaps, std::slice::from_ref(config)).map(drop)
    }

    fn update_geometry(&self, config: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::UpdateGeometry, std::slice::from_ref(config)).map(drop)
    }

    fn reset_camera(&self) -> Result<(), SceneError> {
        self.invoke(EngineMethod::ResetCamera, &[]).map(drop)
    }

    fn reset_camera_to(&self, target: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::ResetCameraTo, std::slice::from_ref(target)).map(drop)
    }

    fn reset_camera_to_bounds(&self, bounds: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::ResetCameraToBounds, std::slice::from_ref(bounds)).map(drop)
    }

    fn set_background(&self, top: &Value, bottom: &Value) -> Result<(), SceneError> {
        self.invoke(EngineMethod::SetBackground, &[top.clone(), bottom.clone()]).map(drop)
    }

    fn find_point_inside(&self, query: &Value) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::FindPointInside, std::slice::from_ref(query))
    }

    fn find_point_outside(&self, query: &Value) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::FindPointOutside, std::slice::from_ref(query))
    }

    fn get_bounds(&self, object: &Value) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::GetBounds, std::slice::from_ref(object))
    }

    fn get_color_map_presets(&self) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::GetColorMapPresets, &[])
    }

    fn inspect(&self, object: &Value) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::Inspect, std::slice::from_ref(object))
    }

    fn screenshot(&self, args: [Value; 4]) -> Result<Value, SceneError> {
        self.invoke(EngineMethod::Screenshot, &args)
    }
}

/// The loaded binary module: engine factory plus virtual filesystem.
pub trait EngineModule {
    type Engine: SceneEngine + 'static;

    /// Instantiate the engine object. Does not start it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Construct`] when the constructor throws.
    fn construct(&self) -> Result<Self::Engine, SceneError>;

    /// Invoke a virtual-filesystem method.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Fs`] when the filesystem call throws.
    fn fs_call(&self, method: &str, args: &[Value]) -> Result<Value, SceneError>;
}

/// What the loader needs to fetch and bind the binary module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Path returned from the module's `locateFile` hook.
    pub wasm_locator: String,
    /// Global factory the loader calls with the module object.
    pub factory: String,
}

impl ModuleDescriptor {
    #[must_use]
    pub fn from_options(options: &SceneOptions) -> Self {
        Self { wasm_locator: options.wasm_locator.clone(), factory: options.module_factory.clone() }
    }

    /// The module's `setWindowTitle` hook. The embedded scene has no window
    /// title to set.
    pub fn set_window_title(&self, _title: &str) {}
}

/// Construct and start an engine while document listener registration is
/// redirected to the surface.
///
/// The redirection is restored before this returns, on success and on every
/// error path.
///
/// # Errors
///
/// Returns the redirect, construction or `start` failure.
pub fn start_engine<M, R>(module: &M, redirect: &R) -> Result<M::Engine, SceneError>
where
    M: EngineModule + ?Sized,
    R: ListenerRedirect + ?Sized,
{
    let _scope = RedirectScope::acquire(redirect)?;
    let engine = module.construct()?;
    engine.start()?;
    Ok(engine)
}
