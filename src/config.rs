//! Scene options and the externally supplied configuration snapshot.
//!
//! [`SceneOptions`] is fixed for the lifetime of a host: where the binary
//! lives and how big the surface starts. [`ConfigSnapshot`] holds the four
//! independently observed inputs the host may change at any time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{DEFAULT_MODULE_FACTORY, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH, DEFAULT_WASM_LOCATOR};
use crate::error::SceneError;
use crate::resize::ViewportSize;

/// Static options for one embedded scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneOptions {
    /// Path the engine loader fetches the `.wasm` binary from.
    pub wasm_locator: String,
    /// Name of the global module factory installed by the loader script.
    pub module_factory: String,
    /// Backing-store width before the container is measured.
    pub initial_width: u32,
    /// Backing-store height before the container is measured.
    pub initial_height: u32,
    /// Whether to follow container size changes.
    pub observe_resize: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            wasm_locator: DEFAULT_WASM_LOCATOR.to_owned(),
            module_factory: DEFAULT_MODULE_FACTORY.to_owned(),
            initial_width: DEFAULT_SURFACE_WIDTH,
            initial_height: DEFAULT_SURFACE_HEIGHT,
            observe_resize: true,
        }
    }
}

impl SceneOptions {
    /// Parse options from JSON text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Options`] for malformed JSON or for values that
    /// fail [`SceneOptions::validate`].
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let options: Self = serde_json::from_str(text).map_err(|e| SceneError::Options(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reject options the loader cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Options`] for an empty locator or factory name,
    /// or a zero initial dimension.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.wasm_locator.trim().is_empty() {
            return Err(SceneError::Options("wasmLocator must not be empty".into()));
        }
        if self.module_factory.trim().is_empty() {
            return Err(SceneError::Options("moduleFactory must not be empty".into()));
        }
        if self.initial_width == 0 || self.initial_height == 0 {
            return Err(SceneError::Options(format!(
                "initial size must be non-zero, got {}x{}",
                self.initial_width, self.initial_height
            )));
        }
        Ok(())
    }

    /// Surface size used until the first measurement.
    #[must_use]
    pub fn initial_size(&self) -> ViewportSize {
        ViewportSize::new(self.initial_width, self.initial_height)
    }
}

/// One externally supplied configuration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    PathPrefix,
    ColorMaps,
    Camera,
    Geometry,
}

impl ConfigField {
    /// Order fields are applied in when the engine becomes ready. The path
    /// prefix goes first so color maps and geometry resolve relative paths
    /// against it.
    pub const APPLY_ORDER: [Self; 4] = [Self::PathPrefix, Self::ColorMaps, Self::Camera, Self::Geometry];

    /// Host-facing property name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PathPrefix => "pathPrefix",
            Self::ColorMaps => "colorMaps",
            Self::Camera => "camera",
            Self::Geometry => "geometry",
        }
    }
}

/// Current values of the four configuration inputs.
///
/// Each field is tracked on its own; there is no cross-field diffing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub camera: Option<Value>,
    pub geometry: Option<Value>,
    pub color_maps: Option<Value>,
    pub path_prefix: Option<Value>,
}

impl ConfigSnapshot {
    /// The stored value of `field`, if any.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> Option<&Value> {
        self.slot(field).as_ref()
    }

    /// Store `value` for `field`. Returns `true` when the stored value changed.
    pub fn replace(&mut self, field: ConfigField, value: Option<Value>) -> bool {
        let slot = self.slot_mut(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    fn slot(&self, field: ConfigField) -> &Option<Value> {
        match field {
            ConfigField::PathPrefix => &self.path_prefix,
            ConfigField::ColorMaps => &self.color_maps,
            ConfigField::Camera => &self.camera,
            ConfigField::Geometry => &self.geometry,
        }
    }

    fn slot_mut(&mut self, field: ConfigField) -> &mut Option<Value> {
        match field {
            ConfigField::PathPrefix => &mut self.path_prefix,
            ConfigField::ColorMaps => &mut self.color_maps,
            ConfigField::Camera => &mut self.camera,
            ConfigField::Geometry => &mut self.geometry,
        }
    }
}

/// Host truthiness: `null`, `false`, `0`, NaN and `""` are falsy; every
/// object and array is truthy, including empty ones.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
