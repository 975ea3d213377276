//! Typed engine events re-emitted to the host.
//!
//! The engine reports activity through a single `(name, payload)` callback.
//! [`SceneEvent::decode`] turns that into a closed set of variants; hosts see
//! each one under `on-<name>`.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::HOST_EVENT_PREFIX;
use crate::error::SceneError;

/// A widget or object in the scene reported a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryChange {
    /// Geometry key the change belongs to, e.g. `bounding_box`.
    pub object: String,
    /// Kind of change, e.g. `modified`.
    pub event: String,
    /// Change details (for widgets: `{ "property": "min/x", "value": .. }`).
    #[serde(default)]
    pub info: Value,
}

/// A pick on the scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickTarget {
    /// Geometry key that was hit, absent when the click hit empty space.
    #[serde(default)]
    pub object: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Events the host can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Startup finished and the initial configuration has been applied.
    Ready,
    Geometry(GeometryChange),
    Clicked(ClickTarget),
    /// A frame was rendered.
    Render(Value),
    /// A character key was typed on the surface.
    Char(String),
    /// The camera moved; payload is the engine's camera description.
    Camera(Value),
    /// A `geometry` or `clicked` event whose payload does not have the usual
    /// shape. Still forwarded to the host.
    Untyped { name: &'static str, payload: Value },
}

impl SceneEvent {
    /// Names the engine can report, in the order the host declares them.
    pub const NAMES: [&'static str; 6] = ["ready", "geometry", "clicked", "render", "char", "camera"];

    /// Decode an engine callback invocation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEvent`] for names outside
    /// [`SceneEvent::NAMES`]. Known names always decode; a geometry or click
    /// payload of another shape becomes [`SceneEvent::Untyped`].
    pub fn decode(name: &str, payload: &Value) -> Result<Self, SceneError> {
        match name {
            "ready" => Ok(Self::Ready),
            "geometry" => Ok(typed_or_raw("geometry", payload, Self::Geometry)),
            "clicked" => Ok(typed_or_raw("clicked", payload, Self::Clicked)),
            "render" => Ok(Self::Render(payload.clone())),
            "char" => Ok(Self::Char(text_of(payload))),
            "camera" => Ok(Self::Camera(structured(payload))),
            other => Err(SceneError::UnknownEvent(other.to_owned())),
        }
    }

    /// Engine-side event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Geometry(_) => "geometry",
            Self::Clicked(_) => "clicked",
            Self::Render(_) => "render",
            Self::Char(_) => "char",
            Self::Camera(_) => "camera",
            Self::Untyped { name, .. } => *name,
        }
    }

    /// Name the host listens for, e.g. `on-clicked`.
    #[must_use]
    pub fn host_name(&self) -> String {
        format!("{HOST_EVENT_PREFIX}{}", self.name())
    }
}

/// Engine payloads arrive as JSON text; structured values pass through.
fn structured(payload: &Value) -> Value {
    match payload {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| payload.clone()),
        other => other.clone(),
    }
}

fn parse_payload<T: for<'de> Deserialize<'de>>(event: &'static str, payload: &Value) -> Result<T, SceneError> {
    serde_json::from_value(structured(payload)).map_err(|source| SceneError::Payload { event, source })
}

fn typed_or_raw<T>(event: &'static str, payload: &Value, wrap: fn(T) -> SceneEvent) -> SceneEvent
where
    T: for<'de> Deserialize<'de>,
{
    match parse_payload(event, payload) {
        Ok(value) => wrap(value),
        Err(e) => {
            log::debug!("{e}; forwarding raw payload");
            SceneEvent::Untyped { name: event, payload: payload.clone() }
        }
    }
}

fn text_of(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
