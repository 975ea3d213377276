//! Shared constants for the scene bridge.

// ── Module loading ──────────────────────────────────────────────

/// Where the engine's WebAssembly binary is served from, relative to the page.
pub const DEFAULT_WASM_LOCATOR: &str = "__trame_vtk3d/vtk3d.wasm";

/// Global factory function the engine's loader script installs on `window`.
pub const DEFAULT_MODULE_FACTORY: &str = "vtk3d";

// ── Surface ─────────────────────────────────────────────────────

/// Backing-store width used until the container is first measured.
pub const DEFAULT_SURFACE_WIDTH: u32 = 300;

/// Backing-store height used until the container is first measured.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 300;

// ── Events ──────────────────────────────────────────────────────

/// Prefix applied to engine event names when they are re-emitted to the host.
pub const HOST_EVENT_PREFIX: &str = "on-";

/// Key values (as reported by `KeyboardEvent.key`) treated as modifiers.
pub const MODIFIER_KEY_NAMES: [&str; 4] = ["Control", "Shift", "Alt", "Meta"];
