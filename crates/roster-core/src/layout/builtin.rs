use crate::error::RosterError;
use crate::layout::schema::LayoutDef;
use crate::layout::validate_layout;

const ESCALA_SEMANAL_JSON: &str = include_str!("../../../../layouts/escala-semanal.json");

/// Available predefined layouts.
pub const PRESETS: &[&str] = &["escala-semanal"];

/// Preset used when the caller does not name one.
pub const DEFAULT_PRESET: &str = "escala-semanal";

/// Load a predefined layout by name.
pub fn load_preset(name: &str) -> Result<LayoutDef, RosterError> {
    match name {
        "escala-semanal" => {
            let layout: LayoutDef = serde_json::from_str(ESCALA_SEMANAL_JSON)?;
            validate_layout(&layout)?;
            Ok(layout)
        }
        _ => Err(RosterError::LayoutInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

pub fn default_layout() -> Result<LayoutDef, RosterError> {
    load_preset(DEFAULT_PRESET)
}
