pub mod builtin;
pub mod schema;

use crate::error::RosterError;
use schema::LayoutDef;
use std::path::Path;

/// Load a layout from a JSON file.
pub fn load_layout(path: &Path) -> Result<LayoutDef, RosterError> {
    let content = std::fs::read_to_string(path).map_err(|e| RosterError::LayoutLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_layout(&content, path)
}

/// Parse a layout from a JSON string.
pub fn parse_layout(json: &str, source: &Path) -> Result<LayoutDef, RosterError> {
    let layout: LayoutDef = serde_json::from_str(json).map_err(|e| RosterError::LayoutLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_layout(&layout)?;
    Ok(layout)
}

/// Parse a layout from a JSON string (no file path context).
pub fn parse_layout_str(json: &str) -> Result<LayoutDef, RosterError> {
    let layout: LayoutDef = serde_json::from_str(json).map_err(RosterError::Json)?;
    validate_layout(&layout)?;
    Ok(layout)
}

/// Validate that a layout is well-formed.
pub fn validate_layout(layout: &LayoutDef) -> Result<(), RosterError> {
    if layout.header_marker.trim().is_empty() || layout.header_marker.contains(char::is_whitespace)
    {
        return Err(RosterError::LayoutInvalid(
            "header_marker must be a single non-empty word".into(),
        ));
    }

    if layout.max_columns == 0 {
        return Err(RosterError::LayoutInvalid(
            "max_columns must be at least 1".into(),
        ));
    }

    if layout.months.is_empty() {
        return Err(RosterError::LayoutInvalid("months must not be empty".into()));
    }

    for (abbrev, number) in &layout.months {
        if !(1..=12).contains(number) {
            return Err(RosterError::LayoutInvalid(format!(
                "month '{}' maps to {} (expected 1-12)",
                abbrev, number
            )));
        }
        if abbrev != &abbrev.to_lowercase() || abbrev.contains('-') || abbrev.is_empty() {
            return Err(RosterError::LayoutInvalid(format!(
                "month abbreviation '{}' must be lowercase and contain no '-'",
                abbrev
            )));
        }
    }

    if layout.services.is_empty() {
        return Err(RosterError::LayoutInvalid(
            "services must not be empty".into(),
        ));
    }

    for service in &layout.services {
        if service.trim().is_empty() {
            return Err(RosterError::LayoutInvalid(
                "service pattern must not be empty".into(),
            ));
        }
        if service != &service.to_uppercase() {
            return Err(RosterError::LayoutInvalid(format!(
                "service pattern '{}' must be uppercase",
                service
            )));
        }
    }

    let names = &layout.names;
    if names.min_length == 0 || names.min_length > names.max_length {
        return Err(RosterError::LayoutInvalid(format!(
            "name length bounds {}..={} are invalid",
            names.min_length, names.max_length
        )));
    }

    let geo = &layout.geometry;
    let ratios = [
        ("column_tolerance_ratio", geo.column_tolerance_ratio),
        ("fallback_ratio", geo.fallback_ratio),
    ];
    for (field, value) in ratios {
        if !(value > 0.0 && value.is_finite()) {
            return Err(RosterError::LayoutInvalid(format!(
                "geometry.{} must be positive",
                field
            )));
        }
    }
    if geo.fallback_ratio < geo.column_tolerance_ratio || geo.default_fallback < geo.default_tolerance
    {
        return Err(RosterError::LayoutInvalid(
            "geometry fallback bounds must not be tighter than the column tolerance".into(),
        ));
    }

    if layout.line_mode.leading_space_step == Some(0) {
        return Err(RosterError::LayoutInvalid(
            "line_mode.leading_space_step must be at least 1".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "header_marker": "DATA",
        "months": { "jan": 1, "fev": 2 },
        "services": ["ADJUNTO"]
    }"#;

    #[test]
    fn test_parse_minimal_layout_uses_defaults() {
        let layout = parse_layout_str(MINIMAL).unwrap();
        assert_eq!(layout.max_columns, 7);
        assert_eq!(layout.names.min_length, 2);
        assert_eq!(layout.header_lookahead.fragments, 50);
        assert_eq!(layout.line_mode.max_lines_per_service, 20);
        assert!(!layout.line_mode.blank_line_cells);
    }

    #[test]
    fn test_empty_services_rejected() {
        let json = MINIMAL.replace(r#"["ADJUNTO"]"#, "[]");
        assert!(parse_layout_str(&json).is_err());
    }

    #[test]
    fn test_bad_month_rejected() {
        let json = MINIMAL.replace(r#""fev": 2"#, r#""fev": 13"#);
        assert!(parse_layout_str(&json).is_err());
    }

    #[test]
    fn test_lowercase_service_rejected() {
        let json = MINIMAL.replace("ADJUNTO", "adjunto");
        assert!(parse_layout_str(&json).is_err());
    }

    #[test]
    fn test_multiword_marker_rejected() {
        let json = MINIMAL.replace(r#""DATA""#, r#""DATA DE""#);
        assert!(parse_layout_str(&json).is_err());
    }

    #[test]
    fn test_load_layout_missing_file() {
        let err = load_layout(Path::new("/nonexistent/layout.json")).unwrap_err();
        assert!(matches!(err, RosterError::LayoutLoad { .. }));
    }
}
