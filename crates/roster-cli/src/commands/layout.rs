use roster_core::error::RosterError;
use roster_core::layout::builtin;
use std::path::Path;

pub fn list() -> Result<(), RosterError> {
    println!("Available predefined layouts:\n");
    for name in builtin::PRESETS {
        let layout = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<16} {} (v{}){}", name, layout.name, layout.version, default_marker);
        if let Some(ref desc) = layout.description {
            println!("                   {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), RosterError> {
    let layout = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), RosterError> {
    let layout = roster_core::layout::load_layout(file)?;

    println!("Layout '{}' (v{}) is valid.", layout.name, layout.version);
    println!("  Header marker: {}", layout.header_marker);
    println!("  Columns: up to {}", layout.max_columns);
    println!("  Services: {}", layout.services.join(", "));
    if !layout.complements.is_empty() {
        println!("  Complements: {}", layout.complements.join(", "));
    }

    // Potential issues that are not errors
    let mut warnings = Vec::new();
    if layout.months.len() < 12 {
        warnings.push(format!(
            "only {} month abbreviation(s) defined; dates in other months will be ignored",
            layout.months.len()
        ));
    }
    for service in &layout.services {
        if layout.is_complement(service) {
            warnings.push(format!("'{}' is both a service and a complement", service));
        }
    }
    for word in &layout.noise_words {
        if layout.service_pattern(word).is_some() {
            warnings.push(format!("noise word '{}' matches a service pattern", word));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
