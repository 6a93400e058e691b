use roster_core::error::RosterError;
use roster_core::extraction::pdftotext::PdftotextExtractor;
use roster_core::extraction::ExtractionMode;
use roster_core::layout::builtin;
use roster_core::layout::schema::LayoutDef;
use roster_core::ExtractOptions;
use std::path::PathBuf;

use crate::output;

pub struct ExtractArgs {
    pub input_file: PathBuf,
    pub mode: String,
    pub layout: Option<PathBuf>,
    pub preset: Option<String>,
    pub output: String,
    pub out: Option<PathBuf>,
    pub trace: bool,
}

pub fn run(args: ExtractArgs) -> Result<(), RosterError> {
    let mode: ExtractionMode = args.mode.parse()?;
    let layout = resolve_layout(&args)?;
    log::info!("layout '{}' (v{}), mode {:?}", layout.name, layout.version, mode);

    let extractor = PdftotextExtractor::new();
    let result = roster_core::extract_file(
        &args.input_file,
        &extractor,
        &layout,
        &ExtractOptions { mode },
    )?;

    match args.out {
        Some(path) => {
            // Always write JSON when saving to file
            let json = output::json::render(&result, args.trace)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} record(s) from {} table(s), written to {}",
                result.records.len(),
                result.trace.tables.len(),
                path.display()
            );
            if !result.trace.rejections.is_empty() {
                eprintln!(
                    "  {} text piece(s) rejected, rerun with --trace for details",
                    result.trace.rejections.len()
                );
            }
        }
        None => match args.output.as_str() {
            "json" => println!("{}", output::json::render(&result, args.trace)?),
            _ => output::table::print(&result),
        },
    }

    for w in &result.trace.warnings {
        eprintln!("  warning: {}", w.message);
    }

    Ok(())
}

fn resolve_layout(args: &ExtractArgs) -> Result<LayoutDef, RosterError> {
    match (&args.layout, &args.preset) {
        (Some(path), _) => roster_core::layout::load_layout(path),
        (None, Some(name)) => builtin::load_preset(name),
        (None, None) => builtin::default_layout(),
    }
}
