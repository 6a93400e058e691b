//! Property-based tests over generated cell text and line documents.

use roster_core::extraction::{ExtractionMode, PageContent, TextLine};
use roster_core::layout::builtin::default_layout;
use roster_core::parsing::people::tokenize_people;
use roster_core::{extract_pages, ExtractOptions};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "CB", "SD", "1ºTEN", "2º", "TEN", "3ºSGT", "CAP", "SILVA", "ROSA", "DA", "CIA", "SUP", "2ª",
    "JOÃO", "X", "R2", "29-out-25", "LIMA-", "(PAIOL)", "ANDRIELLE",
];

fn cell_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..8).prop_map(|w| w.join(" "))
}

fn lines_page(lines: &[String]) -> PageContent {
    let mut all = vec![
        "DATA 29-out-25 30-out-25 31-out-25".to_string(),
        "ADJUNTO".to_string(),
    ];
    all.extend(lines.iter().cloned());
    PageContent {
        page_number: 1,
        lines: all
            .iter()
            .enumerate()
            .map(|(i, l)| TextLine::from_raw(1, i, l))
            .collect(),
        fragments: vec![],
    }
}

/// Property: every accepted candidate satisfies the name rules
#[test]
fn proptest_candidates_have_valid_names() {
    let layout = default_layout().unwrap();
    proptest!(|(text in cell_text())| {
        let people = tokenize_people(&text, &layout);
        for c in &people.candidates {
            let len = c.name.chars().count();
            prop_assert!((2..=50).contains(&len), "bad length: {:?}", c.name);
            prop_assert!(c.name.chars().all(|ch| ch.is_alphabetic() || ch == ' '), "bad chars: {:?}", c.name);
            prop_assert!(!layout.is_noise_name(&c.name), "noise name: {:?}", c.name);
        }
    });
}

/// Property: each service row has one cell per date, and reruns match
#[test]
fn proptest_line_documents_are_complete_and_deterministic() {
    let layout = default_layout().unwrap();
    let options = ExtractOptions {
        mode: ExtractionMode::Lines,
    };
    proptest!(|(lines in prop::collection::vec(cell_text(), 0..6))| {
        let pages = vec![lines_page(&lines)];
        let first = extract_pages(&pages, &layout, &options).unwrap();
        let second = extract_pages(&pages, &layout, &options).unwrap();

        prop_assert_eq!(first.trace.cells.len(), 3 * first.trace.services.len());
        prop_assert_eq!(
            serde_json::to_string(&first.records).unwrap(),
            serde_json::to_string(&second.records).unwrap()
        );
    });
}

/// Property: arbitrary text never panics the pipeline
#[test]
fn proptest_arbitrary_lines_no_panic() {
    let layout = default_layout().unwrap();
    proptest!(|(lines in prop::collection::vec("\\PC{0,40}", 0..10))| {
        let pages = vec![lines_page(&lines)];
        let _ = extract_pages(&pages, &layout, &ExtractOptions::default());
    });
}
