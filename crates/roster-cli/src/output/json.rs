use roster_core::error::RosterError;
use roster_core::model::AssignmentRecord;
use roster_core::parsing::RosterExtraction;
use roster_core::trace::ExtractionTrace;
use serde::Serialize;

#[derive(Serialize)]
struct WithTrace<'a> {
    records: &'a [AssignmentRecord],
    trace: &'a ExtractionTrace,
}

/// Records as a JSON array, or `{records, trace}` when the trace is wanted.
pub fn render(result: &RosterExtraction, with_trace: bool) -> Result<String, RosterError> {
    let json = if with_trace {
        serde_json::to_string_pretty(&WithTrace {
            records: &result.records,
            trace: &result.trace,
        })?
    } else {
        serde_json::to_string_pretty(&result.records)?
    };
    Ok(json)
}
