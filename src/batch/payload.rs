//! Batch Payload
//!
//! Merging successful artifacts into one deliverable payload.

use chrono::{DateTime, TimeZone};

use crate::batch::JobResult;

const HEADER_RULE: &str = "===============================================";

// == Merge Payload ==
/// Builds the combined payload, or `None` when nothing succeeded.
///
/// Artifacts appear in the order given (completion order for a batch) and are
/// numbered from 1.
pub fn merge_payload<Tz>(
    attempted: usize,
    results: &[JobResult],
    generated_at: &DateTime<Tz>,
) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let successes: Vec<(&str, &str)> = results
        .iter()
        .filter_map(|r| r.artifact().map(|artifact| (r.reference(), artifact)))
        .collect();

    if successes.is_empty() {
        return None;
    }

    let total_chars: usize = successes
        .iter()
        .map(|(_, artifact)| artifact.chars().count())
        .sum();

    let header = format!(
        "YouTube batch analysis\n\
         {HEADER_RULE}\n\
         Videos attempted: {attempted}\n\
         Videos succeeded: {succeeded}\n\
         Total content length: {total_chars} characters\n\
         Generated at: {timestamp}\n\
         {HEADER_RULE}\n",
        succeeded = successes.len(),
        timestamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    let sections: Vec<String> = successes
        .iter()
        .enumerate()
        .map(|(i, (reference, artifact))| {
            format!("=== Video {}: {} ===\n{}", i + 1, reference, artifact)
        })
        .collect();

    Some(format!("{}\n{}", header, sections.join("\n\n")))
}
