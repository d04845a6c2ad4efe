use serde_json::Deserializer;

use crate::error::BenchmarkError;
use crate::report::{ControlRecord, NodeReport};

/// Decodes the tool's output: a concatenation of JSON control records.
///
/// Records are decoded one at a time until the input is exhausted. Any
/// record that fails to decode, or decodes with an empty id, rejects the
/// whole stream.
///
/// # Errors
///
/// Returns [`BenchmarkError::Parse`] or [`BenchmarkError::EmptyControlId`]
/// for the first bad record.
pub fn parse_controls(output: &[u8]) -> Result<Vec<ControlRecord>, BenchmarkError> {
    let mut controls = Vec::new();
    let stream = Deserializer::from_slice(output).into_iter::<ControlRecord>();
    for (index, record) in stream.enumerate() {
        let record = record.map_err(|source| BenchmarkError::Parse { index, source })?;
        if record.id.is_empty() {
            return Err(BenchmarkError::EmptyControlId { index });
        }
        controls.push(record);
    }
    Ok(controls)
}

/// Builds the node snapshot for `node_name` from raw tool output.
///
/// # Errors
///
/// Returns an error if the output is not a valid record stream.
pub fn parse_node_report(node_name: &str, output: &[u8]) -> Result<NodeReport, BenchmarkError> {
    Ok(NodeReport::new(node_name, parse_controls(output)?))
}
