use tracing::debug;

use crate::report::{AggregatedReport, NodeReport, merge_key};

/// Folds node reports into one cluster report, in the given order.
///
/// Later writes to an existing key replace the earlier record as a whole.
/// For the policies category this means the last node wins.
pub fn merge_reports<'report, I>(policies_id: &str, reports: I) -> AggregatedReport
where
    I: IntoIterator<Item = &'report NodeReport>,
{
    let mut merged = AggregatedReport::new();
    for report in reports {
        for control in &report.controls {
            let key = merge_key(policies_id, &report.name, control);
            if merged.insert(key, control.clone()).is_some() {
                debug!(
                    "Control '{}' from node '{}' replaced an earlier entry",
                    control.id, report.name
                );
            }
        }
    }
    merged
}
