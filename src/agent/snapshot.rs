use arcshift::ArcShift;
use chrono::{DateTime, Utc};

use crate::report::NodeReport;

/// A published node report and when it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub report: NodeReport,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Handle to the agent's current snapshot.
///
/// Every clone observes the same value. Publishing swaps in a complete new
/// [`Snapshot`], so readers see either the previous report or the new one,
/// never a report under construction.
#[derive(Clone)]
pub struct SnapshotStore {
    current: ArcShift<Snapshot>,
}

impl SnapshotStore {
    /// Store holding an empty report for `node_name`.
    #[must_use]
    pub fn new(node_name: &str) -> Self {
        Self {
            current: ArcShift::new(Snapshot {
                report: NodeReport::empty(node_name),
                refreshed_at: None,
            }),
        }
    }

    pub fn publish(&mut self, report: NodeReport, refreshed_at: DateTime<Utc>) {
        self.current.update(Snapshot {
            report,
            refreshed_at: Some(refreshed_at),
        });
    }

    /// Latest published snapshot.
    pub fn current(&mut self) -> &Snapshot {
        self.current.get()
    }

    pub fn report(&mut self) -> &NodeReport {
        &self.current().report
    }
}
