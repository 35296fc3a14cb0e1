//! Use case: fan a translated message out to the matched targets.
//!
//! Posting never waits for a target to process the message, so one
//! unresponsive window cannot stall the others.  Every target gets its own
//! outcome; a failed target is logged and skipped, never raised.
//!
//! # Ordering
//!
//! The native messages packed from one [`TargetMessage`] are posted to a
//! single target in order (button press after its move, high surrogate
//! before low).  If one of them fails the rest are not posted to that
//! target, so it never sees a half gesture in the wrong order.  No order is
//! promised between different targets.

use std::sync::Arc;

use mirror_core::{MatchedTarget, TargetMessage, WindowHandle};
use tracing::{debug, trace, warn};

use crate::infrastructure::windowing::{WindowError, WindowSystem};

/// Delivery result for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub handle: WindowHandle,
    /// Number of native messages posted, or why delivery stopped.
    pub result: Result<usize, WindowError>,
}

/// Per-target outcomes of one or more dispatches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    outcomes: Vec<TargetOutcome>,
}

impl DispatchReport {
    pub fn outcomes(&self) -> &[TargetOutcome] {
        &self.outcomes
    }

    /// Records an outcome produced outside [`Dispatcher::dispatch`].
    pub fn record(&mut self, handle: WindowHandle, result: Result<usize, WindowError>) {
        self.outcomes.push(TargetOutcome { handle, result });
    }

    /// Appends the outcomes of `other`.
    pub fn merge(&mut self, other: DispatchReport) {
        self.outcomes.extend(other.outcomes);
    }

    /// Number of targets that received every message.
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of targets that were skipped.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    /// Handles of the skipped targets.
    pub fn failed_handles(&self) -> impl Iterator<Item = WindowHandle> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.handle)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Posts messages to target windows.
#[derive(Clone)]
pub struct Dispatcher {
    windows: Arc<dyn WindowSystem>,
}

impl Dispatcher {
    pub fn new(windows: Arc<dyn WindowSystem>) -> Self {
        Self { windows }
    }

    /// Posts `message` to every target and reports each outcome.
    ///
    /// Each handle is revalidated first, since it may have been resolved
    /// before the window closed.
    pub fn dispatch(&self, message: &TargetMessage, targets: &[MatchedTarget]) -> DispatchReport {
        let packed = message.packed();
        let mut report = DispatchReport::default();

        for target in targets {
            let result = self.post_in_order(target.handle, &packed);
            match &result {
                Ok(n) => trace!(target = %target.handle, messages = n, "posted"),
                Err(WindowError::Gone(handle)) => {
                    debug!(target = %handle, title = %target.title, "target window closed; skipped")
                }
                Err(e) => warn!(target = %target.handle, title = %target.title, error = %e, "post failed; skipped"),
            }
            report.record(target.handle, result);
        }
        report
    }

    fn post_in_order(
        &self,
        handle: WindowHandle,
        packed: &[mirror_core::PackedMessage],
    ) -> Result<usize, WindowError> {
        if !self.windows.is_window(handle) {
            return Err(WindowError::Gone(handle));
        }
        for message in packed {
            self.windows.post_message(handle, *message)?;
        }
        Ok(packed.len())
    }
}
