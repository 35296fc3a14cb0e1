//! Use case: turn title queries into live window handles.
//!
//! Resolution always re-enumerates: handles and titles change whenever a
//! window opens, closes or is renamed, so nothing here is cached.  Callers
//! that want to reuse a result for a while (the mirroring session) do so
//! themselves and rely on the dispatcher rejecting stale handles.

use std::collections::HashSet;
use std::sync::Arc;

use mirror_core::{MatchedTarget, Rect, TitleQuery, WindowHandle, WindowInfo};
use serde::Serialize;
use tracing::{debug, warn};

use crate::infrastructure::windowing::{WindowError, WindowOwner, WindowSystem};

/// One row of the diagnostic window listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetListing {
    pub handle: WindowHandle,
    pub title: String,
    /// `true` if the window would receive mirrored input right now.
    pub matched: bool,
}

/// Resolves [`TitleQuery`]s against the live window set.
#[derive(Clone)]
pub struct WindowResolver {
    windows: Arc<dyn WindowSystem>,
}

impl WindowResolver {
    pub fn new(windows: Arc<dyn WindowSystem>) -> Self {
        Self { windows }
    }

    /// Lists every visible titled top-level window, in z-order.
    ///
    /// # Errors
    ///
    /// Propagates the enumeration failure; callers decide whether it is fatal.
    pub fn list_all(&self) -> Result<Vec<WindowInfo>, WindowError> {
        self.windows.enumerate_windows()
    }

    /// Returns every window whose title matches `query`, each at most once.
    ///
    /// An empty result is normal.  An enumeration failure is logged and
    /// reported as no matches.
    pub fn resolve(&self, query: &TitleQuery) -> Vec<MatchedTarget> {
        self.resolve_excluding(query, None)
    }

    /// Like [`resolve`](Self::resolve) but never returns `exclude`.
    ///
    /// The mirroring session passes the source handle here so a window that
    /// matches both queries never mirrors to itself.
    pub fn resolve_excluding(
        &self,
        query: &TitleQuery,
        exclude: Option<WindowHandle>,
    ) -> Vec<MatchedTarget> {
        if query.is_empty() {
            return Vec::new();
        }
        match self.list_all() {
            Ok(windows) => matches_in(windows, query, exclude),
            Err(e) => {
                warn!(error = %e, "window enumeration failed; treating as no matches");
                Vec::new()
            }
        }
    }

    /// Returns the window the source query names, if it names one unambiguously.
    ///
    /// The foreground window wins when it matches `source`.  Otherwise the
    /// first window in z-order that matches `source` but not `targets` is
    /// picked.  `None` when nothing matches, or when every candidate is also
    /// a target.
    pub fn find_source(&self, source: &TitleQuery, targets: &TitleQuery) -> Option<WindowInfo> {
        if source.is_empty() {
            return None;
        }
        match self.list_all() {
            Ok(windows) => self.select_source(&windows, source, targets).cloned(),
            Err(e) => {
                warn!(error = %e, "window enumeration failed while looking for the source");
                None
            }
        }
    }

    /// Snapshot of the windows that would receive mirrored input right now.
    ///
    /// The window [`find_source`](Self::find_source) picks is excluded.
    pub fn current_matches(
        &self,
        targets: &TitleQuery,
        source: Option<&TitleQuery>,
    ) -> Vec<MatchedTarget> {
        if targets.is_empty() {
            return Vec::new();
        }
        let windows = match self.list_all() {
            Ok(w) => w,
            Err(e) => {
                warn!(error = %e, "window enumeration failed; treating as no matches");
                return Vec::new();
            }
        };
        let source_handle = source
            .and_then(|q| self.select_source(&windows, q, targets))
            .map(|w| w.handle);
        matches_in(windows, targets, source_handle)
    }

    /// Lists every visible titled window with its match flag, in z-order.
    ///
    /// Read-only.  The source window is listed with `matched = false`.
    pub fn list_targets(
        &self,
        targets: &TitleQuery,
        source: Option<&TitleQuery>,
    ) -> Result<Vec<TargetListing>, WindowError> {
        let windows = self.list_all()?;
        let source_handle = source
            .and_then(|q| self.select_source(&windows, q, targets))
            .map(|w| w.handle);

        Ok(windows
            .into_iter()
            .map(|w| TargetListing {
                matched: Some(w.handle) != source_handle && targets.matches(&w.title),
                handle: w.handle,
                title: w.title,
            })
            .collect())
    }

    fn select_source<'a>(
        &self,
        windows: &'a [WindowInfo],
        source: &TitleQuery,
        targets: &TitleQuery,
    ) -> Option<&'a WindowInfo> {
        let foreground = self.windows.foreground_window();
        let mut candidates = windows.iter().filter(|w| source.matches(&w.title));
        if let Some(w) = candidates.clone().find(|w| Some(w.handle) == foreground) {
            return Some(w);
        }
        let picked = candidates.find(|w| !targets.matches(&w.title));
        if picked.is_none() {
            debug!("no window matches the source query without also matching the targets");
        }
        picked
    }
}

fn matches_in(
    windows: Vec<WindowInfo>,
    query: &TitleQuery,
    exclude: Option<WindowHandle>,
) -> Vec<MatchedTarget> {
    let mut seen = HashSet::new();
    let matches: Vec<MatchedTarget> = windows
        .into_iter()
        .filter(|w| Some(w.handle) != exclude)
        .filter(|w| seen.insert(w.handle))
        .filter_map(|w| {
            let pattern = query.first_match(&w.title)?.to_string();
            Some(MatchedTarget {
                handle: w.handle,
                title: w.title,
                matched_by: pattern,
            })
        })
        .collect();
    debug!(count = matches.len(), "resolved targets");
    matches
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Read-only state of one window, for troubleshooting delivery problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowDiagnostics {
    pub handle: WindowHandle,
    /// `false` if the handle went stale.
    pub exists: bool,
    pub title: Option<String>,
    /// Client area in screen coordinates, if it could be measured.
    pub client_bounds: Option<Rect>,
    /// Why the client area could not be measured.
    pub bounds_error: Option<String>,
    pub is_foreground: bool,
    /// Zero-area client (typically minimised): pointer input cannot be mapped.
    pub degenerate: bool,
    /// Owning thread and process; posted messages land in that thread's queue.
    pub owner: Option<WindowOwner>,
    /// Frame covers the primary screen exactly.  Such windows often read
    /// input through DirectInput or raw input and ignore posted messages.
    pub fullscreen: bool,
}

/// Inspects windows without sending them anything.
#[derive(Clone)]
pub struct Diagnostics {
    windows: Arc<dyn WindowSystem>,
}

impl Diagnostics {
    pub fn new(windows: Arc<dyn WindowSystem>) -> Self {
        Self { windows }
    }

    /// Reports what MirrorBox can observe about `handle`.
    pub fn inspect(&self, handle: WindowHandle) -> WindowDiagnostics {
        let exists = self.windows.is_window(handle);
        let title = self.windows.window_title(handle).ok();
        let (client_bounds, bounds_error) = match self.windows.client_bounds(handle) {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let fullscreen = self
            .windows
            .window_bounds(handle)
            .is_ok_and(|frame| frame == self.windows.screen_bounds());
        WindowDiagnostics {
            handle,
            exists,
            title,
            degenerate: client_bounds.map_or(true, |r| r.is_empty()),
            client_bounds,
            bounds_error,
            is_foreground: self.windows.foreground_window() == Some(handle),
            owner: self.windows.window_owner(handle).ok(),
            fullscreen,
        }
    }

    /// Inspects every target in order.
    pub fn inspect_all(&self, targets: &[MatchedTarget]) -> Vec<WindowDiagnostics> {
        targets.iter().map(|t| self.inspect(t.handle)).collect()
    }
}
