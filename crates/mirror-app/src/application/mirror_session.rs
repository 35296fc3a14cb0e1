//! Use case: the mirroring session.
//!
//! [`MirrorController`] is a two-state machine:
//!
//! ```text
//!            foreground matches source
//!   Idle  ───────────────────────────────▶  Armed(source)
//!     ▲                                          │
//!     └──────────────────────────────────────────┘
//!            foreground stops matching
//! ```
//!
//! While `Armed`, each captured event is translated for every current target
//! (using the source's client rectangle read at that moment) and dispatched.
//! While `Idle`, events are pulled and discarded; nothing is queued.
//!
//! The armed state is written only by [`MirrorController::poll_foreground`].
//! [`run`] calls it on every poll tick and again before each pulled event, so
//! an event is always handled against the current foreground.  An event
//! captured before the source was last seen idle is dropped even if the
//! source is back in the foreground by the time it is pulled.

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mirror_core::{
    translate, MatchedTarget, RawInputEvent, Rect, TitleQuery, WindowHandle,
};
use serde::Serialize;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::application::dispatch::{DispatchReport, Dispatcher};
use crate::application::resolve_windows::WindowResolver;
use crate::infrastructure::input_capture::{CaptureError, CapturedEvent, InputSource};
use crate::infrastructure::windowing::{WindowError, WindowSystem};

/// Default interval between foreground samples.
pub const DEFAULT_FOREGROUND_POLL: Duration = Duration::from_millis(50);

/// Default lifetime of a resolved target set.
pub const DEFAULT_TARGET_REFRESH: Duration = Duration::from_millis(250);

/// Immutable configuration of one mirroring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub source: TitleQuery,
    pub targets: TitleQuery,
    pub foreground_poll: Duration,
    pub target_refresh: Duration,
}

impl SessionConfig {
    /// Creates a configuration with the default timings.
    pub fn new(source: TitleQuery, targets: TitleQuery) -> Self {
        Self {
            source,
            targets,
            foreground_poll: DEFAULT_FOREGROUND_POLL,
            target_refresh: DEFAULT_TARGET_REFRESH,
        }
    }
}

/// Errors that end a session before any input is relayed.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("input capture could not be armed: {0}")]
    Capture(#[from] CaptureError),

    #[error("top-level windows cannot be enumerated: {0}")]
    Enumeration(#[source] WindowError),
}

// ── Armed state ───────────────────────────────────────────────────────────────

/// Whether input is currently being relayed, and from which source window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MirrorState {
    Idle,
    Armed(WindowHandle),
}

/// Lock-free holder of the [`MirrorState`].
///
/// Encoded as the source handle, `0` meaning idle, so a reader always sees a
/// whole state.  Only the controller's poll step writes it.
#[derive(Debug, Default)]
pub struct ArmState(AtomicIsize);

impl ArmState {
    pub fn load(&self) -> MirrorState {
        match self.0.load(Ordering::Acquire) {
            0 => MirrorState::Idle,
            raw => MirrorState::Armed(WindowHandle(raw)),
        }
    }

    fn store(&self, state: MirrorState) {
        let raw = match state {
            MirrorState::Idle => 0,
            MirrorState::Armed(handle) => handle.0,
        };
        self.0.store(raw, Ordering::Release);
    }
}

// ── Foreground detection ──────────────────────────────────────────────────────

/// Tells the controller which source window, if any, is in the foreground.
///
/// Sampled on every poll tick and before each captured event.  A push-based
/// implementation can return its latest notification here.
pub trait ForegroundProbe: Send {
    fn sample(&mut self) -> Option<WindowHandle>;
}

/// Polls the foreground window and tests its title against the source query.
pub struct ForegroundPoller {
    windows: Arc<dyn WindowSystem>,
    source: TitleQuery,
}

impl ForegroundPoller {
    pub fn new(windows: Arc<dyn WindowSystem>, source: TitleQuery) -> Self {
        Self { windows, source }
    }
}

impl ForegroundProbe for ForegroundPoller {
    fn sample(&mut self) -> Option<WindowHandle> {
        let foreground = self.windows.foreground_window()?;
        let title = self.windows.window_title(foreground).ok()?;
        self.source.matches(&title).then_some(foreground)
    }
}

// ── Target cache ──────────────────────────────────────────────────────────────

/// Resolved targets reused for at most `target_refresh`.
#[derive(Debug, Default)]
struct TargetCache {
    targets: Vec<MatchedTarget>,
    source: Option<WindowHandle>,
    resolved_at: Option<Instant>,
}

impl TargetCache {
    fn invalidate(&mut self) {
        self.resolved_at = None;
    }

    fn get(
        &mut self,
        resolver: &WindowResolver,
        query: &TitleQuery,
        source: WindowHandle,
        refresh: Duration,
        now: Instant,
    ) -> &[MatchedTarget] {
        let fresh = self.source == Some(source)
            && self
                .resolved_at
                .is_some_and(|at| now.saturating_duration_since(at) < refresh);
        if !fresh {
            self.targets = resolver.resolve_excluding(query, Some(source));
            self.source = Some(source);
            self.resolved_at = Some(now);
        }
        &self.targets
    }
}

// ── Session report ────────────────────────────────────────────────────────────

/// Counters accumulated over one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub events_received: u64,
    /// Pulled while idle.
    pub events_discarded: u64,
    /// Armed, but no target was matched.
    pub events_without_targets: u64,
    /// Per-target translations that produced nothing.
    pub translation_gaps: u64,
    /// Per-target deliveries that succeeded.
    pub posts_delivered: u64,
    /// Per-target deliveries that failed.
    pub posts_failed: u64,
    pub arm_transitions: u64,
    pub disarm_transitions: u64,
}

/// What happened to one captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The controller was idle.
    Discarded,
    /// Armed, but the source client area could not be measured.
    SourceUnavailable,
    /// Armed, but no target window matched.
    NoTargets,
    /// Translated and posted; `gaps` targets had no translation.
    Dispatched { report: DispatchReport, gaps: usize },
}

// ── Controller ────────────────────────────────────────────────────────────────

/// The mirroring state machine.
pub struct MirrorController {
    config: SessionConfig,
    windows: Arc<dyn WindowSystem>,
    resolver: WindowResolver,
    dispatcher: Dispatcher,
    foreground: Box<dyn ForegroundProbe>,
    arm: ArmState,
    /// When the last idle sample was taken.
    idle_seen_at: Option<Instant>,
    targets: TargetCache,
    report: SessionReport,
}

impl MirrorController {
    /// Creates an idle controller that polls the foreground window.
    pub fn new(config: SessionConfig, windows: Arc<dyn WindowSystem>) -> Self {
        let probe = ForegroundPoller::new(windows.clone(), config.source.clone());
        Self::with_probe(config, windows, Box::new(probe))
    }

    /// Creates an idle controller with a custom foreground probe.
    pub fn with_probe(
        config: SessionConfig,
        windows: Arc<dyn WindowSystem>,
        foreground: Box<dyn ForegroundProbe>,
    ) -> Self {
        Self {
            resolver: WindowResolver::new(windows.clone()),
            dispatcher: Dispatcher::new(windows.clone()),
            config,
            windows,
            foreground,
            arm: ArmState::default(),
            idle_seen_at: None,
            targets: TargetCache::default(),
            report: SessionReport::default(),
        }
    }

    pub fn state(&self) -> MirrorState {
        self.arm.load()
    }

    pub fn report(&self) -> SessionReport {
        self.report
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Samples the foreground window and updates the armed state.
    pub fn poll_foreground(&mut self) -> MirrorState {
        let sampled_at = Instant::now();
        let next = match self.foreground.sample() {
            Some(source) => MirrorState::Armed(source),
            None => {
                self.idle_seen_at = Some(sampled_at);
                MirrorState::Idle
            }
        };
        let previous = self.arm.load();
        if next != previous {
            match next {
                MirrorState::Armed(source) => {
                    self.report.arm_transitions += 1;
                    info!(source = %source, "source window in foreground; mirroring armed");
                }
                MirrorState::Idle => {
                    self.report.disarm_transitions += 1;
                    info!("source window left the foreground; mirroring idle");
                }
            }
            self.arm.store(next);
            self.targets.invalidate();
        }
        next
    }

    /// Re-samples the foreground, then handles `captured` unless it predates
    /// the last idle sample.
    pub fn handle_captured(&mut self, captured: CapturedEvent) -> EventOutcome {
        self.poll_foreground();
        if self
            .idle_seen_at
            .is_some_and(|idle| captured.captured_at <= idle)
        {
            self.report.events_received += 1;
            self.report.events_discarded += 1;
            trace!(event = ?captured.event, "captured before the source was last seen idle; discarded");
            return EventOutcome::Discarded;
        }
        self.handle_event(captured.event)
    }

    /// Runs one captured event through translate and dispatch.
    pub fn handle_event(&mut self, event: RawInputEvent) -> EventOutcome {
        self.report.events_received += 1;

        let MirrorState::Armed(source) = self.arm.load() else {
            self.report.events_discarded += 1;
            trace!(?event, "idle; event discarded");
            return EventOutcome::Discarded;
        };

        // The source may move or resize at any time.
        let source_bounds = if event.is_pointer() {
            match self.windows.client_bounds(source) {
                Ok(bounds) => bounds,
                Err(e) => {
                    debug!(source = %source, error = %e, "source client area unavailable; event dropped");
                    self.report.translation_gaps += 1;
                    return EventOutcome::SourceUnavailable;
                }
            }
        } else {
            Rect::default()
        };

        let targets = self
            .targets
            .get(
                &self.resolver,
                &self.config.targets,
                source,
                self.config.target_refresh,
                Instant::now(),
            )
            .to_vec();
        if targets.is_empty() {
            self.report.events_without_targets += 1;
            return EventOutcome::NoTargets;
        }

        let mut report = DispatchReport::default();
        let mut gaps = 0;
        for target in &targets {
            let target_bounds = if event.is_pointer() {
                match self.windows.client_bounds(target.handle) {
                    Ok(bounds) => bounds,
                    Err(e @ WindowError::Gone(_)) => {
                        debug!(target = %target.handle, "target window closed; skipped");
                        report.record(target.handle, Err(e));
                        continue;
                    }
                    Err(e) => {
                        debug!(target = %target.handle, error = %e, "target client area unavailable");
                        gaps += 1;
                        continue;
                    }
                }
            } else {
                Rect::default()
            };

            match translate(&event, source_bounds, target_bounds) {
                Some(message) => {
                    report.merge(self.dispatcher.dispatch(&message, std::slice::from_ref(target)))
                }
                None => {
                    debug!(target = %target.handle, ?event, "no translation for target");
                    gaps += 1;
                }
            }
        }

        self.report.translation_gaps += gaps as u64;
        self.report.posts_delivered += report.delivered() as u64;
        self.report.posts_failed += report.failed() as u64;
        if report.failed() > 0 {
            // Re-resolve on the next event instead of waiting for the refresh.
            self.targets.invalidate();
        }
        EventOutcome::Dispatched { report, gaps }
    }

    /// Relays captured input until `cancel` fires or the capture stream ends.
    ///
    /// # Errors
    ///
    /// [`MirrorError::Enumeration`] if windows cannot be listed at all and
    /// [`MirrorError::Capture`] if capture cannot be installed.  Both are
    /// raised before anything is dispatched.
    pub async fn run(
        mut self,
        input: &dyn InputSource,
        cancel: CancellationToken,
    ) -> Result<SessionReport, MirrorError> {
        let visible = self
            .resolver
            .list_all()
            .map_err(MirrorError::Enumeration)?;
        info!(
            windows = visible.len(),
            source = ?self.config.source.patterns().collect::<Vec<_>>(),
            targets = ?self.config.targets.patterns().collect::<Vec<_>>(),
            "starting mirroring session"
        );

        let mut events = input.start()?;

        let mut poll = tokio::time::interval(self.config.foreground_poll);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("cancellation requested; stopping mirroring session");
                    break;
                }
                _ = poll.tick() => {
                    self.poll_foreground();
                }
                event = events.recv() => match event {
                    Some(captured) => {
                        self.handle_captured(captured);
                    }
                    None => {
                        warn!("input capture stream ended");
                        break;
                    }
                },
            }
        }

        input.stop();
        info!(report = ?self.report, "mirroring session ended");
        Ok(self.report)
    }
}

/// Runs one mirroring session with the default foreground poller.
pub async fn run(
    config: SessionConfig,
    windows: Arc<dyn WindowSystem>,
    input: &dyn InputSource,
    cancel: CancellationToken,
) -> Result<SessionReport, MirrorError> {
    MirrorController::new(config, windows).run(input, cancel).await
}

#[cfg(test)]
mod tests {
    use mirror_core::message::wm;
    use mirror_core::{KeySymbol, MouseButton, PackedMessage};

    use super::*;
    use crate::infrastructure::input_capture::mock::MockInputSource;
    use crate::infrastructure::windowing::mock::MockWindowSystem;

    const SOURCE: WindowHandle = WindowHandle(0x100);
    const TARGET_A: WindowHandle = WindowHandle(0x200);
    const TARGET_B: WindowHandle = WindowHandle(0x300);
    const OTHER: WindowHandle = WindowHandle(0x400);

    fn query(p: &str) -> TitleQuery {
        TitleQuery::single(p).expect("valid query")
    }

    fn desktop() -> Arc<MockWindowSystem> {
        let ws = Arc::new(MockWindowSystem::new());
        ws.add_window(SOURCE, "Notepad", Rect::new(50, 50, 350, 350));
        ws.add_window(TARGET_A, "Mirror A", Rect::new(0, 0, 300, 300));
        ws.add_window(TARGET_B, "Mirror B", Rect::new(1000, 0, 1600, 600));
        ws.add_window(OTHER, "Calculator", Rect::new(0, 0, 100, 100));
        ws
    }

    fn controller(ws: &Arc<MockWindowSystem>) -> MirrorController {
        MirrorController::new(SessionConfig::new(query("Notepad"), query("Mirror")), ws.clone())
    }

    fn armed(ws: &Arc<MockWindowSystem>) -> MirrorController {
        ws.set_foreground(Some(SOURCE));
        let mut c = controller(ws);
        assert_eq!(c.poll_foreground(), MirrorState::Armed(SOURCE));
        c
    }

    fn mouse_moves(posted: &[PackedMessage]) -> Vec<(i32, i32)> {
        posted
            .iter()
            .filter(|m| m.msg == wm::MOUSEMOVE)
            .map(|m| ((m.l_param & 0xFFFF) as i16 as i32, ((m.l_param >> 16) & 0xFFFF) as i16 as i32))
            .collect()
    }

    // ── Arming ────────────────────────────────────────────────────────────────

    #[test]
    fn test_controller_starts_idle_and_discards_events() {
        // Arrange
        let ws = desktop();
        let mut c = controller(&ws);

        // Act
        let outcome = c.handle_event(RawInputEvent::MouseMove { x: 100, y: 100 });

        // Assert
        assert_eq!(c.state(), MirrorState::Idle);
        assert_eq!(outcome, EventOutcome::Discarded);
        assert!(ws.posted().is_empty());
        assert_eq!(c.report().events_discarded, 1);
    }

    #[test]
    fn test_poll_arms_only_for_matching_foreground() {
        // Arrange
        let ws = desktop();
        let mut c = controller(&ws);

        // Act / Assert
        ws.set_foreground(Some(OTHER));
        assert_eq!(c.poll_foreground(), MirrorState::Idle);
        ws.set_foreground(Some(SOURCE));
        assert_eq!(c.poll_foreground(), MirrorState::Armed(SOURCE));
        assert_eq!(c.state(), MirrorState::Armed(SOURCE));
        assert_eq!(c.report().arm_transitions, 1);
    }

    #[test]
    fn test_arm_state_round_trips() {
        let state = ArmState::default();
        assert_eq!(state.load(), MirrorState::Idle);
        state.store(MirrorState::Armed(WindowHandle(7)));
        assert_eq!(state.load(), MirrorState::Armed(WindowHandle(7)));
        state.store(MirrorState::Idle);
        assert_eq!(state.load(), MirrorState::Idle);
    }

    // ── Translation through the controller ────────────────────────────────────

    #[test]
    fn test_mouse_move_is_remapped_into_each_target() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);

        // Act
        let outcome = c.handle_event(RawInputEvent::MouseMove { x: 100, y: 100 });

        // Assert
        let EventOutcome::Dispatched { report, gaps } = outcome else {
            panic!("expected dispatch, got {outcome:?}");
        };
        assert_eq!(report.delivered(), 2);
        assert_eq!(gaps, 0);
        assert_eq!(mouse_moves(&ws.posted_to(TARGET_A)), vec![(50, 50)]);
        assert_eq!(mouse_moves(&ws.posted_to(TARGET_B)), vec![(100, 100)]);
        assert!(ws.posted_to(SOURCE).is_empty());
        assert!(ws.posted_to(OTHER).is_empty());
    }

    #[test]
    fn test_source_bounds_are_read_per_event() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);
        c.handle_event(RawInputEvent::MouseMove { x: 100, y: 100 });

        // Act – the source window moves by 50px
        ws.set_bounds(SOURCE, Rect::new(100, 100, 400, 400));
        c.handle_event(RawInputEvent::MouseMove { x: 100, y: 100 });

        // Assert
        assert_eq!(mouse_moves(&ws.posted_to(TARGET_A)), vec![(50, 50), (0, 0)]);
    }

    #[test]
    fn test_unmapped_key_without_text_is_a_translation_gap() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);

        // Act
        let outcome = c.handle_event(RawInputEvent::Key {
            key: KeySymbol::Unidentified(0xFF),
            scan_code: 0,
            pressed: true,
            text: None,
        });

        // Assert
        assert!(matches!(outcome, EventOutcome::Dispatched { gaps: 2, .. }));
        assert!(ws.posted().is_empty());
        assert_eq!(c.report().translation_gaps, 2);
    }

    #[test]
    fn test_minimised_target_gets_keys_but_not_pointer_input() {
        // Arrange
        let ws = desktop();
        ws.set_bounds(TARGET_B, Rect::new(-32000, -32000, -32000, -32000));
        let mut c = armed(&ws);

        // Act
        c.handle_event(RawInputEvent::MouseMove { x: 100, y: 100 });
        c.handle_event(RawInputEvent::Key {
            key: KeySymbol::Enter,
            scan_code: 0x1C,
            pressed: true,
            text: None,
        });

        // Assert
        let kinds: Vec<u32> = ws.posted_to(TARGET_B).iter().map(|m| m.msg).collect();
        assert_eq!(kinds, vec![wm::KEYDOWN]);
        assert_eq!(ws.posted_to(TARGET_A).len(), 2);
    }

    // ── Source / target overlap ───────────────────────────────────────────────

    #[test]
    fn test_source_is_never_its_own_target() {
        // Arrange
        let ws = desktop();
        ws.set_foreground(Some(SOURCE));
        let mut c = MirrorController::new(
            SessionConfig::new(query("Notepad"), query("o")),
            ws.clone(),
        );
        c.poll_foreground();

        // Act
        c.handle_event(RawInputEvent::Char { character: 'x' });

        // Assert
        assert!(ws.posted_to(SOURCE).is_empty());
        assert_eq!(ws.posted_to(TARGET_A).len(), 1);
    }

    // ── Foreground change mid-stream ──────────────────────────────────────────

    #[test]
    fn test_event_after_source_loses_foreground_is_discarded() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);
        c.handle_captured(CapturedEvent::now(RawInputEvent::MouseMove { x: 100, y: 100 }));
        ws.clear_posted();

        // Act – no poll tick between the focus change and the event
        ws.set_foreground(Some(OTHER));
        let outcome = c.handle_captured(CapturedEvent::now(RawInputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            x: 100,
            y: 100,
        }));

        // Assert
        assert_eq!(c.state(), MirrorState::Idle);
        assert_eq!(outcome, EventOutcome::Discarded);
        assert!(ws.posted().is_empty());
        assert_eq!(c.report().disarm_transitions, 1);
    }

    #[test]
    fn test_event_queued_while_idle_is_not_replayed_after_rearming() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);
        let queued = CapturedEvent::now(RawInputEvent::Char { character: 'q' });
        ws.set_foreground(Some(OTHER));
        c.poll_foreground();
        ws.set_foreground(Some(SOURCE));

        // Act
        let stale = c.handle_captured(queued);
        std::thread::sleep(Duration::from_millis(2));
        let fresh = c.handle_captured(CapturedEvent::now(RawInputEvent::Char { character: 'f' }));

        // Assert
        assert_eq!(stale, EventOutcome::Discarded);
        assert!(matches!(fresh, EventOutcome::Dispatched { .. }));
        let chars: Vec<usize> = ws.posted_to(TARGET_A).iter().map(|m| m.w_param).collect();
        assert_eq!(chars, vec!['f' as usize]);
        assert_eq!(c.report().arm_transitions, 2);
        assert_eq!(c.report().events_discarded, 1);
    }

    // ── Target churn ──────────────────────────────────────────────────────────

    #[test]
    fn test_closed_target_is_recorded_then_dropped_from_cache() {
        // Arrange
        let ws = desktop();
        let mut c = armed(&ws);
        c.handle_event(RawInputEvent::Char { character: 'a' });

        // Act
        ws.close_window(TARGET_A);
        let first = c.handle_event(RawInputEvent::Char { character: 'b' });
        let second = c.handle_event(RawInputEvent::Char { character: 'c' });

        // Assert
        let EventOutcome::Dispatched { report, .. } = first else {
            panic!("expected dispatch");
        };
        assert_eq!(report.failed(), 1);
        assert_eq!(report.delivered(), 1);
        let EventOutcome::Dispatched { report, .. } = second else {
            panic!("expected dispatch");
        };
        assert_eq!(report.outcomes().len(), 1, "stale handle re-resolved away");
        assert_eq!(ws.posted_to(TARGET_B).len(), 3);
    }

    #[test]
    fn test_no_matching_targets_dispatches_nothing() {
        // Arrange
        let ws = desktop();
        ws.set_foreground(Some(SOURCE));
        let mut c = MirrorController::new(
            SessionConfig::new(query("Notepad"), query("Paint")),
            ws.clone(),
        );
        c.poll_foreground();

        // Act
        let outcome = c.handle_event(RawInputEvent::Char { character: 'a' });

        // Assert
        assert_eq!(outcome, EventOutcome::NoTargets);
        assert!(ws.posted().is_empty());
        assert_eq!(c.report().events_without_targets, 1);
    }

    #[test]
    fn test_new_target_is_picked_up_after_refresh_interval() {
        // Arrange
        let ws = desktop();
        ws.set_foreground(Some(SOURCE));
        let mut config = SessionConfig::new(query("Notepad"), query("Mirror"));
        config.target_refresh = Duration::ZERO;
        let mut c = MirrorController::new(config, ws.clone());
        c.poll_foreground();
        c.handle_event(RawInputEvent::Char { character: 'a' });

        // Act
        let late = WindowHandle(0x500);
        ws.add_window(late, "Mirror C", Rect::new(0, 0, 10, 10));
        c.handle_event(RawInputEvent::Char { character: 'b' });

        // Assert
        assert_eq!(ws.posted_to(late).len(), 1);
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_fails_before_dispatch_when_capture_cannot_start() {
        // Arrange
        let ws = desktop();
        ws.set_foreground(Some(SOURCE));
        let input = MockInputSource::failing();

        // Act
        let result = controller(&ws).run(&input, CancellationToken::new()).await;

        // Assert
        assert!(matches!(result, Err(MirrorError::Capture(_))));
        assert!(ws.posted().is_empty());
    }

    #[tokio::test]
    async fn test_run_fails_when_windows_cannot_be_enumerated() {
        // Arrange
        let ws = desktop();
        ws.fail_enumeration(true);
        let input = MockInputSource::new();

        // Act
        let result = controller(&ws).run(&input, CancellationToken::new()).await;

        // Assert
        assert!(matches!(result, Err(MirrorError::Enumeration(_))));
        assert_eq!(input.start_count(), 0, "capture never armed");
    }
}
