//! Integration tests for the mirroring session.
//!
//! These tests drive `mirror_session::run` through its public API with the
//! in-memory window system and a mock input source, the same way the binary
//! drives it with the native adapters.  They verify:
//!
//! - A captured gesture reaches the target as correctly ordered, remapped
//!   window messages while the source window is in the foreground.
//! - Nothing is posted while another window is in the foreground, including
//!   the first event after focus moves away and before the next poll tick.
//! - Cancellation stops the loop and tears the capture down.
//! - Startup failures surface before anything is dispatched.
//!
//! # Timing
//!
//! The session polls the foreground before it handles any event (the first
//! interval tick fires immediately and the select loop is biased towards it),
//! so a scripted event stream is always handled against the state set up by
//! the test.

use std::sync::Arc;
use std::time::Duration;

use mirror_app::application::mirror_session::{self, MirrorError, SessionConfig};
use mirror_app::infrastructure::input_capture::mock::MockInputSource;
use mirror_app::infrastructure::input_capture::InputSource;
use mirror_app::infrastructure::windowing::mock::MockWindowSystem;
use mirror_core::message::wm;
use mirror_core::{KeySymbol, MouseButton, RawInputEvent, Rect, TitleQuery, WindowHandle};
use tokio_util::sync::CancellationToken;

const SOURCE: WindowHandle = WindowHandle(0x1000);
const TARGET: WindowHandle = WindowHandle(0x2000);
const STRANGER: WindowHandle = WindowHandle(0x3000);

fn desktop() -> Arc<MockWindowSystem> {
    let ws = Arc::new(MockWindowSystem::new());
    ws.add_window(SOURCE, "Notepad", Rect::new(50, 50, 350, 350));
    ws.add_window(TARGET, "Untitled - Notepad (2)", Rect::new(0, 0, 300, 300));
    ws.add_window(STRANGER, "Calculator", Rect::new(0, 0, 300, 300));
    ws
}

fn session() -> SessionConfig {
    SessionConfig::new(
        TitleQuery::single("Notepad").expect("valid"),
        TitleQuery::single("Untitled - Notepad").expect("valid"),
    )
}

fn click_and_type() -> Vec<RawInputEvent> {
    vec![
        RawInputEvent::MouseMove { x: 100, y: 100 },
        RawInputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
            x: 100,
            y: 100,
        },
        RawInputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
            x: 110,
            y: 100,
        },
        RawInputEvent::Key {
            key: KeySymbol::Char('a'),
            scan_code: 0x1E,
            pressed: true,
            text: Some('a'),
        },
        RawInputEvent::Char { character: 'é' },
    ]
}

// ── Armed session ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_gesture_is_mirrored_in_order_with_remapped_coordinates() {
    // Arrange
    let ws = desktop();
    ws.set_foreground(Some(SOURCE));
    let input = MockInputSource::scripted(click_and_type());

    // Act
    let report = mirror_session::run(session(), ws.clone(), &input, CancellationToken::new())
        .await
        .expect("session runs");

    // Assert
    let posted = ws.posted_to(TARGET);
    let kinds: Vec<u32> = posted.iter().map(|m| m.msg).collect();
    assert_eq!(
        kinds,
        vec![
            wm::MOUSEMOVE,
            wm::MOUSEMOVE,
            wm::LBUTTONDOWN,
            wm::MOUSEMOVE,
            wm::LBUTTONUP,
            wm::KEYDOWN,
            wm::CHAR,
        ]
    );
    // (100,100) in a source client area at (50,50) lands at (50,50) in the target.
    assert_eq!(posted[0].l_param, (50 << 16) | 50);
    assert_eq!(posted[3].l_param, (50 << 16) | 60);
    assert_eq!(posted[5].w_param, 0x41);
    assert_eq!(posted[6].w_param, 'é' as usize);

    assert!(ws.posted_to(SOURCE).is_empty());
    assert!(ws.posted_to(STRANGER).is_empty());
    assert_eq!(report.events_received, 5);
    assert_eq!(report.posts_delivered, 5);
    assert_eq!(report.posts_failed, 0);
    assert_eq!(report.arm_transitions, 1);
    assert_eq!(input.stop_count(), 1);
}

// ── Idle session ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nothing_is_posted_while_source_is_not_foreground() {
    // Arrange
    let ws = desktop();
    ws.set_foreground(Some(STRANGER));
    let input = MockInputSource::scripted(click_and_type());

    // Act
    let report = mirror_session::run(session(), ws.clone(), &input, CancellationToken::new())
        .await
        .expect("session runs");

    // Assert
    assert!(ws.posted().is_empty());
    assert_eq!(report.events_received, 5);
    assert_eq!(report.events_discarded, 5);
    assert_eq!(report.arm_transitions, 0);
}

#[tokio::test]
async fn test_no_matching_target_posts_nothing() {
    // Arrange
    let ws = desktop();
    ws.set_foreground(Some(SOURCE));
    let config = SessionConfig::new(
        TitleQuery::single("Notepad").expect("valid"),
        TitleQuery::single("Paint").expect("valid"),
    );
    let input = MockInputSource::scripted(click_and_type());

    // Act
    let report = mirror_session::run(config, ws.clone(), &input, CancellationToken::new())
        .await
        .expect("session runs");

    // Assert
    assert!(ws.posted().is_empty());
    assert_eq!(report.events_without_targets, 5);
}

// ── Focus change mid-stream ───────────────────────────────────────────────────

#[tokio::test]
async fn test_first_event_after_focus_moves_away_is_not_mirrored() {
    // Arrange – only the immediate first tick fires during the test
    let ws = desktop();
    ws.set_foreground(Some(SOURCE));
    let mut config = session();
    config.foreground_poll = Duration::from_secs(3600);
    let input = Arc::new(MockInputSource::new());

    let task = {
        let (ws, input) = (ws.clone(), input.clone());
        tokio::spawn(async move {
            mirror_session::run(config, ws, input.as_ref(), CancellationToken::new()).await
        })
    };
    tokio::time::timeout(Duration::from_secs(5), async {
        while !input.is_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("capture starts");

    assert!(input.inject_event(RawInputEvent::Char { character: 'a' }));
    tokio::time::timeout(Duration::from_secs(5), async {
        while ws.posted_to(TARGET).is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("first character is mirrored");

    // Act
    ws.set_foreground(Some(STRANGER));
    assert!(input.inject_event(RawInputEvent::Char { character: 's' }));
    input.stop();
    let report = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("session exits once the stream closes")
        .expect("task does not panic")
        .expect("session runs");

    // Assert
    let chars: Vec<usize> = ws.posted_to(TARGET).iter().map(|m| m.w_param).collect();
    assert_eq!(chars, vec!['a' as usize]);
    assert_eq!(report.events_received, 2);
    assert_eq!(report.events_discarded, 1);
    assert_eq!(report.posts_delivered, 1);
    assert_eq!(report.disarm_transitions, 1);
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancellation_stops_session_and_tears_down_capture() {
    // Arrange
    let ws = desktop();
    ws.set_foreground(Some(SOURCE));
    let input = Arc::new(MockInputSource::new());
    let cancel = CancellationToken::new();

    let task = {
        let (ws, input, cancel) = (ws.clone(), input.clone(), cancel.clone());
        tokio::spawn(async move { mirror_session::run(session(), ws, input.as_ref(), cancel).await })
    };

    // Wait for capture to be armed.
    tokio::time::timeout(Duration::from_secs(5), async {
        while !input.is_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("capture starts");

    // Act
    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("session exits promptly")
        .expect("task does not panic");

    // Assert
    assert!(result.is_ok());
    assert_eq!(input.stop_count(), 1);
    assert!(!input.is_running());
}

// ── Startup failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_capture_failure_surfaces_before_any_dispatch() {
    // Arrange
    let ws = desktop();
    ws.set_foreground(Some(SOURCE));
    let input = MockInputSource::failing();

    // Act
    let result = mirror_session::run(session(), ws.clone(), &input, CancellationToken::new()).await;

    // Assert
    assert!(matches!(result, Err(MirrorError::Capture(_))));
    assert!(ws.posted().is_empty());
}

#[tokio::test]
async fn test_enumeration_failure_surfaces_before_capture_starts() {
    // Arrange
    let ws = desktop();
    ws.fail_enumeration(true);
    let input = MockInputSource::new();

    // Act
    let result = mirror_session::run(session(), ws.clone(), &input, CancellationToken::new()).await;

    // Assert
    assert!(matches!(result, Err(MirrorError::Enumeration(_))));
    assert_eq!(input.start_count(), 0);
}
