//! Translation of captured input into target window messages.
//!
//! [`translate`] is pure: the same event and rectangles always produce the
//! same message, and no state is touched besides the read-only key table.
//! One source event can therefore be translated for many targets at once.
//!
//! # Coordinate mapping
//!
//! Both rectangles are client areas in screen coordinates.  A screen point is
//! first made relative to the source client origin, then scaled by the ratio
//! of the two client sizes:
//!
//! ```text
//! tx = (x - source.left) * target.width  / source.width
//! ty = (y - source.top)  * target.height / source.height
//! ```
//!
//! The result is in target client coordinates, which is what mouse messages
//! carry.  Points outside the source client area are mapped with the same
//! transform (negative or beyond the target's size) rather than clamped, so a
//! drag released outside the window still reaches the target.  Wheel messages
//! are defined in screen coordinates; for them the target origin is added back.

use tracing::trace;

use crate::domain::input::RawInputEvent;
use crate::domain::window::Rect;
use crate::keymap::key_to_vk;
use crate::message::TargetMessage;

/// Translates one captured event for one target window.
///
/// Returns `None` when the event cannot be expressed for this target:
/// - a pointer event while either client area is empty (minimised window,
///   failed measurement reported as an empty rectangle);
/// - a key with no table entry that carries no printable character;
/// - the release of such a key (character input is sent on press only);
/// - a NUL character.
pub fn translate(event: &RawInputEvent, source: Rect, target: Rect) -> Option<TargetMessage> {
    match *event {
        RawInputEvent::MouseMove { x, y } => {
            let (x, y) = map_point(x, y, source, target)?;
            Some(TargetMessage::MouseMove { x, y })
        }
        RawInputEvent::MouseButton {
            button,
            pressed,
            x,
            y,
        } => {
            let (x, y) = map_point(x, y, source, target)?;
            Some(TargetMessage::MouseButton {
                button,
                pressed,
                x,
                y,
            })
        }
        RawInputEvent::MouseWheel {
            delta,
            horizontal,
            x,
            y,
        } => {
            let (cx, cy) = map_point(x, y, source, target)?;
            Some(TargetMessage::MouseWheel {
                delta,
                horizontal,
                x: target.left.saturating_add(cx),
                y: target.top.saturating_add(cy),
            })
        }
        RawInputEvent::Key {
            key,
            scan_code,
            pressed,
            text,
        } => match key_to_vk(key) {
            Some(vk) => Some(TargetMessage::Key {
                vk,
                scan_code,
                pressed,
            }),
            None => match text {
                Some(character) if pressed && !character.is_control() => {
                    Some(TargetMessage::Char { character })
                }
                _ => {
                    trace!(?key, pressed, "no key mapping and no printable fallback");
                    None
                }
            },
        },
        RawInputEvent::Char { character } => {
            if character == '\0' {
                None
            } else {
                Some(TargetMessage::Char { character })
            }
        }
    }
}

/// Maps a screen point into target client coordinates.
fn map_point(x: i32, y: i32, source: Rect, target: Rect) -> Option<(i32, i32)> {
    if source.is_empty() || target.is_empty() {
        trace!(%source, %target, "degenerate client area, dropping pointer event");
        return None;
    }
    let tx = scale(x as i64 - source.left as i64, target.width(), source.width());
    let ty = scale(y as i64 - source.top as i64, target.height(), source.height());
    Some((tx, ty))
}

fn scale(offset: i64, to: i32, from: i32) -> i32 {
    let scaled = (offset * to as i64).div_euclid(from as i64);
    scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
