//! Windows low-level keyboard and mouse hook implementation.
//!
//! This module installs WH_KEYBOARD_LL and WH_MOUSE_LL hooks using the
//! Windows API.  Both hooks share a dedicated Win32 message-loop thread; the
//! thread reports whether installation succeeded before `start()` returns,
//! and `stop()` ends its loop by posting `WM_QUIT` to it.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{mpsc as std_mpsc, Mutex};
use std::thread;
use std::time::Duration;

use mirror_core::keymap::vk_to_key;
use mirror_core::{MouseButton, RawInputEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{MapVirtualKeyW, MAPVK_VK_TO_CHAR};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT,
    PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEHWHEEL, WM_MOUSEMOVE, WM_MOUSEWHEEL,
    WM_QUIT, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP, WM_USER,
    WM_XBUTTONDOWN, WM_XBUTTONUP, XBUTTON1,
};

use super::{CaptureError, CapturedEvent, InputSource};

/// Sender used by the hook callbacks; `None` while capture is stopped.
static EVENT_SENDER: Mutex<Option<UnboundedSender<CapturedEvent>>> = Mutex::new(None);

/// Thread id of the running hook loop, `0` when none is running.
static HOOK_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// How long `start()` waits for the hook thread to report.
const INSTALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Set by `MapVirtualKeyW(MAPVK_VK_TO_CHAR)` for dead keys.
const DEAD_KEY_FLAG: u32 = 0x8000_0000;

/// Global capture through low-level hooks.  Only one may run per process.
#[derive(Debug, Default)]
pub struct HookInputSource;

impl HookInputSource {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for HookInputSource {
    fn start(&self) -> Result<UnboundedReceiver<CapturedEvent>, CaptureError> {
        if HOOK_THREAD_ID.load(Ordering::SeqCst) != 0 {
            return Err(CaptureError::AlreadyRunning);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        set_sender(Some(tx));

        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        thread::Builder::new()
            .name("mirrorbox-hooks".to_string())
            .spawn(move || run_hook_message_loop(ready_tx))
            .map_err(|e| {
                set_sender(None);
                CaptureError::ThreadFailed(e.to_string())
            })?;

        match ready_rx.recv_timeout(INSTALL_TIMEOUT) {
            Ok(Ok(thread_id)) => {
                HOOK_THREAD_ID.store(thread_id, Ordering::SeqCst);
                info!(thread_id, "low-level input hooks installed");
                Ok(rx)
            }
            Ok(Err(e)) => {
                set_sender(None);
                Err(e)
            }
            Err(e) => {
                set_sender(None);
                Err(CaptureError::ThreadFailed(e.to_string()))
            }
        }
    }

    fn stop(&self) {
        set_sender(None);
        let thread_id = HOOK_THREAD_ID.swap(0, Ordering::SeqCst);
        if thread_id == 0 {
            return;
        }
        // SAFETY: posting WM_QUIT to a thread id carries no pointers.
        if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
            warn!(thread_id, error = %e, "could not signal hook thread to exit");
        } else {
            debug!(thread_id, "hook thread signalled to exit");
        }
    }
}

fn set_sender(sender: Option<UnboundedSender<CapturedEvent>>) {
    if let Ok(mut guard) = EVENT_SENDER.lock() {
        *guard = sender;
    }
}

fn send_event(event: RawInputEvent) {
    if let Ok(guard) = EVENT_SENDER.lock() {
        if let Some(sender) = guard.as_ref() {
            // Ignore send errors (consumer gone during shutdown).
            let _ = sender.send(CapturedEvent::now(event));
        }
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready: std_mpsc::SyncSender<Result<u32, CaptureError>>) {
    let mut msg = MSG::default();

    // SAFETY: the hooks are installed from the thread that runs the message
    // loop below, as WH_*_LL hooks require.
    unsafe {
        // Create the thread message queue so PostThreadMessageW from stop()
        // cannot race ahead of GetMessageW.
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);

        let kbd_hook = match SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) {
            Ok(h) => h,
            Err(e) => {
                let _ = ready.send(Err(CaptureError::KeyboardHookInstallFailed(e.to_string())));
                return;
            }
        };
        let mouse_hook = match SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) {
            Ok(h) => h,
            Err(e) => {
                let _ = UnhookWindowsHookEx(kbd_hook);
                let _ = ready.send(Err(CaptureError::MouseHookInstallFailed(e.to_string())));
                return;
            }
        };

        if ready.send(Ok(GetCurrentThreadId())).is_err() {
            let _ = UnhookWindowsHookEx(kbd_hook);
            let _ = UnhookWindowsHookEx(mouse_hook);
            return;
        }

        // Blocks until WM_QUIT; GetMessageW returns -1 on error.
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
        let _ = UnhookWindowsHookEx(kbd_hook);
        let _ = UnhookWindowsHookEx(mouse_hook);
    }
    debug!("hook thread exited");
}

/// The character a key produces on its own, without modifiers.
fn unshifted_char(vk: u32) -> Option<char> {
    // SAFETY: MapVirtualKeyW is a pure table lookup.
    let mapped = unsafe { MapVirtualKeyW(vk, MAPVK_VK_TO_CHAR) };
    if mapped == 0 || mapped & DEAD_KEY_FLAG != 0 {
        return None;
    }
    // Letters come back in upper case.
    char::from_u32(mapped & 0xFFFF).map(|c| c.to_ascii_lowercase())
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

        let pressed = match w_param.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(true),
            WM_KEYUP | WM_SYSKEYUP => Some(false),
            _ => None,
        };
        if let Some(pressed) = pressed {
            send_event(RawInputEvent::Key {
                key: vk_to_key(kbs.vkCode as u8),
                scan_code: kbs.scanCode as u16,
                pressed,
                text: unshifted_char(kbs.vkCode),
            });
        }
    }

    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
        let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        let (x, y) = (mhs.pt.x, mhs.pt.y);
        let high_word = (mhs.mouseData >> 16) as u16;

        let button = |button: MouseButton, pressed: bool| RawInputEvent::MouseButton {
            button,
            pressed,
            x,
            y,
        };
        let x_button = if high_word == XBUTTON1 {
            MouseButton::X1
        } else {
            MouseButton::X2
        };

        let event = match w_param.0 as u32 {
            WM_MOUSEMOVE => Some(RawInputEvent::MouseMove { x, y }),
            WM_LBUTTONDOWN => Some(button(MouseButton::Left, true)),
            WM_LBUTTONUP => Some(button(MouseButton::Left, false)),
            WM_RBUTTONDOWN => Some(button(MouseButton::Right, true)),
            WM_RBUTTONUP => Some(button(MouseButton::Right, false)),
            WM_MBUTTONDOWN => Some(button(MouseButton::Middle, true)),
            WM_MBUTTONUP => Some(button(MouseButton::Middle, false)),
            WM_XBUTTONDOWN => Some(button(x_button, true)),
            WM_XBUTTONUP => Some(button(x_button, false)),
            WM_MOUSEWHEEL | WM_MOUSEHWHEEL => Some(RawInputEvent::MouseWheel {
                delta: high_word as i16,
                horizontal: w_param.0 as u32 == WM_MOUSEHWHEEL,
                x,
                y,
            }),
            _ => None,
        };
        if let Some(event) = event {
            send_event(event);
        }
    }

    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
