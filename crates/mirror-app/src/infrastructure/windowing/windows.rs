//! Win32 implementation of [`WindowSystem`].
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use mirror_core::{PackedMessage, Rect, WindowHandle, WindowInfo};
use windows::core::BOOL;
use windows::Win32::Foundation::{
    GetLastError, ERROR_INVALID_WINDOW_HANDLE, HWND, LPARAM, POINT, RECT, WPARAM,
};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClientRect, GetForegroundWindow, GetSystemMetrics, GetWindowRect,
    GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsWindow, IsWindowVisible,
    PostMessageW, SM_CXSCREEN, SM_CYSCREEN,
};

use super::{WindowError, WindowOwner, WindowSystem};

/// Native window system backed by `user32.dll`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowSystem;

impl Win32WindowSystem {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam carries the &mut Vec passed to EnumWindows below, which
    // outlives the enumeration.
    let handles = &mut *(lparam.0 as *mut Vec<HWND>);
    handles.push(hwnd);
    true.into()
}

/// Reads the title of `hwnd`; an empty string for untitled windows.
fn read_title(hwnd: HWND) -> String {
    // SAFETY: GetWindowTextLengthW/GetWindowTextW only read window-manager
    // state for top-level windows and never block on the target thread.
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf);
        String::from_utf16_lossy(&buf[..copied.max(0) as usize])
    }
}

impl WindowSystem for Win32WindowSystem {
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let mut handles: Vec<HWND> = Vec::new();
        // SAFETY: collect_window only pushes into `handles`, which lives for
        // the duration of this synchronous call.
        unsafe {
            EnumWindows(
                Some(collect_window),
                LPARAM(&mut handles as *mut Vec<HWND> as isize),
            )
        }
        .map_err(|e| WindowError::Api {
            call: "EnumWindows",
            message: e.to_string(),
        })?;

        Ok(handles
            .into_iter()
            // SAFETY: IsWindowVisible accepts any handle value, stale or not.
            .filter(|&h| unsafe { IsWindowVisible(h) }.as_bool())
            .filter_map(|h| {
                let title = read_title(h);
                (!title.trim().is_empty()).then(|| WindowInfo {
                    handle: handle_of(h),
                    title,
                })
            })
            .collect())
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowError> {
        if !self.is_window(handle) {
            return Err(WindowError::Gone(handle));
        }
        Ok(read_title(hwnd(handle)))
    }

    fn client_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError> {
        let h = hwnd(handle);
        let mut client = RECT::default();
        // SAFETY: `client` is a valid out-pointer for the duration of the call.
        unsafe { GetClientRect(h, &mut client) }.map_err(|e| {
            if self.is_window(handle) {
                WindowError::Api {
                    call: "GetClientRect",
                    message: e.to_string(),
                }
            } else {
                WindowError::Gone(handle)
            }
        })?;

        // The client rectangle is relative to its own origin (left/top are 0).
        let mut origin = POINT { x: 0, y: 0 };
        // SAFETY: `origin` is a valid in/out pointer for the duration of the call.
        if !unsafe { ClientToScreen(h, &mut origin) }.as_bool() {
            return Err(WindowError::Gone(handle));
        }

        Ok(Rect::from_origin_size(
            origin.x,
            origin.y,
            client.right - client.left,
            client.bottom - client.top,
        ))
    }

    fn window_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError> {
        let mut frame = RECT::default();
        // SAFETY: `frame` is a valid out-pointer for the duration of the call.
        unsafe { GetWindowRect(hwnd(handle), &mut frame) }.map_err(|e| {
            if self.is_window(handle) {
                WindowError::Api {
                    call: "GetWindowRect",
                    message: e.to_string(),
                }
            } else {
                WindowError::Gone(handle)
            }
        })?;
        Ok(Rect::new(frame.left, frame.top, frame.right, frame.bottom))
    }

    fn window_owner(&self, handle: WindowHandle) -> Result<WindowOwner, WindowError> {
        let mut process_id = 0u32;
        // SAFETY: `process_id` is a valid out-pointer; a stale handle yields 0.
        let thread_id = unsafe { GetWindowThreadProcessId(hwnd(handle), Some(&mut process_id)) };
        if thread_id == 0 {
            return Err(WindowError::Gone(handle));
        }
        Ok(WindowOwner {
            thread_id,
            process_id,
        })
    }

    fn screen_bounds(&self) -> Rect {
        // SAFETY: no preconditions.
        let (width, height) =
            unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        Rect::from_origin_size(0, 0, width, height)
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        // SAFETY: IsWindow accepts any handle value.
        unsafe { IsWindow(Some(hwnd(handle))) }.as_bool()
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: no preconditions.
        let fg = unsafe { GetForegroundWindow() };
        let handle = handle_of(fg);
        (!handle.is_null()).then_some(handle)
    }

    fn post_message(
        &self,
        handle: WindowHandle,
        message: PackedMessage,
    ) -> Result<(), WindowError> {
        // SAFETY: PostMessageW copies the parameters into the target queue and
        // returns immediately; no pointers are passed.
        unsafe {
            PostMessageW(
                Some(hwnd(handle)),
                message.msg,
                WPARAM(message.w_param),
                LPARAM(message.l_param),
            )
        }
        .map_err(|e| {
            // SAFETY: reads the calling thread's last-error value.
            if unsafe { GetLastError() } == ERROR_INVALID_WINDOW_HANDLE {
                WindowError::Gone(handle)
            } else {
                WindowError::Api {
                    call: "PostMessageW",
                    message: e.to_string(),
                }
            }
        })
    }
}
