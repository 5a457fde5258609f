//! GLFW callback capture
//!
//! GLFW delivers input through C callbacks with no user-data slot we can
//! use, so installed hooks go through `extern "C"` trampolines that look
//! the window up in a process-wide registry. Each registered window owns
//! a vault holding the callbacks that were installed before ours;
//! shutdown puts exactly those pointers back. Trampolines never touch a
//! context directly: they buffer [`PendingEvent`]s that the backend
//! drains at the start of the next frame.

use std::collections::HashMap;
use std::os::raw::{c_double, c_int, c_uint};
use std::sync::{Mutex, OnceLock, PoisonError};

use glfw::ffi;

use crate::backend::PlatformError;

/// Previous callbacks of one window, restored verbatim on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CallbackVault {
    pub cursor_pos: Option<ffi::GLFWcursorposfun>,
    pub mouse_button: Option<ffi::GLFWmousebuttonfun>,
    pub scroll: Option<ffi::GLFWscrollfun>,
    pub key: Option<ffi::GLFWkeyfun>,
    pub text: Option<ffi::GLFWcharfun>,
    pub cursor_enter: Option<ffi::GLFWcursorenterfun>,
    pub focus: Option<ffi::GLFWwindowfocusfun>,
}

impl CallbackVault {
    pub(super) const fn empty() -> Self {
        Self {
            cursor_pos: None,
            mouse_button: None,
            scroll: None,
            key: None,
            text: None,
            cursor_enter: None,
            focus: None,
        }
    }
}

/// One buffered platform event, still in raw GLFW currency. Translation
/// happens on the frame thread where the backend holds the context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum PendingEvent {
    CursorPos { x: c_double, y: c_double },
    MouseButton { button: c_int, action: c_int, mods: c_int },
    Scroll { x: c_double, y: c_double },
    Key { key: c_int, action: c_int, mods: c_int },
    Char { codepoint: u32 },
    CursorEnter { entered: bool },
    Focus { focused: bool },
    MonitorChange,
}

struct WindowSlot {
    /// Window this slot was registered for; doubles as the registry key.
    primary: usize,
    vault: CallbackVault,
    pending: Vec<PendingEvent>,
    chain_all: bool,
}

fn registry() -> &'static Mutex<HashMap<usize, WindowSlot>> {
    static REGISTRY: OnceLock<Mutex<HashMap<usize, WindowSlot>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn with_slot<R>(key: usize, f: impl FnOnce(&mut WindowSlot) -> R) -> Option<R> {
    let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    map.get_mut(&key).map(f)
}

/// Upstream callbacks always run for the window the hooks were installed
/// on; events that reach a slot from any other window chain only when
/// the owner opted in for all windows.
fn should_chain(slot: &WindowSlot, event_window: usize) -> bool {
    slot.chain_all || event_window == slot.primary
}

pub(super) fn register(
    key: usize,
    vault: CallbackVault,
    chain_all: bool,
) -> Result<(), PlatformError> {
    let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if map.contains_key(&key) {
        return Err(PlatformError::AlreadyInstalled);
    }
    map.insert(
        key,
        WindowSlot {
            primary: key,
            vault,
            pending: Vec::new(),
            chain_all,
        },
    );
    Ok(())
}

pub(super) fn unregister(key: usize) -> Option<CallbackVault> {
    let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    map.remove(&key).map(|slot| slot.vault)
}

pub(super) fn is_registered(key: usize) -> bool {
    let map = registry().lock().unwrap_or_else(PoisonError::into_inner);
    map.contains_key(&key)
}

pub(super) fn set_chain_all(key: usize, chain_all: bool) {
    with_slot(key, |slot| slot.chain_all = chain_all);
}

/// Removes and returns everything buffered for a window since the last
/// drain, in arrival order.
pub(super) fn take_pending(key: usize) -> Vec<PendingEvent> {
    with_slot(key, |slot| std::mem::take(&mut slot.pending)).unwrap_or_default()
}

#[cfg(test)]
fn push_for_test(key: usize, event: PendingEvent) {
    with_slot(key, |slot| slot.pending.push(event));
}

/// Hooks every input callback of `window`, remembering what was there.
///
/// # Safety
///
/// `window` must be a live GLFW window and the call must happen on the
/// main thread, per GLFW's own callback rules.
pub(super) unsafe fn install(
    window: *mut ffi::GLFWwindow,
    chain_all: bool,
) -> Result<(), PlatformError> {
    let vault = CallbackVault {
        cursor_pos: ffi::glfwSetCursorPosCallback(window, Some(cursor_pos_trampoline)),
        mouse_button: ffi::glfwSetMouseButtonCallback(window, Some(mouse_button_trampoline)),
        scroll: ffi::glfwSetScrollCallback(window, Some(scroll_trampoline)),
        key: ffi::glfwSetKeyCallback(window, Some(key_trampoline)),
        text: ffi::glfwSetCharCallback(window, Some(char_trampoline)),
        cursor_enter: ffi::glfwSetCursorEnterCallback(window, Some(cursor_enter_trampoline)),
        focus: ffi::glfwSetWindowFocusCallback(window, Some(focus_trampoline)),
    };
    if let Err(err) = register(window as usize, vault, chain_all) {
        apply(window, &vault);
        return Err(err);
    }
    hook_monitor();
    Ok(())
}

/// Undoes [`install`]: puts the vaulted callbacks back on the window.
/// Safe to call when the window was never hooked.
///
/// # Safety
///
/// Same rules as [`install`].
pub(super) unsafe fn uninstall(window: *mut ffi::GLFWwindow) {
    if let Some(vault) = unregister(window as usize) {
        apply(window, &vault);
        unhook_monitor();
    }
}

unsafe fn apply(window: *mut ffi::GLFWwindow, vault: &CallbackVault) {
    ffi::glfwSetCursorPosCallback(window, vault.cursor_pos);
    ffi::glfwSetMouseButtonCallback(window, vault.mouse_button);
    ffi::glfwSetScrollCallback(window, vault.scroll);
    ffi::glfwSetKeyCallback(window, vault.key);
    ffi::glfwSetCharCallback(window, vault.text);
    ffi::glfwSetCursorEnterCallback(window, vault.cursor_enter);
    ffi::glfwSetWindowFocusCallback(window, vault.focus);
}

/// The monitor callback is process-global in GLFW, so it is hooked once
/// for the first registered window and restored when the last leaves.
struct MonitorHook {
    prev: Option<ffi::GLFWmonitorfun>,
    installs: usize,
}

static MONITOR_HOOK: Mutex<MonitorHook> = Mutex::new(MonitorHook {
    prev: None,
    installs: 0,
});

unsafe fn hook_monitor() {
    let mut hook = MONITOR_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
    hook.installs += 1;
    if hook.installs == 1 {
        hook.prev = ffi::glfwSetMonitorCallback(Some(monitor_trampoline));
    }
}

unsafe fn unhook_monitor() {
    let mut hook = MONITOR_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
    hook.installs = hook.installs.saturating_sub(1);
    if hook.installs == 0 {
        ffi::glfwSetMonitorCallback(hook.prev.take());
    }
}

// Trampolines buffer under the registry lock, then chain with the lock
// released: a previous callback may legitimately re-enter GLFW or even
// this module.

extern "C" fn cursor_pos_trampoline(window: *mut ffi::GLFWwindow, x: c_double, y: c_double) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::CursorPos { x, y });
        should_chain(slot, key).then_some(slot.vault.cursor_pos).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, x, y);
    }
}

extern "C" fn mouse_button_trampoline(
    window: *mut ffi::GLFWwindow,
    button: c_int,
    action: c_int,
    mods: c_int,
) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::MouseButton { button, action, mods });
        should_chain(slot, key).then_some(slot.vault.mouse_button).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, button, action, mods);
    }
}

extern "C" fn scroll_trampoline(window: *mut ffi::GLFWwindow, x: c_double, y: c_double) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::Scroll { x, y });
        should_chain(slot, key).then_some(slot.vault.scroll).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, x, y);
    }
}

extern "C" fn key_trampoline(
    window: *mut ffi::GLFWwindow,
    key_code: c_int,
    scancode: c_int,
    action: c_int,
    mods: c_int,
) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::Key {
            key: key_code,
            action,
            mods,
        });
        should_chain(slot, key).then_some(slot.vault.key).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, key_code, scancode, action, mods);
    }
}

extern "C" fn char_trampoline(window: *mut ffi::GLFWwindow, codepoint: c_uint) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::Char { codepoint });
        should_chain(slot, key).then_some(slot.vault.text).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, codepoint);
    }
}

extern "C" fn cursor_enter_trampoline(window: *mut ffi::GLFWwindow, entered: c_int) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::CursorEnter {
            entered: entered == ffi::TRUE,
        });
        should_chain(slot, key).then_some(slot.vault.cursor_enter).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, entered);
    }
}

extern "C" fn focus_trampoline(window: *mut ffi::GLFWwindow, focused: c_int) {
    let key = window as usize;
    let prev = with_slot(key, |slot| {
        slot.pending.push(PendingEvent::Focus {
            focused: focused == ffi::TRUE,
        });
        should_chain(slot, key).then_some(slot.vault.focus).flatten()
    })
    .flatten();
    if let Some(prev) = prev {
        prev(window, focused);
    }
}

extern "C" fn monitor_trampoline(monitor: *mut ffi::GLFWmonitor, event: c_int) {
    {
        let mut map = registry().lock().unwrap_or_else(PoisonError::into_inner);
        for slot in map.values_mut() {
            slot.pending.push(PendingEvent::MonitorChange);
        }
    }
    let prev = MONITOR_HOOK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .prev;
    if let Some(prev) = prev {
        prev(monitor, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn stub_cursor_pos(_: *mut ffi::GLFWwindow, _: c_double, _: c_double) {}
    extern "C" fn stub_key(_: *mut ffi::GLFWwindow, _: c_int, _: c_int, _: c_int, _: c_int) {}

    fn vault_with_stubs() -> CallbackVault {
        CallbackVault {
            cursor_pos: Some(stub_cursor_pos),
            key: Some(stub_key),
            ..CallbackVault::empty()
        }
    }

    // Keys are synthetic addresses; the bookkeeping never dereferences
    // them. Each test uses its own key because the registry is global.

    #[test]
    fn test_unregister_returns_the_installed_vault() {
        let key = 0xA110;
        let vault = vault_with_stubs();
        register(key, vault, false).unwrap();
        assert!(is_registered(key));

        let restored = unregister(key).unwrap();
        assert_eq!(restored, vault);
        assert!(!is_registered(key));
    }

    #[test]
    fn test_double_register_is_rejected() {
        let key = 0xB220;
        register(key, CallbackVault::empty(), false).unwrap();
        let err = register(key, CallbackVault::empty(), false).unwrap_err();
        assert!(matches!(err, PlatformError::AlreadyInstalled));
        unregister(key);
    }

    #[test]
    fn test_pending_events_drain_in_arrival_order() {
        let key = 0xC330;
        register(key, CallbackVault::empty(), false).unwrap();

        push_for_test(key, PendingEvent::CursorPos { x: 1.0, y: 2.0 });
        push_for_test(key, PendingEvent::Char { codepoint: u32::from('g') });
        push_for_test(key, PendingEvent::Focus { focused: false });

        let drained = take_pending(key);
        assert_eq!(
            drained,
            vec![
                PendingEvent::CursorPos { x: 1.0, y: 2.0 },
                PendingEvent::Char { codepoint: u32::from('g') },
                PendingEvent::Focus { focused: false },
            ]
        );
        assert!(take_pending(key).is_empty());
        unregister(key);
    }

    #[test]
    fn test_take_pending_for_unknown_window_is_empty() {
        assert!(take_pending(0xDEAD).is_empty());
    }

    #[test]
    fn test_chain_decision_per_window_and_for_all() {
        let key = 0xD440;
        let foreign = 0xD441;
        register(key, CallbackVault::empty(), false).unwrap();

        with_slot(key, |slot| {
            assert!(should_chain(slot, key));
            assert!(!should_chain(slot, foreign));
        })
        .unwrap();

        set_chain_all(key, true);
        with_slot(key, |slot| {
            assert!(should_chain(slot, foreign));
        })
        .unwrap();

        unregister(key);
    }
}
