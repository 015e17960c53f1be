//! Xlib calls related to a keyboard.
use super::{lock_variants, XlibError};
use crate::XWrap;
use std::os::raw::c_ulong;
use subtle_core::models::{Chord, Input};
use x11_dl::xlib;

impl XWrap {
    /// Grabs the keysym with the modifier for a window.
    // `XKeysymToKeycode`: https://tronche.com/gui/x/xlib/utilities/keyboard/XKeysymToKeycode.html
    // `XGrabKey`: https://tronche.com/gui/x/xlib/input/XGrabKey.html
    pub fn grab_keys(&self, window: xlib::Window, keysym: u32, modifiers: u32) {
        let code = unsafe { (self.xlib.XKeysymToKeycode)(self.display, c_ulong::from(keysym)) };
        if code == 0 {
            tracing::debug!("Keysym {:#x} has no keycode", keysym);
            return;
        }
        for m in lock_variants(modifiers) {
            unsafe {
                (self.xlib.XGrabKey)(
                    self.display,
                    i32::from(code),
                    m,
                    window,
                    1,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                );
            }
        }
    }

    /// Grab chords on a window. Keys are only grabbed on the root, buttons
    /// everywhere.
    pub fn grab_chords(&mut self, window: Option<xlib::Window>, chords: &[Chord]) {
        if window.is_none() {
            self.root_chords = chords.to_vec();
        }
        let target = window.unwrap_or(self.root);
        for chord in chords {
            let modifiers = u32::from(chord.modifiers.bits());
            match chord.input {
                Input::Key(keysym) if window.is_none() => {
                    self.grab_keys(target, keysym, modifiers);
                }
                Input::Key(_) => {}
                Input::Button(button) => self.grab_buttons(target, button, modifiers),
            }
        }
    }

    /// Release every key and button grab of a window, the root when `None`.
    // `XUngrabKey`: https://tronche.com/gui/x/xlib/input/XUngrabKey.html
    pub fn ungrab_chords(&self, window: Option<xlib::Window>) {
        match window {
            Some(window) => self.ungrab_buttons(window),
            None => {
                unsafe {
                    (self.xlib.XUngrabKey)(self.display, xlib::AnyKey, xlib::AnyModifier, self.root);
                }
                self.ungrab_buttons(self.root);
            }
        }
    }

    /// Updates the keyboard mapping.
    /// # Errors
    ///
    /// Will error if updating the keyboard failed.
    // `XRefreshKeyboardMapping`: https://tronche.com/gui/x/xlib/utilities/keyboard/XRefreshKeyboardMapping.html
    pub fn refresh_keyboard(&self, evt: &mut xlib::XMappingEvent) -> Result<(), XlibError> {
        let status = unsafe { (self.xlib.XRefreshKeyboardMapping)(evt) };
        if status == 0 {
            Err(XlibError::FailedStatus)
        } else {
            Ok(())
        }
    }

    /// Grab the root keys again after the keymap changed.
    pub fn regrab_root_keys(&self) {
        unsafe {
            (self.xlib.XUngrabKey)(self.display, xlib::AnyKey, xlib::AnyModifier, self.root);
        }
        for chord in &self.root_chords {
            if let Input::Key(keysym) = chord.input {
                self.grab_keys(self.root, keysym, u32::from(chord.modifiers.bits()));
            }
        }
    }

    /// Converts a keycode to a keysym.
    // `XkbKeycodeToKeysym`: https://linux.die.net/man/3/xkbkeycodetokeysym
    #[must_use]
    pub fn keycode_to_keysym(&self, keycode: u32) -> u32 {
        // Not using XKeycodeToKeysym because deprecated.
        let sym = unsafe { (self.xlib.XkbKeycodeToKeysym)(self.display, keycode as u8, 0, 0) };
        sym as u32
    }
}
