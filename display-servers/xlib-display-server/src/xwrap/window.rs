//! Xlib calls related to a window.
use super::{
    on_error_from_xlib, on_error_from_xlib_dummy, CLIENT_EVENT_MASK, ICONIC_STATE, NORMAL_STATE,
    ROOT_EVENT_MASK,
};
use crate::XWrap;
use std::os::raw::{c_long, c_ulong};
use subtle_core::models::Xyhw;
use subtle_core::ConfigureRequest;
use x11_dl::xlib;

impl XWrap {
    /// Move and resize a window and tell it so.
    pub fn configure_window(&self, window: xlib::Window, geometry: Xyhw) {
        let changes = xlib::XWindowChanges {
            x: geometry.x,
            y: geometry.y,
            width: geometry.w.max(1),
            height: geometry.h.max(1),
            border_width: 0,
            sibling: 0,    // Not unlocked.
            stack_mode: 0, // Not unlocked.
        };
        let unlock = xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight | xlib::CWBorderWidth;
        self.set_window_config(window, changes, u32::from(unlock));
        self.send_configure_notify(window, geometry);
    }

    /// Grant a configure request exactly as asked.
    pub fn pass_configure(&self, request: &ConfigureRequest) {
        let changes = xlib::XWindowChanges {
            x: request.geometry.x,
            y: request.geometry.y,
            width: request.geometry.w,
            height: request.geometry.h,
            border_width: request.border_width,
            sibling: request.sibling.map_or(0, |s| s.0 as xlib::Window),
            stack_mode: request.stack_mode,
        };
        self.set_window_config(request.window.0 as xlib::Window, changes, request.value_mask as u32);
    }

    /// Send a synthetic `XConfigureEvent` for a window to X.
    pub fn send_configure_notify(&self, window: xlib::Window, geometry: Xyhw) {
        let mut configure_event: xlib::XConfigureEvent = unsafe { std::mem::zeroed() };
        configure_event.type_ = xlib::ConfigureNotify;
        configure_event.display = self.display;
        configure_event.event = window;
        configure_event.window = window;
        configure_event.x = geometry.x;
        configure_event.y = geometry.y;
        configure_event.width = geometry.w;
        configure_event.height = geometry.h;
        configure_event.border_width = 0;
        configure_event.above = 0;
        configure_event.override_redirect = 0;
        self.send_xevent(
            window,
            0,
            xlib::StructureNotifyMask,
            &mut configure_event.into(),
        );
    }

    /// Map the shown and unmap the hidden windows, skipping windows already
    /// in the wanted state.
    pub fn set_visibility(&self, shown: &[xlib::Window], hidden: &[xlib::Window]) {
        for window in shown {
            if self.get_wm_state(*window) != Some(NORMAL_STATE) {
                self.toggle_window_visibility(*window, true);
            }
        }
        for window in hidden {
            if self.get_wm_state(*window) != Some(ICONIC_STATE) {
                self.toggle_window_visibility(*window, false);
            }
        }
    }

    /// Maps and unmaps a window depending on it is visible.
    // `XMapWindow`: https://tronche.com/gui/x/xlib/window/XMapWindow.html
    // `XUnmapWindow`: https://tronche.com/gui/x/xlib/window/XUnmapWindow.html
    pub fn toggle_window_visibility(&self, window: xlib::Window, visible: bool) {
        // We don't want to receive this map or unmap event.
        let mask_off = ROOT_EVENT_MASK & !(xlib::SubstructureNotifyMask);
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.event_mask = mask_off;
        self.change_window_attributes(self.root, xlib::CWEventMask, attrs);
        if visible {
            self.set_wm_state(window, NORMAL_STATE);
            unsafe { (self.xlib.XMapWindow)(self.display, window) };
        } else {
            unsafe { (self.xlib.XUnmapWindow)(self.display, window) };
            self.set_wm_state(window, ICONIC_STATE);
        }
        attrs.event_mask = ROOT_EVENT_MASK;
        self.change_window_attributes(self.root, xlib::CWEventMask, attrs);
    }

    /// Focuses a window, or the root when `None`.
    // `XSetInputFocus`: https://tronche.com/gui/x/xlib/input/XSetInputFocus.html
    pub fn focus(&self, window: Option<xlib::Window>) {
        let Some(window) = window else {
            unsafe {
                (self.xlib.XSetInputFocus)(
                    self.display,
                    self.root,
                    xlib::RevertToPointerRoot,
                    xlib::CurrentTime,
                );
            }
            return;
        };
        // Windows setting a false input hint only take focus when told to.
        let never_focus = self
            .get_wmhints(window)
            .is_some_and(|hint| hint.flags & xlib::InputHint != 0 && hint.input == 0);
        if !never_focus {
            unsafe {
                (self.xlib.XSetInputFocus)(
                    self.display,
                    window,
                    xlib::RevertToPointerRoot,
                    xlib::CurrentTime,
                );
            }
        }
        // Tell the window to take focus
        self.send_xevent_atom(window, self.atoms.WMTakeFocus);
    }

    /// Raise a window.
    // `XRaiseWindow`: https://tronche.com/gui/x/xlib/window/XRaiseWindow.html
    pub fn raise(&self, window: xlib::Window) {
        unsafe { (self.xlib.XRaiseWindow)(self.display, window) };
    }

    /// Lower a window.
    // `XLowerWindow`: https://tronche.com/gui/x/xlib/window/XLowerWindow.html
    pub fn lower(&self, window: xlib::Window) {
        unsafe { (self.xlib.XLowerWindow)(self.display, window) };
    }

    /// Kills a window.
    // `XGrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XGrabServer.html
    // `XSetCloseDownMode`: https://tronche.com/gui/x/xlib/display/XSetCloseDownMode.html
    // `XKillClient`: https://tronche.com/gui/x/xlib/window-and-session-manager/XKillClient.html
    // `XUngrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XUngrabServer.html
    pub fn kill_window(&self, window: xlib::Window) {
        // Nicely ask the window to close.
        if !self.send_xevent_atom(window, self.atoms.WMDelete) {
            // Force kill the window.
            unsafe {
                (self.xlib.XGrabServer)(self.display);
                (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib_dummy));
                (self.xlib.XSetCloseDownMode)(self.display, xlib::DestroyAll);
                (self.xlib.XKillClient)(self.display, window);
                self.sync();
                (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib));
                (self.xlib.XUngrabServer)(self.display);
            }
        }
    }

    /// Change a windows attributes.
    // `XChangeWindowAttributes`: https://tronche.com/gui/x/xlib/window/XChangeWindowAttributes.html
    pub fn change_window_attributes(
        &self,
        window: xlib::Window,
        mask: c_ulong,
        mut attrs: xlib::XSetWindowAttributes,
    ) {
        unsafe {
            (self.xlib.XChangeWindowAttributes)(self.display, window, mask, &mut attrs);
        }
    }

    /// Subscribe to an event of a window.
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn subscribe_to_event(&self, window: xlib::Window, mask: c_long) {
        unsafe { (self.xlib.XSelectInput)(self.display, window, mask) };
    }

    /// Subscribe to the wanted events of a client window.
    pub fn subscribe_to_window_events(&self, window: xlib::Window) {
        self.subscribe_to_event(window, CLIENT_EVENT_MASK);
    }
}
