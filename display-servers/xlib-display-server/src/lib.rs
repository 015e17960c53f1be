//! Xlib backend for subtle: owns the X connection, turns X events into
//! `DisplayEvent`s and carries out the manager's `DisplayAction`s.
// allow casting types
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod event_translate;
mod event_translate_client_message;
mod event_translate_property_notify;
mod xatom;
mod xcursor;
mod xwrap;

pub use xwrap::{XWrap, XlibError};

use self::xwrap::{ICONIC_STATE, NORMAL_STATE, WITHDRAWN_STATE};
use event_translate::XEvent;
use std::os::unix::io::RawFd;
use subtle_core::models::{DragKind, Screen, WindowHandle};
use subtle_core::{
    DisplayAction, DisplayEvent, DisplayServer, PanelItem, WmStateValue, XembedMessage,
};
use x11_dl::xlib;

const fn window(handle: WindowHandle) -> xlib::Window {
    handle.0 as xlib::Window
}

fn windows(handles: &[WindowHandle]) -> Vec<xlib::Window> {
    handles.iter().map(|h| window(*h)).collect()
}

pub struct XlibDisplayServer {
    xw: XWrap,
}

impl XlibDisplayServer {
    /// Connect to `display` and take over its root window.
    /// # Errors
    ///
    /// Will error if the display can't be opened or is already managed.
    pub fn open(display: Option<&str>, panel_height: i32) -> Result<Self, XlibError> {
        let xw = XWrap::open(display, panel_height)?;
        Ok(Self { xw })
    }
}

/// Resolve a key name without a display connection, `None` when libX11
/// can't be loaded or the name is unknown.
// `XStringToKeysym`: https://tronche.com/gui/x/xlib/utilities/keyboard/XStringToKeysym.html
pub fn keysym_from_name(name: &str) -> Option<u32> {
    let xlib = xlib::Xlib::open().ok()?;
    let name = std::ffi::CString::new(name).ok()?;
    match unsafe { (xlib.XStringToKeysym)(name.as_ptr()) } {
        0 => None,
        sym => u32::try_from(sym).ok(),
    }
}

impl DisplayServer for XlibDisplayServer {
    fn connection_fd(&self) -> RawFd {
        self.xw.connection_number()
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent> {
        let mut events = vec![];
        while self.xw.queue_len() > 0 {
            let xlib_event = self.xw.get_next_event();
            let event = XEvent(&mut self.xw, xlib_event).into();
            if let Some(e) = event {
                tracing::trace!("DisplayEvent: {:?}", e);
                events.push(e);
            }
        }
        events
    }

    fn execute_action(&mut self, act: DisplayAction) -> Option<DisplayEvent> {
        tracing::trace!("DisplayAction: {:?}", act);
        let xw = &mut self.xw;
        let event: Option<DisplayEvent> = match act {
            DisplayAction::GrabInputs { window: w, chords } => {
                xw.grab_chords(w.map(window), &chords);
                None
            }
            DisplayAction::UngrabInputs(w) => {
                xw.ungrab_chords(w.map(window));
                None
            }
            DisplayAction::ConfigureWindow(h, geometry) => {
                xw.configure_window(window(h), geometry);
                None
            }
            DisplayAction::PassConfigure(request) => {
                xw.pass_configure(&request);
                None
            }
            DisplayAction::SetVisibility { shown, hidden } => {
                xw.set_visibility(&windows(&shown), &windows(&hidden));
                None
            }
            DisplayAction::Raise(h) => {
                xw.raise(window(h));
                None
            }
            DisplayAction::Lower(h) => {
                xw.lower(window(h));
                None
            }
            DisplayAction::Focus(h) => {
                xw.focus(h.map(window));
                None
            }
            DisplayAction::WarpPointer(h) => from_warp_pointer(xw, h),
            DisplayAction::SetWmState(h, state) => {
                xw.set_wm_state(window(h), wm_state(state));
                None
            }
            DisplayAction::KillWindow(h) => {
                xw.kill_window(window(h));
                None
            }
            DisplayAction::InstallColormap(colormap) => {
                xw.install_colormap(colormap);
                None
            }
            DisplayAction::PublishClients { clients, stacking } => {
                xw.publish_clients(&windows(&clients), &windows(&stacking));
                None
            }
            DisplayAction::PublishActive(h) => {
                xw.publish_active(h.map(window));
                None
            }
            DisplayAction::PublishViews { names, current } => {
                xw.publish_views(&names, current);
                None
            }
            DisplayAction::PublishTags(names) => {
                xw.publish_tags(&names);
                None
            }
            DisplayAction::PublishWindowTags(h, tags) => {
                xw.publish_window_tags(window(h), tags);
                None
            }
            DisplayAction::PublishWorkarea(area) => {
                xw.publish_workarea(area);
                None
            }
            DisplayAction::Xembed(h, message) => from_xembed(xw, h, message),
            DisplayAction::AcquireTraySelection => {
                xw.acquire_tray_selection();
                None
            }
            DisplayAction::RenderPanel(panel) => {
                xw.render_panel(&panel);
                None
            }
            DisplayAction::CreatePanelButton(item) => Some(from_create_panel_button(xw, item)),
            DisplayAction::DestroyPanelButton(h) => {
                xw.destroy_button(window(h));
                None
            }
            DisplayAction::StartDrag(h, kind) => from_start_drag(xw, h, kind),
        };
        if event.is_some() {
            tracing::trace!("DisplayEvent: {:?}", event);
        }
        event
    }

    fn scan(&mut self) -> Vec<DisplayEvent> {
        let mut all: Vec<DisplayEvent> = Vec::new();
        match self.xw.get_all_windows() {
            Ok(handles) => handles.into_iter().for_each(|handle| {
                if handle == self.xw.panel {
                    return;
                }
                let Ok(attrs) = self.xw.get_window_attrs(handle) else {
                    return;
                };
                if attrs.map_state != xlib::IsViewable {
                    return;
                }
                if let Some(info) = self.xw.get_window_info(handle) {
                    self.xw.subscribe_to_window_events(handle);
                    all.push(DisplayEvent::Adopt(XWrap::handle(handle), info));
                }
            }),
            Err(err) => {
                tracing::error!("Can't scan the root window: {}", err);
            }
        }
        all
    }

    fn screens(&self) -> Vec<Screen> {
        self.xw.get_screens()
    }

    fn keysym(&self, name: &str) -> Option<u32> {
        self.xw.get_keysym(name)
    }

    fn flush(&self) {
        self.xw.flush();
    }

    fn has_queued_events(&self) -> bool {
        self.xw.queue_len() > 0
    }

    fn close(&mut self) {
        self.xw.close();
    }
}

impl Drop for XlibDisplayServer {
    fn drop(&mut self) {
        self.xw.close();
    }
}

const fn wm_state(state: WmStateValue) -> std::os::raw::c_long {
    match state {
        WmStateValue::Withdrawn => WITHDRAWN_STATE,
        WmStateValue::Normal => NORMAL_STATE,
        WmStateValue::Iconic => ICONIC_STATE,
    }
}

// Display actions.
fn from_warp_pointer(xw: &mut XWrap, handle: WindowHandle) -> Option<DisplayEvent> {
    if let Err(err) = xw.move_cursor_to_window(window(handle)) {
        tracing::debug!("Can't warp the pointer to {:?}: {}", handle, err);
    }
    None
}

fn from_xembed(
    xw: &mut XWrap,
    handle: WindowHandle,
    message: XembedMessage,
) -> Option<DisplayEvent> {
    xw.send_xembed(window(handle), message);
    None
}

fn from_create_panel_button(xw: &mut XWrap, item: PanelItem) -> DisplayEvent {
    let button = xw.create_button();
    DisplayEvent::PanelButtonCreated(item, XWrap::handle(button))
}

fn from_start_drag(xw: &mut XWrap, handle: WindowHandle, kind: DragKind) -> Option<DisplayEvent> {
    if let Err(err) = xw.start_drag(window(handle), kind) {
        tracing::warn!("Can't start dragging {:?}: {}", handle, err);
    }
    None
}
