//! A wrapper around calls to xlib and X related functions.
// We allow this so that extern "C" functions are not flagged as confusing. The current placement
// allows for easy reading.
#![allow(clippy::items_after_statements)]
use super::xatom::XAtom;
use super::xcursor::XCursor;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_long, c_ulong};
use std::sync::atomic::{AtomicBool, Ordering};
use std::{ptr, slice};
use subtle_core::models::{Chord, DragKind};

use x11_dl::xlib;

mod getters;
mod keyboard;
mod mouse;
mod panel;
mod setters;
mod window;

type WindowStateConst = c_long;
pub const WITHDRAWN_STATE: WindowStateConst = 0;
pub const NORMAL_STATE: WindowStateConst = 1;
pub const ICONIC_STATE: WindowStateConst = 3;
const MAX_PROPERTY_VALUE_LEN: c_long = 4096;

pub const ROOT_EVENT_MASK: c_long = xlib::SubstructureRedirectMask
    | xlib::SubstructureNotifyMask
    | xlib::ButtonPressMask
    | xlib::EnterWindowMask
    | xlib::FocusChangeMask
    | xlib::PropertyChangeMask
    | xlib::StructureNotifyMask;

pub const CLIENT_EVENT_MASK: c_long = xlib::EnterWindowMask
    | xlib::FocusChangeMask
    | xlib::PropertyChangeMask
    | xlib::StructureNotifyMask
    | xlib::ColormapChangeMask;

const BUTTONMASK: c_long = xlib::ButtonPressMask | xlib::ButtonReleaseMask | xlib::ButtonMotionMask;
const MOUSEMASK: c_long = BUTTONMASK | xlib::PointerMotionMask;

/// `modifiers` with every combination of num lock (Mod2) and caps lock, so
/// grabs fire whatever the lock state.
const fn lock_variants(modifiers: u32) -> [u32; 4] {
    [
        modifiers,
        modifiers | xlib::Mod2Mask,
        modifiers | xlib::LockMask,
        modifiers | xlib::Mod2Mask | xlib::LockMask,
    ]
}

const X_CONFIGUREWINDOW: u8 = 12;
const X_GRABBUTTON: u8 = 28;
const X_GRABKEY: u8 = 33;
const X_SETINPUTFOCUS: u8 = 42;
const X_COPYAREA: u8 = 62;
const X_POLYSEGMENT: u8 = 66;
const X_POLYFILLRECTANGLE: u8 = 70;
const X_POLYTEXT8: u8 = 74;

/// Fill pattern of the panel background, 15x16 bits.
const STIPPLE: [u8; 32] = [
    0x49, 0x12, 0x24, 0x49, 0x92, 0x24, 0x49, 0x12, 0x24, 0x49, 0x92, 0x24, 0x49, 0x12, 0x24,
    0x49, 0x92, 0x24, 0x49, 0x12, 0x24, 0x49, 0x92, 0x24, 0x49, 0x12, 0x24, 0x49, 0x92, 0x24,
    0x49, 0x12,
];

static OTHER_WM: AtomicBool = AtomicBool::new(false);

#[allow(clippy::missing_const_for_fn)]
pub extern "C" fn on_error_from_xlib(_: *mut xlib::Display, er: *mut xlib::XErrorEvent) -> c_int {
    let err = unsafe { *er };
    let ec = err.error_code;
    let rc = err.request_code;
    let ba = ec == xlib::BadAccess;
    let bd = ec == xlib::BadDrawable;
    let bm = ec == xlib::BadMatch;

    if ec == xlib::BadWindow
        || (rc == X_CONFIGUREWINDOW && bm)
        || (rc == X_GRABBUTTON && ba)
        || (rc == X_GRABKEY && ba)
        || (rc == X_SETINPUTFOCUS && bm)
        || (rc == X_COPYAREA && bd)
        || (rc == X_POLYSEGMENT && bd)
        || (rc == X_POLYFILLRECTANGLE && bd)
        || (rc == X_POLYTEXT8 && bd)
    {
        return 0;
    }
    tracing::debug!(
        "X error: request {} error {} resource {:#x}",
        rc,
        ec,
        err.resourceid
    );
    1
}

pub extern "C" fn on_error_from_xlib_dummy(
    _: *mut xlib::Display,
    _: *mut xlib::XErrorEvent,
) -> c_int {
    1
}

// Any error while selecting `SubstructureRedirect` on the root means the
// selection is already owned.
extern "C" fn startup_check_for_other_wm(
    _: *mut xlib::Display,
    _: *mut xlib::XErrorEvent,
) -> c_int {
    OTHER_WM.store(true, Ordering::SeqCst);
    0
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum XlibError {
    #[error("Xlib call returned a failed status")]
    FailedStatus,
    #[error("Root window not found")]
    RootWindowNotFound,
    #[error("Invalid atom")]
    InvalidXAtom,
    #[error("Can't open display `{0}'")]
    DisplayOpen(String),
    #[error("Another window manager is already running")]
    AnotherWindowManager,
}

/// Graphic contexts shared by all panel drawing.
pub struct Gcs {
    pub stipple: xlib::GC,
    pub invert: xlib::GC,
    pub text: xlib::GC,
}

/// A pointer drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub window: xlib::Window,
    pub kind: DragKind,
    /// Pointer position on the root when the drag started.
    pub origin: (i32, i32),
}

/// Contains Xserver information and origins.
pub struct XWrap {
    xlib: xlib::Xlib,
    display: *mut xlib::Display,
    root: xlib::Window,
    screen: c_int,
    pub atoms: XAtom,
    cursors: XCursor,
    gcs: Gcs,
    stipple: xlib::Pixmap,
    font: *mut xlib::XFontStruct,
    foreground: c_ulong,
    background: c_ulong,
    pub panel: xlib::Window,
    pub tray: xlib::Window,
    pub buttons: Vec<xlib::Window>,
    pub embedded: Vec<xlib::Window>,
    pub panel_height: i32,
    pub drag: Option<Drag>,
    /// Chords grabbed on the root, grabbed again when the keymap changes.
    root_chords: Vec<Chord>,
}

impl XWrap {
    /// Connect to `display` (`$DISPLAY` when `None`) and become its window manager.
    /// # Errors
    ///
    /// Will error if the display can't be opened or another window manager owns it.
    // `XOpenDisplay`: https://tronche.com/gui/x/xlib/display/opening.html
    // `XDefaultRootWindow`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultRootWindow
    // `XSetErrorHandler`: https://tronche.com/gui/x/xlib/event-handling/protocol-errors/XSetErrorHandler.html
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn open(display_name: Option<&str>, panel_height: i32) -> Result<Self, XlibError> {
        let shown_name = display_name.unwrap_or(":0.0").to_owned();
        let xlib =
            xlib::Xlib::open().map_err(|err| XlibError::DisplayOpen(format!("{shown_name}: {err}")))?;
        let name = display_name
            .map(CString::new)
            .transpose()
            .map_err(|_| XlibError::DisplayOpen(shown_name.clone()))?;
        let display = unsafe { (xlib.XOpenDisplay)(name.as_ref().map_or(ptr::null(), |n| n.as_ptr())) };
        if display.is_null() {
            return Err(XlibError::DisplayOpen(shown_name));
        }

        let root = unsafe { (xlib.XDefaultRootWindow)(display) };
        let screen = unsafe { (xlib.XDefaultScreen)(display) };

        // Check that another WM is not running.
        OTHER_WM.store(false, Ordering::SeqCst);
        unsafe {
            (xlib.XSetErrorHandler)(Some(startup_check_for_other_wm));
            (xlib.XSelectInput)(display, root, xlib::SubstructureRedirectMask);
            (xlib.XSync)(display, xlib::False);
        }
        if OTHER_WM.load(Ordering::SeqCst) {
            unsafe { (xlib.XCloseDisplay)(display) };
            return Err(XlibError::AnotherWindowManager);
        }
        unsafe { (xlib.XSetErrorHandler)(Some(on_error_from_xlib)) };

        let atoms = XAtom::new(&xlib, display, screen);
        let cursors = XCursor::new(&xlib, display);
        let (gcs, stipple, font) = Self::create_gcs(&xlib, display, root, screen);
        let foreground = unsafe { (xlib.XWhitePixel)(display, screen) };
        let background = unsafe { (xlib.XBlackPixel)(display, screen) };

        let mut xw = Self {
            xlib,
            display,
            root,
            screen,
            atoms,
            cursors,
            gcs,
            stipple,
            font,
            foreground,
            background,
            panel: 0,
            tray: 0,
            buttons: vec![],
            embedded: vec![],
            panel_height,
            drag: None,
            root_chords: vec![],
        };
        xw.init();

        let (width, height) = xw.get_display_size();
        tracing::info!("Display ({}) is {}x{}", shown_name, width, height);
        xw.sync();
        Ok(xw)
    }

    // `XCreateBitmapFromData`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XCreateBitmapFromData.html
    // `XCreateGC`: https://tronche.com/gui/x/xlib/GC/XCreateGC.html
    // `XLoadQueryFont`: https://tronche.com/gui/x/xlib/graphics/font-metrics/XLoadQueryFont.html
    fn create_gcs(
        xlib: &xlib::Xlib,
        display: *mut xlib::Display,
        root: xlib::Window,
        screen: c_int,
    ) -> (Gcs, xlib::Pixmap, *mut xlib::XFontStruct) {
        unsafe {
            let mut gvals: xlib::XGCValues = std::mem::zeroed();
            let stipple = (xlib.XCreateBitmapFromData)(
                display,
                root,
                STIPPLE.as_ptr().cast::<c_char>(),
                15,
                16,
            );
            gvals.function = xlib::GXcopy;
            gvals.fill_style = xlib::FillStippled;
            gvals.stipple = stipple;
            gvals.foreground = (xlib.XWhitePixel)(display, screen);
            let stipple_gc = (xlib.XCreateGC)(
                display,
                root,
                c_ulong::from(xlib::GCFunction | xlib::GCFillStyle | xlib::GCStipple | xlib::GCForeground),
                &mut gvals,
            );

            gvals.function = xlib::GXinvert;
            gvals.subwindow_mode = xlib::IncludeInferiors;
            gvals.line_width = 3;
            let invert_gc = (xlib.XCreateGC)(
                display,
                root,
                c_ulong::from(xlib::GCFunction | xlib::GCSubwindowMode | xlib::GCLineWidth),
                &mut gvals,
            );

            let font_name = CString::new("fixed").unwrap_or_default();
            let font = (xlib.XLoadQueryFont)(display, font_name.as_ptr());
            let mut gvals: xlib::XGCValues = std::mem::zeroed();
            gvals.function = xlib::GXcopy;
            gvals.foreground = (xlib.XWhitePixel)(display, screen);
            gvals.background = (xlib.XBlackPixel)(display, screen);
            let mut mask = xlib::GCFunction | xlib::GCForeground | xlib::GCBackground;
            if !font.is_null() {
                gvals.font = (*font).fid;
                mask |= xlib::GCFont;
            }
            let text_gc = (xlib.XCreateGC)(display, root, c_ulong::from(mask), &mut gvals);

            (
                Gcs {
                    stipple: stipple_gc,
                    invert: invert_gc,
                    text: text_gc,
                },
                stipple,
                font,
            )
        }
    }

    /// Take over the root window and create our own windows.
    // `XChangeWindowAttributes`: https://tronche.com/gui/x/xlib/window/XChangeWindowAttributes.html
    fn init(&mut self) {
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.cursor = self.cursors.normal;
        attrs.event_mask = ROOT_EVENT_MASK;
        unsafe {
            (self.xlib.XChangeWindowAttributes)(
                self.display,
                self.root,
                xlib::CWEventMask | xlib::CWCursor,
                &mut attrs,
            );
        }
        self.create_panel();
        self.publish();
    }

    /// Initial EWMH state of the root window.
    pub fn publish(&self) {
        let root = self.root;
        self.set_desktop_prop_c_ulong(
            self.panel as c_ulong,
            self.atoms.NetSupportingWmCheck,
            xlib::XA_WINDOW,
        );
        self.set_window_prop_string(
            self.panel,
            "subtle",
            self.atoms.NetWMName,
            self.atoms.UTF8String,
        );
        self.replace_property_long(
            self.panel,
            self.atoms.NetWMPid,
            xlib::XA_CARDINAL,
            &[std::process::id() as c_long],
        );
        self.set_desktop_prop(&[0, 0], self.atoms.NetDesktopViewport);
        self.set_desktop_prop(&[0], self.atoms.NetShowingDesktop);

        let (width, height) = self.get_display_size();
        self.set_desktop_prop(&[0, 0, width as u32, height as u32], self.atoms.NetWorkarea);
        self.set_desktop_prop(&[width as u32, height as u32], self.atoms.NetDesktopGeometry);

        let supported: Vec<c_long> = self
            .atoms
            .net_supported()
            .iter()
            .map(|&atom| atom as c_long)
            .collect();
        self.replace_property_long(root, self.atoms.NetSupported, xlib::XA_ATOM, &supported);
        self.replace_property_long(root, self.atoms.NetClientList, xlib::XA_WINDOW, &[]);
        self.replace_property_long(root, self.atoms.NetClientListStacking, xlib::XA_WINDOW, &[]);
    }

    /// Send a xevent atom for a window to X.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    fn send_xevent_atom(&self, window: xlib::Window, atom: xlib::Atom) -> bool {
        if self.can_send_xevent_atom(window, atom) {
            let mut msg: xlib::XClientMessageEvent = unsafe { std::mem::zeroed() };
            msg.type_ = xlib::ClientMessage;
            msg.window = window;
            msg.message_type = self.atoms.WMProtocols;
            msg.format = 32;
            msg.data.set_long(0, atom as c_long);
            msg.data.set_long(1, xlib::CurrentTime as c_long);
            let mut ev: xlib::XEvent = msg.into();
            self.send_xevent(window, 0, xlib::NoEventMask, &mut ev);
            return true;
        }
        false
    }

    /// Send a client message with five longs of data.
    pub fn send_message(
        &self,
        window: xlib::Window,
        target: xlib::Window,
        message_type: xlib::Atom,
        mask: c_long,
        data: [c_long; 5],
    ) {
        let mut msg: xlib::XClientMessageEvent = unsafe { std::mem::zeroed() };
        msg.type_ = xlib::ClientMessage;
        msg.window = window;
        msg.message_type = message_type;
        msg.format = 32;
        for (i, value) in data.iter().enumerate() {
            msg.data.set_long(i, *value);
        }
        let mut ev: xlib::XEvent = msg.into();
        self.send_xevent(target, 0, mask, &mut ev);
    }

    /// Send a xevent for a window to X.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    pub fn send_xevent(
        &self,
        window: xlib::Window,
        propogate: i32,
        mask: c_long,
        event: &mut xlib::XEvent,
    ) {
        unsafe { (self.xlib.XSendEvent)(self.display, window, propogate, mask, event) };
        self.sync();
    }

    /// Returns whether a window can recieve a xevent atom.
    // `XGetWMProtocols`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMProtocols.html
    fn can_send_xevent_atom(&self, window: xlib::Window, atom: xlib::Atom) -> bool {
        unsafe {
            let mut array: *mut xlib::Atom = std::mem::zeroed();
            let mut length: c_int = std::mem::zeroed();
            let status: xlib::Status =
                (self.xlib.XGetWMProtocols)(self.display, window, &mut array, &mut length);
            if status == 0 || array.is_null() {
                return false;
            }
            let protocols: &[xlib::Atom] = slice::from_raw_parts(array, length as usize);
            let found = protocols.contains(&atom);
            (self.xlib.XFree)(array.cast());
            found
        }
    }

    /// Release everything allocated on the server and disconnect. Calling it
    /// again does nothing.
    // `XFreeGC`: https://tronche.com/gui/x/xlib/GC/XFreeGC.html
    // `XFreePixmap`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XFreePixmap.html
    // `XDestroyWindow`: https://tronche.com/gui/x/xlib/window/XDestroyWindow.html
    // `XCloseDisplay`: https://tronche.com/gui/x/xlib/display/XCloseDisplay.html
    pub fn close(&mut self) {
        if self.display.is_null() {
            return;
        }
        unsafe {
            self.cursors.free(&self.xlib, self.display);

            (self.xlib.XFreeGC)(self.display, self.gcs.stipple);
            (self.xlib.XFreeGC)(self.display, self.gcs.invert);
            (self.xlib.XFreeGC)(self.display, self.gcs.text);
            if !self.font.is_null() {
                (self.xlib.XFreeFont)(self.display, self.font);
                self.font = ptr::null_mut();
            }

            (self.xlib.XFreePixmap)(self.display, self.stipple);

            for button in self.buttons.drain(..) {
                (self.xlib.XDestroyWindow)(self.display, button);
            }
            if self.tray != 0 {
                (self.xlib.XDestroyWindow)(self.display, self.tray);
            }
            if self.panel != 0 {
                (self.xlib.XDestroyWindow)(self.display, self.panel);
            }

            (self.xlib.XSync)(self.display, xlib::False);
            (self.xlib.XCloseDisplay)(self.display);
        }
        self.display = ptr::null_mut();
        self.embedded.clear();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.display.is_null()
    }

    /// Flush and sync the xserver.
    // `XSync`: https://tronche.com/gui/x/xlib/event-handling/XSync.html
    pub fn sync(&self) {
        if self.is_open() {
            unsafe { (self.xlib.XSync)(self.display, xlib::False) };
        }
    }

    /// Flush the xserver.
    // `XFlush`: https://tronche.com/gui/x/xlib/event-handling/XFlush.html
    pub fn flush(&self) {
        if self.is_open() {
            unsafe { (self.xlib.XFlush)(self.display) };
        }
    }

    /// Returns how many events are waiting.
    // `XPending`: https://tronche.com/gui/x/xlib/event-handling/XPending.html
    #[must_use]
    pub fn queue_len(&self) -> i32 {
        if !self.is_open() {
            return 0;
        }
        unsafe { (self.xlib.XPending)(self.display) }
    }

    /// Returns the next `Xevent` of the xserver.
    // `XNextEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XNextEvent.html
    #[must_use]
    pub fn get_next_event(&self) -> xlib::XEvent {
        unsafe {
            let mut event: xlib::XEvent = std::mem::zeroed();
            (self.xlib.XNextEvent)(self.display, &mut event);
            event
        }
    }

    /// Descriptor of the connection, -1 once closed.
    // `XConnectionNumber`: https://tronche.com/gui/x/xlib/display/display-macros.html#ConnectionNumber
    #[must_use]
    pub fn connection_number(&self) -> c_int {
        if !self.is_open() {
            return -1;
        }
        unsafe { (self.xlib.XConnectionNumber)(self.display) }
    }

    /// Install the colormap of a client.
    // `XInstallColormap`: https://tronche.com/gui/x/xlib/window-and-session-manager/XInstallColormap.html
    pub fn install_colormap(&self, colormap: c_ulong) {
        unsafe { (self.xlib.XInstallColormap)(self.display, colormap) };
    }

    #[must_use]
    pub const fn cursor_for(&self, kind: DragKind) -> c_ulong {
        match kind {
            DragKind::Move => self.cursors.move_,
            DragKind::Resize => self.cursors.resize,
        }
    }
}
