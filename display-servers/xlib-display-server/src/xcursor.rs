use std::os::raw::{c_uint, c_ulong};
use x11_dl::xlib;

#[derive(Clone, Debug)]
pub struct XCursor {
    pub normal: c_ulong,
    pub move_: c_ulong,
    pub resize: c_ulong,
}

// pointer def can be found at https://tronche.com/gui/x/xlib/appendix/b/
const LEFT_PTR: c_uint = 68;
const DOTBOX: c_uint = 40;
const SIZING: c_uint = 120;

impl XCursor {
    // `XCreateFontCursor`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XCreateFontCursor.html
    pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display) -> Self {
        unsafe {
            Self {
                normal: (xlib.XCreateFontCursor)(dpy, LEFT_PTR),
                move_: (xlib.XCreateFontCursor)(dpy, DOTBOX),
                resize: (xlib.XCreateFontCursor)(dpy, SIZING),
            }
        }
    }

    // `XFreeCursor`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XFreeCursor.html
    pub fn free(&self, xlib: &xlib::Xlib, dpy: *mut xlib::Display) {
        unsafe {
            (xlib.XFreeCursor)(dpy, self.normal);
            (xlib.XFreeCursor)(dpy, self.move_);
            (xlib.XFreeCursor)(dpy, self.resize);
        }
    }
}
