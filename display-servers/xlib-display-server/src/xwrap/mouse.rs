//! Xlib calls related to a mouse.
use super::{lock_variants, Drag, XlibError, BUTTONMASK, MOUSEMASK};
use crate::XWrap;
use std::os::raw::{c_int, c_ulong};
use subtle_core::models::DragKind;
use x11_dl::xlib;

impl XWrap {
    /// Grabs the button with the modifier for a window.
    // `XGrabButton`: https://tronche.com/gui/x/xlib/input/XGrabButton.html
    pub fn grab_buttons(&self, window: xlib::Window, button: u32, modifiers: u32) {
        for m in lock_variants(modifiers) {
            unsafe {
                (self.xlib.XGrabButton)(
                    self.display,
                    button,
                    m,
                    window,
                    0,
                    BUTTONMASK as u32,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                    0,
                    0,
                );
            }
        }
    }

    /// Cleans all currently grabbed buttons of a window.
    // `XUngrabButton`: https://tronche.com/gui/x/xlib/input/XUngrabButton.html
    pub fn ungrab_buttons(&self, handle: xlib::Window) {
        unsafe {
            (self.xlib.XUngrabButton)(
                self.display,
                xlib::AnyButton as u32,
                xlib::AnyModifier,
                handle,
            );
        }
    }

    /// Grabs the cursor and sets its visual.
    // `XGrabPointer`: https://tronche.com/gui/x/xlib/input/XGrabPointer.html
    pub fn grab_pointer(&self, cursor: c_ulong) {
        unsafe {
            // grab the mouse
            (self.xlib.XGrabPointer)(
                self.display,
                self.root,
                0,
                MOUSEMASK as u32,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                0,
                cursor,
                xlib::CurrentTime,
            );
        }
    }

    /// Ungrab the cursor.
    // `XUngrabPointer`: https://tronche.com/gui/x/xlib/input/XUngrabPointer.html
    pub fn ungrab_pointer(&self) {
        unsafe {
            // release the mouse grab
            (self.xlib.XUngrabPointer)(self.display, xlib::CurrentTime);
        }
    }

    /// Follow the pointer until the next button release.
    /// # Errors
    ///
    /// Will error if the pointer position can't be queried.
    pub fn start_drag(&mut self, window: xlib::Window, kind: DragKind) -> Result<(), XlibError> {
        let origin = self.get_cursor_point()?;
        self.grab_pointer(self.cursor_for(kind));
        self.drag = Some(Drag {
            window,
            kind,
            origin,
        });
        Ok(())
    }

    /// Release the pointer after a drag. Returns whether a drag was running.
    pub fn end_drag(&mut self) -> bool {
        if self.drag.take().is_some() {
            self.ungrab_pointer();
            return true;
        }
        false
    }

    /// Move the cursor to a window.
    /// # Errors
    ///
    /// Will error if unable to obtain window attributes. See `get_window_attrs`.
    pub fn move_cursor_to_window(&self, window: xlib::Window) -> Result<(), XlibError> {
        let attrs = self.get_window_attrs(window)?;
        let point = (attrs.x + (attrs.width / 2), attrs.y + (attrs.height / 2));
        self.move_cursor_to_point(point);
        Ok(())
    }

    /// Move the cursor to a point.
    // `XWarpPointer`: https://tronche.com/gui/x/xlib/input/XWarpPointer.html
    pub fn move_cursor_to_point(&self, point: (i32, i32)) {
        if point.0 >= 0 && point.1 >= 0 {
            let none: c_int = 0;
            unsafe {
                (self.xlib.XWarpPointer)(
                    self.display,
                    none as c_ulong,
                    self.root,
                    none,
                    none,
                    none as u32,
                    none as u32,
                    point.0,
                    point.1,
                );
            }
        }
    }
}
