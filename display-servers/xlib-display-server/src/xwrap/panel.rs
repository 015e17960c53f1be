//! The panel along the top of the first screen: view buttons, the caption
//! of the focused client, widget buttons and the tray.
use crate::XWrap;
use std::os::raw::{c_char, c_int, c_long, c_uint};
use subtle_core::{Panel, PanelButton, XembedMessage};
use x11_dl::xlib;

/// Horizontal space around button labels.
const PADDING: i32 = 3;
const DEFAULT_CHAR_WIDTH: i32 = 6;

const XEMBED_EMBEDDED_NOTIFY: c_long = 0;
const XEMBED_WINDOW_ACTIVATE: c_long = 1;
const XEMBED_WINDOW_DEACTIVATE: c_long = 2;
const XEMBED_FOCUS_IN: c_long = 4;
const XEMBED_FOCUS_OUT: c_long = 5;
const XEMBED_FOCUS_CURRENT: c_long = 0;

/// Opcode and detail of an XEMBED message.
#[must_use]
pub const fn xembed_opcode(message: XembedMessage) -> (c_long, c_long) {
    match message {
        XembedMessage::EmbeddedNotify => (XEMBED_EMBEDDED_NOTIFY, 0),
        XembedMessage::WindowActivate => (XEMBED_WINDOW_ACTIVATE, 0),
        XembedMessage::WindowDeactivate => (XEMBED_WINDOW_DEACTIVATE, 0),
        XembedMessage::FocusIn => (XEMBED_FOCUS_IN, XEMBED_FOCUS_CURRENT),
        XembedMessage::FocusOut => (XEMBED_FOCUS_OUT, 0),
    }
}

/// Left edges of buttons laid out side by side from `start`.
#[must_use]
pub fn layout_left(start: i32, widths: &[i32]) -> Vec<i32> {
    let mut x = start;
    widths
        .iter()
        .map(|w| {
            let left = x;
            x += w;
            left
        })
        .collect()
}

/// Left edges of buttons packed against `end`, keeping their order.
#[must_use]
pub fn layout_right(end: i32, widths: &[i32]) -> Vec<i32> {
    let total: i32 = widths.iter().sum();
    layout_left(end - total, widths)
}

impl XWrap {
    /// Create the panel and the tray inside it.
    // `XCreateSimpleWindow`: https://tronche.com/gui/x/xlib/window/XCreateWindow.html
    pub fn create_panel(&mut self) {
        let area = self
            .get_screens()
            .first()
            .map_or_else(Default::default, |screen| screen.geometry);
        let height = self.panel_height.max(1);
        unsafe {
            self.panel = (self.xlib.XCreateSimpleWindow)(
                self.display,
                self.root,
                area.x,
                area.y,
                area.w.max(1) as c_uint,
                height as c_uint,
                0,
                self.foreground,
                self.background,
            );
            self.tray = (self.xlib.XCreateSimpleWindow)(
                self.display,
                self.panel,
                0,
                0,
                1,
                height as c_uint,
                0,
                self.foreground,
                self.background,
            );
        }
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.override_redirect = xlib::True;
        attrs.event_mask = xlib::ExposureMask | xlib::ButtonPressMask;
        self.change_window_attributes(
            self.panel,
            xlib::CWOverrideRedirect | xlib::CWEventMask,
            attrs,
        );
        attrs.event_mask = xlib::SubstructureNotifyMask | xlib::ExposureMask;
        self.change_window_attributes(
            self.tray,
            xlib::CWOverrideRedirect | xlib::CWEventMask,
            attrs,
        );
        if self.panel_height > 0 {
            unsafe { (self.xlib.XMapRaised)(self.display, self.panel) };
        }
    }

    /// Create an unmapped button on the panel.
    pub fn create_button(&mut self) -> xlib::Window {
        let height = self.panel_height.max(1);
        let button = unsafe {
            (self.xlib.XCreateSimpleWindow)(
                self.display,
                self.panel,
                0,
                0,
                1,
                height as c_uint,
                0,
                self.foreground,
                self.background,
            )
        };
        self.subscribe_to_event(button, xlib::ButtonPressMask | xlib::ExposureMask);
        self.buttons.push(button);
        button
    }

    // `XDestroyWindow`: https://tronche.com/gui/x/xlib/window/XDestroyWindow.html
    pub fn destroy_button(&mut self, button: xlib::Window) {
        if let Some(index) = self.buttons.iter().position(|b| *b == button) {
            self.buttons.remove(index);
            unsafe { (self.xlib.XDestroyWindow)(self.display, button) };
        }
    }

    /// Redraw the whole panel.
    // `XClearWindow`: https://tronche.com/gui/x/xlib/window-and-session-manager/XClearWindow.html
    // `XFillRectangle`: https://tronche.com/gui/x/xlib/graphics/filling-areas/XFillRectangle.html
    pub fn render_panel(&self, panel: &Panel) {
        if self.panel_height <= 0 {
            return;
        }
        let height = self.panel_height;
        let width = self
            .get_window_geometry(self.panel)
            .map_or(0, |geometry| geometry.w);
        unsafe {
            (self.xlib.XClearWindow)(self.display, self.panel);
        }

        let mut views: Vec<&PanelButton> = panel.views.iter().collect();
        views.sort_by_key(|b| b.position);
        let widths: Vec<i32> = views.iter().map(|b| self.button_width(&b.label)).collect();
        let lefts = layout_left(0, &widths);
        for ((button, x), w) in views.iter().zip(&lefts).zip(&widths) {
            self.draw_button(button, *x, *w);
        }
        let caption_x = widths.iter().sum::<i32>();

        let tray_width = height * panel.trays.len() as i32;
        let mut widgets: Vec<&PanelButton> = panel.widgets.iter().collect();
        widgets.sort_by_key(|b| b.position);
        let widths: Vec<i32> = widgets.iter().map(|b| self.button_width(&b.label)).collect();
        let lefts = layout_right(width - tray_width, &widths);
        for ((button, x), w) in widgets.iter().zip(&lefts).zip(&widths) {
            self.draw_button(button, *x, *w);
        }
        let widgets_x = lefts.first().copied().unwrap_or(width - tray_width);

        // Background between the buttons.
        if widgets_x > caption_x {
            unsafe {
                (self.xlib.XFillRectangle)(
                    self.display,
                    self.panel,
                    self.gcs.stipple,
                    caption_x,
                    0,
                    (widgets_x - caption_x) as c_uint,
                    height as c_uint,
                );
            }
        }
        if let Some(caption) = &panel.caption {
            self.draw_text(self.panel, caption_x + PADDING, caption);
        }
        self.render_tray(panel, width, tray_width);
        self.flush();
    }

    // `XMoveResizeWindow`: https://tronche.com/gui/x/xlib/window/XMoveResizeWindow.html
    // `XMapRaised`: https://tronche.com/gui/x/xlib/window/XMapRaised.html
    fn draw_button(&self, button: &PanelButton, x: i32, width: i32) {
        let window = button.window.0 as xlib::Window;
        unsafe {
            (self.xlib.XMoveResizeWindow)(
                self.display,
                window,
                x,
                0,
                width.max(1) as c_uint,
                self.panel_height as c_uint,
            );
            (self.xlib.XMapRaised)(self.display, window);
            (self.xlib.XClearWindow)(self.display, window);
        }
        self.draw_text(window, PADDING, &button.label);
        if button.active {
            unsafe {
                (self.xlib.XFillRectangle)(
                    self.display,
                    window,
                    self.gcs.invert,
                    0,
                    0,
                    width.max(1) as c_uint,
                    self.panel_height as c_uint,
                );
            }
        }
    }

    fn render_tray(&self, panel: &Panel, width: i32, tray_width: i32) {
        let height = self.panel_height;
        unsafe {
            if tray_width == 0 {
                (self.xlib.XUnmapWindow)(self.display, self.tray);
                return;
            }
            (self.xlib.XMoveResizeWindow)(
                self.display,
                self.tray,
                width - tray_width,
                0,
                tray_width as c_uint,
                height as c_uint,
            );
            (self.xlib.XMapRaised)(self.display, self.tray);
            for (i, icon) in panel.trays.iter().enumerate() {
                (self.xlib.XMoveResizeWindow)(
                    self.display,
                    icon.0 as xlib::Window,
                    height * i as i32,
                    0,
                    height as c_uint,
                    height as c_uint,
                );
                (self.xlib.XMapRaised)(self.display, icon.0 as xlib::Window);
            }
        }
    }

    fn button_width(&self, label: &str) -> i32 {
        self.text_width(label) + 2 * PADDING
    }

    /// Width of `text` in the panel font.
    // `XTextWidth`: https://tronche.com/gui/x/xlib/graphics/font-metrics/XTextWidth.html
    #[must_use]
    pub fn text_width(&self, text: &str) -> i32 {
        if self.font.is_null() {
            return DEFAULT_CHAR_WIDTH * text.chars().count() as i32;
        }
        unsafe {
            (self.xlib.XTextWidth)(
                self.font,
                text.as_ptr().cast::<c_char>(),
                text.len() as c_int,
            )
        }
    }

    /// Draw `text` vertically centered at `x`.
    // `XDrawString`: https://tronche.com/gui/x/xlib/graphics/drawing-text/XDrawString.html
    fn draw_text(&self, window: xlib::Window, x: i32, text: &str) {
        let baseline = if self.font.is_null() {
            self.panel_height - PADDING
        } else {
            let (ascent, descent) = unsafe { ((*self.font).ascent, (*self.font).descent) };
            ascent + (self.panel_height - ascent - descent) / 2
        };
        unsafe {
            (self.xlib.XDrawString)(
                self.display,
                window,
                self.gcs.text,
                x,
                baseline,
                text.as_ptr().cast::<c_char>(),
                text.len() as c_int,
            );
        }
    }

    /// Become the system tray of the screen.
    /// Returns false if another tray kept the selection.
    // `XSetSelectionOwner`: https://tronche.com/gui/x/xlib/window-information/XSetSelectionOwner.html
    // `XGetSelectionOwner`: https://tronche.com/gui/x/xlib/window-information/XGetSelectionOwner.html
    pub fn acquire_tray_selection(&self) -> bool {
        let selection = self.atoms.NetSystemTraySelection;
        let owner = unsafe {
            (self.xlib.XSetSelectionOwner)(self.display, selection, self.tray, xlib::CurrentTime);
            (self.xlib.XGetSelectionOwner)(self.display, selection)
        };
        if owner != self.tray {
            tracing::warn!("Can't get the system tray selection");
            return false;
        }
        // Tell the tray icons waiting for a manager.
        self.send_message(
            self.root,
            self.root,
            self.atoms.Manager,
            xlib::StructureNotifyMask,
            [
                xlib::CurrentTime as c_long,
                selection as c_long,
                self.tray as c_long,
                0,
                0,
            ],
        );
        true
    }

    /// Send an XEMBED message, reparenting the icon into the tray first when
    /// it is being embedded.
    pub fn send_xembed(&mut self, window: xlib::Window, message: XembedMessage) {
        if message == XembedMessage::EmbeddedNotify {
            self.embed(window);
        }
        let (opcode, detail) = xembed_opcode(message);
        let data1 = match message {
            XembedMessage::EmbeddedNotify => self.tray as c_long,
            _ => 0,
        };
        self.send_message(
            window,
            window,
            self.atoms.XEmbed,
            xlib::NoEventMask,
            [xlib::CurrentTime as c_long, opcode, detail, data1, 0],
        );
    }

    // `XReparentWindow`: https://tronche.com/gui/x/xlib/window-and-session-manager/XReparentWindow.html
    // `XAddToSaveSet`: https://tronche.com/gui/x/xlib/window-and-session-manager/XAddToSaveSet.html
    fn embed(&mut self, window: xlib::Window) {
        if self.embedded.contains(&window) {
            return;
        }
        self.subscribe_to_event(
            window,
            xlib::StructureNotifyMask
                | xlib::PropertyChangeMask
                | xlib::EnterWindowMask
                | xlib::FocusChangeMask,
        );
        unsafe {
            (self.xlib.XReparentWindow)(self.display, window, self.tray, 0, 0);
            (self.xlib.XAddToSaveSet)(self.display, window);
        }
        self.embedded.push(window);
    }

    /// Stop tracking an icon that went away.
    pub fn forget_embedded(&mut self, window: xlib::Window) {
        self.embedded.retain(|w| *w != window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_in_carries_the_current_detail() {
        assert_eq!(xembed_opcode(XembedMessage::FocusIn), (4, 0));
        assert_eq!(xembed_opcode(XembedMessage::EmbeddedNotify), (0, 0));
        assert_eq!(xembed_opcode(XembedMessage::WindowDeactivate), (2, 0));
        assert_eq!(xembed_opcode(XembedMessage::FocusOut), (5, 0));
    }

    #[test]
    fn buttons_pack_from_both_edges() {
        assert_eq!(layout_left(0, &[10, 20, 5]), vec![0, 10, 30]);
        assert_eq!(layout_right(100, &[10, 20]), vec![70, 80]);
        assert!(layout_right(100, &[]).is_empty());
    }
}
