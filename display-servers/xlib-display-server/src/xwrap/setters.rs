//! `XWrap` setters.
use crate::XWrap;
use std::ffi::CString;
use std::os::raw::{c_char, c_long, c_ulong};
use subtle_core::models::{TagMask, Xyhw};
use x11_dl::xlib;

impl XWrap {
    // Public functions.

    /// Replaces a window property.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn replace_property_long(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
        data: &[c_long],
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                r#type,
                32,
                xlib::PropModeReplace,
                data.as_ptr().cast::<u8>(),
                data.len() as i32,
            );
        }
    }

    /// Sets a desktop property.
    // We allow the lossless cast here so that 32 bit systems may work.
    #[allow(clippy::cast_lossless)]
    pub fn set_desktop_prop(&self, data: &[u32], atom: c_ulong) {
        let x_data: Vec<c_long> = data.iter().map(|x| *x as c_long).collect();
        self.replace_property_long(self.root, atom, xlib::XA_CARDINAL, &x_data);
    }

    /// Sets a desktop property with type `c_ulong`.
    pub fn set_desktop_prop_c_ulong(&self, value: c_ulong, atom: c_ulong, r#type: c_ulong) {
        let data = vec![value as c_long];
        self.replace_property_long(self.root, atom, r#type, &data);
    }

    /// Sets a window property with type string.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn set_window_prop_string(
        &self,
        window: xlib::Window,
        value: &str,
        atom: c_ulong,
        encoding: xlib::Atom,
    ) {
        if let Ok(cstring) = CString::new(value) {
            unsafe {
                (self.xlib.XChangeProperty)(
                    self.display,
                    window,
                    atom,
                    encoding,
                    8,
                    xlib::PropModeReplace,
                    cstring.as_ptr().cast::<u8>(),
                    value.len() as i32,
                );
            }
        }
    }

    /// Sets a list of strings as one UTF-8 text property.
    // `Xutf8TextListToTextProperty`: https://linux.die.net/man/3/xutf8textlisttotextproperty
    // `XSetTextProperty`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XSetTextProperty.html
    pub fn set_text_list(&self, window: xlib::Window, atom: xlib::Atom, names: &[String]) {
        let cstrings: Vec<CString> = names
            .iter()
            .filter_map(|name| CString::new(name.as_str()).ok())
            .collect();
        let mut ptrs: Vec<*mut c_char> = cstrings.iter().map(|c| c.as_ptr().cast_mut()).collect();
        unsafe {
            let mut text: xlib::XTextProperty = std::mem::zeroed();
            let status = (self.xlib.Xutf8TextListToTextProperty)(
                self.display,
                ptrs.as_mut_ptr(),
                ptrs.len() as i32,
                xlib::XUTF8StringStyle,
                &mut text,
            );
            if status != i32::from(xlib::Success) {
                tracing::warn!("Can't convert names of {}", self.atoms.get_name(atom));
                return;
            }
            (self.xlib.XSetTextProperty)(self.display, window, &mut text, atom);
            if !text.value.is_null() {
                (self.xlib.XFree)(text.value.cast());
            }
        }
    }

    /// Sets the `WM_STATE` of a window.
    pub fn set_wm_state(&self, window: xlib::Window, state: c_long) {
        self.replace_property_long(
            window,
            self.atoms.WMState,
            self.atoms.WMState,
            &[state, 0],
        );
    }

    /// Sets a windows configuration.
    // `XConfigureWindow`: https://tronche.com/gui/x/xlib/window/XConfigureWindow.html
    pub fn set_window_config(
        &self,
        window: xlib::Window,
        mut window_changes: xlib::XWindowChanges,
        unlock: u32,
    ) {
        unsafe { (self.xlib.XConfigureWindow)(self.display, window, unlock, &mut window_changes) };
    }

    // EWMH publishing.

    pub fn publish_clients(&self, clients: &[xlib::Window], stacking: &[xlib::Window]) {
        let clients: Vec<c_long> = clients.iter().map(|w| *w as c_long).collect();
        let stacking: Vec<c_long> = stacking.iter().map(|w| *w as c_long).collect();
        self.replace_property_long(self.root, self.atoms.NetClientList, xlib::XA_WINDOW, &clients);
        self.replace_property_long(
            self.root,
            self.atoms.NetClientListStacking,
            xlib::XA_WINDOW,
            &stacking,
        );
    }

    pub fn publish_active(&self, window: Option<xlib::Window>) {
        self.set_desktop_prop_c_ulong(
            window.unwrap_or(0),
            self.atoms.NetActiveWindow,
            xlib::XA_WINDOW,
        );
    }

    /// View names, their count and the current one.
    pub fn publish_views(&self, names: &[String], current: usize) {
        self.set_text_list(self.root, self.atoms.NetDesktopNames, names);
        self.set_desktop_prop(&[names.len() as u32], self.atoms.NetNumberOfDesktops);
        self.set_desktop_prop(&[current as u32], self.atoms.NetCurrentDesktop);
    }

    pub fn publish_tags(&self, names: &[String]) {
        self.set_text_list(self.root, self.atoms.SubtleTagList, names);
    }

    pub fn publish_window_tags(&self, window: xlib::Window, tags: TagMask) {
        self.replace_property_long(
            window,
            self.atoms.SubtleWindowTags,
            xlib::XA_CARDINAL,
            &[tags.bits() as c_long],
        );
    }

    pub fn publish_workarea(&self, area: Xyhw) {
        self.set_desktop_prop(
            &[area.x as u32, area.y as u32, area.w as u32, area.h as u32],
            self.atoms.NetWorkarea,
        );
    }
}
