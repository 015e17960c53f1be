//! `XWrap` getters.
use super::{XlibError, MAX_PROPERTY_VALUE_LEN};
use crate::XWrap;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_long, c_uchar, c_uint, c_ulong};
use std::slice;
use subtle_core::models::{Screen, SizeHints, Strut, WindowHandle, Xyhw};
use subtle_core::WindowInfo;
use x11_dl::xinerama::XineramaScreenInfo;
use x11_dl::xlib;

impl XWrap {
    // Public functions.

    /// Returns the top level windows on the root.
    /// # Errors
    ///
    /// Will error if the tree can't be queried.
    // `XQueryTree`: https://tronche.com/gui/x/xlib/window-information/XQueryTree.html
    pub fn get_all_windows(&self) -> Result<Vec<xlib::Window>, XlibError> {
        unsafe {
            let mut root_return: xlib::Window = std::mem::zeroed();
            let mut parent_return: xlib::Window = std::mem::zeroed();
            let mut array: *mut xlib::Window = std::mem::zeroed();
            let mut length: c_uint = std::mem::zeroed();
            let status: xlib::Status = (self.xlib.XQueryTree)(
                self.display,
                self.root,
                &mut root_return,
                &mut parent_return,
                &mut array,
                &mut length,
            );
            if status == 0 {
                return Err(XlibError::FailedStatus);
            }
            if array.is_null() {
                return Ok(vec![]);
            }
            let windows = slice::from_raw_parts(array, length as usize).to_vec();
            (self.xlib.XFree)(array.cast());
            Ok(windows)
        }
    }

    /// Returns the current position of the cursor on the root.
    /// # Errors
    ///
    /// Will error if root window cannot be found.
    // `XQueryPointer`: https://tronche.com/gui/x/xlib/window-information/XQueryPointer.html
    pub fn get_cursor_point(&self) -> Result<(i32, i32), XlibError> {
        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let mut root_x_return: c_int = 0;
        let mut root_y_return: c_int = 0;
        let mut win_x_return: c_int = 0;
        let mut win_y_return: c_int = 0;
        let mut mask_return: c_uint = 0;
        let success = unsafe {
            (self.xlib.XQueryPointer)(
                self.display,
                self.root,
                &mut root_return,
                &mut child_return,
                &mut root_x_return,
                &mut root_y_return,
                &mut win_x_return,
                &mut win_y_return,
                &mut mask_return,
            )
        };
        if success > 0 {
            return Ok((root_x_return, root_y_return));
        }
        Err(XlibError::RootWindowNotFound)
    }

    /// Returns the default root.
    #[must_use]
    pub const fn get_default_root(&self) -> xlib::Window {
        self.root
    }

    /// Width and height of the default screen.
    // `XDisplayWidth`: https://tronche.com/gui/x/xlib/display/display-macros.html#DisplayWidth
    #[must_use]
    pub fn get_display_size(&self) -> (i32, i32) {
        unsafe {
            (
                (self.xlib.XDisplayWidth)(self.display, self.screen),
                (self.xlib.XDisplayHeight)(self.display, self.screen),
            )
        }
    }

    /// Returns all the screens of the display, one per Xinerama head.
    // `XineramaIsActive`: https://linux.die.net/man/3/xineramaisactive
    // `XineramaQueryScreens`: https://linux.die.net/man/3/xineramaqueryscreens
    #[must_use]
    pub fn get_screens(&self) -> Vec<Screen> {
        use x11_dl::xinerama::Xlib;

        if let Ok(xinerama) = Xlib::open() {
            let active = unsafe { (xinerama.XineramaIsActive)(self.display) } > 0;
            if active {
                let mut screen_count = 0;
                let info_array_raw =
                    unsafe { (xinerama.XineramaQueryScreens)(self.display, &mut screen_count) };
                if !info_array_raw.is_null() {
                    let infos: &[XineramaScreenInfo] =
                        unsafe { slice::from_raw_parts(info_array_raw, screen_count as usize) };
                    let screens: Vec<Screen> = infos
                        .iter()
                        .map(|i| Screen::new(XineramaScreenInfoIntoXyhw(i).into()))
                        .collect();
                    unsafe { (self.xlib.XFree)(info_array_raw.cast()) };
                    if !screens.is_empty() {
                        return screens;
                    }
                }
            }
        }
        // NON-XINERAMA
        let (width, height) = self.get_display_size();
        vec![Screen::new(Xyhw::new(0, 0, width, height))]
    }

    /// Everything the manager wants to know about a new window, `None` for
    /// windows asking not to be managed.
    #[must_use]
    pub fn get_window_info(&self, window: xlib::Window) -> Option<WindowInfo> {
        let attrs = self.get_window_attrs(window).ok()?;
        if attrs.override_redirect != 0 {
            return None;
        }
        let states = self.get_window_states_atoms(window);
        Some(WindowInfo {
            geometry: Xyhw::new(attrs.x, attrs.y, attrs.width, attrs.height),
            caption: self.get_window_name(window),
            class: self.get_window_class(window).map(|(_, class)| class),
            transient: self.get_transient_for(window).is_some(),
            size_hints: self.get_size_hints(window),
            fullscreen: states.contains(&self.atoms.NetWMStateFullscreen),
        })
    }

    /// Returns the `WM_NORMAL_HINTS` of a window as `SizeHints`.
    #[must_use]
    pub fn get_size_hints(&self, window: xlib::Window) -> SizeHints {
        let Some(size) = self.get_hint_sizing(window) else {
            return SizeHints::default();
        };
        let mut hints = SizeHints::default();
        if (size.flags & xlib::PMinSize) != 0 {
            hints.min = Some((size.min_width, size.min_height));
        } else if (size.flags & xlib::PBaseSize) != 0 {
            hints.min = Some((size.base_width, size.base_height));
        }
        if (size.flags & xlib::PMaxSize) != 0 {
            hints.max = Some((size.max_width, size.max_height));
        }
        if (size.flags & xlib::PResizeInc) != 0 {
            hints.increment = Some((size.width_inc, size.height_inc));
        }
        hints
    }

    /// Returns the transient parent of a window.
    // `XGetTransientForHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTransientForHint.html
    #[must_use]
    pub fn get_transient_for(&self, window: xlib::Window) -> Option<xlib::Window> {
        unsafe {
            let mut transient: xlib::Window = std::mem::zeroed();
            let status: c_int =
                (self.xlib.XGetTransientForHint)(self.display, window, &mut transient);
            if status > 0 {
                Some(transient)
            } else {
                None
            }
        }
    }

    /// Returns the attributes of a window.
    /// # Errors
    ///
    /// Will error if window status is 0 (no attributes).
    // `XGetWindowAttributes`: https://tronche.com/gui/x/xlib/window-information/XGetWindowAttributes.html
    pub fn get_window_attrs(
        &self,
        window: xlib::Window,
    ) -> Result<xlib::XWindowAttributes, XlibError> {
        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let status = unsafe { (self.xlib.XGetWindowAttributes)(self.display, window, &mut attrs) };
        if status == 0 {
            return Err(XlibError::FailedStatus);
        }
        Ok(attrs)
    }

    /// Returns a windows class `WM_CLASS`
    // `XGetClassHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetClassHint.html
    #[must_use]
    pub fn get_window_class(&self, window: xlib::Window) -> Option<(String, String)> {
        unsafe {
            let mut class_return: xlib::XClassHint = std::mem::zeroed();
            let status = (self.xlib.XGetClassHint)(self.display, window, &mut class_return);
            if status == 0 {
                return None;
            }
            let res_name = self.take_xstring(class_return.res_name);
            let res_class = self.take_xstring(class_return.res_class);
            Some((res_name?, res_class?))
        }
    }

    /// Returns the geometry of a window.
    /// # Errors
    ///
    /// Errors if Xlib returns a status of 0.
    // `XGetGeometry`: https://tronche.com/gui/x/xlib/window-information/XGetGeometry.html
    pub fn get_window_geometry(&self, window: xlib::Window) -> Result<Xyhw, XlibError> {
        let mut root_return: xlib::Window = 0;
        let mut x_return: c_int = 0;
        let mut y_return: c_int = 0;
        let mut width_return: c_uint = 0;
        let mut height_return: c_uint = 0;
        let mut border_width_return: c_uint = 0;
        let mut depth_return: c_uint = 0;
        unsafe {
            let status = (self.xlib.XGetGeometry)(
                self.display,
                window,
                &mut root_return,
                &mut x_return,
                &mut y_return,
                &mut width_return,
                &mut height_return,
                &mut border_width_return,
                &mut depth_return,
            );
            if status == 0 {
                return Err(XlibError::FailedStatus);
            }
        }
        Ok(Xyhw::new(
            x_return,
            y_return,
            width_return as i32,
            height_return as i32,
        ))
    }

    /// Returns a windows name.
    #[must_use]
    pub fn get_window_name(&self, window: xlib::Window) -> Option<String> {
        if let Ok(text) = self.get_text_prop(window, self.atoms.NetWMName) {
            return Some(text);
        }
        if let Ok(text) = self.get_text_prop(window, xlib::XA_WM_NAME) {
            return Some(text);
        }
        None
    }

    /// Returns the atom states of a window.
    #[must_use]
    pub fn get_window_states_atoms(&self, window: xlib::Window) -> Vec<xlib::Atom> {
        let Ok((prop_return, nitems_return)) =
            self.get_property(window, self.atoms.NetWMState, xlib::XA_ATOM)
        else {
            return vec![];
        };
        unsafe {
            #[allow(clippy::cast_ptr_alignment)]
            let ptr = prop_return.cast::<c_ulong>();
            let results = slice::from_raw_parts(ptr, nitems_return as usize).to_vec();
            (self.xlib.XFree)(prop_return as *mut _);
            results
        }
    }

    /// Returns the space a window reserves at the screen edges, preferring
    /// `_NET_WM_STRUT_PARTIAL` over `_NET_WM_STRUT`.
    #[must_use]
    pub fn get_window_strut(&self, window: xlib::Window) -> Option<Strut> {
        let strut = self
            .get_cardinals(window, self.atoms.NetWMStrutPartial)
            .filter(|values| values.len() == 12)
            .or_else(|| {
                self.get_cardinals(window, self.atoms.NetWMStrut)
                    .filter(|values| values.len() == 4)
            })
            .map(|values| SliceIntoStrut(&values).into());
        tracing::trace!("STRUT:[{:?}] {:?}", window, strut);
        strut
    }

    /// Returns the `XEMBED_MAPPED` flag of a tray icon.
    #[must_use]
    pub fn get_xembed_mapped(&self, window: xlib::Window) -> Option<bool> {
        const XEMBED_MAPPED: c_long = 1 << 0;
        let info = self.get_cardinals(window, self.atoms.XEmbedInfo)?;
        let flags = info.get(1)?;
        Some(flags & XEMBED_MAPPED != 0)
    }

    /// Returns the `WM_STATE` of a window.
    #[must_use]
    pub fn get_wm_state(&self, window: xlib::Window) -> Option<c_long> {
        let (prop_return, nitems_return) = self
            .get_property(window, self.atoms.WMState, self.atoms.WMState)
            .ok()?;
        let state = unsafe {
            #[allow(clippy::cast_ptr_alignment)]
            let state = (nitems_return > 0).then(|| *prop_return.cast::<c_long>());
            (self.xlib.XFree)(prop_return as *mut _);
            state
        };
        state
    }

    /// Returns the `WM_HINTS` of a window.
    // `XGetWMHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMHints.html
    #[must_use]
    pub fn get_wmhints(&self, window: xlib::Window) -> Option<xlib::XWMHints> {
        unsafe {
            let hints_ptr: *mut xlib::XWMHints = (self.xlib.XGetWMHints)(self.display, window);
            if hints_ptr.is_null() {
                return None;
            }
            let hints: xlib::XWMHints = *hints_ptr;
            (self.xlib.XFree)(hints_ptr.cast());
            Some(hints)
        }
    }

    /// Returns the name of a `XAtom`.
    /// # Errors
    ///
    /// Errors if `XAtom` is not valid.
    // `XGetAtomName`: https://tronche.com/gui/x/xlib/window-information/XGetAtomName.html
    pub fn get_xatom_name(&self, atom: xlib::Atom) -> Result<String, XlibError> {
        let name = unsafe { (self.xlib.XGetAtomName)(self.display, atom) };
        self.take_xstring(name).ok_or(XlibError::InvalidXAtom)
    }

    /// Resolve a key name to its keysym, `None` for unknown names.
    // `XStringToKeysym`: https://tronche.com/gui/x/xlib/utilities/keyboard/XStringToKeysym.html
    #[must_use]
    pub fn get_keysym(&self, name: &str) -> Option<u32> {
        let name = std::ffi::CString::new(name).ok()?;
        let keysym = unsafe { (self.xlib.XStringToKeysym)(name.as_ptr()) };
        match keysym {
            0 => None,
            sym => u32::try_from(sym).ok(),
        }
    }

    // Internal functions.

    /// Returns the `WM_SIZE_HINTS`/`WM_NORMAL_HINTS` of a window.
    // `XGetWMNormalHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMNormalHints.html
    fn get_hint_sizing(&self, window: xlib::Window) -> Option<xlib::XSizeHints> {
        let mut xsize: xlib::XSizeHints = unsafe { std::mem::zeroed() };
        let mut msize: c_long = xlib::PSize;
        let status =
            unsafe { (self.xlib.XGetWMNormalHints)(self.display, window, &mut xsize, &mut msize) };
        match status {
            0 => None,
            _ => Some(xsize),
        }
    }

    /// Returns a cardinal list property of a window.
    fn get_cardinals(&self, window: xlib::Window, property: xlib::Atom) -> Option<Vec<c_long>> {
        let (prop_return, nitems_return) = self
            .get_property(window, property, xlib::XA_CARDINAL)
            .ok()?;
        unsafe {
            #[allow(clippy::cast_ptr_alignment)]
            let array_ptr = prop_return.cast::<c_long>();
            let values = slice::from_raw_parts(array_ptr, nitems_return as usize).to_vec();
            (self.xlib.XFree)(prop_return as *mut _);
            Some(values)
        }
    }

    /// Returns a property of a window. The caller frees the data.
    /// # Errors
    ///
    /// Errors if window status = 0.
    // `XGetWindowProperty`: https://tronche.com/gui/x/xlib/window-information/XGetWindowProperty.html
    fn get_property(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
    ) -> Result<(*const c_uchar, c_ulong), XlibError> {
        let mut format_return: i32 = 0;
        let mut nitems_return: c_ulong = 0;
        let mut type_return: xlib::Atom = 0;
        let mut bytes_after_return: c_ulong = 0;
        let mut prop_return: *mut c_uchar = unsafe { std::mem::zeroed() };
        unsafe {
            let status = (self.xlib.XGetWindowProperty)(
                self.display,
                window,
                property,
                0,
                MAX_PROPERTY_VALUE_LEN / 4,
                xlib::False,
                r#type,
                &mut type_return,
                &mut format_return,
                &mut nitems_return,
                &mut bytes_after_return,
                &mut prop_return,
            );
            if status == i32::from(xlib::Success) && !prop_return.is_null() {
                return Ok((prop_return, nitems_return));
            }
        };
        Err(XlibError::FailedStatus)
    }

    /// Returns a text property for a window.
    /// # Errors
    ///
    /// Errors if window status = 0.
    // `XGetTextProperty`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTextProperty.html
    fn get_text_prop(&self, window: xlib::Window, atom: xlib::Atom) -> Result<String, XlibError> {
        unsafe {
            let mut text_prop: xlib::XTextProperty = std::mem::zeroed();
            let status: c_int =
                (self.xlib.XGetTextProperty)(self.display, window, &mut text_prop, atom);
            if status == 0 || text_prop.nitems == 0 {
                return Err(XlibError::FailedStatus);
            }
            self.take_xstring(text_prop.value.cast::<c_char>())
                .ok_or(XlibError::FailedStatus)
        }
    }

    /// Copy a string allocated by Xlib and free it.
    fn take_xstring(&self, raw: *mut c_char) -> Option<String> {
        if raw.is_null() {
            return None;
        }
        unsafe {
            let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
            (self.xlib.XFree)(raw.cast());
            Some(text)
        }
    }
}

impl XWrap {
    /// Handle of an X window.
    #[must_use]
    pub const fn handle(window: xlib::Window) -> WindowHandle {
        WindowHandle(window as u64)
    }
}

struct XineramaScreenInfoIntoXyhw<'a>(&'a XineramaScreenInfo);

impl From<XineramaScreenInfoIntoXyhw<'_>> for Xyhw {
    fn from(info: XineramaScreenInfoIntoXyhw<'_>) -> Self {
        Self {
            x: info.0.x_org.into(),
            y: info.0.y_org.into(),
            w: info.0.width.into(),
            h: info.0.height.into(),
        }
    }
}

struct SliceIntoStrut<'a>(&'a [c_long]);

impl From<SliceIntoStrut<'_>> for Strut {
    fn from(values: SliceIntoStrut<'_>) -> Self {
        Self {
            left: values.0[0] as i32,
            right: values.0[1] as i32,
            top: values.0[2] as i32,
            bottom: values.0[3] as i32,
        }
    }
}
