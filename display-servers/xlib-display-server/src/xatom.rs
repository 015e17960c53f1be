use std::ffi::CString;
use x11_dl::xlib;

// Specifications can be found here:
// https://specifications.freedesktop.org/wm-spec/1.3/ar01s03.html
// https://specifications.freedesktop.org/systemtray-spec/systemtray-spec-0.2.html

#[derive(Clone, Debug)]
#[allow(non_snake_case)]
pub struct XAtom {
    pub WMProtocols: xlib::Atom,
    pub WMDelete: xlib::Atom,
    pub WMState: xlib::Atom,
    pub WMTakeFocus: xlib::Atom,
    pub NetActiveWindow: xlib::Atom,
    pub NetSupported: xlib::Atom,
    pub NetWMName: xlib::Atom,
    pub NetWMPid: xlib::Atom,

    pub NetWMState: xlib::Atom,
    pub NetWMStateModal: xlib::Atom,
    pub NetWMStateHidden: xlib::Atom,
    pub NetWMStateFullscreen: xlib::Atom,
    pub NetWMStateAbove: xlib::Atom,
    pub NetWMStateSticky: xlib::Atom,

    pub NetSupportingWmCheck: xlib::Atom,
    pub NetClientList: xlib::Atom,
    pub NetClientListStacking: xlib::Atom,
    pub NetDesktopViewport: xlib::Atom,
    pub NetDesktopGeometry: xlib::Atom,
    pub NetShowingDesktop: xlib::Atom,
    pub NetWorkarea: xlib::Atom,
    pub NetNumberOfDesktops: xlib::Atom,
    pub NetCurrentDesktop: xlib::Atom,
    pub NetDesktopNames: xlib::Atom,
    pub NetRestackWindow: xlib::Atom,
    pub NetCloseWindow: xlib::Atom,
    pub NetMoveResizeWindow: xlib::Atom,
    pub NetWMStrutPartial: xlib::Atom, //net version - Reserve Screen Space
    pub NetWMStrut: xlib::Atom,        //old version

    pub NetSystemTrayOpcode: xlib::Atom,
    /// `_NET_SYSTEM_TRAY_S<screen>`
    pub NetSystemTraySelection: xlib::Atom,
    pub Manager: xlib::Atom,
    pub XEmbed: xlib::Atom,
    pub XEmbedInfo: xlib::Atom,

    pub SubtleWindowTag: xlib::Atom,
    pub SubtleWindowUntag: xlib::Atom,
    pub SubtleWindowTags: xlib::Atom,
    pub SubtleWindowGravity: xlib::Atom,
    pub SubtleWindowScreen: xlib::Atom,
    pub SubtleWindowFlags: xlib::Atom,
    pub SubtleTagNew: xlib::Atom,
    pub SubtleTagKill: xlib::Atom,
    pub SubtleTagList: xlib::Atom,
    pub SubtleViewNew: xlib::Atom,
    pub SubtleViewKill: xlib::Atom,
    pub SubtleSubletNew: xlib::Atom,
    pub SubtleSubletData: xlib::Atom,
    pub SubtleSubletUpdate: xlib::Atom,
    pub SubtleSubletKill: xlib::Atom,
    pub SubtleReload: xlib::Atom,
    pub SubtleQuit: xlib::Atom,

    pub UTF8String: xlib::Atom,
}

impl XAtom {
    pub fn net_supported(&self) -> Vec<xlib::Atom> {
        vec![
            self.NetActiveWindow,
            self.NetSupported,
            self.NetWMName,
            self.NetWMPid,
            self.NetWMState,
            self.NetWMStateModal,
            self.NetWMStateHidden,
            self.NetWMStateFullscreen,
            self.NetWMStateAbove,
            self.NetWMStateSticky,
            self.NetSupportingWmCheck,
            self.NetClientList,
            self.NetClientListStacking,
            self.NetDesktopViewport,
            self.NetDesktopGeometry,
            self.NetShowingDesktop,
            self.NetWorkarea,
            self.NetNumberOfDesktops,
            self.NetCurrentDesktop,
            self.NetDesktopNames,
            self.NetRestackWindow,
            self.NetCloseWindow,
            self.NetMoveResizeWindow,
            self.NetWMStrutPartial,
            self.NetWMStrut,
        ]
    }

    pub fn get_name(&self, atom: xlib::Atom) -> &str {
        match atom {
            a if a == self.WMProtocols => "WM_PROTOCOLS",
            a if a == self.WMDelete => "WM_DELETE_WINDOW",
            a if a == self.WMState => "WM_STATE",
            a if a == self.WMTakeFocus => "WM_TAKE_FOCUS",
            a if a == self.NetActiveWindow => "_NET_ACTIVE_WINDOW",
            a if a == self.NetSupported => "_NET_SUPPORTED",
            a if a == self.NetWMName => "_NET_WM_NAME",
            a if a == self.NetWMPid => "_NET_WM_PID",

            a if a == self.NetWMState => "_NET_WM_STATE",
            a if a == self.NetWMStateModal => "_NET_WM_STATE_MODAL",
            a if a == self.NetWMStateHidden => "_NET_WM_STATE_HIDDEN",
            a if a == self.NetWMStateFullscreen => "_NET_WM_STATE_FULLSCREEN",
            a if a == self.NetWMStateAbove => "_NET_WM_STATE_ABOVE",
            a if a == self.NetWMStateSticky => "_NET_WM_STATE_STICKY",

            a if a == self.NetSupportingWmCheck => "_NET_SUPPORTING_WM_CHECK",
            a if a == self.NetClientList => "_NET_CLIENT_LIST",
            a if a == self.NetClientListStacking => "_NET_CLIENT_LIST_STACKING",
            a if a == self.NetDesktopViewport => "_NET_DESKTOP_VIEWPORT",
            a if a == self.NetDesktopGeometry => "_NET_DESKTOP_GEOMETRY",
            a if a == self.NetShowingDesktop => "_NET_SHOWING_DESKTOP",
            a if a == self.NetWorkarea => "_NET_WORKAREA",
            a if a == self.NetNumberOfDesktops => "_NET_NUMBER_OF_DESKTOPS",
            a if a == self.NetCurrentDesktop => "_NET_CURRENT_DESKTOP",
            a if a == self.NetDesktopNames => "_NET_DESKTOP_NAMES",
            a if a == self.NetRestackWindow => "_NET_RESTACK_WINDOW",
            a if a == self.NetCloseWindow => "_NET_CLOSE_WINDOW",
            a if a == self.NetMoveResizeWindow => "_NET_MOVERESIZE_WINDOW",
            a if a == self.NetWMStrutPartial => "_NET_WM_STRUT_PARTIAL",
            a if a == self.NetWMStrut => "_NET_WM_STRUT",

            a if a == self.NetSystemTrayOpcode => "_NET_SYSTEM_TRAY_OPCODE",
            a if a == self.NetSystemTraySelection => "_NET_SYSTEM_TRAY_S",
            a if a == self.Manager => "MANAGER",
            a if a == self.XEmbed => "_XEMBED",
            a if a == self.XEmbedInfo => "_XEMBED_INFO",

            a if a == self.SubtleWindowTag => "SUBTLE_WINDOW_TAG",
            a if a == self.SubtleWindowUntag => "SUBTLE_WINDOW_UNTAG",
            a if a == self.SubtleWindowTags => "SUBTLE_WINDOW_TAGS",
            a if a == self.SubtleWindowGravity => "SUBTLE_WINDOW_GRAVITY",
            a if a == self.SubtleWindowScreen => "SUBTLE_WINDOW_SCREEN",
            a if a == self.SubtleWindowFlags => "SUBTLE_WINDOW_FLAGS",
            a if a == self.SubtleTagNew => "SUBTLE_TAG_NEW",
            a if a == self.SubtleTagKill => "SUBTLE_TAG_KILL",
            a if a == self.SubtleTagList => "SUBTLE_TAG_LIST",
            a if a == self.SubtleViewNew => "SUBTLE_VIEW_NEW",
            a if a == self.SubtleViewKill => "SUBTLE_VIEW_KILL",
            a if a == self.SubtleSubletNew => "SUBTLE_SUBLET_NEW",
            a if a == self.SubtleSubletData => "SUBTLE_SUBLET_DATA",
            a if a == self.SubtleSubletUpdate => "SUBTLE_SUBLET_UPDATE",
            a if a == self.SubtleSubletKill => "SUBTLE_SUBLET_KILL",
            a if a == self.SubtleReload => "SUBTLE_RELOAD",
            a if a == self.SubtleQuit => "SUBTLE_QUIT",

            a if a == self.UTF8String => "UTF8_STRING",
            _ => "(UNKNOWN)",
        }
    }

    pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display, screen: i32) -> Self {
        Self {
            WMProtocols: from(xlib, dpy, "WM_PROTOCOLS"),
            WMDelete: from(xlib, dpy, "WM_DELETE_WINDOW"),
            WMState: from(xlib, dpy, "WM_STATE"),
            WMTakeFocus: from(xlib, dpy, "WM_TAKE_FOCUS"),
            NetActiveWindow: from(xlib, dpy, "_NET_ACTIVE_WINDOW"),
            NetSupported: from(xlib, dpy, "_NET_SUPPORTED"),
            NetWMName: from(xlib, dpy, "_NET_WM_NAME"),
            NetWMPid: from(xlib, dpy, "_NET_WM_PID"),

            NetWMState: from(xlib, dpy, "_NET_WM_STATE"),
            NetWMStateModal: from(xlib, dpy, "_NET_WM_STATE_MODAL"),
            NetWMStateHidden: from(xlib, dpy, "_NET_WM_STATE_HIDDEN"),
            NetWMStateFullscreen: from(xlib, dpy, "_NET_WM_STATE_FULLSCREEN"),
            NetWMStateAbove: from(xlib, dpy, "_NET_WM_STATE_ABOVE"),
            NetWMStateSticky: from(xlib, dpy, "_NET_WM_STATE_STICKY"),

            NetSupportingWmCheck: from(xlib, dpy, "_NET_SUPPORTING_WM_CHECK"),
            NetClientList: from(xlib, dpy, "_NET_CLIENT_LIST"),
            NetClientListStacking: from(xlib, dpy, "_NET_CLIENT_LIST_STACKING"),
            NetDesktopViewport: from(xlib, dpy, "_NET_DESKTOP_VIEWPORT"),
            NetDesktopGeometry: from(xlib, dpy, "_NET_DESKTOP_GEOMETRY"),
            NetShowingDesktop: from(xlib, dpy, "_NET_SHOWING_DESKTOP"),
            NetWorkarea: from(xlib, dpy, "_NET_WORKAREA"),
            NetNumberOfDesktops: from(xlib, dpy, "_NET_NUMBER_OF_DESKTOPS"),
            NetCurrentDesktop: from(xlib, dpy, "_NET_CURRENT_DESKTOP"),
            NetDesktopNames: from(xlib, dpy, "_NET_DESKTOP_NAMES"),
            NetRestackWindow: from(xlib, dpy, "_NET_RESTACK_WINDOW"),
            NetCloseWindow: from(xlib, dpy, "_NET_CLOSE_WINDOW"),
            NetMoveResizeWindow: from(xlib, dpy, "_NET_MOVERESIZE_WINDOW"),
            NetWMStrutPartial: from(xlib, dpy, "_NET_WM_STRUT_PARTIAL"),
            NetWMStrut: from(xlib, dpy, "_NET_WM_STRUT"),

            NetSystemTrayOpcode: from(xlib, dpy, "_NET_SYSTEM_TRAY_OPCODE"),
            NetSystemTraySelection: from(xlib, dpy, &format!("_NET_SYSTEM_TRAY_S{screen}")),
            Manager: from(xlib, dpy, "MANAGER"),
            XEmbed: from(xlib, dpy, "_XEMBED"),
            XEmbedInfo: from(xlib, dpy, "_XEMBED_INFO"),

            SubtleWindowTag: from(xlib, dpy, "SUBTLE_WINDOW_TAG"),
            SubtleWindowUntag: from(xlib, dpy, "SUBTLE_WINDOW_UNTAG"),
            SubtleWindowTags: from(xlib, dpy, "SUBTLE_WINDOW_TAGS"),
            SubtleWindowGravity: from(xlib, dpy, "SUBTLE_WINDOW_GRAVITY"),
            SubtleWindowScreen: from(xlib, dpy, "SUBTLE_WINDOW_SCREEN"),
            SubtleWindowFlags: from(xlib, dpy, "SUBTLE_WINDOW_FLAGS"),
            SubtleTagNew: from(xlib, dpy, "SUBTLE_TAG_NEW"),
            SubtleTagKill: from(xlib, dpy, "SUBTLE_TAG_KILL"),
            SubtleTagList: from(xlib, dpy, "SUBTLE_TAG_LIST"),
            SubtleViewNew: from(xlib, dpy, "SUBTLE_VIEW_NEW"),
            SubtleViewKill: from(xlib, dpy, "SUBTLE_VIEW_KILL"),
            SubtleSubletNew: from(xlib, dpy, "SUBTLE_SUBLET_NEW"),
            SubtleSubletData: from(xlib, dpy, "SUBTLE_SUBLET_DATA"),
            SubtleSubletUpdate: from(xlib, dpy, "SUBTLE_SUBLET_UPDATE"),
            SubtleSubletKill: from(xlib, dpy, "SUBTLE_SUBLET_KILL"),
            SubtleReload: from(xlib, dpy, "SUBTLE_RELOAD"),
            SubtleQuit: from(xlib, dpy, "SUBTLE_QUIT"),

            UTF8String: from(xlib, dpy, "UTF8_STRING"),
        }
    }
}

// `XInternAtom`: https://tronche.com/gui/x/xlib/window-information/XInternAtom.html
fn from(xlib: &xlib::Xlib, dpy: *mut xlib::Display, s: &str) -> xlib::Atom {
    let name = CString::new(s).unwrap_or_default();
    unsafe { (xlib.XInternAtom)(dpy, name.as_ptr(), xlib::False) }
}
