use crate::display_action::PanelItem;
use crate::models::{Chord, DragKind, SizeHints, StackDirection, Strut, WindowHandle, Xyhw};

/// Everything the core needs to know about a window it may manage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowInfo {
    pub geometry: Xyhw,
    pub caption: Option<String>,
    pub class: Option<String>,
    pub transient: bool,
    pub size_hints: SizeHints,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: WindowHandle,
    pub geometry: Xyhw,
    pub border_width: i32,
    pub sibling: Option<WindowHandle>,
    pub stack_mode: i32,
    /// `CWX | CWY | ...` bits the client asked for.
    pub value_mask: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Normal,
    Grab,
    Ungrab,
    WhileGrabbed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDetail {
    Ancestor,
    Virtual,
    Inferior,
    Nonlinear,
    NonlinearVirtual,
    Pointer,
    PointerRoot,
    DetailNone,
}

/// A focus-in or focus-out notification. `window` is `None` for the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub window: Option<WindowHandle>,
    pub mode: FocusMode,
    pub detail: FocusDetail,
}

impl FocusChange {
    /// Drop the focus churn caused by grabs: only normal changes not coming
    /// from an inferior, or changes while grabbed between ancestors or
    /// unrelated windows, count.
    #[must_use]
    pub fn is_relevant(&self) -> bool {
        (self.mode == FocusMode::Normal && self.detail != FocusDetail::Inferior)
            || (self.mode == FocusMode::WhileGrabbed
                && matches!(self.detail, FocusDetail::Nonlinear | FocusDetail::Ancestor))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingTarget {
    Root,
    Window(WindowHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    Fullscreen,
    Above,
    Sticky,
}

/// Commands sent to the root window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootMessage {
    CurrentView(i64),
    ActiveWindow(WindowHandle),
    Restack {
        window: WindowHandle,
        detail: Option<StackDirection>,
    },
    /// `target` 0 addresses a client, 1 a view; `index` is its list position.
    WindowTag {
        index: i64,
        tag: i64,
        target: i64,
    },
    WindowUntag {
        index: i64,
        tag: i64,
        target: i64,
    },
    WindowGravity {
        index: i64,
        gravity: i64,
    },
    WindowScreen {
        index: i64,
        screen: i64,
    },
    WindowFlags {
        index: i64,
        flags: i64,
    },
    TagNew(String),
    TagKill(i64),
    ViewNew(String),
    ViewKill(i64),
    WidgetNew(String),
    WidgetData {
        widget: i64,
        data: String,
    },
    WidgetUpdate(i64),
    WidgetKill(i64),
    Reload,
    Quit,
}

/// `_NET_SYSTEM_TRAY_OPCODE` requests sent to the tray selection owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMessage {
    Opcode { opcode: i64, window: WindowHandle },
}

/// Requests a client sends about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    /// `_NET_WM_STATE`: `action` 0 removes, 1 adds, 2 toggles.
    State {
        action: i64,
        states: [Option<WmState>; 2],
    },
    Close,
    MoveResize(Xyhw),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    Root(RootMessage),
    Tray(TrayMessage),
    Window(WindowHandle, WindowMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    Name(Option<String>),
    NormalHints(SizeHints),
    Strut(Option<Strut>),
    /// `XEMBED_MAPPED` flag of `_XEMBED_INFO`.
    XembedInfo { mapped: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    ConfigureRequest(ConfigureRequest),
    MapRequest(WindowHandle, WindowInfo),
    /// A window found mapped while scanning on startup.
    Adopt(WindowHandle, WindowInfo),
    MapNotify {
        window: WindowHandle,
        event: WindowHandle,
        synthetic: bool,
    },
    UnmapNotify {
        window: WindowHandle,
        synthetic: bool,
    },
    DestroyNotify(WindowHandle),
    ClientMessage(MessageTarget),
    ColormapNotify {
        window: WindowHandle,
        colormap: u64,
        new: bool,
    },
    PropertyNotify(WindowHandle, PropertyChange),
    EnterNotify(CrossingTarget),
    /// The tray selection was taken by someone else.
    SelectionClear(WindowHandle),
    Expose {
        count: i32,
    },
    ButtonPress {
        window: WindowHandle,
        chord: Chord,
    },
    KeyPress {
        window: WindowHandle,
        chord: Chord,
    },
    FocusIn(FocusChange),
    FocusOut(FocusChange),
    /// Pointer offset since a drag started.
    Drag {
        window: WindowHandle,
        kind: DragKind,
        dx: i32,
        dy: i32,
    },
    DragEnd,
    PanelButtonCreated(PanelItem, WindowHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(mode: FocusMode, detail: FocusDetail) -> FocusChange {
        FocusChange {
            window: None,
            mode,
            detail,
        }
    }

    #[test]
    fn grab_focus_churn_is_filtered() {
        assert!(change(FocusMode::Normal, FocusDetail::Nonlinear).is_relevant());
        assert!(!change(FocusMode::Normal, FocusDetail::Inferior).is_relevant());
        assert!(change(FocusMode::WhileGrabbed, FocusDetail::Ancestor).is_relevant());
        assert!(change(FocusMode::WhileGrabbed, FocusDetail::Nonlinear).is_relevant());
        assert!(!change(FocusMode::WhileGrabbed, FocusDetail::Virtual).is_relevant());
        assert!(!change(FocusMode::Grab, FocusDetail::Nonlinear).is_relevant());
        assert!(!change(FocusMode::Ungrab, FocusDetail::Ancestor).is_relevant());
    }
}
