use crate::display_event::ConfigureRequest;
use crate::models::{Chord, DragKind, TagMask, ViewId, WidgetId, WindowHandle, Xyhw};

/// Owner of a panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelItem {
    View(ViewId),
    Widget(WidgetId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelButton {
    pub window: WindowHandle,
    /// Slot from the left, in list order.
    pub position: usize,
    pub label: String,
    pub active: bool,
}

/// Everything drawn on the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub views: Vec<PanelButton>,
    pub widgets: Vec<PanelButton>,
    pub caption: Option<String>,
    pub trays: Vec<WindowHandle>,
}

/// XEMBED messages sent to tray icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XembedMessage {
    EmbeddedNotify,
    WindowActivate,
    WindowDeactivate,
    FocusIn,
    FocusOut,
}

/// These are responses from the core to the display server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayAction {
    /// Grab the chords on a window, the root when `None`.
    GrabInputs {
        window: Option<WindowHandle>,
        chords: Vec<Chord>,
    },
    UngrabInputs(Option<WindowHandle>),
    ConfigureWindow(WindowHandle, Xyhw),
    /// Forward an unmanaged or floating window's own request.
    PassConfigure(ConfigureRequest),
    /// Map the shown and unmap the hidden windows after a recompute.
    SetVisibility {
        shown: Vec<WindowHandle>,
        hidden: Vec<WindowHandle>,
    },
    Raise(WindowHandle),
    Lower(WindowHandle),
    /// Give input focus to a window, the root when `None`.
    Focus(Option<WindowHandle>),
    WarpPointer(WindowHandle),
    SetWmState(WindowHandle, WmStateValue),
    /// Ask the window to close, killing its client if it ignores us.
    KillWindow(WindowHandle),
    InstallColormap(u64),
    PublishClients {
        clients: Vec<WindowHandle>,
        stacking: Vec<WindowHandle>,
    },
    PublishActive(Option<WindowHandle>),
    PublishViews {
        names: Vec<String>,
        current: usize,
    },
    PublishTags(Vec<String>),
    PublishWindowTags(WindowHandle, TagMask),
    PublishWorkarea(Xyhw),
    Xembed(WindowHandle, XembedMessage),
    AcquireTraySelection,
    RenderPanel(Panel),
    CreatePanelButton(PanelItem),
    DestroyPanelButton(WindowHandle),
    StartDrag(WindowHandle, DragKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmStateValue {
    Withdrawn,
    Normal,
    Iconic,
}
