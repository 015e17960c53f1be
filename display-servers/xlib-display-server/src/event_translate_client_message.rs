use super::XWrap;
use std::os::raw::c_long;
use subtle_core::models::{StackDirection, WindowHandle, Xyhw};
use subtle_core::{
    DisplayEvent, MessageTarget, RootMessage, TrayMessage, WindowMessage, WmState,
};
use x11_dl::xlib;

pub fn from_event(xw: &XWrap, event: &xlib::XClientMessageEvent) -> Option<DisplayEvent> {
    if event.format != 32 {
        return None;
    }
    let atom_name = xw.atoms.get_name(event.message_type);
    tracing::trace!("ClientMessage: {} : {:?}", event.window, atom_name);

    let target = if event.window == xw.get_default_root() {
        MessageTarget::Root(root_message(xw, event)?)
    } else if event.window == xw.tray {
        MessageTarget::Tray(tray_message(xw, event)?)
    } else if event.message_type == xw.atoms.NetActiveWindow {
        // Pagers may address the window itself.
        MessageTarget::Root(RootMessage::ActiveWindow(XWrap::handle(event.window)))
    } else {
        let message = window_message(xw, event)?;
        MessageTarget::Window(XWrap::handle(event.window), message)
    };
    Some(DisplayEvent::ClientMessage(target))
}

fn root_message(xw: &XWrap, event: &xlib::XClientMessageEvent) -> Option<RootMessage> {
    let atoms = &xw.atoms;
    let kind = event.message_type;
    let l = |i: usize| i64::from(event.data.get_long(i));

    let message = if kind == atoms.NetCurrentDesktop {
        RootMessage::CurrentView(l(0))
    } else if kind == atoms.NetActiveWindow {
        RootMessage::ActiveWindow(WindowHandle(l(0) as u64))
    } else if kind == atoms.NetRestackWindow {
        RootMessage::Restack {
            window: WindowHandle(l(1) as u64),
            detail: stack_direction(event.data.get_long(2)),
        }
    } else if kind == atoms.SubtleWindowTag {
        RootMessage::WindowTag {
            index: l(0),
            tag: l(1),
            target: l(2),
        }
    } else if kind == atoms.SubtleWindowUntag {
        RootMessage::WindowUntag {
            index: l(0),
            tag: l(1),
            target: l(2),
        }
    } else if kind == atoms.SubtleWindowGravity {
        RootMessage::WindowGravity {
            index: l(0),
            gravity: l(1),
        }
    } else if kind == atoms.SubtleWindowScreen {
        RootMessage::WindowScreen {
            index: l(0),
            screen: l(1),
        }
    } else if kind == atoms.SubtleWindowFlags {
        RootMessage::WindowFlags {
            index: l(0),
            flags: l(1),
        }
    } else if kind == atoms.SubtleTagNew {
        RootMessage::TagNew(message_text(&bytes(event)))
    } else if kind == atoms.SubtleTagKill {
        RootMessage::TagKill(l(0))
    } else if kind == atoms.SubtleViewNew {
        RootMessage::ViewNew(message_text(&bytes(event)))
    } else if kind == atoms.SubtleViewKill {
        RootMessage::ViewKill(l(0))
    } else if kind == atoms.SubtleSubletNew {
        RootMessage::WidgetNew(message_text(&bytes(event)))
    } else if kind == atoms.SubtleSubletData {
        let (widget, data) = widget_data(&bytes(event));
        RootMessage::WidgetData { widget, data }
    } else if kind == atoms.SubtleSubletUpdate {
        RootMessage::WidgetUpdate(l(0))
    } else if kind == atoms.SubtleSubletKill {
        RootMessage::WidgetKill(l(0))
    } else if kind == atoms.SubtleReload {
        RootMessage::Reload
    } else if kind == atoms.SubtleQuit {
        RootMessage::Quit
    } else {
        return None;
    };
    Some(message)
}

fn tray_message(xw: &XWrap, event: &xlib::XClientMessageEvent) -> Option<TrayMessage> {
    if event.message_type != xw.atoms.NetSystemTrayOpcode {
        return None;
    }
    Some(TrayMessage::Opcode {
        opcode: i64::from(event.data.get_long(1)),
        window: WindowHandle(event.data.get_long(2) as u64),
    })
}

fn window_message(xw: &XWrap, event: &xlib::XClientMessageEvent) -> Option<WindowMessage> {
    let atoms = &xw.atoms;
    let kind = event.message_type;
    if kind == atoms.NetWMState {
        let state = |i: usize| {
            let atom = event.data.get_long(i) as xlib::Atom;
            if atom == atoms.NetWMStateFullscreen {
                Some(WmState::Fullscreen)
            } else if atom == atoms.NetWMStateAbove {
                Some(WmState::Above)
            } else if atom == atoms.NetWMStateSticky {
                Some(WmState::Sticky)
            } else {
                None
            }
        };
        return Some(WindowMessage::State {
            action: i64::from(event.data.get_long(0)),
            states: [state(1), state(2)],
        });
    }
    if kind == atoms.NetCloseWindow {
        return Some(WindowMessage::Close);
    }
    if kind == atoms.NetMoveResizeWindow {
        let l = |i: usize| event.data.get_long(i) as i32;
        return Some(WindowMessage::MoveResize(Xyhw::new(l(1), l(2), l(3), l(4))));
    }
    None
}

fn bytes(event: &xlib::XClientMessageEvent) -> [u8; 20] {
    let mut bytes = [0; 20];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = event.data.get_byte(i) as u8;
    }
    bytes
}

fn stack_direction(detail: c_long) -> Option<StackDirection> {
    match detail {
        0 => Some(StackDirection::Above),
        1 => Some(StackDirection::Below),
        _ => None,
    }
}

/// The NUL terminated string carried in the message data.
fn message_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Widget id in the first byte, the text after it.
fn widget_data(bytes: &[u8]) -> (i64, String) {
    match bytes.split_first() {
        Some((id, rest)) => (i64::from(*id), message_text(rest)),
        None => (-1, String::new()),
    }
}
