use super::XWrap;
use subtle_core::{DisplayEvent, PropertyChange};
use x11_dl::xlib;

pub fn from_event(xw: &XWrap, event: &xlib::XPropertyEvent) -> Option<DisplayEvent> {
    if event.window == xw.get_default_root() || event.window == xw.panel {
        return None;
    }

    let event_name = xw.get_xatom_name(event.atom).ok()?;
    tracing::trace!("PropertyNotify: {} : {:?}", event_name, &event);

    let window = event.window;
    let atoms = &xw.atoms;
    let change = match event.atom {
        xlib::XA_WM_NAME => PropertyChange::Name(xw.get_window_name(window)),
        xlib::XA_WM_NORMAL_HINTS => PropertyChange::NormalHints(xw.get_size_hints(window)),
        atom if atom == atoms.NetWMName => PropertyChange::Name(xw.get_window_name(window)),
        atom if atom == atoms.NetWMStrut || atom == atoms.NetWMStrutPartial => {
            PropertyChange::Strut(xw.get_window_strut(window))
        }
        atom if atom == atoms.XEmbedInfo => PropertyChange::XembedInfo {
            mapped: xw.get_xembed_mapped(window).unwrap_or(true),
        },
        _ => return None,
    };
    Some(DisplayEvent::PropertyNotify(XWrap::handle(window), change))
}
