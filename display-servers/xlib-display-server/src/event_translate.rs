use super::{event_translate_client_message, event_translate_property_notify, XWrap};
use subtle_core::models::{Chord, Input, WindowHandle, Xyhw};
use subtle_core::utils::modmask_lookup::ModMask;
use subtle_core::{
    ConfigureRequest, CrossingTarget, DisplayEvent, FocusChange, FocusDetail, FocusMode,
};
use x11_dl::xlib;

pub struct XEvent<'a>(pub &'a mut XWrap, pub xlib::XEvent);

impl<'a> From<XEvent<'a>> for Option<DisplayEvent> {
    fn from(x_event: XEvent) -> Self {
        let raw_event = x_event.1;
        let dragging = x_event.0.drag.is_some();

        match raw_event.get_type() {
            // New window wants to be shown.
            xlib::MapRequest => from_map_request(x_event),
            xlib::MapNotify => Some(from_map_notify(raw_event)),
            // Window is unmapped.
            xlib::UnmapNotify => Some(from_unmap_notify(raw_event)),
            // Window is destroyed.
            xlib::DestroyNotify => Some(from_destroy_notify(x_event)),
            // Window configure request.
            xlib::ConfigureRequest => Some(from_configure_request(raw_event)),
            // Window client message.
            xlib::ClientMessage => {
                let event = xlib::XClientMessageEvent::from(raw_event);
                event_translate_client_message::from_event(x_event.0, &event)
            }
            // Window property notify.
            xlib::PropertyNotify => {
                let event = xlib::XPropertyEvent::from(raw_event);
                event_translate_property_notify::from_event(x_event.0, &event)
            }
            xlib::ColormapNotify => Some(from_colormap_notify(raw_event)),
            // Mouse entered notify.
            xlib::EnterNotify if !dragging => from_enter_notify(&x_event),
            xlib::FocusIn => Some(DisplayEvent::FocusIn(from_focus_event(&x_event))),
            xlib::FocusOut => Some(DisplayEvent::FocusOut(from_focus_event(&x_event))),
            xlib::SelectionClear => from_selection_clear(&x_event),
            xlib::Expose => Some(from_expose(raw_event)),
            // Key pressed.
            xlib::KeyPress => Some(from_key_press(&x_event)),
            // Mouse button pressed.
            xlib::ButtonPress => Some(from_button_press(raw_event)),
            // Mouse button released.
            xlib::ButtonRelease if dragging => from_button_release(x_event),
            // Mouse motion notify.
            xlib::MotionNotify if dragging => from_motion_notify(&x_event),
            xlib::MappingNotify => from_mapping_notify(x_event),
            _other => None,
        }
    }
}

const fn handle(window: xlib::Window) -> WindowHandle {
    XWrap::handle(window)
}

fn from_map_request(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XMapRequestEvent::from(x_event.1);
    let info = xw.get_window_info(event.window)?;
    xw.subscribe_to_window_events(event.window);
    Some(DisplayEvent::MapRequest(handle(event.window), info))
}

fn from_map_notify(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XMapEvent::from(raw_event);
    DisplayEvent::MapNotify {
        window: handle(event.window),
        event: handle(event.event),
        synthetic: event.send_event != xlib::False,
    }
}

fn from_unmap_notify(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XUnmapEvent::from(raw_event);
    DisplayEvent::UnmapNotify {
        window: handle(event.window),
        synthetic: event.send_event != xlib::False,
    }
}

fn from_destroy_notify(x_event: XEvent) -> DisplayEvent {
    let xw = x_event.0;
    let event = xlib::XDestroyWindowEvent::from(x_event.1);
    xw.forget_embedded(event.window);
    if xw.drag.is_some_and(|drag| drag.window == event.window) {
        xw.end_drag();
    }
    DisplayEvent::DestroyNotify(handle(event.window))
}

fn from_configure_request(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XConfigureRequestEvent::from(raw_event);
    DisplayEvent::ConfigureRequest(ConfigureRequest {
        window: handle(event.window),
        geometry: Xyhw::new(event.x, event.y, event.width, event.height),
        border_width: event.border_width,
        sibling: (event.above != 0).then(|| handle(event.above)),
        stack_mode: event.detail,
        value_mask: event.value_mask,
    })
}

fn from_colormap_notify(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XColormapEvent::from(raw_event);
    DisplayEvent::ColormapNotify {
        window: handle(event.window),
        colormap: event.colormap,
        new: event.new != xlib::False,
    }
}

fn from_enter_notify(x_event: &XEvent) -> Option<DisplayEvent> {
    let event = xlib::XCrossingEvent::from(x_event.1);
    if event.mode != xlib::NotifyNormal || event.detail == xlib::NotifyInferior {
        return None;
    }
    let target = if event.window == x_event.0.get_default_root() {
        CrossingTarget::Root
    } else {
        CrossingTarget::Window(handle(event.window))
    };
    Some(DisplayEvent::EnterNotify(target))
}

fn from_focus_event(x_event: &XEvent) -> FocusChange {
    let event = xlib::XFocusChangeEvent::from(x_event.1);
    let window = (event.window != x_event.0.get_default_root()).then(|| handle(event.window));
    FocusChange {
        window,
        mode: focus_mode(event.mode),
        detail: focus_detail(event.detail),
    }
}

fn focus_mode(mode: i32) -> FocusMode {
    match mode {
        xlib::NotifyGrab => FocusMode::Grab,
        xlib::NotifyUngrab => FocusMode::Ungrab,
        xlib::NotifyWhileGrabbed => FocusMode::WhileGrabbed,
        _ => FocusMode::Normal,
    }
}

fn focus_detail(detail: i32) -> FocusDetail {
    match detail {
        xlib::NotifyAncestor => FocusDetail::Ancestor,
        xlib::NotifyVirtual => FocusDetail::Virtual,
        xlib::NotifyInferior => FocusDetail::Inferior,
        xlib::NotifyNonlinear => FocusDetail::Nonlinear,
        xlib::NotifyNonlinearVirtual => FocusDetail::NonlinearVirtual,
        xlib::NotifyPointer => FocusDetail::Pointer,
        xlib::NotifyPointerRoot => FocusDetail::PointerRoot,
        _ => FocusDetail::DetailNone,
    }
}

fn from_selection_clear(x_event: &XEvent) -> Option<DisplayEvent> {
    let event = xlib::XSelectionClearEvent::from(x_event.1);
    if event.selection != x_event.0.atoms.NetSystemTraySelection {
        return None;
    }
    Some(DisplayEvent::SelectionClear(handle(event.window)))
}

fn from_expose(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XExposeEvent::from(raw_event);
    DisplayEvent::Expose { count: event.count }
}

/// Events on the root report the child under the pointer.
fn event_window(root: xlib::Window, window: xlib::Window, subwindow: xlib::Window) -> xlib::Window {
    if window == root && subwindow != 0 {
        subwindow
    } else {
        window
    }
}

fn modifiers(state: u32) -> ModMask {
    ModMask::from_bits_truncate(state as u16)
}

fn from_key_press(x_event: &XEvent) -> DisplayEvent {
    let event = xlib::XKeyEvent::from(x_event.1);
    let keysym = x_event.0.keycode_to_keysym(event.keycode);
    DisplayEvent::KeyPress {
        window: handle(event_window(event.root, event.window, event.subwindow)),
        chord: Chord::new(Input::Key(keysym), modifiers(event.state)),
    }
}

fn from_button_press(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XButtonPressedEvent::from(raw_event);
    DisplayEvent::ButtonPress {
        window: handle(event_window(event.root, event.window, event.subwindow)),
        chord: Chord::new(Input::Button(event.button), modifiers(event.state)),
    }
}

fn from_button_release(x_event: XEvent) -> Option<DisplayEvent> {
    x_event.0.end_drag().then_some(DisplayEvent::DragEnd)
}

fn from_motion_notify(x_event: &XEvent) -> Option<DisplayEvent> {
    let event = xlib::XMotionEvent::from(x_event.1);
    let drag = x_event.0.drag?;
    Some(DisplayEvent::Drag {
        window: handle(drag.window),
        kind: drag.kind,
        dx: event.x_root - drag.origin.0,
        dy: event.y_root - drag.origin.1,
    })
}

fn from_mapping_notify(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let mut event = xlib::XMappingEvent::from(x_event.1);
    if event.request == xlib::MappingKeyboard || event.request == xlib::MappingModifier {
        if let Err(err) = xw.refresh_keyboard(&mut event) {
            tracing::warn!("Can't refresh the keyboard mapping: {}", err);
        }
        xw.regrab_root_keys();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_modes_and_details_map_to_core_values() {
        assert_eq!(focus_mode(xlib::NotifyWhileGrabbed), FocusMode::WhileGrabbed);
        assert_eq!(focus_mode(xlib::NotifyNormal), FocusMode::Normal);
        assert_eq!(focus_detail(xlib::NotifyInferior), FocusDetail::Inferior);
        assert_eq!(focus_detail(xlib::NotifyPointerRoot), FocusDetail::PointerRoot);
        assert_eq!(focus_detail(xlib::NotifyDetailNone), FocusDetail::DetailNone);
    }

    #[test]
    fn root_events_resolve_to_the_child_window() {
        assert_eq!(event_window(1, 1, 42), 42);
        assert_eq!(event_window(1, 1, 0), 1);
        assert_eq!(event_window(1, 7, 42), 7);
    }

    #[test]
    fn lock_modifiers_are_dropped_from_chords() {
        let state = xlib::Mod4Mask | xlib::Mod2Mask | xlib::LockMask;
        let chord = Chord::new(Input::Button(1), modifiers(state));
        assert_eq!(chord.modifiers, ModMask::Super);
    }
}
