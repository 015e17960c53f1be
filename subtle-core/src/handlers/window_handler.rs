use super::{Config, Manager, WindowHandle};
use crate::display_action::{DisplayAction, WmStateValue, XembedMessage};
use crate::display_event::{ConfigureRequest, PropertyChange, WindowInfo, WindowMessage, WmState};
use crate::display_servers::DisplayServer;
use crate::models::{ClientFlags, Xyhw};

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Process a window asking to be shown, or found mapped at startup.
    /// Returns true if the new client is visible.
    pub fn window_created_handler(&mut self, handle: WindowHandle, info: WindowInfo) -> bool {
        if self.state.client(handle).is_some() || self.state.tray(handle).is_some() {
            return false;
        }
        let visible = self.state.create_client(handle, info);
        self.state.actions.push_back(DisplayAction::GrabInputs {
            window: Some(handle),
            chords: self.state.grabs.chords(),
        });
        let wm_state = if visible {
            WmStateValue::Normal
        } else {
            WmStateValue::Iconic
        };
        self.state
            .actions
            .push_back(DisplayAction::SetWmState(handle, wm_state));
        self.state.publish_clients();
        if visible {
            self.state.focus_client(handle);
        }
        visible
    }

    pub fn map_notify_handler(&mut self, handle: WindowHandle) -> bool {
        if self.state.tray(handle).is_some() {
            self.state
                .actions
                .push_back(DisplayAction::SetWmState(handle, WmStateValue::Normal));
            self.state
                .actions
                .push_back(DisplayAction::Xembed(handle, XembedMessage::WindowActivate));
            self.state.render_panel();
        }
        false
    }

    /// A client or tray unmapped itself. It gets the withdrawn `WM_STATE`
    /// before it is released. Returns true if it was visible.
    pub fn window_withdrawn_handler(&mut self, handle: WindowHandle) -> bool {
        if self.state.client(handle).is_some() || self.state.tray(handle).is_some() {
            self.state
                .actions
                .push_back(DisplayAction::SetWmState(handle, WmStateValue::Withdrawn));
        }
        self.window_destroyed_handler(handle)
    }

    /// Process a window going away.
    /// Returns true if it was visible.
    pub fn window_destroyed_handler(&mut self, handle: WindowHandle) -> bool {
        if let Some(was_visible) = self.state.remove_client(handle) {
            tracing::debug!("Client {handle:?} is gone");
            self.state.publish_clients();
            self.state.render_panel();
            return was_visible;
        }
        if self.state.remove_tray(handle) {
            tracing::debug!("Tray {handle:?} is gone");
            self.state.render_panel();
        }
        false
    }

    pub fn configure_request_handler(&mut self, request: &ConfigureRequest) -> bool {
        let Some(client) = self.state.client_mut(request.window) else {
            self.state
                .actions
                .push_back(DisplayAction::PassConfigure(*request));
            return false;
        };
        if client.is_floating() && !client.is_fullscreen() {
            let geometry = client.size_hints.apply(request.geometry);
            client.geometry = geometry;
            self.state
                .actions
                .push_back(DisplayAction::PassConfigure(ConfigureRequest {
                    geometry,
                    ..*request
                }));
        } else {
            // Tiled clients only learn where they already are.
            let geometry = client.geometry;
            self.state
                .actions
                .push_back(DisplayAction::ConfigureWindow(request.window, geometry));
        }
        false
    }

    pub fn colormap_handler(&mut self, handle: WindowHandle, colormap: u64) {
        if let Some(client) = self.state.client_mut(handle) {
            client.colormap = Some(colormap);
            self.state
                .actions
                .push_back(DisplayAction::InstallColormap(colormap));
        }
    }

    /// Re-read a changed window property.
    /// Returns true if the arrangement changed.
    pub fn property_handler(&mut self, handle: WindowHandle, change: PropertyChange) -> bool {
        if self.state.tray(handle).is_some() {
            return self.tray_property_handler(handle, change);
        }
        let focused = self.state.focus == Some(handle);
        let Some(client) = self.state.client_mut(handle) else {
            return false;
        };
        match change {
            PropertyChange::Name(name) => {
                client.caption = name;
                if focused {
                    self.state.render_panel();
                }
                false
            }
            PropertyChange::NormalHints(hints) => {
                client.size_hints = hints;
                if client.is_floating() {
                    let geometry = hints.apply(client.geometry);
                    client.geometry = geometry;
                    self.state
                        .actions
                        .push_back(DisplayAction::ConfigureWindow(handle, geometry));
                }
                false
            }
            PropertyChange::Strut(strut) => {
                client.strut = strut;
                self.state.update_workareas();
                true
            }
            PropertyChange::XembedInfo { .. } => false,
        }
    }

    fn tray_property_handler(&mut self, handle: WindowHandle, change: PropertyChange) -> bool {
        let Some(tray) = self.state.tray_mut(handle) else {
            return false;
        };
        match change {
            PropertyChange::XembedInfo { mapped } => {
                tray.mapped = mapped;
                let (shown, hidden) = if mapped {
                    (vec![handle], vec![])
                } else {
                    (vec![], vec![handle])
                };
                self.state
                    .actions
                    .push_back(DisplayAction::SetVisibility { shown, hidden });
                self.state.render_panel();
            }
            PropertyChange::Name(name) => tray.name = name,
            PropertyChange::NormalHints(_) => self.state.render_panel(),
            PropertyChange::Strut(_) => {}
        }
        false
    }

    /// Requests a client sends about itself.
    pub fn window_message_handler(&mut self, handle: WindowHandle, message: WindowMessage) -> bool {
        let Some(client) = self.state.client_mut(handle) else {
            return false;
        };
        match message {
            WindowMessage::State { action, states } => {
                let mut toggle = ClientFlags::empty();
                for state in states.into_iter().flatten() {
                    let flag = match state {
                        WmState::Fullscreen => ClientFlags::FULL,
                        WmState::Above => ClientFlags::FLOAT,
                        WmState::Sticky => ClientFlags::STICK,
                    };
                    let set = client.flags.contains(flag);
                    match action {
                        0 if set => toggle |= flag,
                        1 if !set => toggle |= flag,
                        2 => toggle |= flag,
                        0 | 1 => {}
                        _ => tracing::debug!("Ignoring window state action {action}"),
                    }
                }
                !toggle.is_empty() && self.state.toggle_mode(handle, toggle)
            }
            WindowMessage::Close => {
                self.state.actions.push_back(DisplayAction::KillWindow(handle));
                false
            }
            WindowMessage::MoveResize(geometry) => {
                if client.is_floating() && !client.is_fullscreen() {
                    let geometry = client.size_hints.apply(geometry);
                    client.geometry = geometry;
                    self.state
                        .actions
                        .push_back(DisplayAction::ConfigureWindow(handle, geometry));
                } else {
                    tracing::debug!("Ignoring move of tiled client {handle:?}");
                }
                false
            }
        }
    }

    pub(crate) fn move_floating(&mut self, handle: WindowHandle, geometry: Xyhw) {
        let Some(client) = self.state.client_mut(handle) else {
            return;
        };
        let geometry = client.size_hints.apply(geometry);
        client.geometry = geometry;
        self.state
            .actions
            .push_back(DisplayAction::ConfigureWindow(handle, geometry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_event::ConfigureRequest;
    use crate::models::{SizeHints, Strut};
    use crate::DisplayEvent;

    fn info() -> WindowInfo {
        WindowInfo {
            geometry: Xyhw::new(10, 10, 200, 100),
            caption: Some("term".to_owned()),
            ..WindowInfo::default()
        }
    }

    fn request(window: u64, geometry: Xyhw) -> ConfigureRequest {
        ConfigureRequest {
            window: WindowHandle(window),
            geometry,
            border_width: 0,
            sibling: None,
            stack_mode: 0,
            value_mask: 0xf,
        }
    }

    #[test]
    fn mapping_twice_creates_one_client() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        assert_eq!(manager.state.clients.len(), 1);
        assert_eq!(manager.state.focus, Some(WindowHandle(1)));
    }

    #[test]
    fn unmanaged_configure_requests_pass_through() {
        let mut manager = Manager::new_test(&["one"]);
        manager.state.actions.clear();
        let req = request(4, Xyhw::new(1, 2, 3, 4));
        manager.dispatch(DisplayEvent::ConfigureRequest(req));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::PassConfigure(req))
        );
    }

    #[test]
    fn tiled_clients_keep_their_geometry() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        let tiled = manager.state.client(WindowHandle(1)).unwrap().geometry;
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::ConfigureRequest(request(1, Xyhw::new(0, 0, 5, 5))));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::ConfigureWindow(WindowHandle(1), tiled))
        );
    }

    #[test]
    fn floating_clients_obey_their_size_hints() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.state.toggle_mode(WindowHandle(1), ClientFlags::FLOAT);
        manager.dispatch(DisplayEvent::PropertyNotify(
            WindowHandle(1),
            PropertyChange::NormalHints(SizeHints {
                min: Some((50, 50)),
                ..SizeHints::default()
            }),
        ));
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::ConfigureRequest(request(1, Xyhw::new(5, 5, 10, 10))));
        let client = manager.state.client(WindowHandle(1)).unwrap();
        assert_eq!(client.geometry, Xyhw::new(5, 5, 50, 50));
    }

    #[test]
    fn struts_shrink_the_work_area() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.dispatch(DisplayEvent::PropertyNotify(
            WindowHandle(1),
            PropertyChange::Strut(Some(Strut {
                bottom: 20,
                ..Strut::default()
            })),
        ));
        assert_eq!(manager.state.screens[0].workarea, Xyhw::new(0, 16, 800, 564));
        manager.dispatch(DisplayEvent::DestroyNotify(WindowHandle(1)));
        assert_eq!(manager.state.screens[0].workarea, Xyhw::new(0, 16, 800, 584));
    }

    #[test]
    fn state_messages_add_remove_and_toggle() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        let full = |action| {
            DisplayEvent::ClientMessage(crate::MessageTarget::Window(
                WindowHandle(1),
                WindowMessage::State {
                    action,
                    states: [Some(WmState::Fullscreen), None],
                },
            ))
        };
        manager.dispatch(full(1));
        manager.dispatch(full(1));
        assert!(manager.state.client(WindowHandle(1)).unwrap().is_fullscreen());
        manager.dispatch(full(0));
        assert!(!manager.state.client(WindowHandle(1)).unwrap().is_fullscreen());
        manager.dispatch(full(2));
        assert!(manager.state.client(WindowHandle(1)).unwrap().is_fullscreen());
        manager.dispatch(full(7));
        assert!(manager.state.client(WindowHandle(1)).unwrap().is_fullscreen());
    }

    #[test]
    fn dead_clients_ignore_further_notifications() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.state.remove_client(WindowHandle(1));
        assert!(!manager.property_handler(
            WindowHandle(1),
            PropertyChange::Name(Some("late".to_owned()))
        ));
        assert_eq!(
            manager.state.clients[0].caption.as_deref(),
            Some("term")
        );
    }
}
