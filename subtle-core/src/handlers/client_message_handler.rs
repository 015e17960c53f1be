use super::{Config, Manager};
use crate::display_action::{DisplayAction, XembedMessage};
use crate::display_event::{MessageTarget, RootMessage, TrayMessage};
use crate::display_servers::DisplayServer;
use crate::models::{ClientFlags, Gravity, StackDirection, TagMask, WidgetId};
use crate::state::Signal;

const EMBEDDED_NOTIFY: i64 = 0;
const REQUEST_FOCUS: i64 = 3;

fn index(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}

fn widget_id(value: i64) -> Option<WidgetId> {
    u32::try_from(value).ok().map(WidgetId)
}

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Returns true if the arrangement changed.
    pub fn client_message_handler(&mut self, target: MessageTarget) -> bool {
        match target {
            MessageTarget::Root(message) => self.root_message_handler(message),
            MessageTarget::Tray(message) => self.tray_message_handler(message),
            MessageTarget::Window(handle, message) => self.window_message_handler(handle, message),
        }
    }

    fn root_message_handler(&mut self, message: RootMessage) -> bool {
        let state = &mut self.state;
        match message {
            RootMessage::CurrentView(view) => {
                if let Some(view) = index(view) {
                    state.jump_view(view);
                }
                false
            }
            RootMessage::ActiveWindow(handle) => {
                if state.client(handle).is_none() {
                    return false;
                }
                if !state.client_visible(handle) {
                    if let Some(view) = state.view_of(handle) {
                        state.jump_view(view);
                    }
                }
                state.focus_client(handle);
                state.actions.push_back(DisplayAction::Raise(handle));
                false
            }
            RootMessage::Restack { window, detail } => {
                if state.client(window).is_none() {
                    return false;
                }
                match detail {
                    Some(StackDirection::Above) => {
                        state.actions.push_back(DisplayAction::Raise(window));
                    }
                    Some(StackDirection::Below) => {
                        state.actions.push_back(DisplayAction::Lower(window));
                    }
                    None => tracing::debug!("Ignoring restack detail for {window:?}"),
                }
                false
            }
            RootMessage::WindowTag { index: i, tag, target } => self.tag_message(i, tag, target, true),
            RootMessage::WindowUntag { index: i, tag, target } => {
                self.tag_message(i, tag, target, false)
            }
            RootMessage::WindowGravity { index: i, gravity } => {
                let Some(handle) = state.client_at(i) else {
                    return false;
                };
                match Gravity::try_from(gravity) {
                    Ok(gravity) => state.set_gravity(handle, gravity),
                    Err(err) => {
                        tracing::debug!("{err}");
                        false
                    }
                }
            }
            RootMessage::WindowScreen { index: i, screen } => {
                match (state.client_at(i), index(screen)) {
                    (Some(handle), Some(screen)) => state.set_screen(handle, screen),
                    _ => false,
                }
            }
            RootMessage::WindowFlags { index: i, flags } => {
                let Some(handle) = state.client_at(i) else {
                    return false;
                };
                let flags = u8::try_from(flags).map_or(ClientFlags::empty(), |bits| {
                    ClientFlags::from_bits_truncate(bits) & ClientFlags::MODES
                });
                !flags.is_empty() && state.toggle_mode(handle, flags)
            }
            RootMessage::TagNew(name) => {
                state.add_tag(&name);
                false
            }
            RootMessage::TagKill(tag) => {
                if let Some(tag) = index(tag) {
                    state.delete_tag(tag);
                }
                false
            }
            RootMessage::ViewNew(name) => {
                if name.is_empty() {
                    tracing::warn!("Refusing to create a view without a name");
                    return false;
                }
                state.create_view(name, TagMask::EMPTY);
                false
            }
            RootMessage::ViewKill(view) => {
                if let Some(view) = index(view) {
                    state.delete_view(view);
                }
                false
            }
            RootMessage::WidgetNew(source) => {
                self.add_widget(&source);
                false
            }
            RootMessage::WidgetData { widget, data } => {
                let Some(widget) = widget_id(widget).and_then(|id| state.widgets.get_mut(id)) else {
                    tracing::debug!("Ignoring data for unknown widget {widget}");
                    return false;
                };
                widget.text = data;
                state.render_panel();
                false
            }
            RootMessage::WidgetUpdate(widget) => {
                if let Some(id) = widget_id(widget) {
                    self.run_widget(id);
                    self.state.render_panel();
                }
                false
            }
            RootMessage::WidgetKill(widget) => {
                if let Some(id) = widget_id(widget) {
                    self.remove_widget(id);
                }
                false
            }
            RootMessage::Reload => {
                state.raise_signal(Signal::Reload);
                false
            }
            RootMessage::Quit => {
                state.raise_signal(Signal::Quit);
                false
            }
        }
    }

    /// `target` 0 addresses the client at `index`, 1 the view at `index`.
    fn tag_message(&mut self, index_value: i64, tag: i64, target: i64, on: bool) -> bool {
        let Some(tag) = index(tag) else {
            return false;
        };
        match target {
            0 => self
                .state
                .client_at(index_value)
                .map_or(false, |handle| self.state.tag_client(handle, tag, on)),
            1 => index(index_value).map_or(false, |view| self.state.tag_view(view, tag, on)),
            _ => {
                tracing::debug!("Ignoring tag message for target kind {target}");
                false
            }
        }
    }

    fn tray_message_handler(&mut self, message: TrayMessage) -> bool {
        let TrayMessage::Opcode { opcode, window } = message;
        match opcode {
            EMBEDDED_NOTIFY => {
                if self.state.tray(window).is_some() || self.state.client(window).is_some() {
                    return false;
                }
                tracing::debug!("Embedding tray icon {window:?}");
                self.state.create_tray(window);
                self.state
                    .actions
                    .push_back(DisplayAction::Xembed(window, XembedMessage::EmbeddedNotify));
                self.state.render_panel();
            }
            REQUEST_FOCUS => {
                if self.state.tray(window).is_some() {
                    self.state
                        .actions
                        .push_back(DisplayAction::Xembed(window, XembedMessage::FocusIn));
                }
            }
            _ => tracing::debug!("Ignoring tray opcode {opcode}"),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WindowHandle, Xyhw};
    use crate::{DisplayEvent, WindowInfo};

    fn root(message: RootMessage) -> DisplayEvent {
        DisplayEvent::ClientMessage(MessageTarget::Root(message))
    }

    fn manager_with_client() -> Manager<crate::config::TestConfig, crate::display_servers::MockDisplayServer> {
        let mut manager = Manager::new_test(&["one", "two", "three"]);
        manager.dispatch(DisplayEvent::MapRequest(
            WindowHandle(1),
            WindowInfo {
                geometry: Xyhw::new(0, 0, 100, 100),
                ..WindowInfo::default()
            },
        ));
        manager
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let mut manager = manager_with_client();
        let before = manager.state.clients[0].clone();
        for message in [
            RootMessage::CurrentView(-1),
            RootMessage::CurrentView(3),
            RootMessage::WindowTag { index: 5, tag: 1, target: 0 },
            RootMessage::WindowTag { index: 0, tag: 64, target: 0 },
            RootMessage::WindowTag { index: 0, tag: -2, target: 0 },
            RootMessage::WindowTag { index: 0, tag: 1, target: 4 },
            RootMessage::WindowGravity { index: 0, gravity: 10 },
            RootMessage::WindowGravity { index: 0, gravity: 0 },
            RootMessage::WindowScreen { index: 0, screen: 1 },
            RootMessage::WindowFlags { index: -1, flags: 1 },
            RootMessage::TagKill(9),
            RootMessage::ViewKill(-3),
            RootMessage::WidgetKill(4),
            RootMessage::WidgetData { widget: 4, data: "x".to_owned() },
        ] {
            manager.dispatch(root(message));
        }
        let after = &manager.state.clients[0];
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.gravity, before.gravity);
        assert_eq!(after.screen, before.screen);
        assert_eq!(after.flags, before.flags);
        assert_eq!(manager.state.current_view, 0);
        assert_eq!(manager.state.tags.len(), 3);
        assert_eq!(manager.state.views.len(), 3);
    }

    #[test]
    fn clients_and_views_are_tagged_by_index() {
        let mut manager = manager_with_client();
        manager.dispatch(root(RootMessage::WindowTag { index: 0, tag: 2, target: 0 }));
        assert!(manager.state.clients[0].tags.contains(2));
        manager.dispatch(root(RootMessage::WindowTag { index: 1, tag: 0, target: 1 }));
        assert!(manager.state.views[1].tags.contains(0));
        manager.dispatch(root(RootMessage::WindowUntag { index: 0, tag: 0, target: 0 }));
        assert!(!manager.state.clients[0].tags.contains(0));
        assert!(!manager.state.client_visible(WindowHandle(1)));
    }

    #[test]
    fn window_flags_toggle_modes() {
        let mut manager = manager_with_client();
        manager.dispatch(root(RootMessage::WindowFlags { index: 0, flags: 2 | 4 }));
        let client = &manager.state.clients[0];
        assert!(client.is_floating() && client.is_sticky() && !client.is_fullscreen());
        manager.dispatch(root(RootMessage::WindowFlags { index: 0, flags: 128 }));
        assert!(!manager.state.clients[0].is_dead());
    }

    #[test]
    fn activating_a_hidden_window_switches_to_its_view() {
        let mut manager = manager_with_client();
        manager.state.tag_client(WindowHandle(1), 0, false);
        manager.state.tag_client(WindowHandle(1), 2, true);
        manager.dispatch(root(RootMessage::ActiveWindow(WindowHandle(1))));
        assert_eq!(manager.state.current_view, 2);
        assert_eq!(manager.state.focus, Some(WindowHandle(1)));
    }

    #[test]
    fn tags_and_views_are_created_and_killed() {
        let mut manager = manager_with_client();
        manager.dispatch(root(RootMessage::TagNew("four".to_owned())));
        manager.dispatch(root(RootMessage::ViewNew("four".to_owned())));
        manager.dispatch(root(RootMessage::ViewNew(String::new())));
        assert_eq!(manager.state.tags.len(), 4);
        assert_eq!(manager.state.views.len(), 4);
        manager.dispatch(root(RootMessage::TagKill(0)));
        manager.dispatch(root(RootMessage::ViewKill(3)));
        assert_eq!(manager.state.tags.len(), 3);
        assert_eq!(manager.state.views.len(), 3);
    }

    #[test]
    fn reload_and_quit_are_raised_as_signals() {
        let mut manager = manager_with_client();
        manager.dispatch(root(RootMessage::Reload));
        assert_eq!(manager.state.pending_signal, Some(Signal::Reload));
        manager.dispatch(root(RootMessage::Quit));
        assert_eq!(manager.state.pending_signal, Some(Signal::Quit));
    }

    #[test]
    fn tray_icons_complete_the_embedding_handshake() {
        let mut manager = Manager::new_test(&["one"]);
        let dock = |opcode| {
            DisplayEvent::ClientMessage(MessageTarget::Tray(TrayMessage::Opcode {
                opcode,
                window: WindowHandle(30),
            }))
        };
        manager.state.actions.clear();
        manager.dispatch(dock(0));
        manager.dispatch(dock(0));
        assert_eq!(manager.state.trays.len(), 1);
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::Xembed(WindowHandle(30), XembedMessage::EmbeddedNotify))
        );
        manager.state.actions.clear();
        manager.dispatch(dock(3));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::Xembed(WindowHandle(30), XembedMessage::FocusIn))
        );
        manager.dispatch(dock(9));
        assert!(manager.state.actions.is_empty());
        assert_eq!(manager.state.panel().trays, vec![WindowHandle(30)]);
    }
}
