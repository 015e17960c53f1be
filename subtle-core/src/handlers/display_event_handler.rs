use super::{Config, DisplayEvent, Manager};
use crate::display_action::DisplayAction;
use crate::display_servers::DisplayServer;

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Apply one event to the state.
    /// Returns true if the current view needs to be laid out again.
    pub fn display_event_handler(&mut self, event: DisplayEvent) -> bool {
        tracing::trace!("Handling {event:?}");
        match event {
            DisplayEvent::ConfigureRequest(request) => self.configure_request_handler(&request),
            DisplayEvent::MapRequest(handle, info) | DisplayEvent::Adopt(handle, info) => {
                self.window_created_handler(handle, info)
            }
            DisplayEvent::MapNotify { window, .. } => self.map_notify_handler(window),
            // Only a synthetic unmap means the client withdrew; the others are ours.
            DisplayEvent::UnmapNotify { window, synthetic } => {
                synthetic && self.window_withdrawn_handler(window)
            }
            DisplayEvent::DestroyNotify(handle) => self.window_destroyed_handler(handle),
            DisplayEvent::ClientMessage(target) => self.client_message_handler(target),
            DisplayEvent::ColormapNotify {
                window,
                colormap,
                new,
            } => {
                if new {
                    self.colormap_handler(window, colormap);
                }
                false
            }
            DisplayEvent::PropertyNotify(handle, change) => self.property_handler(handle, change),
            DisplayEvent::EnterNotify(target) => self.enter_handler(target),
            DisplayEvent::SelectionClear(_) => {
                tracing::info!("Tray selection lost, taking it back");
                self.state.actions.push_back(DisplayAction::AcquireTraySelection);
                false
            }
            DisplayEvent::Expose { count } => {
                if count == 0 {
                    self.state.render_panel();
                }
                false
            }
            DisplayEvent::ButtonPress { window, chord } => self.button_press_handler(window, chord),
            DisplayEvent::KeyPress { window, chord } => self.key_press_handler(window, chord),
            DisplayEvent::FocusIn(change) => self.focus_in_handler(change),
            DisplayEvent::FocusOut(change) => self.focus_out_handler(change),
            DisplayEvent::Drag {
                window,
                kind,
                dx,
                dy,
            } => self.drag_handler(window, kind, dx, dy),
            DisplayEvent::DragEnd => self.drag_end_handler(),
            DisplayEvent::PanelButtonCreated(item, window) => {
                if self.state.attach_button(item, window) {
                    self.state.render_panel();
                }
                false
            }
        }
    }

    /// Handle one event as a complete dispatch step: lay out the view if
    /// needed, then drop whatever the handler retired.
    pub fn dispatch(&mut self, event: DisplayEvent) {
        if self.display_event_handler(event) {
            self.state.recompute();
        }
        self.state.commit();
    }

    /// Hand queued actions to the display server, dispatching any event it
    /// answers with.
    pub fn execute_actions(&mut self) {
        while let Some(act) = self.state.actions.pop_front() {
            if let Some(event) = self.display_server.execute_action(act) {
                self.dispatch(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DragKind, Mode, WindowHandle, Xyhw};
    use crate::{DisplayAction, PanelItem, WindowInfo, WmStateValue};

    fn info() -> WindowInfo {
        WindowInfo {
            geometry: Xyhw::new(10, 10, 200, 100),
            ..WindowInfo::default()
        }
    }

    #[test]
    fn only_synthetic_unmaps_release_clients() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.dispatch(DisplayEvent::UnmapNotify {
            window: WindowHandle(1),
            synthetic: false,
        });
        assert!(manager.state.client(WindowHandle(1)).is_some());
        manager.dispatch(DisplayEvent::UnmapNotify {
            window: WindowHandle(1),
            synthetic: true,
        });
        assert!(manager.state.client(WindowHandle(1)).is_none());
        assert!(manager.state.clients.is_empty());
    }

    fn withdrawn_states(
        manager: &Manager<crate::config::TestConfig, crate::display_servers::MockDisplayServer>,
    ) -> usize {
        manager
            .state
            .actions
            .iter()
            .filter(|a| matches!(a, DisplayAction::SetWmState(_, WmStateValue::Withdrawn)))
            .count()
    }

    #[test]
    fn withdrawing_clients_and_trays_get_the_withdrawn_state() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.state.create_tray(WindowHandle(2));
        manager.state.actions.clear();
        for window in [WindowHandle(1), WindowHandle(2)] {
            manager.dispatch(DisplayEvent::UnmapNotify {
                window,
                synthetic: true,
            });
        }
        assert_eq!(withdrawn_states(&manager), 2);
        assert!(manager.state.tray(WindowHandle(2)).is_none());
    }

    #[test]
    fn destroyed_clients_keep_their_state() {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), info()));
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::DestroyNotify(WindowHandle(1)));
        assert_eq!(withdrawn_states(&manager), 0);
    }

    #[test]
    fn events_for_unknown_windows_are_ignored() {
        let mut manager = Manager::new_test(&["one"]);
        manager.state.actions.clear();
        assert!(!manager.display_event_handler(DisplayEvent::DestroyNotify(WindowHandle(9))));
        assert!(!manager.display_event_handler(DisplayEvent::Drag {
            window: WindowHandle(9),
            kind: DragKind::Move,
            dx: 4,
            dy: 4,
        }));
        assert!(manager.state.actions.is_empty());
        assert_eq!(manager.state.mode, Mode::Normal);
    }

    #[test]
    fn expose_renders_once_per_burst() {
        let mut manager = Manager::new_test(&["one"]);
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::Expose { count: 2 });
        manager.dispatch(DisplayEvent::Expose { count: 1 });
        manager.dispatch(DisplayEvent::Expose { count: 0 });
        let renders = manager
            .state
            .actions
            .iter()
            .filter(|a| matches!(a, DisplayAction::RenderPanel(_)))
            .count();
        assert_eq!(renders, 1);
    }

    #[test]
    fn buttons_of_vanished_owners_are_destroyed() {
        let mut manager = Manager::new_test(&["one"]);
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::PanelButtonCreated(
            PanelItem::View(crate::models::ViewId(77)),
            WindowHandle(5),
        ));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::DestroyPanelButton(WindowHandle(5)))
        );
    }

    #[test]
    fn lost_tray_selection_is_reacquired() {
        let mut manager = Manager::new_test(&["one"]);
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::SelectionClear(WindowHandle(3)));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::AcquireTraySelection)
        );
    }
}
