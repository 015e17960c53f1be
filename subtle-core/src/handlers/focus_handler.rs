use super::{Config, Manager, WindowHandle};
use crate::display_action::{DisplayAction, XembedMessage};
use crate::display_event::{CrossingTarget, FocusChange};
use crate::display_servers::DisplayServer;
use crate::models::Mode;

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    pub fn enter_handler(&mut self, target: CrossingTarget) -> bool {
        if self.state.mode != Mode::Normal {
            return false;
        }
        match target {
            CrossingTarget::Root => {
                self.state.actions.push_back(DisplayAction::GrabInputs {
                    window: None,
                    chords: self.state.grabs.chords(),
                });
            }
            CrossingTarget::Window(handle) => {
                if self.state.client(handle).is_some() {
                    self.state.focus_client(handle);
                } else if self.state.tray(handle).is_some() {
                    self.focus_tray(handle);
                }
            }
        }
        false
    }

    fn focus_tray(&mut self, handle: WindowHandle) {
        if self.state.focus == Some(handle) {
            return;
        }
        self.state.release_tray_focus();
        self.state.focus = Some(handle);
        let actions = &mut self.state.actions;
        actions.push_back(DisplayAction::Focus(Some(handle)));
        actions.push_back(DisplayAction::Xembed(handle, XembedMessage::WindowActivate));
        actions.push_back(DisplayAction::Xembed(handle, XembedMessage::FocusIn));
    }

    pub fn focus_in_handler(&mut self, change: FocusChange) -> bool {
        if !change.is_relevant() {
            return false;
        }
        let Some(handle) = change.window else {
            return false;
        };
        if self.state.focus != Some(handle) && self.state.client(handle).is_some() {
            self.state.release_tray_focus();
            self.state.focus = Some(handle);
            self.state
                .actions
                .push_back(DisplayAction::PublishActive(Some(handle)));
            self.state.render_panel();
        }
        false
    }

    pub fn focus_out_handler(&mut self, change: FocusChange) -> bool {
        let Some(handle) = change
            .window
            .filter(|w| change.is_relevant() && self.state.focus == Some(*w))
        else {
            return false;
        };
        if self.state.tray(handle).is_some() {
            return false;
        }
        self.state.focus = None;
        self.state.actions.push_back(DisplayAction::PublishActive(None));
        self.state.render_panel();
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_event::{FocusDetail, FocusMode};
    use crate::{DisplayEvent, WindowInfo};

    fn change(window: u64, mode: FocusMode, detail: FocusDetail) -> FocusChange {
        FocusChange {
            window: Some(WindowHandle(window)),
            mode,
            detail,
        }
    }

    fn manager() -> Manager<crate::config::TestConfig, crate::display_servers::MockDisplayServer> {
        let mut manager = Manager::new_test(&["one"]);
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(1), WindowInfo::default()));
        manager.dispatch(DisplayEvent::MapRequest(WindowHandle(2), WindowInfo::default()));
        manager
    }

    #[test]
    fn grab_churn_does_not_move_focus() {
        let mut manager = manager();
        assert_eq!(manager.state.focus, Some(WindowHandle(2)));
        manager.dispatch(DisplayEvent::FocusIn(change(
            1,
            FocusMode::Grab,
            FocusDetail::Nonlinear,
        )));
        assert_eq!(manager.state.focus, Some(WindowHandle(2)));
        manager.dispatch(DisplayEvent::FocusIn(change(
            1,
            FocusMode::Normal,
            FocusDetail::Inferior,
        )));
        assert_eq!(manager.state.focus, Some(WindowHandle(2)));
        manager.dispatch(DisplayEvent::FocusIn(change(
            1,
            FocusMode::WhileGrabbed,
            FocusDetail::Ancestor,
        )));
        assert_eq!(manager.state.focus, Some(WindowHandle(1)));
    }

    #[test]
    fn focus_out_of_the_focused_client_clears_it() {
        let mut manager = manager();
        manager.dispatch(DisplayEvent::FocusOut(change(
            1,
            FocusMode::Normal,
            FocusDetail::Nonlinear,
        )));
        assert_eq!(manager.state.focus, Some(WindowHandle(2)));
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::FocusOut(change(
            2,
            FocusMode::Normal,
            FocusDetail::Nonlinear,
        )));
        assert_eq!(manager.state.focus, None);
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::PublishActive(None))
        );
    }

    #[test]
    fn entering_windows_moves_focus_between_clients_and_trays() {
        let mut manager = manager();
        manager.state.create_tray(WindowHandle(30));
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::EnterNotify(CrossingTarget::Window(WindowHandle(30))));
        assert_eq!(manager.state.focus, Some(WindowHandle(30)));
        assert!(manager.state.actions.contains(&DisplayAction::Xembed(
            WindowHandle(30),
            XembedMessage::FocusIn
        )));
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::EnterNotify(CrossingTarget::Window(WindowHandle(1))));
        assert_eq!(manager.state.focus, Some(WindowHandle(1)));
        assert_eq!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::Xembed(WindowHandle(30), XembedMessage::FocusOut))
        );
    }

    #[test]
    fn entering_the_root_regrabs_inputs() {
        let mut manager = manager();
        manager.state.actions.clear();
        manager.dispatch(DisplayEvent::EnterNotify(CrossingTarget::Root));
        assert!(matches!(
            manager.state.actions.pop_front(),
            Some(DisplayAction::GrabInputs { window: None, .. })
        ));
    }
}
