use super::{Config, Manager, WindowHandle};
use crate::display_action::{DisplayAction, PanelItem};
use crate::display_servers::DisplayServer;
use crate::models::{
    Chord, ClientFlags, DragKind, GrabAction, Input, Mode, StackDirection, Xyhw,
};
use crate::script::HookArg;
use crate::state::Signal;
use crate::utils::child_process;

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    pub fn key_press_handler(&mut self, window: WindowHandle, chord: Chord) -> bool {
        let Some(grab) = self.state.grabs.find(&chord).cloned() else {
            tracing::debug!("No grab for {chord:?}");
            return false;
        };
        self.grab_action_handler(window, grab.action)
    }

    /// Clicks on panel buttons activate their view or widget; other clicks
    /// run a grab or focus the client under the pointer.
    pub fn button_press_handler(&mut self, window: WindowHandle, chord: Chord) -> bool {
        if let Some(item) = self.state.panel_item(window) {
            match item {
                PanelItem::View(id) => {
                    if let Some(index) = self.state.view_index(id) {
                        self.state.jump_view(index);
                    }
                }
                PanelItem::Widget(id) => {
                    let button = match chord.input {
                        Input::Button(button) => button,
                        Input::Key(_) => return false,
                    };
                    self.widget_click_handler(id, button);
                }
            }
            return false;
        }
        if let Some(grab) = self.state.grabs.find(&chord).cloned() {
            return self.grab_action_handler(window, grab.action);
        }
        if self.state.client(window).is_some() {
            self.state.focus_client(window);
            self.state.actions.push_back(DisplayAction::Raise(window));
        }
        false
    }

    /// Run the action of a grab. `window` is the window the input happened
    /// on; window actions fall back to the focused client.
    /// Returns true if the arrangement changed.
    pub fn grab_action_handler(&mut self, window: WindowHandle, action: GrabAction) -> bool {
        let target = if self.state.client(window).is_some() {
            Some(window)
        } else {
            self.state.focus.filter(|f| self.state.client(*f).is_some())
        };
        match action {
            GrabAction::Exec(command) => {
                child_process::exec_shell(&command);
                false
            }
            GrabAction::Script(hook) => {
                let arg = target.map_or(HookArg::None, HookArg::Window);
                if let Some(result) = self.script_host.invoke(&hook, arg) {
                    tracing::debug!("Hook {hook} returned {result}");
                }
                false
            }
            GrabAction::ViewJump(index) => {
                self.state.jump_view(index);
                false
            }
            GrabAction::ScreenJump(index) => {
                self.screen_jump(index);
                false
            }
            GrabAction::Reload => {
                self.state.raise_signal(Signal::Reload);
                false
            }
            GrabAction::Quit => {
                self.state.raise_signal(Signal::Quit);
                false
            }
            GrabAction::WindowMove => target.map_or(false, |h| self.start_drag(h, DragKind::Move)),
            GrabAction::WindowResize => {
                target.map_or(false, |h| self.start_drag(h, DragKind::Resize))
            }
            GrabAction::WindowToggle(modes) => {
                target.map_or(false, |h| self.state.toggle_mode(h, modes))
            }
            GrabAction::WindowStack(direction) => {
                if let Some(handle) = target {
                    let act = match direction {
                        StackDirection::Above => DisplayAction::Raise(handle),
                        StackDirection::Below => DisplayAction::Lower(handle),
                    };
                    self.state.actions.push_back(act);
                }
                false
            }
            GrabAction::WindowSelect(direction) => {
                if let Some(handle) = self.state.select(direction) {
                    self.state.focus_client(handle);
                    self.state.actions.push_back(DisplayAction::Raise(handle));
                    self.state
                        .actions
                        .push_back(DisplayAction::WarpPointer(handle));
                }
                false
            }
            GrabAction::WindowGravity(gravity) => {
                target.map_or(false, |h| self.state.set_gravity(h, gravity))
            }
            GrabAction::WindowScreen(screen) => {
                target.map_or(false, |h| self.state.set_screen(h, screen))
            }
            GrabAction::WindowCollapse => {
                target.map_or(false, |h| self.state.toggle_collapse(h))
            }
            GrabAction::WindowWeight(percent) => {
                target.map_or(false, |h| self.state.set_weight(h, percent))
            }
            GrabAction::WindowKill => {
                if let Some(handle) = target {
                    self.state.actions.push_back(DisplayAction::KillWindow(handle));
                }
                false
            }
        }
    }

    /// Move the pointer to the first visible client of another screen.
    fn screen_jump(&mut self, index: usize) {
        if index >= self.state.screens.len() {
            tracing::debug!("Ignoring jump to unknown screen {index}");
            return;
        }
        let view = self.state.current_tags();
        let handle = self
            .state
            .live_clients()
            .find(|c| c.screen == index && c.is_visible_on(view))
            .map(|c| c.handle);
        if let Some(handle) = handle {
            self.state.focus_client(handle);
            self.state
                .actions
                .push_back(DisplayAction::WarpPointer(handle));
        }
    }

    /// Enter drag mode for a client, floating it first if it is tiled.
    /// Returns true if the client left the tiling.
    fn start_drag(&mut self, handle: WindowHandle, kind: DragKind) -> bool {
        let Some(client) = self.state.client_mut(handle) else {
            return false;
        };
        if client.is_fullscreen() {
            tracing::debug!("Not dragging fullscreen client {handle:?}");
            return false;
        }
        let was_tiled = !client.is_tile_exempt();
        client.flags |= ClientFlags::FLOAT;
        let origin = client.geometry;
        self.state.mode = Mode::Dragging {
            window: handle,
            kind,
            origin,
        };
        self.state.actions.push_back(DisplayAction::Raise(handle));
        self.state
            .actions
            .push_back(DisplayAction::StartDrag(handle, kind));
        was_tiled
    }

    pub fn drag_handler(&mut self, window: WindowHandle, kind: DragKind, dx: i32, dy: i32) -> bool {
        let Mode::Dragging {
            window: dragged,
            kind: dragging,
            origin,
        } = self.state.mode
        else {
            return false;
        };
        if dragged != window || dragging != kind {
            return false;
        }
        let geometry = match kind {
            DragKind::Move => Xyhw {
                x: origin.x + dx,
                y: origin.y + dy,
                ..origin
            },
            DragKind::Resize => Xyhw {
                w: (origin.w + dx).max(1),
                h: (origin.h + dy).max(1),
                ..origin
            },
        };
        self.move_floating(window, geometry);
        false
    }

    pub fn drag_end_handler(&mut self) -> bool {
        if let Mode::Dragging { window, .. } = self.state.mode {
            self.state.mode = Mode::Normal;
            if self.state.client(window).is_some() {
                self.state.focus_client(window);
            }
        }
        false
    }
}
