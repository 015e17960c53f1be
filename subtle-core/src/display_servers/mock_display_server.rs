use super::DisplayEvent;
use super::DisplayServer;
use crate::display_action::DisplayAction;
use crate::models::{Screen, WindowHandle, Xyhw};
use std::os::unix::io::RawFd;

#[derive(Debug, Clone)]
pub struct MockDisplayServer {
    pub screens: Vec<Screen>,
    pub executed: Vec<DisplayAction>,
    pub next_window: u64,
    pub closed: usize,
    pub queued: bool,
}

impl Default for MockDisplayServer {
    fn default() -> Self {
        Self {
            screens: vec![Screen::new(Xyhw::new(0, 0, 800, 600))],
            executed: vec![],
            next_window: 1000,
            closed: 0,
            queued: false,
        }
    }
}

impl DisplayServer for MockDisplayServer {
    fn connection_fd(&self) -> RawFd {
        -1
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent> {
        vec![]
    }

    fn execute_action(&mut self, act: DisplayAction) -> Option<DisplayEvent> {
        let event = match &act {
            DisplayAction::CreatePanelButton(item) => {
                self.next_window += 1;
                Some(DisplayEvent::PanelButtonCreated(
                    *item,
                    WindowHandle(self.next_window),
                ))
            }
            _ => None,
        };
        self.executed.push(act);
        event
    }

    fn scan(&mut self) -> Vec<DisplayEvent> {
        vec![]
    }

    fn screens(&self) -> Vec<Screen> {
        self.screens.clone()
    }

    fn keysym(&self, name: &str) -> Option<u32> {
        match name {
            "Return" => Some(0xff0d),
            "space" => Some(0x20),
            single if single.len() == 1 => single.chars().next().map(u32::from),
            _ => None,
        }
    }

    fn flush(&self) {}

    fn has_queued_events(&self) -> bool {
        self.queued
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}
