#[cfg(test)]
mod mock_display_server;

use crate::display_action::DisplayAction;
use crate::models::Screen;
use crate::DisplayEvent;
use std::os::unix::io::RawFd;

#[cfg(test)]
pub use self::mock_display_server::MockDisplayServer;

pub trait DisplayServer {
    /// Descriptor of the connection, polled for readability by the event loop.
    fn connection_fd(&self) -> RawFd;

    /// Decode every event already queued on the connection without blocking.
    fn get_next_events(&mut self) -> Vec<DisplayEvent>;

    fn execute_action(&mut self, _act: DisplayAction) -> Option<DisplayEvent> {
        None
    }

    /// Report the mapped top-level windows not owned by the manager.
    fn scan(&mut self) -> Vec<DisplayEvent>;

    fn screens(&self) -> Vec<Screen>;

    /// Resolve a key name like `Return` to its keysym.
    fn keysym(&self, name: &str) -> Option<u32>;

    fn flush(&self);

    /// Events read into the client-side queue by a flush or a reply don't
    /// make the descriptor readable again.
    fn has_queued_events(&self) -> bool {
        false
    }

    /// Release shared resources and close the connection. Safe to call twice.
    fn close(&mut self);
}
