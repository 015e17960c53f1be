use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::errors::Result;
use crate::handlers::widget_handler::now;
use crate::models::{Manager, Trigger};
use crate::registry::Namespace;
use crate::state::Signal;
use crate::utils::notifier::Notifier;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use nix::poll::{PollFd, PollFlags, PollTimeout};
use std::io;
use std::os::fd::BorrowedFd;
use std::os::unix::io::RawFd;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

const DISPLAY: Token = Token(0);
const NOTIFIER: Token = Token(1);
const SOCKET_BASE: usize = 2;

/// Why the event loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Reload,
    Quit,
}

/// Descriptors the loop waits on besides the display connection.
pub(crate) struct EventSources {
    poll: Poll,
    notifier: Option<Notifier>,
}

impl EventSources {
    fn new(display_fd: RawFd) -> Result<Self> {
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut SourceFd(&display_fd), DISPLAY, Interest::READABLE)?;
        // File watches are optional; widgets watching files just never fire.
        let notifier = match Notifier::new() {
            Ok(notifier) => {
                poll.registry().register(
                    &mut SourceFd(&notifier.fd()),
                    NOTIFIER,
                    Interest::READABLE,
                )?;
                Some(notifier)
            }
            Err(err) => {
                tracing::warn!("File notifications unavailable: {err}");
                None
            }
        };
        Ok(Self { poll, notifier })
    }

    pub(crate) fn watch_file(&mut self, path: &Path) -> Result<u64> {
        match self.notifier.as_mut() {
            Some(notifier) => notifier.watch(path),
            None => Err(io::Error::from(io::ErrorKind::Unsupported).into()),
        }
    }

    pub(crate) fn unwatch_file(&mut self, key: u64) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.unwatch(key);
        }
    }

    pub(crate) fn watch_socket(&mut self, fd: RawFd) -> bool {
        let Some(token) = usize::try_from(fd)
            .ok()
            .and_then(|fd| fd.checked_add(SOCKET_BASE))
            .map(Token)
        else {
            tracing::warn!("Cannot watch invalid socket {fd}");
            return false;
        };
        match self
            .poll
            .registry()
            .register(&mut SourceFd(&fd), token, Interest::READABLE)
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Cannot watch socket {fd}: {err}");
                false
            }
        }
    }

    pub(crate) fn unwatch_socket(&mut self, fd: RawFd) {
        if let Err(err) = self.poll.registry().deregister(&mut SourceFd(&fd)) {
            tracing::debug!("Socket {fd} was not watched: {err}");
        }
    }
}

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Run until a reload or quit is requested.
    ///
    /// # Errors
    ///
    /// Fails when the descriptors cannot be polled.
    pub fn event_loop(&mut self) -> Result<LoopExit> {
        self.sources = Some(EventSources::new(self.display_server.connection_fd())?);
        let pending: Vec<_> = self
            .state
            .widgets
            .iter()
            .filter(|w| !matches!(w.trigger, Trigger::Timer))
            .map(|w| w.id)
            .collect();
        for id in pending {
            self.watch_widget(id);
        }

        let mut events = Events::with_capacity(16);
        // Sockets left readable by their widget; mio only reports edges.
        let mut readable: Vec<RawFd> = Vec::new();
        loop {
            for event in self.display_server.get_next_events() {
                self.dispatch(event);
            }
            self.execute_actions();
            self.display_server.flush();

            self.deliver_signal();
            if let Some(exit) = self.take_exit() {
                self.sources = None;
                return Ok(exit);
            }

            let timeout = self.poll_timeout(&readable);
            let Some(sources) = self.sources.as_mut() else {
                return Ok(LoopExit::Quit);
            };
            if let Err(err) = sources.poll.poll(&mut events, Some(timeout)) {
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }

            let mut sockets = std::mem::take(&mut readable);
            let tokens: Vec<Token> = events.iter().map(mio::event::Event::token).collect();
            for token in tokens {
                match token {
                    // Drained at the top of the loop.
                    DISPLAY => {}
                    NOTIFIER => {
                        let keys = self
                            .sources
                            .as_mut()
                            .and_then(|s| s.notifier.as_mut())
                            .map(Notifier::read)
                            .unwrap_or_default();
                        for key in keys {
                            self.widget_ready_handler(Namespace::Watch, key);
                        }
                    }
                    Token(token) => {
                        if let Ok(fd) = RawFd::try_from(token - SOCKET_BASE) {
                            if !sockets.contains(&fd) {
                                sockets.push(fd);
                            }
                        }
                    }
                }
            }
            for fd in sockets {
                self.widget_ready_handler(Namespace::Socket, fd as u64);
                let watched = self.state.registry.find(Namespace::Socket, fd as u64).is_some();
                if watched && still_readable(fd) {
                    readable.push(fd);
                }
            }
            self.run_due_widgets(now());
        }
    }

    /// How long the poll may block: not at all while input is already
    /// buffered, otherwise until the next timer widget is due.
    fn poll_timeout(&self, readable: &[RawFd]) -> Duration {
        if readable.is_empty() && !self.display_server.has_queued_events() {
            self.state.widgets.next_timeout(now())
        } else {
            Duration::ZERO
        }
    }

    /// Turn a signal requested by a handler into a real one, so it arrives
    /// the same way as one sent by another process.
    fn deliver_signal(&mut self) {
        let Some(signal) = self.state.pending_signal.take() else {
            return;
        };
        let (flag, number) = match signal {
            Signal::Reload => (&self.reload_requested, nix::sys::signal::SIGHUP),
            Signal::Quit => (&self.quit_requested, nix::sys::signal::SIGTERM),
        };
        if !self.signal_hooks {
            flag.store(true, Ordering::SeqCst);
            return;
        }
        if let Err(err) = nix::sys::signal::raise(number) {
            tracing::error!("Cannot raise {number}: {err}");
            flag.store(true, Ordering::SeqCst);
        }
    }

    fn take_exit(&self) -> Option<LoopExit> {
        if self.quit_requested.swap(false, Ordering::SeqCst) {
            return Some(LoopExit::Quit);
        }
        if self.reload_requested.swap(false, Ordering::SeqCst) {
            return Some(LoopExit::Reload);
        }
        None
    }
}

/// Whether data is left on a socket after its widget ran.
fn still_readable(fd: RawFd) -> bool {
    // The descriptor stays open while it is registered.
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    match nix::poll::poll(&mut fds, PollTimeout::ZERO) {
        Ok(n) if n > 0 => fds[0].revents().is_some_and(|r| {
            r.contains(PollFlags::POLLIN) && !r.intersects(PollFlags::POLLHUP | PollFlags::POLLERR)
        }),
        Ok(_) => false,
        Err(err) => {
            tracing::debug!("Cannot poll socket {fd:?}: {err}");
            false
        }
    }
}
