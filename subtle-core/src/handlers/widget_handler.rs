use super::{Config, Manager};
use crate::display_action::{DisplayAction, PanelItem};
use crate::display_servers::DisplayServer;
use crate::models::{Trigger, WidgetId};
use crate::registry::{Entity, Namespace};
use crate::script::HookArg;
use std::os::unix::io::RawFd;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the epoch, the clock of the widget schedule.
pub(crate) fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Load a widget through the script host and put it on the panel.
    pub fn add_widget(&mut self, source: &str) -> Option<WidgetId> {
        let spec = self.script_host.load_widget(source)?;
        let id = self.state.widgets.insert(spec, now());
        tracing::debug!("Added widget {id:?} from {source}");
        self.watch_widget(id);
        self.state
            .actions
            .push_back(DisplayAction::CreatePanelButton(PanelItem::Widget(id)));
        Some(id)
    }

    /// Remove a widget. Its watches go first, then the script host lets go
    /// of it, then its button.
    pub fn remove_widget(&mut self, id: WidgetId) -> bool {
        if self.state.widgets.get(id).is_none() {
            tracing::debug!("Ignoring removal of unknown widget {id:?}");
            return false;
        }
        self.unwatch_widget(id);
        self.script_host.unload_widget(id);
        self.state.forget_widget(id);
        self.state.render_panel();
        true
    }

    /// Start listening on a socket owned by a widget.
    pub fn watch_socket(&mut self, id: WidgetId, fd: RawFd) -> bool {
        if self.state.widgets.get(id).is_none() {
            return false;
        }
        if fd < 0 {
            tracing::debug!("Ignoring invalid socket {fd} of widget {id:?}");
            return false;
        }
        if let Some(sources) = self.sources.as_mut() {
            if !sources.watch_socket(fd) {
                return false;
            }
        }
        self.state
            .registry
            .register(Namespace::Socket, fd as u64, Entity::Widget(id));
        true
    }

    /// Stop listening on a widget socket. The descriptor stays open.
    pub fn unwatch_socket(&mut self, fd: RawFd) {
        self.state.registry.retire(Namespace::Socket, fd as u64);
        if let Some(sources) = self.sources.as_mut() {
            sources.unwatch_socket(fd);
        }
    }

    /// Register the trigger of a widget with the event sources, if the loop
    /// runs already. The loop registers every widget when it starts.
    pub(crate) fn watch_widget(&mut self, id: WidgetId) {
        let Some(trigger) = self.state.widgets.get(id).map(|w| w.trigger.clone()) else {
            return;
        };
        match trigger {
            Trigger::Timer => {}
            Trigger::Socket(fd) => {
                self.watch_socket(id, fd);
            }
            Trigger::Watch(path) => {
                let Some(sources) = self.sources.as_mut() else {
                    return;
                };
                match sources.watch_file(&path) {
                    Ok(key) => self
                        .state
                        .registry
                        .register(Namespace::Watch, key, Entity::Widget(id)),
                    Err(err) => tracing::warn!("Cannot watch {}: {err}", path.display()),
                }
            }
        }
    }

    fn unwatch_widget(&mut self, id: WidgetId) {
        let entity = Entity::Widget(id);
        let registry = &self.state.registry;
        let sockets: Vec<u64> = registry
            .keys(Namespace::Socket)
            .filter(|k| registry.find(Namespace::Socket, *k) == Some(entity))
            .collect();
        let watches: Vec<u64> = registry
            .keys(Namespace::Watch)
            .filter(|k| registry.find(Namespace::Watch, *k) == Some(entity))
            .collect();
        for fd in sockets {
            self.unwatch_socket(fd as RawFd);
        }
        for key in watches {
            self.state.registry.retire(Namespace::Watch, key);
            if let Some(sources) = self.sources.as_mut() {
                sources.unwatch_file(key);
            }
        }
    }

    /// Invoke the hook of a widget.
    pub fn run_widget(&mut self, id: WidgetId) {
        let Some(widget) = self.state.widgets.get(id) else {
            tracing::debug!("Ignoring run of unknown widget {id:?}");
            return;
        };
        let hook = widget.hook.clone();
        if let Some(result) = self.script_host.invoke(&hook, HookArg::Widget(id)) {
            tracing::trace!("Widget {id:?} hook returned {result}");
        }
    }

    pub fn widget_click_handler(&mut self, id: WidgetId, button: u32) {
        let Some(widget) = self.state.widgets.get(id).filter(|w| w.clickable) else {
            return;
        };
        let hook = widget.hook.clone();
        self.script_host
            .invoke(&hook, HookArg::Click { widget: id, button });
        self.state.render_panel();
    }

    /// Run every timer widget due at `now` and put it back on the schedule.
    pub fn run_due_widgets(&mut self, now: u64) {
        let due = self.state.widgets.pop_due(now);
        if due.is_empty() {
            return;
        }
        for id in due {
            self.run_widget(id);
            self.state.widgets.reschedule(id, now);
        }
        self.state.render_panel();
    }

    /// A watched file or socket of a widget became ready.
    pub fn widget_ready_handler(&mut self, namespace: Namespace, key: u64) {
        match self.state.registry.find(namespace, key) {
            Some(Entity::Widget(id)) => {
                self.run_widget(id);
                self.state.render_panel();
            }
            _ => tracing::debug!("No widget behind {namespace:?} {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::WidgetSpec;
    use crate::script::tests::RecordingHost;
    use crate::DisplayEvent;
    use crate::RootMessage;

    fn spec(name: &str, interval: u64, trigger: Trigger) -> WidgetSpec {
        WidgetSpec {
            name: name.to_owned(),
            hook: format!("{name}_run"),
            interval,
            trigger,
            clickable: true,
        }
    }

    fn host() -> RecordingHost {
        let mut host = RecordingHost::default();
        host.widgets
            .insert("clock".to_owned(), spec("clock", 60, Trigger::Timer));
        host.widgets
            .insert("cpu".to_owned(), spec("cpu", 5, Trigger::Timer));
        host.widgets
            .insert("mail".to_owned(), spec("mail", 60, Trigger::Socket(42)));
        host
    }

    #[test]
    fn due_timers_run_and_are_rescheduled_in_order() {
        let host = host();
        let calls = host.calls.clone();
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host);
        let clock = manager.add_widget("clock").unwrap();
        let cpu = manager.add_widget("cpu").unwrap();
        let _mail = manager.add_widget("mail").unwrap();

        let at = now() + 1_000;
        manager.run_due_widgets(at);
        assert_eq!(calls.borrow().len(), 2);

        let cpu_due = (at + 5) - (at + 5) % 5;
        let clock_due = (at + 60) - (at + 60) % 60;
        let schedule: Vec<_> = manager.state.widgets.schedule().collect();
        assert!(schedule.contains(&(cpu_due, cpu)));
        assert!(schedule.contains(&(clock_due, clock)));
        assert!(schedule.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(
            manager.state.widgets.next_timeout(at),
            std::time::Duration::from_secs(cpu_due - at)
        );
    }

    #[test]
    fn socket_widgets_run_when_ready() {
        let host = host();
        let calls = host.calls.clone();
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host);
        let mail = manager.add_widget("mail").unwrap();
        assert!(manager.watch_socket(mail, 42));
        manager.widget_ready_handler(Namespace::Socket, 42);
        assert_eq!(
            calls.borrow().last(),
            Some(&("mail_run".to_owned(), HookArg::Widget(mail)))
        );
        manager.unwatch_socket(42);
        manager.widget_ready_handler(Namespace::Socket, 42);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn negative_sockets_are_refused() {
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host());
        let mail = manager.add_widget("mail").unwrap();
        assert!(!manager.watch_socket(mail, -1));
        assert_eq!(manager.state.registry.find(Namespace::Socket, u64::MAX), None);
    }

    #[test]
    fn removal_forgets_watches_and_buttons() {
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host());
        let mail = manager.add_widget("mail").unwrap();
        manager.watch_socket(mail, 42);
        manager.execute_actions();
        let button = manager.state.widgets.get(mail).unwrap().button.unwrap();
        assert!(manager.remove_widget(mail));
        assert!(!manager.remove_widget(mail));
        assert_eq!(manager.state.registry.find(Namespace::Socket, 42), None);
        assert_eq!(manager.state.panel_item(button), None);
        assert!(manager
            .state
            .actions
            .contains(&DisplayAction::DestroyPanelButton(button)));
    }

    #[test]
    fn clicks_reach_clickable_widgets() {
        let host = host();
        let calls = host.calls.clone();
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host);
        let clock = manager.add_widget("clock").unwrap();
        manager.execute_actions();
        let button = manager.state.widgets.get(clock).unwrap().button.unwrap();
        manager.dispatch(DisplayEvent::ButtonPress {
            window: button,
            chord: crate::models::Chord::new(
                crate::models::Input::Button(3),
                crate::utils::modmask_lookup::ModMask::empty(),
            ),
        });
        assert_eq!(
            calls.borrow().last(),
            Some(&(
                "clock_run".to_owned(),
                HookArg::Click {
                    widget: clock,
                    button: 3
                }
            ))
        );
    }

    #[test]
    fn widget_commands_update_text_and_run_hooks() {
        let host = host();
        let calls = host.calls.clone();
        let mut manager = Manager::new_test_with(TestConfig::with_tags(&["one"]), host);
        let root = |message| {
            DisplayEvent::ClientMessage(crate::MessageTarget::Root(message))
        };
        manager.dispatch(root(RootMessage::WidgetNew("cpu".to_owned())));
        manager.execute_actions();
        let cpu = manager.state.widgets.iter().next().unwrap().id;
        manager.dispatch(root(RootMessage::WidgetData {
            widget: i64::from(cpu.0),
            data: "42%".to_owned(),
        }));
        assert_eq!(manager.state.panel().widgets[0].label, "42%");
        manager.dispatch(root(RootMessage::WidgetUpdate(i64::from(cpu.0))));
        assert_eq!(calls.borrow().len(), 1);
        manager.dispatch(root(RootMessage::WidgetKill(i64::from(cpu.0))));
        assert!(manager.state.widgets.is_empty());
    }
}
