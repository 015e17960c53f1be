use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::display_servers::DisplayServer;
use crate::event_loop::EventSources;
use crate::models::{Chord, TagMask};
use crate::script::ScriptHost;
use crate::state::State;
use crate::utils::child_process;
use std::sync::{atomic::AtomicBool, Arc};

/// Maintains current program state.
pub struct Manager<C, SERVER> {
    pub state: State,
    pub config: C,
    pub display_server: SERVER,
    pub(crate) script_host: Box<dyn ScriptHost>,
    pub(crate) reload_requested: Arc<AtomicBool>,
    pub(crate) quit_requested: Arc<AtomicBool>,
    pub(crate) signal_hooks: bool,
    pub(crate) sources: Option<EventSources>,
}

impl<C, SERVER> Manager<C, SERVER>
where
    C: Config,
    SERVER: DisplayServer,
{
    pub fn new(config: C, display_server: SERVER, script_host: Box<dyn ScriptHost>) -> Self {
        let mut manager = Self {
            state: State::new(&config),
            config,
            display_server,
            script_host,
            reload_requested: Arc::default(),
            quit_requested: Arc::default(),
            signal_hooks: false,
            sources: None,
        };
        manager.state.set_screens(manager.display_server.screens());
        manager.load_grabs();
        manager.load_widgets();
        manager.state.publish_clients();
        manager.state.render_panel();
        manager
    }

    /// Route SIGHUP to a reload and SIGTERM to a shutdown of the event loop.
    pub fn register_signal_hooks(&mut self) {
        use signal_hook::consts::signal::{SIGHUP, SIGTERM};
        child_process::register_flag(SIGHUP, self.reload_requested.clone());
        child_process::register_flag(SIGTERM, self.quit_requested.clone());
        child_process::ignore_child_exits();
        self.signal_hooks = true;
    }

    /// Resolve the configured chords and grab them on the root and every client.
    pub(crate) fn load_grabs(&mut self) {
        self.state.grabs.clear();
        for grab in self.config.grabs() {
            let chord = Chord::parse(&grab.chord, |name| self.display_server.keysym(name));
            match chord {
                Some(chord) => self.state.grabs.add(chord, grab.action),
                None => tracing::warn!("Ignoring grab with unusable chord {}", grab.chord),
            }
        }
        let chords = self.state.grabs.chords();
        self.state.actions.push_back(DisplayAction::UngrabInputs(None));
        self.state.actions.push_back(DisplayAction::GrabInputs {
            window: None,
            chords: chords.clone(),
        });
        let clients: Vec<_> = self.state.live_clients().map(|c| c.handle).collect();
        for handle in clients {
            self.state.actions.push_back(DisplayAction::GrabInputs {
                window: Some(handle),
                chords: chords.clone(),
            });
        }
    }

    pub(crate) fn load_widgets(&mut self) {
        for source in self.config.widgets() {
            if self.add_widget(&source).is_none() {
                tracing::warn!("Widget {source} could not be loaded");
            }
        }
    }

    /// Swap in a new configuration. Managed clients stay; tags, views,
    /// grabs and widgets are rebuilt.
    pub fn reload(&mut self, config: C) {
        tracing::info!("Reloading configuration");
        let widgets: Vec<_> = self.state.widgets.iter().map(|w| w.id).collect();
        for id in widgets {
            self.remove_widget(id);
        }
        self.config = config;
        self.state.load_tags_and_views(&self.config);

        let mut known = TagMask::EMPTY;
        for index in 0..self.state.tags.len() {
            known.set(index);
        }
        for client in &mut self.state.clients {
            client.tags = TagMask::from_bits(client.tags.bits() & known.bits());
        }
        self.load_grabs();
        self.load_widgets();
        self.state.set_screens(self.display_server.screens());
        self.state.recompute();
        self.state.publish_clients();
        self.state.render_panel();
    }

    /// Adopt the windows that were already mapped when the manager started.
    pub fn scan(&mut self) {
        for event in self.display_server.scan() {
            self.dispatch(event);
        }
        self.state.recompute();
    }

    /// Destroy every entity, then release the display.
    pub fn shutdown(&mut self) {
        let widgets: Vec<_> = self.state.widgets.iter().map(|w| w.id).collect();
        for id in widgets {
            self.remove_widget(id);
        }
        let clients: Vec<_> = self.state.live_clients().map(|c| c.handle).collect();
        // Leave every window mapped for whoever manages the display next.
        self.state.actions.push_back(DisplayAction::SetVisibility {
            shown: clients.clone(),
            hidden: vec![],
        });
        for handle in clients {
            self.state.remove_client(handle);
        }
        let trays: Vec<_> = self.state.trays.iter().map(|t| t.handle).collect();
        for handle in trays {
            self.state.remove_tray(handle);
        }
        for view in std::mem::take(&mut self.state.views) {
            self.state.forget_view_button(&view);
        }
        self.execute_actions();
        self.state.commit();
        self.sources = None;
        self.display_server.flush();
        self.display_server.close();
    }
}

#[cfg(test)]
impl
    Manager<
        crate::config::TestConfig,
        crate::display_servers::MockDisplayServer,
    >
{
    pub fn new_test(tags: &[&str]) -> Self {
        Self::new_test_with(
            crate::config::TestConfig::with_tags(tags),
            crate::script::tests::RecordingHost::default(),
        )
    }

    pub fn new_test_with(
        config: crate::config::TestConfig,
        host: crate::script::tests::RecordingHost,
    ) -> Self {
        let mut manager = Self::new(
            config,
            crate::display_servers::MockDisplayServer::default(),
            Box::new(host),
        );
        manager.execute_actions();
        manager.display_server.executed.clear();
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GrabConfig, TestConfig};
    use crate::models::{GrabAction, WidgetSpec, Trigger, WindowHandle};
    use crate::script::tests::RecordingHost;
    use crate::DisplayEvent;

    #[test]
    fn view_buttons_are_created_and_registered() {
        let manager = Manager::new_test(&["one", "two"]);
        assert!(manager.state.views.iter().all(|v| v.button.is_some()));
        let panel = manager.state.panel();
        assert_eq!(panel.views.len(), 2);
        assert!(panel.views[0].active);
    }

    #[test]
    fn unusable_chords_are_skipped() {
        let mut config = TestConfig::with_tags(&["one"]);
        config.grabs = vec![
            GrabConfig {
                chord: "W-Return".to_owned(),
                action: GrabAction::Quit,
            },
            GrabConfig {
                chord: "Hyper-Return".to_owned(),
                action: GrabAction::Reload,
            },
        ];
        let manager = Manager::new_test_with(config, RecordingHost::default());
        assert_eq!(manager.state.grabs.len(), 1);
    }

    #[test]
    fn reload_keeps_clients_and_drops_unknown_tags() {
        let mut manager = Manager::new_test(&["one", "two"]);
        manager.dispatch(DisplayEvent::MapRequest(
            WindowHandle(1),
            crate::WindowInfo::default(),
        ));
        manager.state.tag_client(WindowHandle(1), 1, true);
        manager.reload(TestConfig::with_tags(&["one"]));
        manager.execute_actions();
        let client = manager.state.client(WindowHandle(1)).unwrap();
        assert_eq!(client.tags, TagMask::single(0).unwrap());
        assert_eq!(manager.state.views.len(), 1);
    }

    #[test]
    fn shutdown_destroys_entities_before_closing() {
        let mut host = RecordingHost::default();
        host.widgets.insert(
            "clock".to_owned(),
            WidgetSpec {
                name: "clock".to_owned(),
                hook: "clock_run".to_owned(),
                interval: 60,
                trigger: Trigger::Timer,
                clickable: false,
            },
        );
        let mut config = TestConfig::with_tags(&["one"]);
        config.widgets = vec!["clock".to_owned()];
        let mut manager = Manager::new_test_with(config, host);
        manager.dispatch(DisplayEvent::MapRequest(
            WindowHandle(1),
            crate::WindowInfo::default(),
        ));
        manager.shutdown();
        assert!(manager.state.clients.is_empty());
        assert!(manager.state.widgets.is_empty());
        assert!(manager.state.registry.is_empty());
        assert_eq!(manager.display_server.closed, 1);
        let destroyed = manager
            .display_server
            .executed
            .iter()
            .filter(|a| matches!(a, DisplayAction::DestroyPanelButton(_)))
            .count();
        assert_eq!(destroyed, 2);
    }
}
