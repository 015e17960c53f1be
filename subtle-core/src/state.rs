//! The context object holding every entity the manager tracks.
use crate::config::{Config, TagConfig};
use crate::display_action::{DisplayAction, Panel, PanelButton, PanelItem, XembedMessage};
use crate::display_event::WindowInfo;
use crate::models::{
    Client, ClientFlags, Direction, Gravity, Grabs, Mode, Screen, Strut, TagMask, Tags, Tray,
    View, ViewId, WidgetId, Widgets, WindowHandle, Xyhw,
};
use crate::registry::{Entity, Namespace, Registry};
use crate::tiling::{Sizing, TileTree};
use std::collections::VecDeque;

/// Process level requests raised by handlers and delivered by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Reload,
    Quit,
}

#[derive(Debug)]
pub struct State {
    pub clients: Vec<Client>,
    pub trays: Vec<Tray>,
    pub views: Vec<View>,
    pub current_view: usize,
    pub tags: Tags,
    pub tag_rules: Vec<TagConfig>,
    pub grabs: Grabs,
    pub widgets: Widgets,
    pub screens: Vec<Screen>,
    pub registry: Registry,
    pub focus: Option<WindowHandle>,
    pub mode: Mode,
    pub actions: VecDeque<DisplayAction>,
    pub header_height: i32,
    pub(crate) pending_signal: Option<Signal>,
    next_view_id: u32,
}

impl State {
    pub(crate) fn new(config: &impl Config) -> Self {
        let mut state = Self {
            clients: vec![],
            trays: vec![],
            views: vec![],
            current_view: 0,
            tags: Tags::new(),
            tag_rules: vec![],
            grabs: Grabs::default(),
            widgets: Widgets::default(),
            screens: vec![],
            registry: Registry::default(),
            focus: None,
            mode: Mode::Normal,
            actions: VecDeque::new(),
            header_height: config.header_height(),
            pending_signal: None,
            next_view_id: 0,
        };
        state.load_tags_and_views(config);
        state
    }

    /// Replace tags and views with the configured ones. Clients keep their
    /// masks, so tags should only be appended between reloads.
    pub(crate) fn load_tags_and_views(&mut self, config: &impl Config) {
        self.header_height = config.header_height();
        self.tags = Tags::new();
        self.tag_rules = config.tags();
        for tag in &self.tag_rules {
            self.tags.add(&tag.name);
        }
        for view in std::mem::take(&mut self.views) {
            self.forget_view_button(&view);
        }
        for view in config.views() {
            let tags = self.tags.mask_for(&view.tags);
            self.push_view(view.name, tags);
        }
        if self.views.is_empty() {
            tracing::warn!("No views configured, adding a default view");
            let mut tags = TagMask::EMPTY;
            if self.tags.is_empty() {
                self.tags.add("default");
            }
            tags.set(0);
            self.push_view("default".to_owned(), tags);
        }
        self.current_view = self.current_view.min(self.views.len() - 1);
        self.publish_tags();
        self.publish_views();
    }

    /// Tags of the current view.
    pub fn current_tags(&self) -> TagMask {
        self.views
            .get(self.current_view)
            .map_or(TagMask::EMPTY, |v| v.tags)
    }

    pub fn is_visible(&self, client: &Client) -> bool {
        client.is_visible_on(self.current_tags())
    }

    /// A live client; dead and unregistered windows are not ours.
    pub fn client(&self, handle: WindowHandle) -> Option<&Client> {
        match self.registry.find(Namespace::Client, handle.0)? {
            Entity::Client(h) => self.clients.iter().find(|c| c.handle == h && !c.is_dead()),
            _ => None,
        }
    }

    pub fn client_mut(&mut self, handle: WindowHandle) -> Option<&mut Client> {
        match self.registry.find(Namespace::Client, handle.0)? {
            Entity::Client(h) => self
                .clients
                .iter_mut()
                .find(|c| c.handle == h && !c.is_dead()),
            _ => None,
        }
    }

    pub fn client_visible(&self, handle: WindowHandle) -> bool {
        self.client(handle).is_some_and(|c| self.is_visible(c))
    }

    /// Live client at `index` of the client list, as used by external commands.
    pub fn client_at(&self, index: i64) -> Option<WindowHandle> {
        let index = usize::try_from(index).ok()?;
        self.live_clients().nth(index).map(|c| c.handle)
    }

    pub fn live_clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter().filter(|c| !c.is_dead())
    }

    pub fn tray(&self, handle: WindowHandle) -> Option<&Tray> {
        match self.registry.find(Namespace::Tray, handle.0)? {
            Entity::Tray(h) => self.trays.iter().find(|t| t.handle == h && !t.dead),
            _ => None,
        }
    }

    pub fn tray_mut(&mut self, handle: WindowHandle) -> Option<&mut Tray> {
        match self.registry.find(Namespace::Tray, handle.0)? {
            Entity::Tray(h) => self.trays.iter_mut().find(|t| t.handle == h && !t.dead),
            _ => None,
        }
    }

    pub fn view_index(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|v| v.id == id)
    }

    /// End of a dispatch step: drop everything retired during it.
    pub fn commit(&mut self) {
        self.registry.commit();
        self.clients.retain(|c| !c.is_dead());
        self.trays.retain(|t| !t.dead);
    }

    /// Start managing a window. Returns whether it is visible on the current view.
    pub fn create_client(&mut self, handle: WindowHandle, info: WindowInfo) -> bool {
        let mut tags = TagMask::EMPTY;
        let mut gravity = None;
        for (index, rule) in self.tag_rules.iter().enumerate() {
            let Some(pattern) = rule.matching.as_deref() else {
                continue;
            };
            let hit = [info.class.as_deref(), info.caption.as_deref()]
                .into_iter()
                .flatten()
                .any(|text| text.contains(pattern));
            if hit {
                tags.set(index);
                gravity = gravity.or(rule.gravity);
            }
        }
        if tags.is_empty() {
            tags = self.current_tags();
        }
        let mut client = Client::new(handle, info.geometry, tags);
        client.caption = info.caption;
        client.class = info.class;
        client.transient = info.transient;
        client.size_hints = info.size_hints;
        client.gravity = gravity.unwrap_or_default();
        if info.transient {
            client.flags |= ClientFlags::FLOAT;
        }
        if info.fullscreen {
            client.flags |= ClientFlags::FULL;
        }
        client.screen = self.screen_at(info.geometry.center()).unwrap_or(0);
        tracing::debug!("Managing client {:?} ({:?})", handle, client.class);

        self.registry
            .register(Namespace::Client, handle.0, Entity::Client(handle));
        self.clients.push(client);
        self.actions
            .push_back(DisplayAction::PublishWindowTags(handle, tags));
        self.client_visible(handle)
    }

    /// Mark a client dead and hide it from lookups. Returns whether it was
    /// visible, or `None` if the window was not a client.
    pub fn remove_client(&mut self, handle: WindowHandle) -> Option<bool> {
        let was_visible = self.client_visible(handle);
        let client = self.client_mut(handle)?;
        client.flags |= ClientFlags::DEAD;
        self.registry.retire(Namespace::Client, handle.0);
        if self.focus == Some(handle) {
            self.focus = None;
            self.actions.push_back(DisplayAction::PublishActive(None));
        }
        if matches!(self.mode, Mode::Dragging { window, .. } if window == handle) {
            self.mode = Mode::Normal;
        }
        if self.clients.iter().any(|c| c.strut.is_some() && c.handle == handle) {
            self.update_workareas();
        }
        Some(was_visible)
    }

    pub fn create_tray(&mut self, handle: WindowHandle) {
        if self.tray(handle).is_some() {
            return;
        }
        self.registry
            .register(Namespace::Tray, handle.0, Entity::Tray(handle));
        self.trays.push(Tray::new(handle));
    }

    pub fn remove_tray(&mut self, handle: WindowHandle) -> bool {
        let Some(tray) = self.tray_mut(handle) else {
            return false;
        };
        tray.dead = true;
        self.registry.retire(Namespace::Tray, handle.0);
        true
    }

    /// Flip mode bits of a client. Returns whether the client is visible,
    /// in which case the arrangement needs a recompute.
    pub fn toggle_mode(&mut self, handle: WindowHandle, modes: ClientFlags) -> bool {
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        client.toggle_mode(modes);
        self.client_visible(handle)
    }

    /// Collapse a client to its header bar or expand it again. Returns
    /// whether the client is visible.
    pub fn toggle_collapse(&mut self, handle: WindowHandle) -> bool {
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        client.sizing = match client.sizing {
            Sizing::Collapsed => Sizing::Plain,
            _ => Sizing::Collapsed,
        };
        self.client_visible(handle)
    }

    /// Let a client claim `percent` of its gravity cell, or share it equally
    /// again with 0. Returns whether the client is visible.
    pub fn set_weight(&mut self, handle: WindowHandle, percent: u8) -> bool {
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        client.sizing = match percent {
            0 => Sizing::Plain,
            percent => Sizing::Weighted(percent.min(100)),
        };
        self.client_visible(handle)
    }

    /// Set or clear one tag on a client. Returns whether the arrangement of
    /// the current view changed.
    pub fn tag_client(&mut self, handle: WindowHandle, tag: usize, on: bool) -> bool {
        if tag >= self.tags.len() {
            tracing::debug!("Ignoring tag index {tag} out of range");
            return false;
        }
        let was_visible = self.client_visible(handle);
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        if on {
            client.tags.set(tag);
        } else {
            client.tags.clear(tag);
        }
        let tags = client.tags;
        self.actions
            .push_back(DisplayAction::PublishWindowTags(handle, tags));
        was_visible || self.client_visible(handle)
    }

    /// Set or clear one tag on a view. Returns whether it is the current one.
    pub fn tag_view(&mut self, index: usize, tag: usize, on: bool) -> bool {
        if tag >= self.tags.len() {
            return false;
        }
        let Some(view) = self.views.get_mut(index) else {
            return false;
        };
        if on {
            view.tags.set(tag);
        } else {
            view.tags.clear(tag);
        }
        index == self.current_view
    }

    pub fn add_tag(&mut self, name: &str) -> Option<usize> {
        if self.tags.index_of(name).is_some() {
            tracing::debug!("Tag {name} already exists");
            return None;
        }
        let index = self.tags.add(name)?;
        self.publish_tags();
        Some(index)
    }

    /// Delete a tag and renumber the higher ones in every client and view.
    /// Out of range indices are ignored.
    pub fn delete_tag(&mut self, index: usize) -> bool {
        if self.tags.remove(index).is_none() {
            tracing::debug!("Ignoring delete of unknown tag {index}");
            return false;
        }
        if index < self.tag_rules.len() {
            self.tag_rules.remove(index);
        }
        for client in self.clients.iter_mut().filter(|c| !c.is_dead()) {
            client.tags = client.tags.without_tag(index);
            self.actions
                .push_back(DisplayAction::PublishWindowTags(client.handle, client.tags));
        }
        for view in &mut self.views {
            view.tags = view.tags.without_tag(index);
        }
        if self.current_tags().is_empty() {
            tracing::warn!("Current view shows no tags after deleting tag {index}");
        }
        self.publish_tags();
        self.recompute();
        true
    }

    pub fn create_view(&mut self, name: String, tags: TagMask) -> ViewId {
        let id = self.push_view(name, tags);
        self.publish_views();
        id
    }

    fn push_view(&mut self, name: String, tags: TagMask) -> ViewId {
        let id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        self.views.push(View::new(id, name, tags));
        self.actions
            .push_back(DisplayAction::CreatePanelButton(PanelItem::View(id)));
        id
    }

    /// Remove the view at `index`. Later views move down one slot; the last
    /// remaining view cannot be deleted.
    pub fn delete_view(&mut self, index: usize) -> bool {
        if index >= self.views.len() {
            tracing::debug!("Ignoring delete of unknown view {index}");
            return false;
        }
        if self.views.len() == 1 {
            tracing::warn!("Refusing to delete the last view");
            return false;
        }
        let view = self.views.remove(index);
        self.forget_view_button(&view);
        if index == self.current_view {
            self.current_view = 0;
            self.recompute();
        } else if index < self.current_view {
            self.current_view -= 1;
        }
        self.publish_views();
        self.render_panel();
        true
    }

    pub(crate) fn forget_view_button(&mut self, view: &View) {
        self.registry.remove(Entity::View(view.id));
        if let Some(button) = view.button {
            self.actions
                .push_back(DisplayAction::DestroyPanelButton(button));
        }
    }

    /// Make the view at `index` current. Returns whether anything changed.
    pub fn jump_view(&mut self, index: usize) -> bool {
        if index >= self.views.len() {
            tracing::debug!("Ignoring jump to unknown view {index}");
            return false;
        }
        if index == self.current_view {
            return false;
        }
        let old = self.current_tags();
        self.current_view = index;
        let new = self.current_tags();
        for client in self.clients.iter_mut().filter(|c| c.is_sticky()) {
            let tags = client.tags | new;
            if client.is_visible_on(old) && tags != client.tags {
                client.tags = tags;
                self.actions
                    .push_back(DisplayAction::PublishWindowTags(client.handle, client.tags));
            }
        }
        if let Some(focus) = self.focus {
            if !self.client_visible(focus) {
                self.focus = None;
                self.actions.push_back(DisplayAction::Focus(None));
                self.actions.push_back(DisplayAction::PublishActive(None));
            }
        }
        self.recompute();
        self.publish_views();
        self.render_panel();
        true
    }

    /// First view showing the client.
    pub fn view_of(&self, handle: WindowHandle) -> Option<usize> {
        let client = self.client(handle)?;
        self.views.iter().position(|v| client.is_visible_on(v.tags))
    }

    pub fn set_gravity(&mut self, handle: WindowHandle, gravity: Gravity) -> bool {
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        client.gravity = gravity;
        client.flags.remove(ClientFlags::FLOAT | ClientFlags::FULL);
        self.client_visible(handle)
    }

    pub fn set_screen(&mut self, handle: WindowHandle, screen: usize) -> bool {
        if screen >= self.screens.len() {
            tracing::debug!("Ignoring unknown screen {screen}");
            return false;
        }
        let Some(client) = self.client_mut(handle) else {
            return false;
        };
        client.screen = screen;
        self.client_visible(handle)
    }

    pub fn screen_at(&self, (x, y): (i32, i32)) -> Option<usize> {
        self.screens
            .iter()
            .position(|s| s.geometry.contains_point(x, y))
    }

    pub fn set_screens(&mut self, screens: Vec<Screen>) {
        self.screens = screens;
        let count = self.screens.len().max(1);
        for client in &mut self.clients {
            if client.screen >= count {
                client.screen = 0;
            }
        }
        self.update_workareas();
    }

    /// Shrink every screen by the struts of all clients and the panel.
    pub fn update_workareas(&mut self) {
        let strut = self
            .live_clients()
            .filter_map(|c| c.strut)
            .fold(Strut::default(), Strut::union);
        let display = self.display_area();
        let panel = self.header_height;
        for screen in &mut self.screens {
            screen.update_workarea(display, strut, panel);
        }
        if let Some(first) = self.screens.first() {
            self.actions
                .push_back(DisplayAction::PublishWorkarea(first.workarea));
        }
    }

    /// Bounding box of all screens.
    pub fn display_area(&self) -> Xyhw {
        let mut area: Option<(i32, i32, i32, i32)> = None;
        for g in self.screens.iter().map(|s| s.geometry) {
            let (x0, y0, x1, y1) = area.unwrap_or((g.x, g.y, g.x + g.w, g.y + g.h));
            area = Some((
                x0.min(g.x),
                y0.min(g.y),
                x1.max(g.x + g.w),
                y1.max(g.y + g.h),
            ));
        }
        area.map_or_else(Xyhw::default, |(x0, y0, x1, y1)| {
            Xyhw::new(x0, y0, x1 - x0, y1 - y0)
        })
    }

    /// Lay out the current view and update which clients are mapped.
    pub fn recompute(&mut self) {
        let view = self.current_tags();
        let mut configure: Vec<(WindowHandle, Xyhw)> = vec![];
        for (index, screen) in self.screens.iter().enumerate() {
            for id in 1..=9_u8 {
                let Ok(gravity) = Gravity::try_from(id) else {
                    continue;
                };
                let members: Vec<&Client> = self
                    .clients
                    .iter()
                    .filter(|c| c.is_visible_on(view) && !c.is_tile_exempt())
                    .filter(|c| c.screen == index && c.gravity == gravity)
                    .collect();
                if members.is_empty() {
                    continue;
                }
                let mut tree = TileTree::new();
                let root = tree.add_container(None, gravity.orientation(), Sizing::Plain);
                for client in members {
                    tree.add_leaf(root, client.handle, client.sizing, false);
                }
                let rect = gravity.rect_in(screen.workarea);
                configure.extend(tree.arrange(root, rect, self.header_height));
            }
        }
        for client in self.clients.iter().filter(|c| c.is_visible_on(view)) {
            if client.is_fullscreen() {
                if let Some(screen) = self.screens.get(client.screen) {
                    configure.push((client.handle, screen.geometry));
                }
            }
        }

        for (handle, rect) in configure {
            if let Some(client) = self.clients.iter_mut().find(|c| c.handle == handle) {
                client.geometry = rect;
            }
            self.actions
                .push_back(DisplayAction::ConfigureWindow(handle, rect));
        }
        let mut shown = vec![];
        let mut hidden = vec![];
        for client in self.clients.iter().filter(|c| !c.is_dead()) {
            if client.is_visible_on(view) {
                shown.push(client.handle);
            } else {
                hidden.push(client.handle);
            }
        }
        self.actions
            .push_back(DisplayAction::SetVisibility { shown, hidden });
    }

    /// Pick the visible client on the focused client's screen lying best in
    /// `direction`. Without a focused client the first visible one is picked.
    pub fn select(&self, direction: Direction) -> Option<WindowHandle> {
        let view = self.current_tags();
        let Some(focused) = self.focus.and_then(|f| self.client(f)) else {
            return self
                .live_clients()
                .find(|c| c.is_visible_on(view))
                .map(|c| c.handle);
        };
        let mut best: Option<(i32, WindowHandle)> = None;
        for client in self.live_clients() {
            if client.handle == focused.handle
                || client.screen != focused.screen
                || !client.is_visible_on(view)
            {
                continue;
            }
            let score = focused.gravity.score(client.gravity, direction);
            if score > 0 && best.map_or(true, |(top, _)| score > top) {
                best = Some((score, client.handle));
                if score == 100 {
                    break;
                }
            }
        }
        best.map(|(_, handle)| handle)
    }

    pub fn focus_client(&mut self, handle: WindowHandle) {
        if self.focus == Some(handle) {
            return;
        }
        self.release_tray_focus();
        self.focus = Some(handle);
        self.actions.push_back(DisplayAction::Focus(Some(handle)));
        self.actions
            .push_back(DisplayAction::PublishActive(Some(handle)));
        self.render_panel();
    }

    /// Tell a focused tray icon it lost the focus.
    pub fn release_tray_focus(&mut self) {
        let Some(tray) = self.focus.filter(|f| self.tray(*f).is_some()) else {
            return;
        };
        self.actions
            .push_back(DisplayAction::Xembed(tray, XembedMessage::FocusOut));
        self.actions
            .push_back(DisplayAction::Xembed(tray, XembedMessage::WindowDeactivate));
    }

    pub fn publish_clients(&mut self) {
        let clients: Vec<WindowHandle> = self.live_clients().map(|c| c.handle).collect();
        let mut stacking: Vec<WindowHandle> = self
            .live_clients()
            .filter(|c| !c.is_floating() && !c.is_fullscreen())
            .map(|c| c.handle)
            .collect();
        stacking.extend(
            self.live_clients()
                .filter(|c| c.is_floating() || c.is_fullscreen())
                .map(|c| c.handle),
        );
        self.actions
            .push_back(DisplayAction::PublishClients { clients, stacking });
    }

    pub fn publish_views(&mut self) {
        let names = self.views.iter().map(|v| v.name.clone()).collect();
        self.actions.push_back(DisplayAction::PublishViews {
            names,
            current: self.current_view,
        });
    }

    pub fn publish_tags(&mut self) {
        let names = self.tags.iter().map(|t| t.name.clone()).collect();
        self.actions.push_back(DisplayAction::PublishTags(names));
    }

    pub fn panel(&self) -> Panel {
        let views = self
            .views
            .iter()
            .enumerate()
            .filter_map(|(position, view)| {
                Some(PanelButton {
                    window: view.button?,
                    position,
                    label: view.name.clone(),
                    active: position == self.current_view,
                })
            })
            .collect();
        let widgets = self
            .widgets
            .iter()
            .enumerate()
            .filter_map(|(position, widget)| {
                Some(PanelButton {
                    window: widget.button?,
                    position,
                    label: widget.text.clone(),
                    active: false,
                })
            })
            .collect();
        Panel {
            views,
            widgets,
            caption: self
                .focus
                .and_then(|f| self.client(f))
                .and_then(|c| c.caption.clone()),
            trays: self
                .trays
                .iter()
                .filter(|t| !t.dead && t.mapped)
                .map(|t| t.handle)
                .collect(),
        }
    }

    pub fn render_panel(&mut self) {
        let panel = self.panel();
        self.actions.push_back(DisplayAction::RenderPanel(panel));
    }

    /// Resolve a panel button window.
    pub fn panel_item(&self, window: WindowHandle) -> Option<PanelItem> {
        match self.registry.find(Namespace::Button, window.0)? {
            Entity::View(id) => Some(PanelItem::View(id)),
            Entity::Widget(id) => Some(PanelItem::Widget(id)),
            _ => None,
        }
    }

    pub(crate) fn attach_button(&mut self, item: PanelItem, window: WindowHandle) -> bool {
        let (slot, entity) = match item {
            PanelItem::View(id) => (
                self.views
                    .iter_mut()
                    .find(|v| v.id == id)
                    .map(|v| &mut v.button),
                Entity::View(id),
            ),
            PanelItem::Widget(id) => (
                self.widgets.get_mut(id).map(|w| &mut w.button),
                Entity::Widget(id),
            ),
        };
        let Some(slot) = slot else {
            // Owner went away before the button was made.
            self.actions
                .push_back(DisplayAction::DestroyPanelButton(window));
            return false;
        };
        *slot = Some(window);
        self.registry.register(Namespace::Button, window.0, entity);
        true
    }

    pub(crate) fn forget_widget(&mut self, id: WidgetId) -> Option<crate::models::Widget> {
        self.registry.remove(Entity::Widget(id));
        let widget = self.widgets.remove(id)?;
        if let Some(button) = widget.button {
            self.actions
                .push_back(DisplayAction::DestroyPanelButton(button));
        }
        Some(widget)
    }

    pub(crate) fn raise_signal(&mut self, signal: Signal) {
        self.pending_signal = Some(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;

    fn state() -> State {
        let mut state = State::new(&TestConfig::with_tags(&["one", "two", "three"]));
        state.set_screens(vec![Screen::new(Xyhw::new(0, 0, 800, 616))]);
        state.actions.clear();
        state
    }

    fn info() -> WindowInfo {
        WindowInfo {
            geometry: Xyhw::new(10, 10, 200, 100),
            ..WindowInfo::default()
        }
    }

    fn count_recomputes(state: &State) -> usize {
        state
            .actions
            .iter()
            .filter(|a| matches!(a, DisplayAction::SetVisibility { .. }))
            .count()
    }

    #[test]
    fn new_clients_take_the_current_view_tags() {
        let mut state = state();
        assert!(state.create_client(WindowHandle(1), info()));
        assert_eq!(state.clients[0].tags, state.views[0].tags);
    }

    #[test]
    fn matching_rules_tag_new_clients() {
        let mut config = TestConfig::with_tags(&["one", "two"]);
        config.tags[1].matching = Some("Firefox".to_owned());
        let mut state = State::new(&config);
        let visible = state.create_client(
            WindowHandle(1),
            WindowInfo {
                class: Some("Firefox".to_owned()),
                ..info()
            },
        );
        assert!(!visible);
        assert!(state.clients[0].tags.contains(1));
    }

    #[test]
    fn visibility_is_exactly_the_tag_intersection() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        for (i, view) in state.views.clone().iter().enumerate() {
            state.current_view = i;
            let expected = state.clients[0].tags.intersects(view.tags);
            assert_eq!(state.client_visible(WindowHandle(1)), expected);
        }
    }

    #[test]
    fn switching_to_a_view_showing_the_new_tag_reveals_the_client() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        let tag = state.add_tag("extra").unwrap();
        state.create_view("extra".to_owned(), TagMask::single(tag).unwrap());
        assert!(state.tag_client(WindowHandle(1), tag, true));
        state.tag_client(WindowHandle(1), 0, false);
        assert!(!state.client_visible(WindowHandle(1)));

        state.actions.clear();
        assert!(state.jump_view(3));
        assert!(state.client_visible(WindowHandle(1)));
        assert_eq!(count_recomputes(&state), 1);
        assert!(state.actions.contains(&DisplayAction::SetVisibility {
            shown: vec![WindowHandle(1)],
            hidden: vec![],
        }));
    }

    #[test]
    fn toggling_the_only_shared_tag_hides_the_client() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        assert!(state.tag_client(WindowHandle(1), 0, false));
        assert!(!state.client_visible(WindowHandle(1)));
        assert!(state.tag_client(WindowHandle(1), 0, true));
        assert!(state.client_visible(WindowHandle(1)));
    }

    #[test]
    fn deleting_a_tag_renumbers_clients_and_views() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        state.clients[0].tags = TagMask::from_bits(0b1110);
        assert!(state.delete_tag(1));
        assert_eq!(state.clients[0].tags, TagMask::from_bits(0b0110));
        assert_eq!(state.tags.len(), 2);
        assert_eq!(state.views[2].tags, TagMask::single(1).unwrap());
        assert_eq!(state.views[1].tags, TagMask::EMPTY);
        assert!(!state.delete_tag(7));
    }

    #[test]
    fn deleting_a_view_shifts_later_buttons_down() {
        let mut state = state();
        for (i, view) in state.views.clone().iter().enumerate() {
            state.attach_button(PanelItem::View(view.id), WindowHandle(100 + i as u64));
        }
        state.current_view = 2;
        assert!(state.delete_view(0));
        assert_eq!(state.current_view, 1);
        let panel = state.panel();
        let slots: Vec<(usize, WindowHandle)> =
            panel.views.iter().map(|b| (b.position, b.window)).collect();
        assert_eq!(slots, vec![(0, WindowHandle(101)), (1, WindowHandle(102))]);
        assert!(panel.views[1].active);
        assert_eq!(state.panel_item(WindowHandle(100)), None);
        assert!(state
            .actions
            .contains(&DisplayAction::DestroyPanelButton(WindowHandle(100))));
    }

    #[test]
    fn deleting_the_current_view_jumps_to_the_first() {
        let mut state = state();
        state.current_view = 1;
        assert!(state.delete_view(1));
        assert_eq!(state.current_view, 0);
        assert_eq!(count_recomputes(&state), 1);
    }

    #[test]
    fn the_last_view_cannot_be_deleted() {
        let mut state = state();
        assert!(state.delete_view(2));
        assert!(state.delete_view(1));
        assert!(!state.delete_view(0));
        assert!(!state.delete_view(5));
        assert_eq!(state.views.len(), 1);
    }

    #[test]
    fn jumping_to_the_current_or_an_unknown_view_does_nothing() {
        let mut state = state();
        assert!(!state.jump_view(0));
        assert!(!state.jump_view(3));
        assert!(state.actions.is_empty());
    }

    #[test]
    fn sticky_clients_follow_view_changes() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        state.toggle_mode(WindowHandle(1), ClientFlags::STICK);
        state.jump_view(1);
        assert!(state.client_visible(WindowHandle(1)));
        let tags = state.client(WindowHandle(1)).unwrap().tags;
        assert!(state
            .actions
            .contains(&DisplayAction::PublishWindowTags(WindowHandle(1), tags)));
    }

    fn stacked_pair(state: &mut State) -> Xyhw {
        for id in [1, 2] {
            state.create_client(WindowHandle(id), info());
            state.set_gravity(WindowHandle(id), Gravity::try_from(4_u8).unwrap());
        }
        state.recompute();
        state.actions.clear();
        Gravity::try_from(4_u8).unwrap().rect_in(state.screens[0].workarea)
    }

    #[test]
    fn collapsed_clients_leave_the_cell_to_their_siblings() {
        let mut state = state();
        let cell = stacked_pair(&mut state);
        assert!(state.toggle_collapse(WindowHandle(1)));
        state.recompute();
        let first = state.client(WindowHandle(1)).unwrap().geometry;
        let second = state.client(WindowHandle(2)).unwrap().geometry;
        assert_eq!(first.h, state.header_height);
        assert_eq!(second.y, cell.y + state.header_height);
        assert_eq!(second.h, cell.h - state.header_height);

        assert!(state.toggle_collapse(WindowHandle(1)));
        state.recompute();
        assert_eq!(state.client(WindowHandle(1)).unwrap().geometry.h, cell.h / 2);
    }

    #[test]
    fn weighted_clients_claim_their_share_of_the_cell() {
        let mut state = state();
        let cell = stacked_pair(&mut state);
        assert!(state.set_weight(WindowHandle(2), 75));
        state.recompute();
        let first = state.client(WindowHandle(1)).unwrap().geometry;
        let second = state.client(WindowHandle(2)).unwrap().geometry;
        assert_eq!(second.h, cell.h * 75 / 100);
        assert_eq!(first.h + second.h, cell.h);
        assert!(!state.set_weight(WindowHandle(9), 50));
    }

    #[test]
    fn removed_clients_vanish_at_once_and_are_purged_on_commit() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        state.focus = Some(WindowHandle(1));
        assert_eq!(state.remove_client(WindowHandle(1)), Some(true));
        assert!(state.client(WindowHandle(1)).is_none());
        assert_eq!(state.focus, None);
        assert_eq!(state.remove_client(WindowHandle(1)), None);
        assert_eq!(state.clients.len(), 1);
        state.commit();
        assert!(state.clients.is_empty());
    }

    #[test]
    fn tiled_clients_share_their_gravity_cell() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        state.create_client(WindowHandle(2), info());
        state.create_client(WindowHandle(3), info());
        state.toggle_mode(WindowHandle(3), ClientFlags::FLOAT);
        state.actions.clear();
        state.recompute();
        assert_eq!(state.clients[0].geometry, Xyhw::new(0, 16, 400, 600));
        assert_eq!(state.clients[1].geometry, Xyhw::new(400, 16, 400, 600));
        assert_eq!(state.clients[2].geometry, Xyhw::new(10, 10, 200, 100));
    }

    #[test]
    fn fullscreen_clients_cover_their_screen() {
        let mut state = state();
        state.create_client(WindowHandle(1), info());
        state.toggle_mode(WindowHandle(1), ClientFlags::FULL);
        state.recompute();
        assert_eq!(state.clients[0].geometry, Xyhw::new(0, 0, 800, 616));
    }

    #[test]
    fn select_prefers_the_direct_neighbour() {
        let mut state = state();
        for (id, gravity) in [(1_u64, 4_u8), (2, 6), (3, 5), (4, 9)] {
            state.create_client(WindowHandle(id), info());
            state.set_gravity(WindowHandle(id), Gravity::try_from(gravity).unwrap());
        }
        assert_eq!(state.select(Direction::Right), Some(WindowHandle(1)));
        state.focus = Some(WindowHandle(1));
        assert_eq!(state.select(Direction::Right), Some(WindowHandle(3)));
        assert_eq!(state.select(Direction::Left), None);
        state.focus = Some(WindowHandle(3));
        assert_eq!(state.select(Direction::Up), Some(WindowHandle(4)));
        assert_eq!(state.select(Direction::Down), None);
        assert_eq!(state.select(Direction::Right), Some(WindowHandle(2)));
    }
}
