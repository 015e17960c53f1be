//! Lookup from server assigned identifiers to the entities that own them.
//!
//! Handlers regularly remove the entity they are processing. Removal only
//! retires an entry, which hides it from lookups right away; the entry is
//! dropped by [`Registry::commit`] once the dispatch step is over.
use crate::models::{ViewId, WidgetId, WindowHandle};
use std::collections::HashMap;

/// Identifier space a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Client,
    Tray,
    /// Panel buttons of views and widgets.
    Button,
    /// Descriptors of widget sockets.
    Socket,
    /// Keys of file watches.
    Watch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Client(WindowHandle),
    Tray(WindowHandle),
    View(ViewId),
    Widget(WidgetId),
}

#[derive(Debug)]
struct Entry {
    entity: Entity,
    retired: bool,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<(Namespace, u64), Entry>,
}

impl Registry {
    /// Map `id` in `namespace` to `entity`, replacing whatever was there.
    pub fn register(&mut self, namespace: Namespace, id: u64, entity: Entity) {
        let replaced = self.entries.insert(
            (namespace, id),
            Entry {
                entity,
                retired: false,
            },
        );
        if let Some(old) = replaced.filter(|old| !old.retired) {
            tracing::debug!("{namespace:?} {id} moved from {:?} to {entity:?}", old.entity);
        }
    }

    pub fn find(&self, namespace: Namespace, id: u64) -> Option<Entity> {
        self.entries
            .get(&(namespace, id))
            .filter(|e| !e.retired)
            .map(|e| e.entity)
    }

    pub fn contains(&self, namespace: Namespace, id: u64) -> bool {
        self.find(namespace, id).is_some()
    }

    /// Retire a single key.
    pub fn retire(&mut self, namespace: Namespace, id: u64) -> Option<Entity> {
        let entry = self.entries.get_mut(&(namespace, id)).filter(|e| !e.retired)?;
        entry.retired = true;
        Some(entry.entity)
    }

    /// Retire every key that points at `entity`.
    pub fn remove(&mut self, entity: Entity) -> usize {
        let mut count = 0;
        for entry in self.entries.values_mut() {
            if entry.entity == entity && !entry.retired {
                entry.retired = true;
                count += 1;
            }
        }
        count
    }

    /// Drop retired entries. Called at the end of every dispatch step.
    pub fn commit(&mut self) {
        self.entries.retain(|_, e| !e.retired);
    }

    /// Live keys of `namespace`.
    pub fn keys(&self, namespace: Namespace) -> impl Iterator<Item = u64> + '_ {
        self.entries
            .iter()
            .filter(move |((ns, _), e)| *ns == namespace && !e.retired)
            .map(|((_, id), _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| !e.retired).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_keep_identical_ids_apart() {
        let mut registry = Registry::default();
        registry.register(Namespace::Client, 7, Entity::Client(WindowHandle(7)));
        registry.register(Namespace::Button, 7, Entity::View(ViewId(0)));
        assert_eq!(
            registry.find(Namespace::Client, 7),
            Some(Entity::Client(WindowHandle(7)))
        );
        assert_eq!(registry.find(Namespace::Button, 7), Some(Entity::View(ViewId(0))));
        assert_eq!(registry.find(Namespace::Tray, 7), None);
    }

    #[test]
    fn retired_entries_disappear_before_commit() {
        let mut registry = Registry::default();
        registry.register(Namespace::Client, 1, Entity::Client(WindowHandle(1)));
        assert!(registry.retire(Namespace::Client, 1).is_some());
        assert_eq!(registry.find(Namespace::Client, 1), None);
        assert_eq!(registry.retire(Namespace::Client, 1), None);
        assert!(registry.is_empty());
        registry.commit();
        assert!(registry.entries.is_empty());
    }

    #[test]
    fn remove_retires_every_key_of_an_entity() {
        let mut registry = Registry::default();
        let widget = Entity::Widget(WidgetId(3));
        registry.register(Namespace::Button, 40, widget);
        registry.register(Namespace::Socket, 12, widget);
        registry.register(Namespace::Client, 5, Entity::Client(WindowHandle(5)));
        assert_eq!(registry.remove(widget), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.keys(Namespace::Socket).count(), 0);
    }

    #[test]
    fn re_registering_a_retired_key_revives_it() {
        let mut registry = Registry::default();
        registry.register(Namespace::Client, 1, Entity::Client(WindowHandle(1)));
        registry.retire(Namespace::Client, 1);
        registry.register(Namespace::Client, 1, Entity::Client(WindowHandle(1)));
        registry.commit();
        assert!(registry.contains(Namespace::Client, 1));
    }
}
