//! The seam to the scripting subsystem that backs widgets and script grabs.
use crate::models::{WidgetId, WidgetSpec, WindowHandle};

/// Argument passed along with a hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookArg {
    None,
    Window(WindowHandle),
    Widget(WidgetId),
    Click { widget: WidgetId, button: u32 },
}

pub trait ScriptHost {
    /// Run `hook`. The returned value is only logged.
    fn invoke(&mut self, hook: &str, arg: HookArg) -> Option<String>;

    /// Build a widget from its definition.
    fn load_widget(&mut self, source: &str) -> Option<WidgetSpec>;

    /// The widget is gone; release whatever backs it.
    fn unload_widget(&mut self, _widget: WidgetId) {}
}

/// Host used when no scripting backend is configured.
#[derive(Debug, Default)]
pub struct NoScripts;

impl ScriptHost for NoScripts {
    fn invoke(&mut self, hook: &str, arg: HookArg) -> Option<String> {
        tracing::debug!("No script host for hook {hook} ({arg:?})");
        None
    }

    fn load_widget(&mut self, source: &str) -> Option<WidgetSpec> {
        tracing::warn!("No script host to load widget {source}");
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    pub type Calls = Rc<RefCell<Vec<(String, HookArg)>>>;

    /// Records every invocation and serves widgets from a table.
    #[derive(Default)]
    pub struct RecordingHost {
        pub calls: Calls,
        pub widgets: HashMap<String, WidgetSpec>,
    }

    impl ScriptHost for RecordingHost {
        fn invoke(&mut self, hook: &str, arg: HookArg) -> Option<String> {
            self.calls.borrow_mut().push((hook.to_owned(), arg));
            Some(format!("{hook} ran"))
        }

        fn load_widget(&mut self, source: &str) -> Option<WidgetSpec> {
            self.widgets.get(source).cloned()
        }
    }
}
