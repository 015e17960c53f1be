use super::WindowHandle;
use std::collections::BTreeSet;
use std::os::unix::io::RawFd;
use std::path::PathBuf;
use std::time::Duration;

/// Wait used when no timer-driven widget is scheduled.
pub const FALLBACK_WAIT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u32);

/// What makes a widget run its hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Every `interval` seconds.
    Timer,
    /// When the file changes.
    Watch(PathBuf),
    /// When the script-owned socket becomes readable.
    Socket(RawFd),
}

/// Description of a widget handed out by the script host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetSpec {
    pub name: String,
    pub hook: String,
    /// Seconds between runs of a timer widget.
    pub interval: u64,
    pub trigger: Trigger,
    /// Whether clicks on its panel button are forwarded to the hook.
    pub clickable: bool,
}

/// A script-backed panel entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Widget {
    pub id: WidgetId,
    pub name: String,
    pub hook: String,
    pub interval: u64,
    /// Next run, in seconds since the epoch. Only meaningful for timers.
    pub due: u64,
    pub trigger: Trigger,
    pub clickable: bool,
    pub text: String,
    pub button: Option<WindowHandle>,
}

impl Widget {
    #[must_use]
    pub const fn is_timer(&self) -> bool {
        matches!(self.trigger, Trigger::Timer)
    }
}

/// Arena of widgets plus the run schedule of the timer-driven ones.
///
/// The schedule only ever holds timer widgets, so the earliest entry always
/// decides the next wake up.
#[derive(Debug, Default)]
pub struct Widgets {
    arena: Vec<Option<Widget>>,
    schedule: BTreeSet<(u64, WidgetId)>,
}

impl Widgets {
    pub fn insert(&mut self, spec: WidgetSpec, now: u64) -> WidgetId {
        let id = WidgetId(self.arena.len() as u32);
        let widget = Widget {
            id,
            name: spec.name,
            hook: spec.hook,
            interval: spec.interval.max(1),
            due: now,
            trigger: spec.trigger,
            clickable: spec.clickable,
            text: String::new(),
            button: None,
        };
        if widget.is_timer() {
            self.schedule.insert((widget.due, id));
        }
        self.arena.push(Some(widget));
        id
    }

    pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        let widget = self.arena.get_mut(id.0 as usize)?.take()?;
        self.schedule.remove(&(widget.due, id));
        Some(widget)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.arena.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.arena.get_mut(id.0 as usize)?.as_mut()
    }

    /// Live widgets in creation order, which is also their panel order.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.arena.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every timer widget due at `now` off the schedule, earliest first.
    pub fn pop_due(&mut self, now: u64) -> Vec<WidgetId> {
        let mut due = vec![];
        while let Some(&(at, id)) = self.schedule.first() {
            if at > now {
                break;
            }
            self.schedule.remove(&(at, id));
            due.push(id);
        }
        due
    }

    /// Put a timer widget back on the schedule one interval after `now`,
    /// aligned down to a multiple of its interval.
    pub fn reschedule(&mut self, id: WidgetId, now: u64) {
        let Some(widget) = self.arena.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };
        if !widget.is_timer() {
            return;
        }
        self.schedule.remove(&(widget.due, id));
        let due = now + widget.interval;
        widget.due = due - due % widget.interval;
        self.schedule.insert((widget.due, id));
    }

    /// Run `id` again as soon as the loop wakes up.
    pub fn schedule_now(&mut self, id: WidgetId, now: u64) {
        let Some(widget) = self.arena.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };
        if !widget.is_timer() {
            return;
        }
        self.schedule.remove(&(widget.due, id));
        widget.due = now;
        self.schedule.insert((now, id));
    }

    /// How long the loop may sleep before the next timer is due.
    pub fn next_timeout(&self, now: u64) -> Duration {
        self.schedule
            .first()
            .map_or(FALLBACK_WAIT, |&(due, _)| Duration::from_secs(due.saturating_sub(now)))
    }

    /// Due times in schedule order.
    pub fn schedule(&self) -> impl Iterator<Item = (u64, WidgetId)> + '_ {
        self.schedule.iter().copied()
    }
}
