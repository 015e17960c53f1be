//! Objects (such as clients and views) tracked by subtle.
mod client;
mod gravity;
mod grab;
mod manager;
mod mode;
mod screen;
mod tag;
mod tray;
mod view;
mod widget;
mod xyhw;

pub use client::{Client, ClientFlags, SizeHints};
pub use grab::{Chord, Direction, Grab, GrabAction, Grabs, Input, StackDirection};
pub use gravity::Gravity;
pub use manager::Manager;
pub use mode::{DragKind, Mode};
pub use screen::{Screen, Strut};
pub use tag::{Tag, TagMask, Tags};
pub use tray::Tray;
pub use view::{View, ViewId};
pub use widget::{Trigger, Widget, WidgetId, WidgetSpec, Widgets};
pub use xyhw::Xyhw;

use serde::{Deserialize, Serialize};

/// Server assigned identifier of a window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);
