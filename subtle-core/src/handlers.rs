mod client_message_handler;
pub mod display_event_handler;
mod focus_handler;
mod grab_handler;
pub(crate) mod widget_handler;
mod window_handler;

use super::config::Config;
use super::models::{Manager, WindowHandle};
use super::DisplayEvent;
