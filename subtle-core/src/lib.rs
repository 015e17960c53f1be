//! Window tracking, tiling and event dispatch for subtle.
// We deny clippy pedantic lints, primarily to keep code as correct as possible.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
pub mod config;
mod display_action;
mod display_event;
pub mod display_servers;
pub mod errors;
mod event_loop;
mod handlers;
pub mod models;
pub mod registry;
pub mod script;
pub mod state;
pub mod tiling;
pub mod utils;

pub use config::Config;
pub use display_action::{
    DisplayAction, Panel, PanelButton, PanelItem, WmStateValue, XembedMessage,
};
pub use display_event::{
    ConfigureRequest, CrossingTarget, DisplayEvent, FocusChange, FocusDetail, FocusMode,
    MessageTarget, PropertyChange, RootMessage, TrayMessage, WindowInfo, WindowMessage, WmState,
};
pub use display_servers::DisplayServer;
pub use event_loop::LoopExit;
pub use models::Manager;
pub use script::{HookArg, ScriptHost};
pub use state::State;
pub use utils::child_process;
