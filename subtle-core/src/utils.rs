//! Helpers shared by the manager and the display servers.
pub mod child_process;
pub mod modmask_lookup;
pub mod notifier;
