use anyhow::{bail, Result};
use clap::{arg, command};
use std::path::PathBuf;
use subtle_core::script::NoScripts;
use subtle_core::{LoopExit, Manager};
use xlib_display_server::XlibDisplayServer;

fn main() -> Result<()> {
    let matches = command!()
        .about("A grid-based tiling window manager")
        .args(&[
            arg!(-d --display <DISPLAY> "Connect to DISPLAY instead of $DISPLAY").required(false),
            arg!(-c --config <FILE> "Read the configuration from FILE").required(false),
            arg!(-l --"log-level" <FILTER> "Log filter used when RUST_LOG is unset")
                .required(false),
            arg!(-k --check "Check the configuration and exit"),
        ])
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = subtle::load(config_path.as_deref())?;

    let log_level = matches
        .get_one::<String>("log-level")
        .unwrap_or(&config.log_level);
    subtle::utils::log::setup_logging(log_level);
    if config_path.is_none() && subtle::default_path()?.is_none() {
        tracing::info!("No config.toml found, using the default configuration");
    }

    if matches.get_flag("check") {
        let problems = config.check(xlib_display_server::keysym_from_name);
        if problems.is_empty() {
            println!("\x1b[0;92m    -> Configuration OK\x1b[0m");
            return Ok(());
        }
        for problem in &problems {
            println!("\x1b[1;91mERROR:\x1b[0m {problem}");
        }
        bail!("{} problem(s) found in the configuration", problems.len());
    }

    tracing::info!("subtle {} booting...", env!("CARGO_PKG_VERSION"));

    let display = matches.get_one::<String>("display").map(String::as_str);
    let server = match XlibDisplayServer::open(display, config.panel_height) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!("Can't start: {err}");
            std::process::exit(1);
        }
    };

    let mut manager = Manager::new(config, server, Box::new(NoScripts));
    manager.register_signal_hooks();
    manager.scan();

    let result = run(&mut manager, config_path.as_deref());
    manager.shutdown();
    tracing::info!("Completed");
    result
}

/// Run the event loop until a quit, reloading the configuration in between.
fn run(
    manager: &mut Manager<subtle::Config, XlibDisplayServer>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    loop {
        match manager.event_loop()? {
            LoopExit::Reload => match subtle::load(config_path) {
                Ok(config) => manager.reload(config),
                Err(err) => tracing::warn!("Keeping the current configuration: {err:#}"),
            },
            LoopExit::Quit => return Ok(()),
        }
    }
}
