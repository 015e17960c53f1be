//! Launching of grab commands.
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::sync::{atomic::AtomicBool, Arc};

/// Run `command` through the shell in a session of its own.
///
/// Standard streams are discarded and nothing is kept about the child, so
/// it survives a restart of the manager. Returns the pid of the shell.
pub fn exec_shell(command: &str) -> Option<u32> {
    let mut shell = Command::new("sh");
    shell
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    // SAFETY: setsid is async-signal-safe and touches no memory of the parent.
    unsafe {
        shell.pre_exec(|| {
            nix::unistd::setsid().map_err(std::io::Error::from)?;
            Ok(())
        });
    }
    match shell.spawn() {
        Ok(child) => {
            tracing::debug!("Spawned `{command}` as {}", child.id());
            Some(child.id())
        }
        Err(err) => {
            tracing::error!("Unable to run `{command}`: {err}");
            None
        }
    }
}

/// Detached children are never waited on; let the kernel reap them.
pub fn ignore_child_exits() {
    // SAFETY: installing SIG_IGN does not run any handler code.
    let ignored = unsafe {
        nix::sys::signal::signal(
            nix::sys::signal::Signal::SIGCHLD,
            nix::sys::signal::SigHandler::SigIgn,
        )
    };
    if let Err(err) = ignored {
        tracing::error!("Cannot ignore SIGCHLD: {err}");
    }
}

/// Register a handler for `signal`. Once the signal is received the flag is
/// set; the caller clears it.
pub fn register_flag(signal: i32, flag: Arc<AtomicBool>) {
    _ = signal_hook::flag::register(signal, flag)
        .map_err(|err| tracing::error!("Cannot register handler for signal {signal}: {err:?}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_run_detached() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let pid = exec_shell(&format!("touch {}", marker.display()));
        assert!(pid.is_some());
        for _ in 0..100 {
            if marker.exists() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("command did not run");
    }
}
