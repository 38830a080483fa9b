//! Unix daemon management for the query server.
//!
//! Double-fork daemonization with a PID file so `lineq daemon
//! start/stop/status` can manage a background instance. The daemon
//! itself is just [`Server::serve`] with stdio detached.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use super::Server;
use crate::config::Config;

/// Where daemon startup errors land once stdio is detached.
const ERROR_LOG: &str = "/tmp/lineqd-error.log";

/// Get the PID file path for the daemon.
/// Uses a per-user runtime directory for security.
pub fn pid_path() -> PathBuf {
    // Try XDG_RUNTIME_DIR first (most secure, tmpfs-backed)
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("lineqd.pid");
    }

    // Fall back to user's home directory
    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("run").join("lineqd.pid");
    }

    // Last resort: /tmp with user ID
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/lineqd-{}.pid", uid))
}

/// Check if the daemon is running.
pub fn is_running() -> bool {
    let pid_path = pid_path();
    if !pid_path.exists() {
        return false;
    }

    // Read PID and check if process exists using kill(pid, 0)
    if let Ok(pid_str) = fs::read_to_string(&pid_path) {
        if let Ok(pid) = pid_str.trim().parse::<i32>() {
            unsafe {
                return libc::kill(pid, 0) == 0;
            }
        }
    }

    false
}

/// Run the server in the foreground, managing the PID file.
pub fn run_foreground(config: &Config) -> Result<()> {
    let server = Server::bind(config)?;
    write_pid_file()?;

    let result = server.serve();

    let _ = fs::remove_file(pid_path());
    result
}

fn write_pid_file() -> Result<()> {
    let pid_path = pid_path();
    if let Some(parent) = pid_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&pid_path, format!("{}", std::process::id()))
        .with_context(|| format!("failed to write PID file {}", pid_path.display()))
}

/// Daemonize the current process and run the server in the grandchild.
pub fn daemonize(config: Config) -> Result<()> {
    // The daemon changes its working directory, so relative corpus and
    // TLS paths must be pinned first.
    let config = resolve_paths(config);

    // Double-fork so the daemon cannot reacquire a controlling terminal
    match unsafe { libc::fork() } {
        -1 => bail!("first fork failed"),
        0 => {
            // Child process: create a new session
            if unsafe { libc::setsid() } == -1 {
                bail!("setsid failed");
            }

            match unsafe { libc::fork() } {
                -1 => bail!("second fork failed"),
                0 => {
                    // Grandchild: this becomes the daemon. Detach stdio.
                    unsafe {
                        libc::close(0);
                        libc::close(1);
                        libc::close(2);

                        let null = libc::open(c"/dev/null".as_ptr(), libc::O_RDWR);
                        if null != -1 {
                            libc::dup2(null, 0);
                            libc::dup2(null, 1);
                            libc::dup2(null, 2);
                            if null > 2 {
                                libc::close(null);
                            }
                        }
                    }

                    // Change to root directory to avoid holding mounts
                    let _ = std::env::set_current_dir("/");

                    if let Err(err) = run_foreground(&config) {
                        // stdio is gone; leave a trace on disk
                        let _ = fs::write(ERROR_LOG, format!("{err:#}"));
                    }
                    std::process::exit(0);
                }
                _ => {
                    // First child exits immediately
                    std::process::exit(0);
                }
            }
        }
        _ => {
            // Parent: reap the first child, then return
            unsafe {
                let mut status: libc::c_int = 0;
                libc::wait(&mut status);
            }
            Ok(())
        }
    }
}

/// Stop the running daemon. Returns false when none was running.
pub fn stop() -> Result<bool> {
    let pid_path = pid_path();

    if !pid_path.exists() {
        return Ok(false);
    }

    let pid_str = fs::read_to_string(&pid_path)?;
    let pid: i32 = pid_str.trim().parse().context("corrupt PID file")?;

    // SIGTERM first, SIGKILL only if it lingers
    unsafe {
        if libc::kill(pid, libc::SIGTERM) == 0 {
            thread::sleep(Duration::from_millis(500));

            if libc::kill(pid, 0) == 0 {
                thread::sleep(Duration::from_secs(1));
                if libc::kill(pid, 0) == 0 {
                    libc::kill(pid, libc::SIGKILL);
                }
            }
        }
    }

    let _ = fs::remove_file(&pid_path);

    Ok(true)
}

fn resolve_paths(mut config: Config) -> Config {
    for path in [
        &mut config.corpus_path,
        &mut config.certfile,
        &mut config.keyfile,
    ] {
        if let Ok(absolute) = path.canonicalize() {
            *path = absolute;
        }
    }
    config
}
