use std::{
    ffi::OsStr,
    io::{self, Read},
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Returns a std::process::Command from a given command and it's arguments
pub fn get_launch_command<'a>(
    command: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = &'a str>,
    env_vars: impl IntoIterator<Item = (&'a str, &'a OsStr)>,
) -> Command {
    let mut command = Command::new(command);
    command.envs(env_vars).args(args);

    command
}

/// Stops a console window from flashing up when a console program is started from a GUI
/// process. Does nothing outside of Windows.
pub fn hide_console_window(command: &mut Command) -> &mut Command {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;

        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    command
}

/// Output of a process which exited before its deadline
#[derive(Debug)]
pub struct TimedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the command to completion, killing it if it is still running once `timeout` has passed
///
/// Returns `Ok(None)` if the process had to be killed.
pub fn run_with_timeout(
    command: &mut Command,
    timeout: Duration,
) -> Result<Option<TimedOutput>, io::Error> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Pipes are drained on their own threads so a chatty process can't fill them and stall
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    loop {
        let status = match child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(e);
            }
        };

        if let Some(status) = status {
            return Ok(Some(TimedOutput {
                status,
                stdout: collect(stdout),
                stderr: collect(stderr),
            }));
        }

        if Instant::now() >= deadline {
            tracing::debug!("Killing process which ran past its {timeout:?} deadline: {command:?}");
            // The reader threads are left detached, a grandchild may still hold the pipes open
            kill_and_reap(&mut child);
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Kills the child if it is still running and waits for it, so it never lingers as a zombie
pub fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Spawns the command without waiting for it, returning its process id. The child is waited on
/// from a background thread once it exits.
pub fn spawn_detached(command: &mut Command) -> Result<u32, io::Error> {
    let mut child = command.spawn()?;
    let pid = child.id();
    thread::spawn(move || child.wait());

    Ok(pid)
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            String::from_utf8_lossy(&buffer).into_owned()
        })
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
