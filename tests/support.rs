use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Environment variables the binary reads; cleared so the host environment
/// cannot leak into a test run.
const CONFIG_ENV: [&str; 15] = [
    "NODE_NAME",
    "BENCHMARK_INTERVAL_HOURS",
    "NODEBENCH_LISTEN",
    "BENCHMARK_BIN",
    "BENCHMARK_ARGS",
    "BENCHMARK_TIMEOUT_SECS",
    "SERVICE_NAME",
    "AGENT_PORT",
    "NODEBENCH_OUTPUT",
    "POLICIES_ID",
    "FETCH_TIMEOUT_SECS",
    "FETCH_CONCURRENCY",
    "SORT_PEERS",
    "ALLOW_PARTIAL",
    "NODEBENCH_LOG",
];

fn nodebench_command<I, S>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(nodebench_bin()?);
    for name in CONFIG_ENV {
        command.env_remove(name);
    }
    command.args(args).env("RUST_LOG", "error");
    Ok(command)
}

/// Run the `nodebench` binary to completion and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_nodebench<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    nodebench_command(args)?
        .output()
        .map_err(|err| format!("run nodebench failed: {}", err))
}

/// Spawn the `nodebench` binary in the background.
///
/// # Errors
///
/// Returns an error if the process cannot be started.
pub fn spawn_nodebench<I, S>(args: I) -> Result<Child, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    nodebench_command(args)?
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| format!("spawn nodebench failed: {}", err))
}

/// Kills the wrapped child when dropped so failing tests never leak agents.
pub struct ChildGuard(pub Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        drop(self.0.kill());
        drop(self.0.wait());
    }
}

/// Wait for a child process to exit.
///
/// # Errors
///
/// Returns an error if waiting fails or the timeout is exceeded.
pub fn wait_for_exit(child: &mut Child, timeout: Duration) -> Result<ExitStatus, String> {
    let start = Instant::now();
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|err| format!("wait failed: {}", err))?
        {
            return Ok(status);
        }
        if start.elapsed() > timeout {
            drop(child.kill());
            return Err("process timed out".to_owned());
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Sends SIGTERM to `child`.
///
/// # Errors
///
/// Returns an error if `kill` cannot be run or reports failure.
pub fn terminate(child: &Child) -> Result<(), String> {
    let status = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()
        .map_err(|err| format!("run kill failed: {}", err))?;
    if !status.success() {
        return Err(format!("kill exited with {}", status));
    }
    Ok(())
}

/// Pick an available local TCP port.
///
/// # Errors
///
/// Returns an error if a local port cannot be allocated.
pub fn pick_port() -> Result<u16, String> {
    TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind port failed: {}", err))?
        .local_addr()
        .map_err(|err| format!("port addr failed: {}", err))
        .map(|addr| addr.port())
}

/// Issue `GET /` against a local port and return status and body.
///
/// # Errors
///
/// Returns an error if the exchange fails or the response is malformed.
pub fn http_get(port: u16, path: &str) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port))
        .map_err(|err| format!("connect failed: {}", err))?;
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .map_err(|err| format!("set timeout failed: {}", err))?;
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n",
        path
    );
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write failed: {}", err))?;
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .map_err(|err| format!("read failed: {}", err))?;
    let (head, body) = response
        .split_once("\r\n\r\n")
        .ok_or_else(|| "missing header terminator".to_owned())?;
    let status = head
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| "missing status".to_owned())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status: {}", err))?;
    Ok((status, body.to_owned()))
}

/// Poll `GET /` until the agent answers with a body containing `needle`.
///
/// # Errors
///
/// Returns the last failure once `timeout` is exceeded.
pub fn wait_for_report(port: u16, needle: &str, timeout: Duration) -> Result<String, String> {
    let start = Instant::now();
    loop {
        let last = match http_get(port, "/") {
            Ok((200, body)) if body.contains(needle) => return Ok(body),
            Ok((status, body)) => format!("status {}: {}", status, body),
            Err(err) => err,
        };
        if start.elapsed() > timeout {
            return Err(format!("agent never served report: {}", last));
        }
        thread::sleep(Duration::from_millis(100));
    }
}

/// Write an executable shell script standing in for the benchmark tool.
///
/// # Errors
///
/// Returns an error if the script cannot be written or made executable.
#[cfg(unix)]
pub fn write_fake_tool(dir: &std::path::Path, stdout: &str) -> Result<String, String> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-bench.sh");
    let script = format!("#!/bin/sh\ncat <<'JSON'\n{}\nJSON\n", stdout);
    std::fs::write(&path, script).map_err(|err| format!("write script failed: {}", err))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .map_err(|err| format!("chmod failed: {}", err))?;
    Ok(path.to_string_lossy().into_owned())
}

fn nodebench_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_nodebench").map_or_else(
        || Err("CARGO_BIN_EXE_nodebench missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
