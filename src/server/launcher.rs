//! SGLang server launcher
//!
//! Builds the launch command for `python -m sglang.launch_server` and
//! manages the child process lifecycle.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::system::Placement;
use crate::types::ModelPreset;

/// How long shutdown waits for the server process to die.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(10);

/// Errors from launching the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start SGLang server: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The exact command line and environment for one server launch.
///
/// Kept separate from spawning so argv assembly stays a pure, testable step.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    /// Value for CUDA_VISIBLE_DEVICES: "0" in GPU mode, "" in CPU mode
    pub cuda_visible_devices: String,
}

impl LaunchPlan {
    pub fn new(model_path: &Path, port: u16, placement: &Placement, preset: &ModelPreset) -> Self {
        let mut args = vec![
            "-m".to_string(),
            "sglang.launch_server".to_string(),
            "--model-path".to_string(),
            model_path.display().to_string(),
            "--port".to_string(),
            port.to_string(),
            "--host".to_string(),
            "127.0.0.1".to_string(),
        ];

        if preset.trust_remote_code {
            args.push("--trust-remote-code".to_string());
        }

        if placement.use_gpu {
            args.push("--device".to_string());
            args.push("cuda".to_string());
            args.push("--mem-fraction-static".to_string());
            let fraction = if placement.tight_memory {
                // Below the comfortable VRAM threshold, leave less headroom
                (preset.mem_fraction_static - 0.05).max(0.5)
            } else {
                preset.mem_fraction_static
            };
            args.push(format!("{fraction}"));
        } else {
            args.push("--device".to_string());
            args.push("cpu".to_string());
        }

        Self {
            program: "python3".to_string(),
            args,
            cuda_visible_devices: if placement.use_gpu { "0" } else { "" }.to_string(),
        }
    }

    /// The command as a printable shell-ish string, for the startup log.
    pub fn display(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// A running server child process
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    pub port: u16,
}

/// Spawn the server in the background with piped output.
pub fn spawn(plan: &LaunchPlan, port: u16) -> Result<ServerHandle, ServerError> {
    tracing::info!(command = %plan.display(), "starting SGLang server");

    let child = Command::new(&plan.program)
        .args(&plan.args)
        .env("CUDA_VISIBLE_DEVICES", &plan.cuda_visible_devices)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    Ok(ServerHandle { child, port })
}

impl ServerHandle {
    /// True while the child has not exited on its own.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the server and wait (bounded) for it to exit.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.start_kill() {
            tracing::warn!("failed to signal server process: {e}");
            return;
        }

        match tokio::time::timeout(SHUTDOWN_WAIT, self.child.wait()).await {
            Ok(Ok(status)) => tracing::info!("server exited with {status}"),
            Ok(Err(e)) => tracing::warn!("error waiting for server exit: {e}"),
            Err(_) => tracing::warn!("server did not exit within {}s", SHUTDOWN_WAIT.as_secs()),
        }
    }
}

/// Check that the sglang Python package is importable.
///
/// The server is externally owned; all we can do up front is verify the
/// module exists in the active Python environment.
pub fn check_sglang_installed() -> bool {
    std::process::Command::new("python3")
        .args(["-c", "import sglang"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
