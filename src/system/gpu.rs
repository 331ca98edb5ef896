//! GPU detection
//!
//! Detects CUDA GPUs and their VRAM for device placement decisions.

use std::process::Command;

/// GPU information
#[derive(Debug, Clone, Default)]
pub struct GpuInfo {
    pub name: String,
    pub vram_total_mb: u64,
    pub vram_used_mb: u64,
    pub is_available: bool,
}

impl GpuInfo {
    /// Total VRAM rounded down to whole gigabytes.
    pub fn vram_total_gb(&self) -> u64 {
        self.vram_total_mb / 1024
    }
}

/// Detect a CUDA GPU (best effort).
///
/// Probes `nvidia-smi`; any failure (binary missing, driver down, garbled
/// output) yields a "not available" result rather than an error.
pub fn detect_gpu() -> GpuInfo {
    if let Some(info) = detect_gpu_nvidia_smi() {
        return info;
    }

    GpuInfo {
        name: "None".to_string(),
        vram_total_mb: 0,
        vram_used_mb: 0,
        is_available: false,
    }
}

fn detect_gpu_nvidia_smi() -> Option<GpuInfo> {
    let output = Command::new("nvidia-smi")
        .args([
            "--query-gpu=name,memory.total,memory.used",
            "--format=csv,noheader,nounits",
        ])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the first device line of `nvidia-smi --query-gpu` CSV output.
fn parse_nvidia_smi(stdout: &str) -> Option<GpuInfo> {
    let line = stdout.lines().find(|l| !l.trim().is_empty())?;
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() < 3 {
        return None;
    }

    let name = parts[0].to_string();
    let vram_total_mb = parts[1].parse::<u64>().ok()?;
    let vram_used_mb = parts[2].parse::<u64>().ok()?;

    Some(GpuInfo {
        name,
        vram_total_mb,
        vram_used_mb,
        is_available: true,
    })
}
