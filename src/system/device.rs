//! Device placement
//!
//! Decides whether the server runs on GPU or CPU from the user's flags,
//! the detected GPU, and the model's VRAM needs.

use crate::system::gpu::GpuInfo;
use crate::types::ModelPreset;

/// What the user asked for on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    /// Pick based on detected hardware
    Auto,
    /// `--gpu`
    ForceGpu,
    /// `--cpu`
    ForceCpu,
}

/// The placement decision and why it was made
#[derive(Debug, Clone)]
pub struct Placement {
    pub use_gpu: bool,
    /// GPU mode with VRAM below the comfortable threshold; the launcher
    /// should apply aggressive memory settings.
    pub tight_memory: bool,
    /// Human-readable explanation, logged exactly once by the caller
    pub reason: String,
}

impl Placement {
    fn cpu(reason: impl Into<String>) -> Self {
        Self {
            use_gpu: false,
            tight_memory: false,
            reason: reason.into(),
        }
    }

    fn gpu(tight_memory: bool, reason: impl Into<String>) -> Self {
        Self {
            use_gpu: true,
            tight_memory,
            reason: reason.into(),
        }
    }
}

/// Decide GPU vs CPU placement.
///
/// Forced CPU always wins. Forced GPU degrades to CPU (with a warning
/// reason) when no CUDA device was detected, it never aborts. Auto mode
/// compares detected VRAM against the preset's thresholds.
pub fn select_device(
    preference: DevicePreference,
    gpu: &GpuInfo,
    preset: &ModelPreset,
) -> Placement {
    match preference {
        DevicePreference::ForceCpu => Placement::cpu("CPU mode (forced)"),
        DevicePreference::ForceGpu => {
            if gpu.is_available {
                Placement::gpu(
                    false,
                    format!("GPU mode (forced): {} ({}GB)", gpu.name, gpu.vram_total_gb()),
                )
            } else {
                Placement::cpu("GPU requested but CUDA not available, falling back to CPU")
            }
        }
        DevicePreference::Auto => select_auto(gpu, preset),
    }
}

fn select_auto(gpu: &GpuInfo, preset: &ModelPreset) -> Placement {
    if !gpu.is_available {
        return Placement::cpu("CPU mode (no CUDA detected)");
    }

    let vram_gb = gpu.vram_total_gb();
    if vram_gb >= preset.vram_comfortable_gb {
        return Placement::gpu(
            false,
            format!("Auto-selected GPU mode: {} ({}GB)", gpu.name, vram_gb),
        );
    }

    if let Some(tight_gb) = preset.vram_tight_gb {
        if vram_gb >= tight_gb {
            return Placement::gpu(
                true,
                format!(
                    "GPU has {}GB VRAM - might be tight for {}, using aggressive memory optimization",
                    vram_gb, preset.name
                ),
            );
        }
    }

    Placement::cpu(format!(
        "GPU has only {}GB VRAM ({} typically needs {}GB+), using CPU mode",
        vram_gb, preset.name, preset.vram_comfortable_gb
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::model::{GPT_OSS_20B, QWEN3_30B};

    fn gpu_with(vram_gb: u64) -> GpuInfo {
        GpuInfo {
            name: "Test GPU".to_string(),
            vram_total_mb: vram_gb * 1024,
            vram_used_mb: 0,
            is_available: true,
        }
    }

    fn no_gpu() -> GpuInfo {
        GpuInfo::default()
    }

    #[test]
    fn test_forced_cpu_wins_even_with_gpu() {
        let p = select_device(DevicePreference::ForceCpu, &gpu_with(80), &GPT_OSS_20B);
        assert!(!p.use_gpu);
    }

    #[test]
    fn test_forced_gpu_without_cuda_falls_back() {
        let p = select_device(DevicePreference::ForceGpu, &no_gpu(), &GPT_OSS_20B);
        assert!(!p.use_gpu);
        assert!(p.reason.contains("falling back"));
    }

    #[test]
    fn test_forced_gpu_ignores_thresholds() {
        let p = select_device(DevicePreference::ForceGpu, &gpu_with(8), &QWEN3_30B);
        assert!(p.use_gpu);
        assert!(!p.tight_memory);
    }

    #[test]
    fn test_auto_comfortable_vram_selects_gpu() {
        let p = select_device(DevicePreference::Auto, &gpu_with(24), &GPT_OSS_20B);
        assert!(p.use_gpu);
        assert!(!p.tight_memory);
    }

    #[test]
    fn test_auto_insufficient_vram_selects_cpu() {
        let p = select_device(DevicePreference::Auto, &gpu_with(16), &GPT_OSS_20B);
        assert!(!p.use_gpu);
        assert!(p.reason.contains("16GB"));
    }

    #[test]
    fn test_auto_tight_band_selects_gpu_tight() {
        let p = select_device(DevicePreference::Auto, &gpu_with(24), &QWEN3_30B);
        assert!(p.use_gpu);
        assert!(p.tight_memory);
    }

    #[test]
    fn test_auto_below_tight_band_selects_cpu() {
        let p = select_device(DevicePreference::Auto, &gpu_with(20), &QWEN3_30B);
        assert!(!p.use_gpu);
    }

    #[test]
    fn test_auto_no_cuda_selects_cpu() {
        let p = select_device(DevicePreference::Auto, &no_gpu(), &QWEN3_30B);
        assert!(!p.use_gpu);
        assert!(p.reason.contains("no CUDA"));
    }
}
