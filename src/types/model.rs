//! Model presets
//!
//! Static descriptions of the supported models: where to find them in the
//! hub cache, how to launch the server for them, and how to sample.

/// Everything the launcher and chat loop need to know about one model.
#[derive(Debug, Clone)]
pub struct ModelPreset {
    /// Short name used on the CLI and in log output
    pub name: &'static str,
    /// HuggingFace repo id, `org/name`
    pub repo: &'static str,
    /// Default server port when `--port` is not given
    pub default_port: u16,
    /// Maximum tokens per response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold, when the model benefits from one
    pub top_p: Option<f32>,
    /// Per-request timeout for chat completions, in seconds
    pub request_timeout_secs: u64,
    /// `--mem-fraction-static` passed to the server in GPU mode
    pub mem_fraction_static: f32,
    /// Whether the server needs `--trust-remote-code`
    pub trust_remote_code: bool,
    /// VRAM (GB) at which GPU mode is auto-selected
    pub vram_comfortable_gb: u64,
    /// VRAM (GB) at which GPU mode is still possible with aggressive
    /// memory settings. None means there is no tight band for this model.
    pub vram_tight_gb: Option<u64>,
    /// What to tell the user about CPU-mode response latency
    pub cpu_latency_hint: &'static str,
}

/// GPT-OSS-20B: good balance of speed and quality, ~24GB+ VRAM for GPU.
pub const GPT_OSS_20B: ModelPreset = ModelPreset {
    name: "gpt-oss-20b",
    repo: "openai/gpt-oss-20b",
    default_port: 30001,
    max_tokens: 512,
    temperature: 0.7,
    top_p: None,
    request_timeout_secs: 60,
    mem_fraction_static: 0.9,
    trust_remote_code: true,
    vram_comfortable_gb: 24,
    vram_tight_gb: None,
    cpu_latency_hint: "30-60 seconds",
};

/// Qwen3-30B-A3B-Instruct-2507: strong at reasoning and coding,
/// ~40GB+ VRAM for comfortable GPU inference.
pub const QWEN3_30B: ModelPreset = ModelPreset {
    name: "qwen3-30b",
    repo: "Qwen/Qwen3-30B-A3B-Instruct-2507",
    default_port: 30002,
    max_tokens: 1024,
    temperature: 0.7,
    top_p: Some(0.8),
    request_timeout_secs: 90,
    mem_fraction_static: 0.85,
    trust_remote_code: false,
    vram_comfortable_gb: 40,
    vram_tight_gb: Some(24),
    cpu_latency_hint: "1-3 minutes",
};

/// All supported presets, in CLI listing order.
pub const PRESETS: &[&ModelPreset] = &[&GPT_OSS_20B, &QWEN3_30B];

/// Look up a preset by its CLI name.
pub fn find_preset(name: &str) -> Option<&'static ModelPreset> {
    PRESETS.iter().copied().find(|p| p.name == name)
}

/// Names of all supported presets, for CLI help and value validation.
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}
