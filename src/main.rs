//! sglchat CLI
//!
//! Subcommands:
//!   chat     — launch the SGLang server for a model and chat with it
//!   harmony  — demo the Harmony prompt encoding for gpt-oss models

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sglchat::chat::{confirm_cpu_mode, console, run_chat_loop};
use sglchat::client::ChatClient;
use sglchat::harmony;
use sglchat::server::{self, LaunchPlan};
use sglchat::storage::{self, HubError};
use sglchat::system::{self, DevicePreference};
use sglchat::types::find_preset;

/// Interval between health probes.
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(
    name = "sglchat",
    about = "Chat with a local model served by SGLang",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the server for a model and start an interactive chat.
    Chat {
        /// Which model to serve.
        #[arg(long, value_parser = ["gpt-oss-20b", "qwen3-30b"], default_value = "gpt-oss-20b")]
        model: String,

        /// Force GPU mode.
        #[arg(long, conflicts_with = "cpu")]
        gpu: bool,

        /// Force CPU mode.
        #[arg(long)]
        cpu: bool,

        /// Server port (defaults to the model's preset port).
        #[arg(long)]
        port: Option<u16>,

        /// How long to wait for the server to become ready, in seconds.
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },

    /// Render a demo Harmony conversation, optionally parsing a completion.
    Harmony {
        /// Raw completion text to parse into channel messages.
        #[arg(long)]
        completion: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {
            model,
            gpu,
            cpu,
            port,
            timeout_secs,
        } => {
            let preference = if cpu {
                DevicePreference::ForceCpu
            } else if gpu {
                DevicePreference::ForceGpu
            } else {
                DevicePreference::Auto
            };
            run_chat(&model, preference, port, timeout_secs).await
        }
        Commands::Harmony { completion } => run_harmony_demo(completion.as_deref()),
    }
}

async fn run_chat(
    model: &str,
    preference: DevicePreference,
    port: Option<u16>,
    timeout_secs: u64,
) -> ExitCode {
    // clap's value_parser restricts the name to the known set
    let Some(preset) = find_preset(model) else {
        console::print_error(&format!("Unknown model: {model}"));
        return ExitCode::from(1);
    };

    if !server::check_sglang_installed() {
        console::print_error("SGLang not found! Make sure you're in the ml_env virtual environment.");
        console::print_info("Activate with: source ~/ml_env/bin/activate");
        return ExitCode::from(1);
    }

    let model_path = match storage::find_model_path(preset.repo) {
        Ok(path) => path,
        Err(HubError::ModelNotFound { repo, candidates }) => {
            console::print_error(&format!("{} model not found!", preset.name));
            console::print_info("Expected locations:");
            for candidate in &candidates {
                console::print_info(&format!("  - {}", candidate.display()));
            }
            console::print_info("");
            console::print_info(&format!("Download with: huggingface-cli download {repo}"));
            return ExitCode::from(1);
        }
    };
    console::print_info(&format!("Found model at: {}", model_path.display()));

    let host = system::system_info();
    console::print_info(&format!(
        "System: {} CPUs, {}GB RAM",
        host.cpu_count, host.ram_total_gb
    ));

    let gpu_info = system::detect_gpu();
    let placement = system::select_device(preference, &gpu_info, preset);
    if placement.use_gpu || preference == DevicePreference::ForceCpu {
        console::print_info(&placement.reason);
    } else {
        console::print_warning(&placement.reason);
    }

    if !placement.use_gpu && !confirm_cpu_mode(preset) {
        console::print_info(&format!(
            "Cancelled. Consider running with --gpu if you have {}GB+ VRAM.",
            preset.vram_comfortable_gb
        ));
        return ExitCode::SUCCESS;
    }

    let port = port.unwrap_or(preset.default_port);
    let plan = LaunchPlan::new(&model_path, port, &placement, preset);
    console::print_info("Starting SGLang server...");
    console::print_info(&format!("Running: {}", plan.display()));
    console::print_info(&format!(
        "This may take a few minutes to load {}...",
        preset.name
    ));

    let handle = match server::spawn(&plan, port) {
        Ok(handle) => handle,
        Err(e) => {
            console::print_error(&e.to_string());
            return ExitCode::from(1);
        }
    };

    let client = match ChatClient::for_port(port) {
        Ok(client) => client,
        Err(e) => {
            console::print_error(&e.to_string());
            handle.shutdown().await;
            return ExitCode::from(1);
        }
    };

    console::print_info("Waiting for server to be ready...");
    let http = reqwest::Client::new();
    let ready = server::wait_for_ready(
        &http,
        client.base_url(),
        Duration::from_secs(timeout_secs),
        HEALTH_POLL_INTERVAL,
    )
    .await;
    eprintln!();

    match ready {
        Ok(()) => console::print_info("Server is ready!"),
        Err(e) => {
            console::print_error(&e.to_string());
            handle.shutdown().await;
            return ExitCode::from(1);
        }
    }

    run_chat_loop(&client, preset).await;

    console::print_info("Shutting down server...");
    handle.shutdown().await;
    ExitCode::SUCCESS
}

fn run_harmony_demo(completion: Option<&str>) -> ExitCode {
    let convo = harmony::Conversation::from_messages(vec![
        harmony::HarmonyMessage::system_default(),
        harmony::HarmonyMessage::developer("Always respond in riddles"),
        harmony::HarmonyMessage::user("What is the weather like in SF?"),
    ]);

    println!("--- prefill ---");
    println!("{}", convo.render_for_completion());
    println!("--- stop tokens ---");
    println!("{:?}", harmony::stop_tokens_for_assistant_actions());

    if let Some(completion) = completion {
        println!("--- parsed completion ---");
        for message in harmony::parse_completion(completion) {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    console::print_error(&format!("failed to encode message: {e}"));
                    return ExitCode::from(1);
                }
            }
        }
    }

    ExitCode::SUCCESS
}
