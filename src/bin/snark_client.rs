use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use snark_scribe::{
    client::{run_generate, run_upload, ApiClient, FlowConfig, GenerateState, UploadState},
    constants::MIB,
    modules::post::model::GeneratePostModel,
    utils::bytes_to_mb,
};

#[derive(Parser, Debug)]
#[command(
    name = "snark-client",
    version,
    about = "Upload videos and generate satirical LinkedIn posts"
)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "SNARK_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a video, wait for its analysis, optionally write a post about it
    Upload {
        file: PathBuf,
        /// Also generate a post in this style once the analysis is ready
        #[arg(long)]
        style: Option<String>,
        #[arg(long, default_value = "")]
        context: String,
        #[arg(long, default_value_t = 30)]
        attempts: u32,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        #[arg(long, default_value_t = 100)]
        max_mb: u64,
    },
    /// Generate a post without a video
    Generate {
        #[arg(long, default_value = "performative")]
        style: String,
        #[arg(long, default_value = "")]
        context: String,
    },
    /// List uploaded videos, newest first
    Videos,
}

fn print_upload_state(state: &UploadState) {
    match state {
        UploadState::Idle => {}
        UploadState::Uploading { file } => println!("Uploading {}...", file.display()),
        UploadState::WaitingForAnalysis { attempt, .. } if *attempt == 1 => {
            println!("Analyzing video...")
        }
        UploadState::WaitingForAnalysis { attempt, .. } => {
            tracing::debug!(attempt, "analysis not ready")
        }
        UploadState::Complete { filename, .. } => println!("Uploaded {filename}"),
        UploadState::Error(_) => {}
    }
}

async fn generate(client: &ApiClient, request: GeneratePostModel) -> ExitCode {
    let end = run_generate(client, &request, |state| {
        if let GenerateState::Generating { style } = state {
            println!("Generating {style} post...");
        }
    })
    .await;

    match end {
        GenerateState::Complete { post, .. } => {
            println!("\n{post}");
            ExitCode::SUCCESS
        }
        GenerateState::Error(reason) => {
            eprintln!("Error: {reason}");
            ExitCode::FAILURE
        }
        _ => ExitCode::FAILURE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let http = match reqwest::Client::builder().build() {
        Ok(http) => http,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let client = ApiClient::new(&cli.server, http);

    match cli.command {
        Command::Upload { file, style, context, attempts, interval_ms, max_mb } => {
            let config = FlowConfig {
                poll_interval: Duration::from_millis(interval_ms),
                max_attempts: attempts,
                max_upload_bytes: max_mb * MIB,
            };

            let analysis = match run_upload(&client, &file, &config, print_upload_state).await {
                UploadState::Complete { analysis, .. } => analysis,
                UploadState::Error(reason) => {
                    eprintln!("Error: {reason}");
                    return ExitCode::FAILURE;
                }
                _ => return ExitCode::FAILURE,
            };

            match &analysis {
                Some(analysis) => println!("\n{}", analysis.format_summary()),
                None => println!("Video analysis is disabled on this server"),
            }

            let Some(style) = style else {
                return ExitCode::SUCCESS;
            };
            let request = GeneratePostModel {
                style,
                context,
                has_file: true,
                video_analysis: analysis.map(|analysis| *analysis),
            };
            generate(&client, request).await
        }
        Command::Generate { style, context } => {
            let request =
                GeneratePostModel { style, context, has_file: false, video_analysis: None };
            generate(&client, request).await
        }
        Command::Videos => match client.list_videos().await {
            Ok(videos) if videos.is_empty() => {
                println!("No videos uploaded yet");
                ExitCode::SUCCESS
            }
            Ok(videos) => {
                for video in videos {
                    println!(
                        "{}\t{:.1} MB\t{}",
                        video.filename,
                        bytes_to_mb(video.size),
                        video.created.to_rfc3339()
                    );
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e.reason());
                ExitCode::FAILURE
            }
        },
    }
}
