use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use carchat::audio::{AudioSource, WavFileSource};
use carchat::chat::{self, PrintSink};
use carchat::intent::{Category, DoorCommand, Intent, INFORMATION};
use carchat::{Settings, VehicleApi};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Chat with the assistant line by line. Type 'q' to quit.
    Chat,
    /// Send a single request and print the answer.
    Ask {
        #[arg(required = true, num_args = 1.., help = "What to ask, e.g. \"lock my car\".")]
        text: Vec<String>,
    },
    /// Speak a request. Uses the microphone unless --wav is given.
    Listen {
        #[arg(long, help = "16 kHz mono WAV file to send instead of recording.")]
        wav: Option<PathBuf>,
    },
    /// Report one vehicle part without going through the assistant.
    Status {
        #[arg(help = "tires, doors, location, odometer, fuel or charge")]
        category: Category,
    },
    /// Lock the doors.
    Lock,
    /// Unlock the doors.
    Unlock,
    /// List the vehicles the token can see.
    Vehicles,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Chat output goes to stdout, logs (RUST_LOG=carchat=debug) to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("carchat starting with command: {:?}", cli.command);

    let settings = cli.settings;
    let mut out = PrintSink::new(io::stdout());

    match cli.command {
        Commands::Chat => {
            let session = settings
                .chat_session()
                .context("Failed to set up the chat session")?;
            chat::run_text_chat(&session, io::stdin().lock(), &mut out)
                .await
                .context("Failed to read from stdin")?;
        }
        Commands::Ask { text } => {
            let session = settings
                .chat_session()
                .context("Failed to set up the chat session")?;
            session.send_text(&text.join(" "), &mut out).await;
        }
        Commands::Listen { wav } => {
            let session = settings
                .chat_session()
                .context("Failed to set up the chat session")?;
            let mut source = open_audio(wav)?;
            session
                .send_speech(source.as_mut(), &mut out)
                .await
                .context("Failed to capture speech")?;
        }
        Commands::Status { category } => {
            let intent = Intent::new().with(category, INFORMATION);
            run_vehicle_intent(&settings, &intent, &mut out).await?;
        }
        Commands::Lock => {
            let intent = Intent::new().with(Category::Doors, DoorCommand::Lock.as_str());
            run_vehicle_intent(&settings, &intent, &mut out).await?;
        }
        Commands::Unlock => {
            let intent = Intent::new().with(Category::Doors, DoorCommand::Unlock.as_str());
            run_vehicle_intent(&settings, &intent, &mut out).await?;
        }
        Commands::Vehicles => {
            let vehicle = settings
                .vehicle_client()
                .context("Failed to set up the vehicle client")?;
            let vehicles = vehicle
                .vehicles()
                .await
                .context("Failed to list vehicles")?;
            println!("{}", serde_json::to_string_pretty(&vehicles)?);
        }
    }

    Ok(())
}

async fn run_vehicle_intent(
    settings: &Settings,
    intent: &Intent,
    out: &mut PrintSink<io::Stdout>,
) -> Result<()> {
    let vehicle = settings
        .vehicle_client()
        .context("Failed to set up the vehicle client")?;
    chat::ask_vehicle(&vehicle, &settings.vehicle_id, intent, out)
        .await
        .with_context(|| format!("Vehicle request for {} failed", settings.vehicle_id))?;
    Ok(())
}

fn open_audio(wav: Option<PathBuf>) -> Result<Box<dyn AudioSource>> {
    if let Some(path) = wav {
        let source = WavFileSource::open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        return Ok(Box::new(source));
    }

    open_microphone()
}

#[cfg(feature = "microphone")]
fn open_microphone() -> Result<Box<dyn AudioSource>> {
    let source = carchat::audio::MicrophoneSource::open_default()
        .context("Failed to open the default input device")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "microphone"))]
fn open_microphone() -> Result<Box<dyn AudioSource>> {
    anyhow::bail!("Built without the `microphone` feature; pass --wav <FILE>")
}
