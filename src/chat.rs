//! One conversation turn: user input goes to the voice assistant, its answer
//! and any vehicle report come back as chat lines.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{error, info, warn};

use crate::audio::{capture_utterance, AudioSource};
use crate::constants::GREETING;
use crate::error::{AudioError, VehicleApiError, VoiceApiError};
use crate::formatter::{format_information_result, has_content};
use crate::intent::Intent;
use crate::router::{self, RouteOutcome};
use crate::vehicle::VehicleApi;
use crate::voice::{SpeechConfig, SpeechSession, VoiceApi, VoiceResponse};

pub const QUOTA_MESSAGE: &str = "Over daily limit at Houndify :(";
pub const NOT_RECOGNIZED: &str = "Sorry, your request was not recognized.";
pub const VOICE_UNAVAILABLE: &str = "Sorry, the voice assistant is not reachable right now.";

/// Typing this alone ends the text chat.
pub const QUIT: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("you"),
            Role::Bot => f.write_str("bot"),
        }
    }
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub text: String,
    pub role: Role,
}

impl ChatLine {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    /// One bubble per non-empty line of `text`.
    pub fn split(text: &str, role: Role) -> Vec<ChatLine> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ChatLine::new(line, role))
            .collect()
    }
}

/// Where chat lines end up: a terminal, a TUI conversation, a test buffer.
pub trait ChatSink {
    fn push(&mut self, line: ChatLine);

    /// Pushes `text`, split into one line per bubble.
    fn say(&mut self, text: &str, role: Role) {
        for line in ChatLine::split(text, role) {
            self.push(line);
        }
    }
}

impl ChatSink for Vec<ChatLine> {
    fn push(&mut self, line: ChatLine) {
        Vec::push(self, line);
    }
}

/// Writes lines as `bot> ...` / `you> ...`.
pub struct PrintSink<W: Write> {
    out: W,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatSink for PrintSink<W> {
    fn push(&mut self, line: ChatLine) {
        if let Err(e) = writeln!(self.out, "{}> {}", line.role, line.text) {
            warn!("Failed to print chat line: {}", e);
        }
    }
}

/// Talks to the voice assistant and the car on behalf of one user.
pub struct ChatSession {
    voice: Box<dyn VoiceApi>,
    vehicle: Box<dyn VehicleApi>,
    vehicle_id: String,
    speech: SpeechConfig,
}

impl ChatSession {
    pub fn new(
        voice: Box<dyn VoiceApi>,
        vehicle: Box<dyn VehicleApi>,
        vehicle_id: impl Into<String>,
    ) -> Self {
        Self {
            voice,
            vehicle,
            vehicle_id: vehicle_id.into(),
            speech: SpeechConfig::default(),
        }
    }

    pub fn with_speech_config(mut self, speech: SpeechConfig) -> Self {
        self.speech = speech;
        self
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn greet<S: ChatSink>(&self, sink: &mut S) {
        sink.say(GREETING, Role::Bot);
    }

    /// Handles a typed request.
    pub async fn send_text<S: ChatSink>(&self, text: &str, sink: &mut S) {
        sink.say(text, Role::User);
        info!(%text, "Sending text request");
        match self.voice.query(text).await {
            Ok(response) => self.handle_response(&response, sink).await,
            Err(e) => self.voice_failed(e, sink),
        }
    }

    /// Records one utterance from `source` and handles it like a typed
    /// request. Blocks while listening.
    pub async fn send_speech<S: ChatSink>(
        &self,
        source: &mut dyn AudioSource,
        sink: &mut S,
    ) -> Result<(), AudioError> {
        let mut session = SpeechSession::new(self.speech.clone());
        capture_utterance(source, &mut session)?;

        match session.finish(&*self.voice).await {
            Ok(response) => {
                let utterance = response.transcription().unwrap_or(NOT_RECOGNIZED);
                sink.say(utterance, Role::User);
                self.handle_response(&response, sink).await;
            }
            Err(e) => {
                sink.say(NOT_RECOGNIZED, Role::User);
                self.voice_failed(e, sink);
            }
        }
        Ok(())
    }

    /// Shows the assistant's answer (the short form when the long one is
    /// missing), then the vehicle report if the request was about the car. A
    /// failing vehicle call only loses the report.
    pub async fn handle_response<S: ChatSink>(&self, response: &VoiceResponse, sink: &mut S) {
        match response
            .written_response_long()
            .or_else(|| response.written_response())
        {
            Some(text) => sink.say(text, Role::Bot),
            None => {
                warn!(response = %response.raw(), "Voice response without a written answer");
                if response.quota_exceeded() {
                    sink.say(QUOTA_MESSAGE, Role::Bot);
                }
            }
        }

        if let Some(intent) = response.car_intent() {
            if let Err(e) = ask_vehicle(&*self.vehicle, &self.vehicle_id, &intent, sink).await {
                error!(error = %e, "Vehicle request failed, dropping the vehicle answer");
            }
        }
    }

    fn voice_failed<S: ChatSink>(&self, e: VoiceApiError, sink: &mut S) {
        error!(error = %e, "Voice request failed");
        sink.say(VOICE_UNAVAILABLE, Role::Bot);
    }
}

/// Routes `intent` to the car and shows the outcome. An empty answer shows
/// nothing. Errors are returned so that direct callers can report them.
pub async fn ask_vehicle<S: ChatSink>(
    vehicle: &dyn VehicleApi,
    vehicle_id: &str,
    intent: &Intent,
    sink: &mut S,
) -> Result<RouteOutcome, VehicleApiError> {
    let outcome = router::route(intent, vehicle, vehicle_id).await?;

    if let Some(text) = &outcome.command_text {
        sink.say(text, Role::Bot);
    } else if let (Some(result), Some(category)) = (&outcome.result, outcome.category) {
        if has_content(result) {
            sink.say(&format_information_result(category, result), Role::Bot);
        } else {
            warn!(%category, %vehicle_id, "Vehicle returned an empty answer");
        }
    }
    Ok(outcome)
}

/// Line based chat: greets, answers each input line, stops at [`QUIT`] or
/// end of input.
pub async fn run_text_chat<R: BufRead, S: ChatSink>(
    session: &ChatSession,
    input: R,
    sink: &mut S,
) -> std::io::Result<()> {
    session.greet(sink);
    for line in input.lines() {
        let line = line?;
        let request = line.trim();
        if request == QUIT {
            break;
        }
        if request.is_empty() {
            continue;
        }
        session.send_text(request, sink).await;
    }
    info!("Chat session finished.");
    Ok(())
}
