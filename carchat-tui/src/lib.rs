//! Chat window state and rendering. The terminal loop lives in `main.rs`.

use std::sync::Arc;

use carchat::{ChatLine, ChatSession, ChatSink, Role};
use chrono::Local;
use ratatui::{
    crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

/// Lines scrolled per PageUp/PageDown.
pub const PAGE_LINES: u16 = 10;

/// Sent from request tasks back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Line(ChatLine),
    /// The request finished; input can be unlocked.
    Done,
}

/// Forwards chat lines from a request task to the window.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl ChatSink for ChannelSink {
    fn push(&mut self, line: ChatLine) {
        if self.tx.send(AppEvent::Line(line)).is_err() {
            tracing::warn!("Chat window is gone, dropping line");
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: String,
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

fn input_box() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(Block::default().borders(Borders::ALL).title("Input"));
    textarea
}

pub struct App {
    session: Arc<ChatSession>,
    pub messages: Vec<Message>,
    pub textarea: TextArea<'static>,
    pub is_processing: bool,
    /// Lines scrolled back from the newest message. Zero follows the chat.
    pub scroll_back: u16,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(session: ChatSession) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            session: Arc::new(session),
            messages: Vec::new(),
            textarea: input_box(),
            is_processing: false,
            scroll_back: 0,
            event_tx,
            event_rx,
        };
        let session = Arc::clone(&app.session);
        session.greet(&mut app);
        app
    }

    pub fn vehicle_id(&self) -> &str {
        self.session.vehicle_id()
    }

    /// Sends the text in the input box. Does nothing while a request is in
    /// flight or when the box is empty.
    pub fn submit(&mut self) -> bool {
        if self.is_processing {
            return false;
        }
        let text = self.textarea.lines().join(" ").trim().to_string();
        if text.is_empty() {
            return false;
        }
        self.textarea = input_box();
        self.is_processing = true;
        self.scroll_back = 0;

        tracing::info!("Sending request: {}", text);
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut sink = ChannelSink::new(tx.clone());
            session.send_text(&text, &mut sink).await;
            let _ = tx.send(AppEvent::Done);
        });
        true
    }

    /// Drains everything request tasks have sent so far.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Line(line) => self.push(line),
                AppEvent::Done => self.is_processing = false,
            }
        }
    }

    /// Waits for the next event from a request task and applies it.
    pub async fn next_event(&mut self) {
        match self.event_rx.recv().await {
            Some(AppEvent::Line(line)) => self.push(line),
            Some(AppEvent::Done) => self.is_processing = false,
            None => {}
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                return KeyAction::Quit
            }
            (_, KeyCode::Enter) => {
                self.submit();
            }
            (_, KeyCode::PageUp) => self.scroll_up(PAGE_LINES),
            (_, KeyCode::PageDown) => self.scroll_down(PAGE_LINES),
            _ => {
                if !self.is_processing {
                    self.textarea.input(Event::Key(key));
                }
            }
        }
        KeyAction::Continue
    }
}

impl ChatSink for App {
    fn push(&mut self, line: ChatLine) {
        self.messages.push(Message {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            role: line.role,
            content: line.text,
        });
        self.scroll_back = 0;
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Bot => Style::default().fg(Color::Green),
    }
}

/// Lays out messages as bubbles for a pane `width` columns wide: bot
/// bubbles on the left, user bubbles on the right, a blank line between.
pub fn message_lines(messages: &[Message], width: u16) -> Vec<Line<'static>> {
    let bubble_width = (usize::from(width) * 2 / 3).max(10);
    let mut lines = Vec::new();

    for msg in messages {
        let alignment = match msg.role {
            Role::Bot => Alignment::Left,
            Role::User => Alignment::Right,
        };
        let style = role_style(msg.role);

        lines.push(
            Line::from(vec![
                Span::styled(msg.timestamp.clone(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(msg.role.to_string(), style.add_modifier(Modifier::BOLD)),
            ])
            .alignment(alignment),
        );
        for wrapped in textwrap::wrap(&msg.content, bubble_width) {
            lines.push(Line::from(Span::styled(wrapped.into_owned(), style)).alignment(alignment));
        }
        lines.push(Line::from(""));
    }
    lines
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("carchat", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  vehicle {}", app.vehicle_id())),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Borders take two columns and two rows.
    let inner_width = chunks[1].width.saturating_sub(2);
    let inner_height = chunks[1].height.saturating_sub(2);
    let lines = message_lines(&app.messages, inner_width);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let bottom = total.saturating_sub(inner_height);
    app.scroll_back = app.scroll_back.min(bottom);
    let title = if app.scroll_back > 0 {
        format!("Conversation [scrolled back {}]", app.scroll_back)
    } else {
        "Conversation".to_string()
    };

    let conversation = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((bottom - app.scroll_back, 0));
    f.render_widget(conversation, chunks[1]);

    let title = if app.is_processing {
        "Input (Processing...)"
    } else {
        "Input (Enter to send, Esc to quit)"
    };
    app.textarea
        .set_block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(&app.textarea, chunks[2]);
}
