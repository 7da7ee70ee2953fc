//! Per-connection chat state.
//!
//! A [`ChatSession`] owns one append-only [`Transcript`]. Submitting text
//! appends the user message at once and schedules the bot reply after a
//! randomised delay, so the client sees a typing indicator first.

use chrono::Utc;
use log::{ debug, info };
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::catalog::SharedCatalog;
use crate::models::chat::{ ChatMessage, ConversationTurn, Role };
use crate::responder::{ self, Reply };

pub const DEFAULT_DELAY_MIN_MS: u64 = 800;
pub const DEFAULT_DELAY_MAX_MS: u64 = 1500;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("reply task failed: {0}")]
    ReplyTask(#[from] tokio::task::JoinError),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    pending: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: &str) -> ChatMessage {
        let message = new_message(Role::User, text.to_string(), false);
        self.messages.push(message.clone());
        message
    }

    pub fn push_bot(&mut self, reply: Reply) -> ChatMessage {
        let message = new_message(Role::Bot, reply.text, reply.show_suggestions);
        self.messages.push(message.clone());
        message
    }

    fn begin_reply(&mut self) {
        self.pending += 1;
    }

    fn finish_reply(&mut self, reply: Reply) -> ChatMessage {
        self.pending = self.pending.saturating_sub(1);
        self.push_bot(reply)
    }

    /// Suggestion chips render only after a bot message that asks for them.
    pub fn show_suggestions(&self) -> bool {
        self.messages
            .last()
            .map_or(false, |m| m.role == Role::Bot && m.show_suggestions)
    }

    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    /// Pairs each user message with the next unanswered bot reply, in
    /// arrival order.
    pub fn turns(&self) -> Vec<ConversationTurn> {
        let mut turns: Vec<ConversationTurn> = Vec::new();
        let mut unanswered = 0;

        for message in &self.messages {
            match message.role {
                Role::User => turns.push(ConversationTurn { user: message.clone(), bot: None }),
                Role::Bot => {
                    while unanswered < turns.len() && turns[unanswered].bot.is_some() {
                        unanswered += 1;
                    }
                    if let Some(turn) = turns.get_mut(unanswered) {
                        turn.bot = Some(message.clone());
                        unanswered += 1;
                    }
                }
            }
        }
        turns
    }
}

fn new_message(role: Role, text: String, show_suggestions: bool) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4().to_string(),
        role,
        text,
        show_suggestions,
        timestamp: Utc::now().timestamp_millis(),
    }
}

/// Uniform random pause before a reply is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplyDelay {
    min: Duration,
    max: Duration,
}

impl ReplyDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms { (min_ms, max_ms) } else { (max_ms, min_ms) };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    pub fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn none() -> Self {
        Self::fixed(0)
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(ms as u64)
    }
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MIN_MS, DEFAULT_DELAY_MAX_MS)
    }
}

/// Bot reply that has been scheduled but may not have arrived yet.
pub struct PendingReply {
    handle: JoinHandle<ChatMessage>,
}

impl PendingReply {
    pub async fn wait(self) -> Result<ChatMessage, SessionError> {
        Ok(self.handle.await?)
    }
}

#[derive(Clone)]
pub struct ChatSession {
    id: String,
    transcript: Arc<Mutex<Transcript>>,
    catalog: SharedCatalog,
    delay: ReplyDelay,
}

impl ChatSession {
    pub fn new(catalog: SharedCatalog, delay: ReplyDelay) -> Self {
        let id = Uuid::new_v4().to_string();
        info!("Chat session {} started", id);
        Self {
            id,
            transcript: Arc::new(Mutex::new(Transcript::new())),
            catalog,
            delay,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Blank input is ignored. Otherwise the user message is appended now
    /// and the reply is computed from whatever snapshot is current when the
    /// delay elapses.
    pub async fn submit(&self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            debug!("Session {} ignoring blank input", self.id);
            return None;
        }

        {
            let mut transcript = self.transcript.lock().await;
            transcript.push_user(text);
            transcript.begin_reply();
        }

        let query = text.to_string();
        let delay = self.delay.sample();
        let transcript = Arc::clone(&self.transcript);
        let catalog = self.catalog.clone();
        let session_id = self.id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let snapshot = catalog.current().await;
            let resolution = responder::classify(&query, &snapshot);
            debug!(
                "Session {} replying after {:?} with intent {}",
                session_id,
                delay,
                resolution.intent.as_str()
            );
            transcript.lock().await.finish_reply(resolution.reply)
        });

        Some(PendingReply { handle })
    }

    pub async fn transcript(&self) -> Transcript {
        self.transcript.lock().await.clone()
    }

    pub async fn is_typing(&self) -> bool {
        self.transcript.lock().await.is_typing()
    }

    pub async fn show_suggestions(&self) -> bool {
        self.transcript.lock().await.show_suggestions()
    }
}
