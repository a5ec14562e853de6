use crate::constants::{FALLBACK_ANSWER, GREETING};
use crate::errors::ChatResult;
use crate::models::{Message, Sender};

/// Session state behind the chat view: the transcript, the input buffer and
/// the loading flag.
///
/// The transcript is append-only. Nothing here touches the network; the view
/// drives a submission through [`ChatState::begin_submit`] and
/// [`ChatState::finish_submit`].
#[derive(Debug)]
pub struct ChatState {
    messages: Vec<Message>,
    input: String,
    is_loading: bool,
    next_id: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        let mut state = Self {
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            next_id: 1,
        };
        state.push(GREETING.to_string(), Sender::Bot);
        state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True when the send control is enabled.
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.input.trim().is_empty()
    }

    /// Input is ignored while a request is in flight.
    pub fn push_char(&mut self, c: char) {
        if !self.is_loading {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_loading {
            self.input.pop();
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if !self.is_loading {
            self.input = text.into();
        }
    }

    /// Starts a submission with the current buffer.
    ///
    /// Returns the question to send, untrimmed, or `None` when the buffer is
    /// blank or another submission is still in flight.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.push(question.clone(), Sender::User);
        self.is_loading = true;
        Some(question)
    }

    /// Completes the in-flight submission. Appends the answer, or the fallback
    /// text on any error, and always clears the loading flag.
    pub fn finish_submit(&mut self, outcome: ChatResult<String>) {
        match outcome {
            Ok(answer) => self.push(answer, Sender::Bot),
            Err(e) => {
                log::error!("Chat error: {}", e);
                self.push(FALLBACK_ANSWER.to_string(), Sender::Bot);
            }
        }
        self.is_loading = false;
    }

    fn push(&mut self, text: String, sender: Sender) {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.messages.push(Message::new(id, text, sender));
    }
}
