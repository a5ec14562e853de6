use crate::api::AnswerClient;
use crate::chat::ChatState;
use crate::errors::{ChatError, ChatResult};
use crate::models::BackendStatus;
use crate::scroll::ScrollState;
use crate::status_indicator::StatusIndicator;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tokio::task::JoinHandle;

const PAGE_LINES: u16 = 10;
const WHEEL_LINES: u16 = 3;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// The chat screen: session state plus the one in-flight request, if any.
pub struct ChatView {
    pub state: ChatState,
    pub scroll: ScrollState,
    pub status_indicator: StatusIndicator,
    pub backend_status: BackendStatus,
    /// Screen area of the send control from the last draw.
    pub send_button: Rect,
    client: AnswerClient,
    pending: Option<JoinHandle<ChatResult<String>>>,
    probe: Option<JoinHandle<ChatResult<()>>>,
}

impl ChatView {
    pub fn new(client: AnswerClient) -> Self {
        Self {
            state: ChatState::new(),
            scroll: ScrollState::new(),
            status_indicator: StatusIndicator::new(),
            backend_status: BackendStatus::Unknown,
            send_button: Rect::default(),
            client,
            pending: None,
            probe: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Sends the current input. A no-op for blank input or while a previous
    /// question is still in flight. Must be called inside a tokio runtime.
    pub fn submit(&mut self) {
        let Some(question) = self.state.begin_submit() else {
            return;
        };

        log::info!("submitting question ({} chars)", question.len());
        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move { client.ask(&question).await }));
    }

    /// Starts a background health check of the answer service.
    pub fn probe_backend(&mut self) {
        let client = self.client.clone();
        self.probe = Some(tokio::spawn(async move { client.health().await }));
    }

    /// Resolves once the in-flight question or the health probe settles, and
    /// applies the result. Pends forever when neither is running.
    ///
    /// Cancel safe: if the future is dropped early the task handles stay in
    /// place and the next call picks them up.
    pub async fn wait_for_answer(&mut self) {
        let settled = tokio::select! {
            outcome = join_task(&mut self.pending) => Settled::Answer(outcome),
            outcome = join_task(&mut self.probe) => Settled::Probe(outcome),
        };

        match settled {
            Settled::Answer(outcome) => {
                self.pending = None;
                // A health check still in flight must not overwrite this status.
                if let Some(probe) = self.probe.take() {
                    probe.abort();
                }
                self.backend_status = match outcome {
                    Ok(_) => BackendStatus::Online,
                    Err(_) => BackendStatus::Offline,
                };
                self.state.finish_submit(outcome);
            }
            Settled::Probe(outcome) => {
                self.probe = None;
                self.backend_status = match outcome {
                    Ok(()) => BackendStatus::Online,
                    Err(e) => {
                        log::warn!("health check failed: {}", e);
                        BackendStatus::Offline
                    }
                };
            }
        }
    }

    /// Waits for the in-flight question, if there is one.
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            self.wait_for_answer().await;
        }
    }

    /// Periodic UI tick: advances animations and follows new messages.
    pub fn tick(&mut self) {
        self.scroll.observe(self.state.messages().len());
        self.scroll.tick();
        if self.is_loading() {
            self.status_indicator.update_spinner();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.state.pop_char(),
            KeyCode::Up => self.scroll.scroll_up(1),
            KeyCode::Down => self.scroll.scroll_down(1),
            KeyCode::PageUp => self.scroll.scroll_up(PAGE_LINES),
            KeyCode::PageDown => self.scroll.scroll_down(PAGE_LINES),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.push_char(c)
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Left click on the send control submits; the wheel scrolls the transcript.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self
                    .send_button
                    .contains(Position::new(mouse.column, mouse.row))
                {
                    self.submit();
                }
            }
            MouseEventKind::ScrollUp => self.scroll.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.scroll.scroll_down(WHEEL_LINES),
            _ => {}
        }
    }
}

enum Settled {
    Answer(ChatResult<String>),
    Probe(ChatResult<()>),
}

/// Awaits a task slot. A panicked or aborted task becomes a
/// [`ChatError::Task`], so callers always get an outcome to apply.
async fn join_task<T>(slot: &mut Option<JoinHandle<ChatResult<T>>>) -> ChatResult<T> {
    match slot.as_mut() {
        Some(handle) => match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ChatError::Task(e.to_string())),
        },
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use crate::constants::FALLBACK_ANSWER;
    use crate::models::Sender;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn view_for(server: &MockServer) -> ChatView {
        ChatView::new(AnswerClient::new(parse_base_url(&server.uri()).unwrap()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut ChatView, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_success_round_trip() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({ "question": "What is your return policy?" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "answer": "Returns are accepted within 30 days." })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        type_text(&mut view, "What is your return policy?");
        view.handle_key(key(KeyCode::Enter));
        assert!(view.is_loading());
        assert!(view.state.input().is_empty());

        view.settle().await;

        let messages = view.state.messages();
        assert_eq!(messages.len(), 3);
        let user = &messages[1];
        let bot = &messages[2];
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "What is your return policy?");
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, "Returns are accepted within 30 days.");
        assert!(!view.is_loading());
        assert_eq!(view.backend_status, BackendStatus::Online);
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        view.state.set_input("anything");
        view.submit();
        view.settle().await;

        let last = view.state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, FALLBACK_ANSWER);
        assert!(!view.is_loading());
        assert!(view.state.input().is_empty());
        assert_eq!(view.backend_status, BackendStatus::Offline);
    }

    #[tokio::test]
    async fn test_network_error_falls_back() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = AnswerClient::new(parse_base_url(&format!("http://127.0.0.1:{port}")).unwrap());
        let mut view = ChatView::new(client);
        view.state.set_input("is anyone there?");
        view.submit();
        view.settle().await;

        assert_eq!(view.state.messages().len(), 3);
        assert_eq!(view.state.messages()[2].text, FALLBACK_ANSWER);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_missing_answer_falls_back() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "hi" })))
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        view.state.set_input("hello");
        view.submit();
        view.settle().await;

        assert_eq!(view.state.messages().last().unwrap().text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_resubmit_while_loading_is_ignored() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "answer": "slow answer" }))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        view.state.set_input("first");
        view.submit();

        type_text(&mut view, "second");
        view.handle_key(key(KeyCode::Enter));
        view.submit();
        assert_eq!(view.state.messages().len(), 2);
        assert!(view.state.input().is_empty());

        view.settle().await;
        assert_eq!(view.state.messages().len(), 3);
        assert_eq!(view.state.messages()[2].text, "slow answer");
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        type_text(&mut view, "   ");
        view.handle_key(key(KeyCode::Enter));

        assert_eq!(view.state.messages().len(), 1);
        assert!(!view.is_loading());
        assert_eq!(view.state.input(), "   ");
    }

    #[tokio::test]
    async fn test_transcript_grows_by_two_per_submission() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({ "question": "bad" })))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "fine" })))
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        let questions = ["one", "bad", "two", "bad", "three"];
        for (n, question) in questions.iter().enumerate() {
            let before = view.state.messages().to_vec();
            view.state.set_input(*question);
            view.submit();
            view.settle().await;

            assert_eq!(view.state.messages().len(), 1 + 2 * (n + 1));
            assert_eq!(&view.state.messages()[..before.len()], &before[..]);
            assert!(view.state.input().is_empty());
        }
    }

    #[tokio::test]
    async fn test_panicking_task_still_clears_loading() {
        let mock_server = MockServer::start().await;
        let mut view = view_for(&mock_server);
        view.state.set_input("hello");
        assert!(view.state.begin_submit().is_some());
        view.pending = Some(tokio::spawn(async {
            if true {
                panic!("request task blew up");
            }
            Ok::<_, ChatError>(String::new())
        }));

        view.settle().await;
        assert!(!view.is_loading());
        assert_eq!(view.state.messages().last().unwrap().text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_aborted_task_still_clears_loading() {
        let mock_server = MockServer::start().await;
        let mut view = view_for(&mock_server);
        view.state.set_input("hello");
        assert!(view.state.begin_submit().is_some());
        let handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ChatError>("too late".to_string())
        });
        handle.abort();
        view.pending = Some(handle);

        view.settle().await;
        assert!(!view.is_loading());
        assert_eq!(view.state.messages().len(), 3);
        assert_eq!(view.state.messages()[2].text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_health_probe_sets_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        assert_eq!(view.backend_status, BackendStatus::Unknown);
        view.probe_backend();
        view.wait_for_answer().await;
        assert_eq!(view.backend_status, BackendStatus::Online);
    }

    #[tokio::test]
    async fn test_late_health_failure_does_not_override_answer() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(300)))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "here" })))
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        view.probe_backend();
        view.state.set_input("are you up?");
        view.submit();
        view.settle().await;
        assert_eq!(view.backend_status, BackendStatus::Online);
        assert!(view.probe.is_none());

        let waited =
            tokio::time::timeout(Duration::from_millis(600), view.wait_for_answer()).await;
        assert!(waited.is_err());
        assert_eq!(view.backend_status, BackendStatus::Online);
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn test_click_on_send_button_submits() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({ "question": "Do you sell gift cards?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "Yes." })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut view = view_for(&mock_server);
        view.send_button = Rect::new(70, 20, 10, 1);
        view.state.set_input("Do you sell gift cards?");

        view.handle_mouse(click(10, 20));
        assert!(!view.is_loading());

        view.handle_mouse(click(74, 20));
        assert!(view.is_loading());
        view.settle().await;
        assert_eq!(view.state.messages().last().unwrap().text, "Yes.");
    }

    #[tokio::test]
    async fn test_click_with_blank_input_is_noop() {
        let mock_server = MockServer::start().await;
        let mut view = view_for(&mock_server);
        view.send_button = Rect::new(70, 20, 10, 1);

        view.handle_mouse(click(74, 20));
        assert!(!view.is_loading());
        assert_eq!(view.state.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mock_server = MockServer::start().await;
        let mut view = view_for(&mock_server);
        assert_eq!(view.handle_key(key(KeyCode::Esc)), KeyOutcome::Quit);
        assert_eq!(
            view.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Quit
        );
        assert_eq!(view.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Continue);
        assert_eq!(view.state.input(), "q");
    }

    #[tokio::test]
    async fn test_tick_follows_new_messages() {
        let mock_server = MockServer::start().await;
        let mut view = view_for(&mock_server);
        view.scroll.set_bounds(30, 10);
        view.scroll.scroll_up(5);
        assert!(!view.scroll.is_following());

        view.state.set_input("hi");
        view.state.begin_submit();
        view.tick();
        assert!(view.scroll.is_following());
        assert!(view.scroll.offset() > 0);
    }
}
