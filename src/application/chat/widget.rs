//! ChatWidget - the floating assistant.
//!
//! Holds one chat session bound to the current page context. Changing the
//! context opens a fresh session and resets the transcript to the greeting.
//!
//! # Sending
//!
//! 1. The trimmed user text is appended, followed by an empty assistant
//!    placeholder.
//! 2. The placeholder is filled as chunks arrive; every chunk publishes a
//!    new [`ChatSnapshot`].
//! 3. Once the reply completes, matching pro tips are appended to it.
//! 4. A failed call appends a separate apology message.
//!
//! Empty input and sends while a reply is streaming are rejected. A reply
//! still streaming when the context changes is abandoned: its remaining
//! chunks never reach the new transcript.

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

use super::launcher::OpenChatRequest;
use crate::application::guard::{lock, BusyFlag};
use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{MessageId, TopicContext};
use crate::domain::guidance::prompts::{CHAT_GREETING, QUICK_PROMPTS};
use crate::domain::guidance::{format_tip_suffix, pro_tips};
use crate::ports::{AiGateway, ChatSession, GatewayError};

/// Assistant message appended when a reply cannot be fetched.
pub const CHAT_ERROR_REPLY: &str =
    "Sorry, I encountered an error connecting to the AI. Please try again.";

/// Observable widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSnapshot {
    /// Increments on every published change.
    pub revision: u64,
    pub context: TopicContext,
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    pub is_open: bool,
    pub is_sending: bool,
}

/// Why a send was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    EmptyInput,
    InFlight,
}

/// What a call to [`ChatWidget::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply finished streaming.
    Completed,
    /// The gateway failed; an apology message was appended.
    Failed,
    /// The context changed mid-reply; the rest of the reply was dropped.
    Abandoned,
    /// Nothing was sent.
    Rejected(SendRejection),
}

struct WidgetState {
    context: TopicContext,
    session: Arc<dyn ChatSession>,
    messages: Vec<ChatMessage>,
    draft: String,
    is_open: bool,
    epoch: u64,
    revision: u64,
}

pub struct ChatWidget {
    gateway: Arc<dyn AiGateway>,
    state: Mutex<WidgetState>,
    busy: BusyFlag,
    updates: watch::Sender<ChatSnapshot>,
}

impl ChatWidget {
    /// Creates a closed widget bound to `context`.
    pub fn new(gateway: Arc<dyn AiGateway>, context: TopicContext) -> Self {
        let session: Arc<dyn ChatSession> = Arc::from(gateway.create_chat_session(context));
        let state = WidgetState {
            context,
            session,
            messages: vec![ChatMessage::assistant(CHAT_GREETING)],
            draft: String::new(),
            is_open: false,
            epoch: 0,
            revision: 0,
        };
        let (updates, _) = watch::channel(snapshot_of(&state, false));
        Self {
            gateway,
            state: Mutex::new(state),
            busy: BusyFlag::default(),
            updates,
        }
    }

    /// Receives a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        snapshot_of(&lock(&self.state), self.busy.is_set())
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    pub fn context(&self) -> TopicContext {
        lock(&self.state).context
    }

    pub fn is_sending(&self) -> bool {
        self.busy.is_set()
    }

    pub fn quick_prompts(&self) -> &'static [&'static str] {
        QUICK_PROMPTS
    }

    /// Rebinds the widget to `context`.
    ///
    /// Returns `false` when the context is unchanged. Otherwise a new
    /// session replaces the old one and the transcript restarts from the
    /// greeting.
    pub fn set_context(&self, context: TopicContext) -> bool {
        let mut state = lock(&self.state);
        if state.context == context {
            return false;
        }
        tracing::debug!(from = %state.context, to = %context, "Rebinding chat session");
        state.session = Arc::from(self.gateway.create_chat_session(context));
        state.context = context;
        state.messages = vec![ChatMessage::assistant(CHAT_GREETING)];
        state.epoch += 1;
        self.publish(&mut state);
        true
    }

    pub fn open(&self) {
        self.set_open(true);
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    pub fn toggle(&self) {
        let mut state = lock(&self.state);
        state.is_open = !state.is_open;
        self.publish(&mut state);
    }

    fn set_open(&self, is_open: bool) {
        let mut state = lock(&self.state);
        if state.is_open != is_open {
            state.is_open = is_open;
            self.publish(&mut state);
        }
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let mut state = lock(&self.state);
        state.draft = draft.into();
        self.publish(&mut state);
    }

    /// Opens the widget, applies the requested context and fills the draft.
    pub fn apply_open_request(&self, request: OpenChatRequest) {
        if let Some(context) = request.context {
            self.set_context(context);
        }
        let mut state = lock(&self.state);
        state.is_open = true;
        if !request.prefill.trim().is_empty() {
            state.draft = request.prefill;
        }
        self.publish(&mut state);
    }

    /// Applies open requests until every launcher is dropped.
    pub async fn listen(&self, mut requests: mpsc::Receiver<OpenChatRequest>) {
        while let Some(request) = requests.recv().await {
            self.apply_open_request(request);
        }
    }

    /// Sends the current draft.
    pub async fn send_draft(&self) -> SendOutcome {
        let draft = lock(&self.state).draft.clone();
        self.send(&draft).await
    }

    /// Sends one of the quick prompts by index.
    pub async fn send_quick_prompt(&self, index: usize) -> Option<SendOutcome> {
        let prompt = QUICK_PROMPTS.get(index)?;
        Some(self.send(prompt).await)
    }

    /// Sends `text` as a user turn and streams the reply into the transcript.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(SendRejection::EmptyInput);
        }
        let outcome = {
            let Some(_busy) = self.busy.try_acquire() else {
                tracing::debug!("Chat send ignored, reply already streaming");
                return SendOutcome::Rejected(SendRejection::InFlight);
            };
            self.stream_turn(text).await
        };
        self.publish(&mut lock(&self.state));
        outcome
    }

    async fn stream_turn(&self, text: &str) -> SendOutcome {
        let (session, context, epoch, reply_id) = {
            let mut state = lock(&self.state);
            state.draft.clear();
            state.messages.push(ChatMessage::user(text));
            let placeholder = ChatMessage::placeholder();
            let reply_id = placeholder.id;
            state.messages.push(placeholder);
            self.publish(&mut state);
            (Arc::clone(&state.session), state.context, state.epoch, reply_id)
        };

        let mut stream = match session.send_message_stream(text).await {
            Ok(stream) => stream,
            Err(err) => return self.fail(epoch, context, err),
        };

        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    reply.push_str(&chunk);
                    if !self.update_reply(epoch, reply_id, &reply) {
                        return self.abandon(context);
                    }
                }
                Err(err) => return self.fail(epoch, context, err),
            }
        }

        let tips = pro_tips(text, context);
        if let Some(suffix) = format_tip_suffix(&tips) {
            reply.push_str(&suffix);
            if !self.update_reply(epoch, reply_id, &reply) {
                return self.abandon(context);
            }
        }
        SendOutcome::Completed
    }

    /// Replaces the placeholder text; `false` if the transcript moved on.
    fn update_reply(&self, epoch: u64, reply_id: MessageId, text: &str) -> bool {
        let mut state = lock(&self.state);
        if state.epoch != epoch {
            return false;
        }
        let Some(message) = state.messages.iter_mut().rev().find(|m| m.id == reply_id) else {
            return false;
        };
        message.text = text.to_string();
        self.publish(&mut state);
        true
    }

    fn fail(&self, epoch: u64, context: TopicContext, err: GatewayError) -> SendOutcome {
        tracing::error!(%context, kind = err.kind(), error = %err, "Chat reply failed");
        let mut state = lock(&self.state);
        if state.epoch != epoch {
            return SendOutcome::Abandoned;
        }
        state.messages.push(ChatMessage::assistant(CHAT_ERROR_REPLY));
        self.publish(&mut state);
        SendOutcome::Failed
    }

    fn abandon(&self, context: TopicContext) -> SendOutcome {
        tracing::debug!(%context, "Context changed, abandoning chat reply");
        SendOutcome::Abandoned
    }

    fn publish(&self, state: &mut WidgetState) {
        state.revision += 1;
        self.updates.send_replace(snapshot_of(state, self.busy.is_set()));
    }
}

fn snapshot_of(state: &WidgetState, is_sending: bool) -> ChatSnapshot {
    ChatSnapshot {
        revision: state.revision,
        context: state.context,
        messages: state.messages.clone(),
        draft: state.draft.clone(),
        is_open: state.is_open,
        is_sending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAiGateway, MockCall, MockResponse, OfflineGateway};
    use crate::application::chat::ChatLauncher;
    use crate::domain::chat::ChatRole;
    use std::time::Duration;

    fn widget(gateway: &MockAiGateway) -> ChatWidget {
        ChatWidget::new(Arc::new(gateway.clone()), TopicContext::Home)
    }

    #[test]
    fn starts_closed_with_greeting() {
        let widget = widget(&MockAiGateway::new());
        let messages = widget.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, CHAT_GREETING);
        assert!(!widget.snapshot().is_open);
        assert_eq!(widget.quick_prompts().len(), 3);
    }

    #[tokio::test]
    async fn streamed_reply_fills_placeholder() {
        let gateway = MockAiGateway::new().with_chunks(["Use a ", "password ", "manager."]);
        let widget = widget(&gateway);
        let before = widget.subscribe().borrow().revision;

        assert_eq!(
            widget.send("  which password manager should I pick?  ").await,
            SendOutcome::Completed
        );

        let messages = widget.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].text, "which password manager should I pick?");
        assert!(messages[2].text.starts_with("Use a password manager."));
        // user+placeholder, one per chunk, the tip, then the idle state
        assert_eq!(widget.snapshot().revision, before + 1 + 3 + 1 + 1);
        assert!(!widget.is_sending());
    }

    #[tokio::test]
    async fn tips_are_appended_after_reply() {
        let gateway = MockAiGateway::new().with_text("Keep it offline.");
        let widget = widget(&gateway);

        widget.send("I wrote down my seed phrase, is my seed phrase safe?").await;

        let reply = widget.messages().pop().unwrap().text;
        assert!(reply.starts_with("Keep it offline.\n\n💡 Pro tip: "));
        assert_eq!(reply.matches("💡 Pro tip:").count(), 1);
    }

    #[tokio::test]
    async fn no_tip_suffix_without_matches() {
        let gateway = MockAiGateway::new().with_text("Hello!");
        let widget = widget(&gateway);
        widget.send("hello world").await;
        assert_eq!(widget.messages().pop().unwrap().text, "Hello!");
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let gateway = MockAiGateway::new();
        let widget = widget(&gateway);

        assert_eq!(
            widget.send("   ").await,
            SendOutcome::Rejected(SendRejection::EmptyInput)
        );
        assert_eq!(widget.messages().len(), 1);
        assert_eq!(gateway.call_count(), 1); // session creation only
    }

    #[tokio::test]
    async fn send_while_streaming_is_rejected() {
        let gateway = MockAiGateway::new()
            .with_chunks(["a", "b"])
            .with_chunk_delay(Duration::from_millis(20));
        let widget = widget(&gateway);

        let (first, second) = tokio::join!(widget.send("first"), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert!(widget.snapshot().is_sending);
            widget.send("second").await
        });

        assert_eq!(first, SendOutcome::Completed);
        assert_eq!(second, SendOutcome::Rejected(SendRejection::InFlight));
        let user_turns = widget.messages().iter().filter(|m| m.is_user()).count();
        assert_eq!(user_turns, 1);
    }

    #[tokio::test]
    async fn gateway_error_appends_apology() {
        let gateway = MockAiGateway::new().with_error(GatewayError::transport("dns failure"));
        let widget = widget(&gateway);

        assert_eq!(widget.send("hi").await, SendOutcome::Failed);

        let messages = widget.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3].text, CHAT_ERROR_REPLY);
        assert!(messages.iter().all(|m| !m.text.contains("dns failure")));
    }

    #[tokio::test]
    async fn mid_stream_error_keeps_partial_reply() {
        let gateway = MockAiGateway::new().with_response(MockResponse::StreamError {
            chunks: vec!["Partial".to_string()],
            error: GatewayError::generation("bad chunk"),
        });
        let widget = widget(&gateway);

        assert_eq!(widget.send("hi").await, SendOutcome::Failed);
        let messages = widget.messages();
        assert_eq!(messages[2].text, "Partial");
        assert_eq!(messages[3].text, CHAT_ERROR_REPLY);
    }

    #[tokio::test]
    async fn context_change_resets_transcript_and_session() {
        let gateway = MockAiGateway::new();
        let widget = widget(&gateway);
        widget.send("hello").await;
        assert_eq!(widget.messages().len(), 3);

        assert!(widget.set_context(TopicContext::AiTrust));
        assert!(!widget.set_context(TopicContext::AiTrust));
        assert_eq!(widget.messages().len(), 1);

        widget.send("is it safe?").await;
        assert_eq!(
            gateway.calls().last(),
            Some(&MockCall::ChatMessage {
                context: TopicContext::AiTrust,
                text: "is it safe?".to_string()
            })
        );
        let created: Vec<_> = gateway
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::ChatSessionCreated { .. }))
            .collect();
        assert_eq!(created.len(), 2);
    }

    #[tokio::test]
    async fn context_change_mid_stream_drops_late_chunks() {
        let gateway = MockAiGateway::new()
            .with_chunks(["old ", "context ", "reply"])
            .with_chunk_delay(Duration::from_millis(20));
        let widget = widget(&gateway);

        let (outcome, _) = tokio::join!(widget.send("first"), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            widget.set_context(TopicContext::SecureCrypto);
        });

        assert_eq!(outcome, SendOutcome::Abandoned);
        let messages = widget.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, CHAT_GREETING);
        assert!(!widget.is_sending());
    }

    #[tokio::test]
    async fn open_request_applies_context_and_prefill() {
        let widget = widget(&MockAiGateway::new());
        let (launcher, rx) = ChatLauncher::channel();

        launcher
            .ask_about_step("Print recovery codes", TopicContext::BackupAccounts)
            .unwrap();
        drop(launcher);
        widget.listen(rx).await;

        let snapshot = widget.snapshot();
        assert!(snapshot.is_open);
        assert_eq!(snapshot.context, TopicContext::BackupAccounts);
        assert!(snapshot.draft.contains("Print recovery codes"));

        assert_eq!(widget.send_draft().await, SendOutcome::Completed);
        assert!(widget.snapshot().draft.is_empty());
    }

    #[tokio::test]
    async fn open_request_without_prefill_keeps_draft() {
        let widget = widget(&MockAiGateway::new());
        widget.set_draft("my question");
        widget.apply_open_request(OpenChatRequest::new("", None));

        let snapshot = widget.snapshot();
        assert!(snapshot.is_open);
        assert_eq!(snapshot.draft, "my question");
        assert_eq!(snapshot.context, TopicContext::Home);
    }

    #[tokio::test]
    async fn quick_prompt_sends_prompt_text() {
        let gateway = MockAiGateway::new();
        let widget = widget(&gateway);

        assert_eq!(widget.send_quick_prompt(1).await, Some(SendOutcome::Completed));
        assert_eq!(widget.messages()[1].text, QUICK_PROMPTS[1]);
        assert_eq!(widget.send_quick_prompt(9).await, None);
    }

    #[tokio::test]
    async fn offline_reply_arrives_in_one_update() {
        let widget = ChatWidget::new(Arc::new(OfflineGateway::new()), TopicContext::SecureCrypto);
        let before = widget.snapshot().revision;

        widget.send("what is a cold wallet").await;

        let reply = widget.messages().pop().unwrap().text;
        assert!(reply.contains("what is a cold wallet"));
        // placeholder, the single chunk, the hardware-wallet tip, then idle
        assert_eq!(widget.snapshot().revision, before + 4);
    }

    #[test]
    fn toggle_flips_open_state() {
        let widget = widget(&MockAiGateway::new());
        widget.toggle();
        assert!(widget.snapshot().is_open);
        widget.close();
        assert!(!widget.snapshot().is_open);
    }
}
