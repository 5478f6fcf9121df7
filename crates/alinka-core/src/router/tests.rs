//! Tests for the message router.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::completion::CompletionClient;
use crate::error::{BotError, ErrorKind, Result};
use crate::image::{ImageClient, ImageRequest, ImageResponse, ImageTransport};
use crate::messenger::{ChatAction, IncomingMessage, Messenger};
use crate::prompts::{
    director_prompt, image_prompt, CASUAL_APOLOGY, DIRECTOR_INTRO, IMAGE_BUSY, IMAGE_CAPTION,
    MEMORY_CLEARED, PAINTING_STATUS,
};
use crate::session::{SessionStore, Turn};

use super::{MessageRouter, Outcome};

const CHAT: i64 = 4242;

/// Completion client that replays scripted results.
struct MockCompletion {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<(usize, String)>>,
}

impl MockCompletion {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// (history length, prompt) for every call.
    fn prompts(&self) -> Vec<(usize, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, history: &[Turn], text: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((history.len(), text.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BotError::Http("no scripted reply".into())))
    }
}

/// Image transport that replays scripted statuses.
struct MockImages {
    statuses: Mutex<VecDeque<u16>>,
    requests: Mutex<Vec<ImageRequest>>,
}

impl MockImages {
    fn new(statuses: &[u16]) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageTransport for MockImages {
    async fn post(&self, request: &ImageRequest) -> Result<ImageResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BotError::Http("image endpoint unreachable".into()))?;
        let body = if status == 200 {
            b"IMG".to_vec()
        } else {
            b"{\"error\":\"boom\"}".to_vec()
        };
        Ok(ImageResponse { status, body })
    }
}

/// Everything the router asked the transport to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Reply(String),
    Menu(String),
    Text(String),
    Photo(Vec<u8>, String),
    Action(ChatAction),
    Delete(i32),
}

/// Messenger that records calls and hands out sequential message ids.
#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    next_id: Mutex<i32>,
    fail_photos: bool,
}

impl RecordingMessenger {
    fn failing_photos() -> Self {
        Self {
            fail_photos: true,
            ..Self::default()
        }
    }

    fn record(&self, sent: Sent) -> i32 {
        self.sent.lock().unwrap().push(sent);
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Reply(t) | Sent::Menu(t) | Sent::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn reply(&self, _to: &IncomingMessage, text: &str) -> Result<i32> {
        Ok(self.record(Sent::Reply(text.to_string())))
    }

    async fn reply_with_menu(&self, _to: &IncomingMessage, text: &str) -> Result<i32> {
        Ok(self.record(Sent::Menu(text.to_string())))
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<i32> {
        assert_eq!(chat_id, CHAT);
        Ok(self.record(Sent::Text(text.to_string())))
    }

    async fn send_photo(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<()> {
        assert_eq!(chat_id, CHAT);
        if self.fail_photos {
            return Err(BotError::Delivery("photo too large".into()));
        }
        self.record(Sent::Photo(image, caption.to_string()));
        Ok(())
    }

    async fn send_chat_action(&self, _chat_id: i64, action: ChatAction) -> Result<()> {
        self.record(Sent::Action(action));
        Ok(())
    }

    async fn delete_message(&self, _chat_id: i64, message_id: i32) -> Result<()> {
        self.record(Sent::Delete(message_id));
        Ok(())
    }
}

fn router(completion: Arc<MockCompletion>, images: Arc<MockImages>) -> MessageRouter {
    MessageRouter::new(
        Arc::new(SessionStore::new()),
        completion,
        ImageClient::new(images),
    )
}

fn message(text: &str) -> IncomingMessage {
    IncomingMessage::new(CHAT, 7, "Rina", text)
}

#[tokio::test]
async fn test_start_resets_and_shows_menu() {
    let router = router(MockCompletion::new(vec![]), MockImages::new(&[]));
    let old = router.sessions().get_or_create(CHAT);
    let messenger = RecordingMessenger::default();

    let outcome = router.handle_start(&message("/start"), &messenger).await.unwrap();

    assert_eq!(outcome, Outcome::Welcomed);
    assert!(!router.sessions().contains(CHAT));
    assert!(!Arc::ptr_eq(&old, &router.sessions().get_or_create(CHAT)));
    match &messenger.sent()[..] {
        [Sent::Menu(text)] => assert!(text.starts_with("Halo Rina!")),
        other => panic!("unexpected messages: {:?}", other),
    }
}

#[tokio::test]
async fn test_reset_button_clears_history() {
    let completion = MockCompletion::new(vec![Ok("hai".into())]);
    let router = router(completion, MockImages::new(&[]));
    let messenger = RecordingMessenger::default();

    router.handle_message(&message("halo"), &messenger).await.unwrap();
    assert_eq!(router.sessions().get_or_create(CHAT).lock().await.len(), 2);

    let outcome = router
        .handle_message(&message("♻️ Reset Ingatan"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::MemoryCleared);
    assert!(router.sessions().get_or_create(CHAT).lock().await.is_empty());
    assert_eq!(messenger.sent().last(), Some(&Sent::Reply(MEMORY_CLEARED.into())));
}

#[tokio::test]
async fn test_director_button_only_prompts_for_idea() {
    let completion = MockCompletion::new(vec![]);
    let images = MockImages::new(&[]);
    let router = router(completion.clone(), images.clone());
    let messenger = RecordingMessenger::default();

    let outcome = router
        .handle_message(&message("🎬 Mode Sutradara"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::DirectorIntro);
    assert_eq!(messenger.sent(), vec![Sent::Reply(DIRECTOR_INTRO.into())]);
    assert!(completion.prompts().is_empty());
    assert!(images.requests().is_empty());
}

#[tokio::test]
async fn test_director_happy_path() {
    let text = "buatkan prompt kucing astronot";
    let completion = MockCompletion::new(vec![Ok("1. KONSEP\n2. PROMPT".into())]);
    let images = MockImages::new(&[200]);
    let router = router(completion.clone(), images.clone());
    let messenger = RecordingMessenger::default();

    let outcome = router.handle_message(&message(text), &messenger).await.unwrap();

    assert_eq!(outcome, Outcome::Director { image_delivered: true });
    assert_eq!(completion.prompts(), vec![(0, director_prompt(text))]);
    assert_eq!(images.requests(), vec![ImageRequest::new(image_prompt(text))]);

    // ids: 1 typing, 2 reply, 3 upload action, 4 status message
    assert_eq!(
        messenger.sent(),
        vec![
            Sent::Action(ChatAction::Typing),
            Sent::Reply("1. KONSEP\n2. PROMPT".into()),
            Sent::Action(ChatAction::UploadPhoto),
            Sent::Text(PAINTING_STATUS.into()),
            Sent::Photo(b"IMG".to_vec(), IMAGE_CAPTION.into()),
            Sent::Delete(4),
        ]
    );
}

#[tokio::test]
async fn test_director_long_reply_is_hard_cut() {
    let long_reply = "x".repeat(4500);
    let completion = MockCompletion::new(vec![Ok(long_reply.clone())]);
    let router = router(completion, MockImages::new(&[200]));
    let messenger = RecordingMessenger::default();

    router
        .handle_message(&message("ide video pantai"), &messenger)
        .await
        .unwrap();

    // Over-long replies go out as a plain message, not a quoted reply.
    let sent = messenger.sent();
    assert_eq!(sent[1], Sent::Text(long_reply[..4000].to_string()));
    assert!(!sent.iter().any(|s| matches!(s, Sent::Reply(_))));
}

#[tokio::test]
async fn test_director_truncation_counts_chars() {
    let completion = MockCompletion::new(vec![Ok("é".repeat(4001))]);
    let router = router(completion, MockImages::new(&[200]));
    let messenger = RecordingMessenger::default();

    router
        .handle_message(&message("bikin konsep"), &messenger)
        .await
        .unwrap();

    assert_eq!(messenger.sent()[1], Sent::Text("é".repeat(4000)));
}

#[tokio::test]
async fn test_director_image_failure_reports_busy() {
    let completion = MockCompletion::new(vec![Ok("konsep".into())]);
    let images = MockImages::new(&[500]);
    let router = router(completion, images.clone());
    let messenger = RecordingMessenger::default();

    let outcome = router
        .handle_message(&message("poster konser"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Director { image_delivered: false });
    assert_eq!(images.requests().len(), 1);
    let sent = messenger.sent();
    assert_eq!(
        &sent[sent.len() - 2..],
        &[Sent::Delete(4), Sent::Text(IMAGE_BUSY.into())]
    );
}

#[tokio::test]
async fn test_director_completion_failure_keeps_session() {
    let completion = MockCompletion::new(vec![
        Ok("halo juga".into()),
        Err(BotError::CompletionStatus {
            status: 503,
            body: "overloaded".into(),
        }),
    ]);
    let images = MockImages::new(&[]);
    let router = router(completion, images.clone());
    let messenger = RecordingMessenger::default();

    router.handle_message(&message("halo"), &messenger).await.unwrap();
    let before = router.sessions().get_or_create(CHAT);

    let outcome = router
        .handle_message(&message("gambar naga"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::DirectorFailed(ErrorKind::TransientUpstream));
    let after = router.sessions().get_or_create(CHAT);
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.lock().await.len(), 2);
    assert!(images.requests().is_empty());
    assert_eq!(
        messenger.texts().last().unwrap(),
        "Maaf, ada gangguan sistem: completion API error 503: overloaded"
    );
}

#[tokio::test]
async fn test_director_image_transport_error_cleans_up_status() {
    let completion = MockCompletion::new(vec![Ok("konsep".into())]);
    let router = router(completion, MockImages::new(&[]));
    let messenger = RecordingMessenger::default();

    let outcome = router
        .handle_message(&message("gambar kota"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::DirectorFailed(ErrorKind::Unknown));
    let sent = messenger.sent();
    assert!(sent.contains(&Sent::Delete(4)));
    assert_eq!(
        sent.last(),
        Some(&Sent::Reply(
            "Maaf, ada gangguan sistem: HTTP error: image endpoint unreachable".into()
        ))
    );
}

#[tokio::test]
async fn test_director_delivery_failure_is_reported() {
    let completion = MockCompletion::new(vec![Ok("konsep".into())]);
    let router = router(completion, MockImages::new(&[200]));
    let messenger = RecordingMessenger::failing_photos();

    let outcome = router
        .handle_message(&message("gambar hutan"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::DirectorFailed(ErrorKind::Unknown));
    assert_eq!(
        messenger.texts().last().unwrap(),
        "Maaf, ada gangguan sistem: delivery failed: photo too large"
    );
}

#[tokio::test]
async fn test_casual_reply_is_verbatim() {
    let long_reply = "y".repeat(4500);
    let completion = MockCompletion::new(vec![Ok(long_reply.clone())]);
    let images = MockImages::new(&[]);
    let router = router(completion.clone(), images.clone());
    let messenger = RecordingMessenger::default();

    let outcome = router
        .handle_message(&message("apa kabar?"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Casual);
    assert_eq!(completion.prompts(), vec![(0, "apa kabar?".to_string())]);
    assert_eq!(
        messenger.sent(),
        vec![Sent::Action(ChatAction::Typing), Sent::Reply(long_reply)]
    );
    assert!(images.requests().is_empty());
}

#[tokio::test]
async fn test_casual_history_carries_over() {
    let completion = MockCompletion::new(vec![Ok("satu".into()), Ok("dua".into())]);
    let router = router(completion.clone(), MockImages::new(&[]));
    let messenger = RecordingMessenger::default();

    router.handle_message(&message("pertama"), &messenger).await.unwrap();
    router.handle_message(&message("kedua"), &messenger).await.unwrap();

    assert_eq!(
        completion.prompts(),
        vec![(0, "pertama".to_string()), (2, "kedua".to_string())]
    );
}

#[tokio::test]
async fn test_casual_failure_replaces_session() {
    let completion = MockCompletion::new(vec![
        Ok("hai".into()),
        Err(BotError::Http("connection reset".into())),
    ]);
    let router = router(completion, MockImages::new(&[]));
    let messenger = RecordingMessenger::default();

    router.handle_message(&message("halo"), &messenger).await.unwrap();
    let before = router.sessions().get_or_create(CHAT);
    assert_eq!(before.lock().await.len(), 2);

    let outcome = router
        .handle_message(&message("masih ingat?"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::CasualRecovered(ErrorKind::Unknown));
    let after = router.sessions().get_or_create(CHAT);
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.lock().await.is_empty());
    assert_eq!(messenger.sent().last(), Some(&Sent::Reply(CASUAL_APOLOGY.into())));
}

#[tokio::test]
async fn test_casual_label_goes_to_completion() {
    let completion = MockCompletion::new(vec![Ok("oke".into())]);
    let router = router(completion.clone(), MockImages::new(&[]));
    let messenger = RecordingMessenger::default();

    let outcome = router
        .handle_message(&message("💬 Ngobrol Santai"), &messenger)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Casual);
    assert_eq!(completion.prompts().len(), 1);
}
