//! Every generated answer leaves one structured record on the turn target.

use std::sync::Arc;

use scholar_rag::generator::{AnswerGenerator, TurnRecord};
use scholar_rag::messages;
use scholar_rag::MockChatModel;
use scholar_telemetry::{TURN_TARGET, TurnCapture};
use tracing_subscriber::layer::SubscriberExt;
use uuid::Uuid;

fn turn<'a>(session: Uuid, prompt: &'a str) -> TurnRecord<'a> {
    TurnRecord {
        session,
        document: "paper1.pdf",
        query: "what is it about?",
        context: "📄 **Deep Learning Basics** (Page 1):\nLorem ipsum",
        prompt,
    }
}

#[tokio::test]
async fn successful_turn_is_logged_with_all_fields() {
    let capture = TurnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let session = Uuid::new_v4();
    let generator = AnswerGenerator::new(Arc::new(MockChatModel::new("It covers neural nets.")));
    generator.generate(turn(session, "PROMPT")).await;

    let events = capture.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.target, TURN_TARGET);
    assert_eq!(event.field("session"), Some(session.to_string()));
    assert_eq!(event.field("document").as_deref(), Some("paper1.pdf"));
    assert_eq!(event.field("query").as_deref(), Some("what is it about?"));
    assert_eq!(event.field("prompt").as_deref(), Some("PROMPT"));
    assert_eq!(event.field("response").as_deref(), Some("It covers neural nets."));
    assert!(event.field("context").unwrap().contains("Lorem ipsum"));
}

#[tokio::test]
async fn failed_turn_is_logged_with_failure_note() {
    let capture = TurnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let generator = AnswerGenerator::new(Arc::new(MockChatModel::failing()));
    let reply = generator.generate(turn(Uuid::nil(), "PROMPT")).await;
    assert_eq!(reply, messages::GENERATION_FAILED);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("response").as_deref(), Some(messages::GENERATION_FAILED));
    assert!(events[0].field("failure").unwrap().contains("scripted failure"));
}
