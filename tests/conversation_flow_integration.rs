//! End-to-end conversation flows over scripted collaborators.
//!
//! Drives the controller through the full match -> select -> clarify ->
//! generate -> adjust lifecycle without touching the network.

use std::sync::Arc;

use promptsmith::adapters::ai::ScriptedCompletionClient;
use promptsmith::adapters::catalog::InMemoryResourceStore;
use promptsmith::application::{ControllerReply, ConversationController};
use promptsmith::config::{ServiceConfig, ServiceId};
use promptsmith::domain::catalog::{FrameworkCatalog, INDEX_PATH};
use promptsmith::domain::conversation::Stage;
use promptsmith::ports::MessageRole;

const INDEX: &str = r#"[
    {"id": 7, "name": "SCQA", "nameEn": "Situation-Complication-Question-Answer", "scenario": "structured storytelling", "filename": "scqa.md"},
    {"id": 12, "name": "CO-STAR", "nameEn": "Context-Objective-Style-Tone-Audience-Response", "scenario": "general purpose prompting", "filename": "co-star.md"}
]"#;

const SCQA_DOCUMENT: &str = "\
# SCQA Framework

## URL
https://example.com/scqa

## Scenarios
- structured storytelling

## Overview
A four-part narrative structure.

## Components
| Component | English | Description |
|---|---|---|
| Situation | Situation | Set the stage |
| Complication | Complication | Introduce the tension |
| Question | Question | Pose the key question |
| Answer | Answer | Deliver the resolution |

## Pros
- Clear narrative flow

## Cons
- Rigid for free-form tasks

## Best Practices
### Product announcement
Lead with the market situation.
";

const MATCH_REPLY: &str = r#"Happy to help! Here are my picks:
```json
{"frameworks": [
  {"name": "SCQA", "nameEn": "Situation-Complication-Question-Answer", "reason": "story-shaped request", "complexity": "Medium", "elements": 4},
  {"name": "CO-STAR", "nameEn": "Context-Objective-Style-Tone-Audience-Response", "reason": "solid generalist", "complexity": "Complex", "elements": 6}
]}
```"#;

const ROUND_ONE_REPLY: &str = r#"{"questions": [
    {"dimension": "target audience", "question": "Who is the audience?", "hint": "sets the tone"},
    {"dimension": "format requirements", "question": "How long should it be?", "hint": "bounds the output"}
], "isComplete": false}"#;

fn resource_store() -> Arc<InMemoryResourceStore> {
    Arc::new(
        InMemoryResourceStore::new()
            .with_resource(INDEX_PATH, INDEX)
            .with_resource("frameworks/scqa.md", SCQA_DOCUMENT),
    )
}

fn controller(client: ScriptedCompletionClient) -> ConversationController {
    let resources = resource_store();
    let mut catalog = FrameworkCatalog::new();
    assert!(catalog.initialize(resources.as_ref()));
    ConversationController::new(
        catalog,
        resources,
        Arc::new(client),
        ServiceConfig::new(ServiceId::Deepseek, "sk-test", "deepseek-chat"),
    )
}

#[tokio::test]
async fn full_lifecycle_from_request_to_adjusted_prompt() {
    let client = ScriptedCompletionClient::new()
        .with_reply(MATCH_REPLY)
        .with_reply(ROUND_ONE_REPLY)
        .with_reply("```markdown\n# Optimized prompt\nversion one\n```")
        .with_reply("# Optimized prompt\nversion two");
    let mut controller = controller(client);

    // 1. First utterance: matching.
    let replies = controller
        .handle_send("I need a prompt for announcing our new API")
        .await
        .unwrap();
    assert_eq!(controller.session().stage, Stage::Matching);
    let shortlist = replies
        .iter()
        .find_map(|reply| match reply {
            ControllerReply::Recommendations(frameworks) => Some(frameworks.clone()),
            _ => None,
        })
        .expect("matching must produce recommendations");
    assert_eq!(shortlist.len(), 2);
    assert_eq!(shortlist[0].name, "SCQA");

    // 2. Selection: clarification round one.
    let replies = controller.select_framework(0).await.unwrap();
    assert_eq!(controller.session().stage, Stage::Clarifying);
    assert_eq!(controller.session().clarification_round, 1);
    assert!(replies.iter().any(|reply| matches!(
        reply,
        ControllerReply::Questions { questions, remaining_rounds: 1 } if questions.len() == 2
    )));

    // 3. Answer: hits the ceiling (max 2) and generates directly.
    let replies = controller
        .handle_send("audience is developers; keep it under 300 words")
        .await
        .unwrap();
    assert_eq!(controller.session().stage, Stage::Complete);
    assert_eq!(controller.session().clarification_round, 2);
    let prompt = replies
        .iter()
        .find_map(|reply| match reply {
            ControllerReply::GeneratedPrompt(prompt) => Some(prompt.clone()),
            _ => None,
        })
        .expect("generation must produce a prompt");
    // Raw reply, fence included.
    assert!(prompt.starts_with("```markdown"));

    // 4. Adjustment: regenerates with the request appended.
    let replies = controller.handle_send("add a call to action").await.unwrap();
    assert_eq!(controller.session().stage, Stage::Complete);
    assert_eq!(
        controller.session().generated_prompt,
        "# Optimized prompt\nversion two"
    );
    assert!(replies
        .iter()
        .any(|reply| matches!(reply, ControllerReply::GeneratedPrompt(p) if p.contains("version two"))));
    assert!(controller
        .session()
        .clarification_data
        .additional_info
        .contains("Adjustment request: add a call to action"));
}

#[tokio::test]
async fn composer_receives_framework_and_collected_answers() {
    let client = ScriptedCompletionClient::new()
        .with_reply(MATCH_REPLY)
        .with_reply(ROUND_ONE_REPLY)
        .with_reply("generated");
    let mut controller = controller(client.clone());

    controller.handle_send("announce our new API").await.unwrap();
    controller.select_framework(0).await.unwrap();
    controller.handle_send("developers; 300 words").await.unwrap();

    // Last call is the generation request.
    let calls = client.calls();
    let generation = calls.last().unwrap();
    let user = &generation[1];
    assert!(user.content.contains("Use the SCQA framework"));
    assert!(user.content.contains("1. Situation(Situation): Set the stage"));
    assert!(user.content.contains("4. Answer(Answer): Deliver the resolution"));
    assert!(user.content.contains("- Original request: announce our new API"));
    assert!(user.content.contains("developers; 300 words"));
    assert!(user.content.contains("Product announcement"));
    // Unanswered dimensions stay visible as explicit markers.
    assert!(user.content.contains("- Goal: Unspecified"));
}

#[tokio::test]
async fn round_counter_is_monotonic_across_the_whole_session() {
    let client = ScriptedCompletionClient::new()
        .with_reply(MATCH_REPLY)
        .with_reply(ROUND_ONE_REPLY)
        .with_reply("prompt");
    let mut controller = controller(client);

    let mut observed = vec![controller.session().clarification_round];
    controller.handle_send("announce our new API").await.unwrap();
    observed.push(controller.session().clarification_round);
    controller.select_framework(0).await.unwrap();
    observed.push(controller.session().clarification_round);
    controller.handle_send("some answer").await.unwrap();
    observed.push(controller.session().clarification_round);

    assert_eq!(observed, vec![0, 0, 1, 2]);
    assert!(observed.windows(2).all(|w| w[0] <= w[1]));
    let session = controller.session();
    assert!(session.clarification_round <= session.max_clarification_rounds);
}

#[tokio::test]
async fn match_failure_keeps_the_session_usable_for_retry() {
    let client = ScriptedCompletionClient::new()
        .with_error(promptsmith::ports::CompletionError::NetworkUnreachable(
            "dns".into(),
        ))
        .with_reply(MATCH_REPLY);
    let mut controller = controller(client);

    assert!(controller.handle_send("announce our new API").await.is_err());
    assert_eq!(controller.session().stage, Stage::Initial);

    // Same session, second try succeeds.
    let replies = controller.handle_send("announce our new API").await.unwrap();
    assert_eq!(controller.session().stage, Stage::Matching);
    assert!(replies
        .iter()
        .any(|reply| matches!(reply, ControllerReply::Recommendations(_))));
}

#[tokio::test]
async fn transcript_interleaves_user_and_assistant_turns() {
    let client = ScriptedCompletionClient::new()
        .with_reply(MATCH_REPLY)
        .with_reply(ROUND_ONE_REPLY);
    let mut controller = controller(client);

    controller.handle_send("announce our new API").await.unwrap();
    controller.select_framework(0).await.unwrap();

    let history = &controller.session().history;
    assert!(history.len() >= 3);
    assert_eq!(history[0].role, MessageRole::User);
    assert!(history
        .iter()
        .filter(|entry| entry.role == MessageRole::Assistant)
        .count() >= 2);
    // The clarification questions land in the transcript fully rendered.
    assert!(history
        .iter()
        .any(|entry| entry.content.contains("Who is the audience?")));
}
