//! Prompt Composer - assembles the final generation instruction.
//!
//! Embeds the framework's overview, its ordered components, every
//! clarification field (with explicit "Unspecified" markers so the
//! model always sees the full field set), and up to two worked examples
//! as style anchors. The model reply is returned unmodified; stripping
//! a code-fence wrapper is a presentation concern, exposed separately
//! as [`strip_code_fence`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::domain::catalog::FrameworkDetail;
use crate::domain::conversation::ClarificationData;
use crate::domain::prompts;
use crate::ports::{ChatMessage, CompletionClient, CompletionError};

/// How many worked examples are embedded as style anchors.
const MAX_STYLE_ANCHORS: usize = 2;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:markdown)?[ \t]*\n?").expect("valid fence pattern"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\n?```\s*$").expect("valid fence pattern"));

/// Composition failures.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("prompt generation failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Assembles the final prompt from a framework and collected data.
pub struct PromptComposer {
    client: Arc<dyn CompletionClient>,
}

impl PromptComposer {
    /// Creates a composer over the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generates the optimized prompt and returns the raw model reply.
    pub async fn compose(
        &self,
        framework: &FrameworkDetail,
        data: &ClarificationData,
        config: &ServiceConfig,
    ) -> Result<String, ComposeError> {
        let components: Vec<String> = framework
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!("{}. {}({}): {}", i + 1, c.name_native, c.name_en, c.description)
            })
            .collect();

        let anchors: Vec<String> = framework
            .examples
            .iter()
            .take(MAX_STYLE_ANCHORS)
            .map(|example| format!("{}\n{}", example.title, example.body))
            .collect();

        let user_prompt = format!(
            "Use the {} framework to generate an optimized prompt.\n\n\
             Framework overview:\n{}\n\n\
             Framework elements:\n{}\n\n\
             User information:\n\
             - Original request: {}\n\
             - Goal: {}\n\
             - Audience: {}\n\
             - Context: {}\n\
             - Format requirements: {}\n\
             - Constraints: {}\n\
             - Additional information: {}\n\n\
             Reference examples:\n{}\n\n\
             Generate one complete, optimized prompt that follows every \
             element of the framework. Output as markdown.",
            framework.name,
            framework.overview,
            components.join("\n"),
            data.original_input,
            or_unspecified(&data.goal),
            or_unspecified(&data.audience),
            or_unspecified(&data.context),
            or_unspecified(&data.format_requirements),
            or_unspecified(&data.constraints),
            or_none(&data.additional_info),
            anchors.join("\n\n"),
        );

        let messages = [
            prompts::generation_system_prompt(),
            ChatMessage::user(user_prompt),
        ];

        Ok(self.client.send(&messages, config).await?)
    }
}

fn or_unspecified(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "Unspecified"
    } else {
        trimmed
    }
}

fn or_none(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "None"
    } else {
        trimmed
    }
}

/// Strips one leading and one trailing markdown code fence.
///
/// Models frequently wrap the generated prompt in ```` ```markdown ````;
/// display layers (and anyone persisting the prompt) can rely on this
/// helper to unwrap it.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::ScriptedCompletionClient;
    use crate::config::ServiceId;
    use crate::domain::catalog::{FrameworkComponent, WorkedExample};
    use crate::domain::conversation::ClarificationData;

    fn framework() -> FrameworkDetail {
        FrameworkDetail {
            id: 7,
            name: "SCQA".into(),
            name_en: "SCQA".into(),
            url: String::new(),
            scenarios: vec![],
            overview: "A four-part narrative structure.".into(),
            components: vec![
                FrameworkComponent {
                    name_native: "Situation".into(),
                    name_en: "Situation".into(),
                    description: "Set the stage".into(),
                },
                FrameworkComponent {
                    name_native: "Complication".into(),
                    name_en: "Complication".into(),
                    description: "Introduce the tension".into(),
                },
            ],
            pros: vec![],
            cons: vec![],
            examples: vec![
                WorkedExample {
                    title: "First".into(),
                    body: "first body\n".into(),
                },
                WorkedExample {
                    title: "Second".into(),
                    body: "second body\n".into(),
                },
                WorkedExample {
                    title: "Third".into(),
                    body: "never embedded\n".into(),
                },
            ],
        }
    }

    fn config() -> ServiceConfig {
        ServiceConfig::new(ServiceId::Deepseek, "sk-test", "deepseek-chat")
    }

    #[tokio::test]
    async fn embeds_every_component_description_verbatim() {
        let client = Arc::new(ScriptedCompletionClient::new().with_reply("generated"));
        let composer = PromptComposer::new(client.clone());

        // All clarification fields empty: the prompt must still be
        // complete, with explicit markers in place of missing values.
        let data = ClarificationData::default();
        let prompt = composer.compose(&framework(), &data, &config()).await.unwrap();
        assert_eq!(prompt, "generated");

        let user = client.calls()[0][1].clone();
        assert!(user.content.contains("1. Situation(Situation): Set the stage"));
        assert!(user
            .content
            .contains("2. Complication(Complication): Introduce the tension"));
        assert!(user.content.contains("A four-part narrative structure."));
        assert!(user.content.contains("- Goal: Unspecified"));
        assert!(user.content.contains("- Constraints: Unspecified"));
        assert!(user.content.contains("- Additional information: None"));
    }

    #[tokio::test]
    async fn embeds_at_most_two_style_anchors() {
        let client = Arc::new(ScriptedCompletionClient::new().with_reply("generated"));
        let composer = PromptComposer::new(client.clone());
        composer
            .compose(&framework(), &ClarificationData::default(), &config())
            .await
            .unwrap();

        let user = client.calls()[0][1].clone();
        assert!(user.content.contains("First\nfirst body"));
        assert!(user.content.contains("Second\nsecond body"));
        assert!(!user.content.contains("never embedded"));
    }

    #[tokio::test]
    async fn filled_fields_are_embedded_as_given() {
        let client = Arc::new(ScriptedCompletionClient::new().with_reply("generated"));
        let composer = PromptComposer::new(client.clone());

        let mut data = ClarificationData::for_input("write a launch email");
        data.goal = "drive signups".into();
        data.audience = "existing customers".into();
        composer.compose(&framework(), &data, &config()).await.unwrap();

        let user = client.calls()[0][1].clone();
        assert!(user.content.contains("- Original request: write a launch email"));
        assert!(user.content.contains("- Goal: drive signups"));
        assert!(user.content.contains("- Audience: existing customers"));
    }

    #[tokio::test]
    async fn reply_is_returned_unmodified() {
        let wrapped = "```markdown\n# Prompt\nbody\n```";
        let client = Arc::new(ScriptedCompletionClient::new().with_reply(wrapped));
        let composer = PromptComposer::new(client);

        let prompt = composer
            .compose(&framework(), &ClarificationData::default(), &config())
            .await
            .unwrap();
        // The fence stays; unwrapping is the caller's choice.
        assert_eq!(prompt, wrapped);
    }

    mod fence_stripping {
        use super::*;

        #[test]
        fn strips_markdown_fence_pair() {
            assert_eq!(
                strip_code_fence("```markdown\n# Prompt\nbody\n```"),
                "# Prompt\nbody"
            );
        }

        #[test]
        fn strips_bare_fence_pair() {
            assert_eq!(strip_code_fence("```\ncontent\n```"), "content");
        }

        #[test]
        fn is_case_insensitive() {
            assert_eq!(strip_code_fence("```Markdown\ncontent\n```"), "content");
        }

        #[test]
        fn leaves_unfenced_text_alone() {
            assert_eq!(strip_code_fence("# Prompt\nbody"), "# Prompt\nbody");
        }

        #[test]
        fn leaves_interior_fences_alone() {
            let text = "intro\n```\ncode\n```\noutro";
            assert_eq!(strip_code_fence(text), text);
        }

        #[test]
        fn tolerates_surrounding_whitespace() {
            assert_eq!(strip_code_fence("  ```markdown\ncontent\n```  \n"), "content");
        }
    }
}
