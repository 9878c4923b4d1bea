//! Conversation Controller - routes user events through the stages.
//!
//! Owns the single mutable [`ConversationSession`] and serializes access
//! to it: while one async call is outstanding the controller rejects
//! further events instead of racing them. Component failures are caught
//! here and the session reverts to the nearest stable stage (`Initial`
//! on match failure, `Clarifying` on generation failure).

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::domain::catalog::{CatalogError, FrameworkCatalog};
use crate::domain::clarification::{
    ClarificationEngine, ClarificationError, ClarificationQuestion,
};
use crate::domain::composer::{ComposeError, PromptComposer};
use crate::domain::conversation::{ConversationSession, Stage};
use crate::domain::foundation::{StateMachine, TransitionError};
use crate::domain::matching::{FrameworkMatcher, MatchError, RankedFramework};
use crate::ports::{CompletionClient, MessageRole, ResourceStore};

/// What the controller hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerReply {
    /// A plain assistant message.
    Assistant(String),
    /// The matcher's shortlist, awaiting a selection.
    Recommendations(Vec<RankedFramework>),
    /// Clarification questions for the current round.
    Questions {
        questions: Vec<ClarificationQuestion>,
        remaining_rounds: u32,
    },
    /// The generated prompt (raw model reply; see
    /// [`strip_code_fence`](crate::domain::composer::strip_code_fence)).
    GeneratedPrompt(String),
}

/// Controller failures surfaced to the caller.
///
/// Every variant leaves the session in a stable stage; nothing here is
/// fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Another request is still in flight for this session.
    #[error("another request is already in flight for this session")]
    Busy,

    /// A selection arrived while none was pending.
    #[error("no framework recommendations are awaiting selection")]
    NoPendingSelection,

    /// The selection index missed the shortlist.
    #[error("selection {index} is out of range ({count} recommendations)")]
    SelectionOutOfRange { index: usize, count: usize },

    /// The picked framework could not be resolved in the catalog.
    #[error("could not resolve framework \"{name}\" in the catalog")]
    UnknownFramework { name: String },

    /// Regeneration was requested before any prompt existed.
    #[error("nothing to regenerate: no prompt has been generated yet")]
    NothingToRegenerate,

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Clarification(#[from] ClarificationError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The top-level conversation state machine.
pub struct ConversationController {
    catalog: FrameworkCatalog,
    resources: Arc<dyn ResourceStore>,
    matcher: FrameworkMatcher,
    clarifier: ClarificationEngine,
    composer: PromptComposer,
    service_config: ServiceConfig,
    session: ConversationSession,
    busy: bool,
}

impl ConversationController {
    /// Creates a controller over injected collaborators.
    ///
    /// The catalog must already be initialized; the matcher,
    /// clarification engine, and composer are built over the given
    /// completion client.
    pub fn new(
        catalog: FrameworkCatalog,
        resources: Arc<dyn ResourceStore>,
        client: Arc<dyn CompletionClient>,
        service_config: ServiceConfig,
    ) -> Self {
        Self {
            catalog,
            resources,
            matcher: FrameworkMatcher::new(Arc::clone(&client)),
            clarifier: ClarificationEngine::new(Arc::clone(&client)),
            composer: PromptComposer::new(client),
            service_config,
            session: ConversationSession::new(),
            busy: false,
        }
    }

    /// Read access to the live session.
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// The active service configuration.
    pub fn service_config(&self) -> &ServiceConfig {
        &self.service_config
    }

    /// Swaps the active service configuration (e.g. after the user
    /// saves new settings).
    pub fn set_service_config(&mut self, config: ServiceConfig) {
        self.service_config = config;
    }

    /// Discards the session wholesale and starts over.
    ///
    /// Valid from any stage; the round ceiling carries over.
    pub fn new_conversation(&mut self) {
        self.session = ConversationSession::with_max_rounds(self.session.max_clarification_rounds);
        self.busy = false;
    }

    /// Routes a user utterance by the current stage.
    pub async fn handle_send(
        &mut self,
        input: &str,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        let input = input.trim().to_string();
        if input.is_empty() {
            return Ok(Vec::new());
        }

        self.begin()?;
        let result = self.dispatch(&input).await;
        self.busy = false;
        result
    }

    /// Picks one of the recommended frameworks and starts clarifying.
    pub async fn select_framework(
        &mut self,
        index: usize,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        self.begin()?;
        let result = self.do_select_framework(index).await;
        self.busy = false;
        result
    }

    /// Re-runs generation for the current data (only once complete).
    pub async fn regenerate(&mut self) -> Result<Vec<ControllerReply>, ControllerError> {
        self.begin()?;
        let result = if self.session.stage == Stage::Complete {
            self.generate(Vec::new()).await
        } else {
            Err(ControllerError::NothingToRegenerate)
        };
        self.busy = false;
        result
    }

    /// Rejects re-entrant events while a call is outstanding.
    fn begin(&mut self) -> Result<(), ControllerError> {
        if self.busy {
            return Err(ControllerError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    async fn dispatch(&mut self, input: &str) -> Result<Vec<ControllerReply>, ControllerError> {
        self.session.record(MessageRole::User, input);

        match self.session.stage {
            Stage::Initial => self.handle_initial_input(input).await,
            Stage::Matching => {
                let note = "Select one of the recommended frameworks to continue.";
                self.session.record(MessageRole::Assistant, note);
                Ok(vec![ControllerReply::Assistant(note.to_string())])
            }
            Stage::Clarifying => self.handle_clarification_response(input).await,
            // Generation never persists across calls; an utterance here
            // can only race an in-flight call.
            Stage::Generating => Err(ControllerError::Busy),
            Stage::Complete => self.handle_adjustment_request(input).await,
        }
    }

    /// `Initial -> Matching`: run the matcher; revert on failure.
    async fn handle_initial_input(
        &mut self,
        input: &str,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        self.session.user_input = input.to_string();
        self.session.clarification_data.original_input = input.to_string();
        self.session.stage = self.session.stage.transition_to(Stage::Matching)?;

        match self
            .matcher
            .match_frameworks(&self.catalog, input, &self.service_config)
            .await
        {
            Ok(frameworks) => {
                self.session.recommended_frameworks = frameworks.clone();
                let note = "Here are the frameworks that fit your request best; \
                            select one to continue.";
                self.session.record(MessageRole::Assistant, note);
                Ok(vec![
                    ControllerReply::Assistant(note.to_string()),
                    ControllerReply::Recommendations(frameworks),
                ])
            }
            Err(err) => {
                tracing::warn!(error = %err, "framework matching failed");
                self.session.stage = self.session.stage.transition_to(Stage::Initial)?;
                Err(err.into())
            }
        }
    }

    async fn do_select_framework(
        &mut self,
        index: usize,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        if !self.session.stage.awaits_selection() || self.session.recommended_frameworks.is_empty()
        {
            return Err(ControllerError::NoPendingSelection);
        }

        let count = self.session.recommended_frameworks.len();
        let chosen = self
            .session
            .recommended_frameworks
            .get(index)
            .cloned()
            .ok_or(ControllerError::SelectionOutOfRange { index, count })?;

        let id = self
            .catalog
            .find_id_by_name(&chosen.name, &chosen.name_en)
            .ok_or_else(|| ControllerError::UnknownFramework {
                name: chosen.name.clone(),
            })?;

        let detail = self
            .catalog
            .load_detail(id, self.resources.as_ref())?
            .clone();

        let note = format!(
            "You picked the {} framework. Let's pin down the remaining \
             details so the prompt comes out precise.",
            detail.name
        );
        self.session.selected_framework = Some(detail);
        self.session.stage = self.session.stage.transition_to(Stage::Clarifying)?;
        self.session.record(MessageRole::Assistant, &note);

        self.session.begin_clarification_round();
        let mut replies = vec![ControllerReply::Assistant(note)];
        let round_replies = self.run_clarification_round().await?;
        replies.extend(round_replies);
        Ok(replies)
    }

    /// One engine round: emit questions, or move on to generation when
    /// the engine says complete or the ceiling is hit.
    async fn run_clarification_round(
        &mut self,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        let framework = self
            .session
            .selected_framework
            .clone()
            .expect("clarification requires a selected framework");

        let outcome = self
            .clarifier
            .ask(
                &framework,
                &self.session.user_input,
                &self.session.clarification_data,
                &self.service_config,
                self.session.clarification_round,
                self.session.max_clarification_rounds,
            )
            .await?;

        // The engine's flag is advisory; the ceiling is authoritative.
        if outcome.is_complete || self.session.at_round_ceiling() {
            let mut replies = Vec::new();
            if self.session.at_round_ceiling() && !outcome.is_complete {
                let note = "Enough information collected; generating your prompt now...";
                self.session.record(MessageRole::Assistant, note);
                replies.push(ControllerReply::Assistant(note.to_string()));
            }
            return self.generate(replies).await;
        }

        let remaining = self.session.remaining_rounds();
        // The transcript keeps the fully rendered list; the reply keeps
        // the structured form for the presentation layer.
        self.session
            .record(MessageRole::Assistant, format_questions(&outcome.questions, remaining));
        Ok(vec![
            ControllerReply::Assistant(format!(
                "Please answer the following ({remaining} confirmation round(s) left):"
            )),
            ControllerReply::Questions {
                questions: outcome.questions,
                remaining_rounds: remaining,
            },
        ])
    }

    /// `Clarifying -> Clarifying | Generating`: fold the answer in,
    /// advance the round, and re-consult the engine unless the ceiling
    /// was hit.
    async fn handle_clarification_response(
        &mut self,
        input: &str,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        self.session.clarification_data.append_answer(input);
        self.session.begin_clarification_round();

        if self.session.at_round_ceiling() {
            let note = "Enough information collected; generating your prompt now...";
            self.session.record(MessageRole::Assistant, note);
            return self
                .generate(vec![ControllerReply::Assistant(note.to_string())])
                .await;
        }

        self.run_clarification_round().await
    }

    /// `Complete -> Generating -> Complete`: adjustment requests append
    /// to the collected data and repeat the whole generation step.
    async fn handle_adjustment_request(
        &mut self,
        input: &str,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        self.session.clarification_data.append_adjustment(input);
        let note = "Adjusting the prompt based on your request...";
        self.session.record(MessageRole::Assistant, note);
        self.generate(vec![ControllerReply::Assistant(note.to_string())])
            .await
    }

    /// Runs the composer; on failure the session reverts to
    /// `Clarifying` so the user can retry or add information.
    async fn generate(
        &mut self,
        mut replies: Vec<ControllerReply>,
    ) -> Result<Vec<ControllerReply>, ControllerError> {
        let framework = self
            .session
            .selected_framework
            .clone()
            .expect("generation requires a selected framework");

        self.session.stage = self.session.stage.transition_to(Stage::Generating)?;

        match self
            .composer
            .compose(&framework, &self.session.clarification_data, &self.service_config)
            .await
        {
            Ok(prompt) => {
                self.session.generated_prompt = prompt.clone();
                self.session.stage = self.session.stage.transition_to(Stage::Complete)?;
                let note = "Prompt generated. Reply with any adjustment you want applied.";
                self.session.record(MessageRole::Assistant, note);
                replies.push(ControllerReply::Assistant(note.to_string()));
                replies.push(ControllerReply::GeneratedPrompt(prompt));
                Ok(replies)
            }
            Err(err) => {
                tracing::warn!(error = %err, "prompt generation failed");
                self.session.stage = self.session.stage.transition_to(Stage::Clarifying)?;
                Err(err.into())
            }
        }
    }
}

/// Renders a question list the way the transcript shows it.
fn format_questions(questions: &[ClarificationQuestion], remaining_rounds: u32) -> String {
    let rendered: Vec<String> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            if q.hint.is_empty() {
                format!("{}. {}", i + 1, q.question)
            } else {
                format!("{}. {} ({})", i + 1, q.question, q.hint)
            }
        })
        .collect();

    format!(
        "Please answer the following ({remaining_rounds} confirmation round(s) left):\n\n{}",
        rendered.join("\n\n")
    )
}
