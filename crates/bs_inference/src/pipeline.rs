//! Summarize-then-translate orchestration.
//!
//! The run is modelled as a small state machine. [`PipelineState::next`] is a
//! pure transition function; [`SummaryPipeline`] performs the I/O each state
//! asks for and feeds the outcome back in as an [`Event`].
//!
//! A transient backend failure (429/503) in either stage restarts the whole
//! sequence from `Summarizing` after a backoff, so the Urdu text is always
//! derived from the English summary of the same attempt.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use bs_core::{BoundedText, CompletionBackend, CompletionError, PipelineError, Stage, SummaryPair};
use crate::{prompts, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Summarizing { attempt: u32 },
    Translating { attempt: u32, english: String },
    /// Waiting before `attempt` starts
    RetryWait { attempt: u32 },
    Done(SummaryPair),
    Failed(PipelineError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Replied(String),
    Errored(CompletionError),
    BackoffElapsed,
}

impl From<std::result::Result<String, CompletionError>> for Event {
    fn from(result: std::result::Result<String, CompletionError>) -> Self {
        match result {
            Ok(reply) => Event::Replied(reply),
            Err(e) => Event::Errored(e),
        }
    }
}

impl PipelineState {
    pub fn start() -> Self {
        PipelineState::Summarizing { attempt: 1 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done(_) | PipelineState::Failed(_))
    }

    /// Advance the machine. Events that do not apply to the current state
    /// leave it unchanged; terminal states absorb everything.
    pub fn next(self, event: Event, policy: &RetryPolicy) -> PipelineState {
        match (self, event) {
            (PipelineState::Summarizing { attempt }, Event::Replied(english)) => {
                PipelineState::Translating { attempt, english }
            }
            (PipelineState::Summarizing { attempt }, Event::Errored(e)) => {
                Self::on_error(Stage::Summarizing, attempt, e, policy)
            }
            (PipelineState::Translating { english, .. }, Event::Replied(urdu)) => {
                PipelineState::Done(SummaryPair { english, urdu })
            }
            (PipelineState::Translating { attempt, .. }, Event::Errored(e)) => {
                Self::on_error(Stage::Translating, attempt, e, policy)
            }
            (PipelineState::RetryWait { attempt }, Event::BackoffElapsed) => {
                PipelineState::Summarizing { attempt }
            }
            (state, _) => state,
        }
    }

    fn on_error(stage: Stage, attempt: u32, source: CompletionError, policy: &RetryPolicy) -> PipelineState {
        if !source.is_transient() {
            return PipelineState::Failed(PipelineError::Completion { stage, source });
        }
        if attempt > policy.max_retries {
            return PipelineState::Failed(PipelineError::RetriesExhausted {
                stage,
                attempts: attempt,
                source,
            });
        }
        PipelineState::RetryWait { attempt: attempt + 1 }
    }
}

pub struct SummaryPipeline {
    model: Arc<dyn CompletionBackend>,
    retry: RetryPolicy,
}

impl fmt::Debug for SummaryPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryPipeline")
            .field("model", &self.model.name())
            .field("retry", &self.retry)
            .finish()
    }
}

impl SummaryPipeline {
    pub fn new(model: Arc<dyn CompletionBackend>, retry: RetryPolicy) -> Self {
        Self { model, retry }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Produce the English summary and its Urdu translation for `text`.
    pub async fn summarize(&self, text: &BoundedText) -> std::result::Result<SummaryPair, PipelineError> {
        let mut state = PipelineState::start();
        loop {
            state = match state {
                PipelineState::Done(pair) => {
                    info!("✨ Summary and translation ready ({} chars / {} chars)", pair.english.len(), pair.urdu.len());
                    return Ok(pair);
                }
                PipelineState::Failed(e) => {
                    warn!("❌ Summarization failed: {}", e);
                    return Err(e);
                }
                active => {
                    let event = self.run(&active, text).await;
                    active.next(event, &self.retry)
                }
            };
        }
    }

    async fn run(&self, state: &PipelineState, text: &BoundedText) -> Event {
        match state {
            PipelineState::Summarizing { attempt } => {
                debug!("🤖 Summarizing with {} (attempt {})", self.model.name(), attempt);
                self.model.complete(&prompts::summary_prompt(text)).await.into()
            }
            PipelineState::Translating { attempt, english } => {
                debug!("🌐 Translating summary to Urdu (attempt {})", attempt);
                self.model.complete(&prompts::translation_prompt(english)).await.into()
            }
            PipelineState::RetryWait { attempt } => {
                warn!(
                    "📉 Completion backend throttled, retrying once in {:?} (attempt {})",
                    self.retry.backoff, attempt
                );
                tokio::time::sleep(self.retry.backoff).await;
                Event::BackoffElapsed
            }
            PipelineState::Done(_) | PipelineState::Failed(_) => Event::BackoffElapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::models::ScriptedModel;

    fn ok(text: &str) -> std::result::Result<String, CompletionError> {
        Ok(text.to_string())
    }

    fn status(code: u16) -> std::result::Result<String, CompletionError> {
        Err(CompletionError::with_status(code, format!("status {}", code)))
    }

    fn pipeline(model: Arc<ScriptedModel>) -> SummaryPipeline {
        SummaryPipeline::new(model, RetryPolicy::default())
    }

    #[test]
    fn test_transitions_happy_path() {
        let policy = RetryPolicy::default();
        let state = PipelineState::start();
        let state = state.next(Event::Replied("english".into()), &policy);
        assert_eq!(state, PipelineState::Translating { attempt: 1, english: "english".into() });
        let state = state.next(Event::Replied("urdu".into()), &policy);
        assert_eq!(
            state,
            PipelineState::Done(SummaryPair { english: "english".into(), urdu: "urdu".into() })
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_transient_error_in_either_stage_restarts_from_summarizing() {
        let policy = RetryPolicy::default();
        let throttled = CompletionError::with_status(429, "slow down");

        let state = PipelineState::Translating { attempt: 1, english: "stale".into() }
            .next(Event::Errored(throttled.clone()), &policy);
        assert_eq!(state, PipelineState::RetryWait { attempt: 2 });
        assert_eq!(state.next(Event::BackoffElapsed, &policy), PipelineState::Summarizing { attempt: 2 });

        let state = PipelineState::Summarizing { attempt: 2 }.next(Event::Errored(throttled), &policy);
        assert!(matches!(
            state,
            PipelineState::Failed(PipelineError::RetriesExhausted { attempts: 2, stage: Stage::Summarizing, .. })
        ));
    }

    #[test]
    fn test_permanent_error_fails_immediately() {
        let state = PipelineState::start()
            .next(Event::Errored(CompletionError::with_status(401, "bad key")), &RetryPolicy::default());
        assert!(matches!(
            state,
            PipelineState::Failed(PipelineError::Completion { stage: Stage::Summarizing, .. })
        ));
    }

    #[test]
    fn test_terminal_and_mismatched_events_are_ignored() {
        let policy = RetryPolicy::default();
        let done = PipelineState::Done(SummaryPair { english: "a".into(), urdu: "b".into() });
        assert_eq!(done.clone().next(Event::Replied("c".into()), &policy), done);
        let waiting = PipelineState::RetryWait { attempt: 2 };
        assert_eq!(waiting.clone().next(Event::Replied("c".into()), &policy), waiting);
    }

    #[tokio::test]
    async fn test_summarize_success_uses_both_prompts() {
        let model = Arc::new(ScriptedModel::new(vec![ok("Short English summary."), ok("مختصر خلاصہ")]));
        let pair = pipeline(model.clone())
            .summarize(&BoundedText::new("Blog body text"))
            .await
            .unwrap();

        assert_eq!(pair.english, "Short English summary.");
        assert_eq!(pair.urdu, "مختصر خلاصہ");
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].ends_with("Blog body text"));
        assert!(prompts[1].ends_with("Short English summary."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_summary_retries_whole_sequence_after_backoff() {
        let model = Arc::new(ScriptedModel::new(vec![status(429), ok("english 2"), ok("urdu 2")]));
        let started = tokio::time::Instant::now();

        let pair = pipeline(model.clone()).summarize(&BoundedText::new("text")).await.unwrap();

        assert_eq!(pair, SummaryPair { english: "english 2".into(), urdu: "urdu 2".into() });
        assert_eq!(model.calls(), 3);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_translation_restarts_both_stages() {
        let model = Arc::new(ScriptedModel::new(vec![
            ok("english 1"),
            status(429),
            ok("english 2"),
            ok("urdu 2"),
        ]));

        let pair = pipeline(model.clone()).summarize(&BoundedText::new("text")).await.unwrap();

        assert_eq!(pair.english, "english 2");
        assert_eq!(pair.urdu, "urdu 2");
        assert_eq!(model.calls(), 4);
        assert!(model.prompts()[3].ends_with("english 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_is_not_retried() {
        let model = Arc::new(ScriptedModel::failing(500, 5));
        let err = pipeline(model.clone()).summarize(&BoundedText::new("text")).await.unwrap_err();

        assert_eq!(model.calls(), 1);
        assert_eq!(err.cause().status, Some(500));
        assert!(matches!(err, PipelineError::Completion { stage: Stage::Summarizing, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_unavailable_translation_is_terminal() {
        let model = Arc::new(ScriptedModel::new(vec![
            ok("english 1"),
            status(503),
            ok("english 2"),
            status(503),
            ok("never used"),
        ]));

        let err = pipeline(model.clone()).summarize(&BoundedText::new("text")).await.unwrap_err();

        assert_eq!(model.calls(), 4);
        assert!(matches!(
            err,
            PipelineError::RetriesExhausted { stage: Stage::Translating, attempts: 2, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_summary_twice_stops_after_two_calls() {
        let model = Arc::new(ScriptedModel::failing(503, 5));
        let err = pipeline(model.clone()).summarize(&BoundedText::new("text")).await.unwrap_err();

        assert_eq!(model.calls(), 2);
        assert_eq!(err.cause().status, Some(503));
    }

    #[tokio::test]
    async fn test_zero_retry_budget_fails_on_first_transient_error() {
        let model = Arc::new(ScriptedModel::failing(429, 3));
        let policy = RetryPolicy { backoff: Duration::ZERO, max_retries: 0 };
        let err = SummaryPipeline::new(model.clone(), policy)
            .summarize(&BoundedText::new("text"))
            .await
            .unwrap_err();

        assert_eq!(model.calls(), 1);
        assert!(matches!(err, PipelineError::RetriesExhausted { attempts: 1, .. }));
    }
}
