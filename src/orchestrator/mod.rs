//! Dual-path consolidation.
//!
//! The orchestrator first tries the language model, validates its answer,
//! and falls back to the deterministic pipeline whenever the AI path fails.
//! Only a fully validated AI result or a deterministic result is returned;
//! the two are never merged.
//!
//! ```text
//! AttemptAi ──ok──▶ Validate ──ok──▶ done (Ai)
//!    │  ▲                │
//!    │  └─retryable──┘   │ malformed / insufficient
//!    ▼                   ▼
//! Deterministic ◀────────┘ ──▶ done (Deterministic { reason })
//! ```

mod prompt;
mod validate;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{RejectionReason, Resolver, SourceBundle, run_deterministic};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::llm::LanguageModel;
use crate::models::{AuditStep, AuditTrace, ConsolidationResult, PolicyTable};

pub use prompt::build_prompt;
pub use validate::{AI_NOTE, extract_json_object, validate_ai_response};

/// Why the deterministic path produced the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No model is configured, or the AI path is disabled.
    AiNotConfigured,
    /// The model call failed.
    Transport {
        /// The failure description.
        message: String,
    },
    /// The model call timed out.
    Timeout {
        /// The per-attempt timeout.
        seconds: u64,
    },
    /// The answer was not a consolidation.
    Malformed {
        /// What was wrong.
        message: String,
    },
    /// The answer listed too few employees.
    Insufficient {
        /// Employees listed.
        count: usize,
        /// Employees required.
        minimum: usize,
    },
}

impl FallbackReason {
    fn from_error(error: &EngineError) -> Self {
        match error {
            EngineError::AiTimeout { seconds } => FallbackReason::Timeout { seconds: *seconds },
            EngineError::AiResponseMalformed { message } => FallbackReason::Malformed {
                message: message.clone(),
            },
            EngineError::AiResponseInsufficient { count, minimum } => {
                FallbackReason::Insufficient {
                    count: *count,
                    minimum: *minimum,
                }
            }
            EngineError::AiNotConfigured => FallbackReason::AiNotConfigured,
            other => FallbackReason::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum ExecutionPath {
    /// The language model's answer passed validation.
    Ai,
    /// The deterministic pipeline ran.
    Deterministic {
        /// Why the AI path was not used.
        reason: FallbackReason,
    },
}

impl ExecutionPath {
    /// Returns true for the deterministic path.
    pub fn is_deterministic(&self) -> bool {
        matches!(self, ExecutionPath::Deterministic { .. })
    }
}

/// A consolidation result with how it was produced.
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    /// The result.
    pub result: ConsolidationResult,
    /// The path that produced it.
    pub path: ExecutionPath,
    /// Steps and warnings recorded on that path.
    pub audit: AuditTrace,
    /// Records skipped by the deterministic path. Empty on the AI path.
    pub rejections: Vec<RejectionReason>,
}

enum State {
    AttemptAi { attempt: u32 },
    Validate(String),
    Deterministic(FallbackReason),
}

/// Runs consolidations over the AI path with deterministic fallback.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::SourceBundle;
/// use benefit_engine::config::EngineConfig;
/// use benefit_engine::orchestrator::{ExecutionPath, FallbackReason, Orchestrator};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let orchestrator = Orchestrator::new(EngineConfig::default(), None);
/// let outcome = runtime
///     .block_on(orchestrator.consolidate(&SourceBundle::default()))
///     .unwrap();
///
/// assert_eq!(
///     outcome.path,
///     ExecutionPath::Deterministic { reason: FallbackReason::AiNotConfigured }
/// );
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    config: EngineConfig,
    model: Option<Arc<dyn LanguageModel>>,
}

impl Orchestrator {
    /// Creates an orchestrator. `None` means the AI path is never attempted.
    pub fn new(config: EngineConfig, model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { config, model }
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consolidates one bundle.
    ///
    /// AI-path failures never surface as errors; they select the
    /// deterministic path. An error is returned only if the deterministic
    /// pipeline itself fails.
    pub async fn consolidate(&self, bundle: &SourceBundle) -> EngineResult<ConsolidationOutcome> {
        let ai = &self.config.ai;
        let resolver = Resolver::new(&self.config.matching)?;
        let period = self.config.policy.period.as_str();

        let model = match &self.model {
            Some(model) if ai.enabled => Some(model),
            _ => None,
        };

        let prompt = model.map(|_| {
            let policy = PolicyTable::from_sources(
                self.config.policy.to_policy_table(),
                &bundle.working_days,
                &bundle.daily_rates,
                &resolver,
            );
            build_prompt(bundle, &policy, period, ai.sample_size)
        });

        let mut state = match model {
            Some(_) => State::AttemptAi { attempt: 0 },
            None => State::Deterministic(FallbackReason::AiNotConfigured),
        };

        loop {
            state = match state {
                State::AttemptAi { attempt } => {
                    let (Some(model), Some(prompt)) = (model, prompt.as_deref()) else {
                        break self.deterministic(bundle, FallbackReason::AiNotConfigured);
                    };
                    match self.call_model(&**model, prompt).await {
                        Ok(text) => State::Validate(text),
                        Err(e) if e.is_retryable() && attempt < ai.max_retries => {
                            warn!(attempt = attempt + 1, error = %e, "Language model call failed, retrying");
                            State::AttemptAi {
                                attempt: attempt + 1,
                            }
                        }
                        Err(e) => State::Deterministic(FallbackReason::from_error(&e)),
                    }
                }
                State::Validate(text) => {
                    match validate_ai_response(&text, &resolver, period, ai.min_employees) {
                        Ok(result) => break Ok(self.accept_ai(result)),
                        Err(e) => {
                            warn!(error = %e, "Language model answer rejected");
                            State::Deterministic(FallbackReason::from_error(&e))
                        }
                    }
                }
                State::Deterministic(reason) => break self.deterministic(bundle, reason),
            };
        }
    }

    async fn call_model(&self, model: &dyn LanguageModel, prompt: &str) -> EngineResult<String> {
        let seconds = self.config.ai.timeout_seconds;
        match tokio::time::timeout(Duration::from_secs(seconds), model.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::AiTimeout { seconds }),
        }
    }

    fn accept_ai(&self, result: ConsolidationResult) -> ConsolidationOutcome {
        info!(
            employees = result.totals.count,
            total_benefit = %result.totals.total_benefit,
            "Language model consolidation accepted"
        );

        let mut audit = AuditTrace::default();
        audit.steps.push(AuditStep {
            step_number: 1,
            rule_id: "ai_validation".to_string(),
            rule_name: "AI Response Validation".to_string(),
            input: serde_json::json!({
                "min_employees": self.config.ai.min_employees
            }),
            output: serde_json::json!({
                "employees": result.totals.count,
                "accepted": true
            }),
            reasoning: format!(
                "{} employees listed, at least {} required",
                result.totals.count, self.config.ai.min_employees
            ),
        });

        ConsolidationOutcome {
            result,
            path: ExecutionPath::Ai,
            audit,
            rejections: Vec::new(),
        }
    }

    fn deterministic(
        &self,
        bundle: &SourceBundle,
        reason: FallbackReason,
    ) -> EngineResult<ConsolidationOutcome> {
        info!(reason = ?reason, "Running deterministic consolidation");
        let outcome = run_deterministic(bundle, &self.config)?;
        Ok(ConsolidationOutcome {
            result: outcome.result,
            path: ExecutionPath::Deterministic { reason },
            audit: outcome.audit,
            rejections: outcome.rejections,
        })
    }
}
