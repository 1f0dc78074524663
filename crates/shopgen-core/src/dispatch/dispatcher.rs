//! Generation dispatcher: the per-request state machine.
//!
//! Resolving -> Retrieving (optional) -> Generating(primary) ->
//! Generating(fallback) -> Simulating -> Done
//!
//! - Validation and resolver failures are returned to the caller.
//! - Retrieval and attachment-analysis failures are recorded and skipped.
//! - The primary model gets one retry after a fixed backoff on transient
//!   failures. Configuration-class failures move on immediately. The
//!   fallback model is tried once.
//! - When every real attempt fails the result is served from the simulation
//!   templates, flagged `is_simulated` with a degradation reason.
//! - Cancellation abandons the in-flight call and returns
//!   `DispatchError::Cancelled`; nothing runs after it.
//!
//! Calls are strictly sequential; no two providers are ever called at once.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span};

use shopgen_types::config::DispatcherConfig;
use shopgen_types::error::{DispatchError, ValidationError};
use shopgen_types::generation::{
    AttemptRecord, DegradationReason, GenerationRequest, GenerationResult, RetrievalStatus,
    SIMULATION_PROVIDER,
};
use shopgen_types::knowledge::KnowledgeSource;
use shopgen_types::llm::{
    Attachment, AttachmentKind, ErrorClass, ProviderError, ProviderRequest, ProviderResponse,
    Usage,
};
use shopgen_types::skill::{ModelRef, SkillDescriptor};

use super::simulation;
use crate::knowledge::RetrievalEngine;
use crate::knowledge::engine::sources_for;
use crate::llm::registry::ProviderRegistry;
use crate::skill::SkillResolver;
use crate::skill::prompt_injector::compose_system_prompt;

const IMAGE_ANALYSIS_SYSTEM_PROMPT: &str =
    "你是一位专业的图片分析助手，请客观、准确地描述图片内容。";
const ANALYSIS_SKIPPED_NOTE: &str = "[系统提示：图片分析暂时不可用，已跳过图片分析步骤]";
const VISION_TEMPERATURE: f64 = 0.3;

/// Dispatcher states, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Retrieving,
    AnalyzingAttachments,
    GeneratingPrimary,
    GeneratingFallback,
    Simulating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Retrieving => "retrieving",
            Stage::AnalyzingAttachments => "analyzing_attachments",
            Stage::GeneratingPrimary => "generating_primary",
            Stage::GeneratingFallback => "generating_fallback",
            Stage::Simulating => "simulating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

fn image_analysis_prompt(image_count: usize) -> String {
    let which = if image_count > 1 { "些" } else { "张" };
    format!(
        "请仔细分析这{which}图片，描述以下内容：\n\
         1. 场景/环境：图片拍摄的地点、氛围\n\
         2. 主体内容：图片中的主要人物、物品、活动\n\
         3. 情绪氛围：图片传达的情感\n\
         4. 视觉亮点：色彩、构图、光线等特点\n\
         5. 适合的文案方向：基于图片内容建议的文案风格和主题\n\
         请用简洁的中文回答，为后续生成文案提供参考。"
    )
}

/// Run `future` unless `cancel` fires first.
async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    future: F,
) -> Result<F::Output, DispatchError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DispatchError::Cancelled),
        output = future => Ok(output),
    }
}

struct Augmentation {
    status: RetrievalStatus,
    sources: Vec<KnowledgeSource>,
    context: Option<String>,
}

impl Augmentation {
    fn without(status: RetrievalStatus) -> Self {
        Self {
            status,
            sources: Vec::new(),
            context: None,
        }
    }
}

struct PreparedMessage {
    message: String,
    attachments: Vec<Attachment>,
    analysis_error: Option<String>,
}

/// Routes one generation request through resolution, augmentation, the
/// fallback chain and, if needed, simulation.
pub struct Dispatcher {
    resolver: Arc<SkillResolver>,
    providers: Arc<ProviderRegistry>,
    retrieval: Option<Arc<RetrievalEngine>>,
    retry_backoff: Duration,
    max_message_chars: usize,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<SkillResolver>,
        providers: Arc<ProviderRegistry>,
        config: &DispatcherConfig,
    ) -> Self {
        Self {
            resolver,
            providers,
            retrieval: None,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_message_chars: config.max_message_chars,
        }
    }

    /// Enable knowledge augmentation for requests carrying a knowledge query.
    pub fn with_retrieval(mut self, engine: Arc<RetrievalEngine>) -> Self {
        self.retrieval = Some(engine);
        self
    }

    pub fn resolver(&self) -> &SkillResolver {
        &self.resolver
    }

    /// Serve one generation request.
    ///
    /// Returns `Err` only for invalid input, unknown skill or model ids, and
    /// cancellation. Every other failure yields a (possibly simulated) result.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult, DispatchError> {
        self.validate(request)?;

        tracing::debug!(skill = %request.skill, stage = %Stage::Resolving, "Dispatch stage");
        let descriptor = self.descriptor_for(request)?;
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let augmentation = self.augment(request, cancel).await?;
        let prepared = self.prepare_message(&descriptor, request, cancel).await?;
        let system_prompt = compose_system_prompt(
            &descriptor.prompt_key,
            request.shop_context.as_deref(),
            augmentation.context.as_deref(),
        );

        let mut chain = vec![(descriptor.primary.clone(), 2u32, Stage::GeneratingPrimary)];
        if let Some(fallback) = &descriptor.fallback {
            chain.push((fallback.clone(), 1, Stage::GeneratingFallback));
        }

        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut failures: Vec<(ModelRef, ProviderError)> = Vec::new();

        for (model, max_attempts, stage) in chain {
            tracing::debug!(
                skill = %descriptor.id,
                model = %model,
                stage = %stage,
                "Dispatch stage"
            );
            let provider_request = ProviderRequest {
                model: model.model.clone(),
                system_prompt: system_prompt.clone(),
                message: prepared.message.clone(),
                attachments: prepared.attachments.clone(),
                temperature: descriptor.temperature,
                max_tokens: descriptor.max_tokens,
            };

            for attempt in 1..=max_attempts {
                match self.call(&model, &provider_request, cancel).await? {
                    Ok(response) => {
                        attempts.push(AttemptRecord {
                            provider: model.provider,
                            model: model.model.clone(),
                            error: None,
                        });
                        tracing::debug!(
                            skill = %descriptor.id,
                            model = %model,
                            stage = %Stage::Done,
                            "Dispatch stage"
                        );
                        return Ok(real_result(model, response, augmentation, prepared, attempts));
                    }
                    Err(err) => {
                        tracing::warn!(
                            provider = %model.provider,
                            model = %model.model,
                            attempt,
                            class = %err.class(),
                            error = %err,
                            "Generation attempt failed"
                        );
                        attempts.push(AttemptRecord {
                            provider: model.provider,
                            model: model.model.clone(),
                            error: Some(err.to_string()),
                        });
                        let retry = err.is_retryable() && attempt < max_attempts;
                        failures.push((model.clone(), err));
                        if !retry {
                            break;
                        }
                        cancellable(cancel, tokio::time::sleep(self.retry_backoff)).await?;
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }
        tracing::debug!(skill = %descriptor.id, stage = %Stage::Simulating, "Dispatch stage");
        Ok(simulated_result(request, &failures, augmentation, prepared, attempts))
    }

    fn validate(&self, request: &GenerationRequest) -> Result<(), ValidationError> {
        if request.message.trim().is_empty() {
            return Err(ValidationError::EmptyField("message".to_string()));
        }
        if request.message.chars().count() > self.max_message_chars {
            return Err(ValidationError::TooLong {
                field: "message".to_string(),
                max: self.max_message_chars,
            });
        }
        if request.attachments.iter().any(|a| a.url.trim().is_empty()) {
            return Err(ValidationError::EmptyField("attachments.url".to_string()));
        }
        let wants_knowledge = request
            .knowledge_query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty());
        let has_shop = request
            .shop_id
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if wants_knowledge && !has_shop {
            return Err(ValidationError::EmptyField("shop_id".to_string()));
        }
        Ok(())
    }

    fn descriptor_for(
        &self,
        request: &GenerationRequest,
    ) -> Result<SkillDescriptor, DispatchError> {
        let mut descriptor = self.resolver.resolve(&request.skill)?.clone();
        if let Some(id) = request
            .model_override
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            descriptor.primary = self.resolver.resolve_model(id)?;
            tracing::debug!(
                skill = %descriptor.id,
                model = %descriptor.primary,
                "Using model override"
            );
        }
        Ok(descriptor)
    }

    async fn augment(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Augmentation, DispatchError> {
        let Some(query) = request
            .knowledge_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
        else {
            return Ok(Augmentation::without(RetrievalStatus::NotRequested));
        };
        let shop_id = request.shop_id.as_deref().unwrap_or_default();

        let Some(engine) = &self.retrieval else {
            tracing::warn!(shop_id, "Knowledge query without a configured knowledge base");
            return Ok(Augmentation::without(RetrievalStatus::Failed {
                reason: "knowledge base is not configured".to_string(),
            }));
        };

        tracing::debug!(shop_id, stage = %Stage::Retrieving, "Dispatch stage");
        let retrieve_query = engine.query(query, None, None, None);
        match cancellable(cancel, engine.retrieve(shop_id, &retrieve_query)).await? {
            Ok(chunks) if chunks.is_empty() => {
                Ok(Augmentation::without(RetrievalStatus::NoMatches))
            }
            Ok(chunks) => {
                tracing::info!(shop_id, chunks = chunks.len(), "Added knowledge context");
                Ok(Augmentation {
                    status: RetrievalStatus::Augmented {
                        chunks: chunks.len(),
                    },
                    sources: sources_for(&chunks),
                    context: Some(engine.build_context(&chunks)),
                })
            }
            Err(err) => {
                tracing::warn!(
                    shop_id,
                    error = %err,
                    "Knowledge retrieval failed, continuing without it"
                );
                Ok(Augmentation::without(RetrievalStatus::Failed {
                    reason: err.to_string(),
                }))
            }
        }
    }

    /// Describe image attachments with the skill's vision model and fold the
    /// description into the message. Images are consumed by this step.
    async fn prepare_message(
        &self,
        descriptor: &SkillDescriptor,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<PreparedMessage, DispatchError> {
        let (images, others): (Vec<Attachment>, Vec<Attachment>) = request
            .attachments
            .iter()
            .cloned()
            .partition(|a| a.kind == AttachmentKind::Image);

        let Some(vision) = descriptor.vision.as_ref().filter(|_| !images.is_empty()) else {
            return Ok(PreparedMessage {
                message: request.message.clone(),
                attachments: request.attachments.clone(),
                analysis_error: None,
            });
        };

        tracing::debug!(
            skill = %descriptor.id,
            images = images.len(),
            stage = %Stage::AnalyzingAttachments,
            "Dispatch stage"
        );
        let analysis_request = ProviderRequest {
            model: vision.model.clone(),
            system_prompt: IMAGE_ANALYSIS_SYSTEM_PROMPT.to_string(),
            message: image_analysis_prompt(images.len()),
            attachments: images,
            temperature: VISION_TEMPERATURE,
            max_tokens: descriptor.max_tokens,
        };

        match self.call(vision, &analysis_request, cancel).await? {
            Ok(response) => Ok(PreparedMessage {
                message: format!(
                    "【图片内容分析】\n{}\n\n【用户描述】\n{}",
                    response.content.trim(),
                    request.message
                ),
                attachments: others,
                analysis_error: None,
            }),
            Err(err) => {
                tracing::warn!(
                    provider = %vision.provider,
                    model = %vision.model,
                    error = %err,
                    "Image analysis failed, continuing without it"
                );
                Ok(PreparedMessage {
                    message: format!("{}\n\n{}", request.message, ANALYSIS_SKIPPED_NOTE),
                    attachments: others,
                    analysis_error: Some(err.to_string()),
                })
            }
        }
    }

    /// One provider call. The outer `Result` carries cancellation only.
    async fn call(
        &self,
        model: &ModelRef,
        request: &ProviderRequest,
        cancel: &CancellationToken,
    ) -> Result<Result<ProviderResponse, ProviderError>, DispatchError> {
        let Some(provider) = self.providers.get(model.provider) else {
            return Ok(Err(ProviderError::Auth(format!(
                "provider '{}' is not configured",
                model.provider
            ))));
        };
        if request.has_attachment(AttachmentKind::Image) && !provider.supports_vision() {
            return Ok(Err(ProviderError::UnsupportedInput(format!(
                "provider '{}' does not accept image attachments",
                model.provider
            ))));
        }

        let span = info_span!(
            "gen_ai.generate",
            gen_ai.system = %model.provider,
            gen_ai.request.model = %model.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
        );
        cancellable(cancel, provider.generate(request).instrument(span)).await
    }
}

fn real_result(
    model: ModelRef,
    response: ProviderResponse,
    augmentation: Augmentation,
    prepared: PreparedMessage,
    attempts: Vec<AttemptRecord>,
) -> GenerationResult {
    let reported = if response.model.is_empty() {
        model.model
    } else {
        response.model
    };
    GenerationResult {
        content: response.content,
        provider: model.provider.to_string(),
        model: reported,
        usage: response.usage,
        is_simulated: false,
        degradation_reason: None,
        retrieval: augmentation.status,
        sources: augmentation.sources,
        attachment_analysis_error: prepared.analysis_error,
        attempts,
    }
}

fn degradation_reason(failures: &[(ModelRef, ProviderError)]) -> DegradationReason {
    let class = if failures
        .iter()
        .all(|(_, err)| err.class() == ErrorClass::Configuration)
    {
        ErrorClass::Configuration
    } else {
        ErrorClass::Transient
    };
    let detail = if failures.is_empty() {
        "no generation attempt was made".to_string()
    } else {
        failures
            .iter()
            .map(|(model, err)| format!("{model}: {err}"))
            .collect::<Vec<_>>()
            .join("; ")
    };
    DegradationReason { class, detail }
}

fn simulated_result(
    request: &GenerationRequest,
    failures: &[(ModelRef, ProviderError)],
    augmentation: Augmentation,
    prepared: PreparedMessage,
    attempts: Vec<AttemptRecord>,
) -> GenerationResult {
    let reason = degradation_reason(failures);
    let image_count = request
        .attachments
        .iter()
        .filter(|a| a.kind == AttachmentKind::Image)
        .count();

    tracing::warn!(skill = %request.skill, reason = %reason, "Serving simulated response");

    GenerationResult {
        content: simulation::render(&request.skill, &request.message, image_count),
        provider: SIMULATION_PROVIDER.to_string(),
        model: format!("template-v{}", simulation::TEMPLATE_VERSION),
        usage: Usage::default(),
        is_simulated: true,
        degradation_reason: Some(reason),
        retrieval: augmentation.status,
        sources: augmentation.sources,
        attachment_analysis_error: prepared.analysis_error,
        attempts,
    }
}
