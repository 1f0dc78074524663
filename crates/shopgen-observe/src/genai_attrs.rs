//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Span fields declared with `tracing::field::Empty` under these names are
//! filled in once a generation completes, via [`record_generation`].
//!
//! Span naming convention: `"{operation} {skill}"` (e.g., `"generate moments-copywriter"`)

use tracing::Span;

// --- Required attributes ---

/// The name of the operation being performed (e.g., "generate").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the provider that served the response (e.g., "tongyi").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model that produced the response.
pub const GEN_AI_RESPONSE_MODEL: &str = "gen_ai.response.model";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- shopgen attributes ---

/// Whether the response came from the simulation templates.
pub const SHOPGEN_SIMULATED: &str = "shopgen.simulated";

/// Skill the request resolved to.
pub const SHOPGEN_SKILL_ID: &str = "shopgen.skill.id";

// --- Operation name values ---

/// Content generation through the dispatcher.
pub const OP_GENERATE: &str = "generate";

/// Forbidden-term and quality check.
pub const OP_CHECK_CONTENT: &str = "check_content";

/// Knowledge base search.
pub const OP_SEARCH_KNOWLEDGE: &str = "search_knowledge";

/// Outcome of one generation, as recorded on its span.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOutcome<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub simulated: bool,
}

/// Fill the response attributes on `span`.
///
/// Fields the span did not declare are ignored by `tracing`.
pub fn record_generation(span: &Span, outcome: GenerationOutcome<'_>) {
    span.record(GEN_AI_PROVIDER_NAME, outcome.provider);
    span.record(GEN_AI_RESPONSE_MODEL, outcome.model);
    span.record(GEN_AI_USAGE_INPUT_TOKENS, outcome.input_tokens);
    span.record(GEN_AI_USAGE_OUTPUT_TOKENS, outcome.output_tokens);
    span.record(SHOPGEN_SIMULATED, outcome.simulated);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_use_genai_namespace() {
        for name in [
            GEN_AI_OPERATION_NAME,
            GEN_AI_PROVIDER_NAME,
            GEN_AI_RESPONSE_MODEL,
            GEN_AI_USAGE_INPUT_TOKENS,
            GEN_AI_USAGE_OUTPUT_TOKENS,
        ] {
            assert!(name.starts_with("gen_ai."), "{name}");
        }
    }

    #[test]
    fn test_record_on_disabled_span_is_noop() {
        record_generation(
            &Span::none(),
            GenerationOutcome {
                provider: "simulation",
                model: "template-v1",
                input_tokens: 0,
                output_tokens: 0,
                simulated: true,
            },
        );
    }
}
