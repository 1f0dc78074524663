//! `shopgen generate` - one-shot generation from the command line.

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;

use shopgen_types::generation::{GenerationRequest, GenerationResult};
use shopgen_types::llm::{Attachment, AttachmentKind};

use crate::state::AppState;

/// Build a request from CLI arguments.
pub fn build_request(
    skill: String,
    message: String,
    shop_context: Option<String>,
    model: Option<String>,
    images: Vec<String>,
) -> GenerationRequest {
    GenerationRequest {
        attachments: images
            .into_iter()
            .map(|url| Attachment {
                kind: AttachmentKind::Image,
                url,
                mime_type: None,
            })
            .collect(),
        shop_context,
        model_override: model,
        ..GenerationRequest::new(skill, message)
    }
}

/// Run one generation. Ctrl+C cancels the in-flight call.
pub async fn generate(state: &AppState, request: GenerationRequest, json: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let outcome = state.dispatcher.generate(&request, &cancel).await;
    ctrl_c.abort();
    let result = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_result(&result);
    Ok(())
}

fn print_result(result: &GenerationResult) {
    println!();
    println!("{}", result.content);
    println!();

    let source = format!("{}/{}", result.provider, result.model);
    match &result.degradation_reason {
        Some(reason) => {
            println!(
                "  {} {} ({})",
                style("⚠").yellow().bold(),
                style(reason.summary()).yellow(),
                style(&reason.detail).dim()
            );
        }
        None => {
            println!(
                "  {} {}  {} tokens",
                style("✓").green(),
                style(source).cyan(),
                result.tokens_used()
            );
        }
    }
    if let Some(err) = &result.attachment_analysis_error {
        println!("  {} image analysis failed: {}", style("!").yellow(), style(err).dim());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_maps_images_to_attachments() {
        let request = build_request(
            "photo-selector".into(),
            "帮我选片".into(),
            Some("社区花店".into()),
            None,
            vec!["https://example.com/a.jpg".into()],
        );
        assert_eq!(request.skill, "photo-selector");
        assert_eq!(request.attachments.len(), 1);
        assert_eq!(request.attachments[0].kind, AttachmentKind::Image);
        assert_eq!(request.shop_context.as_deref(), Some("社区花店"));
        assert!(request.model_override.is_none());
    }
}
