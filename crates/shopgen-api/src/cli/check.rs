//! `shopgen check` - forbidden-term check and quality score.

use anyhow::{Result, anyhow};
use console::style;

use shopgen_types::compliance::{Platform, Severity};
use shopgen_types::content::{ContentCheckOptions, ContentCheckRequest, ContentCheckResult};
use shopgen_types::quality::ContentType;

use crate::state::AppState;

/// Build a request from CLI arguments.
pub fn build_request(
    content: String,
    platform: Option<&str>,
    content_type: Option<&str>,
    feature: Option<String>,
    replace: bool,
    no_quality: bool,
) -> Result<ContentCheckRequest> {
    let platform = platform
        .map(|p| p.parse::<Platform>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let content_type = content_type
        .map(|c| c.parse::<ContentType>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    Ok(ContentCheckRequest {
        content,
        platform,
        content_type,
        feature,
        options: ContentCheckOptions {
            check_forbidden: true,
            check_quality: !no_quality,
            auto_replace: replace,
        },
    })
}

pub fn check(state: &AppState, request: &ContentCheckRequest, json: bool) -> Result<()> {
    let result = state.content.check_content(request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_result(&result);
    Ok(())
}

fn print_result(result: &ContentCheckResult) {
    println!();
    println!(
        "  {} {} / {}",
        style("🔍").bold(),
        style(result.platform).cyan(),
        result.content_type
    );
    println!();

    if let Some(forbidden) = &result.forbidden {
        if forbidden.matches.is_empty() {
            println!("  {} No forbidden terms", style("✓").green());
        }
        for m in &forbidden.matches {
            let marker = match m.severity {
                Severity::High => style("✗").red(),
                Severity::Medium => style("✗").yellow(),
                Severity::Low => style("·").dim(),
            };
            println!(
                "  {} {} at {} [{}] → {}",
                marker,
                style(&m.term).bold(),
                m.position,
                m.category.display_name(),
                style(&m.suggestion).dim()
            );
        }
    }

    if let Some(replaced) = &result.replaced {
        println!();
        println!("  {}", style("── Replaced ──").dim());
        println!("  {}", replaced.result);
    }

    if let Some(quality) = &result.quality {
        println!();
        println!(
            "  Quality: {} ({}) {}",
            style(quality.overall).bold(),
            quality.grade,
            style(quality.grade.description()).dim()
        );
        for (dimension, score) in &quality.dimensions {
            println!("    {:<8} {}", dimension.display_name(), score);
        }
        for suggestion in &quality.suggestions {
            println!("  {} {}", style("›").cyan(), suggestion);
        }
    }
    println!();
}
