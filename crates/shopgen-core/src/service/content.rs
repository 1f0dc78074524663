//! Content-check service.
//!
//! Runs the forbidden-term engine and the quality scorer over a piece of
//! finished content. Both are pure and synchronous, so the service holds
//! no state beyond the shared term engine.

use std::sync::Arc;

use shopgen_types::compliance::Platform;
use shopgen_types::content::{ContentCheckOptions, ContentCheckRequest, ContentCheckResult};
use shopgen_types::error::ValidationError;
use shopgen_types::quality::ContentType;

use crate::compliance::ForbiddenTermEngine;
use crate::quality::QualityScorer;

pub struct ContentService {
    forbidden: Arc<ForbiddenTermEngine>,
    scorer: QualityScorer,
}

impl ContentService {
    pub fn new(forbidden: Arc<ForbiddenTermEngine>) -> Self {
        let scorer = QualityScorer::new(Arc::clone(&forbidden));
        Self { forbidden, scorer }
    }

    pub fn forbidden(&self) -> &ForbiddenTermEngine {
        &self.forbidden
    }

    /// Check caller-supplied content.
    pub fn check_content(
        &self,
        request: &ContentCheckRequest,
    ) -> Result<ContentCheckResult, ValidationError> {
        if request.content.trim().is_empty() {
            return Err(ValidationError::EmptyField("content".to_string()));
        }
        let platform = request.effective_platform();
        let content_type = request.effective_content_type();

        tracing::debug!(
            %platform,
            %content_type,
            chars = request.content.chars().count(),
            "Checking content"
        );
        Ok(self.run(&request.content, platform, content_type, request.options))
    }

    /// Post-process generated content for a feature id.
    ///
    /// Never auto-replaces: generated content is returned as produced.
    pub fn post_process(
        &self,
        feature: &str,
        content: &str,
        check_forbidden: bool,
        check_quality: bool,
    ) -> ContentCheckResult {
        let options = ContentCheckOptions {
            check_forbidden,
            check_quality,
            auto_replace: false,
        };
        self.run(
            content,
            Platform::for_feature(feature),
            ContentType::for_feature(feature),
            options,
        )
    }

    fn run(
        &self,
        content: &str,
        platform: Platform,
        content_type: ContentType,
        options: ContentCheckOptions,
    ) -> ContentCheckResult {
        let mut result = ContentCheckResult {
            platform,
            content_type,
            ..Default::default()
        };

        if options.check_forbidden {
            let check = self.forbidden.check(content, platform);
            if options.auto_replace && check.has_forbidden {
                result.replaced = Some(self.forbidden.replace(content, platform));
            }
            result.forbidden = Some(check);
        }
        if options.check_quality {
            result.quality = Some(self.scorer.score(content, content_type, platform));
        }
        result
    }
}

impl Default for ContentService {
    fn default() -> Self {
        Self::new(Arc::new(ForbiddenTermEngine::builtin()))
    }
}
