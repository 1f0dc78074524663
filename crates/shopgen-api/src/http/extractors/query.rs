//! Query parameter extractors.

use serde::Deserialize;

use shopgen_types::compliance::Platform;

use crate::http::error::AppError;

/// `?platform=` selector; absent means `general`.
#[derive(Debug, Deserialize, Default)]
pub struct PlatformQuery {
    pub platform: Option<String>,
}

impl PlatformQuery {
    pub fn platform(&self) -> Result<Platform, AppError> {
        match &self.platform {
            Some(p) => p.parse::<Platform>().map_err(AppError::Validation),
            None => Ok(Platform::General),
        }
    }
}

/// Query parameters for the knowledge document list.
#[derive(Debug, Deserialize, Default)]
pub struct KnowledgeListQuery {
    /// Only documents in this category.
    pub category: Option<String>,
}
