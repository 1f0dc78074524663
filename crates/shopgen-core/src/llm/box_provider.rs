//! BoxContentProvider -- object-safe dynamic dispatch wrapper for ContentProvider.
//!
//! 1. Define an object-safe `ContentProviderDyn` trait with boxed futures
//! 2. Blanket-impl `ContentProviderDyn` for all `T: ContentProvider`
//! 3. `BoxContentProvider` wraps `Box<dyn ContentProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use shopgen_types::llm::{ProviderError, ProviderKind, ProviderRequest, ProviderResponse};

use super::provider::ContentProvider;

/// Object-safe version of [`ContentProvider`] with boxed futures.
pub trait ContentProviderDyn: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn supports_vision(&self) -> bool;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + 'a>>;
}

impl<T: ContentProvider> ContentProviderDyn for T {
    fn kind(&self) -> ProviderKind {
        ContentProvider::kind(self)
    }

    fn supports_vision(&self) -> bool {
        ContentProvider::supports_vision(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased provider for runtime vendor selection.
///
/// Since `ContentProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxContentProvider` exposes the same methods and delegates to
/// the inner `ContentProviderDyn` trait object.
pub struct BoxContentProvider {
    inner: Box<dyn ContentProviderDyn + Send + Sync>,
}

impl BoxContentProvider {
    /// Wrap a concrete `ContentProvider` in a type-erased box.
    pub fn new<T: ContentProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    pub fn supports_vision(&self) -> bool {
        self.inner.supports_vision()
    }

    /// Send one generation request and return the produced text.
    pub async fn generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.inner.generate_boxed(request).await
    }
}

impl std::fmt::Debug for BoxContentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxContentProvider")
            .field("kind", &self.kind())
            .finish()
    }
}
