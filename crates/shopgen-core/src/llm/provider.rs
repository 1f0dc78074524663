//! ContentProvider trait definition.
//!
//! This is the single abstraction every upstream vendor adapter implements.
//! Uses RPITIT for `generate`; `BoxContentProvider` adds dynamic dispatch.

use shopgen_types::llm::{ProviderError, ProviderKind, ProviderRequest, ProviderResponse};

/// Trait for upstream model vendors (Anthropic, Tongyi, SiliconFlow, ...).
///
/// Implementations make exactly one network attempt per `generate` call,
/// bound it with a timeout, and classify every failure into a
/// [`ProviderError`] variant. Retrying is the dispatcher's job.
///
/// Implementations live in shopgen-infra.
pub trait ContentProvider: Send + Sync {
    /// Which vendor this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Whether image attachments can be sent to this vendor's models.
    fn supports_vision(&self) -> bool;

    /// Send one generation request and return the produced text.
    fn generate(
        &self,
        request: &ProviderRequest,
    ) -> impl std::future::Future<Output = Result<ProviderResponse, ProviderError>> + Send;
}
