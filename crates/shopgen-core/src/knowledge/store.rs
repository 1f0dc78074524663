//! Per-shop in-memory chunk store.
//!
//! Each shop owns a slot with two locks:
//! - a writer mutex serializing ingestion and deletion for that shop, held for
//!   the whole write including embedding calls;
//! - a read/write lock over the document map, taken for writing only long
//!   enough to swap a document's chunk set in or out.
//!
//! Readers clone `Arc<StoredDocument>` handles under the read lock, so a query
//! sees either the old or the new chunk set of a document, never a mix.
//! Shops never share a lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use shopgen_types::knowledge::{KnowledgeChunk, KnowledgeDocument};

/// A document together with its derived chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub document: KnowledgeDocument,
    pub chunks: Vec<KnowledgeChunk>,
}

#[derive(Debug, Default)]
struct ShopSlot {
    writer: Arc<Mutex<()>>,
    documents: RwLock<BTreeMap<Uuid, Arc<StoredDocument>>>,
}

/// Process-wide knowledge store, constructed once and shared by handle.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    shops: DashMap<String, Arc<ShopSlot>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, shop_id: &str) -> Arc<ShopSlot> {
        if let Some(slot) = self.shops.get(shop_id) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.shops.entry(shop_id.to_string()).or_default().value())
    }

    /// Acquire the single-writer lock for a shop.
    ///
    /// Waits while another write for the same shop is in progress.
    pub async fn writer(&self, shop_id: &str) -> ShopWriter {
        let slot = self.slot(shop_id);
        let guard = Arc::clone(&slot.writer).lock_owned().await;
        ShopWriter {
            slot,
            _guard: guard,
        }
    }

    /// Consistent snapshot of a shop's documents, ordered by document id.
    ///
    /// Unknown shops have no documents.
    pub async fn snapshot(&self, shop_id: &str) -> Vec<Arc<StoredDocument>> {
        let Some(slot) = self.shops.get(shop_id).map(|s| Arc::clone(s.value())) else {
            return Vec::new();
        };
        let documents = slot.documents.read().await;
        documents.values().cloned().collect()
    }

    /// Number of shops that have ever been written to.
    pub fn shop_count(&self) -> usize {
        self.shops.len()
    }
}

/// Exclusive write access to one shop's documents.
pub struct ShopWriter {
    slot: Arc<ShopSlot>,
    _guard: OwnedMutexGuard<()>,
}

impl ShopWriter {
    pub async fn get(&self, document_id: &Uuid) -> Option<Arc<StoredDocument>> {
        self.slot.documents.read().await.get(document_id).cloned()
    }

    /// Insert or wholesale-replace a document and its chunks.
    pub async fn put(&self, stored: StoredDocument) {
        let id = stored.document.id;
        self.slot
            .documents
            .write()
            .await
            .insert(id, Arc::new(stored));
    }

    /// Remove a document and all of its chunks.
    pub async fn remove(&self, document_id: &Uuid) -> Option<Arc<StoredDocument>> {
        self.slot.documents.write().await.remove(document_id)
    }
}
