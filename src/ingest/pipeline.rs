//! # Ingestion Pipeline
//!
//! Converts a batch of selected files into inline-encoded attachments.
//!
//! ## Invariants
//! - A batch that would push the list past its limit is rejected whole
//! - Conversions run concurrently; results are merged in submission order
//! - One failed file never discards its converted siblings
//! - An outcome only merges into the list generation it was started from

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{FuturesUnordered, StreamExt};

use super::encoder::{encode_data_url, guess_mime};
use super::errors::{ConversionError, ConversionFailure, IngestError, IngestResult};
use super::source::AttachmentSource;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::MAX_IMAGES;

/// Default per-file byte limit (5 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Ingestion limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Attachment cap per record, never above `MAX_IMAGES`
    pub max_attachments: usize,
    /// Per-file size cap in bytes
    pub max_file_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_attachments: MAX_IMAGES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl IngestConfig {
    fn limit(&self) -> usize {
        self.max_attachments.min(MAX_IMAGES)
    }
}

/// Snapshot of an attachment list taken when a batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTicket {
    generation: u64,
    len: usize,
}

impl IngestTicket {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The accepted attachments of one draft.
///
/// Every list gets a process-unique generation. `discard` moves it to a new
/// one, so outcomes started before the discard no longer merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSet {
    images: Vec<String>,
    generation: u64,
}

impl Default for AttachmentSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::from_images(Vec::new())
    }

    /// Start from the images of an existing record (edit flow)
    pub fn from_images(images: Vec<String>) -> Self {
        Self {
            images,
            generation: next_generation(),
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<String> {
        self.images
    }

    /// Snapshot to start a batch from
    pub fn ticket(&self) -> IngestTicket {
        IngestTicket {
            generation: self.generation,
            len: self.images.len(),
        }
    }

    /// Remove one attachment by position within this draft
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Drop all attachments and invalidate in-flight batches
    pub fn discard(&mut self) {
        self.images.clear();
        self.generation = next_generation();
    }

    /// Merge a finished batch.
    ///
    /// # Errors
    ///
    /// - `Stale` if the list was discarded after the batch started
    /// - `Capacity` if the merge would exceed `limit`
    ///
    /// On error the list is unchanged.
    pub fn merge(&mut self, outcome: IngestOutcome, limit: usize) -> IngestResult<MergeReport> {
        if outcome.ticket.generation != self.generation {
            log_event_with_fields(
                Event::IngestStale,
                &[("dropped", &outcome.converted.len().to_string())],
            );
            return Err(IngestError::Stale);
        }

        let limit = limit.min(MAX_IMAGES);
        if self.images.len() + outcome.converted.len() > limit {
            return Err(IngestError::Capacity {
                current: self.images.len(),
                requested: outcome.converted.len(),
                limit,
            });
        }

        let added = outcome.converted.len();
        self.images.extend(outcome.converted);
        log_event_with_fields(
            Event::IngestMerged,
            &[
                ("added", &added.to_string()),
                ("failed", &outcome.failures.len().to_string()),
                ("total", &self.images.len().to_string()),
            ],
        );

        Ok(MergeReport {
            added,
            failures: outcome.failures,
        })
    }
}

/// Result of converting one batch, not yet merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    ticket: IngestTicket,
    /// Successful conversions in submission order
    pub converted: Vec<String>,
    /// Failed conversions in submission order
    pub failures: Vec<ConversionError>,
}

impl IngestOutcome {
    pub fn ticket(&self) -> IngestTicket {
        self.ticket
    }

    /// Point the outcome at a newer snapshot of the same list, such as the
    /// images of a record re-read from the store once conversion finished.
    ///
    /// Capacity is still checked against that snapshot on merge.
    pub fn retarget(mut self, ticket: IngestTicket) -> Self {
        self.ticket = ticket;
        self
    }
}

/// What a merge added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub failures: Vec<ConversionError>,
}

impl MergeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Batch converter
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Convert a batch against a ticket.
    ///
    /// The capacity check happens before any file is read.
    pub async fn ingest<S: AttachmentSource>(
        &self,
        ticket: IngestTicket,
        batch: &[S],
    ) -> IngestResult<IngestOutcome> {
        let limit = self.config.limit();
        if ticket.len + batch.len() > limit {
            log_event_with_fields(
                Event::IngestRejected,
                &[
                    ("current", &ticket.len.to_string()),
                    ("requested", &batch.len().to_string()),
                ],
            );
            return Err(IngestError::Capacity {
                current: ticket.len,
                requested: batch.len(),
                limit,
            });
        }

        let mut pending: FuturesUnordered<_> = batch
            .iter()
            .enumerate()
            .map(|(index, source)| async move { (index, self.convert(index, source).await) })
            .collect();

        // Slot per submitted file; completion order does not matter
        let mut slots: Vec<Option<Result<String, ConversionError>>> =
            (0..batch.len()).map(|_| None).collect();
        while let Some((index, result)) = pending.next().await {
            slots[index] = Some(result);
        }

        let mut converted = Vec::with_capacity(batch.len());
        let mut failures = Vec::new();
        for result in slots.into_iter().flatten() {
            match result {
                Ok(encoded) => converted.push(encoded),
                Err(err) => {
                    log_event_with_fields(
                        Event::IngestConversionFailed,
                        &[("file", &err.name), ("reason", &err.failure.to_string())],
                    );
                    failures.push(err);
                }
            }
        }

        Ok(IngestOutcome {
            ticket,
            converted,
            failures,
        })
    }

    /// Ingest straight into `set`: ticket, convert, merge.
    pub async fn attach<S: AttachmentSource>(
        &self,
        set: &mut AttachmentSet,
        batch: &[S],
    ) -> IngestResult<MergeReport> {
        let outcome = self.ingest(set.ticket(), batch).await?;
        set.merge(outcome, self.config.limit())
    }

    async fn convert<S: AttachmentSource>(
        &self,
        index: usize,
        source: &S,
    ) -> Result<String, ConversionError> {
        let fail = |failure: ConversionFailure| ConversionError {
            index,
            name: source.name().to_string(),
            failure,
        };

        let max = self.config.max_file_bytes;
        let too_large = |size: u64| fail(ConversionFailure::TooLarge { size, max });

        // Reject on the size hint before anything is loaded
        let hint = source
            .byte_len()
            .await
            .map_err(|e| fail(ConversionFailure::Read(e.to_string())))?;
        if let Some(size) = hint.filter(|&size| size > max) {
            return Err(too_large(size));
        }

        let bytes = source
            .read()
            .await
            .map_err(|e| fail(ConversionFailure::Read(e.to_string())))?;

        if bytes.is_empty() {
            return Err(fail(ConversionFailure::Empty));
        }
        let size = bytes.len() as u64;
        if size > max {
            return Err(too_large(size));
        }

        let mime = source
            .content_type()
            .unwrap_or_else(|| guess_mime(source.name()));
        Ok(encode_data_url(mime, &bytes))
    }
}
