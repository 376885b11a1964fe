//! Presentation-facing facade.
//!
//! Draft in → validate → persist → typed result out. Callers never see the
//! backend key; every durable access goes through `RecordStore`.

use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::ingest::{AttachmentSet, AttachmentSource, IngestError, Ingestor, MergeReport};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Draft, Record, RecordId, SchemaValidator, ValidRecord, ValidationErrors};
use crate::store::{FileKv, KeyValueStore, RecordStore, StoreError};
use crate::view::{self, DisplayRow, RecordDetail};

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(errors) => errors.code(),
            ServiceError::NotFound(_) => "DAILY_NOT_FOUND",
            ServiceError::Ingest(e) => e.code(),
            ServiceError::Store(e) => e.code(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ServiceError::NotFound(RecordId::from(id)),
            other => ServiceError::Store(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// The daily update log: validator, store and ingestor wired together
#[derive(Debug)]
pub struct DailyLog<K: KeyValueStore> {
    store: RecordStore<K>,
    validator: SchemaValidator,
    ingestor: Ingestor,
}

impl DailyLog<FileKv> {
    /// Open the file-backed log described by `config`
    pub fn open(config: &Config) -> ServiceResult<Self> {
        let store = RecordStore::open(FileKv::new(&config.data_dir), config.storage_key.clone())?;
        Ok(Self::new(
            store,
            SchemaValidator::with_max_images(config.max_attachments),
            Ingestor::new(config.ingest_config()),
        ))
    }
}

impl<K: KeyValueStore> DailyLog<K> {
    pub fn new(store: RecordStore<K>, validator: SchemaValidator, ingestor: Ingestor) -> Self {
        Self {
            store,
            validator,
            ingestor,
        }
    }

    /// Default validator and ingestion limits over `store`
    pub fn with_store(store: RecordStore<K>) -> Self {
        Self::new(store, SchemaValidator::default(), Ingestor::default())
    }

    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    /// Validate and persist a new record
    pub fn create(&self, draft: &Draft) -> ServiceResult<RecordId> {
        let valid = self.check(self.validator.validate(draft))?;
        Ok(self.store.create(valid)?)
    }

    /// Same as `create`, reading the draft from loosely typed JSON
    pub fn create_json(&self, value: &Value) -> ServiceResult<RecordId> {
        let valid = self.check(self.validator.validate_json(value))?;
        Ok(self.store.create(valid)?)
    }

    /// Replace the record with `id` by a validated draft.
    ///
    /// Validation runs first, so an invalid draft for a missing id reports
    /// the validation errors.
    pub fn update(&self, id: &RecordId, draft: &Draft) -> ServiceResult<()> {
        let valid = self.check(self.validator.validate(draft))?;
        Ok(self.store.update_by_id(id, valid)?)
    }

    /// Same as `update`, reading the draft from loosely typed JSON
    pub fn update_json(&self, id: &RecordId, value: &Value) -> ServiceResult<()> {
        let valid = self.check(self.validator.validate_json(value))?;
        Ok(self.store.update_by_id(id, valid)?)
    }

    /// Delete by id; a missing id is not an error
    pub fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        self.store.delete_by_id(id)?;
        Ok(())
    }

    pub fn get(&self, id: &RecordId) -> ServiceResult<Option<Record>> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Detail view of one record
    pub fn detail(&self, id: &RecordId) -> ServiceResult<Option<RecordDetail>> {
        Ok(self.get(id)?.as_ref().map(view::detail))
    }

    /// Pre-filled draft for editing the record with `id`
    pub fn edit_draft(&self, id: &RecordId) -> ServiceResult<Option<Draft>> {
        Ok(self.get(id)?.as_ref().map(Draft::from))
    }

    /// Rows for the update list, filtered by title
    pub fn search(&self, query: &str) -> ServiceResult<Vec<DisplayRow>> {
        Ok(view::project(&self.store.list()?, query))
    }

    /// Ingest files into the images of a stored record.
    ///
    /// Conversion runs without holding the store lock. The converted images
    /// are then appended to the record as stored at that moment, inside the
    /// store's write critical section, with capacity re-checked and the
    /// result re-validated. Edits made while files convert are kept.
    ///
    /// Files that fail conversion are reported in the returned
    /// `MergeReport`; the rest are kept.
    pub async fn attach<S: AttachmentSource>(
        &self,
        id: &RecordId,
        batch: &[S],
    ) -> ServiceResult<MergeReport> {
        let record = self
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;

        let started_from = AttachmentSet::from_images(record.fields.images);
        let outcome = self.ingestor.ingest(started_from.ticket(), batch).await?;
        if outcome.converted.is_empty() {
            return Ok(MergeReport {
                added: 0,
                failures: outcome.failures,
            });
        }

        let limit = self.ingestor.config().max_attachments;
        let mut report = None;
        self.store.update_with(id, |current| -> ServiceResult<ValidRecord> {
            let mut draft = Draft::from(current);
            let mut latest = AttachmentSet::from_images(std::mem::take(&mut draft.images));
            let ticket = latest.ticket();
            report = Some(latest.merge(outcome.retarget(ticket), limit)?);

            draft.images = latest.into_images();
            self.check(self.validator.validate(&draft))
        })?;

        report.ok_or_else(|| {
            ServiceError::Store(StoreError::Internal("attach merge did not run".into()))
        })
    }

    fn check(&self, result: Result<ValidRecord, ValidationErrors>) -> ServiceResult<ValidRecord> {
        result.map_err(|errors| {
            let fields: Vec<&str> = errors.fields().map(|f| f.as_str()).collect();
            log_event_with_fields(Event::ValidationFailed, &[("fields", &fields.join(","))]);
            ServiceError::Validation(errors)
        })
    }
}
