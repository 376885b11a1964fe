//! # Attachment Ingestion
//!
//! Turns user-selected files into inline-encoded attachment strings under the
//! per-record attachment limit.

pub mod encoder;
pub mod errors;
pub mod pipeline;
pub mod source;

pub use encoder::{decode_data_url, encode_data_url, guess_mime};
pub use errors::{ConversionError, ConversionFailure, IngestError, IngestResult};
pub use pipeline::{
    AttachmentSet, IngestConfig, IngestOutcome, IngestTicket, Ingestor, MergeReport,
    DEFAULT_MAX_FILE_BYTES,
};
pub use source::{AttachmentSource, BytesSource, PathSource};
