//! Client-side protocol core for the judgeport evaluation client.
//!
//! Everything needed to drive one submission lives here: the judge
//! configuration document with its two wire schemas ([`config`]), deliberate
//! corruption of that document for negative testing ([`fault`]), the framed
//! TCP request/response exchange ([`transport`]), decoding of the streamed
//! per-checkpoint results ([`decoder`]), and the status-code vocabulary
//! ([`verdict`]). The [`problem`] module defines the collaborator interface
//! that supplies problem metadata and example pairs.

pub mod config;
pub mod decoder;
pub mod error;
pub mod fault;
pub mod problem;
pub mod transport;
pub mod verdict;

pub use config::{Checkpoint, CompareMode, ConfigDocument, Schema};
pub use decoder::{decode, EvaluationSummary, TestCheckpointResult};
pub use error::ClientError;
pub use fault::FaultVariant;
pub use problem::{Example, ProblemBank, ProblemData, ProblemSource};
pub use transport::submit;
pub use verdict::ResultVocabulary;
