//! Structured extraction from a generative service.
//!
//! A mission configuration becomes an instruction ([`query`]), the service
//! answers with free text ([`service`], [`gemini`]), the text is recovered
//! into JSON ([`deserialize`]) and checked against a declared [`Shape`]
//! ([`validate`]). [`ExtractionPipeline`] runs the whole chain with bounded
//! retries.

pub mod autocomplete;
pub mod deserialize;
pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod query;
pub mod retry;
pub mod schema;
pub mod service;
pub mod validate;

pub use autocomplete::{AutoCompleteResult, CasePatch, Citation};
pub use deserialize::parse_payload;
pub use error::{ExtractError, ValidationError};
pub use gemini::GeminiClient;
pub use pipeline::{ExtractionPipeline, MissionOutput, MissionResult, SocialPost};
pub use query::{build_query, IdeaKind, MissionQuery};
pub use retry::RetryPolicy;
pub use schema::{Field, PayloadKind, Shape};
pub use service::{GenerationRequest, GenerationResponse, GenerativeService};
pub use validate::{validate_as, validate_value};
