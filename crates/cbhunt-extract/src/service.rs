use std::future::Future;

use cbhunt_core::GroundingMetadata;

use crate::error::ExtractError;
use crate::schema::Shape;

/// One call to the generative service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The full instruction text. Exactly what a user previewing the mission
    /// would see.
    pub instruction_text: String,
    /// Declared output shape; rendered into the request by the service.
    pub output_shape: Shape,
    /// Whether the service may ground its answer in live web search.
    pub web_search: bool,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// Concatenated text of the first candidate.
    pub text: String,
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// A text-generation backend capable of following a JSON output contract.
pub trait GenerativeService {
    /// Sends `request` and returns the raw model text.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<GenerationResponse, ExtractError>> + Send;
}
