//! Gateway to the generative AI service used for label OCR, component
//! identification and the inventory chat assistant.
//!
//! Every public operation absorbs remote failures: analysis falls back to a
//! canned payload and chat falls back to a fixed apology, but both results
//! say which path was taken.

pub mod backend;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod mock;
pub mod prompt;

/// Backend interface and request shape.
pub use backend::{GenerateRequest, GenerativeBackend, ImageInput};
/// Gateway error type.
pub use error::GatewayError;
/// High-level gateway and its outcome types.
pub use gateway::{
    AiGateway, AnalysisOutcome, ChatReply, NO_ANSWER_TEXT, NOT_CONFIGURED_TEXT, UNAVAILABLE_TEXT,
};
/// Gemini REST backend.
pub use gemini::GeminiBackend;
/// Canned analysis payloads.
pub use mock::mock_analysis;
