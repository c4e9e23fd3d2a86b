//! budgetwise-advisor: asks a generative model for a budget and falls back
//! to the heuristic engine when that fails.

pub mod error;
pub mod extract;
pub mod gemini;
pub mod pipeline;
pub mod prompt;

pub use error::AdvisorError;
pub use extract::extract_json_object;
pub use gemini::{resolve_api_key, GeminiClient, GeminiConfig};
pub use pipeline::{recommend, Advice, AdvisorRequest, CandidateSource, Origin};
pub use prompt::build_budget_prompt;
