/// Why a generated recommendation could not be obtained
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("no Gemini API key: set GEMINI_API_KEY or advisor.api_key_file")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generateContent returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response contained no text")]
    EmptyResponse,

    #[error("no JSON object in model response")]
    NoJson,

    #[error("runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
