use thiserror::Error;

/// Every failure the analysis pipeline can report.
///
/// `MissingCredential` is only produced at startup. The remaining kinds are
/// caught at the oracle call or document decode and turned into a JSON
/// error for the caller, or masked to defaults by the metric extractor.
#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error("required credential {0} is not set")]
  MissingCredential(String),

  #[error("oracle unavailable: {0}")]
  OracleUnavailable(String),

  #[error("oracle rate limited the request")]
  OracleRateLimited,

  #[error("malformed oracle response: {0}")]
  MalformedOracleResponse(String),

  #[error("unsupported document type: {0}")]
  UnsupportedDocumentType(String),

  #[error("no text could be extracted from the document")]
  EmptyExtractedText,

  #[error("{0}")]
  InvalidRequest(String),
}

impl AnalysisError {
  /// Oracle-side failures, as opposed to problems with the caller's input.
  pub fn is_oracle_failure(&self) -> bool {
    matches!(self, AnalysisError::OracleUnavailable(_) | AnalysisError::OracleRateLimited | AnalysisError::MalformedOracleResponse(_))
  }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
