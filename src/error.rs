use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Browser server subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe to/from the browser server broke
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// Browser server answered `ok: false` or an incomplete response
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// OCR service unreachable, timed out, or returned garbage
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Problems obtaining the label/value fill instructions.
///
/// These never abort a session with an error: the controller turns them into
/// a `Halted` state.
#[derive(Debug, Error)]
pub enum FillSourceError {
    #[error("fill-instruction file not found: {0}")]
    Missing(String),

    #[error("no usable lines in fill-instruction file: {0}")]
    Empty(String),

    #[error("fill generator `{command}` failed: {reason}")]
    Generator { command: String, reason: String },

    #[error("could not read fill-instruction file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
