use std::io;
use std::path::PathBuf;

/// Fatal conditions that stop a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Result token outside `1-0`, `0-1` and `1/2-1/2`.
    #[error("Unknown result: {0}")]
    UnknownResult(String),

    #[error("Failed to open file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to initialize zstd decoder for '{}': {source}", .path.display())]
    Decoder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid input pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to read game {game_index} from '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        game_index: usize,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

/// Collects non-fatal per-game diagnostics into a single message.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: &str) {
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }
}
