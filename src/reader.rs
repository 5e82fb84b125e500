use crate::error::ConvertError;
use crate::types::Game;
use crate::visitor::GameVisitor;

use pgn_reader::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder as ZstdDecoder;

pub type PgnInput = Box<dyn Read>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CompressionMode {
    Plain,
    Zstd,
}

impl CompressionMode {
    fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

fn is_glob_pattern(raw: &str) -> bool {
    raw.contains('*') || raw.contains('?')
}

/// Single path, or every file matching a glob pattern in sorted order.
fn expand_input_paths(raw: &str) -> Result<Vec<PathBuf>, ConvertError> {
    if !is_glob_pattern(raw) {
        return Ok(vec![PathBuf::from(raw)]);
    }

    let mut paths: Vec<PathBuf> = glob::glob(raw)
        .map_err(|source| ConvertError::Pattern {
            pattern: raw.to_string(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        log::warn!("No input files match '{raw}'");
    }

    Ok(paths)
}

fn open_input_stream(path: &Path) -> Result<PgnInput, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match CompressionMode::from_path(path) {
        CompressionMode::Plain => Ok(Box::new(file)),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as PgnInput)
            .map_err(|source| ConvertError::Decoder {
                path: path.to_path_buf(),
                source,
            }),
    }
}

struct PgnReaderState {
    pgn_reader: Reader<PgnInput>,
    path_idx: usize,
    next_game_index: usize,
}

impl PgnReaderState {
    fn new(input: PgnInput, path_idx: usize) -> Self {
        Self {
            pgn_reader: Reader::new(input),
            path_idx,
            next_game_index: 1,
        }
    }
}

/// Lazy sequence of games read from one or more PGN inputs.
pub struct GameSource {
    paths: Vec<PathBuf>,
    next_path_idx: usize,
    current: Option<PgnReaderState>,
    visitor: GameVisitor,
}

impl GameSource {
    /// Opens `input`, a PGN path (optionally `.zst`) or a glob pattern.
    ///
    /// A plain path is opened right away so that a missing input is reported
    /// before anything else is touched.
    pub fn open(input: &str) -> Result<Self, ConvertError> {
        let paths = expand_input_paths(input)?;
        let mut source = Self {
            paths,
            next_path_idx: 0,
            current: None,
            visitor: GameVisitor::new(),
        };

        if !is_glob_pattern(input) {
            source.acquire_reader()?;
        }

        Ok(source)
    }

    /// Reads from an already open stream; `name` only labels diagnostics.
    pub fn from_reader(input: PgnInput, name: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![name.into()],
            next_path_idx: 1,
            current: Some(PgnReaderState::new(input, 0)),
            visitor: GameVisitor::new(),
        }
    }

    /// Moves on to the next openable input. Returns `false` once all inputs
    /// are used up.
    fn acquire_reader(&mut self) -> Result<bool, ConvertError> {
        while self.next_path_idx < self.paths.len() {
            let path_idx = self.next_path_idx;
            self.next_path_idx += 1;

            let path = &self.paths[path_idx];
            match open_input_stream(path) {
                Ok(input) => {
                    log::info!("Reading games from '{}'", path.display());
                    self.current = Some(PgnReaderState::new(input, path_idx));
                    return Ok(true);
                }
                Err(err) => {
                    if self.paths.len() == 1 {
                        return Err(err);
                    }

                    log::warn!("{err}");
                }
            }
        }

        Ok(false)
    }

    /// Next game across all inputs, `None` at end of input.
    pub fn next_game(&mut self) -> Result<Option<Game>, ConvertError> {
        loop {
            let Some(reader) = self.current.as_mut() else {
                if self.acquire_reader()? {
                    continue;
                }
                return Ok(None);
            };

            let game_index = reader.next_game_index;
            match reader.pgn_reader.read_game(&mut self.visitor) {
                Ok(Some(game)) => {
                    reader.next_game_index += 1;
                    if let Some(error) = &game.parse_error {
                        log::warn!(
                            "Parser-stage error: file='{}'; game_index={}; error={}",
                            self.paths[reader.path_idx].display(),
                            game_index,
                            error
                        );
                    }
                    return Ok(Some(game));
                }
                Ok(None) => {
                    self.current = None;
                }
                Err(source) => {
                    return Err(ConvertError::Read {
                        path: self.paths[reader.path_idx].clone(),
                        game_index,
                        source,
                    });
                }
            }
        }
    }
}
