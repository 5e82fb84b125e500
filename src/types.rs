use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// Result token assumed when neither the tag nor the movetext carry one.
pub const UNKNOWN_RESULT: &str = "*";

/// One parsed game: resolved result token plus its main line.
#[derive(Debug, Clone)]
pub struct Game {
    pub result: String,
    pub mainline: Vec<MoveNode>,
    /// Contains `None` for cleanly parsed games, otherwise the joined diagnostics.
    pub parse_error: Option<String>,
}

impl Game {
    pub fn mainline(&self) -> impl Iterator<Item = &MoveNode> {
        self.mainline.iter()
    }
}

/// One ply of the main line: the comments following the move and the
/// position reached after playing it.
#[derive(Debug, Clone)]
pub struct MoveNode {
    pub comments: SmallVec<[String; 2]>,
    pub position: Chess,
}

impl MoveNode {
    pub fn new(position: Chess) -> Self {
        Self {
            comments: SmallVec::new(),
            position,
        }
    }

    /// Comment text attached to this ply, multiple comments joined by a space.
    pub fn annotation(&self) -> Cow<'_, str> {
        match self.comments.as_slice() {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(single.as_str()),
            many => Cow::Owned(many.join(" ")),
        }
    }

    pub fn fen(&self) -> Fen {
        Fen::from_position(&self.position, EnPassantMode::Legal)
    }
}

/// Game outcome from White's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutcomeLabel {
    WhiteWin,
    Draw,
    BlackWin,
}

impl OutcomeLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhiteWin => "1.0",
            Self::Draw => "0.5",
            Self::BlackWin => "0.0",
        }
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
