use crate::error::ErrorAccumulator;
use crate::types::{Game, MoveNode, UNKNOWN_RESULT};

use pgn_reader::{Outcome, RawComment, RawTag, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, FromSetup, Position, PositionError};
use std::ops::ControlFlow;

/// Streaming PGN visitor (pgn-reader).
///
/// Replays the mainline SAN moves on a `shakmaty::Chess` board and records
/// one `MoveNode` per ply together with the comments that follow it.
/// Variations are skipped. The first illegal move ends the mainline; the
/// plies before it are kept and the problem lands in `Game::parse_error`.
#[derive(Debug, Default)]
pub struct GameVisitor;

impl GameVisitor {
    pub fn new() -> Self {
        Self
    }
}

/// Known tags, stored verbatim. A repeated tag keeps its last value.
#[derive(Debug, Default)]
pub struct HeaderFields {
    result: Option<String>,
    fen: Option<String>,
    variant: Option<String>,
}

impl HeaderFields {
    fn set_known_tag(&mut self, key: &[u8], value: RawTag<'_>) {
        let slot: &mut Option<String> = match key {
            b"Result" => &mut self.result,
            b"FEN" => &mut self.fen,
            b"Variant" => &mut self.variant,
            _ => return,
        };

        *slot = Some(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    fn castling_mode(&self) -> CastlingMode {
        let variant = self.variant.as_deref().unwrap_or_default().to_ascii_lowercase();
        if variant.contains("960") || variant.contains("fischerandom") {
            CastlingMode::Chess960
        } else {
            CastlingMode::Standard
        }
    }

    fn starting_position(&self) -> Result<Chess, String> {
        let Some(raw) = self.fen.as_deref() else {
            return Ok(Chess::default());
        };

        let fen = Fen::from_ascii(raw.trim().as_bytes())
            .map_err(|e| format!("Invalid FEN '{raw}': {e}"))?;
        fen.into_position(self.castling_mode())
            .map_err(|e| format!("Illegal FEN position '{raw}': {e}"))
    }
}

/// Passes the turn without moving: en passant rights lapse and both move
/// counters advance as for a quiet move.
fn play_null(position: &Chess, mode: CastlingMode) -> Result<Chess, PositionError<Chess>> {
    let mut setup = position.to_setup(EnPassantMode::Legal);
    setup.ep_square = None;
    setup.halfmoves = setup.halfmoves.saturating_add(1);
    if setup.turn == Color::Black {
        setup.fullmoves = setup.fullmoves.saturating_add(1);
    }
    setup.turn = !setup.turn;
    Chess::from_setup(setup, mode)
}

/// Mainline state threaded through one game's movetext.
#[derive(Debug)]
pub struct MainlineBuilder {
    result_header: Option<String>,
    result_marker: Option<String>,
    castling_mode: CastlingMode,
    position: Chess,
    nodes: Vec<MoveNode>,
    stopped: bool,
    parse_error: ErrorAccumulator,
}

impl MainlineBuilder {
    fn new(headers: HeaderFields) -> Self {
        let mut parse_error = ErrorAccumulator::default();
        let castling_mode = headers.castling_mode();
        let (position, stopped) = match headers.starting_position() {
            Ok(position) => (position, false),
            Err(msg) => {
                parse_error.push(&msg);
                (Chess::default(), true)
            }
        };

        Self {
            result_header: headers.result,
            result_marker: None,
            castling_mode,
            position,
            nodes: Vec::with_capacity(128),
            stopped,
            parse_error,
        }
    }

    /// Tag value, exactly as written, unless the tag is absent or `*`; then
    /// the movetext termination marker fills in.
    fn resolved_result(&mut self) -> String {
        match self.result_header.take() {
            Some(result) if result != UNKNOWN_RESULT => result,
            _ => self
                .result_marker
                .take()
                .unwrap_or_else(|| UNKNOWN_RESULT.to_string()),
        }
    }

    fn play(&mut self, san: &SanPlus) -> Result<(), String> {
        self.position = match &san.san {
            San::Null => play_null(&self.position, self.castling_mode)
                .map_err(|e| format!("Null move in check: {e}"))?,
            other => {
                let m = other.to_move(&self.position).map_err(|e| e.to_string())?;
                let mut next = self.position.clone();
                next.play_unchecked(m);
                next
            }
        };
        Ok(())
    }
}

impl Visitor for GameVisitor {
    type Tags = HeaderFields;
    type Movetext = MainlineBuilder;
    type Output = Game;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(HeaderFields::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.set_known_tag(key, value);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(MainlineBuilder::new(tags))
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if movetext.stopped {
            return ControlFlow::Continue(());
        }

        match movetext.play(&san) {
            Ok(()) => {
                movetext
                    .nodes
                    .push(MoveNode::new(movetext.position.clone()));
            }
            Err(e) => {
                let ply = movetext.nodes.len() + 1;
                movetext
                    .parse_error
                    .push(&format!("Illegal move '{san}' at ply {ply}: {e}"));
                movetext.stopped = true;
            }
        }

        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        movetext: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        if movetext.stopped {
            return ControlFlow::Continue(());
        }

        // Comments ahead of the first move belong to the game, not to a ply.
        let Some(node) = movetext.nodes.last_mut() else {
            return ControlFlow::Continue(());
        };

        let text = String::from_utf8_lossy(comment.as_bytes());
        let text = text.trim();
        if !text.is_empty() {
            node.comments.push(text.to_string());
        }

        ControlFlow::Continue(())
    }

    fn outcome(
        &mut self,
        movetext: &mut Self::Movetext,
        outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        movetext.result_marker = Some(outcome.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, mut movetext: Self::Movetext) -> Self::Output {
        Game {
            result: movetext.resolved_result(),
            parse_error: movetext.parse_error.take(),
            mainline: movetext.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgn_reader::Reader;

    fn parse_one(pgn: &str) -> Game {
        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = GameVisitor::new();

        reader
            .read_game(&mut visitor)
            .unwrap()
            .expect("Should have parsed a game")
    }

    fn fens(game: &Game) -> Vec<String> {
        game.mainline().map(|node| node.fen().to_string()).collect()
    }

    #[test]
    fn test_visitor_basic_parsing() {
        let game = parse_one(
            r#"[Event "Test Game"]
[Result "1-0"]

1. e4 e5 2. Nf3 1-0"#,
        );

        assert_eq!(game.result, "1-0");
        assert!(game.parse_error.is_none());
        assert_eq!(
            fens(&game),
            vec![
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
                "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
            ]
        );
    }

    #[test]
    fn test_visitor_comments_attach_to_preceding_ply() {
        let game = parse_one(
            r#"[Result "1/2-1/2"]

{ opening comment } 1. d4 { book } d5 { +0.35/12 0.4s } 2. c4 1/2-1/2"#,
        );

        let annotations: Vec<_> = game
            .mainline()
            .map(|node| node.annotation().into_owned())
            .collect();
        assert_eq!(annotations, vec!["book", "+0.35/12 0.4s", ""]);
    }

    #[test]
    fn test_visitor_multiple_comments_on_one_ply() {
        let game = parse_one(
            r#"[Result "0-1"]

1. e4 { +0.20/15 } { 1.2s } 0-1"#,
        );

        assert_eq!(game.mainline[0].annotation(), "+0.20/15 1.2s");
    }

    #[test]
    fn test_visitor_skips_variations() {
        let game = parse_one(
            r#"[Result "1-0"]

1. e4 ( 1. d4 { book } d5 ) 1... e5 { -0.10 } 1-0"#,
        );

        assert_eq!(game.mainline.len(), 2);
        assert_eq!(game.mainline[0].annotation(), "");
        assert_eq!(game.mainline[1].annotation(), "-0.10");
        assert_eq!(
            fens(&game)[1],
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );
    }

    #[test]
    fn test_visitor_illegal_move_truncates_mainline() {
        let game = parse_one(
            r#"[Result "1-0"]

1. e4 e5 2. Ke3 { +1.00 } Nc6 1-0"#,
        );

        assert_eq!(game.mainline.len(), 2);
        assert_eq!(game.result, "1-0");
        let error = game.parse_error.expect("illegal move should be recorded");
        assert!(error.contains("Ke3"), "{error}");
        assert!(error.contains("ply 3"), "{error}");
    }

    #[test]
    fn test_visitor_result_falls_back_to_movetext_marker() {
        let game = parse_one(
            r#"[Event "No result tag"]

1. e4 e5 0-1"#,
        );
        assert_eq!(game.result, "0-1");

        let game = parse_one(
            r#"[Result "*"]

1. e4 1/2-1/2"#,
        );
        assert_eq!(game.result, "1/2-1/2");
    }

    #[test]
    fn test_visitor_result_tag_wins_over_marker() {
        let game = parse_one(
            r#"[Result "1-0"]

1. e4 0-1"#,
        );
        assert_eq!(game.result, "1-0");
    }

    #[test]
    fn test_visitor_missing_result_everywhere() {
        let game = parse_one(
            r#"[Event "Unfinished"]

1. e4 e5"#,
        );
        assert_eq!(game.result, "*");
    }

    #[test]
    fn test_visitor_duplicate_result_uses_last_value() {
        let game = parse_one(
            r#"[Result "1-0"]
[Result "0-1"]

1. e4 0-1"#,
        );
        assert_eq!(game.result, "0-1");
    }

    #[test]
    fn test_visitor_result_tag_is_kept_verbatim() {
        let game = parse_one(
            r#"[Result " 1-0 "]

1. e4 1-0"#,
        );
        assert_eq!(game.result, " 1-0 ");
    }

    #[test]
    fn test_visitor_empty_result_tag_is_not_replaced_by_marker() {
        let game = parse_one(
            r#"[Result ""]

1. e4 1-0"#,
        );
        assert_eq!(game.result, "");
    }

    #[test]
    fn test_visitor_null_move_passes_the_turn() {
        let game = parse_one(
            r#"[Result "1-0"]

1. e4 { +0.30 } -- { null } 2. d4 { +0.90 } 1-0"#,
        );

        assert!(game.parse_error.is_none());
        assert_eq!(
            fens(&game),
            vec![
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2",
                "rnbqkbnr/pppppppp/8/8/3PP3/8/PPP2PPP/RNBQKBNR b KQkq - 0 2",
            ]
        );
        assert_eq!(game.mainline[1].annotation(), "null");
    }

    #[test]
    fn test_visitor_fen_tag_sets_starting_position() {
        let game = parse_one(
            r#"[Result "1-0"]
[SetUp "1"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"]

1. e4 { +5.00 } 1-0"#,
        );

        assert!(game.parse_error.is_none());
        assert_eq!(fens(&game), vec!["4k3/8/8/8/4P3/8/8/4K3 b - - 0 1"]);
    }

    #[test]
    fn test_visitor_invalid_fen_yields_empty_mainline() {
        let game = parse_one(
            r#"[Result "1-0"]
[FEN "not a fen"]

1. e4 1-0"#,
        );

        assert!(game.mainline.is_empty());
        assert_eq!(game.result, "1-0");
        assert!(game.parse_error.unwrap().contains("not a fen"));
    }

    #[test]
    fn test_visitor_empty_movetext() {
        let game = parse_one(
            r#"[Result "1/2-1/2"]

1/2-1/2"#,
        );
        assert!(game.mainline.is_empty());
        assert_eq!(game.result, "1/2-1/2");
    }

    #[test]
    fn test_visitor_en_passant_square_only_when_legal() {
        let game = parse_one(
            r#"[Result "1-0"]

1. e4 d5 2. e5 f5 1-0"#,
        );

        assert_eq!(
            fens(&game)[3],
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3"
        );
        assert_eq!(
            fens(&game)[0],
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }
}
