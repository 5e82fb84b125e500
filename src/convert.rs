use crate::error::ConvertError;
use crate::filter;
use crate::outcome;
use crate::progress::{Progress, Tally};
use crate::reader::GameSource;
use crate::types::{Game, MoveNode, OutcomeLabel};
use crate::writer::RecordWriter;

use std::io::Write;
use std::path::Path;

/// Mainline plies in move order, each paired with the game's label.
pub fn extract_positions(
    game: &Game,
    label: OutcomeLabel,
) -> impl Iterator<Item = (&MoveNode, OutcomeLabel)> {
    game.mainline().map(move |node| (node, label))
}

/// Resolves, filters and writes one game. Nothing is written when the result
/// token is unknown.
pub fn convert_game<W: Write>(
    game: &Game,
    writer: &mut RecordWriter<W>,
) -> Result<OutcomeLabel, ConvertError> {
    let label = outcome::resolve(&game.result)?;

    for (node, label) in extract_positions(game, label) {
        if filter::is_included(&node.annotation()) {
            writer.write_record(node.fen(), label)?;
        }
    }

    Ok(label)
}

/// Drains `source` into `writer`, stopping at the first game with an unknown
/// result. Records of earlier games stay written.
pub fn convert_games<W: Write>(
    source: &mut GameSource,
    writer: &mut RecordWriter<W>,
    progress: &Progress,
) -> Result<Tally, ConvertError> {
    let mut tally = Tally::default();

    while let Some(game) = source.next_game()? {
        let label = convert_game(&game, writer)?;
        tally.record(label);
        progress.game_done(tally.games());
    }

    Ok(tally)
}

/// Converts the games in `input` (a path or glob pattern) and appends the
/// records to `output`.
///
/// The output is flushed on every exit path once opened, so records of the
/// games handled before a failure are kept.
pub fn run(input: &str, output: &Path, progress: &Progress) -> Result<Tally, ConvertError> {
    let mut source = GameSource::open(input)?;
    let mut writer = RecordWriter::append_to(output)?;

    let converted = convert_games(&mut source, &mut writer, progress);
    progress.finish();
    writer.flush()?;

    let tally = converted?;
    log::info!(
        "Wrote {} records from {} games to '{}'",
        writer.records(),
        tally.games(),
        output.display()
    );
    Ok(tally)
}
