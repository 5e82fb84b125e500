use crate::error::ConvertError;
use crate::types::OutcomeLabel;

/// Maps a PGN result token onto its label. Matching is exact: anything but
/// the three decided tokens is rejected so no game gets an invented label.
pub fn resolve(result: &str) -> Result<OutcomeLabel, ConvertError> {
    match result {
        "1-0" => Ok(OutcomeLabel::WhiteWin),
        "0-1" => Ok(OutcomeLabel::BlackWin),
        "1/2-1/2" => Ok(OutcomeLabel::Draw),
        other => Err(ConvertError::UnknownResult(other.to_string())),
    }
}
