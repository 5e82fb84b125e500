//! Converts engine-annotated PGN games into `<fen>;<outcome>` lines for
//! texel tuning.

pub mod convert;
pub mod error;
pub mod filter;
pub mod logging;
pub mod outcome;
pub mod progress;
pub mod reader;
pub mod types;
pub mod visitor;
pub mod writer;

pub use convert::run;
pub use error::ConvertError;
pub use progress::{Progress, Tally};
pub use types::{Game, MoveNode, OutcomeLabel};
