pub mod ats;
pub mod features;
pub mod game;
pub mod injury;
pub mod narrative;
pub mod spreads;

pub use ats::{
    AtsMetrics, AtsOutcome, AtsSummary, EdgePick, PredictionRecord, PredictionsFile,
    ThresholdResult,
};
pub use features::FeatureVector;
pub use game::{GameRecord, GameResult, PlayEvent, Period, RecordError, Scoring, TeamSide};
pub use injury::{InjuryEntry, InjurySnapshot};
pub use narrative::{BlownLeadSide, GameNarrative, NarrativeHistory, TeamNarrativeEntry};
pub use spreads::SpreadSnapshot;
