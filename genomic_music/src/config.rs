// Pipeline configuration.
//
// One JSON document with a section per stage. Every field has a default, so
// `{}` is a valid configuration and any subset of fields may be given:
//
//   {
//     "classifier": { "policy": "reference_gap", "reference_index": 1 },
//     "mapper": { "scheme": "scale_degree", "synthetic_mode": "full_chord" },
//     "score": { "tempo_bpm": 90, "programs": { "SequenceX": 32 } }
//   }
//
// Command-line flags are applied on top of the loaded values.

use crate::error::MusicError;
use crate::mapper::MapperConfig;
use crate::score::ScoreConfig;
use genomic_music_seq::classify::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classifier: ClassifierConfig,
    pub mapper: MapperConfig,
    pub score: ScoreConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, MusicError> {
        let data = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&data)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
