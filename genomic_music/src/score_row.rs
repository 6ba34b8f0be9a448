// The mapped row table.
//
// The classifier's columns plus three derived ones: `pitch` (zero or more
// space-separated pitch names; several means a chord), `amino_acid_chord`
// (the chord label) and `scale_type`. The mapper writes it, the score
// assembler reads it. Derived columns default to empty, so a classifier
// table can also be read as score rows (every base then becomes a rest).
//
// Older mapped tables leave `position` and `type` blank on synthetic rows.
// Those read as position 0 and intron; the assembler uses neither.

use genomic_music_seq::SeqError;
use genomic_music_seq::codon::AminoAcid;
use genomic_music_seq::row::{
    BASE_DURATION, PositionType, REQUIRED_COLUMNS, Row, accent_field, amino_acid_field,
    read_table, write_table,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub header: String,
    #[serde(deserialize_with = "blank_position")]
    pub position: i64,
    #[serde(rename = "sequence")]
    pub base: char,
    #[serde(rename = "type", deserialize_with = "blank_position_type")]
    pub position_type: PositionType,
    #[serde(rename = "codons", with = "amino_acid_field")]
    pub amino_acid: Option<AminoAcid>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, with = "accent_field")]
    pub accent: bool,
    #[serde(default)]
    pub pitch: String,
    #[serde(default)]
    pub amino_acid_chord: String,
    #[serde(default)]
    pub scale_type: String,
}

impl ScoreRow {
    /// A score row with the classifier's fields and nothing derived yet.
    pub fn from_row(row: &Row) -> Self {
        ScoreRow {
            header: row.header.clone(),
            position: row.position,
            base: row.base,
            position_type: row.position_type,
            amino_acid: row.amino_acid,
            duration: Some(row.duration.unwrap_or(BASE_DURATION)),
            accent: row.accent,
            pitch: String::new(),
            amino_acid_chord: String::new(),
            scale_type: String::new(),
        }
    }
}

fn blank_position<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(d)?.unwrap_or(0))
}

fn blank_position_type<'de, D: Deserializer<'de>>(d: D) -> Result<PositionType, D::Error> {
    Ok(Option::<PositionType>::deserialize(d)?.unwrap_or(PositionType::Intron))
}

pub fn read_score_rows<R: Read>(reader: R) -> Result<Vec<ScoreRow>, SeqError> {
    read_table(reader, REQUIRED_COLUMNS)
}

pub fn write_score_rows<W: Write>(writer: W, rows: &[ScoreRow]) -> Result<(), SeqError> {
    write_table(writer, rows)
}

pub fn load_score_rows(path: &Path) -> Result<Vec<ScoreRow>, SeqError> {
    let rows = read_score_rows(std::fs::File::open(path)?)?;
    log::info!("Read {} mapped rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn save_score_rows(path: &Path, rows: &[ScoreRow]) -> Result<(), SeqError> {
    write_score_rows(std::fs::File::create(path)?, rows)?;
    log::info!("Wrote {} mapped rows to {}", rows.len(), path.display());
    Ok(())
}
