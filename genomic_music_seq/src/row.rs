// The intermediate row table.
//
// One row per base, written by the classifier and read back by the mapper.
// Columns: `header, position, sequence, type, codons, duration, accent`.
//
// Reading is lenient where the files were historically hand-edited: fields
// are trimmed, `type` is case-insensitive, an unknown amino-acid code is a
// lookup miss (empty) rather than an error, and `duration`/`accent` may be
// absent. Columns this struct does not know about (for example the mapper's
// `pitch`) are ignored, so a mapped table can be re-read as plain rows. A
// missing required column aborts the read; a record that does not parse is
// logged and skipped.

use crate::codon::AminoAcid;
use crate::error::SeqError;
use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

/// Duration of one base as a fraction of a whole note (an eighth note).
pub const BASE_DURATION: f64 = 0.125;

/// Columns every row table must have.
pub const REQUIRED_COLUMNS: &[&str] = &["header", "position", "sequence", "type", "codons"];

/// Accent column marker.
pub const ACCENT_MARKER: &str = "accent";

/// Whether a base is coding or non-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionType {
    Exon,
    Intron,
}

impl PositionType {
    pub fn as_str(self) -> &'static str {
        match self {
            PositionType::Exon => "exon",
            PositionType::Intron => "intron",
        }
    }

    pub fn is_exon(self) -> bool {
        self == PositionType::Exon
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PositionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PositionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim().to_ascii_lowercase().as_str() {
            "exon" => Ok(PositionType::Exon),
            "intron" => Ok(PositionType::Intron),
            other => Err(serde::de::Error::custom(format!(
                "position type must be exon or intron, got {other:?}"
            ))),
        }
    }
}

/// One base of one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Sequence label (`Sequence1`, ...).
    pub header: String,
    pub position: i64,
    #[serde(rename = "sequence")]
    pub base: char,
    #[serde(rename = "type")]
    pub position_type: PositionType,
    /// Amino acid of the codon this base belongs to, if exonic and
    /// translatable.
    #[serde(rename = "codons", with = "amino_acid_field")]
    pub amino_acid: Option<AminoAcid>,
    /// Fraction of a whole note.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, with = "accent_field")]
    pub accent: bool,
}

/// `codons` column: empty means none; an unknown code is a lookup miss.
pub mod amino_acid_field {
    use super::AminoAcid;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(aa: &Option<AminoAcid>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(aa.map(AminoAcid::code).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<AminoAcid>, D::Error> {
        let raw = String::deserialize(d)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse() {
            Ok(aa) => Ok(Some(aa)),
            Err(e) => {
                log::warn!("{e}; treating as no amino acid");
                Ok(None)
            }
        }
    }
}

/// `accent` column: the literal marker, case-insensitive, or empty.
pub mod accent_field {
    use super::ACCENT_MARKER;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(accent: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *accent { ACCENT_MARKER } else { "" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(raw.trim().eq_ignore_ascii_case(ACCENT_MARKER))
    }
}

/// Read any serde row type from CSV with trimmed fields.
///
/// Fails if the header lacks one of `required` or the input cannot be read.
/// Records that do not deserialize are logged and skipped.
pub fn read_table<T, R>(reader: R, required: &[&str]) -> Result<Vec<T>, SeqError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    if let Some(missing) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(SeqError::MissingColumn(missing.to_string()));
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => match record.deserialize(Some(&headers)) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    log::warn!("Skipping row {:?}: {}", record.iter().collect::<Vec<_>>(), e);
                }
            },
            Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping unreadable row: {}", e);
            }
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} malformed rows, kept {}", skipped, rows.len());
    }
    Ok(rows)
}

/// Write any serde row type as CSV with a header line.
pub fn write_table<T, W>(writer: W, rows: &[T]) -> Result<(), SeqError>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>, SeqError> {
    read_table(reader, REQUIRED_COLUMNS)
}

pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<(), SeqError> {
    write_table(writer, rows)
}

pub fn load_rows(path: &Path) -> Result<Vec<Row>, SeqError> {
    let rows = read_rows(std::fs::File::open(path)?)?;
    log::info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn save_rows(path: &Path, rows: &[Row]) -> Result<(), SeqError> {
    write_rows(std::fs::File::create(path)?, rows)?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Row> {
        vec![
            Row {
                header: "Sequence1".into(),
                position: 101,
                base: 'A',
                position_type: PositionType::Exon,
                amino_acid: Some(AminoAcid::Met),
                duration: Some(BASE_DURATION),
                accent: true,
            },
            Row {
                header: "Sequence1".into(),
                position: 102,
                base: '-',
                position_type: PositionType::Intron,
                amino_acid: None,
                duration: Some(BASE_DURATION),
                accent: false,
            },
            Row {
                header: "Sequence2".into(),
                position: 7,
                base: 'G',
                position_type: PositionType::Exon,
                amino_acid: Some(AminoAcid::Stop),
                duration: None,
                accent: false,
            },
        ]
    }

    #[test]
    fn test_csv_round_trip_keeps_fields() {
        let rows = sample();
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("header,position,sequence,type,codons,duration,accent\n"));
        assert!(text.contains("Sequence1,101,A,exon,M,0.125,accent"));
        assert!(text.contains("Sequence2,7,G,exon,Stop,,"));

        let back = read_rows(buf.as_slice()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let text = "header,position,sequence,type,codons\nSequence1,4,C,Intron,\n";
        let rows = read_rows(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position_type, PositionType::Intron);
        assert_eq!(rows[0].amino_acid, None);
        assert_eq!(rows[0].duration, None);
        assert!(!rows[0].accent);
    }

    #[test]
    fn test_lenient_fields() {
        let text = "header,position,sequence,type,codons,duration,accent,pitch\n\
                    Sequence1,1,T, EXON , X ,0.125, Accent ,C4\n";
        let rows = read_rows(text.as_bytes()).unwrap();
        assert_eq!(rows[0].position_type, PositionType::Exon);
        assert_eq!(rows[0].amino_acid, None);
        assert!(rows[0].accent);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let text = "header,position,sequence,codons\nSequence1,1,T,M\n";
        match read_rows(text.as_bytes()) {
            Err(SeqError::MissingColumn(column)) => assert_eq!(column, "type"),
            other => panic!("expected a missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "header,position,sequence,type,codons\n\
                    Sequence1,1,A,exon,M\n\
                    Sequence1,x,T,exon,M\n\
                    Sequence1,3,G,utr,M\n\
                    Sequence1,4\n\
                    Sequence1,5,C,intron,\n";
        let rows = read_rows(text.as_bytes()).unwrap();
        let positions: Vec<i64> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 5]);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let text = "header,position,sequence,type,codons\n";
        assert!(read_rows(text.as_bytes()).unwrap().is_empty());
    }
}
