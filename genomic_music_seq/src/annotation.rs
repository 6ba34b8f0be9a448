// CDS coordinate annotation.
//
// Input is a tab-separated table whose first row is a header. Two things are
// extracted from the remaining rows, in a single scan but independently of
// each other:
//
// - Regions: any row with more than four fields that contains a literal
//   `CDS` field contributes the closed interval [field 2, field 3].
// - Offset: the first row with at least two fields whose second field parses
//   as an integer sets the global offset. It is the genomic coordinate of
//   base 0 of every sequence, used by the interval classification policy.
//
// Malformed integers are logged and skipped. A failure on one of the two
// extractions never blocks the other, and a failed offset parse leaves the
// offset open for the next row.
//
// See also: `classify.rs`, which consumes the `AnnotationSet`.

use crate::error::SeqError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Literal marker identifying coding-sequence rows.
const CDS_MARKER: &str = "CDS";

/// A coding span, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: i64,
    pub end: i64,
}

impl Region {
    pub fn new(start: i64, end: i64) -> Self {
        Region { start, end }
    }

    pub fn contains(&self, position: i64) -> bool {
        self.start <= position && position <= self.end
    }
}

/// All regions from one coordinate table plus its offset. Regions keep file
/// order; they may overlap and need not be sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    pub regions: Vec<Region>,
    pub offset: Option<i64>,
}

impl AnnotationSet {
    /// True if `position` lies inside at least one region.
    pub fn contains(&self, position: i64) -> bool {
        self.regions.iter().any(|r| r.contains(position))
    }

    pub fn require_offset(&self) -> Result<i64, SeqError> {
        self.offset.ok_or(SeqError::MissingOffset)
    }
}

/// Parse a coordinate table from any reader.
pub fn parse_annotations<R: Read>(reader: R) -> Result<AnnotationSet, SeqError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut set = AnnotationSet::default();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if let Some(region) = region_from_record(&record, line) {
            log::info!("CDS region {}..={} (line {})", region.start, region.end, line);
            set.regions.push(region);
        }

        if set.offset.is_none() && record.len() > 1 {
            match parse_field(&record, 1) {
                Ok(offset) => {
                    log::info!("Start offset set to {} (line {})", offset, line);
                    set.offset = Some(offset);
                }
                Err(e) => log::warn!("Line {}: cannot parse start offset: {}", line, e),
            }
        }
    }
    Ok(set)
}

/// Read and parse a coordinate table from a file.
pub fn load_annotations(path: &Path) -> Result<AnnotationSet, SeqError> {
    let file = std::fs::File::open(path)?;
    let set = parse_annotations(file)?;
    log::info!(
        "Loaded {} CDS regions from {}",
        set.regions.len(),
        path.display()
    );
    Ok(set)
}

fn region_from_record(record: &StringRecord, line: u64) -> Option<Region> {
    if record.len() <= 4 || !record.iter().any(|f| f == CDS_MARKER) {
        return None;
    }
    match (parse_field(record, 1), parse_field(record, 2)) {
        (Ok(start), Ok(end)) => Some(Region::new(start, end)),
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("Line {}: cannot parse CDS start/end: {}", line, e);
            None
        }
    }
}

fn parse_field(record: &StringRecord, index: usize) -> Result<i64, String> {
    let raw = record.get(index).unwrap_or("");
    raw.parse::<i64>()
        .map_err(|e| format!("field {} ({:?}): {}", index + 1, raw, e))
}
