// Amino acids and the standard codon table.
//
// `translate` is a total function over strings: the 64 standard DNA codons
// map to an amino acid or `Stop`, and anything else (gaps, ambiguity codes,
// incomplete windows) maps to `None`. A miss is never an error; downstream
// it simply means "no chord".
//
// Amino acids serialize as their one-letter code, with `Stop` spelled out,
// which is the format of the `codons` column in the row table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Codon window width.
pub const CODON_LEN: usize = 3;

/// The twenty standard amino acids plus the stop marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

impl AminoAcid {
    pub const ALL: [AminoAcid; 21] = [
        AminoAcid::Ala,
        AminoAcid::Arg,
        AminoAcid::Asn,
        AminoAcid::Asp,
        AminoAcid::Cys,
        AminoAcid::Gln,
        AminoAcid::Glu,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Pro,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Tyr,
        AminoAcid::Val,
        AminoAcid::Stop,
    ];

    /// One-letter code, or `Stop`.
    pub fn code(self) -> &'static str {
        match self {
            AminoAcid::Ala => "A",
            AminoAcid::Arg => "R",
            AminoAcid::Asn => "N",
            AminoAcid::Asp => "D",
            AminoAcid::Cys => "C",
            AminoAcid::Gln => "Q",
            AminoAcid::Glu => "E",
            AminoAcid::Gly => "G",
            AminoAcid::His => "H",
            AminoAcid::Ile => "I",
            AminoAcid::Leu => "L",
            AminoAcid::Lys => "K",
            AminoAcid::Met => "M",
            AminoAcid::Phe => "F",
            AminoAcid::Pro => "P",
            AminoAcid::Ser => "S",
            AminoAcid::Thr => "T",
            AminoAcid::Trp => "W",
            AminoAcid::Tyr => "Y",
            AminoAcid::Val => "V",
            AminoAcid::Stop => "Stop",
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AminoAcid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AminoAcid::ALL
            .iter()
            .copied()
            .find(|aa| aa.code() == s)
            .ok_or_else(|| format!("unknown amino acid code {s:?}"))
    }
}

impl Serialize for AminoAcid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for AminoAcid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Translate one codon. Expects uppercase DNA; returns `None` for anything
/// that is not one of the 64 standard codons.
pub fn translate(codon: &str) -> Option<AminoAcid> {
    use AminoAcid::*;
    let aa = match codon.as_bytes() {
        b"TTT" | b"TTC" => Phe,
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => Leu,
        b"ATT" | b"ATC" | b"ATA" => Ile,
        b"ATG" => Met,
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => Val,
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => Ser,
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => Pro,
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => Thr,
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => Ala,
        b"TAT" | b"TAC" => Tyr,
        b"TAA" | b"TAG" | b"TGA" => Stop,
        b"CAT" | b"CAC" => His,
        b"CAA" | b"CAG" => Gln,
        b"AAT" | b"AAC" => Asn,
        b"AAA" | b"AAG" => Lys,
        b"GAT" | b"GAC" => Asp,
        b"GAA" | b"GAG" => Glu,
        b"TGT" | b"TGC" => Cys,
        b"TGG" => Trp,
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => Arg,
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => Gly,
        _ => return None,
    };
    Some(aa)
}

/// Translate every full codon window of a sequence, in order. A trailing
/// partial window is not included.
pub fn translate_sequence(bases: &str) -> Vec<Option<AminoAcid>> {
    bases
        .as_bytes()
        .chunks_exact(CODON_LEN)
        .map(|w| std::str::from_utf8(w).ok().and_then(translate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

    fn all_codons() -> Vec<String> {
        let mut out = Vec::new();
        for a in BASES {
            for b in BASES {
                for c in BASES {
                    out.push([a, b, c].iter().collect());
                }
            }
        }
        out
    }

    #[test]
    fn test_every_standard_codon_translates() {
        let codons = all_codons();
        assert_eq!(codons.len(), 64);
        let stops: Vec<&String> = codons
            .iter()
            .filter(|c| translate(c) == Some(AminoAcid::Stop))
            .collect();
        assert_eq!(stops, vec!["TAA", "TAG", "TGA"]);
        for codon in &codons {
            assert!(translate(codon).is_some(), "{codon} should translate");
            // Pure: same answer every time.
            assert_eq!(translate(codon), translate(codon));
        }
    }

    #[test]
    fn test_every_amino_acid_is_reachable() {
        let codons = all_codons();
        for aa in AminoAcid::ALL {
            assert!(
                codons.iter().any(|c| translate(c) == Some(aa)),
                "{aa} has no codon"
            );
        }
    }

    #[test]
    fn test_non_codons_translate_to_none() {
        for s in ["", "AT", "ATGA", "A-G", "NNN", "atg", "AUG"] {
            assert_eq!(translate(s), None, "{s:?}");
        }
    }

    #[test]
    fn test_translate_sequence_met_lys_stop() {
        let aas = translate_sequence("ATGAAATAG");
        assert_eq!(
            aas,
            vec![Some(AminoAcid::Met), Some(AminoAcid::Lys), Some(AminoAcid::Stop)]
        );
    }

    #[test]
    fn test_translate_sequence_drops_partial_window() {
        assert_eq!(translate_sequence("ATGCC").len(), 1);
    }

    #[test]
    fn test_code_round_trip() {
        for aa in AminoAcid::ALL {
            assert_eq!(aa.code().parse::<AminoAcid>(), Ok(aa));
        }
        assert!("X".parse::<AminoAcid>().is_err());
    }
}
