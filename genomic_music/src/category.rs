// Amino-acid side-chain categories.
//
// Chord schemes pick a chord family by category and a root by the amino
// acid's rank within its category. Both come from fixed member lists:
//
//   non-polar: A V L I M F W P G
//   polar:     S T C Y N Q
//   basic:     K R H
//   acidic:    D E
//
// The rank is the index in that list, so `categorize` is a single match
// rather than a search through the lists.

use genomic_music_seq::codon::AminoAcid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AminoCategory {
    NonPolar,
    Polar,
    Basic,
    Acidic,
    /// The stop marker has no side chain and never gets a chord.
    Stop,
}

impl AminoCategory {
    /// Members in rank order.
    pub fn members(self) -> &'static [AminoAcid] {
        use AminoAcid::*;
        match self {
            AminoCategory::NonPolar => &[Ala, Val, Leu, Ile, Met, Phe, Trp, Pro, Gly],
            AminoCategory::Polar => &[Ser, Thr, Cys, Tyr, Asn, Gln],
            AminoCategory::Basic => &[Lys, Arg, His],
            AminoCategory::Acidic => &[Asp, Glu],
            AminoCategory::Stop => &[Stop],
        }
    }
}

/// Category and rank of an amino acid. Total over `AminoAcid`.
pub fn categorize(aa: AminoAcid) -> (AminoCategory, usize) {
    use AminoAcid::*;
    use AminoCategory::{Acidic, Basic, NonPolar, Polar};
    match aa {
        Ala => (NonPolar, 0),
        Val => (NonPolar, 1),
        Leu => (NonPolar, 2),
        Ile => (NonPolar, 3),
        Met => (NonPolar, 4),
        Phe => (NonPolar, 5),
        Trp => (NonPolar, 6),
        Pro => (NonPolar, 7),
        Gly => (NonPolar, 8),
        Ser => (Polar, 0),
        Thr => (Polar, 1),
        Cys => (Polar, 2),
        Tyr => (Polar, 3),
        Asn => (Polar, 4),
        Gln => (Polar, 5),
        Lys => (Basic, 0),
        Arg => (Basic, 1),
        His => (Basic, 2),
        Asp => (Acidic, 0),
        Glu => (Acidic, 1),
        Stop => (AminoCategory::Stop, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_member_lists() {
        for aa in AminoAcid::ALL {
            let (category, rank) = categorize(aa);
            assert_eq!(category.members()[rank], aa, "{aa}");
        }
    }

    #[test]
    fn test_category_sizes() {
        assert_eq!(AminoCategory::NonPolar.members().len(), 9);
        assert_eq!(AminoCategory::Polar.members().len(), 6);
        assert_eq!(AminoCategory::Basic.members().len(), 3);
        assert_eq!(AminoCategory::Acidic.members().len(), 2);
    }

    #[test]
    fn test_examples() {
        assert_eq!(categorize(AminoAcid::Asp), (AminoCategory::Acidic, 0));
        assert_eq!(categorize(AminoAcid::Met), (AminoCategory::NonPolar, 4));
        assert_eq!(categorize(AminoAcid::Stop).0, AminoCategory::Stop);
    }
}
