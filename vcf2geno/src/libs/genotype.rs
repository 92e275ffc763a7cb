// VCF2GENO - Convert VCF genotypes into analysis-ready tables
// Copyright (C) 2024  Osma S. Rautila
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use serde::Serialize;

use crate::args::ConversionRule;

/// Output symbol for missing genotypes, independent of the conversion rule
pub const MISSING_SYMBOL: &str = "NA";

/// A biallelic diploid genotype in canonical form. Phase is discarded, so `0|1` is `RefAlt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Genotype {
    HomRef,
    RefAlt,
    AltRef,
    HomAlt,
    Missing,
}

impl Genotype {
    pub const ALL: [Genotype; 5] = [
        Genotype::HomRef,
        Genotype::RefAlt,
        Genotype::AltRef,
        Genotype::HomAlt,
        Genotype::Missing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomRef => "0/0",
            Self::RefAlt => "0/1",
            Self::AltRef => "1/0",
            Self::HomAlt => "1/1",
            Self::Missing => "./.",
        }
    }

    /// Number of ALT alleles carried, `None` for missing genotypes
    pub fn alt_alleles(&self) -> Option<u32> {
        match self {
            Self::HomRef => Some(0),
            Self::RefAlt | Self::AltRef => Some(1),
            Self::HomAlt => Some(2),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of normalizing one sample field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub genotype: Genotype,
    pub anomalous: bool,
}

/// Extract the GT subfield of a sample column and canonicalize it.
///
/// Only the first colon-delimited subfield is read. Both `/` and `|` separate the alleles.
/// Anything that is not a diploid call over `{0, 1, .}` with both alleles missing or both
/// present (haploid calls, multi-allelic indices, half-missing calls) becomes `./.` and is
/// flagged as anomalous.
pub fn normalize(field: &str) -> Normalized {
    let gt = match field.split_once(':') {
        Some((gt, _)) => gt,
        None => field,
    };

    let genotype = match gt.as_bytes() {
        [a, b'/' | b'|', b] => match (a, b) {
            (b'0', b'0') => Some(Genotype::HomRef),
            (b'0', b'1') => Some(Genotype::RefAlt),
            (b'1', b'0') => Some(Genotype::AltRef),
            (b'1', b'1') => Some(Genotype::HomAlt),
            (b'.', b'.') => Some(Genotype::Missing),
            _ => None,
        },
        _ => None,
    };

    match genotype {
        Some(genotype) => Normalized {
            genotype,
            anomalous: false,
        },
        None => Normalized {
            genotype: Genotype::Missing,
            anomalous: true,
        },
    }
}

/// Per-token lookup from a canonical genotype to its output symbol.
///
/// Every genotype is mapped on its own, so a symbol that happens to look like a genotype
/// (i.e. the rule `1/1:0/1:0/0`) can never be converted a second time.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeEncoder {
    table: [String; 5],
}

impl GenotypeEncoder {
    pub fn new(rule: &ConversionRule) -> Self {
        let table = Genotype::ALL.map(|gt| match gt {
            Genotype::HomRef => rule.hom_ref.clone(),
            Genotype::RefAlt | Genotype::AltRef => rule.hetero.clone(),
            Genotype::HomAlt => rule.hom_alt.clone(),
            Genotype::Missing => MISSING_SYMBOL.to_string(),
        });
        Self { table }
    }

    pub fn encode(&self, genotype: Genotype) -> &str {
        &self.table[genotype as usize]
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn gt(field: &str) -> Genotype {
        normalize(field).genotype
    }

    #[test]
    fn test_normalize_canonical() {
        for genotype in Genotype::ALL {
            let normalized = normalize(genotype.as_str());
            assert_eq!(normalized.genotype, genotype);
            assert!(!normalized.anomalous);
        }
    }

    #[test]
    fn test_normalize_strips_annotations_and_phase() {
        assert_eq!(gt("1/1:0,25:25:75:1115,75,0"), Genotype::HomAlt);
        assert_eq!(gt("0|1:12"), Genotype::RefAlt);
        assert_eq!(gt("1|0"), Genotype::AltRef);
        assert_eq!(gt(".|.:0"), Genotype::Missing);
        assert!(!normalize("0|0:99").anomalous);
    }

    #[test]
    fn test_normalize_anomalies() {
        for field in ["1", "0", ".", "1/2", "2/2", "./1", "0/.", "0/0/1", "", "0-0", "00", "A/T", "0/0 ", ":0/0"] {
            let normalized = normalize(field);
            assert_eq!(normalized.genotype, Genotype::Missing, "{field:?}");
            assert!(normalized.anomalous, "{field:?}");
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        let alphabet = ['0', '1', '.', '/', '|', ':', '2', 'A'];
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..2000 {
            let len = rng.gen_range(0..6);
            let field: String = (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect();

            let once = normalize(&field).genotype;
            let twice = normalize(once.as_str());
            assert_eq!(once, twice.genotype, "{field:?}");
            assert!(!twice.anomalous);
        }
    }

    #[test]
    fn test_alt_alleles() {
        assert_eq!(Genotype::HomRef.alt_alleles(), Some(0));
        assert_eq!(Genotype::AltRef.alt_alleles(), Some(1));
        assert_eq!(Genotype::HomAlt.alt_alleles(), Some(2));
        assert_eq!(Genotype::Missing.alt_alleles(), None);
    }

    #[test]
    fn test_encode_default_rule() {
        let encoder = GenotypeEncoder::new(&ConversionRule::default());
        let encoded: Vec<_> = ["0/0", "0/1", "1/0", "1/1", "./."]
            .iter()
            .map(|field| encoder.encode(gt(field)))
            .collect();
        assert_eq!(encoded, ["1", "0", "0", "-1", "NA"]);
    }

    #[test]
    fn test_encode_does_not_chain_substitutions() {
        // Symbols that alias other genotype tokens
        let rule = ConversionRule::new("1/1", "0/0", "./.");
        let encoder = GenotypeEncoder::new(&rule);
        assert_eq!(encoder.encode(Genotype::HomRef), "1/1");
        assert_eq!(encoder.encode(Genotype::RefAlt), "0/0");
        assert_eq!(encoder.encode(Genotype::HomAlt), "./.");
        assert_eq!(encoder.encode(Genotype::Missing), "NA");

        // A REF symbol equal to the ALT allele index must not leak into 1/1
        let rule = ConversionRule::new("1", "NA", "0");
        let encoder = GenotypeEncoder::new(&rule);
        assert_eq!(encoder.encode(Genotype::HomRef), "1");
        assert_eq!(encoder.encode(Genotype::HomAlt), "0");
    }

    #[test]
    fn test_encode_hom_ref_independent_of_other_symbols() {
        let symbols = ["0/0", "0/1", "1/0", "1/1", "./.", "NA", "1", "0", "-1", "2"];
        for hetero in symbols {
            for hom_alt in symbols {
                let encoder = GenotypeEncoder::new(&ConversionRule::new("REF", hetero, hom_alt));
                assert_eq!(encoder.encode(gt("0/0")), "REF");
                assert_eq!(encoder.encode(gt("./.")), MISSING_SYMBOL);
            }
        }
    }
}
