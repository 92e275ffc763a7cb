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

use crate::error::Vcf2GenoError::{self, ThresholdParseError, ThresholdRangeError};

//NOTE: Older pipelines pass lists as [a:b:c] so that a leading -1 is not read as a flag
pub fn strip_brackets(value: &str) -> &str {
    let value = value.trim();
    match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => inner,
        None => value,
    }
}

// Fractions are parsed as f64 and must lie in [0.0, max]
pub fn parse_fraction(name: &str, value: &str, max: f64) -> Result<f64, Vcf2GenoError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| ThresholdParseError((name.into(), value.into())))?;

    check_fraction(name, parsed, max)
}

pub fn check_fraction(name: &str, value: f64, max: f64) -> Result<f64, Vcf2GenoError> {
    // NaN fails the range check
    if (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ThresholdRangeError((name.into(), value, max)))
    }
}

// Contig names such as chr1, Chr1, CHR1 or chromosome1 become 1
pub fn strip_chrom_prefix(chrom: &str) -> &str {
    for prefix in ["chromosome", "chrom", "chr"] {
        match chrom.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(prefix) && chrom.len() > prefix.len() => {
                return &chrom[prefix.len()..]
            }
            _ => (),
        }
    }
    chrom
}
