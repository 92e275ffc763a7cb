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

#[derive(Debug, Clone, PartialEq)]
pub enum Vcf2GenoError {
    // Configuration errors, raised before any line is processed
    ConvertRuleArityError(String),
    ConvertRuleSymbolError(String),
    ThresholdParseError((String, String)),
    ThresholdRangeError((String, f64, f64)),
    UnknownFieldError(String),
    ThinRateError(usize),

    // Structural errors, raised with the 1-based line number
    FieldCountError((usize, usize, usize)),
    TooFewColumnsError((usize, usize)),
    MissingHeaderError(usize),
    DuplicateHeaderError(usize),
}

impl Vcf2GenoError {
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::FieldCountError(_)
                | Self::TooFewColumnsError(_)
                | Self::MissingHeaderError(_)
                | Self::DuplicateHeaderError(_)
        )
    }
}

impl std::fmt::Display for Vcf2GenoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConvertRuleArityError(rule) => write!(
                f,
                "Conversion rule {rule:?} must have exactly three symbols in the order REF:HETERO:ALT"
            ),
            Self::ConvertRuleSymbolError(rule) => {
                write!(f, "Conversion rule {rule:?} contains an empty symbol")
            }
            Self::ThresholdParseError((name, value)) => {
                write!(f, "Value {value:?} given for {name} is not a number")
            }
            Self::ThresholdRangeError((name, value, max)) => {
                write!(f, "{name} must be between 0.0 and {max}, got {value}")
            }
            Self::UnknownFieldError(field) => write!(
                f,
                "Field {field:?} is neither a standard VCF field (CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO, FORMAT) nor a sample in the header"
            ),
            Self::ThinRateError(rate) => {
                write!(f, "Thinning rate must be at least 1, got {rate}")
            }
            Self::FieldCountError((line, expected, found)) => write!(
                f,
                "Line {line} has {found} columns but the header has {expected}. Check that the file is tab delimited and not truncated"
            ),
            Self::TooFewColumnsError((line, found)) => write!(
                f,
                "Line {line} has {found} columns, at least the 9 standard VCF fields are required"
            ),
            Self::MissingHeaderError(line) => write!(
                f,
                "Line {line} is a data line but no #CHROM header line was found before it"
            ),
            Self::DuplicateHeaderError(line) => {
                write!(f, "Line {line} is a second #CHROM header line")
            }
        }
    }
}

impl std::error::Error for Vcf2GenoError {}
