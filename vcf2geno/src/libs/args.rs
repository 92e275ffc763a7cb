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

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Vcf2GenoError::{self, ConvertRuleArityError, ConvertRuleSymbolError};
use crate::utils::{check_fraction, parse_fraction, strip_brackets};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConvertArgs {
    /// Conversion rule for genotypes in the order REF:HETERO:ALT. Missing genotypes are always NA
    #[cfg_attr(feature = "clap", arg(short = 'c', long, default_value = "1:0:-1", allow_hyphen_values = true))]
    pub convert_rule: ConversionRule,

    /// Remove sites with a minor allele frequency at or below this value (0.0 - 0.5)
    #[cfg_attr(feature = "clap", arg(short = 'm', long))]
    pub min_maf: Option<MafThreshold>,

    /// Remove sites with a missing genotype rate at or above this value (0.0 - 1.0)
    #[cfg_attr(feature = "clap", arg(short = 'n', long))]
    pub max_na: Option<NaThreshold>,

    /// Fields or samples to remove, separated by colons, i.e. QUAL:FILTER:INFO:FORMAT
    #[cfg_attr(feature = "clap", arg(short = 'r', long))]
    pub remove_fields: Option<RemoveFields>,

    /// Keep the ## meta-information lines
    #[cfg_attr(feature = "clap", arg(short = 'k', long))]
    pub keep_header: bool,
}

/// Output symbols for homozygous REF, heterozygous and homozygous ALT genotypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub hom_ref: String,
    pub hetero: String,
    pub hom_alt: String,
}

impl ConversionRule {
    pub fn new(hom_ref: &str, hetero: &str, hom_alt: &str) -> Self {
        Self {
            hom_ref: hom_ref.to_string(),
            hetero: hetero.to_string(),
            hom_alt: hom_alt.to_string(),
        }
    }
}

impl Default for ConversionRule {
    fn default() -> Self {
        Self::new("1", "0", "-1")
    }
}

impl FromStr for ConversionRule {
    type Err = Vcf2GenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<&str> = strip_brackets(s).split(':').map(str::trim).collect();

        match symbols.as_slice() {
            [hom_ref, hetero, hom_alt] => {
                if symbols.iter().any(|symbol| symbol.is_empty()) {
                    return Err(ConvertRuleSymbolError(s.into()));
                }
                Ok(Self::new(hom_ref, hetero, hom_alt))
            }
            _ => Err(ConvertRuleArityError(s.into())),
        }
    }
}

impl std::fmt::Display for ConversionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.hom_ref, self.hetero, self.hom_alt)
    }
}

/// Minor allele frequency threshold, always within [0.0, 0.5]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct MafThreshold(f64);

impl MafThreshold {
    pub const MAX: f64 = 0.5;
    const NAME: &'static str = "min-maf";

    pub fn new(value: f64) -> Result<Self, Vcf2GenoError> {
        check_fraction(Self::NAME, value, Self::MAX).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for MafThreshold {
    type Err = Vcf2GenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fraction(Self::NAME, s, Self::MAX).map(Self)
    }
}

/// Missing genotype rate threshold, always within [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct NaThreshold(f64);

impl NaThreshold {
    pub const MAX: f64 = 1.0;
    const NAME: &'static str = "max-na";

    pub fn new(value: f64) -> Result<Self, Vcf2GenoError> {
        check_fraction(Self::NAME, value, Self::MAX).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for NaThreshold {
    type Err = Vcf2GenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fraction(Self::NAME, s, Self::MAX).map(Self)
    }
}

/// Names of standard fields and samples to drop from every output row.
/// Sample names are only checked against the header once it has been read.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveFields(Vec<String>);

impl RemoveFields {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut fields: Vec<String> = vec![];
        for name in names.iter().map(|n| n.as_ref().trim()) {
            if !name.is_empty() && !fields.iter().any(|f| f == name) {
                fields.push(name.to_string());
            }
        }
        Self(fields)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for RemoveFields {
    type Err = Vcf2GenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = strip_brackets(s).split(':').collect();
        Ok(Self::new(&names))
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rule_from_str() {
        assert_eq!("1:0:-1".parse(), Ok(ConversionRule::default()));
        assert_eq!("[1:0:-1]".parse(), Ok(ConversionRule::default()));
        assert_eq!("0:1:2".parse(), Ok(ConversionRule::new("0", "1", "2")));
        assert_eq!("AA:AB:BB".parse::<ConversionRule>().unwrap().to_string(), "AA:AB:BB");

        assert_eq!("1:0".parse::<ConversionRule>(), Err(ConvertRuleArityError("1:0".into())));
        assert_eq!("1:0:-1:2".parse::<ConversionRule>(), Err(ConvertRuleArityError("1:0:-1:2".into())));
        assert_eq!("1::-1".parse::<ConversionRule>(), Err(ConvertRuleSymbolError("1::-1".into())));
    }

    #[test]
    fn test_thresholds() {
        assert_eq!("0.2".parse::<MafThreshold>().unwrap().value(), 0.2);
        assert!("0.51".parse::<MafThreshold>().is_err());
        assert!("0.8".parse::<NaThreshold>().is_ok());
        assert!("1.01".parse::<NaThreshold>().is_err());
        assert!(MafThreshold::new(-0.01).is_err());
        assert_eq!(NaThreshold::new(0.4).unwrap().value(), 0.4);
    }

    #[test]
    fn test_remove_fields_from_str() {
        let fields: RemoveFields = "[QUAL:FILTER:QUAL::SAMPLE1]".parse().unwrap();
        assert_eq!(fields.names(), ["QUAL", "FILTER", "SAMPLE1"]);

        let fields: RemoveFields = "".parse().unwrap();
        assert!(fields.is_empty());
    }
}
