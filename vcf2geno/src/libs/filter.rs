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

use crate::args::{MafThreshold, NaThreshold};
use crate::genotype::Genotype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiteVerdict {
    Keep,
    DropMultiAllelic,
    DropBelowMaf,
    DropAboveNa,
}

/// Genotype tallies of a single site
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenotypeCounts {
    pub hom_ref: usize,
    pub hetero: usize,
    pub hom_alt: usize,
    pub missing: usize,
}

impl GenotypeCounts {
    pub fn from_genotypes<'a>(genotypes: impl IntoIterator<Item = &'a Genotype>) -> Self {
        genotypes
            .into_iter()
            .fold(Self::default(), |mut counts, gt| {
                match gt {
                    Genotype::HomRef => counts.hom_ref += 1,
                    Genotype::RefAlt | Genotype::AltRef => counts.hetero += 1,
                    Genotype::HomAlt => counts.hom_alt += 1,
                    Genotype::Missing => counts.missing += 1,
                }
                counts
            })
    }

    pub fn samples(&self) -> usize {
        self.hom_ref + self.hetero + self.hom_alt + self.missing
    }

    pub fn genotyped_alleles(&self) -> usize {
        2 * (self.samples() - self.missing)
    }

    pub fn alt_alleles(&self) -> usize {
        self.hetero + 2 * self.hom_alt
    }

    /// ALT allele frequency over called alleles, `None` when nothing was called
    pub fn alt_allele_frequency(&self) -> Option<f64> {
        match self.genotyped_alleles() {
            0 => None,
            genotyped => Some(self.alt_alleles() as f64 / genotyped as f64),
        }
    }

    /// Folded in allele counts so that swapping REF and ALT gives the same value
    pub fn minor_allele_frequency(&self) -> Option<f64> {
        match self.genotyped_alleles() {
            0 => None,
            genotyped => {
                let minor = self.alt_alleles().min(genotyped - self.alt_alleles());
                Some(minor as f64 / genotyped as f64)
            }
        }
    }

    /// Fraction of samples with a missing genotype, `None` without samples
    pub fn missing_rate(&self) -> Option<f64> {
        match self.samples() {
            0 => None,
            n => Some(self.missing as f64 / n as f64),
        }
    }
}

/// Decides whether a site is written out.
///
/// The checks run in a fixed order (multi-allelic, MAF, missingness) and the first failing
/// check is the only reason a site is attributed to.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SiteFilter {
    min_maf: Option<MafThreshold>,
    max_na: Option<NaThreshold>,
}

impl SiteFilter {
    pub fn new(min_maf: Option<MafThreshold>, max_na: Option<NaThreshold>) -> Self {
        Self { min_maf, max_na }
    }

    pub fn check(&self, alt: &str, genotypes: &[Genotype]) -> SiteVerdict {
        if alt.contains(',') {
            return SiteVerdict::DropMultiAllelic;
        }

        if self.min_maf.is_none() && self.max_na.is_none() {
            return SiteVerdict::Keep;
        }

        let counts = GenotypeCounts::from_genotypes(genotypes);

        if let (Some(min_maf), Some(maf)) = (self.min_maf, counts.minor_allele_frequency()) {
            if maf <= min_maf.value() {
                return SiteVerdict::DropBelowMaf;
            }
        }

        if let (Some(max_na), Some(na_rate)) = (self.max_na, counts.missing_rate()) {
            if na_rate >= max_na.value() {
                return SiteVerdict::DropAboveNa;
            }
        }

        SiteVerdict::Keep
    }
}
