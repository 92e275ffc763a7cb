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

//! VCF2GENO - Convert VCF genotypes into analysis-ready tables
//!
//! The conversion streams a VCF line by line. Each sample genotype is reduced to one of
//! `0/0`, `0/1`, `1/0`, `1/1` or `./.` and then written as a user chosen symbol,
//! missing genotypes always becoming `NA`. Sites can be removed by allele count,
//! minor allele frequency or missing rate and whole columns can be dropped by name.
//!
//! ## Running VCF2GENO
//!
//! ```bash
//! vcf2geno normalize input.vcf.gz -o gt_only.vcf.gz
//!
//! vcf2geno convert imputed.vcf.gz -o genotypes.txt.gz \
//!     --convert-rule 1:0:-1 --min-maf 0.05 --max-na 0.1 \
//!     --remove-fields QUAL:FILTER:INFO:FORMAT --summary summary.json
//!
//! vcf2geno thin genotypes.txt.gz -o thinned.txt --rate 100 --seed 42
//! ```

#[doc(hidden)]
pub mod args;

#[doc(hidden)]
pub mod error;

/// Site filtering by allele count, minor allele frequency and missing rate
pub mod filter;

/// Genotype normalization and encoding
pub mod genotype;

#[doc(hidden)]
pub mod io;

/// Column removal
pub mod projection;

/// Line classification and the streaming record processor
pub mod record;

#[doc(hidden)]
pub mod utils;

#[cfg(feature = "clap")]
pub mod clap;
