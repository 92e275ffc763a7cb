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

use color_eyre::{
    eyre::{ensure, eyre},
    Result,
};
use itertools::Itertools;
use serde::Serialize;

use crate::args::ConvertArgs;
use crate::error::Vcf2GenoError::{
    DuplicateHeaderError, FieldCountError, MissingHeaderError, TooFewColumnsError,
};
use crate::filter::{SiteFilter, SiteVerdict};
use crate::genotype::{normalize, Genotype, GenotypeEncoder};
use crate::projection::{FieldProjector, N_STANDARD_FIELDS, STANDARD_FIELDS};
use crate::utils::strip_chrom_prefix;

// Column positions of the standard fields
pub const CHROM: usize = 0;
pub const POS: usize = 1;
pub const ID: usize = 2;
pub const ALT: usize = 4;
pub const FORMAT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Meta,
    Header,
    Data,
}

impl LineKind {
    pub fn of(line: &str) -> Self {
        if line.is_empty() {
            Self::Blank
        } else if line.starts_with("#CHROM") {
            Self::Header
        } else if line.starts_with('#') {
            Self::Meta
        } else {
            Self::Data
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    Blank,
    MetaLine,
    MultiAllelic,
    BelowMaf,
    AboveNa,
}

/// What to do with one input line. Emitted text carries no line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emit(String),
    Drop(DropReason),
}

/// Aggregate counters of one run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines: usize,
    pub samples: usize,
    pub kept_sites: usize,
    pub multi_allelic_sites: usize,
    pub below_maf_sites: usize,
    pub above_na_sites: usize,
    pub anomalous_genotypes: usize,
    pub anomalous_lines: usize,
    pub removed_fields: Vec<String>,
}

impl RunSummary {
    pub fn tally(&mut self, verdict: SiteVerdict) {
        match verdict {
            SiteVerdict::Keep => self.kept_sites += 1,
            SiteVerdict::DropMultiAllelic => self.multi_allelic_sites += 1,
            SiteVerdict::DropBelowMaf => self.below_maf_sites += 1,
            SiteVerdict::DropAboveNa => self.above_na_sites += 1,
        }
    }

    pub fn dropped_sites(&self) -> usize {
        self.multi_allelic_sites + self.below_maf_sites + self.above_na_sites
    }

    pub fn log(&self) {
        tracing::info!("{} sites were written.", self.kept_sites);
        if self.multi_allelic_sites > 0 {
            tracing::info!("{} multi-allelic sites were removed.", self.multi_allelic_sites);
        }
        if self.below_maf_sites > 0 {
            tracing::info!("{} sites at or below the MAF threshold were removed.", self.below_maf_sites);
        }
        if self.above_na_sites > 0 {
            tracing::info!("{} sites at or above the missing rate threshold were removed.", self.above_na_sites);
        }
        if self.anomalous_genotypes > 0 {
            tracing::warn!(
                "{} genotypes on {} lines did not match the diploid format and were set to missing.",
                self.anomalous_genotypes,
                self.anomalous_lines
            );
        }
        if !self.removed_fields.is_empty() {
            tracing::info!("Removed columns: {}", self.removed_fields.join(", "));
        }
    }
}

/// Split a line into tab separated columns and check the count against the header
pub fn split_record(line: &str, width: Option<usize>, line_number: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();

    ensure!(
        fields.len() >= N_STANDARD_FIELDS,
        TooFewColumnsError((line_number, fields.len()))
    );

    match width {
        Some(width) => ensure!(
            fields.len() == width,
            FieldCountError((line_number, width, fields.len()))
        ),
        None => return Err(eyre!(MissingHeaderError(line_number))),
    }

    Ok(fields)
}

#[derive(Debug, Clone)]
struct Header {
    width: usize,
    projector: FieldProjector,
}

/// Converts a VCF line by line. Owns the counters of the run.
#[derive(Debug, Clone)]
pub struct Processor {
    args: ConvertArgs,
    filter: SiteFilter,
    encoder: GenotypeEncoder,
    header: Option<Header>,
    summary: RunSummary,
}

impl Processor {
    pub fn new(args: ConvertArgs) -> Self {
        Self {
            filter: SiteFilter::new(args.min_maf, args.max_na),
            encoder: GenotypeEncoder::new(&args.convert_rule),
            header: None,
            summary: RunSummary::default(),
            args,
        }
    }

    pub fn process(&mut self, line: &str) -> Result<Outcome> {
        self.summary.lines += 1;
        let line = line.trim_end_matches(['\n', '\r']);

        match LineKind::of(line) {
            LineKind::Blank => Ok(Outcome::Drop(DropReason::Blank)),
            LineKind::Meta => match self.args.keep_header {
                true => Ok(Outcome::Emit(line.to_string())),
                false => Ok(Outcome::Drop(DropReason::MetaLine)),
            },
            LineKind::Header => self.process_header(line).map(Outcome::Emit),
            LineKind::Data => self.process_data(line),
        }
    }

    pub fn finalize(self) -> RunSummary {
        self.summary
    }

    fn process_header(&mut self, line: &str) -> Result<String> {
        let line_number = self.summary.lines;
        ensure!(self.header.is_none(), DuplicateHeaderError(line_number));

        let mut fields: Vec<&str> = line.split('\t').collect();
        ensure!(
            fields.len() >= N_STANDARD_FIELDS,
            TooFewColumnsError((line_number, fields.len()))
        );

        let projector = match &self.args.remove_fields {
            Some(remove) => FieldProjector::resolve(remove, &fields)?,
            None => FieldProjector::default(),
        };

        fields[CHROM] = STANDARD_FIELDS[CHROM];

        self.summary.samples = fields.len() - N_STANDARD_FIELDS;
        self.summary.removed_fields = projector
            .removed()
            .into_iter()
            .map(|i| fields[i].to_string())
            .collect();

        let header = projector.project(&fields).join("\t");
        self.header = Some(Header {
            width: fields.len(),
            projector,
        });

        Ok(header)
    }

    fn process_data(&mut self, line: &str) -> Result<Outcome> {
        let line_number = self.summary.lines;
        let width = self.header.as_ref().map(|h| h.width);
        let fields = split_record(line, width, line_number)?;

        let mut anomalies = 0;
        let genotypes: Vec<Genotype> = fields[N_STANDARD_FIELDS..]
            .iter()
            .map(|field| {
                let normalized = normalize(field);
                anomalies += usize::from(normalized.anomalous);
                normalized.genotype
            })
            .collect();

        if anomalies > 0 {
            tracing::debug!("Line {line_number} has {anomalies} genotypes not in the diploid format");
            self.summary.anomalous_genotypes += anomalies;
            self.summary.anomalous_lines += 1;
        }

        let verdict = self.filter.check(fields[ALT], &genotypes);
        self.summary.tally(verdict);

        match verdict {
            SiteVerdict::Keep => Ok(Outcome::Emit(self.assemble(&fields, &genotypes))),
            SiteVerdict::DropMultiAllelic => Ok(Outcome::Drop(DropReason::MultiAllelic)),
            SiteVerdict::DropBelowMaf => Ok(Outcome::Drop(DropReason::BelowMaf)),
            SiteVerdict::DropAboveNa => Ok(Outcome::Drop(DropReason::AboveNa)),
        }
    }

    fn assemble(&self, fields: &[&str], genotypes: &[Genotype]) -> String {
        let chrom = strip_chrom_prefix(fields[CHROM]);

        // Generated after the CHROM rewrite so it carries the final contig label
        let id = match fields[ID] {
            "." => format!("{chrom}-{}", fields[POS]),
            id => id.to_string(),
        };

        let mut row: Vec<&str> = Vec::with_capacity(fields.len());
        row.push(chrom);
        row.push(fields[POS]);
        row.push(&id);
        row.extend_from_slice(&fields[ID + 1..N_STANDARD_FIELDS]);
        row.extend(genotypes.iter().map(|gt| self.encoder.encode(*gt)));

        match &self.header {
            Some(header) => header.projector.project(&row).join("\t"),
            None => row.join("\t"),
        }
    }
}
