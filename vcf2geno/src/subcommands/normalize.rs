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

use std::io::{BufRead, Write};
use std::path::PathBuf;

use color_eyre::{
    eyre::{ensure, eyre, WrapErr},
    Result,
};
use itertools::Itertools;

use crate::{
    error::Vcf2GenoError::{DuplicateHeaderError, TooFewColumnsError},
    genotype::normalize,
    io::{open_reader, open_writer},
    projection::N_STANDARD_FIELDS,
    record::{split_record, LineKind, RunSummary, FORMAT},
};

/// Keeps only the GT subfield of each sample, in canonical form.
/// Used to clean a VCF before imputation, all header lines are kept as they are.
#[derive(Debug, Default)]
pub struct GenotypeCleaner {
    width: Option<usize>,
    summary: RunSummary,
}

impl GenotypeCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line to write, `None` for blank lines
    pub fn process(&mut self, line: &str) -> Result<Option<String>> {
        self.summary.lines += 1;
        let line_number = self.summary.lines;
        let line = line.trim_end_matches(['\n', '\r']);

        match LineKind::of(line) {
            LineKind::Blank => Ok(None),
            LineKind::Meta => Ok(Some(line.to_string())),
            LineKind::Header => {
                ensure!(self.width.is_none(), DuplicateHeaderError(line_number));
                let width = line.split('\t').count();
                ensure!(
                    width >= N_STANDARD_FIELDS,
                    TooFewColumnsError((line_number, width))
                );
                self.width = Some(width);
                self.summary.samples = width - N_STANDARD_FIELDS;
                Ok(Some(line.to_string()))
            }
            LineKind::Data => {
                let fields = split_record(line, self.width, line_number)?;

                let mut anomalies = 0;
                let genotypes = fields[N_STANDARD_FIELDS..].iter().map(|field| {
                    let normalized = normalize(field);
                    if normalized.anomalous {
                        tracing::debug!("Line {line_number} has unexpected genotype {field:?}");
                        anomalies += 1;
                    }
                    normalized.genotype.as_str()
                });

                let row = fields[..FORMAT]
                    .iter()
                    .copied()
                    .chain(std::iter::once("GT"))
                    .chain(genotypes)
                    .join("\t");

                if anomalies > 0 {
                    self.summary.anomalous_genotypes += anomalies;
                    self.summary.anomalous_lines += 1;
                }
                self.summary.kept_sites += 1;

                Ok(Some(row))
            }
        }
    }

    pub fn finalize(self) -> RunSummary {
        self.summary
    }
}

pub fn normalize_lines<R: BufRead, W: Write>(reader: R, wrtr: &mut W) -> Result<RunSummary> {
    let mut cleaner = GenotypeCleaner::new();
    for line in reader.lines() {
        if let Some(row) = cleaner.process(&line?)? {
            writeln!(wrtr, "{row}")?;
        }
    }
    Ok(cleaner.finalize())
}

#[doc(hidden)]
#[tracing::instrument]
pub fn run(input: PathBuf, output: PathBuf) -> Result<RunSummary> {
    tracing::info!("Input VCF: {input:?}");

    let reader = open_reader(&input)?;
    let mut wrtr = open_writer(&output)?;
    let summary = normalize_lines(reader, &mut wrtr)?;
    wrtr.flush().wrap_err(eyre!("failed to write {output:?}"))?;

    tracing::info!("{} sites were written to {output:?}.", summary.kept_sites);
    if summary.anomalous_genotypes > 0 {
        tracing::warn!(
            "{} genotypes on {} lines did not match the diploid format and were set to ./.",
            summary.anomalous_genotypes,
            summary.anomalous_lines
        );
    }
    tracing::info!("Next step is imputation.");

    Ok(summary)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    const HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\tS3";

    #[test]
    fn test_cleaner_keeps_only_gt() {
        let mut cleaner = GenotypeCleaner::new();
        assert_eq!(cleaner.process("##source=caller").unwrap(), Some("##source=caller".into()));
        assert_eq!(cleaner.process(HEADER).unwrap(), Some(HEADER.into()));

        let line = "chr1\t5\t.\tG\tA\t50\tPASS\tDP=3\tGT:AD:DP\t1/1:0,25:25\t0|1:3,3:6\t1:0,4:4";
        let row = cleaner.process(line).unwrap().unwrap();
        assert_eq!(row, "chr1\t5\t.\tG\tA\t50\tPASS\tDP=3\tGT\t1/1\t0/1\t./.");

        // Multi-allelic sites are not filtered here
        let line = "chr1\t6\t.\tG\tA,C\t50\tPASS\t.\tGT\t1/2\t0/0\t./.";
        let row = cleaner.process(line).unwrap().unwrap();
        assert_eq!(row, "chr1\t6\t.\tG\tA,C\t50\tPASS\t.\tGT\t./.\t0/0\t./.");

        assert_eq!(cleaner.process("").unwrap(), None);

        let summary = cleaner.finalize();
        assert_eq!(summary.kept_sites, 2);
        assert_eq!(summary.anomalous_genotypes, 2);
        assert_eq!(summary.anomalous_lines, 2);
        assert_eq!(summary.samples, 3);
    }

    #[test]
    fn test_cleaner_checks_columns() {
        let mut cleaner = GenotypeCleaner::new();
        cleaner.process(HEADER).unwrap();
        assert!(cleaner.process("chr1\t5\t.\tG\tA\t50\tPASS\t.\tGT\t0/0\t0/0").is_err());
        assert!(cleaner.process(HEADER).is_err());
    }
}
