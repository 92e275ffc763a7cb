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
use std::time::Instant;

use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use serde::Serialize;

use crate::{
    args::ConvertArgs,
    error::Vcf2GenoError,
    io::{open_reader, open_writer, write_json},
    record::{Outcome, Processor, RunSummary},
};

#[derive(Serialize)]
struct SummaryReport<'a> {
    input: &'a PathBuf,
    output: &'a PathBuf,
    args: &'a ConvertArgs,
    summary: &'a RunSummary,
}

#[doc(hidden)]
#[tracing::instrument(skip(args))]
pub fn run(
    input: PathBuf,
    output: PathBuf,
    args: ConvertArgs,
    summary_path: Option<PathBuf>,
) -> Result<RunSummary> {
    let start = Instant::now();

    tracing::info!("Input VCF: {input:?}");
    tracing::info!("Conversion rule (REF:HETERO:ALT): {}", args.convert_rule);
    if let Some(min_maf) = args.min_maf {
        tracing::info!("Removing sites with MAF <= {}", min_maf.value());
    }
    if let Some(max_na) = args.max_na {
        tracing::info!("Removing sites with missing rate >= {}", max_na.value());
    }

    let reader = open_reader(&input)?;
    let mut wrtr = open_writer(&output)?;

    let summary = match convert_lines(reader, &mut wrtr, Processor::new(args.clone())) {
        Ok(summary) => summary,
        Err(e) => {
            if e.downcast_ref::<Vcf2GenoError>().is_some_and(Vcf2GenoError::is_structural) {
                // Rows before the malformed line were already written
                let _flushed = flush_incomplete(&mut wrtr, &output);
            }
            return Err(e);
        }
    };
    wrtr.flush().wrap_err(eyre!("failed to write {output:?}"))?;

    summary.log();
    tracing::info!(
        "Finished writing {output:?} in {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );

    if let Some(path) = summary_path {
        let report = SummaryReport {
            input: &input,
            output: &output,
            args: &args,
            summary: &summary,
        };
        write_json(&path, &report)?;
    }

    Ok(summary)
}

/// Flush the rows written before a malformed line. A flush failure is only logged.
fn flush_incomplete<W: Write>(wrtr: &mut W, output: &PathBuf) -> std::io::Result<()> {
    let res = wrtr.flush();
    if let Err(flush_err) = &res {
        tracing::warn!("Failed to flush {output:?}: {flush_err}");
    }
    tracing::error!("Stopped at a malformed line, {output:?} is incomplete.");
    res
}

/// Stream every line through the processor and write out the emitted rows
pub fn convert_lines<R: BufRead, W: Write>(
    reader: R,
    wrtr: &mut W,
    mut processor: Processor,
) -> Result<RunSummary> {
    for line in reader.lines() {
        let line = line?;
        if let Outcome::Emit(row) = processor.process(&line)? {
            writeln!(wrtr, "{row}")?;
        }
    }

    Ok(processor.finalize())
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    use crate::args::MafThreshold;

    const VCF: &str = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2
chr1\t10\t.\tA\tT\t.\tPASS\t.\tGT\t0/0\t0/1
chr1\t20\t.\tA\tT,C\t.\tPASS\t.\tGT\t0/0\t0/1
chr1\t30\trs3\tA\tT\t.\tPASS\t.\tGT\t0/0\t0/0
";

    #[test]
    fn test_convert_lines() {
        let args = ConvertArgs { min_maf: Some(MafThreshold::new(0.1).unwrap()), ..Default::default() };
        let mut out = vec![];
        let summary = convert_lines(VCF.as_bytes(), &mut out, Processor::new(args)).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n1\t10\t1-10\tA\tT\t.\tPASS\t.\tGT\t1\t0\n");
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.kept_sites, 1);
        assert_eq!(summary.multi_allelic_sites, 1);
        assert_eq!(summary.below_maf_sites, 1);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_flush_incomplete_reports_failure() {
        let output = PathBuf::from("out.txt");
        let err = flush_incomplete(&mut FailingWriter, &output).unwrap_err();
        assert_eq!(err.to_string(), "disk full");

        let mut out: Vec<u8> = vec![];
        assert!(flush_incomplete(&mut out, &output).is_ok());
    }

    #[test]
    fn test_convert_lines_stops_on_structural_error() {
        let vcf = format!("{VCF}chr1\t40\t.\tA\tT\t.\tPASS\t.\tGT\t0/0\n");
        let mut out = vec![];
        let res = convert_lines(vcf.as_bytes(), &mut out, Processor::new(ConvertArgs::default()));
        assert!(res.unwrap_err().to_string().contains("Line 6"));
    }
}
