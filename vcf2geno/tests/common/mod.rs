#![allow(dead_code)]
use std::path::PathBuf;

#[cfg(feature = "clap")]
use vcf2geno::clap::LogAndVerbosity;

pub const TEST_VCF: &str = "tests/data/test.vcf";
pub const TEST_VCF_GZ: &str = "tests/data/test.vcf.gz";
pub const MISMATCHED_VCF: &str = "tests/data/mismatched.vcf";
pub const THIN_TABLE: &str = "tests/data/thin.tsv";
pub const OUTDIR: &str = "tests/results";

pub const HEADER: &str = "CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\tS3\tS4";

/// Path in the results directory, created on first use
pub fn result_path(name: &str) -> PathBuf {
    std::fs::create_dir_all(OUTDIR).unwrap();
    PathBuf::from(OUTDIR).join(name)
}

pub fn read_lines(path: &PathBuf) -> Vec<String> {
    use std::io::BufRead;
    vcf2geno::io::open_reader(path)
        .unwrap()
        .lines()
        .map(|l| l.unwrap())
        .collect()
}

#[cfg(feature = "clap")]
pub fn silent_verbosity() -> LogAndVerbosity {
    LogAndVerbosity {
        verbosity: 1,
        log_file: None,
        silent: false,
    }
}
