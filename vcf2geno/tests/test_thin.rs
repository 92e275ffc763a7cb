mod common;

use std::path::PathBuf;

use vcf2geno::subcommands::thin;

use crate::common::{read_lines, result_path, THIN_TABLE};

#[test]
#[cfg(feature = "clap")]
fn thin_cmd() {
    let cmd = vcf2geno::clap::SubCommand::Thin {
        input: PathBuf::from(THIN_TABLE),
        output: result_path("thin_clap.tsv"),
        rate: 10,
        seed: 0,
        log_and_verbosity: crate::common::silent_verbosity(),
    };
    vcf2geno::clap::run_cmd(cmd).unwrap();
}

#[test]
fn thin_keeps_header_and_order() {
    let output = result_path("thin.tsv");
    thin::run(PathBuf::from(THIN_TABLE), output.clone(), 10, 42).unwrap();

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "CHROM\tPOS\tID\tS1\tS2");

    let positions: Vec<usize> = lines[1..]
        .iter()
        .map(|l| l.split('\t').nth(1).unwrap().parse().unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // Same seed, same lines
    let again = result_path("thin_again.tsv");
    thin::run(PathBuf::from(THIN_TABLE), again.clone(), 10, 42).unwrap();
    assert_eq!(lines, read_lines(&again));
}

#[test]
fn thin_rejects_bad_input() {
    let output = result_path("thin_bad.tsv");
    assert!(thin::run(PathBuf::from(THIN_TABLE), output.clone(), 0, 0).is_err());
    assert!(thin::run(PathBuf::from("-"), output.clone(), 10, 0).is_err());
    assert!(thin::run(PathBuf::from("tests/data/missing.tsv"), output, 10, 0).is_err());
}
