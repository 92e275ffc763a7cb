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
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    error::Vcf2GenoError::{self, ThinRateError},
    io::{count_lines, is_stdio, open_reader, open_writer},
};

/// Pick `n_lines / rate` lines uniformly at random. The first line is always kept.
pub fn select_lines(n_lines: usize, rate: usize, seed: u64) -> Result<Vec<bool>, Vcf2GenoError> {
    if rate == 0 {
        return Err(ThinRateError(rate));
    }

    let mut keep = vec![false; n_lines];
    if n_lines == 0 {
        return Ok(keep);
    }
    keep[0] = true;

    let candidates = n_lines - 1;
    let amount = (n_lines / rate).min(candidates);

    let mut rng = StdRng::seed_from_u64(seed);
    for i in rand::seq::index::sample(&mut rng, candidates, amount) {
        keep[i + 1] = true;
    }

    Ok(keep)
}

#[doc(hidden)]
#[tracing::instrument]
pub fn run(input: PathBuf, output: PathBuf, rate: usize, seed: u64) -> Result<()> {
    ensure!(
        !is_stdio(&input),
        "Thinning reads the input twice and needs a file path instead of stdin"
    );

    let n_lines = count_lines(&input)?;
    let keep = select_lines(n_lines, rate, seed)?;
    let n_kept = keep.iter().filter(|k| **k).count();
    tracing::info!("Keeping {n_kept} of {n_lines} lines from {input:?}.");

    let reader = open_reader(&input)?;
    let mut wrtr = open_writer(&output)?;

    for (line, keep) in reader.lines().zip(keep) {
        let line = line?;
        if keep {
            writeln!(wrtr, "{line}")?;
        }
    }
    wrtr.flush().wrap_err(eyre!("failed to write {output:?}"))?;

    Ok(())
}
