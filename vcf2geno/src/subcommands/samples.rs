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

use std::io::BufRead;
use std::path::PathBuf;

use color_eyre::{
    eyre::{ensure, eyre},
    Result,
};

use crate::{
    error::Vcf2GenoError::{MissingHeaderError, TooFewColumnsError},
    io::open_reader,
    projection::N_STANDARD_FIELDS,
    record::LineKind,
};

/// Read the sample names from the `#CHROM` line, stopping at the first data line
pub fn get_sample_names<R: BufRead>(reader: R) -> Result<Vec<String>> {
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        match LineKind::of(&line) {
            LineKind::Header => {
                let fields: Vec<&str> = line.split('\t').collect();
                ensure!(
                    fields.len() >= N_STANDARD_FIELDS,
                    TooFewColumnsError((i + 1, fields.len()))
                );
                return Ok(fields[N_STANDARD_FIELDS..]
                    .iter()
                    .map(|s| s.to_string())
                    .collect());
            }
            LineKind::Data => return Err(eyre!(MissingHeaderError(i + 1))),
            LineKind::Meta | LineKind::Blank => (),
        }
    }
    Err(eyre!("The file contains no #CHROM header line"))
}

#[doc(hidden)]
pub fn run(path: PathBuf) -> Result<()> {
    let ids = get_sample_names(open_reader(&path)?)?;
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_get_sample_names() {
        let vcf = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n1\t1\t.\tA\tT\t.\t.\t.\tGT\t0/0\t0/0\n";
        assert_eq!(get_sample_names(vcf.as_bytes()).unwrap(), ["S1", "S2"]);

        let no_samples = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\n";
        assert!(get_sample_names(no_samples.as_bytes()).unwrap().is_empty());

        assert!(get_sample_names("##meta\n".as_bytes()).is_err());
        assert!(get_sample_names("1\t1\t.\tA\tT\t.\t.\t.\tGT\n".as_bytes()).is_err());
    }
}
