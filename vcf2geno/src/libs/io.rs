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

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde::Serialize;

/// Output compression, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some("gz" | "bgz") => Self::Gzip,
            _ => Self::Plain,
        }
    }
}

pub fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}

/// Reader over a plain, gzip, bzip2 or xz file, `-` reads stdin
pub fn get_input(path: &Path) -> Result<Box<dyn io::Read>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin()));
    }
    let (reader, format) =
        niffler::from_path(path).map_err(|err| eyre!("failed to open {path:?}: {err}"))?;
    tracing::debug!("Reading {path:?} with compression {format:?}");
    Ok(reader)
}

pub fn get_output(path: &Path) -> Result<Box<dyn io::Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout()));
    }

    let file = std::fs::File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|err| eyre!("failed to open {path:?}: {err}"))?;

    let output: Box<dyn io::Write> = match Compression::from_path(path) {
        Compression::Plain => Box::new(file),
        Compression::Gzip => niffler::get_writer(
            Box::new(file),
            niffler::compression::Format::Gzip,
            niffler::Level::Six,
        )
        .wrap_err(eyre!("failed to open gzip writer for {path:?}"))?,
    };
    Ok(output)
}

/// Buffered line reader over a possibly compressed file, `-` reads stdin
pub fn open_reader(path: &Path) -> Result<BufReader<Box<dyn io::Read>>> {
    Ok(BufReader::new(get_input(path)?))
}

/// Buffered writer, gzip compressed when the path ends in .gz, `-` writes stdout
pub fn open_writer(path: &Path) -> Result<BufWriter<Box<dyn io::Write>>> {
    Ok(BufWriter::new(get_output(path)?))
}

pub fn count_lines(path: &Path) -> Result<usize> {
    let mut n = 0;
    for line in open_reader(path)?.lines() {
        line.wrap_err(eyre!("failed to read {path:?}"))?;
        n += 1;
    }
    Ok(n)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut wrtr = open_writer(path)?;
    serde_json::to_writer_pretty(&mut wrtr, value)?;
    writeln!(wrtr)?;
    wrtr.flush()?;
    Ok(())
}
