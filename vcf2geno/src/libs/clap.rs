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

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::OffsetTime;

use crate::args::ConvertArgs;
use crate::subcommands::{convert, normalize, samples, thin};

#[derive(Parser, Debug)]
#[command(author, version, about, styles=get_styles())]
pub struct Arguments {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Args, Debug, Clone)]
pub struct LogAndVerbosity {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, default_value_t = 3)]
    pub verbosity: u8,

    /// A file path to save logs to
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// Silence all warning and info messages
    #[arg(long)]
    pub silent: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Convert genotypes to numeric codes, filter sites and remove columns
    Convert {
        /// Input VCF (.vcf, .vcf.gz, .txt or - for stdin)
        input: PathBuf,

        /// Output file, gzip compressed if it ends in .gz (- for stdout)
        #[arg(short = 'o', long, default_value_os_t = PathBuf::from("-"))]
        output: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        summary: Option<PathBuf>,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Keep only the GT subfield of each sample and set malformed genotypes to ./. (before imputation)
    Normalize {
        /// Input VCF (.vcf, .vcf.gz, .txt or - for stdin)
        input: PathBuf,

        /// Output file, gzip compressed if it ends in .gz (- for stdout)
        #[arg(short = 'o', long, default_value_os_t = PathBuf::from("-"))]
        output: PathBuf,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Randomly keep one in every `rate` lines, always keeping the first line
    Thin {
        /// Input table or VCF file
        input: PathBuf,

        /// Output file, gzip compressed if it ends in .gz (- for stdout)
        #[arg(short = 'o', long, default_value_os_t = PathBuf::from("-"))]
        output: PathBuf,

        /// Keep 1/rate of the lines
        #[arg(long, default_value_t = 10)]
        rate: usize,

        /// Seed for the random line selection
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// List the sample names in a VCF
    Samples {
        /// Input VCF
        file: PathBuf,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },
}

impl SubCommand {
    #[rustfmt::skip]
    pub fn log_and_verbosity(&self) -> (u8, &Option<PathBuf>, bool) {
        match self {
            SubCommand::Convert { log_and_verbosity, .. }
            | SubCommand::Normalize { log_and_verbosity, .. }
            | SubCommand::Thin { log_and_verbosity, .. }
            | SubCommand::Samples { log_and_verbosity, .. }
            => (log_and_verbosity.verbosity, &log_and_verbosity.log_file, log_and_verbosity.silent),
        }
    }
}

pub fn run_args(args: Arguments) -> Result<()> {
    let (verbosity, log_file, is_silent) = args.cmd.log_and_verbosity();

    let (level, wrtr, _guard) = init_tracing(verbosity, log_file, is_silent)?;

    let timer = time::format_description::parse("[hour]:[minute]:[second].[subsecond digits:3]")?;
    let time_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(time_offset, timer);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(wrtr)
        .with_timer(timer)
        .init();

    run_cmd(args.cmd)?;

    Ok(())
}

#[rustfmt::skip]
pub fn run_cmd(cmd: SubCommand) -> Result<()> {
    match cmd {
        SubCommand::Convert { input, output, args, summary, .. } => {
            convert::run(input, output, args, summary)?;
        }
        SubCommand::Normalize { input, output, .. } => {
            normalize::run(input, output)?;
        }
        SubCommand::Thin { input, output, rate, seed, .. } => thin::run(input, output, rate, seed)?,
        SubCommand::Samples { file, .. } => samples::run(file)?,
    };
    Ok(())
}

pub fn init_tracing(
    verbosity: u8,
    log_file: &Option<PathBuf>,
    is_silent: bool,
) -> Result<(Level, NonBlocking, WorkerGuard)> {
    let level = if is_silent {
        Level::ERROR
    } else {
        match verbosity {
            0 | 1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            5..=u8::MAX => Level::TRACE,
        }
    };

    // Write logs to stderr or file
    let (wrtr, _guard) = match log_file {
        Some(path) => {
            let file = std::fs::File::options()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    Ok((level, wrtr, _guard))
}

pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}
