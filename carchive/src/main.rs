use std::path::PathBuf;

use carchive_format::{LogicalType, TextEncoding};
use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing::Level;

mod commands;
mod error;
mod locale;

use commands::write::{parse_assignment, Assignment};

fn parse_type(src: &str) -> std::result::Result<LogicalType, String> {
    match src.parse::<LogicalType>() {
        Ok(LogicalType::Unknown) | Err(_) => Err(format!("Unknown value type: {}", src)),
        Ok(ty) => Ok(ty),
    }
}

fn parse_encoding(src: &str) -> std::result::Result<TextEncoding, String> {
    TextEncoding::for_label(src).map_err(|e| e.to_string())
}

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "d",
        visible_alias = "dump",
        about = "Decode a sequence of typed values from an archive"
    )]
    Dump {
        #[structopt(
            short,
            long,
            help = "Code page for strings without a unicode marker [default: from locale, else windows-1252]"
        )]
        encoding: Option<String>,

        #[structopt(long, help = "Print the values as a JSON array")]
        json: bool,

        #[structopt(name = "file", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,

        #[structopt(
            name = "types",
            parse(try_from_str = parse_type),
            help = "Types to read, in order (uint16, int32, float64, string, ...)"
        )]
        types: Vec<LogicalType>,
    },

    #[structopt(
        name = "w",
        visible_alias = "write",
        about = "Write a sequence of typed values to a new archive"
    )]
    Write {
        #[structopt(
            short,
            long,
            parse(try_from_str = parse_encoding),
            hide_default_value = true,
            default_value = "utf-16le",
            help = "Encoding used for strings [default: utf-16le]"
        )]
        encoding: TextEncoding,

        #[structopt(name = "file", parse(from_os_str), help = "Path to the archive")]
        path: PathBuf,

        #[structopt(
            name = "values",
            parse(try_from_str = parse_assignment),
            help = "Values to write, as TYPE=VALUE (e.g. uint16=7 string=hello)"
        )]
        values: Vec<Assignment>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "carchive",
    about = "Inspect and produce MFC CArchive primitive streams.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "carchive (d|w) [FLAGS|OPTIONS] <file> [types|values]..."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    match opts.cmd {
        Commands::Dump {
            encoding,
            json,
            path,
            types,
        } => {
            let encoding = match encoding {
                Some(label) => locale::code_page(&label)?,
                None => locale::preferred_encoding(),
            };
            commands::dump::run(path, types, encoding, json)?
        }
        Commands::Write {
            encoding,
            path,
            values,
        } => commands::write::run(path, values, encoding)?,
    };

    Ok(())
}
