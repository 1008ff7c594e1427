//! Command-line argument parsing for the `lzo` / `unlzo` / `lzocat` family.
//!
//! [`Cli`] is the raw `clap` surface. [`resolve`] layers it over the
//! alias-derived [`CliInit`] and produces a [`ParsedArgs`] holding the final
//! runtime options. [`parse_args`] (process arguments, exits on `--help`)
//! and [`parse_args_from`] (explicit slice, for tests) wrap both steps.
//!
//! Inconsistent options return an `Err` whose message begins with
//! `"bad usage: "`.

use anyhow::{anyhow, bail};
use clap::{ArgAction, Parser};

use crate::cli::arg_utils::parse_size;
use crate::cli::init::{detect_alias, CliInit};
use crate::cli::op_mode::OpMode;
use crate::config::DISPLAY_LEVEL_DEFAULT;
use crate::frame::MAX_BLOCK_SIZE;
use crate::io::file_io::STDOUT_MARK;
use crate::io::prefs::Prefs;

/// Raw command line.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "lzo",
    version,
    about = "Fast LZO1X compression with lzop-compatible files"
)]
pub struct Cli {
    /// Force compression
    #[arg(short = 'z', long)]
    pub compress: bool,
    /// Decompress
    #[arg(short = 'd', long, visible_alias = "uncompress")]
    pub decompress: bool,
    /// Test the integrity of compressed files
    #[arg(short = 't', long)]
    pub test: bool,
    /// List information about compressed files
    #[arg(short = 'l', long)]
    pub list: bool,
    /// Write to standard output
    #[arg(short = 'c', long = "stdout", visible_alias = "to-stdout")]
    pub stdout: bool,
    /// Write output to FILE
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,
    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,
    /// Keep input files (default)
    #[arg(short = 'k', long, overrides_with = "rm")]
    pub keep: bool,
    /// Remove input files after success
    #[arg(short = 'U', long = "rm", overrides_with = "keep")]
    pub rm: bool,
    /// Treat every FILE as an input
    #[arg(short = 'm', long)]
    pub multiple: bool,
    /// More messages (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Fewer messages (repeatable)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,
    /// Uncompressed bytes per block (e.g. 256K, 4M)
    #[arg(short = 'B', long, value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<usize>,
    /// Compression workers (0 = one per core)
    #[arg(short = 'T', long, value_name = "N")]
    pub threads: Option<usize>,
    /// Also checksum compressed block data
    #[arg(long)]
    pub checksum_compressed: bool,
    /// Read and write bare LZO1X streams without a container
    #[arg(long)]
    pub raw: bool,
    /// Do not restore file name, mode and time on decompression
    #[arg(long = "no-restore")]
    pub no_restore: bool,
    /// Input files (and, without -m, an optional output file)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

/// Final runtime options consumed by the dispatcher in `main.rs`.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub prefs: Prefs,
    pub op_mode: OpMode,
    /// Output explicitly sent to stdout (`-c` or `lzocat`).
    pub force_stdout: bool,
    pub multiple_inputs: bool,
    pub input_filename: Option<String>,
    pub output_filename: Option<String>,
    pub in_file_names: Vec<String>,
    /// Notification level after `-v` / `-q` and alias overrides.
    pub display_level: i32,
    /// Requested worker count before auto-detection (0 = auto).
    pub nb_workers: usize,
}

fn select_mode(init: &CliInit, cli: &Cli) -> anyhow::Result<OpMode> {
    let chosen: Vec<OpMode> = [
        (cli.compress, OpMode::Compress),
        (cli.decompress, OpMode::Decompress),
        (cli.test, OpMode::Test),
        (cli.list, OpMode::List),
    ]
    .into_iter()
    .filter_map(|(set, mode)| set.then_some(mode))
    .collect();

    match chosen.as_slice() {
        [] => Ok(init.op_mode),
        [mode] => Ok(*mode),
        _ => bail!("bad usage: only one of -z, -d, -t, -l may be given"),
    }
}

/// Combines alias defaults with the parsed command line.
pub fn resolve(init: CliInit, cli: Cli) -> anyhow::Result<ParsedArgs> {
    let op_mode = select_mode(&init, &cli)?;

    let display_level = if cli.verbose == 0 && cli.quiet == 0 {
        init.display_level_override.unwrap_or(DISPLAY_LEVEL_DEFAULT)
    } else {
        (DISPLAY_LEVEL_DEFAULT + cli.verbose as i32 - cli.quiet as i32).max(0)
    };

    let mut prefs = Prefs::default();
    prefs
        .set_overwrite(cli.force || init.force_stdout)
        .set_remove_src_file(cli.rm)
        .set_checksum_compressed(cli.checksum_compressed)
        .set_raw(cli.raw)
        .set_restore_metadata(!cli.no_restore);

    if let Some(size) = cli.block_size {
        if size == 0 || size > MAX_BLOCK_SIZE {
            bail!(
                "bad usage: --block-size must be between 1 and {} bytes",
                MAX_BLOCK_SIZE
            );
        }
        prefs.set_block_size(size);
    }

    let nb_workers = cli.threads.unwrap_or(init.nb_workers);
    prefs.set_nb_workers(nb_workers);

    let force_stdout = cli.stdout || init.force_stdout;
    if force_stdout && cli.output.is_some() {
        bail!("bad usage: -c and -o cannot be combined");
    }

    let multiple_inputs = cli.multiple
        || init.multiple_inputs
        || matches!(op_mode, OpMode::List | OpMode::Test) && cli.files.len() > 1;

    let mut files = cli.files.into_iter();
    let (input_filename, mut output_filename, in_file_names) = if multiple_inputs {
        (None, None, files.collect::<Vec<_>>())
    } else {
        let input = files.next();
        let output = files.next();
        if let Some(extra) = files.next() {
            return Err(anyhow!(
                "bad usage: unexpected argument {:?} (use -m for multiple inputs)",
                extra
            ));
        }
        (input, output, Vec::new())
    };

    if cli.output.is_some() {
        if output_filename.is_some() {
            bail!("bad usage: output file given twice");
        }
        output_filename = cli.output;
    }
    if force_stdout {
        if output_filename.is_some() {
            bail!("bad usage: -c cannot be combined with an output file");
        }
        output_filename = Some(STDOUT_MARK.to_owned());
    }

    Ok(ParsedArgs {
        prefs,
        op_mode,
        force_stdout,
        multiple_inputs,
        input_filename,
        output_filename,
        in_file_names,
        display_level,
        nb_workers,
    })
}

/// Parses the process arguments. `--help`, `--version` and clap usage
/// errors print their message and exit here.
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let argv0 = std::env::args().next().unwrap_or_else(|| "lzo".to_owned());
    let init = detect_alias(&argv0);
    resolve(init, Cli::parse())
}

/// Parses an explicit argument list; `args[0]` is the program name.
pub fn parse_args_from<I, T>(args: I) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let argv0 = args.first().cloned().unwrap_or_else(|| "lzo".to_owned());
    let init = detect_alias(&argv0);
    let cli = Cli::try_parse_from(&args).map_err(|e| anyhow!("bad usage: {}", e))?;
    resolve(init, cli)
}
