//! Binary entry point for the `lzo` command-line tool.
//!
//! Handles post-parse validation, automatic output filename resolution, and
//! operation dispatch (compress, decompress, test, list).
//!
//! # Control flow
//!
//! 1. [`parse_args`] inspects `argv[0]` for an alias, parses all flags and
//!    builds a [`ParsedArgs`] value.
//! 2. [`run`] dispatches to the appropriate I/O operation and returns an
//!    exit code.

use std::io::IsTerminal;

use lzo::cli::args::{parse_args, ParsedArgs};
use lzo::cli::constants::{IO_MT, LZO_EXTENSION};
use lzo::cli::op_mode::{determine_op_mode, OpMode};
use lzo::config::MULTITHREAD;
use lzo::{displaylevel, end_process};
use lzo::io::prefs::notification_level;
use lzo::io::{
    compress_filename, compress_multiple_filenames, decompress_filename,
    decompress_multiple_filenames, display_compressed_files_info, set_notification_level,
    NUL_MARK, STDIN_MARK, STDOUT_MARK,
};

fn run(args: ParsedArgs) -> i32 {
    let mut prefs = args.prefs;
    let mut op_mode = args.op_mode;
    let force_stdout = args.force_stdout;
    let mut multiple_inputs = args.multiple_inputs;
    let mut output_filename = args.output_filename;
    let mut in_file_names = args.in_file_names;

    set_notification_level(args.display_level);

    displaylevel!(
        3,
        "*** {} v{} {}-bit {} ***\n",
        lzo::cli::constants::COMPRESSOR_NAME,
        lzo::LZO_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        IO_MT
    );

    if !MULTITHREAD && args.nb_workers > 1 {
        displaylevel!(2, "warning: this executable doesn't support multithreading \n");
    } else if prefs.nb_workers > 1 {
        displaylevel!(3, "Using {} threads for compression \n", prefs.nb_workers);
    }

    if op_mode == OpMode::Test {
        prefs.set_test_mode(true);
        output_filename = Some(NUL_MARK.to_owned());
        op_mode = OpMode::Decompress;
    }

    let input_filename = if multiple_inputs {
        in_file_names.first().cloned()
    } else {
        args.input_filename
    }
    .unwrap_or_else(|| STDIN_MARK.to_owned());

    if op_mode == OpMode::List {
        if !multiple_inputs {
            in_file_names.push(input_filename.clone());
        }
        if in_file_names.iter().any(|f| f == STDIN_MARK) {
            displaylevel!(1, "lzo: --list requires file names \n");
            return 1;
        }
        let srcs: Vec<&str> = in_file_names.iter().map(String::as_str).collect();
        return match display_compressed_files_info(&srcs) {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    if input_filename == STDIN_MARK && std::io::stdin().is_terminal() {
        displaylevel!(1, "lzo: refusing to read from a console\n");
        return 1;
    }

    if input_filename == STDIN_MARK && output_filename.is_none() {
        output_filename = Some(STDOUT_MARK.to_owned());
    }

    if op_mode == OpMode::Auto {
        op_mode = determine_op_mode(&input_filename);
    }

    if output_filename.is_none() && !multiple_inputs {
        if op_mode == OpMode::Compress {
            let out = format!("{}{}", input_filename, LZO_EXTENSION);
            displaylevel!(3, "Compressed filename will be : {} \n", out);
            output_filename = Some(out);
        } else if let Some(base) = input_filename.strip_suffix(LZO_EXTENSION) {
            displaylevel!(3, "Decoding file {} \n", base);
            output_filename = Some(base.to_owned());
        } else {
            displaylevel!(
                1,
                "lzo: {}: unknown suffix -- use -o to name the output \n",
                input_filename
            );
            return 1;
        }
    }

    if output_filename.as_deref() == Some(STDOUT_MARK)
        && op_mode == OpMode::Compress
        && std::io::stdout().is_terminal()
        && !force_stdout
    {
        displaylevel!(1, "lzo: refusing to write compressed data to a console \n");
        return 1;
    }

    // Keep stdout payloads clean of result lines.
    if output_filename.as_deref() == Some(STDOUT_MARK) && notification_level() == 2 {
        set_notification_level(1);
    }
    if in_file_names.is_empty() {
        multiple_inputs = false;
    }

    if op_mode == OpMode::Decompress {
        if multiple_inputs {
            let suffix = match output_filename.as_deref() {
                Some(STDOUT_MARK) => STDOUT_MARK,
                Some(NUL_MARK) => NUL_MARK,
                _ => LZO_EXTENSION,
            };
            let srcs: Vec<&str> = in_file_names.iter().map(String::as_str).collect();
            match decompress_multiple_filenames(&srcs, suffix, &prefs) {
                Ok(()) => 0,
                Err(_) => 1,
            }
        } else {
            let dst = output_filename.as_deref().unwrap_or(STDOUT_MARK);
            match decompress_filename(&input_filename, dst, &prefs) {
                Ok(_) => 0,
                Err(_) => 1,
            }
        }
    } else if multiple_inputs {
        let suffix = if output_filename.as_deref() == Some(STDOUT_MARK) {
            STDOUT_MARK
        } else {
            LZO_EXTENSION
        };
        let srcs: Vec<&str> = in_file_names.iter().map(String::as_str).collect();
        match compress_multiple_filenames(&srcs, suffix, &prefs) {
            Ok(0) => 0,
            _ => 1,
        }
    } else {
        let dst = output_filename.as_deref().unwrap_or(STDOUT_MARK);
        match compress_filename(&input_filename, dst, &prefs) {
            Ok(_) => 0,
            Err(_) => 1,
        }
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => end_process!(1, "{}", e),
    };
    std::process::exit(run(args));
}
