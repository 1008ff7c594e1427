//! Operation mode selection and startup defaults for the CLI.
//!
//! This module provides:
//! - [`OpMode`]: what the CLI should do (compress, decompress, test, list).
//! - [`determine_op_mode`]: infers the intended mode from a filename's extension.
//! - [`init_nb_workers`]: reads the worker count default from the environment.

use crate::cli::arg_utils::read_size_from_str;
use crate::cli::constants::LZO_EXTENSION;
use crate::config::{NBWORKERS_ENV, NB_WORKERS_DEFAULT};
use crate::displaylevel;

/// What the CLI should do with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Decompress if the input ends in `.lzo`, compress otherwise.
    Auto,
    Compress,
    Decompress,
    /// Decode and verify without writing output.
    Test,
    /// Print container metadata.
    List,
}

/// Infer the operation mode from `filename`'s extension.
pub fn determine_op_mode(filename: &str) -> OpMode {
    if filename.ends_with(LZO_EXTENSION) {
        OpMode::Decompress
    } else {
        OpMode::Compress
    }
}

/// Worker count from the `LZO_NBWORKERS` environment variable, or
/// [`NB_WORKERS_DEFAULT`] (`0`, auto) when unset or not numeric.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var(NBWORKERS_ENV).ok().as_deref())
}

/// Parsing half of [`init_nb_workers`], separated so tests need not touch
/// the process environment.
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    if let Some(env) = env_val {
        if let Some((val, "")) = read_size_from_str(env) {
            return val;
        }
        displaylevel!(
            2,
            "Ignore environment variable setting {}={}: not a valid unsigned value \n",
            NBWORKERS_ENV,
            env
        );
    }
    NB_WORKERS_DEFAULT
}
