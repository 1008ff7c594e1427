//! Binary-alias detection.
//!
//! When installed under several names (`lzocat`, `unlzo`) via hard or
//! symbolic links, the program picks its default mode from `argv[0]`
//! before any flag parsing takes place. Explicit flags override these.

use crate::cli::arg_utils::{exe_name_match, last_name_from_path};
use crate::cli::constants::{LZOCAT, UNLZO};
use crate::cli::op_mode::{init_nb_workers, OpMode};

/// Defaults derived from the binary name and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliInit {
    pub op_mode: OpMode,
    /// Write every result to stdout (`lzocat`).
    pub force_stdout: bool,
    /// Treat every positional argument as an input (`lzocat`).
    pub multiple_inputs: bool,
    /// Worker count from `LZO_NBWORKERS` (0 = auto).
    pub nb_workers: usize,
    /// Notification level imposed by the alias.
    pub display_level_override: Option<i32>,
}

/// | Binary name | Effect                                              |
/// |-------------|-----------------------------------------------------|
/// | `lzocat`    | Decompress, force stdout, multiple inputs, quiet    |
/// | `unlzo`     | Decompress                                          |
///
/// `argv0` may be a full path.
pub fn detect_alias(argv0: &str) -> CliInit {
    let exe_name = last_name_from_path(argv0);
    let mut init = CliInit {
        op_mode: OpMode::Auto,
        force_stdout: false,
        multiple_inputs: false,
        nb_workers: init_nb_workers(),
        display_level_override: None,
    };

    if exe_name_match(exe_name, LZOCAT) {
        init.op_mode = OpMode::Decompress;
        init.force_stdout = true;
        init.multiple_inputs = true;
        init.display_level_override = Some(1);
    } else if exe_name_match(exe_name, UNLZO) {
        init.op_mode = OpMode::Decompress;
    }
    init
}
