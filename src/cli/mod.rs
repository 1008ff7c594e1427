//! Command-line interface for the `lzo` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the display macros. |
//! | [`arg_utils`] | Path basename, executable-name matching, size parsing. |
//! | [`op_mode`]   | `OpMode`, extension-based mode detection, `LZO_NBWORKERS`. |
//! | [`init`]      | `CliInit`: defaults picked from the binary name (`unlzo`, `lzocat`). |
//! | [`args`]      | `clap` surface and `ParsedArgs`, the final runtime options. |
//!
//! Typical call sequence: `detect_alias` → `Cli::parse` → `resolve` → dispatch to the I/O layer.

pub mod constants;
pub mod arg_utils;
pub mod op_mode;
pub mod init;
pub mod args;
