// cli/constants.rs: program identity strings and display macros.

// ── String / identity constants ───────────────────────────────────────────────
pub const COMPRESSOR_NAME: &str = "lzo";
pub const LZO_EXTENSION: &str = ".lzo";
pub const LZOCAT: &str = "lzocat";
pub const UNLZO: &str = "unlzo";

// ── Threading-mode label ───────────────────────────────────────────────────────
#[cfg(feature = "multithread")]
pub const IO_MT: &str = "multithread";
#[cfg(not(feature = "multithread"))]
pub const IO_MT: &str = "single-thread";

// ── Display helpers ────────────────────────────────────────────────────────────
//
// Both read the notification level held in `io::prefs`, so the CLI and the
// I/O layer agree on what gets printed.

/// Print to stderr when the notification level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::io::prefs::notification_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Print a diagnostic at level 1 and exit with `error`.
///
/// Usage: `end_process!(exit_code, "message {}", arg)`
#[macro_export]
macro_rules! end_process {
    ($error:expr, $($arg:tt)*) => {{
        if $crate::io::prefs::notification_level() >= 1 {
            eprint!("{}: ", $crate::cli::constants::COMPRESSOR_NAME);
            eprint!($($arg)*);
            eprint!("\n");
        }
        std::process::exit($error as i32);
    }};
}
