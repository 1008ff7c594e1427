// prefs.rs: file-operation preferences, notification level, and timing.
//
// - The notification level is a process-wide `AtomicI32` read by the
//   `display!` / `displaylevel!` macros and by `display_level()`.
// - `Prefs` is a plain value type passed by reference to every file
//   operation; nothing else is global.

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use crate::config::{BLOCK_SIZE_DEFAULT, DISPLAY_LEVEL_DEFAULT, NB_WORKERS_MAX};
use crate::frame::FramePrefs;

pub const MB: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Notification level
// ---------------------------------------------------------------------------

/// Global notification level. 0 = silent, 1 = errors only, 2 = results +
/// warnings, 3 = progress, 4+ = verbose.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(DISPLAY_LEVEL_DEFAULT);

/// Refresh interval for progress updates (200 ms).
pub const REFRESH_RATE_NS: u64 = 200_000_000;

static LAST_UPDATE_NS: AtomicU64 = AtomicU64::new(0);

pub fn set_notification_level(level: i32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

pub fn notification_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Write `msg` to stderr if the current notification level is ≥ `level`.
/// Flushes stderr when level ≥ 4.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if notification_level() >= level {
        eprint!("{}", msg);
        if notification_level() >= 4 {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}

fn process_clock() -> &'static Instant {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now)
}

/// Like [`display_level`], but rate-limited to one message per
/// [`REFRESH_RATE_NS`] unless the level is verbose.
pub fn display_update(level: i32, msg: &str) {
    if notification_level() < level {
        return;
    }
    let now = process_clock().elapsed().as_nanos() as u64;
    let last = LAST_UPDATE_NS.load(Ordering::Relaxed);
    if now.saturating_sub(last) >= REFRESH_RATE_NS || notification_level() >= 4 {
        LAST_UPDATE_NS.store(now, Ordering::Relaxed);
        display_level(level, msg);
    }
}

/// Prints throughput for a finished operation at level 3.
pub fn final_time_display(start: Instant, processed: u64) {
    let secs = start.elapsed().as_secs_f64();
    let mib_per_sec = if secs > 0.0 {
        processed as f64 / secs / MB as f64
    } else {
        0.0
    };
    display_level(
        3,
        &format!("Done in {:.2} s ==> {:.2} MiB/s \n", secs, mib_per_sec),
    );
}

// ---------------------------------------------------------------------------
// Worker count
// ---------------------------------------------------------------------------

/// One worker per logical core, capped at [`NB_WORKERS_MAX`].
pub fn default_nb_workers() -> usize {
    num_cpus::get().clamp(1, NB_WORKERS_MAX)
}

// ---------------------------------------------------------------------------
// Prefs
// ---------------------------------------------------------------------------

/// Options shared by every file operation.
#[derive(Debug, Clone)]
pub struct Prefs {
    /// Replace existing destination files.
    pub overwrite: bool,
    /// Delete the source after a successful operation.
    pub remove_src_file: bool,
    /// Uncompressed bytes per container block.
    pub block_size: usize,
    /// Compression workers; 0 means one per core.
    pub nb_workers: usize,
    /// Store an Adler-32 of each compressed payload too.
    pub checksum_compressed: bool,
    /// Decode and verify only; discard output.
    pub test_mode: bool,
    /// Restore the stored mtime and mode on decompressed files.
    pub restore_metadata: bool,
    /// Read and write bare LZO1X streams instead of containers.
    pub raw: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            overwrite: false,
            remove_src_file: false,
            block_size: BLOCK_SIZE_DEFAULT,
            nb_workers: 1,
            checksum_compressed: false,
            test_mode: false,
            restore_metadata: true,
            raw: false,
        }
    }
}

impl Prefs {
    pub fn set_overwrite(&mut self, yes: bool) -> &mut Self {
        self.overwrite = yes;
        self
    }

    pub fn set_remove_src_file(&mut self, yes: bool) -> &mut Self {
        self.remove_src_file = yes;
        self
    }

    pub fn set_block_size(&mut self, size: usize) -> &mut Self {
        self.block_size = size;
        self
    }

    /// `0` selects [`default_nb_workers`]; larger values are capped.
    pub fn set_nb_workers(&mut self, n: usize) -> &mut Self {
        self.nb_workers = if n == 0 {
            default_nb_workers()
        } else {
            n.min(NB_WORKERS_MAX)
        };
        self
    }

    pub fn set_checksum_compressed(&mut self, yes: bool) -> &mut Self {
        self.checksum_compressed = yes;
        self
    }

    pub fn set_test_mode(&mut self, yes: bool) -> &mut Self {
        self.test_mode = yes;
        self
    }

    pub fn set_restore_metadata(&mut self, yes: bool) -> &mut Self {
        self.restore_metadata = yes;
        self
    }

    pub fn set_raw(&mut self, yes: bool) -> &mut Self {
        self.raw = yes;
        self
    }

    /// Container settings for one input; name, mode and mtime are filled in
    /// by the caller from the source file.
    pub fn frame_prefs(&self) -> FramePrefs {
        FramePrefs {
            block_size: self.block_size,
            checksum_compressed: self.checksum_compressed,
            nb_workers: self.nb_workers.max(1),
            ..FramePrefs::default()
        }
    }
}
