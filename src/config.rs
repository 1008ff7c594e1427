// config.rs: Compile-time configuration constants.
//
// Runtime overrides: the LZO_NBWORKERS environment variable (worker count)
// and the command line (-B block size, -T workers, -v/-q verbosity).

// Uncompressed bytes per container block.
// Matches lzop's default block size. Can be overridden with -B#.
pub const BLOCK_SIZE_DEFAULT: usize = 256 * 1024;

// Whether container blocks are compressed on the rayon pool.
// Tied to the `multithread` Cargo feature (enabled by default).
pub const MULTITHREAD: bool = cfg!(feature = "multithread");

// Default number of compression workers. 0 = one per logical core.
// Can be overridden by the LZO_NBWORKERS environment variable,
// or by the -T# command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Maximum number of compression workers selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Environment variable consulted for the default worker count.
pub const NBWORKERS_ENV: &str = "LZO_NBWORKERS";

// Notification level at startup: 2 = results and warnings.
pub const DISPLAY_LEVEL_DEFAULT: i32 = 2;

// Upper bound on uncompressed bytes held in memory by one compression
// batch. The worker count is reduced so that `block_size * workers` stays
// below it.
pub const BATCH_MEMORY_MAX: usize = 1 << 30;

// Largest input or output of a bare (--raw) stream. Bare streams are
// processed in memory and carry no length field.
pub const RAW_STREAM_MAX: usize = 1 << 30;
