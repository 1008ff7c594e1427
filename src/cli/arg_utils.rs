// arg_utils.rs: small parsing helpers shared by the argument layer.

/// Returns the last path component of `path`, handling both `/` and `\` separators.
pub fn last_name_from_path(path: &str) -> &str {
    let after_slash = match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    };
    match after_slash.rfind('\\') {
        Some(pos) => &after_slash[pos + 1..],
        None => after_slash,
    }
}

/// Returns `true` if `exe_path` is `name`, optionally followed by an
/// extension (`unlzo.exe` matches `unlzo`).
pub fn exe_name_match(exe_path: &str, name: &str) -> bool {
    match exe_path.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Parses an unsigned integer from the start of `s`, optionally followed by
/// a binary size suffix. Returns `None` if `s` has no leading digit or the
/// value overflows `usize`, otherwise `Some((value, remainder))`.
///
/// Recognised suffixes (case-sensitive):
///   `K` / `KB` / `KiB`  → × 1 024
///   `M` / `MB` / `MiB`  → × 1 048 576
pub fn read_size_from_str(s: &str) -> Option<(usize, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut value: usize = s[..digits].parse().ok()?;
    let mut rest = &s[digits..];

    let shift = match rest.as_bytes().first() {
        Some(b'K') => 10,
        Some(b'M') => 20,
        _ => 0,
    };
    if shift != 0 {
        value = value.checked_mul(1usize << shift)?;
        rest = &rest[1..];
        rest = rest.strip_prefix('i').unwrap_or(rest);
        rest = rest.strip_prefix('B').unwrap_or(rest);
    }
    Some((value, rest))
}

/// `clap` value parser for sizes such as `256K` or `4MiB`.
pub fn parse_size(s: &str) -> Result<usize, String> {
    match read_size_from_str(s) {
        Some((v, "")) => Ok(v),
        Some((_, rest)) => Err(format!("unexpected characters after size: {:?}", rest)),
        None => Err(format!("invalid size: {:?}", s)),
    }
}
