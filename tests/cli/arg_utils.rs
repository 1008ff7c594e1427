use lzo::cli::arg_utils::{exe_name_match, last_name_from_path, parse_size, read_size_from_str};

#[test]
fn windows_style_exe_path() {
    let name = last_name_from_path(r"C:\tools\bin\lzocat.exe");
    assert_eq!(name, "lzocat.exe");
    assert!(exe_name_match(name, "lzocat"));
    assert!(!exe_name_match(name, "lzo"));
}

#[test]
fn prefix_of_longer_name_does_not_match() {
    assert!(!exe_name_match("unlzop", "unlzo"));
    assert!(exe_name_match("unlzo", "unlzo"));
}

#[test]
fn size_remainder_is_returned() {
    assert_eq!(read_size_from_str("12Kx"), Some((12 * 1024, "x")));
    assert_eq!(read_size_from_str("3MiB,"), Some((3 << 20, ",")));
    assert_eq!(read_size_from_str("K"), None);
}

#[test]
fn parse_size_messages() {
    assert_eq!(parse_size("1MB"), Ok(1 << 20));
    assert!(parse_size("1G").unwrap_err().contains("unexpected characters"));
    assert!(parse_size("abc").unwrap_err().contains("invalid size"));
}
