use lzo::cli::args::{parse_args_from, resolve, Cli};
use lzo::cli::init::detect_alias;
use lzo::cli::op_mode::OpMode;
use lzo::io::STDOUT_MARK;

#[test]
fn unlzo_alias_with_explicit_test_flag() {
    let a = parse_args_from(["/usr/bin/unlzo", "-t", "a.lzo"]).unwrap();
    assert_eq!(a.op_mode, OpMode::Test);
    assert_eq!(a.input_filename.as_deref(), Some("a.lzo"));
}

#[test]
fn lzocat_quiet_flag_wins_over_alias_level() {
    let a = parse_args_from(["lzocat", "-q", "a.lzo"]).unwrap();
    assert_eq!(a.display_level, 1);
    let a = parse_args_from(["lzocat", "-v", "a.lzo"]).unwrap();
    assert_eq!(a.display_level, 3);
}

#[test]
fn container_flags_reach_prefs() {
    let a = parse_args_from([
        "lzo",
        "--checksum-compressed",
        "--no-restore",
        "--raw",
        "-f",
        "in",
    ])
    .unwrap();
    assert!(a.prefs.checksum_compressed);
    assert!(!a.prefs.restore_metadata);
    assert!(a.prefs.raw);
    assert!(a.prefs.overwrite);
}

#[test]
fn resolve_without_clap() {
    let cli = Cli {
        decompress: true,
        stdout: true,
        files: vec!["x.lzo".to_owned()],
        ..Cli::default()
    };
    let a = resolve(detect_alias("lzo"), cli).unwrap();
    assert_eq!(a.op_mode, OpMode::Decompress);
    assert_eq!(a.output_filename.as_deref(), Some(STDOUT_MARK));
}

#[test]
fn unknown_flag_is_bad_usage() {
    let e = parse_args_from(["lzo", "--frobnicate"]).unwrap_err();
    assert!(e.to_string().starts_with("bad usage"));
}

#[test]
fn uncompress_alias_flag() {
    let a = parse_args_from(["lzo", "--uncompress", "f.lzo"]).unwrap();
    assert_eq!(a.op_mode, OpMode::Decompress);
}
