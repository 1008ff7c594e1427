use lzo::cli::op_mode::{determine_op_mode, init_nb_workers_from, OpMode};
use lzo::config::NB_WORKERS_DEFAULT;

#[test]
fn mode_follows_extension() {
    assert_eq!(determine_op_mode("dir/archive.tar.lzo"), OpMode::Decompress);
    assert_eq!(determine_op_mode("archive.lzop"), OpMode::Compress);
    assert_eq!(determine_op_mode("lzo"), OpMode::Compress);
}

#[test]
fn worker_env_value() {
    assert_eq!(init_nb_workers_from(Some("8")), 8);
    assert_eq!(init_nb_workers_from(Some("8 cores")), NB_WORKERS_DEFAULT);
    assert_eq!(init_nb_workers_from(None), NB_WORKERS_DEFAULT);
}
