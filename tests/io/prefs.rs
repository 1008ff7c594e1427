use lzo::config::{BLOCK_SIZE_DEFAULT, NB_WORKERS_MAX};
use lzo::io::{default_nb_workers, Prefs};

#[test]
fn defaults() {
    let p = Prefs::default();
    assert!(!p.overwrite);
    assert!(!p.remove_src_file);
    assert!(p.restore_metadata);
    assert!(!p.raw);
    assert_eq!(p.block_size, BLOCK_SIZE_DEFAULT);
    assert_eq!(p.nb_workers, 1);
}

#[test]
fn setters_chain() {
    let mut p = Prefs::default();
    p.set_overwrite(true)
        .set_block_size(4096)
        .set_checksum_compressed(true)
        .set_test_mode(true);
    assert!(p.overwrite && p.checksum_compressed && p.test_mode);
    assert_eq!(p.block_size, 4096);
}

#[test]
fn zero_workers_means_auto() {
    let mut p = Prefs::default();
    p.set_nb_workers(0);
    assert_eq!(p.nb_workers, default_nb_workers());
    assert!(p.nb_workers >= 1);
}

#[test]
fn worker_count_is_capped() {
    let mut p = Prefs::default();
    p.set_nb_workers(NB_WORKERS_MAX + 50);
    assert_eq!(p.nb_workers, NB_WORKERS_MAX);
}

#[test]
fn frame_prefs_carry_block_settings() {
    let mut p = Prefs::default();
    p.set_block_size(1 << 16).set_checksum_compressed(true).set_nb_workers(3);
    let fp = p.frame_prefs();
    assert_eq!(fp.block_size, 1 << 16);
    assert!(fp.checksum_compressed);
    assert_eq!(fp.nb_workers, 3);
    assert!(fp.name.is_empty());
    assert!(!fp.from_stdin);
}
