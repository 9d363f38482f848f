//! Test helpers for staging drawn region files.

use camino::{Utf8Path, Utf8PathBuf};
use earthwalker_core::{GeoJsonGeometry, Region};
use tempfile::TempDir;

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

pub(super) fn write_region(path: &Utf8Path, region: &Region) {
    let geometry = GeoJsonGeometry::from_region(region);
    let payload = serde_json::to_vec(&geometry).expect("serialise geometry");
    write_utf8(path, &payload);
}
