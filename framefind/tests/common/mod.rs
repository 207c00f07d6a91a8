use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// Stages an executable shell script standing in for ffmpeg or ffprobe, so
/// the tests run without any media tooling installed.
pub fn stub_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("can write the stub");

    let mut perms = fs::metadata(&path).expect("the stub exists").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("can make the stub executable");

    path
}
