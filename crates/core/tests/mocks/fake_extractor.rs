//! A shell script standing in for yt-dlp that prints a fixed info dictionary.

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

pub struct FakeExtractor {
    path: PathBuf,
}

impl FakeExtractor {
    /// Ignores its arguments and writes `info_json` to stdout.
    pub fn printing(name: &str, info_json: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "vibecheck-fake-yt-dlp-{}-{name}",
            std::process::id()
        ));
        fs::write(&path, format!("#!/bin/sh\ncat <<'EOF'\n{info_json}\nEOF\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FakeExtractor {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
