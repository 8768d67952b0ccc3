//! Crash-safe file replacement: write a sibling temp file, sync, then rename.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use rand::TryRngCore;

const MAX_TEMP_ATTEMPTS: usize = 5;

/// Replace `path` with `data` without ever exposing a partially written file.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path);
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path has no file name"))?;

    let mut last_err = None;
    for _ in 0..MAX_TEMP_ATTEMPTS {
        let mut bytes = [0u8; 6];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| io::Error::other(format!("failed to generate temporary file suffix: {err}")))?;
        let suffix: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let tmp_path = dir.join(format!("{}.tmp-{}", file_name.to_string_lossy(), suffix));

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&tmp_path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(err) => return Err(err),
        };

        let written = file.write_all(data).and_then(|_| file.sync_all());
        drop(file);
        if let Err(err) = written.and_then(|_| replace_file(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
        return sync_parent_dir(dir);
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "failed to create temporary file for {}: {}",
            path.display(),
            last_err
                .map(|err| err.to_string())
                .unwrap_or_else(|| "unknown error".into())
        ),
    ))
}

/// Directory holding `path`; a bare file name lives in the current directory.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn replace_file(temp_path: &Path, path: &Path) -> io::Result<()> {
    match fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            #[cfg(target_os = "windows")]
            if err.kind() == io::ErrorKind::AlreadyExists
                || err.kind() == io::ErrorKind::PermissionDenied
            {
                if let Err(inner) = fs::remove_file(path) {
                    if inner.kind() != io::ErrorKind::NotFound {
                        return Err(inner);
                    }
                }
                return fs::rename(temp_path, path);
            }
            Err(err)
        }
    }
}

fn sync_parent_dir(dir: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        fs::File::open(dir)?.sync_all()?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}
