use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, warn};

use crate::error::{DiskError, Result};

/// Result of rendering a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The image was produced.
    Image(PathBuf),
    /// Graphviz is not installed; only the DOT source was written.
    SourceOnly(PathBuf),
}

pub fn write_dot(source: &str, dot_path: &Path) -> Result<()> {
    if let Some(parent) = dot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(dot_path, source)?;
    debug!("wrote {}", dot_path.display());
    Ok(())
}

/// Runs `<graphviz> -Tpng <dot_path> -o <image_path>`.
pub fn render_png(graphviz: &str, dot_path: &Path, image_path: &Path) -> Result<Rendered> {
    let output = Command::new(graphviz)
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(image_path)
        .stdin(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => Ok(Rendered::Image(image_path.to_path_buf())),
        Ok(out) => Err(DiskError::Report(format!(
            "{} exited with {}: {}",
            graphviz,
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("graphviz '{}' not found, keeping DOT source only", graphviz);
            Ok(Rendered::SourceOnly(dot_path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Opens `path` with the platform's default viewer without waiting for it.
pub fn open_report(path: &Path) -> Result<()> {
    let mut cmd = opener(path);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd.spawn()
        .map_err(|e| DiskError::Report(format!("cannot open {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
