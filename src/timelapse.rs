//! Screenshot timelapses and page-load recordings.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Public path prefix timelapses are served from.
const TIMELAPSE_ROUTE: &str = "/timelapses";
/// Public path prefix page-load recordings are served from.
const LOADING_ROUTE: &str = "/loading";

/// Finds every `<stub>.png` screenshot below `root`, in path order.
pub fn find_frames(root: &Path, stub: &str) -> Result<Vec<PathBuf>> {
    let root_str = root
        .to_str()
        .with_context(|| format!("non UTF-8 path {}", root.display()))?;
    let pattern = format!(
        "{}/**/{}.png",
        glob::Pattern::escape(root_str),
        glob::Pattern::escape(stub)
    );

    let mut frames: Vec<PathBuf> = glob::glob(&pattern)?.flatten().collect();
    frames.sort();
    Ok(frames)
}

/// Stitches a site's screenshots into a looping GIF with GraphicsMagick.
///
/// Returns the public link to the GIF, or `None` when there are no frames.
#[tracing::instrument(skip(root, output_dir))]
pub fn generate_timelapse(root: &Path, output_dir: &Path, stub: &str) -> Result<Option<String>> {
    let frames = find_frames(root, stub)?;
    if frames.is_empty() {
        debug!("No screenshots for timelapse");
        return Ok(None);
    }

    let output = output_dir.join(format!("{stub}.gif"));
    let status = Command::new("gm")
        .args(["convert", "-loop", "1", "-delay", "10"])
        .args(&frames)
        .arg(&output)
        .status()
        .context("failed to run gm")?;

    if !status.success() {
        bail!("gm convert exited with {status}");
    }

    info!(frames = frames.len(), output = %output.display(), "Timelapse generated");
    Ok(Some(format!("{TIMELAPSE_ROUTE}/{stub}.gif")))
}

/// Public link to the page-load recording for `clean_url`, if one was captured.
pub fn loading_video_link(loading_dir: &Path, clean_url: &str) -> Option<String> {
    let file = format!("{clean_url}.mp4");
    loading_dir
        .join(&file)
        .exists()
        .then(|| format!("{LOADING_ROUTE}/{file}"))
}
