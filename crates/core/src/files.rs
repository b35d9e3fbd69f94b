//! Download bookkeeping: file names, completion polling and placement.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::DuplicateHandling;
use crate::error::{Error, Result};

const MAX_FILENAME_CHARS: usize = 255;
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Suffix Chromium uses for in-progress downloads.
pub const PARTIAL_SUFFIX: &str = ".crdownload";

/// Replaces characters that are invalid in file names and caps the length at
/// 255 characters, keeping the extension.
pub fn sanitize_filename(name: &str) -> String {
	let cleaned: String = name
		.chars()
		.map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
		.collect();

	if cleaned.chars().count() <= MAX_FILENAME_CHARS {
		return cleaned;
	}

	let (stem, ext) = split_extension(&cleaned);
	let keep = MAX_FILENAME_CHARS.saturating_sub(ext.chars().count());
	let stem: String = stem.chars().take(keep).collect();
	format!("{stem}{ext}")
}

/// Splits `name` into stem and extension (with the dot). A leading dot does
/// not start an extension.
fn split_extension(name: &str) -> (&str, &str) {
	match name.rfind('.') {
		Some(idx) if idx > 0 => name.split_at(idx),
		_ => (name, ""),
	}
}

/// Polls `dir` until `filename` exists without its partial companion.
///
/// Returns the completed path, or `None` when `timeout` elapses first.
pub async fn wait_for_download(
	dir: &Path,
	filename: &str,
	timeout: Duration,
	poll: Duration,
) -> Option<PathBuf> {
	let target = dir.join(filename);
	let partial = dir.join(format!("{filename}{PARTIAL_SUFFIX}"));
	let deadline = Instant::now() + timeout;

	loop {
		if target.exists() && !partial.exists() {
			debug!(target = "uyap.files", path = %target.display(), "download complete");
			return Some(target);
		}
		if Instant::now() >= deadline {
			return None;
		}
		tokio::time::sleep(poll).await;
	}
}

/// Moves a finished download into `target_dir` under `filename`.
pub fn place_download(
	source: &Path,
	target_dir: &Path,
	filename: &str,
	handling: DuplicateHandling,
) -> Result<PathBuf> {
	std::fs::create_dir_all(target_dir)?;
	let mut destination = target_dir.join(filename);

	if destination.exists() {
		match handling {
			DuplicateHandling::Skip => {
				info!(target = "uyap.files", path = %destination.display(), "document already present, keeping existing file");
				let _ = std::fs::remove_file(source);
				return Ok(destination);
			}
			DuplicateHandling::Overwrite => {
				std::fs::remove_file(&destination).map_err(|source| Error::Download {
					path: destination.clone(),
					source,
				})?;
			}
			DuplicateHandling::Rename => {
				destination = next_free_name(target_dir, filename);
			}
		}
	}

	move_file(source, &destination)?;
	Ok(destination)
}

fn next_free_name(dir: &Path, filename: &str) -> PathBuf {
	let (stem, ext) = split_extension(filename);
	(1..)
		.map(|n| dir.join(format!("{stem} ({n}){ext}")))
		.find(|candidate| !candidate.exists())
		.unwrap_or_else(|| dir.join(filename))
}

/// Renames, falling back to copy and delete across filesystems.
fn move_file(source: &Path, destination: &Path) -> Result<()> {
	if std::fs::rename(source, destination).is_ok() {
		return Ok(());
	}
	let to_err = |source| Error::Download {
		path: destination.to_path_buf(),
		source,
	};
	std::fs::copy(source, destination).map_err(to_err)?;
	std::fs::remove_file(source).map_err(to_err)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_characters_become_underscores() {
		assert_eq!(sanitize_filename("test<>:\"/\\|?*file.pdf"), "test_________file.pdf");
		assert_eq!(sanitize_filename("Dilekçe.pdf"), "Dilekçe.pdf");
	}

	#[test]
	fn long_names_keep_extension() {
		let name = format!("{}.pdf", "a".repeat(300));
		let sanitized = sanitize_filename(&name);
		assert!(sanitized.chars().count() <= 255);
		assert!(sanitized.ends_with(".pdf"));
		assert_eq!(sanitized.chars().count(), 255);
	}

	#[test]
	fn extension_split_ignores_leading_dot() {
		assert_eq!(split_extension(".hidden"), (".hidden", ""));
		assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
		assert_eq!(split_extension("plain"), ("plain", ""));
	}

	#[tokio::test]
	async fn waits_until_partial_file_is_gone() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
		std::fs::write(dir.path().join("a.pdf.crdownload"), b"").unwrap();

		let pending = wait_for_download(
			dir.path(),
			"a.pdf",
			Duration::from_millis(30),
			Duration::from_millis(10),
		)
		.await;
		assert!(pending.is_none());

		std::fs::remove_file(dir.path().join("a.pdf.crdownload")).unwrap();
		let done = wait_for_download(
			dir.path(),
			"a.pdf",
			Duration::from_millis(30),
			Duration::from_millis(10),
		)
		.await;
		assert_eq!(done, Some(dir.path().join("a.pdf")));
	}

	#[tokio::test]
	async fn missing_download_times_out() {
		let dir = tempfile::tempdir().unwrap();
		let result = wait_for_download(dir.path(), "never.pdf", Duration::ZERO, Duration::ZERO).await;
		assert!(result.is_none());
	}

	#[test]
	fn duplicate_handling_variants() {
		let downloads = tempfile::tempdir().unwrap();
		let target = tempfile::tempdir().unwrap();
		std::fs::write(target.path().join("doc.pdf"), b"old").unwrap();

		let src = downloads.path().join("doc.pdf");
		std::fs::write(&src, b"new").unwrap();
		let renamed = place_download(&src, target.path(), "doc.pdf", DuplicateHandling::Rename).unwrap();
		assert_eq!(renamed, target.path().join("doc (1).pdf"));
		assert!(!src.exists());

		std::fs::write(&src, b"newer").unwrap();
		let kept = place_download(&src, target.path(), "doc.pdf", DuplicateHandling::Skip).unwrap();
		assert_eq!(std::fs::read(&kept).unwrap(), b"old");

		std::fs::write(&src, b"newest").unwrap();
		let replaced = place_download(&src, target.path(), "doc.pdf", DuplicateHandling::Overwrite).unwrap();
		assert_eq!(std::fs::read(&replaced).unwrap(), b"newest");
	}
}
