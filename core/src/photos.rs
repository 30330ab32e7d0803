//! Finding the JPEG files a CSV refers to.

use std::{
	collections::{hash_map::Entry, HashMap},
	fs,
	path::{Path, PathBuf},
};

use gt_utils::error::FileIOError;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

const JPEG_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// `.jpg`/`.jpeg`, in any case.
#[must_use]
pub fn is_jpeg(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| {
			JPEG_EXTENSIONS
				.iter()
				.any(|jpeg| ext.eq_ignore_ascii_case(jpeg))
		})
}

/// Every JPEG below a directory, keyed by its lower-cased file name.
#[derive(Debug, Default, Clone)]
pub struct PhotoIndex {
	by_name: HashMap<String, PathBuf>,
}

impl PhotoIndex {
	/// Walks `root` recursively. Entries that can't be read are logged and skipped; when two
	/// photos share a name, the first one in walk order is kept.
	pub fn build(root: impl AsRef<Path>) -> Result<Self> {
		let root = root.as_ref();
		if !root.is_dir() {
			return Err(Error::ImageDirNotFound(root.to_path_buf()));
		}

		let mut by_name = HashMap::new();

		for entry in WalkDir::new(root).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) if e.depth() == 0 => return Err(e.into()),
				Err(e) => {
					warn!(?e, "Skipping unreadable entry while indexing photos");
					continue;
				}
			};

			if !entry.file_type().is_file() || !is_jpeg(entry.path()) {
				continue;
			}

			let Some(name) = entry.file_name().to_str() else {
				warn!(path = %entry.path().display(), "Skipping photo with a non UTF-8 name");
				continue;
			};

			match by_name.entry(name.to_lowercase()) {
				Entry::Vacant(vacant) => {
					vacant.insert(entry.into_path());
				}
				Entry::Occupied(occupied) => {
					warn!(
						kept = %occupied.get().display(),
						ignored = %entry.path().display(),
						"Two photos share a name"
					);
				}
			}
		}

		debug!(root = %root.display(), photos = by_name.len(), "Indexed photos");

		Ok(Self { by_name })
	}

	/// Case-insensitive lookup by file name.
	#[must_use]
	pub fn resolve(&self, filename: &str) -> Option<&Path> {
		self.by_name
			.get(&filename.trim().to_lowercase())
			.map(PathBuf::as_path)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	/// The actual file names, sorted.
	#[must_use]
	pub fn names(&self) -> Vec<&str> {
		let mut names = self
			.by_name
			.values()
			.filter_map(|path| path.file_name()?.to_str())
			.collect::<Vec<_>>();
		names.sort_unstable();
		names
	}
}

/// The JPEG files directly inside `dir`, sorted by path.
pub fn list_jpegs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
	let dir = dir.as_ref();

	let mut photos = fs::read_dir(dir)
		.map_err(|e| FileIOError::from((dir, e, "Failed to list photos")))?
		.filter_map(|entry| entry.ok().map(|entry| entry.path()))
		.filter(|path| path.is_file() && is_jpeg(path))
		.collect::<Vec<_>>();

	photos.sort();

	Ok(photos)
}
