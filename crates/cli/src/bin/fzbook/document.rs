use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Where the document text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DocumentSource {
	Stdin,
	File(PathBuf),
}

impl DocumentSource {
	pub(crate) fn from_arg(path: Option<&Path>) -> Self {
		match path {
			Some(path) if path != Path::new("-") => Self::File(path.to_path_buf()),
			_ => Self::Stdin,
		}
	}

	pub(crate) fn read(&self) -> Result<String> {
		match self {
			Self::Stdin => {
				let mut text = String::new();
				io::stdin()
					.read_to_string(&mut text)
					.context("failed to read document from standard input")?;
				Ok(text)
			}
			Self::File(path) => fs::read_to_string(path)
				.with_context(|| format!("failed to read document {}", path.display())),
		}
	}
}

impl fmt::Display for DocumentSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stdin => f.write_str("<stdin>"),
			Self::File(path) => write!(f, "{}", path.display()),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn dash_means_stdin() {
		assert_eq!(
			DocumentSource::from_arg(Some(Path::new("-"))),
			DocumentSource::Stdin
		);
		assert_eq!(DocumentSource::from_arg(None), DocumentSource::Stdin);
	}

	#[test]
	fn reads_documents_from_disk() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "first\n\nsecond").unwrap();

		let source = DocumentSource::from_arg(Some(file.path()));
		assert_eq!(source.read().unwrap(), "first\n\nsecond");
	}

	#[test]
	fn missing_file_names_the_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("absent.txt");
		let err = DocumentSource::File(path.clone()).read().unwrap_err();
		assert!(err.to_string().contains("absent.txt"));
	}
}
