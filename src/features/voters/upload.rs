//! Checks applied to a voter-file selection before anything is uploaded. The
//! backend validates extensions again; size limits are client-side only.

use crate::app_lib::ValidationError;

/// Name and size of a selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, extension)| extension.to_ascii_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRestrictions {
    pub max_files: usize,
    pub min_file_bytes: u64,
    pub max_total_bytes: u64,
    pub allowed_extensions: &'static [&'static str],
}

impl Default for UploadRestrictions {
    fn default() -> Self {
        Self {
            max_files: 10,
            min_file_bytes: 10_240,
            max_total_bytes: 20_971_520,
            allowed_extensions: &["csv", "xlsx", "xls"],
        }
    }
}

impl UploadRestrictions {
    /// Value for the file input's `accept` attribute.
    #[must_use]
    pub fn accept(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|extension| format!(".{extension}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Validates a whole selection, reporting the first violation.
    ///
    /// # Errors
    /// Returns the `ValidationError` describing the first rule the selection
    /// breaks.
    pub fn check(&self, files: &[FileMeta]) -> Result<(), ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if files.len() > self.max_files {
            return Err(ValidationError::TooManyFiles {
                max: self.max_files,
            });
        }

        for file in files {
            let allowed = file
                .extension()
                .is_some_and(|extension| self.allowed_extensions.contains(&extension.as_str()));
            if !allowed {
                return Err(ValidationError::UnsupportedFileType {
                    name: file.name.clone(),
                });
            }
            if file.size < self.min_file_bytes {
                return Err(ValidationError::FileTooSmall {
                    name: file.name.clone(),
                    min_bytes: self.min_file_bytes,
                });
            }
        }

        let total = files
            .iter()
            .fold(0_u64, |total, file| total.saturating_add(file.size));
        if total > self.max_total_bytes {
            return Err(ValidationError::TotalSizeExceeded {
                max_bytes: self.max_total_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileMeta, UploadRestrictions};
    use crate::app_lib::ValidationError;

    const KB: u64 = 1024;

    #[test]
    fn accepts_spreadsheets_within_limits() {
        let files = [
            FileMeta::new("voters.csv", 12 * KB),
            FileMeta::new("Faculty Of Law.XLSX", 2 * 1024 * KB),
            FileMeta::new("legacy.xls", 10 * KB),
        ];
        assert_eq!(UploadRestrictions::default().check(&files), Ok(()));
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            UploadRestrictions::default().check(&[]),
            Err(ValidationError::NoFiles)
        );
    }

    #[test]
    fn more_than_ten_files_is_rejected() {
        let files: Vec<FileMeta> = (0..11)
            .map(|index| FileMeta::new(format!("part-{index}.csv"), 20 * KB))
            .collect();
        assert_eq!(
            UploadRestrictions::default().check(&files),
            Err(ValidationError::TooManyFiles { max: 10 })
        );
    }

    #[test]
    fn other_extensions_are_rejected() {
        for name in ["voters.pdf", "csv", ".csv", "voters.csv.exe"] {
            assert_eq!(
                UploadRestrictions::default().check(&[FileMeta::new(name, 20 * KB)]),
                Err(ValidationError::UnsupportedFileType {
                    name: name.to_string()
                }),
                "{name}"
            );
        }
    }

    #[test]
    fn small_files_are_rejected() {
        assert_eq!(
            UploadRestrictions::default().check(&[FileMeta::new("tiny.csv", 10_239)]),
            Err(ValidationError::FileTooSmall {
                name: "tiny.csv".to_string(),
                min_bytes: 10_240
            })
        );
    }

    #[test]
    fn total_size_is_capped() {
        let files = [
            FileMeta::new("a.csv", 10 * 1024 * KB),
            FileMeta::new("b.csv", 10 * 1024 * KB + 1),
        ];
        assert_eq!(
            UploadRestrictions::default().check(&files),
            Err(ValidationError::TotalSizeExceeded {
                max_bytes: 20_971_520
            })
        );
    }

    #[test]
    fn accept_attribute_lists_extensions() {
        assert_eq!(UploadRestrictions::default().accept(), ".csv,.xlsx,.xls");
    }
}
