//! Validated input for a folder upload.

use uuid::Uuid;

use dochub_core::error::AppError;

use crate::document::UploadedFile;

/// Index-aligned relative paths and files, plus an optional destination.
#[derive(Debug, Clone)]
pub struct FolderUploadRequest {
    paths: Vec<String>,
    files: Vec<UploadedFile>,
    folder_id: Option<Uuid>,
}

impl FolderUploadRequest {
    /// Pair `paths[i]` with `files[i]`.
    ///
    /// Fails when nothing was sent or the two lists differ in length.
    pub fn new(
        paths: Vec<String>,
        files: Vec<UploadedFile>,
        folder_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        if files.is_empty() {
            return Err(AppError::validation("No files provided"));
        }
        if paths.len() != files.len() {
            return Err(AppError::validation(format!(
                "Expected one path per file, got {} paths for {} files",
                paths.len(),
                files.len()
            )));
        }
        Ok(Self {
            paths,
            files,
            folder_id,
        })
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<UploadedFile>, Option<Uuid>) {
        (self.paths, self.files, self.folder_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dochub_core::error::ErrorKind;

    #[test]
    fn test_rejects_empty_and_mismatched() {
        let err = FolderUploadRequest::new(vec![], vec![], None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = FolderUploadRequest::new(
            vec!["a.txt".into(), "b.txt".into()],
            vec![UploadedFile::new("a.txt", "a")],
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_accepts_aligned_lists() {
        let dest = Uuid::new_v4();
        let req = FolderUploadRequest::new(
            vec!["d/a.txt".into()],
            vec![UploadedFile::new("a.txt", "a")],
            Some(dest),
        )
        .unwrap();
        let (paths, files, folder_id) = req.into_parts();
        assert_eq!(paths, ["d/a.txt".to_string()]);
        assert_eq!(files.len(), 1);
        assert_eq!(folder_id, Some(dest));
    }
}
