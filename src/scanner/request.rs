//! Analysis requests.

use std::path::{Path, PathBuf};

use crate::types::SourceId;
use crate::{Result, ScannerError};

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// The one image an analysis request is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(Upload),
    Url(String),
}

impl ImageSource {
    /// Source identifier used for caching.
    ///
    /// Uploads are identified by filename only, not by their bytes.
    pub fn source_id(&self) -> SourceId {
        match self {
            ImageSource::File(upload) => SourceId::file(&upload.filename),
            ImageSource::Url(url) => SourceId::url(url),
        }
    }
}

/// An analysis request: exactly one image source, plus an optional path to
/// write the raw model text to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    source: ImageSource,
    save_raw_to: Option<PathBuf>,
}

impl AnalyzeRequest {
    /// Build a request from loosely-typed inputs.
    ///
    /// Exactly one of `file` and `url` must be given; an empty URL counts as
    /// absent.
    pub fn new(
        file: Option<Upload>,
        url: Option<String>,
        save_raw_to: Option<PathBuf>,
    ) -> Result<Self> {
        let url = url.filter(|u| !u.is_empty());
        let source = match (file, url) {
            (Some(upload), None) => ImageSource::File(upload),
            (None, Some(url)) => ImageSource::Url(url),
            _ => {
                return Err(ScannerError::InvalidInput(
                    "Provide either a file upload or an image url, not both".to_string(),
                ));
            }
        };
        Ok(Self {
            source,
            save_raw_to,
        })
    }

    pub fn file(upload: Upload) -> Self {
        Self {
            source: ImageSource::File(upload),
            save_raw_to: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source: ImageSource::Url(url.into()),
            save_raw_to: None,
        }
    }

    /// Also write the raw model text to `path`.
    pub fn save_raw_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_raw_to = Some(path.into());
        self
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn raw_output_path(&self) -> Option<&Path> {
        self.save_raw_to.as_deref()
    }

    pub fn source_id(&self) -> SourceId {
        self.source.source_id()
    }

    /// Reject sources that cannot identify an image: an empty URL, or an
    /// upload without a filename.
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            ImageSource::Url(url) if url.is_empty() => Err(ScannerError::InvalidInput(
                "Provide either a file upload or an image url, not both".to_string(),
            )),
            ImageSource::File(upload) if upload.filename.is_empty() => Err(
                ScannerError::InvalidInput("Uploaded file must have a filename".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_source() {
        let upload = Upload::new("a.jpg", b"img".to_vec());

        assert!(AnalyzeRequest::new(Some(upload.clone()), None, None).is_ok());
        assert!(AnalyzeRequest::new(None, Some("https://x.test/a".into()), None).is_ok());

        assert!(matches!(
            AnalyzeRequest::new(Some(upload), Some("https://x.test/a".into()), None),
            Err(ScannerError::InvalidInput(_))
        ));
        assert!(matches!(
            AnalyzeRequest::new(None, None, None),
            Err(ScannerError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_url_counts_as_absent() {
        assert!(AnalyzeRequest::new(None, Some(String::new()), None).is_err());

        let upload = Upload::new("a.jpg", b"img".to_vec());
        let request = AnalyzeRequest::new(Some(upload), Some(String::new()), None).unwrap();
        assert_eq!(request.source_id(), SourceId::file("a.jpg"));
    }

    #[test]
    fn unidentifiable_sources_fail_validation() {
        assert!(matches!(
            AnalyzeRequest::url("").validate(),
            Err(ScannerError::InvalidInput(_))
        ));
        assert!(matches!(
            AnalyzeRequest::file(Upload::new("", b"img".to_vec())).validate(),
            Err(ScannerError::InvalidInput(_))
        ));
        assert!(AnalyzeRequest::url("https://x.test/a").validate().is_ok());
        assert!(
            AnalyzeRequest::file(Upload::new("a.jpg", b"img".to_vec()))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn source_ids() {
        assert_eq!(
            AnalyzeRequest::file(Upload::new("p.png", vec![1])).source_id(),
            SourceId::file("p.png")
        );
        assert_eq!(
            AnalyzeRequest::url("https://x.test/p.png").source_id(),
            SourceId::url("https://x.test/p.png")
        );
    }
}
