use sheets_idf::{MarkupError, TableError};
use sheets_layout::{FontError, LayoutError};
use sheets_render_lopdf::RenderError;
use sheets_style::StyleError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A comprehensive error type for worksheet generation, from font acquisition
/// to the final file write.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Font registration failed: {0}")]
    FontRegistration(#[from] FontError),

    #[error("Font asset {0} not found and no download source is configured")]
    FontAssetMissing(PathBuf),

    #[error("Fetching {url} failed: {reason}")]
    NetworkFetch { url: String, reason: String },

    #[error("Download from {url} is not a font file: {reason}")]
    MalformedRemoteAsset { url: String, reason: String },

    #[error("Style configuration error: {0}")]
    Style(#[from] StyleError),

    #[error("Malformed table: {0}")]
    Table(#[from] TableError),

    #[error("Invalid text markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("Layout failed: {0}")]
    Layout(LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<LayoutError> for PipelineError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Font(font) => PipelineError::FontRegistration(font),
            LayoutError::Style(style) => PipelineError::Style(style),
            other => PipelineError::Layout(other),
        }
    }
}

/// The coarse failure categories a worksheet run can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FontRegistrationFailure,
    FontAssetMissing,
    NetworkFetchFailure,
    MalformedRemoteAsset,
    DocumentBuildFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FontRegistrationFailure => "font registration failure",
            ErrorKind::FontAssetMissing => "font asset missing",
            ErrorKind::NetworkFetchFailure => "network fetch failure",
            ErrorKind::MalformedRemoteAsset => "malformed remote asset",
            ErrorKind::DocumentBuildFailure => "document build failure",
        };
        f.write_str(name)
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::FontRegistration(_) => ErrorKind::FontRegistrationFailure,
            PipelineError::FontAssetMissing(_) => ErrorKind::FontAssetMissing,
            PipelineError::NetworkFetch { .. } => ErrorKind::NetworkFetchFailure,
            PipelineError::MalformedRemoteAsset { .. } => ErrorKind::MalformedRemoteAsset,
            PipelineError::Style(_)
            | PipelineError::Table(_)
            | PipelineError::Markup(_)
            | PipelineError::Layout(_)
            | PipelineError::Render(_)
            | PipelineError::Io { .. } => ErrorKind::DocumentBuildFailure,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_font_errors_become_registration_failures() {
        let err: PipelineError = LayoutError::Font(FontError::NotRegistered("JapaneseFont".into())).into();
        assert_eq!(err.kind(), ErrorKind::FontRegistrationFailure);

        let err: PipelineError = LayoutError::ElementTooLarge(900.0, 697.9).into();
        assert_eq!(err.kind(), ErrorKind::DocumentBuildFailure);
    }

    #[test]
    fn build_errors_share_one_category() {
        let err: PipelineError = TableError::NoRows.into();
        assert_eq!(err.kind(), ErrorKind::DocumentBuildFailure);
        let err: PipelineError = StyleError::UnknownStyle("Title".into()).into();
        assert_eq!(err.kind(), ErrorKind::DocumentBuildFailure);
    }
}
