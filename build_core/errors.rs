//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (manifest parsing, validation, output).
pub(crate) enum BuildError {
    /// A field cannot be addressed inside the event payload.
    #[error("[MESSAGE]:Invalid field layout [EVENT]:{event}, [FIELD]:{field}, [COMMENT]:{comment}")]
    FieldLayout {
        event: String,
        field: String,
        comment: &'static str,
    },

    /// Two entries of the same scope share a name or an id.
    #[error("[MESSAGE]:Duplicate entry [SCOPE]:{scope}, [NAME]:{name}")]
    Duplicate { scope: String, name: String },

    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the manifest.
    #[error("[MESSAGE]:Invalid JSON format [ERROR]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },
}
