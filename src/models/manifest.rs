//! BI import manifest: where an exported CSV lives and how to parse it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub file_locations: Vec<FileLocation>,
    pub global_upload_settings: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocation {
    #[serde(rename = "URIs")]
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSettings {
    pub format: String,
    pub delimiter: String,
    pub textqualifier: String,
    pub contains_header: String,
}

impl ExportManifest {
    /// Manifest for a single comma-delimited CSV with a header row.
    pub fn for_csv(location: impl Into<String>) -> Self {
        Self {
            file_locations: vec![FileLocation {
                uris: vec![location.into()],
            }],
            global_upload_settings: UploadSettings {
                format: "CSV".into(),
                delimiter: ",".into(),
                textqualifier: "'".into(),
                contains_header: "true".into(),
            },
        }
    }
}
