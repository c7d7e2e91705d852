//! Polymorphic recording file list, keyed by the vendor's `fileListMode`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::type_name;

use crate::error::{Result, ServiceError};

pub const MODE_STRING: &str = "string";
pub const MODE_JSON: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    pub filename: String,
    pub slice_start_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListEntry {
    pub file_name: String,
    pub track_type: String,
    pub uid: String,
    pub mixed_all_user: bool,
    pub is_playable: bool,
    pub slice_start_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileList {
    Flat(Vec<FileDetail>),
    Structured(Vec<FileListEntry>),
}

impl FileList {
    pub fn decode(mode: Option<&str>, payload: Option<&Value>) -> Result<Self> {
        let (Some(mode), Some(payload)) = (mode, payload) else {
            return Err(ServiceError::IncompleteServerResponse);
        };

        match mode {
            MODE_STRING => Ok(FileList::Flat(from_payload(payload)?)),
            MODE_JSON => Ok(FileList::Structured(from_payload(payload)?)),
            other => Err(ServiceError::UnknownFileListMode(other.to_string())),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            FileList::Flat(_) => MODE_STRING,
            FileList::Structured(_) => MODE_JSON,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FileList::Flat(files) => files.len(),
            FileList::Structured(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn from_payload<T: DeserializeOwned>(payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|source| ServiceError::ResponseParse {
        target: type_name::<T>(),
        source,
    })
}
