//! Upload rules for file-backed fields
//!
//! Every field that accepts a file names the directory it is stored under
//! and the largest size it accepts. Sizes are checked before anything is
//! written.

use chrono::{DateTime, Utc};

use crate::utils::errors::ValidationErrors;
use crate::utils::helpers::{sanitize_file_name, unique_prefix};

pub const MIB: u64 = 1024 * 1024;

/// Largest cap of any rule; the request body limit must fit it
pub const LARGEST_UPLOAD_BYTES: u64 = 100 * MIB;

const FILE_TOO_LARGE_1MIB: &str = "File too large. Size should not exceed 1 MiB.";
const IMAGE_TOO_LARGE_2MB: &str = "Image too large. Size should not exceed 2MB.";
const FILE_TOO_LARGE_100MIB: &str = "File too large. Size should not exceed 100 MiB.";
const NOT_AN_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// A file received from a client, not yet stored
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    File,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadRule {
    pub field: &'static str,
    pub directory: &'static str,
    pub kind: UploadKind,
    pub max_bytes: u64,
    /// Add a `%Y/%m/%d/` level below the directory
    pub dated: bool,
    too_large: &'static str,
}

pub const EVENT_IMAGE: UploadRule = UploadRule {
    field: "event_image",
    directory: "event_images",
    kind: UploadKind::Image,
    max_bytes: MIB,
    dated: false,
    too_large: FILE_TOO_LARGE_1MIB,
};

pub const BTS_IMAGE: UploadRule = UploadRule {
    field: "bts_image",
    directory: "event_bts_images",
    kind: UploadKind::Image,
    max_bytes: MIB,
    dated: false,
    too_large: FILE_TOO_LARGE_1MIB,
};

pub const BTS_VIDEO: UploadRule = UploadRule {
    field: "bts_video",
    directory: "event_bts_videos",
    kind: UploadKind::File,
    max_bytes: LARGEST_UPLOAD_BYTES,
    dated: false,
    too_large: FILE_TOO_LARGE_100MIB,
};

pub const MEMBER_IMAGE: UploadRule = UploadRule {
    field: "image",
    directory: "member_images",
    kind: UploadKind::Image,
    max_bytes: MIB,
    dated: false,
    too_large: FILE_TOO_LARGE_1MIB,
};

pub const ALUMNI_IMAGE: UploadRule = UploadRule {
    field: "image",
    directory: "alumni_images",
    kind: UploadKind::Image,
    max_bytes: MIB,
    dated: false,
    too_large: FILE_TOO_LARGE_1MIB,
};

pub const PROJECT_IMAGE: UploadRule = UploadRule {
    field: "image",
    directory: "project_images",
    kind: UploadKind::Image,
    max_bytes: 2 * MIB,
    dated: true,
    too_large: IMAGE_TOO_LARGE_2MB,
};

impl UploadRule {
    /// Reject uploads that are too large or not of the expected kind
    pub fn check(&self, upload: &Upload) -> Result<(), ValidationErrors> {
        if upload.size() > self.max_bytes {
            return Err(ValidationErrors::single(self.field, self.too_large));
        }

        if self.kind == UploadKind::Image {
            let is_image = upload
                .extension()
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
            if !is_image {
                return Err(ValidationErrors::single(self.field, NOT_AN_IMAGE));
            }
        }

        Ok(())
    }

    /// Relative path the upload is stored under
    pub fn storage_path(&self, upload: &Upload, now: DateTime<Utc>) -> String {
        let name = format!("{}-{}", unique_prefix(), sanitize_file_name(&upload.file_name));
        if self.dated {
            format!("{}/{}/{}", self.directory, now.format("%Y/%m/%d"), name)
        } else {
            format!("{}/{}", self.directory, name)
        }
    }
}
