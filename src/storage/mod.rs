//! Storage for uploaded media
//!
//! Upload rules decide where a file goes and how large it may be; the media
//! store writes and removes the bytes.

pub mod media;
pub mod uploads;

pub use media::{store_upload, LocalMediaStore, MediaStore};
pub use uploads::{Upload, UploadRule};
