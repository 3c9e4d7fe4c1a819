pub mod media_delete;
pub mod media_download;
pub mod media_upload;
