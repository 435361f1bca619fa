pub mod downloads;
pub mod transcode;
