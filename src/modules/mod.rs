pub mod asset;
pub mod diagnostics;
pub mod transcode;
