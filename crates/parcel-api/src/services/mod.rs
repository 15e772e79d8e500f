pub mod upload;

pub use upload::{IncomingFile, UploadService};
