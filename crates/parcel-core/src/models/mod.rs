pub mod upload;

pub use upload::{
    normalize_extension, ClassifiedObject, CorrelationIds, ObjectKind, StoredObject,
    UploadResponse,
};
