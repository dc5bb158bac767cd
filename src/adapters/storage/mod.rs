//! Storage Adapters
//!
//! Local filesystem implementations of the file storage ports.
//!
//! ## Available Adapters
//!
//! - **LocalBlobStorage** - Attachment content under the uploads directory
//! - **LocalDocumentStorage** - Editor documents under the documents directory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{LocalBlobStorage, LocalDocumentStorage};
//!
//! let blobs = LocalBlobStorage::new("./uploads");
//! let documents = LocalDocumentStorage::new("./data");
//! ```

mod fs_ops;
mod local_blob_storage;
mod local_document_storage;

pub use local_blob_storage::LocalBlobStorage;
pub use local_document_storage::LocalDocumentStorage;
