//! State/city metadata: the persisted document, its normalization from raw
//! records, and the stores it is read from and written to.

pub mod canonical;
pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod normalize;
pub mod store;

pub use canonical::{comparable_form, content_form, same_content, to_canonical_json};
pub use error::{Result, StoreError};
pub use file::{DEFAULT_STORE_PATH, FileMetadataStore};
pub use memory::InMemoryMetadataStore;
pub use model::{CityRecord, DocumentContent, MetadataDocument, StateEntry};
pub use normalize::{CityIndex, normalize};
pub use store::{MetadataStore, MetadataStoreExt};
