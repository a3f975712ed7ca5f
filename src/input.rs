//! Inputs consumed by the translator and page effects.

/// Translation dictionary
pub mod dictionary;
/// In-memory page document
pub mod document;
/// Local key-value storage
pub mod storage;

pub use dictionary::{
    Dictionary,
    DictionaryError,
    LocaleTable,
    Lookup,
};
pub use document::{
    Content,
    Document,
    DocumentError,
    ElementSnapshot,
    NodeId,
    Page,
};
pub use storage::{
    FileStorage,
    MemoryStorage,
    Storage,
    StorageError,
};
