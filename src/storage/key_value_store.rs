use crate::error::StorageError;

/// String key-value storage in the shape of a browser's local storage.
/// Methods take `&self`; implementations use interior mutability.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
