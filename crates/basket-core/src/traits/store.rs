use crate::errors::StorageError;

/// Browser-persistent key/value storage, reduced to the three operations the
/// core needs. Values are raw strings; JSON (de)serialization sits above this
/// in `basket-storage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}
