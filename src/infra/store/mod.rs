#[cfg(test)]
pub mod in_memory;
pub mod json_file_store;

#[cfg(test)]
pub use in_memory::InMemoryStore;
pub use json_file_store::JsonFileStore;
