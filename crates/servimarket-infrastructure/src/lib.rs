pub mod config_service;
pub mod file_key_value_store;
pub mod memory_key_value_store;
pub mod mock_catalog;
pub mod paths;
pub mod static_user_directory;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_key_value_store::FileKeyValueStore;
pub use crate::memory_key_value_store::MemoryKeyValueStore;
pub use crate::mock_catalog::MockCatalog;
pub use crate::paths::MarketPaths;
pub use crate::static_user_directory::StaticUserDirectory;
