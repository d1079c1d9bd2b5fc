pub mod auth_service;
pub mod config_service;
pub mod json_history_repository;
pub mod memory_history_repository;
pub mod paths;
pub mod storage;
pub mod upload;

pub use crate::auth_service::LocalAuthService;
pub use crate::config_service::ConfigService;
pub use crate::json_history_repository::JsonHistoryRepository;
pub use crate::memory_history_repository::MemoryHistoryRepository;
pub use crate::paths::SkinPaths;
