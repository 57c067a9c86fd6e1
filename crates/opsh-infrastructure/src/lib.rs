pub mod config_service;
pub mod installation;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigServiceImpl;
pub use crate::installation::Installation;
pub use crate::paths::OpshPaths;
pub use crate::secret_service::SecretServiceImpl;
