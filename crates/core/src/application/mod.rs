// Application Layer - Use Cases

pub mod check_service;
pub mod config_resolver;
pub mod constants;
pub mod evidence;

// Re-exports
pub use check_service::CheckService;
pub use evidence::{EvidenceBundle, EvidenceGenerator};
