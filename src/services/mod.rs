pub mod completion_service;
pub mod export_service;
pub mod memory_store;
pub mod record_store;
pub mod registration_service;
pub mod report_service;
pub mod scan_service;
pub mod session_catalog;
