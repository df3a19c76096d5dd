pub mod attendance;
pub mod catalog;
pub mod completion;
pub mod docs;
pub mod export;
pub mod health;
pub mod scan;
