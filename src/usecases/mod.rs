//! Application use cases. Orchestrate domain logic via ports.

pub mod contact_service;
pub mod insight_service;
pub mod report_service;

pub use contact_service::ContactService;
pub use insight_service::InsightService;
pub use report_service::ReportService;
