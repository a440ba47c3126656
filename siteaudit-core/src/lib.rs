pub mod aggregate;
pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

pub use aggregate::{Aggregator, FindingRule, MissingSitemap};
pub use api::{ApiResponse, AuditRequest, AuditResponse, AuditStatus, RequestError};
pub use audit::{make_audit_id, run_audit, run_audit_with};
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use model::{AuditResult, ContactInfo, Evidence, Finding, Severity, SiteSummary, TechnicalSummary};
pub use report::ReportFormat;
