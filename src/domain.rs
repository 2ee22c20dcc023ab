//! Domain module - core entities for the portal scraping flow

pub mod entities;

pub use entities::{Credentials, EmployeeRecord, FormDescriptor, ReportKind, ReportQuery};
