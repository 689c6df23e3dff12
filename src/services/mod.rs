pub mod admin_service;
pub mod reference_validator;
pub mod syllabus_service;

pub use admin_service::AdminService;
pub use reference_validator::ReferenceValidator;
pub use syllabus_service::{SaveOutcome, SyllabusService};
