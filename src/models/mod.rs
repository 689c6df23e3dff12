pub mod evaluation;
pub mod learning_unit;
pub mod syllabus;
pub mod user;
pub mod validation;

pub use evaluation::EvaluationCriterion;
pub use learning_unit::{LearningUnit, Methodology, Week};
pub use syllabus::{ExportReadiness, Syllabus};
pub use user::UserRecord;
pub use validation::{ValidateReferenceRequest, ValidationResult};
