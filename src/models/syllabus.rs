use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::messages;
use crate::models::evaluation::{self, EvaluationCriterion};
use crate::models::{LearningUnit, Methodology};

/// One course's study plan, the only document the editor persists.
///
/// `id` is `None` until the store assigns one and never changes afterwards.
/// Learning units and evaluation criteria are owned by the syllabus and are
/// always read and written together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub course_name: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub career: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub theory_hours: u32,
    #[serde(default)]
    pub practice_hours: u32,
    #[serde(default)]
    pub independent_hours: u32,
    #[serde(default)]
    pub course_key: String,
    #[serde(default)]
    pub course_type: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub graduate_competency: String,
    #[serde(default)]
    pub course_competency: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub learning_units: Vec<LearningUnit>,
    #[serde(default)]
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    /// Signature image as a data URL, stored as-is.
    #[serde(default)]
    pub signature: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReadiness {
    pub ready: bool,
    pub missing_fields: Vec<String>,
}

impl Syllabus {
    /// A not-yet-persisted syllabus with the editor's placeholder values.
    pub fn new_draft(owner_id: &str, author: &str, author_email: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            owner_id: owner_id.to_string(),
            course_name: messages::DEFAULT_COURSE_NAME.to_string(),
            faculty: String::new(),
            career: String::new(),
            term: String::new(),
            credits: 0,
            theory_hours: 0,
            practice_hours: 0,
            independent_hours: 0,
            course_key: messages::DEFAULT_COURSE_KEY.to_string(),
            course_type: String::new(),
            prerequisites: String::new(),
            author: author.to_string(),
            author_email: author_email.to_string(),
            graduate_competency: String::new(),
            course_competency: String::new(),
            summary: String::new(),
            learning_units: Vec::new(),
            evaluation_criteria: EvaluationCriterion::defaults(),
            signature: None,
            creation_date: now,
            update_date: now,
        }
    }

    pub fn total_hours(&self) -> u64 {
        [self.theory_hours, self.practice_hours, self.independent_hours]
            .into_iter()
            .map(u64::from)
            .sum()
    }

    pub fn total_weeks(&self) -> usize {
        self.learning_units.iter().map(|u| u.weeks.len()).sum()
    }

    pub fn weight_total(&self) -> f64 {
        evaluation::weight_total(&self.evaluation_criteria)
    }

    /// Positions (1-based) of units whose start date falls after their end date.
    pub fn invalid_unit_ranges(&self) -> Vec<usize> {
        self.learning_units
            .iter()
            .enumerate()
            .filter(|(_, unit)| !unit.has_valid_date_range())
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Soft problems that never block a save.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !evaluation::weights_balanced(&self.evaluation_criteria) {
            warnings.push(messages::weight_total_warning(self.weight_total()));
        }
        warnings
    }

    /// Labels of the fields that must be filled before the print view is offered.
    pub fn export_readiness(&self) -> ExportReadiness {
        let mut missing = Vec::new();
        let mut require = |value: &str, label: &str| {
            if value.trim().is_empty() {
                missing.push(label.to_string());
            }
        };

        require(&self.course_name, "Nombre del curso");
        require(&self.course_key, "Clave");
        require(&self.author, "Elaboró");
        require(&self.graduate_competency, "Competencia del Perfil de Egreso");
        require(&self.course_competency, "Competencia del Curso");
        require(&self.prerequisites, "Competencias Previas Requeridas");
        require(&self.summary, "Resumen del Curso");

        if self.credits == 0 {
            missing.push("Créditos".to_string());
        }
        if self.total_hours() == 0 {
            missing.push("Horas".to_string());
        }

        if self.learning_units.is_empty() {
            missing.push("Unidades de Aprendizaje".to_string());
        } else {
            let incomplete = self.learning_units.iter().any(|unit| {
                unit.denomination.trim().is_empty()
                    || unit.weeks.is_empty()
                    || unit.weeks.iter().any(|w| w.specific_contents.trim().is_empty())
            });
            if incomplete {
                missing.push(
                    "Todas las Unidades de Aprendizaje y sus semanas deben estar completas"
                        .to_string(),
                );
            }
            if self.learning_units.iter().any(|unit| {
                unit.methodology == Methodology::Other && unit.custom_methodology.trim().is_empty()
            }) {
                missing.push("Especifique la metodología".to_string());
            }
            if self
                .learning_units
                .iter()
                .any(|unit| unit.apa_reference.trim().is_empty())
            {
                missing.push("Referencia Bibliográfica (APA)".to_string());
            }
        }

        ExportReadiness {
            ready: missing.is_empty(),
            missing_fields: missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Week;

    fn complete_syllabus() -> Syllabus {
        let mut s = Syllabus::new_draft("u1", "Ana", "ana@x.com", Utc::now());
        s.credits = 6;
        s.theory_hours = 3;
        s.graduate_competency = "Resuelve problemas".to_string();
        s.course_competency = "Diseña algoritmos".to_string();
        s.prerequisites = "Programación I".to_string();
        s.summary = "Curso de estructuras de datos".to_string();
        let mut unit = LearningUnit::new(1);
        unit.weeks.push(Week::new("Listas enlazadas"));
        unit.apa_reference = "Knuth, D. (1997). The art of computer programming. Addison-Wesley.".to_string();
        s.learning_units.push(unit);
        s
    }

    #[test]
    fn draft_has_placeholders_and_default_criteria() {
        let now = Utc::now();
        let s = Syllabus::new_draft("u1", "Ana", "ana@x.com", now);
        assert!(s.id.is_none());
        assert_eq!(s.course_name, "Nuevo Plan de Estudio");
        assert_eq!(s.course_key, "CURSO-101");
        assert!(s.learning_units.is_empty());
        assert_eq!(s.evaluation_criteria.len(), 4);
        assert_eq!(s.weight_total(), 100.0);
        assert_eq!(s.creation_date, now);
        assert_eq!(s.update_date, now);
        assert!(s.warnings().is_empty());
    }

    #[test]
    fn unbalanced_weights_only_warn() {
        let mut s = Syllabus::new_draft("u1", "Ana", "ana@x.com", Utc::now());
        s.evaluation_criteria.pop();
        let warnings = s.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("90%"));
    }

    #[test]
    fn new_draft_is_not_ready_for_export() {
        let s = Syllabus::new_draft("u1", "Ana", "ana@x.com", Utc::now());
        let readiness = s.export_readiness();
        assert!(!readiness.ready);
        assert!(readiness.missing_fields.contains(&"Unidades de Aprendizaje".to_string()));
        assert!(readiness.missing_fields.contains(&"Créditos".to_string()));
    }

    #[test]
    fn complete_syllabus_is_ready() {
        let readiness = complete_syllabus().export_readiness();
        assert!(readiness.ready, "missing: {:?}", readiness.missing_fields);
    }

    #[test]
    fn other_methodology_needs_custom_text() {
        let mut s = complete_syllabus();
        s.learning_units[0].methodology = Methodology::Other;
        let readiness = s.export_readiness();
        assert_eq!(readiness.missing_fields, vec!["Especifique la metodología".to_string()]);
    }

    #[test]
    fn blank_week_makes_units_incomplete() {
        let mut s = complete_syllabus();
        s.learning_units[0].weeks.push(Week::default());
        assert!(!s.export_readiness().ready);
        assert_eq!(s.total_weeks(), 2);
    }

    #[test]
    fn large_hour_counts_do_not_overflow() {
        let mut s = complete_syllabus();
        s.theory_hours = u32::MAX;
        s.practice_hours = 1;
        s.independent_hours = u32::MAX;
        assert_eq!(s.total_hours(), 2 * u64::from(u32::MAX) + 1);

        let readiness = s.export_readiness();
        assert!(readiness.ready, "missing: {:?}", readiness.missing_fields);
    }

    #[test]
    fn camel_case_on_the_wire() {
        let s = Syllabus::new_draft("u1", "Ana", "ana@x.com", Utc::now());
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["courseName"], "Nuevo Plan de Estudio");
        assert_eq!(value["ownerId"], "u1");
        assert!(value.get("id").is_none());
        assert!(value["learningUnits"].as_array().unwrap().is_empty());
    }
}
