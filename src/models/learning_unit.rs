use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::messages;
use crate::models::ValidationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Methodology {
    #[default]
    #[serde(rename = "ABP")]
    ProjectBased,
    #[serde(rename = "ABPr")]
    ProblemBased,
    #[serde(rename = "EC")]
    CaseStudy,
    #[serde(rename = "Otro")]
    Other,
}

impl Methodology {
    pub fn label(&self) -> &'static str {
        match self {
            Methodology::ProjectBased => "Aprendizaje Basado en Proyectos",
            Methodology::ProblemBased => "Aprendizaje Basado en Problemas",
            Methodology::CaseStudy => "Estudio de Caso",
            Methodology::Other => "Otro",
        }
    }
}

/// A week's content. Its number is its position in the unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub specific_contents: String,
}

impl Week {
    pub fn new(specific_contents: impl Into<String>) -> Self {
        Self {
            specific_contents: specific_contents.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningUnit {
    pub denomination: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub student_capacity: String,
    #[serde(default)]
    pub weeks: Vec<Week>,
    #[serde(default)]
    pub methodology: Methodology,
    #[serde(default)]
    pub custom_methodology: String,
    #[serde(default)]
    pub apa_reference: String,
    /// Last verdict for `apa_reference`. Cleared whenever the reference changes.
    #[serde(default)]
    pub validation: Option<ValidationResult>,
}

impl LearningUnit {
    /// A blank unit labelled for the given 1-based position.
    pub fn new(position: usize) -> Self {
        Self {
            denomination: messages::unit_label(position),
            start_date: None,
            end_date: None,
            student_capacity: String::new(),
            weeks: Vec::new(),
            methodology: Methodology::default(),
            custom_methodology: String::new(),
            apa_reference: String::new(),
            validation: None,
        }
    }

    pub fn has_valid_date_range(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Methodology as printed: the custom text when "Otro" is chosen.
    pub fn methodology_display(&self) -> &str {
        match self.methodology {
            Methodology::Other => &self.custom_methodology,
            other => other.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn methodology_uses_short_codes_on_the_wire() {
        let json = serde_json::to_string(&Methodology::ProblemBased).unwrap();
        assert_eq!(json, "\"ABPr\"");
        let parsed: Methodology = serde_json::from_str("\"Otro\"").unwrap();
        assert_eq!(parsed, Methodology::Other);
    }

    #[test]
    fn custom_methodology_shown_only_for_other() {
        let mut unit = LearningUnit::new(1);
        unit.custom_methodology = "Aula invertida".to_string();
        assert_eq!(unit.methodology_display(), "Aprendizaje Basado en Proyectos");

        unit.methodology = Methodology::Other;
        assert_eq!(unit.methodology_display(), "Aula invertida");
    }

    #[test]
    fn date_range_requires_start_not_after_end() {
        let mut unit = LearningUnit::new(2);
        assert_eq!(unit.denomination, "Unidad de Aprendizaje 2");
        assert!(unit.has_valid_date_range());

        unit.start_date = Some(Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap());
        unit.end_date = Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        assert!(!unit.has_valid_date_range());

        unit.end_date = unit.start_date;
        assert!(unit.has_valid_date_range());
    }
}
