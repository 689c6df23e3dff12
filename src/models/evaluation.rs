use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One weighted graded component of a course. `weight` is in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriterion {
    pub evaluation: String,
    pub weight: f64,
    pub instrument: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl EvaluationCriterion {
    pub fn new(evaluation: &str, weight: f64, instrument: &str) -> Self {
        Self {
            evaluation: evaluation.to_string(),
            weight,
            instrument: instrument.to_string(),
            date: None,
        }
    }

    /// The four criteria a new syllabus starts with. Weights add up to 100.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Examen Parcial", 30.0, "Examen escrito"),
            Self::new("Examen Final", 30.0, "Examen escrito"),
            Self::new("Proyecto Integrador", 30.0, "Rúbrica"),
            Self::new("Participación y Tareas", 10.0, "Lista de cotejo"),
        ]
    }
}

pub fn weight_total(criteria: &[EvaluationCriterion]) -> f64 {
    criteria.iter().map(|c| c.weight).sum()
}

pub fn weights_balanced(criteria: &[EvaluationCriterion]) -> bool {
    (weight_total(criteria) - 100.0).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sum_to_one_hundred() {
        let criteria = EvaluationCriterion::defaults();
        assert_eq!(criteria.len(), 4);
        assert_eq!(weight_total(&criteria), 100.0);
        assert!(weights_balanced(&criteria));
    }

    #[test]
    fn fractional_weights_can_balance() {
        let criteria = vec![
            EvaluationCriterion::new("A", 33.3, "x"),
            EvaluationCriterion::new("B", 33.3, "x"),
            EvaluationCriterion::new("C", 33.4, "x"),
        ];
        assert!(weights_balanced(&criteria));
    }
}
