//! Persisted shape of a syllabus. Dates are kept as `{ seconds, nanos }`
//! store timestamps and converted to `DateTime<Utc>` only at the read/write
//! boundary, including the dates nested in units and criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::Error as _;

use crate::error::AppError;
use crate::models::{
    EvaluationCriterion, LearningUnit, Methodology, Syllabus, ValidationResult, Week,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoredTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl StoredTimestamp {
    pub fn to_datetime(self) -> Result<DateTime<Utc>, AppError> {
        DateTime::from_timestamp(self.seconds, self.nanos).ok_or_else(|| {
            AppError::Serialization(serde_json::Error::custom(format!(
                "timestamp out of range: {}s {}ns",
                self.seconds, self.nanos
            )))
        })
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

fn read_opt(ts: Option<StoredTimestamp>) -> Result<Option<DateTime<Utc>>, AppError> {
    ts.map(StoredTimestamp::to_datetime).transpose()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusRecord {
    pub owner_id: String,
    pub course_name: String,
    pub faculty: String,
    pub career: String,
    pub term: String,
    pub credits: u32,
    pub theory_hours: u32,
    pub practice_hours: u32,
    pub independent_hours: u32,
    pub course_key: String,
    pub course_type: String,
    pub prerequisites: String,
    pub author: String,
    pub author_email: String,
    pub graduate_competency: String,
    pub course_competency: String,
    pub summary: String,
    pub learning_units: Vec<LearningUnitRecord>,
    pub evaluation_criteria: Vec<EvaluationCriterionRecord>,
    pub signature: Option<String>,
    pub creation_date: StoredTimestamp,
    pub update_date: StoredTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningUnitRecord {
    pub denomination: String,
    pub start_date: Option<StoredTimestamp>,
    pub end_date: Option<StoredTimestamp>,
    pub student_capacity: String,
    pub weeks: Vec<Week>,
    pub methodology: Methodology,
    pub custom_methodology: String,
    pub apa_reference: String,
    pub validation: Option<ValidationResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriterionRecord {
    pub evaluation: String,
    pub weight: f64,
    pub instrument: String,
    pub date: Option<StoredTimestamp>,
}

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub data: SyllabusRecord,
}

impl StoredDocument {
    pub fn into_syllabus(self) -> Result<Syllabus, AppError> {
        self.data.into_syllabus(self.id)
    }
}

impl From<&Syllabus> for SyllabusRecord {
    fn from(s: &Syllabus) -> Self {
        Self {
            owner_id: s.owner_id.clone(),
            course_name: s.course_name.clone(),
            faculty: s.faculty.clone(),
            career: s.career.clone(),
            term: s.term.clone(),
            credits: s.credits,
            theory_hours: s.theory_hours,
            practice_hours: s.practice_hours,
            independent_hours: s.independent_hours,
            course_key: s.course_key.clone(),
            course_type: s.course_type.clone(),
            prerequisites: s.prerequisites.clone(),
            author: s.author.clone(),
            author_email: s.author_email.clone(),
            graduate_competency: s.graduate_competency.clone(),
            course_competency: s.course_competency.clone(),
            summary: s.summary.clone(),
            learning_units: s.learning_units.iter().map(LearningUnitRecord::from).collect(),
            evaluation_criteria: s
                .evaluation_criteria
                .iter()
                .map(EvaluationCriterionRecord::from)
                .collect(),
            signature: s.signature.clone(),
            creation_date: s.creation_date.into(),
            update_date: s.update_date.into(),
        }
    }
}

impl From<&LearningUnit> for LearningUnitRecord {
    fn from(u: &LearningUnit) -> Self {
        Self {
            denomination: u.denomination.clone(),
            start_date: u.start_date.map(Into::into),
            end_date: u.end_date.map(Into::into),
            student_capacity: u.student_capacity.clone(),
            weeks: u.weeks.clone(),
            methodology: u.methodology,
            custom_methodology: u.custom_methodology.clone(),
            apa_reference: u.apa_reference.clone(),
            validation: u.validation.clone(),
        }
    }
}

impl From<&EvaluationCriterion> for EvaluationCriterionRecord {
    fn from(c: &EvaluationCriterion) -> Self {
        Self {
            evaluation: c.evaluation.clone(),
            weight: c.weight,
            instrument: c.instrument.clone(),
            date: c.date.map(Into::into),
        }
    }
}

impl SyllabusRecord {
    pub fn into_syllabus(self, id: String) -> Result<Syllabus, AppError> {
        let learning_units = self
            .learning_units
            .into_iter()
            .map(LearningUnitRecord::into_unit)
            .collect::<Result<Vec<_>, _>>()?;
        let evaluation_criteria = self
            .evaluation_criteria
            .into_iter()
            .map(EvaluationCriterionRecord::into_criterion)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Syllabus {
            id: Some(id),
            owner_id: self.owner_id,
            course_name: self.course_name,
            faculty: self.faculty,
            career: self.career,
            term: self.term,
            credits: self.credits,
            theory_hours: self.theory_hours,
            practice_hours: self.practice_hours,
            independent_hours: self.independent_hours,
            course_key: self.course_key,
            course_type: self.course_type,
            prerequisites: self.prerequisites,
            author: self.author,
            author_email: self.author_email,
            graduate_competency: self.graduate_competency,
            course_competency: self.course_competency,
            summary: self.summary,
            learning_units,
            evaluation_criteria,
            signature: self.signature,
            creation_date: self.creation_date.to_datetime()?,
            update_date: self.update_date.to_datetime()?,
        })
    }
}

impl LearningUnitRecord {
    fn into_unit(self) -> Result<LearningUnit, AppError> {
        Ok(LearningUnit {
            denomination: self.denomination,
            start_date: read_opt(self.start_date)?,
            end_date: read_opt(self.end_date)?,
            student_capacity: self.student_capacity,
            weeks: self.weeks,
            methodology: self.methodology,
            custom_methodology: self.custom_methodology,
            apa_reference: self.apa_reference,
            validation: self.validation,
        })
    }
}

impl EvaluationCriterionRecord {
    fn into_criterion(self) -> Result<EvaluationCriterion, AppError> {
        Ok(EvaluationCriterion {
            evaluation: self.evaluation,
            weight: self.weight,
            instrument: self.instrument,
            date: read_opt(self.date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_keeps_subsecond_precision() {
        let dt = Utc.timestamp_opt(1_760_000_000, 123_456_789).unwrap();
        let ts = StoredTimestamp::from(dt);
        assert_eq!(ts, StoredTimestamp { seconds: 1_760_000_000, nanos: 123_456_789 });
        assert_eq!(ts.to_datetime().unwrap(), dt);
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        let ts = StoredTimestamp { seconds: i64::MAX, nanos: 0 };
        assert!(matches!(ts.to_datetime(), Err(AppError::Serialization(_))));
    }

    #[test]
    fn record_carries_nested_dates_as_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let mut s = Syllabus::new_draft("u1", "Ana", "ana@x.com", now);
        let mut unit = LearningUnit::new(1);
        unit.start_date = Some(Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap());
        s.learning_units.push(unit);

        let value = serde_json::to_value(SyllabusRecord::from(&s)).unwrap();
        assert_eq!(value["creationDate"]["seconds"], now.timestamp());
        assert_eq!(value["learningUnits"][0]["startDate"]["nanos"], 0);
        assert!(value["learningUnits"][0]["endDate"].is_null());
        assert!(value["evaluationCriteria"][0]["date"].is_null());
    }
}
