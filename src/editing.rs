//! Immutable-update helpers for the nested sequences of a syllabus.
//!
//! Each helper takes the sequence by value and hands back the new one. Only
//! the touched element is rebuilt; every other element is moved through
//! untouched.

use crate::error::AppError;
use crate::models::{EvaluationCriterion, LearningUnit, Syllabus, Week};

/// Weeks (counted across all units) that are pre-filled as exam weeks.
const PARTIAL_EXAM_WEEK: usize = 9;
const FINAL_EXAM_WEEK: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("index {index} out of bounds for sequence of length {len}")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl From<IndexOutOfBounds> for AppError {
    fn from(e: IndexOutOfBounds) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

fn check_bounds(index: usize, len: usize) -> Result<(), IndexOutOfBounds> {
    if index < len {
        Ok(())
    } else {
        Err(IndexOutOfBounds { index, len })
    }
}

fn map_at<T>(items: Vec<T>, index: usize, f: impl FnOnce(T) -> T) -> Vec<T> {
    let mut f = Some(f);
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match f.take_if(|_| i == index) {
            Some(f) => f(item),
            None => item,
        })
        .collect()
}

fn without<T>(items: Vec<T>, index: usize) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| (i != index).then_some(item))
        .collect()
}

pub fn update_at<T>(
    items: Vec<T>,
    index: usize,
    f: impl FnOnce(T) -> T,
) -> Result<Vec<T>, IndexOutOfBounds> {
    check_bounds(index, items.len())?;
    Ok(map_at(items, index, f))
}

pub fn replace_at<T>(items: Vec<T>, index: usize, value: T) -> Result<Vec<T>, IndexOutOfBounds> {
    update_at(items, index, |_| value)
}

pub fn remove_at<T>(items: Vec<T>, index: usize) -> Result<Vec<T>, IndexOutOfBounds> {
    check_bounds(index, items.len())?;
    Ok(without(items, index))
}

pub fn push<T>(items: Vec<T>, value: T) -> Vec<T> {
    items.into_iter().chain(std::iter::once(value)).collect()
}

impl Syllabus {
    pub fn with_unit_added(self) -> Self {
        let unit = LearningUnit::new(self.learning_units.len() + 1);
        Self {
            learning_units: push(self.learning_units, unit),
            ..self
        }
    }

    pub fn with_unit_removed(self, unit: usize) -> Result<Self, IndexOutOfBounds> {
        Ok(Self {
            learning_units: remove_at(self.learning_units, unit)?,
            ..self
        })
    }

    pub fn with_unit_updated(
        self,
        unit: usize,
        f: impl FnOnce(LearningUnit) -> LearningUnit,
    ) -> Result<Self, IndexOutOfBounds> {
        Ok(Self {
            learning_units: update_at(self.learning_units, unit, f)?,
            ..self
        })
    }

    /// Appends a week to `unit`. The 9th and 18th week of the course come
    /// pre-filled as the partial and final exam.
    pub fn with_week_added(self, unit: usize) -> Result<Self, IndexOutOfBounds> {
        let week = match self.total_weeks() + 1 {
            PARTIAL_EXAM_WEEK => Week::new("Examen Parcial: evaluación de los conocimientos."),
            FINAL_EXAM_WEEK => Week::new("Examen Final: evaluación de los conocimientos."),
            _ => Week::default(),
        };
        self.with_unit_updated(unit, |u| LearningUnit {
            weeks: push(u.weeks, week),
            ..u
        })
    }

    pub fn with_week_removed(self, unit: usize, week: usize) -> Result<Self, IndexOutOfBounds> {
        self.check_week(unit, week)?;
        self.with_unit_updated(unit, |u| LearningUnit {
            weeks: without(u.weeks, week),
            ..u
        })
    }

    pub fn with_week_contents(
        self,
        unit: usize,
        week: usize,
        contents: &str,
    ) -> Result<Self, IndexOutOfBounds> {
        self.check_week(unit, week)?;
        self.with_unit_updated(unit, |u| LearningUnit {
            weeks: map_at(u.weeks, week, |_| Week::new(contents)),
            ..u
        })
    }

    fn check_week(&self, unit: usize, week: usize) -> Result<(), IndexOutOfBounds> {
        check_bounds(unit, self.learning_units.len())?;
        check_bounds(week, self.learning_units[unit].weeks.len())
    }

    /// Sets a unit's reference text. A changed reference drops the cached
    /// validation verdict, which described the old text.
    pub fn with_unit_reference(self, unit: usize, reference: &str) -> Result<Self, IndexOutOfBounds> {
        self.with_unit_updated(unit, |u| {
            let validation = if u.apa_reference == reference { u.validation } else { None };
            LearningUnit {
                apa_reference: reference.to_string(),
                validation,
                ..u
            }
        })
    }

    pub fn with_criterion_added(self, criterion: EvaluationCriterion) -> Self {
        Self {
            evaluation_criteria: push(self.evaluation_criteria, criterion),
            ..self
        }
    }

    pub fn with_criterion_removed(self, index: usize) -> Result<Self, IndexOutOfBounds> {
        Ok(Self {
            evaluation_criteria: remove_at(self.evaluation_criteria, index)?,
            ..self
        })
    }

    pub fn with_criterion_updated(
        self,
        index: usize,
        f: impl FnOnce(EvaluationCriterion) -> EvaluationCriterion,
    ) -> Result<Self, IndexOutOfBounds> {
        Ok(Self {
            evaluation_criteria: update_at(self.evaluation_criteria, index, f)?,
            ..self
        })
    }
}

/// Brings every unit's cached verdict in line with its reference text, using
/// `previous` as the last stored version of the same document.
///
/// A verdict survives when the unit at the same position kept its reference,
/// or when a stored unit with the same reference carried the same verdict, so
/// removing or reordering units does not discard verdicts that still hold.
pub fn drop_stale_validations(current: Syllabus, previous: &Syllabus) -> Syllabus {
    let units = current
        .learning_units
        .into_iter()
        .enumerate()
        .map(|(i, unit)| {
            let Some(verdict) = &unit.validation else {
                return unit;
            };
            let same_position = previous
                .learning_units
                .get(i)
                .is_some_and(|old| old.apa_reference == unit.apa_reference);
            let moved = previous.learning_units.iter().any(|old| {
                old.apa_reference == unit.apa_reference && old.validation.as_ref() == Some(verdict)
            });
            if same_position || moved {
                unit
            } else {
                LearningUnit { validation: None, ..unit }
            }
        })
        .collect();
    Syllabus {
        learning_units: units,
        ..current
    }
}
