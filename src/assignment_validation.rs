use crate::assignment::Assignment;
use std::collections::HashSet;
use std::fmt;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct AssignmentValidationError {
    message: String,
}

impl AssignmentValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AssignmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AssignmentValidationError {}

pub fn validate_assignment(assignment: &Assignment) -> Result<(), AssignmentValidationError> {
    if let Some(ratio) = assignment.ratio {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 + EPSILON {
            return Err(AssignmentValidationError::new(format!(
                "assignment {} has ratio {} outside (0, 1]",
                assignment.id, ratio
            )));
        }
    }

    if let Some(name) = &assignment.developer_name {
        if name.trim().is_empty() {
            return Err(AssignmentValidationError::new(format!(
                "assignment {} has an empty developer name",
                assignment.id
            )));
        }
    }

    Ok(())
}

pub fn validate_assignment_collection(
    assignments: &[Assignment],
) -> Result<(), AssignmentValidationError> {
    let mut seen_ids = HashSet::with_capacity(assignments.len());
    for assignment in assignments {
        if !seen_ids.insert(assignment.id) {
            return Err(AssignmentValidationError::new(format!(
                "duplicate assignment id {}",
                assignment.id
            )));
        }
        validate_assignment(assignment)?;
    }
    Ok(())
}
