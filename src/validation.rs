//! # Input Validation
//!
//! Boundary validation for request payloads. All checks run before any state
//! change so a validation failure never leaves partial writes behind.

use crate::error::{CoreError, Result};
use crate::models::StepTemplate;

/// Maximum length for titles and labels
const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for free-text summaries and notes
const MAX_TEXT_LENGTH: usize = 5000;

/// Maximum number of steps a single workflow template may carry
const MAX_TEMPLATE_STEPS: usize = 50;

/// Validate a category slug against `^[a-z][a-z0-9_]*$`.
pub fn validate_slug(value: &str) -> Result<()> {
    let mut chars = value.chars();
    let valid_head = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_tail = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid_head && valid_tail {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "slug '{value}' must match ^[a-z][a-z0-9_]*$"
        )))
    }
}

/// Validate a human-facing title or label: non-blank, bounded length.
pub fn validate_title(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{field} must not be blank")));
    }
    if value.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::InvalidInput(format!(
            "{field} too long: {} chars (max: {MAX_TITLE_LENGTH})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate optional free text (summaries, notes).
pub fn validate_text(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(text) = value {
        if text.len() > MAX_TEXT_LENGTH {
            return Err(CoreError::InvalidInput(format!(
                "{field} too long: {} chars (max: {MAX_TEXT_LENGTH})",
                text.len()
            )));
        }
    }
    Ok(())
}

/// Validate an SLA warning threshold percentage.
pub fn validate_warning_threshold(percent: i32) -> Result<()> {
    if (1..=100).contains(&percent) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "warning threshold must be 1-100, got {percent}"
        )))
    }
}

/// Validate a template's step list: non-empty, bounded, titles present, and
/// sequence numbers contiguous from 1.
pub fn validate_step_templates(steps: &[StepTemplate]) -> Result<()> {
    if steps.is_empty() {
        return Err(CoreError::InvalidInput(
            "workflow template requires at least one step".to_string(),
        ));
    }
    if steps.len() > MAX_TEMPLATE_STEPS {
        return Err(CoreError::InvalidInput(format!(
            "too many steps: {} (max: {MAX_TEMPLATE_STEPS})",
            steps.len()
        )));
    }

    let mut sequences: Vec<i32> = steps.iter().map(|s| s.sequence).collect();
    sequences.sort_unstable();
    for (index, sequence) in sequences.iter().enumerate() {
        let expected = i32::try_from(index).unwrap_or(i32::MAX) + 1;
        if *sequence != expected {
            return Err(CoreError::InvalidInput(format!(
                "step sequences must be contiguous from 1; expected {expected}, got {sequence}"
            )));
        }
    }

    for step in steps {
        validate_title("step title", &step.title)?;
        validate_text("step description", step.description.as_deref())?;
        if let Some(minutes) = step.estimated_minutes {
            if minutes <= 0 {
                return Err(CoreError::InvalidInput(format!(
                    "estimated minutes must be positive, got {minutes}"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(sequence: i32, title: &str) -> StepTemplate {
        StepTemplate {
            sequence,
            title: title.to_string(),
            description: None,
            required: true,
            estimated_minutes: None,
        }
    }

    #[test]
    fn test_slug_shape() {
        assert!(validate_slug("water").is_ok());
        assert!(validate_slug("road_repair2").is_ok());
        assert!(validate_slug("Water").is_err());
        assert!(validate_slug("2roads").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("water-supply").is_err());
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("title", "Pipe leak near bus stand").is_ok());
        assert!(validate_title("title", "   ").is_err());
        assert!(validate_title("title", &"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_step_sequences_contiguous() {
        assert!(validate_step_templates(&[step(1, "a"), step(2, "b"), step(3, "c")]).is_ok());
        // gap
        assert!(validate_step_templates(&[step(1, "a"), step(3, "c")]).is_err());
        // duplicate
        assert!(validate_step_templates(&[step(1, "a"), step(1, "b")]).is_err());
        // zero-based
        assert!(validate_step_templates(&[step(0, "a"), step(1, "b")]).is_err());
        // empty
        assert!(validate_step_templates(&[]).is_err());
    }

    #[test]
    fn test_step_estimated_minutes_positive() {
        let mut bad = step(1, "a");
        bad.estimated_minutes = Some(0);
        assert!(validate_step_templates(&[bad]).is_err());
    }
}
