//! Consistency checks for visit records.
//!
//! The calculator accepts anything and clamps; this module is for callers
//! that would rather reject a malformed timeline before storing it.

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::visit::Visit;

/// Validate a visit's timeline, headcount and products.
///
/// Checks, in order:
/// - `end_time` is not before `start_time`;
/// - each pause starts within the visit and ends after it starts;
/// - pauses are ordered and do not overlap;
/// - only the last pause may be open, and only while the visit is open;
/// - each pause ends no later than the effective end (`end_time` or `now`);
/// - headcount is at least one;
/// - product prices are finite and non-negative.
pub fn validate_visit(visit: &Visit, now: Timestamp) -> Result<(), CoreError> {
    let effective_end = visit.effective_end(now);

    if let Some(end) = visit.end_time {
        if end < visit.start_time {
            return Err(CoreError::Validation(format!(
                "Visit {} ends at {end}, before it starts at {}",
                visit.id, visit.start_time
            )));
        }
    }

    let last_index = visit.pause_history.len().saturating_sub(1);
    let mut previous_end: Option<Timestamp> = None;

    for (index, pause) in visit.pause_history.iter().enumerate() {
        if pause.start_time < visit.start_time || pause.start_time > effective_end {
            return Err(CoreError::Validation(format!(
                "Pause #{index} starts at {}, outside the visit",
                pause.start_time
            )));
        }

        if let Some(prev) = previous_end {
            if pause.start_time < prev {
                return Err(CoreError::Validation(format!(
                    "Pause #{index} starts at {}, overlapping the previous pause ending at {prev}",
                    pause.start_time
                )));
            }
        }

        match pause.end_time {
            Some(end) => {
                if end < pause.start_time {
                    return Err(CoreError::Validation(format!(
                        "Pause #{index} ends at {end}, before it starts at {}",
                        pause.start_time
                    )));
                }
                if end > effective_end {
                    return Err(CoreError::Validation(format!(
                        "Pause #{index} ends at {end}, after the visit ends at {effective_end}"
                    )));
                }
                previous_end = Some(end);
            }
            None => {
                if index != last_index {
                    return Err(CoreError::Validation(format!(
                        "Pause #{index} is open but is not the latest pause"
                    )));
                }
                if visit.end_time.is_some() {
                    return Err(CoreError::Validation(format!(
                        "Pause #{index} is still open on an ended visit"
                    )));
                }
            }
        }
    }

    if visit.number_of_people == 0 {
        return Err(CoreError::Validation(
            "Number of people must be at least 1".to_string(),
        ));
    }

    if let Some(line) = visit
        .products
        .iter()
        .find(|p| !p.unit_price.is_finite() || p.unit_price < 0.0)
    {
        return Err(CoreError::Validation(format!(
            "Product {} has invalid unit price {}",
            line.product_id, line.unit_price
        )));
    }

    Ok(())
}
