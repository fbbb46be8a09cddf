//! Visit lifecycle transitions: check-in, pause, resume, check-out,
//! administrative time correction, and product adjustments.
//!
//! Transitions mutate a [`Visit`] value in place; persisting the result is
//! the caller's job. The state machine is:
//!
//! ```text
//! Ongoing --pause--> Paused --resume--> Ongoing
//! Ongoing | Paused --check_out--> Ended
//! ```

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::visit::{PauseInterval, ProductLine, RoomTier, Visit, VisitStatus};

impl Visit {
    /// Open a new visit at `now` with a freshly generated id.
    pub fn check_in(now: Timestamp, number_of_people: u32, room_tier: RoomTier) -> Self {
        let visit = Visit::new(Uuid::now_v7(), now)
            .with_people(number_of_people)
            .with_tier(room_tier);
        tracing::debug!(
            visit_id = %visit.id,
            number_of_people = visit.number_of_people,
            room_tier = visit.room_tier.label(),
            "Visit checked in",
        );
        visit
    }
}

// ---------------------------------------------------------------------------
// Time transitions
// ---------------------------------------------------------------------------

/// Start a pause at `at`. Only an ongoing visit can be paused.
pub fn pause(visit: &mut Visit, at: Timestamp) -> Result<(), CoreError> {
    require_status(visit, VisitStatus::Ongoing, "pause")?;
    require_not_before_last_event(visit, at)?;

    visit.pause_history.push(PauseInterval::open(at));
    tracing::debug!(visit_id = %visit.id, %at, "Visit paused");
    Ok(())
}

/// Close the open pause at `at`. Only a paused visit can be resumed.
pub fn resume(visit: &mut Visit, at: Timestamp) -> Result<(), CoreError> {
    require_status(visit, VisitStatus::Paused, "resume")?;
    require_not_before_last_event(visit, at)?;

    if let Some(open) = visit.pause_history.last_mut() {
        open.end_time = Some(at);
    }
    tracing::debug!(visit_id = %visit.id, %at, "Visit resumed");
    Ok(())
}

/// End the visit at `at`, closing an open pause at the same instant.
pub fn check_out(visit: &mut Visit, at: Timestamp) -> Result<(), CoreError> {
    if visit.status() == VisitStatus::Ended {
        return Err(CoreError::Conflict(format!(
            "Visit {} has already ended",
            visit.id
        )));
    }
    require_not_before_last_event(visit, at)?;

    if let Some(open) = visit.pause_history.last_mut().filter(|p| p.is_open()) {
        open.end_time = Some(at);
    }
    visit.end_time = Some(at);
    tracing::debug!(visit_id = %visit.id, %at, "Visit checked out");
    Ok(())
}

/// Administrative override of the visit's start and end times.
///
/// Allowed in any state. Pause history is left untouched; use
/// [`validate_visit`](crate::validation::validate_visit) afterwards if the
/// corrected times must still contain every pause.
pub fn correct_times(
    visit: &mut Visit,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
) -> Result<(), CoreError> {
    if let Some(end) = end_time {
        if end < start_time {
            return Err(CoreError::Validation(format!(
                "End time {end} is before start time {start_time}"
            )));
        }
    }
    tracing::debug!(
        visit_id = %visit.id,
        old_start = %visit.start_time,
        new_start = %start_time,
        "Visit times corrected",
    );
    visit.start_time = start_time;
    visit.end_time = end_time;
    Ok(())
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Add a product line, merging with an existing line for the same product
/// at the same unit price.
pub fn add_product(visit: &mut Visit, line: ProductLine) -> Result<(), CoreError> {
    if line.quantity == 0 {
        return Err(CoreError::Validation(format!(
            "Quantity for product {} must be at least 1",
            line.product_id
        )));
    }
    if !line.unit_price.is_finite() || line.unit_price < 0.0 {
        return Err(CoreError::Validation(format!(
            "Unit price for product {} must be a non-negative amount, got {}",
            line.product_id, line.unit_price
        )));
    }

    match visit
        .products
        .iter_mut()
        .find(|p| p.product_id == line.product_id && p.unit_price == line.unit_price)
    {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
        None => visit.products.push(line),
    }
    Ok(())
}

/// Remove `quantity` units of `product_id`, dropping lines that reach zero.
///
/// Units are taken from the most recently added lines first.
pub fn remove_product(
    visit: &mut Visit,
    product_id: &str,
    quantity: u32,
) -> Result<(), CoreError> {
    if quantity == 0 {
        return Err(CoreError::Validation(format!(
            "Quantity to remove for product {product_id} must be at least 1"
        )));
    }
    let available: u32 = visit
        .products
        .iter()
        .filter(|p| p.product_id == product_id)
        .map(|p| p.quantity)
        .sum();
    if available == 0 {
        return Err(CoreError::NotFound {
            entity: "product",
            id: product_id.to_string(),
        });
    }
    if quantity > available {
        return Err(CoreError::Validation(format!(
            "Cannot remove {quantity} of product {product_id}, only {available} on the visit"
        )));
    }

    let mut remaining = quantity;
    for line in visit
        .products
        .iter_mut()
        .rev()
        .filter(|p| p.product_id == product_id)
    {
        let taken = remaining.min(line.quantity);
        line.quantity -= taken;
        remaining -= taken;
        if remaining == 0 {
            break;
        }
    }
    visit.products.retain(|p| p.quantity > 0);
    Ok(())
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn require_status(visit: &Visit, expected: VisitStatus, action: &str) -> Result<(), CoreError> {
    let current = visit.status();
    if current != expected {
        return Err(CoreError::Conflict(format!(
            "Cannot {action} visit {}: it is {}",
            visit.id,
            current.label()
        )));
    }
    Ok(())
}

/// Latest timestamp recorded on the visit.
fn last_event(visit: &Visit) -> Timestamp {
    visit
        .pause_history
        .iter()
        .map(|p| p.end_time.unwrap_or(p.start_time))
        .fold(visit.start_time, Timestamp::max)
}

fn require_not_before_last_event(visit: &Visit, at: Timestamp) -> Result<(), CoreError> {
    let last = last_event(visit);
    if at < last {
        return Err(CoreError::Validation(format!(
            "Timestamp {at} is earlier than the last recorded event at {last}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
