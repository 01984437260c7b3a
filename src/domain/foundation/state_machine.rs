//! Guarded transitions for the controller lifecycles.

use super::ValidationError;

/// A status enum whose moves are checked before they happen.
///
/// Controllers call `transition_to` and keep the old status on error, so an
/// out-of-order completion can never push a view into an impossible state.
pub trait StateMachine: Sized + Copy + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(ValidationError::IllegalTransition {
            from: format!("{:?}", self),
            to: format!("{:?}", target),
        })
    }
}
