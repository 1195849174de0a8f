//! Visibility observation primitive

use crate::types::ElementId;

/// One intersection change reported by the observation session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    /// Element whose intersection changed
    pub target: ElementId,
    /// Fraction of the element currently intersecting the root
    pub ratio: f64,
    /// Whether the element currently intersects the root
    pub is_intersecting: bool,
}

impl VisibilityEvent {
    /// Event for an element entering the root.
    pub fn entering(target: ElementId, ratio: f64) -> Self {
        Self {
            target,
            ratio,
            is_intersecting: true,
        }
    }

    /// Event for an element leaving the root.
    pub fn leaving(target: ElementId) -> Self {
        Self {
            target,
            ratio: 0.0,
            is_intersecting: false,
        }
    }
}

/// Subscription side of an observation session
///
/// Sessions push batches of [`VisibilityEvent`]s asynchronously to whoever
/// owns the coordinator. Registration and removal are explicit.
pub trait VisibilityObserver {
    /// Start reporting intersection changes for `element`.
    fn observe(&mut self, element: ElementId);

    /// Stop reporting for `element`. Unknown elements are ignored.
    fn unobserve(&mut self, element: ElementId);

    /// Stop reporting for every element and release the session.
    fn disconnect(&mut self);
}
