use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// States of the [`super::Order`] lifecycle state machine.
///
/// Transitions are driven by applying an [`OrderEventKind`](crate::event::OrderEventKind) via
/// [`super::Order::apply`]. An illegal transition is reported as [`InvalidTransition`] and leaves
/// the order's state unchanged.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
pub enum OrderState {
    Initialized,
    Submitted,
    Accepted,
    Working,
    PartiallyFilled,
    Filled,
    Cancelled,
    Expired,
    Rejected,
    Denied,
    Invalid,
}

impl OrderState {
    /// Whether this state is terminal - no further transitions are ever legal.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderState::Filled
                | OrderState::Cancelled
                | OrderState::Expired
                | OrderState::Rejected
                | OrderState::Denied
                | OrderState::Invalid
        )
    }

    /// Returns the resulting [`OrderState`] for a `trigger`, or `None` if the transition from
    /// `self` on `trigger` is illegal.
    fn transition(self, trigger: OrderTrigger) -> Option<OrderState> {
        use OrderState::*;
        use OrderTrigger::*;

        match (self, trigger) {
            (Initialized, Submit) => Some(Submitted),

            (Submitted, Accept) => Some(Accepted),
            (Submitted, Reject) => Some(Rejected),

            (Accepted, Work) => Some(Working),
            // Some venues accept straight into a workable state without a distinct WORKING event.
            (Accepted, Fill { remaining_zero: true }) => Some(Filled),
            (Accepted, Fill { remaining_zero: false }) => Some(PartiallyFilled),
            (Accepted, Cancel) => Some(Cancelled),
            (Accepted, Expire) => Some(Expired),
            (Accepted, Deny) => Some(Denied),
            (Accepted, Invalidate) => Some(Invalid),

            (Working, Fill { remaining_zero: true }) => Some(Filled),
            (Working, Fill { remaining_zero: false }) => Some(PartiallyFilled),
            (Working, Cancel) => Some(Cancelled),
            (Working, Expire) => Some(Expired),
            (Working, Deny) => Some(Denied),
            (Working, Invalidate) => Some(Invalid),

            (PartiallyFilled, Fill { remaining_zero: true }) => Some(Filled),
            (PartiallyFilled, Fill { remaining_zero: false }) => Some(PartiallyFilled),
            (PartiallyFilled, Cancel) => Some(Cancelled),
            (PartiallyFilled, Expire) => Some(Expired),
            (PartiallyFilled, Deny) => Some(Denied),
            (PartiallyFilled, Invalidate) => Some(Invalid),

            _ => None,
        }
    }

    /// Applies `trigger`, returning the new state on success. On an illegal transition, `self`
    /// is returned unchanged alongside an [`InvalidTransition`] error describing what was
    /// attempted.
    pub fn apply(self, trigger: OrderTrigger) -> Result<OrderState, InvalidTransition> {
        self.transition(trigger).ok_or(InvalidTransition {
            from: self,
            trigger,
        })
    }
}

/// Drives an [`OrderState`] transition. Constructed by [`super::Order::apply`] from an inbound
/// `OrderEventKind`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum OrderTrigger {
    Submit,
    Accept,
    Work,
    Fill { remaining_zero: bool },
    Cancel,
    Expire,
    Reject,
    Deny,
    Invalidate,
}

/// Reported (logged) when an [`OrderState`] transition is illegal; the order is left unchanged.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("illegal order state transition: {from} cannot apply {trigger:?}")]
pub struct InvalidTransition {
    pub from: OrderState,
    pub trigger: OrderTrigger,
}
