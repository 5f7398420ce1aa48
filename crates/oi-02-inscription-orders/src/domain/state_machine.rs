//! # Order State Machine
//!
//! Pure reducer from remote snapshots to local orders.
//!
//! ## Transition Rules
//!
//! | Current | Snapshot | Result |
//! |---------|----------|--------|
//! | none | any | order built from snapshot |
//! | any, other id | any | `OrderIdMismatch` |
//! | any | `Failed` | accepted |
//! | `Created` | `Created` | accepted |
//! | later state | `Created` | `StaleSnapshot` |
//! | terminal | different state | `StaleSnapshot` |
//! | non-terminal | earlier state | accepted, logged |
//! | non-terminal | same or later | accepted |
//!
//! The remote service is authoritative, so a backwards move between two
//! non-terminal phases is taken as-is. Only moves that cannot come from a
//! single order's real history are refused.

use tracing::warn;

use super::entities::{InscriptionOrder, RemoteOrderSnapshot};
use super::errors::OrderError;
use super::value_objects::OrderState;

/// Apply `snapshot` on top of `current`.
///
/// The result is rebuilt from `snapshot` alone; `current` is only used to
/// check that the move is legal.
pub fn apply(
    current: Option<&InscriptionOrder>,
    snapshot: RemoteOrderSnapshot,
) -> Result<InscriptionOrder, OrderError> {
    if let Some(current) = current {
        check_transition(current, &snapshot)?;
    }
    Ok(InscriptionOrder::from_snapshot(snapshot))
}

fn check_transition(
    current: &InscriptionOrder,
    snapshot: &RemoteOrderSnapshot,
) -> Result<(), OrderError> {
    if current.id != snapshot.id {
        return Err(OrderError::OrderIdMismatch {
            expected: current.id.clone(),
            actual: snapshot.id.clone(),
        });
    }

    let stale = || OrderError::StaleSnapshot {
        current: current.state,
        incoming: snapshot.state,
    };

    match (current.state, snapshot.state) {
        (_, OrderState::Failed) => Ok(()),
        (OrderState::Created, OrderState::Created) => Ok(()),
        (_, OrderState::Created) => Err(stale()),
        (from, to) if from.is_terminal() && from != to => Err(stale()),
        (from, to) => {
            if let (Some(a), Some(b)) = (from.progress(), to.progress()) {
                if b < a {
                    warn!(
                        "[oi-02] Order {} moved back from {} to {}; taking remote state",
                        current.id, from, to
                    );
                }
            }
            Ok(())
        }
    }
}
