//! # Domain Entities
//!
//! The remote snapshot and the local order built from it.

use serde::{Deserialize, Serialize};

use super::value_objects::{Charge, FeeRate, FileStatus, OrderId, OrderState};

/// Full order state as reported by the inscription service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrderSnapshot {
    /// Order identifier.
    pub id: OrderId,
    /// Lifecycle state (already mapped from the wire status).
    pub state: OrderState,
    /// Payment details, once the service has assigned them.
    pub charge: Option<Charge>,
    /// Per-file status in submission order.
    pub files: Vec<FileStatus>,
    /// Address inscriptions are delivered to.
    pub receive_address: Option<String>,
    /// Fee rate the order was placed with.
    pub fee_rate: Option<FeeRate>,
}

impl RemoteOrderSnapshot {
    /// Minimal snapshot in `state` with no charge or files.
    pub fn new(id: impl Into<String>, state: OrderState) -> Self {
        Self {
            id: OrderId::new(id),
            state,
            charge: None,
            files: Vec::new(),
            receive_address: None,
            fee_rate: None,
        }
    }

    /// Attach payment details.
    pub fn with_charge(mut self, address: impl Into<String>, amount_sats: u64) -> Self {
        self.charge = Some(Charge {
            address: address.into(),
            amount_sats,
        });
        self
    }

    /// Append a file status.
    pub fn with_file(mut self, file: FileStatus) -> Self {
        self.files.push(file);
        self
    }
}

/// Local view of a submitted order.
///
/// Built only by [`apply`](super::state_machine::apply), always wholesale
/// from the latest snapshot. Never patched field by field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InscriptionOrder {
    pub(crate) id: OrderId,
    pub(crate) state: OrderState,
    pub(crate) charge: Option<Charge>,
    pub(crate) files: Vec<FileStatus>,
    pub(crate) receive_address: Option<String>,
    pub(crate) fee_rate: Option<FeeRate>,
}

impl InscriptionOrder {
    pub(crate) fn from_snapshot(snapshot: RemoteOrderSnapshot) -> Self {
        Self {
            id: snapshot.id,
            state: snapshot.state,
            charge: snapshot.charge,
            files: snapshot.files,
            receive_address: snapshot.receive_address,
            fee_rate: snapshot.fee_rate,
        }
    }

    /// Order identifier.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Lifecycle state.
    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Payment details, if assigned.
    pub fn charge(&self) -> Option<&Charge> {
        self.charge.as_ref()
    }

    /// Deposit address the service expects payment to.
    pub fn charge_address(&self) -> Option<&str> {
        self.charge.as_ref().map(|c| c.address.as_str())
    }

    /// Per-file status.
    pub fn files(&self) -> &[FileStatus] {
        &self.files
    }

    /// Delivery address.
    pub fn receive_address(&self) -> Option<&str> {
        self.receive_address.as_deref()
    }

    /// Fee rate the order was placed with.
    pub fn fee_rate(&self) -> Option<FeeRate> {
        self.fee_rate
    }

    /// Whether polling can stop.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Inscription ids of every inscribed file.
    pub fn inscription_ids(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter_map(|f| f.inscription_id.as_deref())
            .collect()
    }
}
