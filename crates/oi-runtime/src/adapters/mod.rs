//! # Adapters
//!
//! HTTP implementations of the subsystems' outbound ports.
//!
//! - `OrdinalsBotClient` - `InscriptionServiceClient`
//! - `MempoolFeeClient` - `FeeRateSource`
//! - `HttpIdentityProvider` - `IdentityProvider`

pub mod identity;
pub mod mempool_fees;
pub mod ordinalsbot;

pub use identity::HttpIdentityProvider;
pub use mempool_fees::MempoolFeeClient;
pub use ordinalsbot::{map_wire_state, OrdinalsBotClient};

/// Longest upstream error body kept in a `RemoteError::Status`.
pub const MAX_ERROR_BODY: usize = 512;

/// Cut `body` to at most `MAX_ERROR_BODY` bytes on a char boundary.
pub(crate) fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
