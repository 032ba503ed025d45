use crate::address::Address;

/// Length of the hub-verified signature at the front of the approval blob.
pub const HUB_SIGNATURE_LEN: usize = 65;

/// Parameters of a relayed call, handed to the pre-call callback.
///
/// Built by the hub for one relayed call and discarded after the post-call
/// callback returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// The relay submitting the call to the hub
    pub relay: Address,
    /// The originator whose intent the call represents
    pub originator: Address,
    /// The encoded function call, without the originator suffix
    pub encoded_function: Vec<u8>,
    /// Gas price the relay is charging
    pub gas_price: u64,
    /// Relay fee rate, as a percentage on top of gas cost
    pub fee_rate: u64,
    /// Signature and recipient-specific authorization data
    pub approval: ApprovalData,
}

/// Parameters handed to the post-call callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResult {
    /// The relay that submitted the call
    pub relay: Address,
    /// The originator whose intent the call represented
    pub originator: Address,
    /// The encoded function call, without the originator suffix
    pub encoded_function: Vec<u8>,
    /// Whether the business call completed without reverting
    pub success: bool,
    /// Gas consumed by the relayed call
    pub used_gas: u64,
    /// Relay fee rate, as a percentage on top of gas cost
    pub fee_rate: u64,
}

impl RelayResult {
    /// Builds the post-call parameters for a request.
    pub fn for_request(request: &RelayRequest, success: bool, used_gas: u64) -> Self {
        Self {
            relay: request.relay,
            originator: request.originator,
            encoded_function: request.encoded_function.clone(),
            success,
            used_gas,
            fee_rate: request.fee_rate,
        }
    }
}

/// The approval blob of a relayed request.
///
/// The first [`HUB_SIGNATURE_LEN`] bytes belong to the hub's signature
/// check. Whatever follows is opaque to this crate and is handed to the
/// recipient's policy untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApprovalData(Vec<u8>);

impl ApprovalData {
    /// Wraps a raw approval blob.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the whole blob.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the hub's signature, or `None` if the blob is too short to hold one.
    pub fn hub_signature(&self) -> Option<&[u8]> {
        self.0.get(..HUB_SIGNATURE_LEN)
    }

    /// Returns the bytes after the hub's signature.
    ///
    /// Empty when the blob holds a signature only, or less.
    pub fn recipient_data(&self) -> &[u8] {
        self.0.get(HUB_SIGNATURE_LEN..).unwrap_or(&[])
    }
}

impl From<Vec<u8>> for ApprovalData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
