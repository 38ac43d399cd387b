//! Protocol constants shared by the bus, the J1939 layer and the serial codecs.

//==================================================================================J1939_ADDRESSES
/// Address meaning "no address": a gateway that lost arbitration everywhere
/// ends up here and must not transmit.
pub const NULL_ADDRESS: u8 = 0xFF;
/// Global destination address.
pub const BROADCAST_ADDRESS: u8 = 0xFF;
/// Lowest address a claiming gateway may move to.
pub const MIN_CLAIMABLE_ADDRESS: u8 = 1;
/// Highest address a claiming gateway may move to.
pub const MAX_CLAIMABLE_ADDRESS: u8 = 254;

//==================================================================================J1939_PGNS
/// ISO Address Claim (60928).
pub const ADDRESS_CLAIM_PGN: u32 = 0xEE00;
/// ISO Request (59904); PDU format byte `0xEA`.
pub const REQUEST_PGN: u32 = 0xEA00;
/// PDU format byte of the ISO Request.
pub const REQUEST_PDU_FORMAT: u8 = 0xEA;
/// Proprietary A: point-to-point event transport, outbound.
pub const EVENT_TX_PGN: u32 = 0xEF00;
/// PGN accepted by the event adapter for inbound events.
pub const EVENT_RX_PGN: u32 = 0xFF00;
/// Priority used for claim and request frames.
pub const DEFAULT_PRIORITY: u8 = 6;
/// Contention window after sending an address claim.
pub const ADDRESS_CLAIM_TIMEOUT_MS: u64 = 250;

//==================================================================================FRAMES
/// Classic CAN payload capacity.
pub const CAN_MAX_DLC: usize = 8;
/// Bytes of payload carried by an [`Event`](crate::protocol::message::Event).
pub const EVENT_DATA_LEN: usize = 6;
/// Wire size of an encoded event (subsystem + id + payload).
pub const EVENT_WIRE_LEN: usize = 8;
/// Filler for unused event payload bytes.
pub const EVENT_PADDING: u8 = 0xFF;
