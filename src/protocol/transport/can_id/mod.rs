//! Creation and decomposition of the 29-bit SAE J1939 identifiers.
//!
//! ```text
//! bits 26-28 priority | 25 reserved | 24 data page | 16-23 PDU format | 8-15 PDU specific | 0-7 source
//! ```
//!
//! PDU format < 240 (PDU1): PDU specific carries the destination address.
//! PDU format ≥ 240 (PDU2): PDU specific extends the PGN, the frame is broadcast.
use crate::error::CanIdBuildError;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier with J1939 accessors.
pub struct CanId(pub u32);

/// Lowest PDU format of the broadcast (PDU2) range.
pub const PDU2_THRESHOLD: u8 = 240;

/// `true` if `pgn` is addressed (PDU1).
#[inline]
pub const fn is_pdu1(pgn: u32) -> bool {
    (((pgn >> 8) & 0xFF) as u8) < PDU2_THRESHOLD
}

impl CanId {
    /// Builder pre-configured for a PGN and source address.
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Priority (3 bits).
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// PDU format byte.
    pub fn pdu_format(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// PDU specific byte (destination or group extension).
    pub fn pdu_specific(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// 18-bit PGN; the destination byte of PDU1 identifiers is zeroed.
    pub fn pgn(&self) -> u32 {
        let page = (self.0 >> 16) & 0x3FF;
        if self.pdu_format() < PDU2_THRESHOLD {
            page << 8
        } else {
            (page << 8) | self.pdu_specific() as u32
        }
    }

    /// Destination address for PDU1 identifiers, `None` for broadcast PGNs.
    pub fn destination(&self) -> Option<u8> {
        if self.pdu_format() < PDU2_THRESHOLD {
            Some(self.pdu_specific())
        } else {
            None
        }
    }

    /// Source address.
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug, Clone, Copy)]
/// Fluent builder enforcing the PDU1/PDU2 rules.
pub struct CanIdBuilder {
    pub priority: u8,
    pub pgn: u32,
    pub source_address: u8,
    pub destination: Option<u8>,
}

impl CanIdBuilder {
    /// Builder for `pgn` sent from `source_address`, priority 6.
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6,
            pgn,
            source_address,
            destination: None,
        }
    }

    /// Sets the priority (masked to 3 bits).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Assigns a destination address (PDU1).
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Builds the identifier:
    /// - PF < 240 → `destination` mandatory and PGN PS byte must be `0`
    /// - PF ≥ 240 → `destination` must not be provided
    pub fn build(self) -> Result<CanId, CanIdBuildError> {
        if self.pgn > 0x3FFFF {
            return Err(CanIdBuildError::PgnOutOfRange { pgn: self.pgn });
        }
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps = (self.pgn & 0xFF) as u8;
        let page = (self.pgn >> 16) & 0x03;

        let specific = match self.destination {
            None => {
                if pf < PDU2_THRESHOLD {
                    return Err(CanIdBuildError::InvalidForBroadcast);
                }
                ps
            }
            Some(da) => {
                if pf >= PDU2_THRESHOLD {
                    return Err(CanIdBuildError::InvalidForFocusedMessage { pf });
                }
                if ps != 0 {
                    return Err(CanIdBuildError::PsFocusMessageMustBeNull);
                }
                da
            }
        };

        Ok(CanId(
            ((self.priority as u32) << 26)
                | (page << 24)
                | ((pf as u32) << 16)
                | ((specific as u32) << 8)
                | self.source_address as u32,
        ))
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
