//! 64-bit J1939 NAME: identity and arbitration priority of a device during
//! address claim. A lower raw value wins.
//!
//! # Bit layout (transmitted little endian)
//!
//! ```text
//! Bits  0-20  (21 bits) : Identity number
//! Bits 21-31  (11 bits) : Manufacturer code
//! Bits 32-34  ( 3 bits) : ECU instance
//! Bits 35-39  ( 5 bits) : Function instance
//! Bits 40-47  ( 8 bits) : Function
//! Bit  48     ( 1 bit ) : Reserved
//! Bits 49-55  ( 7 bits) : Vehicle system
//! Bits 56-59  ( 4 bits) : Vehicle system instance
//! Bits 60-62  ( 3 bits) : Industry group
//! Bit  63     ( 1 bit ) : Arbitrary Address Capable
//! ```
use core::fmt;

/// On-highway equipment industry group.
pub const INDUSTRY_GROUP_ON_HIGHWAY: u8 = 1;

const AAC_BIT: u64 = 1 << 63;

/// Typed NAME.
///
/// # Example
///
/// ```
/// use canbridge::protocol::j1939::iso_name::IsoName;
///
/// let name = IsoName::builder()
///     .identity_number(0x1234)
///     .manufacturer_code(0x7FF)
///     .function(0x81)
///     .arbitrary_address_capable(true)
///     .build();
///
/// assert_eq!(name.identity_number(), 0x1234);
/// assert!(name.is_arbitrary_address_capable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IsoName(u64);

impl IsoName {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn builder() -> IsoNameBuilder {
        IsoNameBuilder::new()
    }

    /// Claim-frame payload.
    #[inline]
    pub const fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    #[inline]
    pub const fn identity_number(&self) -> u32 {
        (self.0 & 0x1F_FFFF) as u32
    }

    #[inline]
    pub const fn manufacturer_code(&self) -> u16 {
        ((self.0 >> 21) & 0x7FF) as u16
    }

    #[inline]
    pub const fn ecu_instance(&self) -> u8 {
        ((self.0 >> 32) & 0x07) as u8
    }

    #[inline]
    pub const fn function_instance(&self) -> u8 {
        ((self.0 >> 35) & 0x1F) as u8
    }

    #[inline]
    pub const fn function(&self) -> u8 {
        ((self.0 >> 40) & 0xFF) as u8
    }

    #[inline]
    pub const fn vehicle_system(&self) -> u8 {
        ((self.0 >> 49) & 0x7F) as u8
    }

    #[inline]
    pub const fn vehicle_system_instance(&self) -> u8 {
        ((self.0 >> 56) & 0x0F) as u8
    }

    #[inline]
    pub const fn industry_group(&self) -> u8 {
        ((self.0 >> 60) & 0x07) as u8
    }

    /// Bit 63: the device may move to another address after losing a claim.
    #[inline]
    pub const fn is_arbitrary_address_capable(&self) -> bool {
        self.0 & AAC_BIT != 0
    }

    /// `true` if `self` keeps a contested address against `other`; a tie keeps it.
    #[inline]
    pub const fn wins_against(&self, other: &IsoName) -> bool {
        self.0 <= other.0
    }
}

impl From<u64> for IsoName {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<IsoName> for u64 {
    #[inline]
    fn from(name: IsoName) -> Self {
        name.raw()
    }
}

impl fmt::Display for IsoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NAME {:#018X} (id {}, mfg {}, fn {}, aac {})",
            self.0,
            self.identity_number(),
            self.manufacturer_code(),
            self.function(),
            self.is_arbitrary_address_capable()
        )
    }
}

//==================================================================================BUILDER
/// Field-by-field NAME construction. Values wider than their field are masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoNameBuilder {
    raw: u64,
}

impl IsoNameBuilder {
    #[inline]
    pub const fn new() -> Self {
        Self { raw: 0 }
    }

    #[inline]
    const fn field(mut self, shift: u32, mask: u64, value: u64) -> Self {
        self.raw = (self.raw & !(mask << shift)) | ((value & mask) << shift);
        self
    }

    #[inline]
    pub const fn identity_number(self, value: u32) -> Self {
        self.field(0, 0x1F_FFFF, value as u64)
    }

    #[inline]
    pub const fn manufacturer_code(self, value: u16) -> Self {
        self.field(21, 0x7FF, value as u64)
    }

    #[inline]
    pub const fn ecu_instance(self, value: u8) -> Self {
        self.field(32, 0x07, value as u64)
    }

    #[inline]
    pub const fn function_instance(self, value: u8) -> Self {
        self.field(35, 0x1F, value as u64)
    }

    #[inline]
    pub const fn function(self, value: u8) -> Self {
        self.field(40, 0xFF, value as u64)
    }

    #[inline]
    pub const fn vehicle_system(self, value: u8) -> Self {
        self.field(49, 0x7F, value as u64)
    }

    #[inline]
    pub const fn vehicle_system_instance(self, value: u8) -> Self {
        self.field(56, 0x0F, value as u64)
    }

    #[inline]
    pub const fn industry_group(self, value: u8) -> Self {
        self.field(60, 0x07, value as u64)
    }

    #[inline]
    pub const fn arbitrary_address_capable(self, value: bool) -> Self {
        self.field(63, 0x01, value as u64)
    }

    #[inline]
    pub const fn build(self) -> IsoName {
        IsoName(self.raw)
    }
}
