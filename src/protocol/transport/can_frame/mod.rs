//! In-memory representation of a classic CAN 2.0 frame (standard or extended).
use crate::core::CAN_MAX_DLC;
use embedded_can::{ExtendedId, Id, StandardId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from or written to a CAN controller. The payload is opaque
/// to the bus; subsystem decoders interpret it.
pub struct CanFrame {
    /// 11-bit or 29-bit identifier, right aligned.
    pub id: u32,
    /// `true` for a 29-bit identifier.
    pub extended: bool,
    /// Remote transmission request.
    pub remote: bool,
    /// Data Length Code (0 to 8).
    pub dlc: u8,
    /// Payload buffer; bytes past `dlc` are meaningless.
    pub data: [u8; CAN_MAX_DLC],
}

impl CanFrame {
    /// Standard (11-bit) data frame. Extra payload bytes beyond 8 are cut.
    pub fn standard(id: u16, data: &[u8]) -> Self {
        Self::with_id(id as u32 & 0x7FF, false, data)
    }

    /// Extended (29-bit) data frame. Extra payload bytes beyond 8 are cut.
    pub fn extended(id: u32, data: &[u8]) -> Self {
        Self::with_id(id & 0x1FFF_FFFF, true, data)
    }

    fn with_id(id: u32, extended: bool, data: &[u8]) -> Self {
        let len = data.len().min(CAN_MAX_DLC);
        let mut buffer = [0u8; CAN_MAX_DLC];
        buffer[..len].copy_from_slice(&data[..len]);
        Self {
            id,
            extended,
            remote: false,
            dlc: len as u8,
            data: buffer,
        }
    }

    /// Populated payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..(self.dlc as usize).min(CAN_MAX_DLC)]
    }

    /// Copy any `embedded_can` frame into a `CanFrame`.
    pub fn from_frame<F: embedded_can::Frame>(frame: &F) -> Self {
        let mut converted = match frame.id() {
            Id::Standard(id) => Self::standard(id.as_raw(), frame.data()),
            Id::Extended(id) => Self::extended(id.as_raw(), frame.data()),
        };
        if frame.is_remote_frame() {
            converted.remote = true;
            converted.dlc = frame.dlc().min(CAN_MAX_DLC) as u8;
        }
        converted
    }

    /// `embedded_can` identifier, `None` if `id` exceeds its width.
    pub fn can_id(&self) -> Option<Id> {
        if self.extended {
            ExtendedId::new(self.id).map(Id::Extended)
        } else {
            u16::try_from(self.id)
                .ok()
                .and_then(StandardId::new)
                .map(Id::Standard)
        }
    }

    /// Build a driver frame of type `F`, `None` if the driver refuses it.
    pub fn to_frame<F: embedded_can::Frame>(&self) -> Option<F> {
        let id = self.can_id()?;
        if self.remote {
            F::new_remote(id, self.dlc as usize)
        } else {
            F::new(id, self.payload())
        }
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > CAN_MAX_DLC {
            return None;
        }
        Some(match id.into() {
            Id::Standard(id) => Self::standard(id.as_raw(), data),
            Id::Extended(id) => Self::extended(id.as_raw(), data),
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > CAN_MAX_DLC {
            return None;
        }
        let mut frame = <Self as embedded_can::Frame>::new(id, &[])?;
        frame.remote = true;
        frame.dlc = dlc as u8;
        Some(frame)
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        // Out-of-range identifier reads as standard id 0.
        self.can_id()
            .unwrap_or(Id::Standard(StandardId::ZERO))
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            self.payload()
        }
    }
}
