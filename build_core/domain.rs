use std::collections::HashSet;

use crate::build_core::conf::MAX_FIELD_WIDTH;
use crate::build_core::errors::BuildError;
use crate::build_core::name_helpers::{to_pascal_case, to_screaming_snake_case};
use crate::core::EVENT_DATA_LEN;
use serde::Deserialize;

//==================================================================================MANIFEST
// Structures to deserialize `event_manifest.json`.
#[derive(Debug, Deserialize)]
/// Every subsystem that gets typed event views.
pub(crate) struct Manifest {
    pub(crate) subsystems: Vec<Subsystem>,
}

#[derive(Debug, Deserialize)]
/// Logical domain (climate, power, ...) and its events.
pub(crate) struct Subsystem {
    pub(crate) name: String,
    pub(crate) id: u8,
    #[serde(default)]
    pub(crate) events: Vec<EventDef>,
}

#[derive(Debug, Deserialize)]
/// One event kind and the layout of its 6-byte payload.
pub(crate) struct EventDef {
    pub(crate) name: String,
    pub(crate) id: u8,
    #[serde(default)]
    pub(crate) fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
/// Bit field inside the payload, LSB-first numbering.
pub(crate) struct FieldDef {
    pub(crate) name: String,
    pub(crate) offset: u8,
    pub(crate) width: u8,
}

//==================================================================================ACCESSORS
impl Subsystem {
    /// Name of the generated `subsystem::*` constant.
    pub(crate) fn const_name(&self) -> String {
        to_screaming_snake_case(&self.name)
    }
}

impl EventDef {
    /// Name of the generated view type.
    pub(crate) fn struct_name(&self) -> String {
        to_pascal_case(&self.name)
    }

    /// Initial payload of a fresh view: bytes covered by a field start at
    /// `0x00`, the others keep the `0xFF` padding.
    pub(crate) fn initial_data(&self) -> [u8; EVENT_DATA_LEN] {
        let mut data = [0xFFu8; EVENT_DATA_LEN];
        for field in &self.fields {
            let first = field.offset as usize / 8;
            let last = (field.offset as usize + field.width as usize - 1) / 8;
            for byte in data.iter_mut().take(last + 1).skip(first) {
                *byte = 0x00;
            }
        }
        data
    }
}

impl FieldDef {
    /// Rust type returned by the getter.
    pub(crate) fn rust_type(&self) -> &'static str {
        match self.width {
            1 => "bool",
            2..=8 => "u8",
            9..=16 => "u16",
            _ => "u32",
        }
    }

    fn end(&self) -> usize {
        self.offset as usize + self.width as usize
    }

    fn overlaps(&self, other: &FieldDef) -> bool {
        (self.offset as usize) < other.end() && (other.offset as usize) < self.end()
    }
}

//==================================================================================VALIDATION
impl Manifest {
    /// Reject layouts a view could not address: widths outside `1..=32`,
    /// fields past the payload, overlapping fields and duplicate names/ids.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        let mut subsystem_ids = HashSet::new();
        let mut subsystem_names = HashSet::new();
        let mut struct_names = HashSet::new();

        for subsystem in &self.subsystems {
            if !subsystem_ids.insert(subsystem.id) || !subsystem_names.insert(subsystem.const_name()) {
                return Err(BuildError::Duplicate {
                    scope: "subsystem".to_string(),
                    name: subsystem.name.clone(),
                });
            }

            let mut event_ids = HashSet::new();
            for event in &subsystem.events {
                if !event_ids.insert(event.id) || !struct_names.insert(event.struct_name()) {
                    return Err(BuildError::Duplicate {
                        scope: subsystem.name.clone(),
                        name: event.name.clone(),
                    });
                }
                event.validate()?;
            }
        }
        Ok(())
    }
}

impl EventDef {
    fn validate(&self) -> Result<(), BuildError> {
        let mut names = HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if !(1..=MAX_FIELD_WIDTH).contains(&field.width) {
                return Err(BuildError::FieldLayout {
                    event: self.name.clone(),
                    field: field.name.clone(),
                    comment: "width must be within 1..=32",
                });
            }
            if field.end() > EVENT_DATA_LEN * 8 {
                return Err(BuildError::FieldLayout {
                    event: self.name.clone(),
                    field: field.name.clone(),
                    comment: "field ends past the 48-bit payload",
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(BuildError::Duplicate {
                    scope: self.name.clone(),
                    name: field.name.clone(),
                });
            }
            if self.fields[..index].iter().any(|other| other.overlaps(field)) {
                return Err(BuildError::FieldLayout {
                    event: self.name.clone(),
                    field: field.name.clone(),
                    comment: "field overlaps a previous one",
                });
            }
        }
        Ok(())
    }
}
