//! Typed event view generator.
use std::fmt::Write;

use crate::build_core::domain::{EventDef, FieldDef, Manifest, Subsystem};
use crate::build_core::errors::BuildError;
use crate::build_core::name_helpers::to_field_ident;

//==================================================================================RUN
/// Produce the contents of `generated_events.rs` for a validated manifest.
pub(crate) fn run_events_gen(manifest: &Manifest) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(buffer, "// @generated by build.rs from the event manifest. Do not edit.")?;
    writeln!(buffer)?;

    gen_subsystem_ids(&mut buffer, &manifest.subsystems)?;

    let mut views = 0usize;
    for subsystem in &manifest.subsystems {
        for event in &subsystem.events {
            gen_view(&mut buffer, subsystem, event)?;
            views += 1;
        }
    }
    println!(
        "cargo:warning=Generated {views} event views for {} subsystems",
        manifest.subsystems.len()
    );
    Ok(buffer)
}

//==================================================================================SUBSYSTEMS
fn gen_subsystem_ids(buffer: &mut String, subsystems: &[Subsystem]) -> Result<(), BuildError> {
    writeln!(buffer, "/// Subsystem identifiers (`Event::subsystem`).")?;
    writeln!(buffer, "pub mod subsystem {{")?;
    for subsystem in subsystems {
        writeln!(buffer, "    /// `{}`.", subsystem.name)?;
        writeln!(
            buffer,
            "    pub const {}: u8 = {:#04X};",
            subsystem.const_name(),
            subsystem.id
        )?;
    }
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;
    Ok(())
}

//==================================================================================VIEW
fn gen_view(buffer: &mut String, subsystem: &Subsystem, event: &EventDef) -> Result<(), BuildError> {
    let name = event.struct_name();
    let initial = event
        .initial_data()
        .iter()
        .map(|byte| format!("{byte:#04X}"))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(
        buffer,
        "/// View over the `{}` event of the `{}` subsystem.",
        event.name, subsystem.name
    )?;
    writeln!(buffer, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
    writeln!(buffer, "#[cfg_attr(feature = \"defmt\", derive(defmt::Format))]")?;
    writeln!(buffer, "pub struct {name}(Event);")?;
    writeln!(buffer)?;

    writeln!(buffer, "impl {name} {{")?;
    writeln!(
        buffer,
        "    pub const SUBSYSTEM: u8 = subsystem::{};",
        subsystem.const_name()
    )?;
    writeln!(buffer, "    pub const ID: u8 = {:#04X};", event.id)?;
    writeln!(buffer)?;
    writeln!(
        buffer,
        "    /// Fresh event: fields zeroed, unused payload bytes padded with `0xFF`."
    )?;
    writeln!(buffer, "    pub const fn new() -> Self {{")?;
    writeln!(
        buffer,
        "        Self(Event::with_data(Self::SUBSYSTEM, Self::ID, [{initial}]))"
    )?;
    writeln!(buffer, "    }}")?;
    writeln!(buffer)?;
    writeln!(buffer, "    pub fn event(&self) -> &Event {{")?;
    writeln!(buffer, "        &self.0")?;
    writeln!(buffer, "    }}")?;
    writeln!(buffer)?;
    writeln!(buffer, "    pub fn into_event(self) -> Event {{")?;
    writeln!(buffer, "        self.0")?;
    writeln!(buffer, "    }}")?;

    for field in &event.fields {
        gen_accessors(buffer, field)?;
    }
    writeln!(buffer, "}}")?;
    writeln!(buffer)?;

    gen_conversions(buffer, &name)?;
    Ok(())
}

fn gen_accessors(buffer: &mut String, field: &FieldDef) -> Result<(), BuildError> {
    let ident = to_field_ident(&field.name, "value");
    let ty = field.rust_type();
    let (offset, width) = (field.offset, field.width);

    writeln!(buffer)?;
    writeln!(
        buffer,
        "    /// Payload bits {offset}..{} (byte {}, bit {}).",
        offset as usize + width as usize,
        offset / 8,
        offset % 8
    )?;
    writeln!(buffer, "    pub fn {ident}(&self) -> {ty} {{")?;
    if ty == "bool" {
        writeln!(
            buffer,
            "        read_field(&self.0.data, {offset}, {width}) != 0"
        )?;
    } else {
        writeln!(
            buffer,
            "        read_field(&self.0.data, {offset}, {width}) as {ty}"
        )?;
    }
    writeln!(buffer, "    }}")?;
    writeln!(buffer)?;
    writeln!(
        buffer,
        "    /// Store `{ident}`; `true` if the payload changed."
    )?;
    writeln!(buffer, "    pub fn set_{ident}(&mut self, value: {ty}) -> bool {{")?;
    writeln!(
        buffer,
        "        write_field(&mut self.0.data, {offset}, {width}, value as u64)"
    )?;
    writeln!(buffer, "    }}")?;
    Ok(())
}

fn gen_conversions(buffer: &mut String, name: &str) -> Result<(), BuildError> {
    write!(
        buffer,
        r#"impl Default for {name} {{
    fn default() -> Self {{
        Self::new()
    }}
}}

impl TryFrom<Event> for {name} {{
    type Error = EventDecodeError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {{
        if event.is(Self::SUBSYSTEM, Self::ID) {{
            Ok(Self(event))
        }} else {{
            Err(EventDecodeError::Mismatch {{
                subsystem: event.subsystem,
                id: event.id,
            }})
        }}
    }}
}}

impl From<{name}> for Event {{
    fn from(view: {name}) -> Self {{
        view.0
    }}
}}

"#
    )?;
    Ok(())
}
