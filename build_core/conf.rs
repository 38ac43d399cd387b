//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest describing subsystems, events and their payload fields.
pub(crate) const EVENT_MANIFEST_PATH: &str = "build_core/var/event_manifest.json";
/// Environment variable overriding [`EVENT_MANIFEST_PATH`].
pub(crate) const EVENT_MANIFEST_ENV: &str = "CANBRIDGE_EVENT_MANIFEST";
/// Generated event view file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_EVENT_FILE_NAME: &str = "generated_events.rs";
/// Widest field a view accessor can return.
pub(crate) const MAX_FIELD_WIDTH: u8 = 32;
