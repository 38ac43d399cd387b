//! Cargo build script: generates the typed event views from the event manifest.

// Shared protocol constants (payload sizes) from src/core.rs
#[allow(dead_code)]
#[path = "src/core.rs"]
mod core;

mod build_core;
use crate::build_core::{
    conf::*, domain::Manifest, errors::BuildError, gen_events::run_events_gen,
};

use std::fs;
use std::path::PathBuf;

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build_core");
    println!("cargo:rerun-if-changed={EVENT_MANIFEST_PATH}");
    println!("cargo:rerun-if-env-changed={EVENT_MANIFEST_ENV}");

    // 1. Locate the manifest.
    // Priority order:
    //   1. CANBRIDGE_EVENT_MANIFEST environment variable (absolute or relative path)
    //   2. Default manifest shipped with the crate
    let default_manifest_path = PathBuf::from(EVENT_MANIFEST_PATH);
    let manifest_path = match std::env::var(EVENT_MANIFEST_ENV).ok().map(PathBuf::from) {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom event manifest from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom event manifest not found: {:?}, falling back to the default one",
                path
            );
            default_manifest_path
        }
        None => default_manifest_path,
    };

    // 2. Parse and validate.
    let manifest_string = fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
        path: manifest_path.clone(),
        source: e,
    })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;
    manifest.validate()?;

    // 3. Generate and write into `OUT_DIR`; `src/protocol/events/mod.rs` pulls
    // the file in with `include!`.
    let buffer_event_code = run_events_gen(&manifest)?;

    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let event_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_EVENT_FILE_NAME);
    fs::write(&event_file_path, &buffer_event_code).map_err(|e| BuildError::WriteFile {
        path: event_file_path,
        source: e,
    })?;

    Ok(())
}
