//! ---
//! sl_section: "07-binary"
//! sl_subsection: "binary"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Build script emitting version metadata for the daemon."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder().all_build().all_cargo().emit()?;
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
