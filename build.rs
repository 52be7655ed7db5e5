/// scintilla-gtk build script.
///
/// Validates that the host targets a Unix platform; the crate hosts the GTK
/// port of Scintilla and links `libscintilla` / `liblexilla` plus GTK3.
fn main() {
    // Hard gate: the GTK Scintilla widget only exists on Unix-like targets.
    // Fail loudly on any other target rather than producing confusing
    // missing-symbol errors at link time.
    let target_family = std::env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();
    if !target_family.split(',').any(|f| f == "unix") {
        panic!(
            "scintilla-gtk only builds for Unix targets with GTK3 \
             (CARGO_CFG_TARGET_FAMILY = {target_family:?})"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
