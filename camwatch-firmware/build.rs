//! Build script for camwatch-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates watch.toml and embeds it as a postcard blob

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use camwatch_core::config::{encode_config, parse_config, MAX_ENCODED_CONFIG_SIZE};

fn main() {
    setup_linker();
    embed_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate watch.toml and write the encoded form to OUT_DIR
fn embed_config() {
    println!("cargo:rerun-if-changed=watch.toml");

    let config_path = Path::new("watch.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read watch.toml", &e.to_string()),
    };

    let config = match parse_config(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid watch.toml", &format!("{:?}", e)),
    };

    let mut buf = [0u8; MAX_ENCODED_CONFIG_SIZE];
    let encoded = match encode_config(&config, &mut buf) {
        Ok(encoded) => encoded,
        Err(e) => fail("Failed to encode watch.toml", &format!("{:?}", e)),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("watch_config.bin"), &encoded[..]).unwrap();

    println!(
        "cargo:warning=watch.toml validated successfully ({} bytes)",
        encoded.len()
    );
}

fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        ║  {:<64} ║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, detail
    );
}
