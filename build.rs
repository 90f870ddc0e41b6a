//! Build script for the servo-blocks firmware demos.
//!
//! Places the board's `memory.x` where `cortex-m-rt` looks for it.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let target = env::var("TARGET").expect("TARGET is set by cargo");

    let memory_file = if target.starts_with("thumbv8m") {
        // Pico 2 ARM
        "memory-pico2.x"
    } else if target.starts_with("thumbv6m") {
        // Pico 1
        "memory-pico1.x"
    } else {
        // Host builds and tests link no firmware.
        return;
    };

    let memory_x = fs::read_to_string(memory_file)
        .unwrap_or_else(|_| panic!("Failed to read {memory_file}"));
    fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={memory_file}");
}
