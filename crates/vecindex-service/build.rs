//! Build script for vecindex-service.
//!
//! Compiles the protobuf definitions into Rust code using tonic-build.

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // Prefer a system protoc when the caller points at one.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|e| format!("no bundled protoc for this platform: {:?}", e))?;
        std::env::set_var("PROTOC", protoc);
    }

    println!("cargo:rerun-if-changed=../../proto/vecindex.proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("vecindex_descriptor.bin"))
        .protoc_arg("--experimental_allow_proto3_optional")
        .compile_protos(&["../../proto/vecindex.proto"], &["../../proto"])?;

    Ok(())
}
