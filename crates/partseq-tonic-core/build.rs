//! Builds the gRPC client and server code for `proto/partseq.proto` with
//! `tonic-prost-build`, and writes the encoded file descriptor set used by the
//! reflection service to `OUT_DIR/partseq_descriptor.bin`.
//!
//! # Panics
//!
//! Panics if `OUT_DIR` is unset or code generation fails.

use std::env;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("partseq_descriptor.bin");

    tonic_prost_build::configure()
        .file_descriptor_set_path(&descriptor_path)
        .compile_protos(&["proto/partseq.proto"], &["proto"])
        .unwrap();
}
