use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    // Everything generated goes to OUT_DIR so the fixtures stay untouched.
    webui_pack::Config::new(manifest_dir)
        .headers_root(out_dir.join("html"))
        .table_path(out_dir.join("html/htmlFiles.cpp"))
        .revision_header(out_dir.join("version.h"))
        .auto_build_ui(false)
        .build()
        .expect("Failed to pack web UI");
}
