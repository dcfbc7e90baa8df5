const TABLE: &str = include_str!(env!("WEBUI_PACK_TABLE"));
const VERSION: &str = include_str!(env!("WEBUI_PACK_VERSION_HEADER"));
const INDEX_HEADER: &str = include_str!(concat!(env!("OUT_DIR"), "/html/ui/index_html.h"));

/// Reads the byte array out of a generated header.
fn array_bytes(header: &str) -> Vec<u8> {
    let start = header.find("= { ").expect("no array in header") + 4;
    let end = header.rfind(" };").expect("unterminated array");
    header[start..end]
        .split(", ")
        .map(|b| b.parse().expect("not a byte"))
        .collect()
}

fn main() {
    for key in ["/assets/app.js", "/index.html", "/vnc/core/rfb.js", "/vnc/vnc.html"] {
        assert!(TABLE.contains(&format!("{{\"{key}\",")), "missing {key} in table");
    }
    assert!(TABLE.trim_end().ends_with("};\n\n#endif"));
    println!("Lookup table has 4 entries.");

    let data = webui_pack::decompress(&array_bytes(INDEX_HEADER)).expect("bad gzip stream");
    let s = std::str::from_utf8(&data).expect("data is not valid UTF-8");
    print!("{s}");
    assert_eq!(s, include_str!("../../ui/dist/index.html"));
    println!("Decompressed data matches original.");

    assert!(VERSION.contains("GIT_COMMIT_HASH"));
}
