fn main() {
    // Writes build metadata (including the git commit) to $OUT_DIR/built.rs
    if let Err(err) = built::write_built_file() {
        panic!("Failed to acquire build-time information: {err}");
    }
}
