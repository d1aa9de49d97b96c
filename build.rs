// Copies the demo site in `static/` (page plus any wasm-pack output in
// `static/pkg`) to `dist/` so it can be deployed as-is.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let options = CopyOptions::new().overwrite(true).content_only(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=could not copy static/ to dist/: {err}");
    }
}
