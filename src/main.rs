//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`,
//! then serves `static/` locally so the demo film can be opened in a browser.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

use tracing::{error, info, warn};

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }
    tracing_subscriber::fmt().with_target(false).init();

    let port = env::var("FILM_PORT").unwrap_or_else(|_| "8000".to_string());

    info!("building wasm bundle");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            error!(%st, "wasm-pack failed; install it from https://rustwasm.github.io/wasm-pack/");
            std::process::exit(1);
        }
        Err(_) => {
            warn!("wasm-pack not found in PATH; serving whatever is already in static/pkg");
        }
    }

    info!(%port, "serving static/ at http://127.0.0.1:{port}");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = server {
        error!(%err, "could not start http server");
        std::process::exit(1);
    }

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
