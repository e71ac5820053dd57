#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Browser entry point. Native builds print how to serve the app instead.

#[cfg(target_arch = "wasm32")]
fn main() {
    reviewscope_ui::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    writeln!(
        std::io::stderr().lock(),
        "reviewscope-ui runs in the browser: `trunk serve` from crates/reviewscope-ui, \
         or build for wasm32-unknown-unknown. Use the `reviewscope` CLI for a native front end."
    )
}
