//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `clientbook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny probe to validate core crate wiring independently from
    // any host application embedding the store.
    println!("clientbook_core ping={}", clientbook_core::ping());
    println!("clientbook_core version={}", clientbook_core::core_version());
}
