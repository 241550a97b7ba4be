//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `accessmap_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use accessmap_core::SessionConfig;

fn main() {
    let config = SessionConfig::default();
    println!("accessmap_core ping={}", accessmap_core::ping());
    println!("accessmap_core version={}", accessmap_core::core_version());
    println!(
        "accessmap_core defaults radius_m={} types={}",
        config.radius_m,
        config.place_types.join(",")
    );
}
