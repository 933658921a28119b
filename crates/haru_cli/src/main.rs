//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `haru_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("haru_core ping={}", haru_core::ping());
    println!("haru_core version={}", haru_core::core_version());
}
