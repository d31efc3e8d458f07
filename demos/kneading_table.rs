//! # Kneading table
//!
//! Prints the invariants of a handful of angles, then tabulates the period-3
//! dendrite candidates. Set `RUST_LOG=kneading_core=debug` to watch the
//! orbit and wedge diagnostics.

use kneading_core::survey::{partition_by_period, survey};
use kneading_core::{Angle, AssociatedRoot};

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(h: f64) -> String {
    // growth rates live in [1, 2]
    let filled = ((h - 1.0).clamp(0.0, 1.0) * 20.0).round() as usize;
    format!("[{}{}] {:.5}", "█".repeat(filled), "░".repeat(20 - filled), h)
}

fn root_text(root: AssociatedRoot) -> String {
    match root {
        AssociatedRoot::Found(z) => format!("{:+.6}{:+.6}i", z.re, z.im),
        AssociatedRoot::NotFound => "-".to_string(),
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kneading_core=warn".into()),
        )
        .init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Kneading data of rational external angles                           ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let angles = ["1/2", "1/4", "1/6", "3/14", "3/8", "7/16", "5/12", "55/256", "1/7", "0/1"];
    println!(
        "  {:<8} {:<12} {:<11} {:<10} {:<4} {:<24} {}",
        "angle", "binary", "kneading", "itinerary", "per", "root", "core entropy"
    );
    for text in angles {
        let theta: Angle = match text.parse() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("  {text}: {e}");
                continue;
            }
        };
        println!(
            "  {:<8} {:<12} {:<11} {:<10} {:<4} {:<24} {}",
            theta.to_string(),
            theta.binary_expansion(),
            theta.kneading_sequence().to_string(),
            theta.itinerary().to_string(),
            theta.itinerary_period_length(),
            root_text(theta.associated_root()),
            bar(theta.core_entropy()),
        );
    }

    println!("\n── Period-3 dendrite candidates (preperiod exponent < 4) ─────────────────\n");
    let records = survey(3, 4);
    for (period, group) in partition_by_period(&records) {
        println!("  kneading period {period}: {} angles", group.len());
        for (angle, record) in group.iter().take(4) {
            println!("    {angle:<8} {:<14} {}", record.itin, record.rat_func);
        }
    }
}
