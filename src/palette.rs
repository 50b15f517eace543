//! Color assigner — deterministic round-robin over a fixed palette.
//!
//! Each joining participant is assigned `PALETTE[registry_size % len]`, so
//! colors repeat predictably once the participant count exceeds the palette
//! length. Stateless given the current registry size.

/// Fixed ordered palette of participant colors. Cosmetic values; the
/// modulo-cycling policy is the contract.
pub const PALETTE: [&str; 10] = [
    "#e6194b", // red
    "#3cb44b", // green
    "#4363d8", // blue
    "#f58231", // orange
    "#911eb4", // purple
    "#42d4f4", // cyan
    "#f032e6", // magenta
    "#bfef45", // lime
    "#fabed4", // pink
    "#469990", // teal
];

/// Pick the color for the next participant given the current registry size.
#[must_use]
pub fn assign(current_size: usize) -> &'static str {
    PALETTE[current_size % PALETTE.len()]
}
