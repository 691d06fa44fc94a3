//! Cross-module simulation scenarios
//!
//! Exercises the full tick cycle across world, bodies, and grid rather
//! than any single module in isolation.
