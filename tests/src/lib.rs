//! Meta-package for the Stemdraw integration tests.
//!
//! The tests live under `integration/`; this library target is empty.
