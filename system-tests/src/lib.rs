// system-tests/src/lib.rs
// ============================================================================
// Module: Risk Score System Tests Library
// Description: Shared configuration for the end-to-end system-test suites.
// Purpose: Provide typed environment settings to the suites in `tests/`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the risk score system-test
//! binaries in `system-tests/tests`. The suites themselves are feature-gated
//! behind `system-tests`; the live vendor suite additionally requires
//! `RISKSCORE_SYSTEM_TEST_LIVE=1` and vendor credentials.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
