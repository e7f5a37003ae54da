// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenancy-key derivation.

/// Sanitize a user identity (typically an email) into the tenancy key used
/// for collection names and per-user directories.
///
/// `@` and `.` are replaced with `_` so the key is safe as a filesystem
/// path component and as a collection-name prefix.
pub fn sanitize_tenant(identity: &str) -> String {
    identity.replace(['@', '.'], "_")
}

#[cfg(test)]
#[path = "tenant_tests.rs"]
mod tests;
