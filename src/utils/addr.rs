//! Address utility functions for classification and privacy masking.

/// Check whether an address is a loopback address
///
/// Loopback connections come from the local host (health checks, sidecar
/// probes) and never represent a real client session, so they must not
/// count toward any concurrency quota.
pub fn is_loopback(address: &str) -> bool {
    address == "127.0.0.1" || address == "::1"
}

/// Mask an IP address for privacy-sensitive notification payloads
///
/// For a dotted-quad address the first two octets are preserved and the
/// last two redacted, e.g. `203.0.113.7` becomes `203.0.**.**`. Any other
/// format is passed through unchanged (best-effort masking only).
pub fn mask_address(address: &str) -> String {
    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() == 4 {
        format!("{}.{}.**.**", parts[0], parts[1])
    } else {
        address.to_string()
    }
}
