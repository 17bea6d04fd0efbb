//! Hardware address canonicalization

/// Placeholder station address for sources that do not report one
pub const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Canonicalize a hardware address to uppercase colon-hex with 6 octets
///
/// Accepts colon or hyphen separated octets (single-digit octets as printed
/// by BSD `arp` are zero-padded) and bare 12-digit hex strings.
pub fn canonicalize_mac(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let octets: Vec<String> = if raw.contains(':') || raw.contains('-') {
        raw.split(|c| c == ':' || c == '-')
            .map(|o| if o.len() == 1 { format!("0{}", o) } else { o.to_string() })
            .collect()
    } else if raw.len() == 12 && raw.is_ascii() {
        (0..6).map(|i| raw[i * 2..i * 2 + 2].to_string()).collect()
    } else {
        return None;
    };

    if octets.len() != 6
        || octets
            .iter()
            .any(|o| o.len() != 2 || !o.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return None;
    }

    Some(octets.join(":").to_uppercase())
}
