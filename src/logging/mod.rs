//! Logging utilities
//!
//! - `init_tracing` - console subscriber for the monitor binary
//! - `format_hex` - hex dumps used in protocol traces
//! - `FrameEntry` - printable/serializable record of one frame

pub mod entry;

pub use entry::{Direction, FrameEntry};

/// Initialize internal tracing for protocol debug output
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render bytes as uppercase hex pairs joined by `delimiter`
pub fn format_hex(data: &[u8], delimiter: &str) -> String {
    let mut out = String::with_capacity(data.len() * (2 + delimiter.len()));
    for (i, &byte) in data.iter().enumerate() {
        if i > 0 {
            out.push_str(delimiter);
        }
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }
    out
}

/// Parse hex text such as `"41 42"`, `"4142"` or `"41,42"`
///
/// Whitespace, commas and colons are ignored between pairs.
pub fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b',' && *b != b':')
        .collect();

    if digits.len() % 2 != 0 {
        return None;
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0xFE, 0x02, 0x05, 0x41, 0xFF], " "), "FE 02 05 41 FF");
        assert_eq!(format_hex(&[0x0A], " "), "0A");
        assert_eq!(format_hex(&[], " "), "");
    }

    #[test]
    fn test_format_hex_custom_delimiter() {
        assert_eq!(format_hex(&[1, 2], ":"), "01:02");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("41 42"), Some(vec![0x41, 0x42]));
        assert_eq!(parse_hex("4142"), Some(vec![0x41, 0x42]));
        assert_eq!(parse_hex("0a,FF"), Some(vec![0x0A, 0xFF]));
        assert_eq!(parse_hex(""), Some(vec![]));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert_eq!(parse_hex("4"), None);
        assert_eq!(parse_hex("zz"), None);
    }
}
