//! Canonical text forms for digests and serial numbers.

/// Formats a byte buffer as uppercase hex octets joined by `:` (`AB:3F:00`).
pub fn format_hash(buffer: &[u8]) -> String {
    buffer
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(":")
}

/// Renders a big-endian two's complement integer as lowercase hex digits.
///
/// Leading zeros are dropped and negative values carry a `-` sign, so the
/// output is the plain base-16 representation of the number (`0x00ff` gives
/// `"ff"`, zero gives `"0"`).
pub fn serial_to_hex(bytes: &[u8]) -> String {
    let negative = bytes.first().is_some_and(|byte| byte & 0x80 != 0);
    let magnitude = if negative {
        twos_complement(bytes)
    } else {
        bytes.to_vec()
    };
    let digits = hex::encode(magnitude);
    let digits = digits.trim_start_matches('0');
    match (negative, digits.is_empty()) {
        (_, true) => "0".into(),
        (true, false) => format!("-{}", digits),
        (false, false) => digits.into(),
    }
}

fn twos_complement(bytes: &[u8]) -> Vec<u8> {
    let mut result: Vec<u8> = bytes.iter().map(|byte| !byte).collect();
    for byte in result.iter_mut().rev() {
        let (sum, overflow) = byte.overflowing_add(1);
        *byte = sum;
        if !overflow {
            break;
        }
    }
    result
}

/// Groups serial hex digits in pairs counted from the first character.
///
/// A space goes before every even index from 2 on, so an odd-length input
/// leaves the last digit alone (`"ABCDE"` gives `"AB CD E"`). The result is
/// uppercased.
pub fn format_serial_digits(digits: &str) -> String {
    let mut builder = String::with_capacity(digits.len() * 3 / 2);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            builder.push(' ');
        }
        builder.push(digit);
    }
    builder.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hash() {
        assert_eq!("AB:3F:00", format_hash(&[0xab, 0x3f, 0x00]));
        assert_eq!("0A", format_hash(&[0x0a]));
        assert_eq!("", format_hash(&[]));
    }

    #[test]
    fn test_format_serial_digits_odd_length() {
        assert_eq!("AB CD E", format_serial_digits("ABCDE"));
        assert_eq!("1A 2B 3", format_serial_digits("1a2b3"));
    }

    #[test]
    fn test_format_serial_digits_short() {
        assert_eq!("FF", format_serial_digits("ff"));
        assert_eq!("F", format_serial_digits("f"));
        assert_eq!("", format_serial_digits(""));
        assert_eq!("-0 1", format_serial_digits("-01"));
    }

    #[test]
    fn test_serial_to_hex_drops_leading_zeros() {
        assert_eq!("a1b2c3d4e", serial_to_hex(&[0x0a, 0x1b, 0x2c, 0x3d, 0x4e]));
        assert_eq!("ff", serial_to_hex(&[0x00, 0xff]));
        assert_eq!("0", serial_to_hex(&[0x00]));
        assert_eq!("0", serial_to_hex(&[]));
    }

    #[test]
    fn test_serial_to_hex_negative() {
        assert_eq!("-1", serial_to_hex(&[0xff]));
        assert_eq!("-80", serial_to_hex(&[0x80]));
        assert_eq!("-100", serial_to_hex(&[0xff, 0x00]));
    }
}
