//! Human-readable certificate summary shown before asking for a decision.

use chrono::{DateTime, Utc};

use crate::certificate::Certificate;
use crate::common::{
    TrustResult, UI_FINGERPRINT, UI_ISSUED_BY, UI_ISSUED_TO, UI_SERIAL, UI_SERVER_CERTIFICATE,
    UI_UNTRUSTED_CERTIFICATE, UI_VALID_FROM, UI_VALID_UNTIL,
};
use crate::fingerprint::{fingerprint, format_serial};

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Extracts the first attribute value of a distinguished name string.
///
/// Takes the text between the first `=` and the first `,`. When either is
/// missing, or the comma comes before the equals sign, the whole name is
/// returned. Escaped commas inside the value are not understood; the result
/// is display text only.
pub fn get_rdn(dn: &str) -> &str {
    match (dn.find('='), dn.find(',')) {
        (Some(start), Some(end)) if start < end => &dn[start + 1..end],
        _ => dn,
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Builds the certificate summary block.
///
/// # Errors
///
/// Fails with `TrustError::FingerprintFailed` if the fingerprint line cannot
/// be computed.
pub fn render(certificate: &dyn Certificate) -> TrustResult<String> {
    let subject = certificate.subject_dn();
    let issuer = certificate.issuer_dn();
    let mut buffer = String::new();
    buffer.push_str(&format!("{}:\n", UI_SERVER_CERTIFICATE));
    buffer.push_str(&format!("{}: {}\n", UI_ISSUED_TO, get_rdn(&subject)));
    buffer.push_str(&format!("{}: {}\n", UI_ISSUED_BY, get_rdn(&issuer)));
    buffer.push_str(&format!(
        "{}: {}\n",
        UI_VALID_FROM,
        format_date(certificate.not_before())
    ));
    buffer.push_str(&format!(
        "{}: {}\n",
        UI_VALID_UNTIL,
        format_date(certificate.not_after())
    ));
    buffer.push_str(&format!("{}: {}\n", UI_SERIAL, format_serial(certificate)));
    buffer.push_str(&format!("{}: {}\n", UI_FINGERPRINT, fingerprint(certificate)?));
    buffer.push('\n');
    buffer.push_str(UI_UNTRUSTED_CERTIFICATE);
    buffer.push('\n');
    Ok(buffer)
}
