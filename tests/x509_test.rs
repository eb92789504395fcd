use certtrust::certificate::{Certificate, X509Cert};
use certtrust::common::TrustResult;
use certtrust::fingerprint::{fingerprint, format_serial};
use certtrust::prompt_renderer::render;

const DER_FIXTURE: &[u8] = include_bytes!("data/self_signed.der");
const PEM_FIXTURE: &[u8] = include_bytes!("data/self_signed.pem");
const FIXTURE_FINGERPRINT: &str = "D9:38:D3:2E:F5:6C:B7:3B:0F:5D:4B:C3:0D:88:6A:88:3A:CA:92:A1";

#[test]
fn test_fingerprint_matches_openssl() -> TrustResult<()> {
    let certificate = X509Cert::try_from(DER_FIXTURE)?;
    assert_eq!(FIXTURE_FINGERPRINT, fingerprint(&certificate)?);
    assert_eq!(DER_FIXTURE, certificate.encoded()?.as_slice());
    Ok(())
}

#[test]
fn test_pem_and_der_agree() -> TrustResult<()> {
    let from_der = X509Cert::try_from(DER_FIXTURE)?;
    let from_pem = X509Cert::from_pem(PEM_FIXTURE)?;
    assert_eq!(fingerprint(&from_der)?, fingerprint(&from_pem)?);
    assert_eq!(from_der.subject_dn(), from_pem.subject_dn());
    Ok(())
}

#[test]
fn test_load_from_file() -> TrustResult<()> {
    let directory = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
    for name in ["self_signed.der", "self_signed.pem"] {
        let certificate = X509Cert::from_file(format!("{}/{}", directory, name))?;
        assert_eq!(FIXTURE_FINGERPRINT, fingerprint(&certificate)?);
    }
    assert!(X509Cert::from_file(format!("{}/missing.der", directory)).is_err());
    Ok(())
}

#[test]
fn test_fixture_details() -> TrustResult<()> {
    let certificate = X509Cert::try_from(DER_FIXTURE)?;
    assert_eq!("A1 B2 C3 D4 E", format_serial(&certificate));
    assert!(certificate.subject_dn().contains("CN=mail.example.test"));
    assert!(certificate.subject_dn().contains("Example Org"));
    assert_eq!(certificate.subject_dn(), certificate.issuer_dn());
    assert_eq!("10/16/2026", certificate.not_before().format("%m/%d/%Y").to_string());
    assert_eq!("10/13/2036", certificate.not_after().format("%m/%d/%Y").to_string());

    let summary = render(&certificate)?;
    assert!(summary.contains("Valid from: 10/16/2026\n"));
    assert!(summary.contains("Valid until: 10/13/2036\n"));
    assert!(summary.contains("Serial: A1 B2 C3 D4 E\n"));
    assert!(summary.contains(&format!("FingerPrint: {}\n", FIXTURE_FINGERPRINT)));
    Ok(())
}
