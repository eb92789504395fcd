use std::fs;
use std::io::Cursor;
use std::sync::Arc;

use certtrust::certificate::X509Cert;
use certtrust::common::{TrustError, TrustResult, ACCEPTED_CERTIFICATE_KEY};
use certtrust::prompt::{ConsolePrompt, PromptTokens};
use certtrust::settings::{SettingsStore, SqliteSettings};
use certtrust::validator::EmptyTrustStore;
use certtrust::verifier::TrustVerifier;

const TEST_SETTINGS_PATH: &str = "/tmp/certtrust_test_settings.db";
const FIXTURE_FINGERPRINT: &str = "D9:38:D3:2E:F5:6C:B7:3B:0F:5D:4B:C3:0D:88:6A:88:3A:CA:92:A1";

fn fixture() -> TrustResult<X509Cert> {
    X509Cert::try_from(&include_bytes!("data/self_signed.der")[..])
}

fn console(answers: &str) -> Arc<ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>>> {
    Arc::new(ConsolePrompt::new(
        Cursor::new(answers.as_bytes().to_vec()),
        Vec::new(),
        PromptTokens::default(),
    ))
}

#[test]
fn test_console_acceptance_survives_reopen() -> TrustResult<()> {
    let _ = fs::remove_file(TEST_SETTINGS_PATH);
    {
        let settings = Arc::new(SqliteSettings::open(TEST_SETTINGS_PATH)?);
        let validator = EmptyTrustStore::<X509Cert>::new();
        let verifier = TrustVerifier::new(validator, settings, console("what\ny\n"));
        verifier.check_server_trusted(&[fixture()?], "RSA")?;
    }

    let settings = Arc::new(SqliteSettings::open(TEST_SETTINGS_PATH)?);
    assert_eq!(
        Some(FIXTURE_FINGERPRINT.to_string()),
        settings.get_string(ACCEPTED_CERTIFICATE_KEY)?
    );
    // No answers left: only the stored acceptance can make this pass.
    let verifier = TrustVerifier::new(EmptyTrustStore::<X509Cert>::new(), settings, console(""));
    verifier.check_server_trusted(&[fixture()?], "RSA")?;
    fs::remove_file(TEST_SETTINGS_PATH)?;
    Ok(())
}

#[test]
fn test_console_end_of_input_rejects() -> TrustResult<()> {
    let settings = Arc::new(SqliteSettings::open_in_memory()?);
    let validator = EmptyTrustStore::<X509Cert>::new();
    let verifier = TrustVerifier::new(validator, settings.clone(), console(""));
    assert_eq!(
        Err(TrustError::UserRejected),
        verifier.check_server_trusted(&[fixture()?], "RSA")
    );
    assert_eq!(None, verifier.decision_cache().get()?);
    assert!(settings.properties()?.is_empty());
    Ok(())
}

#[test]
fn test_empty_chain_is_not_prompted() -> TrustResult<()> {
    let settings = Arc::new(SqliteSettings::open_in_memory()?);
    let prompt = console("y\n");
    let verifier = TrustVerifier::new(EmptyTrustStore::<X509Cert>::new(), settings, prompt.clone());
    assert!(verifier
        .check_server_trusted(&[], "RSA")
        .unwrap_err()
        .is_chain_validation());
    drop(verifier);
    let prompt = Arc::try_unwrap(prompt).ok().expect("prompt still shared");
    let output = prompt.into_output()?;
    assert!(output.is_empty());
    Ok(())
}
