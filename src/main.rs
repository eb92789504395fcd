use std::env;
use std::process;
use std::sync::Arc;

use certtrust::certificate::X509Cert;
use certtrust::common::TrustResult;
use certtrust::prompt::{select_prompt, ConsolePrompt, PromptEnvironment};
use certtrust::settings::SqliteSettings;
use certtrust::validator::EmptyTrustStore;
use certtrust::verifier::TrustVerifier;

const DEFAULT_SETTINGS_DATABASE: &str = "certtrust.db";
const AUTH_TYPE: &str = "UNKNOWN";

fn run(certificate_path: &str, settings_path: &str) -> TrustResult<()> {
    let certificate = X509Cert::from_file(certificate_path)?;
    let settings = Arc::new(SqliteSettings::open(settings_path)?);
    let environment = PromptEnvironment::detect(settings.as_ref())?;
    let prompt = select_prompt(&environment, None, Arc::new(ConsolePrompt::stdio()));
    let verifier = TrustVerifier::new(EmptyTrustStore::<X509Cert>::new(), settings, prompt);
    verifier.check_server_trusted(&[certificate], AUTH_TYPE)
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("certtrust-cli");
        eprintln!("Usage: {} <certificate> [settings-db]", program);
        process::exit(2);
    }
    let settings_path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_SETTINGS_DATABASE);
    match run(&args[1], settings_path) {
        Ok(()) => println!("trusted"),
        Err(e) => {
            println!("not trusted: {}", e);
            process::exit(1);
        }
    }
}
