//! # certtrust
//!
//! Interactive certificate trust verification for TLS clients talking to
//! servers with self-signed or privately issued certificates.
//!
//! Standard chain validation always runs first. When it fails, the leaf
//! certificate's fingerprint is compared with the one the user accepted last
//! time, and if it differs the user is asked, through a graphical dialog
//! supplied by the application or a console prompt. Any error or
//! non-answer means the certificate is not trusted.

pub mod certificate;
pub mod common;
pub mod decision_cache;
pub mod fingerprint;
pub mod hash_format;
pub mod prompt;
pub mod prompt_renderer;
pub mod settings;
pub mod validator;
pub mod verifier;
