//! Certificate pinning by SHA-256 fingerprint of the server's leaf certificate.
//!
//! Under `PinPolicy::Enforce` the pin is checked inside the TLS handshake by
//! `PinnedVerifier`, so a server that fails it never receives the request or the API
//! key. Under `PinPolicy::Warn` the handshake is left alone and the certificate is only
//! compared, and logged, once the response is in.
use std::sync::Arc;

use log::{info, warn};
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::ring;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use sha2::{Digest, Sha256};

use crate::error::FetchError;

/// What to do when the presented certificate does not match the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPolicy {
    /// Log the mismatch and keep the response.
    Warn,
    /// Fail the handshake.
    Enforce,
}

/// An expected certificate fingerprint plus the policy applied on mismatch.
#[derive(Debug, Clone)]
pub struct CertificatePin {
    expected: [u8; 32],
    policy: PinPolicy,
}

/// Upper-case, colon separated hex, e.g. `3C:B9:DA:...`.
pub fn format_fingerprint(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

impl CertificatePin {
    /// Parses a hex fingerprint; `:` and whitespace between bytes are ignored.
    pub fn parse(text: &str, policy: PinPolicy) -> Result<Self, FetchError> {
        let compact: String = text
            .chars()
            .filter(|c| *c != ':' && !c.is_whitespace())
            .collect();
        let bytes = hex::decode(&compact)
            .map_err(|e| FetchError::InvalidFingerprint(format!("{text:?}: {e}")))?;
        let expected: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            FetchError::InvalidFingerprint(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self { expected, policy })
    }

    /// Policy applied on mismatch.
    pub fn policy(&self) -> PinPolicy {
        self.policy
    }

    /// Whether the DER-encoded certificate hashes to the pinned fingerprint.
    ///
    /// A mismatch is logged with both fingerprints.
    pub fn matches(&self, der: &[u8]) -> bool {
        let actual = Sha256::digest(der);
        if actual.as_slice() == self.expected.as_slice() {
            info!("Certificate matches");
            return true;
        }
        warn!(
            "Certificate does not match: expected {}, got {}",
            format_fingerprint(&self.expected),
            format_fingerprint(&actual)
        );
        false
    }

    /// Compares the certificate of a finished exchange; only logs.
    pub fn inspect(&self, certificate: Option<&[u8]>) {
        match certificate {
            Some(der) => {
                self.matches(der);
            }
            None => warn!("No peer certificate to compare with the pinned fingerprint"),
        }
    }

    /// TLS client configuration that verifies the chain against the bundled web roots
    /// and then rejects any leaf certificate other than the pinned one.
    pub fn tls_config(&self) -> Result<ClientConfig, FetchError> {
        let provider = Arc::new(ring::default_provider());
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let chain = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
            .build()
            .map_err(|e| FetchError::Tls(e.to_string()))?;
        let verifier = PinnedVerifier {
            pin: self.clone(),
            chain,
        };
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| FetchError::Tls(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();
        Ok(config)
    }
}

/// Handshake verifier enforcing a `CertificatePin` on top of normal chain validation.
#[derive(Debug)]
pub struct PinnedVerifier {
    pin: CertificatePin,
    chain: Arc<WebPkiServerVerifier>,
}

impl ServerCertVerifier for PinnedVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        if !self.pin.matches(end_entity.as_ref()) {
            return Err(rustls::Error::InvalidCertificate(
                CertificateError::ApplicationVerificationFailure,
            ));
        }
        self.chain
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.chain.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.chain.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.chain.supported_verify_schemes()
    }
}
