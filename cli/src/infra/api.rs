//! Authenticated client for the hosting provider's management API.
//!
//! Every call is blocking and has no timeout. Only a 401 is turned into an
//! error here; all other statuses are handed back as an [`ApiResponse`].

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};

use crate::application::ports::ApiResponse;
use crate::domain::Config;
use crate::domain::error::ApiError;

/// HTTP methods used against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    /// `application/x-www-form-urlencoded` fields.
    Form(&'a [(&'a str, &'a str)]),
    /// JSON document.
    Json(serde_json::Value),
}

/// Management API client bound to one user and endpoint.
pub struct ApiClient {
    agent: ureq::Agent,
    config: Config,
}

impl ApiClient {
    /// Build a client from the startup configuration.
    ///
    /// A missing token is not an error until the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the insecure TLS configuration cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            agent: build_agent(config.insecure_api)?,
            config: config.clone(),
        })
    }

    /// URL of a resource collection, e.g. `.../user/alice/webapps/`.
    #[must_use]
    pub fn collection_url(&self, flavor: &str) -> String {
        self.config.api_url(flavor)
    }

    /// URL of the webapp record for `domain`.
    #[must_use]
    pub fn webapp_url(&self, domain: &str) -> String {
        format!("{}{domain}/", self.collection_url("webapps"))
    }

    /// Perform one authenticated request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NoToken` before any network activity when no token
    /// is configured, `ApiError::Authentication` on a 401, and
    /// `ApiError::Transport` when no response could be read.
    pub fn call(
        &self,
        url: &str,
        method: Method,
        payload: Option<Payload<'_>>,
    ) -> Result<ApiResponse, ApiError> {
        let token = self.config.api_token.as_deref().ok_or(ApiError::NoToken)?;
        tracing::debug!(%method, url, "calling API");

        let request = self
            .agent
            .request(method.as_str(), url)
            .set("Authorization", &format!("Token {token}"));
        let result = match payload {
            None => request.call(),
            Some(Payload::Form(fields)) => request.send_form(fields),
            Some(Payload::Json(value)) => request.send_json(value),
        };

        let response = match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(ApiError::Transport {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };

        let status = response.status();
        let body = response.into_string().map_err(|err| ApiError::Transport {
            url: url.to_string(),
            message: format!("reading response body: {err}"),
        })?;
        tracing::debug!(%method, url, status, "API responded");

        if status == 401 {
            tracing::warn!(url, "API rejected the token");
            return Err(ApiError::Authentication { status, body });
        }
        Ok(ApiResponse { status, body })
    }
}

fn build_agent(insecure: bool) -> Result<ureq::Agent> {
    let builder = ureq::AgentBuilder::new();
    if !insecure {
        return Ok(builder.build());
    }

    tracing::warn!("TLS certificate verification is disabled for API calls");
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let tls = rustls::ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .context("configuring TLS protocol versions")?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert(provider)))
        .with_no_client_auth();
    Ok(builder.tls_config(Arc::new(tls)).build())
}

/// Accepts any server certificate but still checks handshake signatures.
#[derive(Debug)]
struct AcceptAnyServerCert(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
