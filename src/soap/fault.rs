//! Fault classification of SOAP responses.
//!
//! The library decides whether a response is a fault through a
//! [`FaultPolicy`]. The default, [`StatusCodePolicy`], treats every status
//! other than 200 as a fault and never looks at the envelope.
//! [`EnvelopePolicy`] additionally reports a `Fault` element inside the SOAP
//! `Body` of a 200 response.

use crate::xml::XmlElement;

/// Decides whether a SOAP response represents a fault.
pub trait FaultPolicy: Send + Sync {
    fn is_fault(&self, status: u16, body: &str) -> bool;
}

/// Status 200 is success, anything else is a fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodePolicy;

impl FaultPolicy for StatusCodePolicy {
    fn is_fault(&self, status: u16, _body: &str) -> bool {
        status != 200
    }
}

/// [`StatusCodePolicy`] plus envelope inspection: a `Body/Fault` element in
/// any SOAP namespace marks the response as a fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopePolicy;

impl FaultPolicy for EnvelopePolicy {
    fn is_fault(&self, status: u16, body: &str) -> bool {
        if status != 200 {
            return true;
        }
        match XmlElement::parse(body) {
            Ok(envelope) => envelope
                .find("{*}Body/{*}Fault")
                .map(|fault| fault.is_some())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}
