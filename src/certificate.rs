//! Leaf certificate decoding.
//!
//! Turns the DER bytes handed back by the TLS session into the three
//! strings shown in the report: the one-line issuer name and the two
//! validity bounds in their ASN.1 string encoding.

use chrono::{DateTime, Datelike, Utc};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::nid::Nid;
use openssl::x509::{X509NameRef, X509};

use crate::FetchError;

/// Decodes a DER encoded certificate.
pub fn decode(der: &[u8]) -> Result<X509, FetchError> {
    Ok(X509::from_der(der)?)
}

/// Issuer distinguished name on one line, e.g. `/C=US/O=Let's Encrypt/CN=R3`.
pub fn issuer_line(cert: &X509) -> Result<String, FetchError> {
    let line = name_line(cert.issuer_name())?;
    if line.is_empty() {
        return Err("issuer name is empty".into());
    }
    Ok(line)
}

/// Validity start in ASN.1 string encoding.
pub fn not_before(cert: &X509) -> Result<String, FetchError> {
    asn1_time_string(cert.not_before())
}

/// Validity end in ASN.1 string encoding.
pub fn not_after(cert: &X509) -> Result<String, FetchError> {
    asn1_time_string(cert.not_after())
}

fn name_line(name: &X509NameRef) -> Result<String, FetchError> {
    let mut line = String::new();
    for entry in name.entries() {
        let object = entry.object();
        // Unregistered attributes print as their dotted OID.
        let nid = object.nid();
        let key = match nid.short_name() {
            Ok(short) if nid != Nid::UNDEF => short.to_string(),
            _ => object.to_string(),
        };
        let value = entry.data().to_string()?;
        line.push('/');
        line.push_str(&key);
        line.push('=');
        line.push_str(&value);
    }
    Ok(line)
}

fn asn1_time_string(time: &Asn1TimeRef) -> Result<String, FetchError> {
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(time)?;
    let secs = i64::from(diff.days) * 86_400 + i64::from(diff.secs);
    let at = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| format!("validity timestamp {} out of range", secs))?;
    Ok(encode_asn1_time(&at))
}

/// UTCTime for 1950 through 2049, GeneralizedTime otherwise (RFC 5280 4.1.2.5).
pub(crate) fn encode_asn1_time(at: &DateTime<Utc>) -> String {
    if (1950..2050).contains(&at.year()) {
        at.format("%y%m%d%H%M%SZ").to_string()
    } else {
        at.format("%Y%m%d%H%M%SZ").to_string()
    }
}
