//! ECDSA public keys and signature verification.
//!
//! Public keys are stored as PEM `PUBLIC KEY` blocks wrapping an X.509
//! SubjectPublicKeyInfo with the `id-ecPublicKey` algorithm. The named
//! curve selects the verifier; P-256 and P-384 are supported. Signatures
//! travel as hex-encoded DER `SEQUENCE { r INTEGER, s INTEGER }` over the
//! SHA-256 of the message, whatever the curve.

use p256::pkcs8::{DecodePublicKey, ObjectIdentifier, SubjectPublicKeyInfoRef, der::Decode};
use reputrade_types::{ParticipantId, ReputradeError, Result};
use sha2::{Digest, Sha256};

/// PEM label required on registered keys.
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// `id-ecPublicKey` (RFC 5480).
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// `secp256r1`.
const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// `secp384r1`.
const SECP384R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// A registered ECDSA verifying key, tagged by curve.
#[derive(Debug, Clone)]
pub enum EcdsaKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

impl EcdsaKey {
    /// Curve name as it appears in logs.
    #[must_use]
    pub fn curve(&self) -> &'static str {
        match self {
            Self::P256(_) => "P-256",
            Self::P384(_) => "P-384",
        }
    }

    /// Verify DER signature bytes against a message digest.
    ///
    /// `Ok(false)` for a well-formed signature that does not verify,
    /// including one whose scalars are out of range for the curve.
    fn verify_der(&self, digest: &[u8], der: &[u8]) -> Result<bool> {
        use p256::ecdsa::signature::hazmat::PrehashVerifier;

        match self {
            Self::P256(key) => {
                let der = p256::ecdsa::DerSignature::from_bytes(der).map_err(malformed)?;
                Ok(p256::ecdsa::Signature::try_from(der)
                    .is_ok_and(|sig| key.verify_prehash(digest, &sig).is_ok()))
            }
            Self::P384(key) => {
                let der = p384::ecdsa::DerSignature::from_bytes(der).map_err(malformed)?;
                Ok(p384::ecdsa::Signature::try_from(der)
                    .is_ok_and(|sig| key.verify_prehash(digest, &sig).is_ok()))
            }
        }
    }
}

fn malformed(e: impl std::fmt::Display) -> ReputradeError {
    ReputradeError::InvalidSignature {
        reason: format!("failed to parse signature: {e}"),
    }
}

/// Decode a PEM public key into an ECDSA verifying key.
///
/// # Errors
/// `InvalidPublicKey` if the PEM is malformed, the label is not
/// `PUBLIC KEY`, the SPKI algorithm is not `id-ecPublicKey`, or the named
/// curve is not one we can verify on.
pub fn decode_public_key(participant: &ParticipantId, pem_text: &str) -> Result<EcdsaKey> {
    let invalid = |reason: String| ReputradeError::InvalidPublicKey {
        participant: participant.clone(),
        reason,
    };

    let block = pem::parse(pem_text).map_err(|e| invalid(format!("invalid PEM format: {e}")))?;
    if block.tag() != PUBLIC_KEY_LABEL {
        return Err(invalid(format!(
            "PEM block is {:?}, expected {PUBLIC_KEY_LABEL:?}",
            block.tag()
        )));
    }
    let der = block.contents();

    let spki = SubjectPublicKeyInfoRef::from_der(der)
        .map_err(|e| invalid(format!("invalid SubjectPublicKeyInfo: {e}")))?;
    if spki.algorithm.oid != EC_PUBLIC_KEY_OID {
        return Err(invalid(format!(
            "not an ECDSA public key: algorithm {}",
            spki.algorithm.oid
        )));
    }
    let curve = spki
        .algorithm
        .parameters_oid()
        .map_err(|e| invalid(format!("missing named curve: {e}")))?;

    let key = if curve == SECP256R1_OID {
        p256::ecdsa::VerifyingKey::from_public_key_der(der).map(EcdsaKey::P256)
    } else if curve == SECP384R1_OID {
        p384::ecdsa::VerifyingKey::from_public_key_der(der).map(EcdsaKey::P384)
    } else {
        return Err(invalid(format!("unsupported ECDSA curve {curve}")));
    };
    key.map_err(|e| invalid(format!("invalid ECDSA public key: {e}")))
}

/// Verify `signature_hex` over `message` under a PEM public key.
///
/// A signature that is well formed but wrong yields `Ok(false)`.
///
/// # Errors
/// `InvalidPublicKey` for a bad key, `InvalidSignature` for a malformed
/// signature encoding.
pub fn verify_with_pem(
    participant: &ParticipantId,
    public_key_pem: &str,
    message: &[u8],
    signature_hex: &str,
) -> Result<bool> {
    let key = decode_public_key(participant, public_key_pem)?;
    let der = hex::decode(signature_hex).map_err(|e| ReputradeError::InvalidSignature {
        reason: format!("invalid signature format: {e}"),
    })?;

    let digest = Sha256::digest(message);
    let valid = key.verify_der(&digest, &der)?;
    if !valid {
        tracing::debug!(participant = %participant, curve = key.curve(), "Signature rejected");
    }
    Ok(valid)
}
