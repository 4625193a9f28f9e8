// [libs/infra/snapshot/src/psk.rs]
//! Pre-shared-secret generation (spec §4.8 step 1), grounded on
//! `examples/original_source/internal/snap/psk.go`'s `GenPSK`: a random
//! secret sent to every pair on stdin (base64, so the transport stays
//! text-safe over the chunked-stdin channel) and its RSA-OAEP encryption
//! retained for the aggregate manifest.

use crate::errors::SnapshotError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

pub const PSK_LEN: usize = 16;

pub struct GeneratedPsk {
    /// Sent verbatim on the `fetchsnaps` session's stdin.
    pub psk_base64: String,
    /// Stored in the aggregate manifest for later off-line decryption.
    pub encrypted_psk_base64: String,
}

pub fn generate_psk(public_key: &RsaPublicKey) -> Result<GeneratedPsk, SnapshotError> {
    let mut psk = vec![0u8; PSK_LEN];
    rand::rngs::OsRng.fill_bytes(&mut psk);

    let encrypted = public_key.encrypt(&mut rand::rngs::OsRng, Oaep::new::<Sha256>(), &psk)?;

    Ok(GeneratedPsk {
        psk_base64: STANDARD.encode(&psk),
        encrypted_psk_base64: STANDARD.encode(&encrypted),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;

    #[test]
    fn psk_decodes_to_expected_length() {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let public_key = RsaPublicKey::from(&private_key);

        let generated = generate_psk(&public_key).unwrap();
        let decoded = STANDARD.decode(&generated.psk_base64).unwrap();
        assert_eq!(decoded.len(), PSK_LEN);
    }

    #[test]
    fn encrypted_psk_decrypts_back_to_plaintext() {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let public_key = RsaPublicKey::from(&private_key);

        let generated = generate_psk(&public_key).unwrap();
        let plaintext = STANDARD.decode(&generated.psk_base64).unwrap();
        let ciphertext = STANDARD.decode(&generated.encrypted_psk_base64).unwrap();

        let decrypted = private_key.decrypt(Oaep::new::<Sha256>(), &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }
}
