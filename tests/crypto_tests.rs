//! Integration tests for the Durin crypto module.

use durin::crypto::{
    decrypt, derive_kek, encrypt, generate_salt, unwrap_keyset, wrap_keyset, Argon2Params,
    MasterKey,
};
use durin::DurinError;

fn params() -> Argon2Params {
    Argon2Params::minimum()
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = br#"{"username":"alice","password":"p1","notes":""}"#;

    let ciphertext = encrypt(&key, plaintext, b"github").expect("encrypt should succeed");

    // Ciphertext must be longer than plaintext (12-byte nonce + 16-byte tag).
    assert!(ciphertext.len() > plaintext.len());

    let recovered = decrypt(&key, &ciphertext, b"github").expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let key = [0xCDu8; 32];

    let ct1 = encrypt(&key, b"same", b"name").expect("encrypt 1");
    let ct2 = encrypt(&key, b"same", b"name").expect("encrypt 2");

    assert_ne!(ct1, ct2, "two encryptions of the same plaintext must differ");
}

#[test]
fn decrypt_with_wrong_key_fails() {
    let ciphertext = encrypt(&[0x11u8; 32], b"secret", b"n").expect("encrypt");
    let result = decrypt(&[0x22u8; 32], &ciphertext, b"n");
    assert!(matches!(result, Err(DurinError::AuthenticationFailed)));
}

#[test]
fn decrypt_with_other_associated_data_fails() {
    let key = [0x33u8; 32];
    let ciphertext = encrypt(&key, b"secret", b"github").expect("encrypt");
    let result = decrypt(&key, &ciphertext, b"aws");
    assert!(matches!(result, Err(DurinError::AuthenticationFailed)));
}

#[test]
fn every_flipped_bit_is_detected() {
    let key = [0xBBu8; 32];
    let ciphertext = encrypt(&key, b"VALUE=abc", b"n").expect("encrypt");

    for i in 0..ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 1 << bit;
            assert!(
                decrypt(&key, &tampered, b"n").is_err(),
                "flip of byte {i} bit {bit} went unnoticed"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Key derivation (Argon2id)
// ---------------------------------------------------------------------------

#[test]
fn derive_kek_same_inputs_same_output() {
    let salt = generate_salt();

    let kek1 = derive_kek(b"my-secure-passphrase", &salt, &params()).expect("derive 1");
    let kek2 = derive_kek(b"my-secure-passphrase", &salt, &params()).expect("derive 2");

    assert_eq!(kek1.as_bytes(), kek2.as_bytes());
}

#[test]
fn derive_kek_different_salts_different_keys() {
    let kek1 = derive_kek(b"same-password", &generate_salt(), &params()).expect("derive 1");
    let kek2 = derive_kek(b"same-password", &generate_salt(), &params()).expect("derive 2");

    assert_ne!(kek1.as_bytes(), kek2.as_bytes());
}

#[test]
fn derive_kek_different_passwords_different_keys() {
    let salt = generate_salt();

    let kek1 = derive_kek(b"password-one", &salt, &params()).expect("derive 1");
    let kek2 = derive_kek(b"password-two", &salt, &params()).expect("derive 2");

    assert_ne!(kek1.as_bytes(), kek2.as_bytes());
}

#[test]
fn derive_kek_depends_on_params() {
    let salt = generate_salt();
    let heavier = Argon2Params {
        iterations: 2,
        ..params()
    };

    let kek1 = derive_kek(b"pw", &salt, &params()).expect("derive 1");
    let kek2 = derive_kek(b"pw", &salt, &heavier).expect("derive 2");

    assert_ne!(kek1.as_bytes(), kek2.as_bytes());
}

// ---------------------------------------------------------------------------
// End-to-end: password -> KEK -> wrapped master key -> record encryption
// ---------------------------------------------------------------------------

#[test]
fn full_crypto_pipeline() {
    let salt = generate_salt();

    // Step 1: Derive the KEK and wrap a fresh master key under it.
    let kek = derive_kek(b"hunter22", &salt, &params()).expect("derive kek");
    let master = MasterKey::generate();
    let wrapped = wrap_keyset(&master, &kek).expect("wrap");

    // Step 2: Later, re-derive the KEK and unwrap.
    let kek_again = derive_kek(b"hunter22", &salt, &params()).expect("derive kek again");
    let unwrapped = unwrap_keyset(&wrapped, &kek_again).expect("unwrap");

    // Step 3: Encrypt with the generated key, decrypt with the unwrapped one.
    let ciphertext = encrypt(master.as_bytes(), b"payload", b"github").expect("encrypt");
    let recovered = decrypt(unwrapped.as_bytes(), &ciphertext, b"github").expect("decrypt");
    assert_eq!(recovered, b"payload");
}
