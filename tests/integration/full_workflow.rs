//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Create a card and self-sign it
//! 2. Add the issuing service's signature
//! 3. Add third-party signatures (employer, state)
//! 4. Export and re-import the card over the wire form
//! 5. Verify against policies of increasing strictness
//! 6. Load the same policy from a policy file

use card_trust::card::{
    import_card_from_base64, import_card_from_json, parse_card, CardSigner, RawCardContent,
    RawSignedModel,
};
use card_trust::config::{PolicyConfig, PolicyFile};
use card_trust::crypto::{Ed25519CardCrypto, Ed25519KeyPair};
use card_trust::verify::{
    explain_card, verify_card, CheckOutcome, TrustPolicy, VerifierCredential, Whitelist,
    WhitelistOutcome, SERVICE_SIGNER,
};
use card_trust::CardError;

#[test]
fn full_workflow_create_sign_export_verify() {
    // ── Step 1: Create and self-sign ─────────────────────────────────────
    let alice = Ed25519KeyPair::generate();
    let service = Ed25519KeyPair::generate();
    let employer = Ed25519KeyPair::generate();
    let state = Ed25519KeyPair::generate();

    let content = RawCardContent::new("alice@example.com", &alice.public_key_der().unwrap());
    let mut raw = RawSignedModel::from_content(&content).expect("content should serialize");
    CardSigner::new(alice.signing_key())
        .self_sign(&mut raw, None)
        .expect("self signing should succeed");

    // ── Step 2: Service signature ────────────────────────────────────────
    CardSigner::new(service.signing_key())
        .sign(&mut raw, SERVICE_SIGNER, None)
        .expect("service signing should succeed");

    // ── Step 3: Third-party signatures ───────────────────────────────────
    CardSigner::new(employer.signing_key())
        .sign(&mut raw, "acme-hr", Some(&b"{\"title\":\"engineer\"}"[..]))
        .expect("employer signing should succeed");

    // ── Step 4: Export / import ──────────────────────────────────────────
    let exported = raw.to_base64().expect("export should succeed");
    let reimported = RawSignedModel::from_base64(&exported).expect("import should succeed");
    assert_eq!(reimported, raw);

    let card = parse_card(&reimported).expect("card should parse");
    assert_eq!(card.identity, "alice@example.com");
    assert_eq!(
        card.signers().collect::<Vec<_>>(),
        vec!["self", SERVICE_SIGNER, "acme-hr"]
    );
    assert_eq!(card.to_raw(), raw);

    // ── Step 5: Policies ─────────────────────────────────────────────────
    let base = || TrustPolicy::builder(Ed25519CardCrypto, &service.public_key_bytes());

    let default_policy = base().build().unwrap();
    assert!(verify_card(&card, &default_policy));

    let employment = Whitelist::new(vec![
        VerifierCredential::new("other-corp", Ed25519KeyPair::generate().public_key_bytes()),
        VerifierCredential::new("acme-hr", employer.public_key_der().unwrap()),
    ]);
    let citizenship = Whitelist::new(vec![VerifierCredential::new(
        "state-registry",
        state.public_key_bytes(),
    )]);

    let employment_policy = base().whitelist(employment.clone()).build().unwrap();
    assert!(verify_card(&card, &employment_policy));

    let strict_policy = base()
        .whitelists(vec![employment.clone(), citizenship.clone()])
        .build()
        .unwrap();
    assert!(!verify_card(&card, &strict_policy));

    let explanation = explain_card(&card, &strict_policy);
    assert_eq!(explanation.self_signature, CheckOutcome::Valid);
    assert_eq!(explanation.service_signature, CheckOutcome::Valid);
    assert_eq!(
        explanation.whitelists,
        vec![
            WhitelistOutcome::Verified {
                signer: "acme-hr".into()
            },
            WhitelistOutcome::NoMatchingSigner,
        ]
    );

    // The state signs later; the card now satisfies both whitelists.
    let mut raw_with_state = raw.clone();
    CardSigner::new(state.signing_key())
        .sign(&mut raw_with_state, "state-registry", None)
        .unwrap();
    let json = raw_with_state.to_json_string().unwrap();
    let card = import_card_from_json(&json, &strict_policy).expect("card should be trusted");
    assert!(verify_card(&card, &strict_policy));

    // The original card, without the state signature, is refused on import.
    let err = import_card_from_base64(&exported, &strict_policy).unwrap_err();
    assert!(matches!(err, CardError::CardNotVerified));

    // ── Step 6: Same policy from a file ──────────────────────────────────
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    let config = PolicyConfig::new(&service.public_key_der().unwrap())
        .with_whitelist(&[
            ("other-corp", &Ed25519KeyPair::generate().public_key_bytes()[..]),
            ("acme-hr", &employer.public_key_bytes()[..]),
        ])
        .with_whitelist(&[("state-registry", &state.public_key_bytes()[..])]);
    PolicyFile::new(config).save(&path).unwrap();

    let file_policy = PolicyFile::load(&path)
        .unwrap()
        .policy
        .build_policy(Ed25519CardCrypto)
        .expect("policy file should be valid");
    assert!(verify_card(&card, &file_policy));
    assert!(!verify_card(
        &parse_card(&raw).unwrap(),
        &file_policy
    ));
}

#[test]
fn card_replacing_previous_card_verifies_independently() {
    let alice = Ed25519KeyPair::generate();
    let service = Ed25519KeyPair::generate();
    let policy = TrustPolicy::builder(Ed25519CardCrypto, &service.public_key_bytes())
        .build()
        .unwrap();

    let sign_both = |content: &RawCardContent| {
        let mut raw = RawSignedModel::from_content(content).unwrap();
        CardSigner::new(alice.signing_key())
            .self_sign(&mut raw, None)
            .unwrap();
        CardSigner::new(service.signing_key())
            .sign(&mut raw, SERVICE_SIGNER, None)
            .unwrap();
        parse_card(&raw).unwrap()
    };

    let first = sign_both(&RawCardContent::new("alice", &alice.public_key_bytes()));
    let second = sign_both(
        &RawCardContent::new("alice", &alice.public_key_bytes())
            .with_previous_card_id(first.id.0.clone()),
    );

    assert_ne!(first.id, second.id);
    assert_eq!(second.previous_card_id.as_ref(), Some(&first.id));
    assert!(verify_card(&first, &policy));
    assert!(verify_card(&second, &policy));
}

#[test]
fn signature_from_one_card_does_not_transfer_to_another() {
    let alice = Ed25519KeyPair::generate();
    let service = Ed25519KeyPair::generate();
    let policy = TrustPolicy::builder(Ed25519CardCrypto, &service.public_key_bytes())
        .verify_self_signature(false)
        .build()
        .unwrap();

    let mut genuine = RawSignedModel::from_content(&RawCardContent::new(
        "alice",
        &alice.public_key_bytes(),
    ))
    .unwrap();
    CardSigner::new(service.signing_key())
        .sign(&mut genuine, SERVICE_SIGNER, None)
        .unwrap();

    let mut forged = RawSignedModel::from_content(&RawCardContent::new(
        "mallory",
        &alice.public_key_bytes(),
    ))
    .unwrap();
    forged.signatures = genuine.signatures.clone();

    assert!(verify_card(&parse_card(&genuine).unwrap(), &policy));
    assert!(!verify_card(&parse_card(&forged).unwrap(), &policy));
}
