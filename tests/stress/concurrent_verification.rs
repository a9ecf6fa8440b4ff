//! Concurrency test: one shared policy verifying many cards in parallel.
//!
//! Validates that verification needs no coordination and produces the same
//! verdicts on every thread.

use std::sync::{Arc, Mutex};
use std::thread;

use card_trust::card::{parse_card, Card, CardSigner, RawCardContent, RawSignedModel};
use card_trust::crypto::{Ed25519CardCrypto, Ed25519KeyPair};
use card_trust::verify::{
    verify_card, CardVerifier, TrustPolicy, VerifierCredential, Whitelist, SERVICE_SIGNER,
};

struct Issuers {
    service: Ed25519KeyPair,
    employer: Ed25519KeyPair,
}

/// Build a card; odd-numbered cards lack the employer signature.
fn make_card(issuers: &Issuers, index: usize) -> Card {
    let subject = Ed25519KeyPair::generate();
    let content = RawCardContent::new(format!("user-{index}"), &subject.public_key_bytes());
    let mut raw = RawSignedModel::from_content(&content).expect("content should serialize");
    CardSigner::new(subject.signing_key())
        .self_sign(&mut raw, None)
        .expect("self signing should succeed");
    CardSigner::new(issuers.service.signing_key())
        .sign(&mut raw, SERVICE_SIGNER, None)
        .expect("service signing should succeed");
    if index % 2 == 0 {
        CardSigner::new(issuers.employer.signing_key())
            .sign(&mut raw, "employer", None)
            .expect("employer signing should succeed");
    }
    parse_card(&raw).expect("card should parse")
}

#[test]
fn stress_shared_policy_across_threads() {
    let issuers = Issuers {
        service: Ed25519KeyPair::generate(),
        employer: Ed25519KeyPair::generate(),
    };
    let policy = TrustPolicy::builder(Ed25519CardCrypto, &issuers.service.public_key_bytes())
        .whitelist(Whitelist::new(vec![VerifierCredential::new(
            "employer",
            issuers.employer.public_key_bytes(),
        )]))
        .build()
        .expect("policy should build");

    let cards: Arc<Vec<Card>> = Arc::new((0..40).map(|i| make_card(&issuers, i)).collect());
    let policy = Arc::new(policy);
    let results = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cards = Arc::clone(&cards);
        let policy = Arc::clone(&policy);
        let results = Arc::clone(&results);
        handles.push(thread::spawn(move || {
            let verdicts: Vec<bool> = cards.iter().map(|c| verify_card(c, &policy)).collect();
            results.lock().unwrap().push(verdicts);
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let expected: Vec<bool> = (0..40).map(|i| i % 2 == 0).collect();
    let results = results.lock().unwrap();
    assert_eq!(results.len(), 16);
    for verdicts in results.iter() {
        assert_eq!(verdicts, &expected);
    }
}

#[test]
fn stress_verifier_trait_object_across_threads() {
    let issuers = Issuers {
        service: Ed25519KeyPair::generate(),
        employer: Ed25519KeyPair::generate(),
    };
    let verifier: Arc<dyn CardVerifier> = Arc::new(
        TrustPolicy::builder(Ed25519CardCrypto, &issuers.service.public_key_bytes())
            .build()
            .expect("policy should build"),
    );
    let card = Arc::new(make_card(&issuers, 1));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let verifier = Arc::clone(&verifier);
            let card = Arc::clone(&card);
            thread::spawn(move || (0..50).all(|_| verifier.verify_card(&card)))
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap(), "every verification should succeed");
    }
}
