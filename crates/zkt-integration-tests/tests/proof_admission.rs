//! Proof admission through the contract: the six match flags, invalid
//! proofs, missing keys, and snapshots that go stale before commit.

mod common;

use common::{user, Harness};
use metrics_exporter_prometheus::PrometheusBuilder;
use zkt_core::{
    Address, AuthorizationError, OperationKey, ProofConsistencyError, RegistryError, TokenId,
};
use zkt_ledger::{AccountId, LedgerError, Transaction};
use zkt_policy::ProofRequirement;
use zkt_token::{AccountUpdate, AccountUpdateForest, TokenError};
use zkt_zkp::{MockProofSystem, ProofPublicInput, ProofPublicOutput};

const VERIFY_ONLY: ProofRequirement = ProofRequirement {
    should_verify: true,
    ..ProofRequirement::DISABLED
};

/// A harness where `sender` has non-zero balances and nonces on both
/// tokens, and transfer proofs are checked under `VERIFY_ONLY`.
fn funded(sender: Address) -> (Harness, zkt_zkp::BackendProvingKey, zkt_zkp::BackendVerifyingKey) {
    let mut h = Harness::new();
    h.ledger.fund(AccountId::settlement(sender), 5_000).unwrap();
    h.seed_balance(sender, 300);
    let mut bump = Transaction::new();
    bump.increment_nonce(AccountId::settlement(sender));
    bump.increment_nonce(h.token_account(sender));
    bump.increment_nonce(h.token_account(sender));
    h.commit(bump);
    let (pk, vk) = h.gate(OperationKey::Transfer, VERIFY_ONLY);
    (h, pk, vk)
}

type Tamper = fn(&mut ProofPublicInput, &mut ProofPublicOutput);
type Enable = fn(&mut ProofRequirement);

#[test]
fn each_flag_rejects_only_its_own_mismatch() {
    let sender = user(0x31);
    let receiver = user(0x32);
    let (mut h, pk, vk) = funded(sender);

    let cases: [(Enable, Tamper, ProofConsistencyError); 6] = [
        (
            |r| r.require_recipient_match = true,
            |i, _| i.operation_address = Address([0x99; 32]),
            ProofConsistencyError::RecipientMismatch,
        ),
        (
            |r| r.require_token_id_match = true,
            |_, o| o.token_account.token_id = TokenId([0x99; 32]),
            ProofConsistencyError::TokenIdMismatch,
        ),
        (
            |r| r.require_mina_balance_match = true,
            |_, o| o.mina_balance += 1,
            ProofConsistencyError::MinaBalanceMismatch,
        ),
        (
            |r| r.require_custom_balance_match = true,
            |_, o| o.token_balance -= 1,
            ProofConsistencyError::CustomBalanceMismatch,
        ),
        (
            |r| r.require_mina_nonce_match = true,
            |_, o| o.mina_nonce += 1,
            ProofConsistencyError::MinaNonceMismatch,
        ),
        (
            |r| r.require_custom_nonce_match = true,
            |_, o| o.token_nonce = 0,
            ProofConsistencyError::CustomNonceMismatch,
        ),
    ];

    for (enable, tamper, expected) in cases {
        let proof = h.prove_with(&pk, sender, tamper);
        let attachment = h.attach(proof, &vk);

        h.set_requirement(OperationKey::Transfer, VERIFY_ONLY);
        assert!(
            h.contract.transfer(&h.ledger, sender, receiver, 10, &attachment).is_ok(),
            "{expected:?} should be masked while its flag is off"
        );

        let mut requirement = VERIFY_ONLY;
        enable(&mut requirement);
        h.set_requirement(OperationKey::Transfer, requirement);
        match h.contract.transfer(&h.ledger, sender, receiver, 10, &attachment) {
            Err(TokenError::ProofConsistency(e)) => assert_eq!(e, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}

#[test]
fn strict_requirement_admits_consistent_proof() {
    let sender = user(0x33);
    let receiver = user(0x34);
    let (mut h, pk, vk) = funded(sender);
    h.set_requirement(OperationKey::Transfer, ProofRequirement::STRICT);

    let attachment = h.attach(h.prove(&pk, sender), &vk);
    let tx = h.contract.transfer(&h.ledger, sender, receiver, 120, &attachment);
    h.apply(tx);
    assert_eq!(h.balance(sender), 180);
    assert_eq!(h.balance(receiver), 120);
    assert_eq!(h.contract.get_circulating(&h.ledger), 300);
}

#[test]
fn forged_statement_rejected_whatever_the_flags() {
    let sender = user(0x35);
    let (mut h, pk, vk) = funded(sender);
    let mut proof = h.prove(&pk, sender);
    proof.public_output.token_balance = 1_000_000;
    let attachment = h.attach(proof, &vk);

    for requirement in [VERIFY_ONLY, ProofRequirement { require_custom_balance_match: false, ..ProofRequirement::STRICT }] {
        h.set_requirement(OperationKey::Transfer, requirement);
        assert!(matches!(
            h.contract.transfer(&h.ledger, sender, user(0x36), 10, &attachment),
            Err(TokenError::ProofConsistency(ProofConsistencyError::InvalidProof(_)))
        ));
    }
}

#[test]
fn nonce_moving_after_build_fails_commit() {
    let sender = user(0x37);
    let (mut h, pk, vk) = funded(sender);
    h.set_requirement(
        OperationKey::Transfer,
        ProofRequirement { require_mina_nonce_match: true, ..VERIFY_ONLY },
    );
    let attachment = h.attach(h.prove(&pk, sender), &vk);
    let tx = h.contract.transfer(&h.ledger, sender, user(0x38), 10, &attachment).unwrap();

    let mut concurrent = Transaction::new();
    concurrent.increment_nonce(AccountId::settlement(sender));
    h.commit(concurrent);

    assert!(matches!(h.ledger.commit(tx), Err(LedgerError::PreconditionFailed(_))));
    assert_eq!(h.balance(sender), 300);
}

#[test]
fn unregistered_key_is_missing_only_when_verifying() {
    let mut h = Harness::new();
    let (pk, vk) = MockProofSystem::setup("burn");
    let holder = user(0x39);
    h.seed_balance(holder, 50);

    let attachment = h.attach(h.prove(&pk, holder), &vk);
    let tx = h.contract.burn(&h.ledger, holder, 5, &attachment, None);
    h.apply(tx);

    h.set_requirement(OperationKey::Burn, VERIFY_ONLY);
    let attachment = h.attach(h.prove(&pk, holder), &vk);
    assert!(matches!(
        h.contract.burn(&h.ledger, holder, 5, &attachment, None),
        Err(TokenError::Registry(RegistryError::MissingKey(OperationKey::Burn)))
    ));
}

#[test]
fn stale_map_in_attachment_rejected() {
    let sender = user(0x3a);
    let (mut h, pk, vk) = funded(sender);
    let attachment = h.attach(h.prove(&pk, sender), &vk);

    let (_, mint_vk) = MockProofSystem::setup("mint");
    h.register(OperationKey::Mint, &mint_vk);

    assert!(matches!(
        h.contract.transfer(&h.ledger, sender, user(0x3b), 10, &attachment),
        Err(TokenError::Registry(RegistryError::StaleRegistry { .. }))
    ));
}

#[test]
fn unproven_variants_refused_when_verification_on() {
    let mut h = Harness::new();
    let a = user(0x3c);
    let b = user(0x3d);
    h.seed_balance(a, 100);
    for operation in OperationKey::ALL {
        h.set_requirement(operation, VERIFY_ONLY);
    }
    let forest = AccountUpdateForest::new(vec![
        AccountUpdate::balance(a, -10),
        AccountUpdate::balance(b, 10),
    ]);

    let results = [
        (OperationKey::Mint, h.contract.mint_unproven(&h.ledger, a, 5, None)),
        (OperationKey::Burn, h.contract.burn_unproven(&h.ledger, a, 5, None)),
        (OperationKey::Transfer, h.contract.transfer_unproven(&h.ledger, a, b, 5)),
        (OperationKey::BulkUpdate, h.contract.bulk_update_unproven(&h.ledger, &forest)),
    ];
    for (operation, result) in results {
        match result {
            Err(TokenError::Authorization(AuthorizationError::NoPermissionForSideloadDisabledOperation(op))) => {
                assert_eq!(op, operation)
            }
            other => panic!("{operation}: expected refusal, got {other:?}"),
        }
    }
}

#[test]
fn rejected_admission_is_counted() {
    let sender = user(0x3e);
    let (mut h, pk, vk) = funded(sender);
    h.set_requirement(
        OperationKey::Transfer,
        ProofRequirement { require_recipient_match: true, ..VERIFY_ONLY },
    );
    let proof = h.prove_with(&pk, sender, |i, _| i.operation_address = Address([0x99; 32]));
    let attachment = h.attach(proof, &vk);

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let result = metrics::with_local_recorder(&recorder, || {
        h.contract.transfer(&h.ledger, sender, user(0x3f), 10, &attachment)
    });
    assert!(matches!(
        result,
        Err(TokenError::ProofConsistency(ProofConsistencyError::RecipientMismatch))
    ));

    let text = handle.render();
    for name in ["zkt_proof_admissions_total", "zkt_operations_total"] {
        let line = text
            .lines()
            .find(|l| l.starts_with(name) && l.contains(r#"outcome="proof_consistency""#))
            .unwrap_or_else(|| panic!("no {name} sample in:\n{text}"));
        assert!(line.contains(r#"operation="transfer""#), "{line}");
        assert!(line.ends_with(" 1"), "{line}");
    }
}
