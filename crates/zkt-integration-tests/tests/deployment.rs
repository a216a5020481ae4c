//! Deployment from a configuration document, and the administrator
//! lifecycle afterwards.

mod common;

use common::{init_tracing, user, Harness};
use zkt_core::{Address, AmountOperation, AuthorizationError, OperationKey};
use zkt_crypto::Ed25519KeyPair;
use zkt_ledger::{AccountId, Ledger};
use zkt_policy::{AmountPolicy, AmountRange, ConfigSnapshot, ProofRequirement, RangeField};
use zkt_token::{sign_admin_action, AdminAction, DeploymentConfig, TokenContract, TokenError, TokenEvent};

const DEPLOYMENT: &str = r#"
decimals: 6
mint:
  policy: { unauthorized: false, fixed_amount: false, ranged_amount: true }
  range: { min_amount: 10, max_amount: 10000 }
burn:
  policy: { unauthorized: true, fixed_amount: true, ranged_amount: false }
  range: { fixed_amount: 250 }
proof_requirements:
  transfer: { should_verify: true, require_recipient_match: true, require_custom_balance_match: true }
"#;

#[test]
fn yaml_deployment_initializes_contract() {
    init_tracing();
    let admin = Ed25519KeyPair::from_seed(&[0x77; 32]);
    let document = format!("admin: \"{}\"\n{DEPLOYMENT}", admin.address().to_hex());
    let config = DeploymentConfig::from_yaml_str(&document).unwrap();
    config.validate().unwrap();
    let params = config.to_init_params().unwrap();

    let contract = TokenContract::new(Address([0xd0; 32]));
    let mut ledger = Ledger::new();
    ledger.deploy(contract.address()).unwrap();

    assert!(matches!(
        contract.initialize(&ledger, &params, None),
        Err(TokenError::Authorization(AuthorizationError::MissingAuthorization))
    ));
    let impostor = Ed25519KeyPair::from_seed(&[0x78; 32]);
    let forged = sign_admin_action(&impostor, contract.address(), 0, &AdminAction::Initialize { params }).unwrap();
    assert!(matches!(
        contract.initialize(&ledger, &params, Some(&forged)),
        Err(TokenError::Authorization(AuthorizationError::InvalidSignature(_)))
    ));

    let sig = sign_admin_action(&admin, contract.address(), 0, &AdminAction::Initialize { params }).unwrap();
    let tx = contract.initialize(&ledger, &params, Some(&sig)).unwrap();
    ledger.commit(tx).unwrap();

    assert_eq!(contract.get_admin(&ledger).unwrap(), admin.address());
    assert_eq!(contract.get_decimals(&ledger).unwrap(), 6);
    assert_eq!(ledger.nonce(&AccountId::settlement(admin.address())), 1);

    let config = contract.get_config(&ledger).unwrap();
    assert_eq!(config.mint_range, AmountRange { fixed_amount: 200, min_amount: 10, max_amount: 10000 });
    assert_eq!(config.burn_policy, AmountPolicy::fixed(true));
    assert_eq!(config.burn_range.fixed_amount, 250);
    let transfer = config.requirement(OperationKey::Transfer);
    assert!(transfer.should_verify && transfer.require_recipient_match && transfer.require_custom_balance_match);
    assert!(!transfer.require_mina_nonce_match);
    assert_eq!(config.requirement(OperationKey::Mint), ProofRequirement::DISABLED);

    // Off-chain decoding of the raw words agrees with the contract's view.
    let words = contract.get_all_configs(&ledger).unwrap();
    assert_eq!(ConfigSnapshot::from_words(&words), config);
}

#[test]
fn config_updates_preserve_other_operations() {
    let mut h = Harness::new();
    let before = h.contract.get_config(&h.ledger).unwrap();

    let policy = AmountPolicy::fixed(false);
    let sig = h.sign(&AdminAction::UpdatePolicy { operation: AmountOperation::Burn, policy });
    let tx = h.contract.update_policy(&h.ledger, AmountOperation::Burn, policy, Some(&sig));
    h.apply(tx);

    let sig = h.sign(&AdminAction::UpdateRangeField {
        operation: AmountOperation::Burn,
        field: RangeField::FixedAmount,
        value: 42,
    });
    let tx = h
        .contract
        .update_range_field(&h.ledger, AmountOperation::Burn, RangeField::FixedAmount, 42, Some(&sig));
    h.apply(tx);

    h.set_requirement(OperationKey::BulkUpdate, ProofRequirement::STRICT);

    let after = h.contract.get_config(&h.ledger).unwrap();
    assert_eq!(after.burn_policy, policy);
    assert_eq!(after.burn_range.fixed_amount, 42);
    assert_eq!(after.requirement(OperationKey::BulkUpdate), ProofRequirement::STRICT);
    assert_eq!(after.mint_policy, before.mint_policy);
    assert_eq!(after.mint_range, before.mint_range);
    for op in [OperationKey::Mint, OperationKey::Burn, OperationKey::Transfer] {
        assert_eq!(after.requirement(op), before.requirement(op));
    }
}

#[test]
fn invalid_policy_update_rejected() {
    let h = Harness::new();
    let broken = AmountPolicy { unauthorized: true, fixed_amount: true, ranged_amount: true };
    let sig = h.sign(&AdminAction::UpdatePolicy { operation: AmountOperation::Mint, policy: broken });
    assert!(matches!(
        h.contract.update_policy(&h.ledger, AmountOperation::Mint, broken, Some(&sig)),
        Err(TokenError::Validation(_))
    ));
}

#[test]
fn admin_handover_and_pause_cycle() {
    let mut h = Harness::new();
    let holder = user(0x51);
    h.seed_balance(holder, 40);

    let successor = Ed25519KeyPair::from_seed(&[0x52; 32]);
    let sig = h.sign(&AdminAction::SetAdmin { new_admin: successor.address() });
    let tx = h.contract.set_admin(&h.ledger, successor.address(), Some(&sig));
    h.apply(tx);
    assert_eq!(h.contract.get_admin(&h.ledger).unwrap(), successor.address());

    // The harness key is no longer the administrator.
    assert!(h.contract.pause(&h.ledger, Some(&h.sign(&AdminAction::Pause))).is_err());

    h.admin = successor;
    let tx = h.contract.pause(&h.ledger, Some(&h.sign(&AdminAction::Pause)));
    h.apply(tx);
    assert!(h.contract.get_flags(&h.ledger).unwrap().paused);
    assert!(matches!(
        h.contract.burn_unproven(&h.ledger, holder, 5, None),
        Err(TokenError::Authorization(AuthorizationError::Paused))
    ));
    assert!(matches!(
        h.contract.transfer_unproven(&h.ledger, holder, user(0x53), 5),
        Err(TokenError::Authorization(AuthorizationError::Paused))
    ));

    let tx = h.contract.resume(&h.ledger, Some(&h.sign(&AdminAction::Resume)));
    h.apply(tx);
    let tx = h.contract.transfer_unproven(&h.ledger, holder, user(0x53), 5);
    h.apply(tx);
    assert_eq!(h.balance(user(0x53)), 5);

    let pause_events: Vec<bool> = h
        .ledger
        .events_for(&h.contract.address())
        .filter_map(TokenEvent::decode)
        .filter_map(|e| match e {
            TokenEvent::PauseChanged { is_paused } => Some(is_paused),
            _ => None,
        })
        .collect();
    assert_eq!(pause_events, [true, false]);
}
