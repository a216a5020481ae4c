//! Shared harness: a ledger with one deployed, initialized token contract,
//! its administrator key, and the administrator's copy of the registry map.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use zkt_core::{Address, OperationKey, TokenId};
use zkt_crypto::{Ed25519KeyPair, Ed25519Signature};
use zkt_ledger::{AccountId, Ledger, Transaction};
use zkt_policy::{AmountPolicy, AmountRange, ProofRequirement};
use zkt_token::{
    sign_admin_action, AdminAction, InitParams, ProofAttachment, TokenContract, TokenError,
    VKeyMap,
};
use zkt_zkp::{
    AccountSnapshot, BackendProvingKey, BackendVerifyingKey, MockProofSystem, ProofPublicInput,
    ProofPublicOutput, SideloadedProof,
};

/// Route `tracing` output through the test writer; `RUST_LOG` filters it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The key of test holder `n`.
pub fn holder(n: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed(&[n; 32])
}

/// Address of test holder `n`.
pub fn user(n: u8) -> Address {
    holder(n).address()
}

/// The test holder behind `address`, if it is one.
pub fn holder_of(address: Address) -> Option<Ed25519KeyPair> {
    static INDEX: OnceLock<BTreeMap<Address, u8>> = OnceLock::new();
    let index = INDEX.get_or_init(|| (0..=u8::MAX).map(|n| (user(n), n)).collect());
    index.get(&address).map(|n| holder(*n))
}

/// Permissive defaults: ranged, unauthorized, 1..=1000, no proofs.
pub fn default_params(admin: Address) -> InitParams {
    InitParams {
        admin,
        decimals: 9,
        mint_policy: AmountPolicy::ranged(true),
        mint_range: AmountRange::DEFAULT,
        burn_policy: AmountPolicy::ranged(true),
        burn_range: AmountRange::DEFAULT,
        mint_requirement: ProofRequirement::DISABLED,
        burn_requirement: ProofRequirement::DISABLED,
        transfer_requirement: ProofRequirement::DISABLED,
        bulk_update_requirement: ProofRequirement::DISABLED,
    }
}

pub struct Harness {
    pub ledger: Ledger,
    pub contract: TokenContract,
    pub admin: Ed25519KeyPair,
    pub registry: VKeyMap,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(|p| p)
    }

    pub fn with_params(customize: impl FnOnce(InitParams) -> InitParams) -> Self {
        Self::deploy(0xc0, customize)
    }

    /// Deploy at `Address([seed; 32])`.
    pub fn deploy(seed: u8, customize: impl FnOnce(InitParams) -> InitParams) -> Self {
        init_tracing();
        let admin = Ed25519KeyPair::from_seed(&[seed ^ 0x5a; 32]);
        let contract = TokenContract::new(Address([seed; 32]));
        let mut ledger = Ledger::new();
        ledger.deploy(contract.address()).unwrap();
        let mut harness = Self {
            ledger,
            contract,
            admin,
            registry: VKeyMap::new(),
        };
        let params = customize(default_params(harness.admin.address()));
        let sig = harness.sign(&AdminAction::Initialize { params });
        let tx = harness.contract.initialize(&harness.ledger, &params, Some(&sig)).unwrap();
        harness.commit(tx);
        harness
    }

    /// Sign with the administrator's current nonce.
    pub fn sign(&self, action: &AdminAction) -> Ed25519Signature {
        let nonce = self.ledger.nonce(&AccountId::settlement(self.admin.address()));
        sign_admin_action(&self.admin, self.contract.address(), nonce, action).unwrap()
    }

    /// Have every test holder the transaction debits or reconfigures sign it.
    pub fn sign_holders(&self, tx: &mut Transaction) {
        for address in tx.authorizers() {
            if let Some(key) = holder_of(address) {
                tx.sign(&key).unwrap();
            }
        }
    }

    /// Commit with the affected holders' signatures.
    pub fn commit(&mut self, mut tx: Transaction) {
        self.sign_holders(&mut tx);
        self.ledger.commit(tx).unwrap();
    }

    pub fn apply(&mut self, result: Result<Transaction, TokenError>) {
        self.commit(result.unwrap());
    }

    pub fn token_account(&self, address: Address) -> AccountId {
        AccountId::new(address, self.contract.token_id())
    }

    pub fn balance(&self, address: Address) -> u64 {
        self.contract.get_balance_of(&self.ledger, address)
    }

    /// Mint without proof or signature under the default policy.
    pub fn seed_balance(&mut self, address: Address, amount: u64) {
        let tx = self.contract.mint_unproven(&self.ledger, address, amount, None);
        self.apply(tx);
    }

    pub fn set_requirement(&mut self, operation: OperationKey, requirement: ProofRequirement) {
        let sig = self.sign(&AdminAction::UpdateProofRequirement { operation, requirement });
        let tx = self
            .contract
            .update_proof_requirement(&self.ledger, operation, requirement, Some(&sig));
        self.apply(tx);
    }

    /// Register `vk` for `operation`, commit, and adopt the new map.
    pub fn register(&mut self, operation: OperationKey, vk: &BackendVerifyingKey) {
        let fingerprint = vk.fingerprint();
        let sig = self.sign(&AdminAction::RegisterVerificationKey {
            operation_key: operation.id(),
            fingerprint,
        });
        let (tx, map) = self
            .contract
            .register_verification_key(&self.ledger, &self.registry, operation.id(), fingerprint, Some(&sig))
            .unwrap();
        self.commit(tx);
        self.registry = map;
    }

    /// Require proofs for `operation` under `requirement`, with a fresh
    /// circuit registered for it.
    pub fn gate(
        &mut self,
        operation: OperationKey,
        requirement: ProofRequirement,
    ) -> (BackendProvingKey, BackendVerifyingKey) {
        let (pk, vk) = MockProofSystem::setup(operation.as_str());
        self.register(operation, &vk);
        self.set_requirement(operation, requirement);
        (pk, vk)
    }

    /// What `subject`'s accounts look like right now.
    pub fn snapshot(&self, subject: Address) -> ProofPublicOutput {
        let mina = AccountId::settlement(subject);
        let custom = self.token_account(subject);
        ProofPublicOutput::from_accounts(
            AccountSnapshot {
                address: subject,
                token_id: TokenId::SETTLEMENT,
                balance: self.ledger.balance(&mina),
                nonce: self.ledger.nonce(&mina),
            },
            AccountSnapshot {
                address: subject,
                token_id: self.contract.token_id(),
                balance: self.ledger.balance(&custom),
                nonce: self.ledger.nonce(&custom),
            },
        )
    }

    /// A proof about `subject` consistent with live state.
    pub fn prove(&self, pk: &BackendProvingKey, subject: Address) -> SideloadedProof {
        self.prove_with(pk, subject, |_, _| {})
    }

    /// A proof about `subject` after `tamper` edits the statement.
    pub fn prove_with(
        &self,
        pk: &BackendProvingKey,
        subject: Address,
        tamper: impl FnOnce(&mut ProofPublicInput, &mut ProofPublicOutput),
    ) -> SideloadedProof {
        let mut input = ProofPublicInput {
            operation_address: subject,
            token_id: self.contract.token_id(),
        };
        let mut output = self.snapshot(subject);
        tamper(&mut input, &mut output);
        SideloadedProof::prove(pk, input, output).unwrap()
    }

    pub fn attach(&self, proof: SideloadedProof, vk: &BackendVerifyingKey) -> ProofAttachment {
        ProofAttachment {
            proof,
            verification_key: vk.clone(),
            registry: self.registry.clone(),
        }
    }
}
