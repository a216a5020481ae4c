//! # Deployment Configuration
//!
//! The document a deployer writes to describe `initialize`, in YAML or JSON:
//!
//! ```yaml
//! admin: "<64 hex chars>"
//! decimals: 9
//! mint:
//!   policy: { unauthorized: false, fixed_amount: false, ranged_amount: true }
//!   range: { min_amount: 1, max_amount: 5000 }
//! burn:
//!   policy: { unauthorized: true, fixed_amount: true, ranged_amount: false }
//!   range: { fixed_amount: 100 }
//! proof_requirements:
//!   transfer: { should_verify: true, require_recipient_match: true }
//! ```
//!
//! Range fields not given take their defaults from [`AmountRange::DEFAULT`];
//! a range may only name the fields its policy's mode uses. Omitted proof
//! requirements are fully disabled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use zkt_core::{Address, ValidationError};
use zkt_policy::{AmountPolicy, AmountRange, ProofRequirement, RangeOverrides};

use crate::params::InitParams;

/// Policy and range overrides for one amount operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountConfig {
    /// Amount policy.
    pub policy: AmountPolicy,
    /// Range fields to override.
    #[serde(default)]
    pub range: RangeOverrides,
}

/// Proof requirement per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofRequirements {
    /// Mint.
    pub mint: ProofRequirement,
    /// Burn.
    pub burn: ProofRequirement,
    /// Transfer.
    pub transfer: ProofRequirement,
    /// Bulk update.
    pub bulk_update: ProofRequirement,
}

/// A token deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// First administrator.
    pub admin: Address,
    /// Display decimals.
    pub decimals: u8,
    /// Mint amount configuration.
    pub mint: AmountConfig,
    /// Burn amount configuration.
    pub burn: AmountConfig,
    /// Proof requirements.
    #[serde(default)]
    pub proof_requirements: ProofRequirements,
}

impl DeploymentConfig {
    /// Parse a YAML deployment document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ValidationError> {
        serde_yaml::from_str(source)
            .map_err(|e| ValidationError::InvalidConfig(format!("YAML: {e}")))
    }

    /// Parse a JSON deployment document.
    pub fn from_json_str(source: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(source)
            .map_err(|e| ValidationError::InvalidConfig(format!("JSON: {e}")))
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&source)?,
            Some("json") => Self::from_json_str(&source)?,
            _ => {
                return Err(ValidationError::InvalidConfig(format!(
                    "unsupported configuration format: {}",
                    path.display()
                )))
            }
        };
        tracing::debug!(path = %path.display(), admin = %config.admin, "deployment configuration loaded");
        Ok(config)
    }

    /// Resolve ranges and produce the `initialize` arguments.
    pub fn to_init_params(&self) -> Result<InitParams, ValidationError> {
        Ok(InitParams {
            admin: self.admin,
            decimals: self.decimals,
            mint_policy: self.mint.policy,
            mint_range: AmountRange::create(&self.mint.policy, self.mint.range)?,
            burn_policy: self.burn.policy,
            burn_range: AmountRange::create(&self.burn.policy, self.burn.range)?,
            mint_requirement: self.proof_requirements.mint,
            burn_requirement: self.proof_requirements.burn,
            transfer_requirement: self.proof_requirements.transfer,
            bulk_update_requirement: self.proof_requirements.bulk_update,
        })
    }

    /// Every check `initialize` would make on the arguments.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_init_params()?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(admin: &str) -> String {
        format!(
            r#"
admin: "{admin}"
decimals: 9
mint:
  policy: {{ unauthorized: false, fixed_amount: false, ranged_amount: true }}
  range: {{ min_amount: 10, max_amount: 5000 }}
burn:
  policy: {{ unauthorized: true, fixed_amount: true, ranged_amount: false }}
  range: {{ fixed_amount: 100 }}
proof_requirements:
  transfer: {{ should_verify: true, require_recipient_match: true }}
"#
        )
    }

    #[test]
    fn yaml_resolves_to_init_params() {
        let admin = Address([0x3a; 32]);
        let config = DeploymentConfig::from_yaml_str(&yaml(&admin.to_hex())).unwrap();
        config.validate().unwrap();
        let params = config.to_init_params().unwrap();
        assert_eq!(params.admin, admin);
        assert_eq!(params.mint_range, AmountRange { fixed_amount: 200, min_amount: 10, max_amount: 5000 });
        assert_eq!(params.burn_range, AmountRange { fixed_amount: 100, min_amount: 1, max_amount: 1000 });
        assert!(params.transfer_requirement.should_verify);
        assert!(params.transfer_requirement.require_recipient_match);
        assert!(!params.transfer_requirement.require_token_id_match);
        assert_eq!(params.mint_requirement, ProofRequirement::DISABLED);
    }

    #[test]
    fn json_equivalent() {
        let admin = Address([0x3b; 32]);
        let from_yaml = DeploymentConfig::from_yaml_str(&yaml(&admin.to_hex())).unwrap();
        let json = serde_json::to_string(&from_yaml).unwrap();
        assert_eq!(DeploymentConfig::from_json_str(&json).unwrap(), from_yaml);
    }

    #[test]
    fn range_field_outside_policy_mode_rejected() {
        let admin = Address([0x3c; 32]).to_hex();
        let source = yaml(&admin).replace("range: { fixed_amount: 100 }", "range: { min_amount: 100 }");
        let config = DeploymentConfig::from_yaml_str(&source).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidPolicyData(_))));
    }

    #[test]
    fn inverted_range_rejected() {
        let admin = Address([0x3d; 32]).to_hex();
        let source = yaml(&admin).replace("min_amount: 10, max_amount: 5000", "min_amount: 5000, max_amount: 10");
        let config = DeploymentConfig::from_yaml_str(&source).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn circulation_admin_rejected() {
        let config = DeploymentConfig::from_yaml_str(&yaml(&Address::CIRCULATION.to_hex())).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_documents_rejected() {
        assert!(matches!(
            DeploymentConfig::from_yaml_str("admin: [1, 2"),
            Err(ValidationError::InvalidConfig(_))
        ));
        let unknown = format!("{}\nsurprise: true\n", yaml(&Address([1; 32]).to_hex()));
        assert!(DeploymentConfig::from_yaml_str(&unknown).is_err());
    }

    #[test]
    fn unknown_extension_rejected() {
        let path = std::env::temp_dir().join("zkt-deployment-config-test.toml");
        std::fs::write(&path, "admin = 1").unwrap();
        let result = DeploymentConfig::from_path(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ValidationError::InvalidConfig(_))));
    }
}
