use serde::{Deserialize, Serialize};

/// On-chain operation categories (`Transaction.Contract.ContractType`)
///
/// Each variant's discriminant is the number the network assigns to it and is also the
/// bit index used in an active permission's operations mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ContractType {
    AccountCreateContract = 0,
    TransferContract = 1,
    TransferAssetContract = 2,
    VoteAssetContract = 3,
    VoteWitnessContract = 4,
    WitnessCreateContract = 5,
    AssetIssueContract = 6,
    WitnessUpdateContract = 8,
    ParticipateAssetIssueContract = 9,
    AccountUpdateContract = 10,
    FreezeBalanceContract = 11,
    UnfreezeBalanceContract = 12,
    WithdrawBalanceContract = 13,
    UnfreezeAssetContract = 14,
    UpdateAssetContract = 15,
    ProposalCreateContract = 16,
    ProposalApproveContract = 17,
    ProposalDeleteContract = 18,
    SetAccountIdContract = 19,
    CustomContract = 20,
    CreateSmartContract = 30,
    TriggerSmartContract = 31,
    GetContract = 32,
    UpdateSettingContract = 33,
    ExchangeCreateContract = 41,
    ExchangeInjectContract = 42,
    ExchangeWithdrawContract = 43,
    ExchangeTransactionContract = 44,
    UpdateEnergyLimitContract = 45,
    AccountPermissionUpdateContract = 46,
    ClearABIContract = 48,
    UpdateBrokerageContract = 49,
    ShieldedTransferContract = 51,
    MarketSellAssetContract = 52,
    MarketCancelOrderContract = 53,
    FreezeBalanceV2Contract = 54,
    UnfreezeBalanceV2Contract = 55,
    WithdrawExpireUnfreezeContract = 56,
    DelegateResourceContract = 57,
    UnDelegateResourceContract = 58,
    CancelAllUnfreezeV2Contract = 59,
}

use ContractType::*;

/// Registry table, ordered by id
const REGISTRY: &[(ContractType, &str)] = &[
    (AccountCreateContract, "AccountCreateContract"),
    (TransferContract, "TransferContract"),
    (TransferAssetContract, "TransferAssetContract"),
    (VoteAssetContract, "VoteAssetContract"),
    (VoteWitnessContract, "VoteWitnessContract"),
    (WitnessCreateContract, "WitnessCreateContract"),
    (AssetIssueContract, "AssetIssueContract"),
    (WitnessUpdateContract, "WitnessUpdateContract"),
    (ParticipateAssetIssueContract, "ParticipateAssetIssueContract"),
    (AccountUpdateContract, "AccountUpdateContract"),
    (FreezeBalanceContract, "FreezeBalanceContract"),
    (UnfreezeBalanceContract, "UnfreezeBalanceContract"),
    (WithdrawBalanceContract, "WithdrawBalanceContract"),
    (UnfreezeAssetContract, "UnfreezeAssetContract"),
    (UpdateAssetContract, "UpdateAssetContract"),
    (ProposalCreateContract, "ProposalCreateContract"),
    (ProposalApproveContract, "ProposalApproveContract"),
    (ProposalDeleteContract, "ProposalDeleteContract"),
    (SetAccountIdContract, "SetAccountIdContract"),
    (CustomContract, "CustomContract"),
    (CreateSmartContract, "CreateSmartContract"),
    (TriggerSmartContract, "TriggerSmartContract"),
    (GetContract, "GetContract"),
    (UpdateSettingContract, "UpdateSettingContract"),
    (ExchangeCreateContract, "ExchangeCreateContract"),
    (ExchangeInjectContract, "ExchangeInjectContract"),
    (ExchangeWithdrawContract, "ExchangeWithdrawContract"),
    (ExchangeTransactionContract, "ExchangeTransactionContract"),
    (UpdateEnergyLimitContract, "UpdateEnergyLimitContract"),
    (AccountPermissionUpdateContract, "AccountPermissionUpdateContract"),
    (ClearABIContract, "ClearABIContract"),
    (UpdateBrokerageContract, "UpdateBrokerageContract"),
    (ShieldedTransferContract, "ShieldedTransferContract"),
    (MarketSellAssetContract, "MarketSellAssetContract"),
    (MarketCancelOrderContract, "MarketCancelOrderContract"),
    (FreezeBalanceV2Contract, "FreezeBalanceV2Contract"),
    (UnfreezeBalanceV2Contract, "UnfreezeBalanceV2Contract"),
    (WithdrawExpireUnfreezeContract, "WithdrawExpireUnfreezeContract"),
    (DelegateResourceContract, "DelegateResourceContract"),
    (UnDelegateResourceContract, "UnDelegateResourceContract"),
    (CancelAllUnfreezeV2Contract, "CancelAllUnfreezeV2Contract"),
];

impl ContractType {
    /// Numeric id, also the bit index in an operations mask
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(contract_type, _)| *contract_type == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    /// Look up a contract type by its id, `None` if the id is not registered
    pub fn from_id(id: i32) -> Option<ContractType> {
        REGISTRY
            .iter()
            .find(|(contract_type, _)| contract_type.id() == id)
            .map(|(contract_type, _)| *contract_type)
    }

    /// Look up a contract type by its exact name, `None` if the name is not registered
    pub fn from_name(name: &str) -> Option<ContractType> {
        REGISTRY
            .iter()
            .find(|(_, registered)| *registered == name)
            .map(|(contract_type, _)| *contract_type)
    }

    /// All registered contract types in id order
    pub fn all() -> impl Iterator<Item = ContractType> {
        REGISTRY.iter().map(|(contract_type, _)| *contract_type)
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
