use alloy_primitives::{Address, U256};

/// An operation selector together with its decoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Initialize { target_asset: Address },
    /// A plain native payment with no other selector.
    Receive,
    SetRate { rate: U256 },
    SetTargetAsset { asset: Address },
    WithdrawNative,
    WithdrawAssets {
        assets: Vec<Address>,
        amounts: Vec<U256>,
    },
    UpgradeTo { implementation: Address },
    GetImplementation,
    Owner,
    TransferOwnership { new_owner: Address },
    Rate,
    TargetAsset,
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Initialize { .. } => "initialize",
            Call::Receive => "receive",
            Call::SetRate { .. } => "setRate",
            Call::SetTargetAsset { .. } => "setTargetAsset",
            Call::WithdrawNative => "withdrawNative",
            Call::WithdrawAssets { .. } => "withdrawAssets",
            Call::UpgradeTo { .. } => "upgradeTo",
            Call::GetImplementation => "getImplementation",
            Call::Owner => "owner",
            Call::TransferOwnership { .. } => "transferOwnership",
            Call::Rate => "rate",
            Call::TargetAsset => "targetAsset",
        }
    }

    pub fn is_payable(&self) -> bool {
        matches!(self, Call::Receive)
    }
}

/// The value returned by a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Unit,
    Address(Address),
    Uint(U256),
}

impl Output {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Output::Address(address) => Some(*address),
            _ => None,
        }
    }
}

/// Execution context of a call.
///
/// `this` is the address whose storage and balances the running code operates on. A
/// delegated call keeps the frame of its caller, so logic deployed elsewhere runs
/// against the delegating contract's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub this: Address,
    pub caller: Address,
    pub value: U256,
}

/// One line of a scenario: either a faucet credit or a call sent to the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Fund {
        account: Address,
        amount: U256,
    },
    Call {
        caller: Address,
        value: U256,
        call: Call,
    },
}
