use crate::domain::call::{Call, Step};
use crate::domain::snapshot::Deployment;
use crate::domain::units::{NATIVE_DECIMALS, parse_units};
use crate::error::{Result, SwapperError};
use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One raw scenario line: `caller, op, value, args`.
///
/// `value` is in whole native units. `args` is a space separated argument list where
/// list arguments are joined with `;`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScenarioRecord {
    pub caller: Address,
    pub op: String,
    pub value: Option<Decimal>,
    pub args: Option<String>,
}

impl ScenarioRecord {
    /// Decodes the record, resolving the `token`, `proxy`, `implementation` and
    /// `deployer` aliases against `deployment`.
    pub fn into_step(self, deployment: &Deployment) -> Result<Step> {
        let value = parse_units(self.value.unwrap_or(Decimal::ZERO), NATIVE_DECIMALS)?;
        let raw_args = self.args.unwrap_or_default();
        let args = Args {
            op: &self.op,
            values: raw_args.split_whitespace().collect(),
            deployment,
        };

        let call = match self.op.as_str() {
            "fund" => {
                return Ok(Step::Fund {
                    account: self.caller,
                    amount: value,
                });
            }
            "initialize" => Call::Initialize {
                target_asset: args.address(0)?,
            },
            "receive" => Call::Receive,
            "setRate" => Call::SetRate {
                rate: args.uint(0)?,
            },
            "setTargetAsset" => Call::SetTargetAsset {
                asset: args.address(0)?,
            },
            "withdrawNative" => Call::WithdrawNative,
            "withdrawAssets" => Call::WithdrawAssets {
                assets: args.address_list(0)?,
                amounts: args.uint_list(1)?,
            },
            "upgradeTo" => Call::UpgradeTo {
                implementation: args.address(0)?,
            },
            "getImplementation" => Call::GetImplementation,
            "owner" => Call::Owner,
            "transferOwnership" => Call::TransferOwnership {
                new_owner: args.address(0)?,
            },
            "rate" => Call::Rate,
            "targetAsset" => Call::TargetAsset,
            other => {
                return Err(SwapperError::ValidationError(format!(
                    "Unknown operation `{other}`"
                )));
            }
        };

        Ok(Step::Call {
            caller: self.caller,
            value,
            call,
        })
    }
}

struct Args<'a> {
    op: &'a str,
    values: Vec<&'a str>,
    deployment: &'a Deployment,
}

impl<'a> Args<'a> {
    fn get(&self, index: usize) -> Result<&'a str> {
        self.values.get(index).copied().ok_or_else(|| {
            SwapperError::ValidationError(format!(
                "`{}` expects argument #{}",
                self.op,
                index + 1
            ))
        })
    }

    fn list(&self, index: usize) -> Result<Vec<&'a str>> {
        Ok(self
            .get(index)?
            .split(';')
            .filter(|item| !item.is_empty())
            .collect())
    }

    fn address(&self, index: usize) -> Result<Address> {
        resolve_address(self.get(index)?, self.deployment)
    }

    fn uint(&self, index: usize) -> Result<U256> {
        parse_uint(self.get(index)?)
    }

    fn address_list(&self, index: usize) -> Result<Vec<Address>> {
        self.list(index)?
            .into_iter()
            .map(|item| resolve_address(item, self.deployment))
            .collect()
    }

    fn uint_list(&self, index: usize) -> Result<Vec<U256>> {
        self.list(index)?.into_iter().map(parse_uint).collect()
    }
}

fn resolve_address(raw: &str, deployment: &Deployment) -> Result<Address> {
    match raw {
        "token" => Ok(deployment.token),
        "proxy" => Ok(deployment.proxy),
        "implementation" => Ok(deployment.implementation),
        "deployer" => Ok(deployment.deployer),
        _ => Address::from_str(raw)
            .map_err(|e| SwapperError::ValidationError(format!("Invalid address `{raw}`: {e}"))),
    }
}

fn parse_uint(raw: &str) -> Result<U256> {
    U256::from_str(raw)
        .map_err(|e| SwapperError::ValidationError(format!("Invalid integer `{raw}`: {e}")))
}

/// Reads scenario records from a CSV source.
///
/// Whitespace is trimmed and records may omit trailing columns.
pub struct ScenarioReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScenarioReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records(self) -> impl Iterator<Item = Result<ScenarioRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SwapperError::from))
    }
}
