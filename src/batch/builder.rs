//! Call Batch Builders
//!
//! Pure functions producing the demo batches. All values are constants.

use crate::CallDescriptor;
use ethers::abi::{self, Token};
use ethers::types::{Address, Bytes, H160, U256};
use ethers::utils::id;

pub const BATCH_RECIPIENT_A: Address = H160([
    0x72, 0x91, 0x70, 0xd3, 0x8d, 0xd5, 0x44, 0x96, 0x04, 0xf3, 0x5f, 0x34, 0x9f, 0xdf, 0xcc, 0x9a, 0xd0, 0x82,
    0x57, 0xcd,
]);

pub const BATCH_RECIPIENT_B: Address = H160([
    0xf4, 0x31, 0x98, 0x42, 0x93, 0x40, 0x25, 0x82, 0x3b, 0x46, 0x1d, 0xb1, 0xfa, 0x54, 0x5d, 0x14, 0x48, 0x33,
    0xe8, 0x4e,
]);

/// USDC on Base
pub const BASE_USDC: Address = H160([
    0x83, 0x35, 0x89, 0xfc, 0xd6, 0xed, 0xb6, 0xe0, 0x8f, 0x4c, 0x7c, 0x32, 0xd4, 0xf7, 0x1b, 0x54, 0xbd, 0xa0,
    0x29, 0x13,
]);

/// Test contract that pulls an approved USDC amount from the caller
pub const MOCK_TRANSFER: Address = H160([
    0xdc, 0x5a, 0x77, 0x2d, 0x22, 0x55, 0x85, 0x24, 0xcb, 0xbb, 0xfa, 0x8b, 0xa6, 0xe8, 0x3b, 0x5b, 0xeb, 0xe4,
    0x57, 0x83,
]);

/// 0.00002 ether
pub const DEMO_TRANSFER_WEI: u64 = 20_000_000_000_000;

/// 0.01 USDC (6 decimals)
pub const DEMO_USDC_TRANSFER: u64 = 10_000;

/// 0.10 USDC (6 decimals)
pub const TEN_CENTS_USDC: u64 = 100_000;

fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let mut data = id(signature).to_vec();
    data.extend(abi::encode(args));
    data.into()
}

/// `transfer(address,uint256)` calldata
pub fn erc20_transfer(to: Address, amount: U256) -> Bytes {
    encode_call("transfer(address,uint256)", &[Token::Address(to), Token::Uint(amount)])
}

/// `approve(address,uint256)` calldata
pub fn erc20_approve(spender: Address, amount: U256) -> Bytes {
    encode_call("approve(address,uint256)", &[Token::Address(spender), Token::Uint(amount)])
}

/// `mockTransfer(uint256)` calldata
pub fn mock_transfer(amount: U256) -> Bytes {
    encode_call("mockTransfer(uint256)", &[Token::Uint(amount)])
}

/// Two ether transfers followed by a USDC transfer
pub fn demo_transfer_calls() -> Vec<CallDescriptor> {
    vec![
        CallDescriptor::transfer(BATCH_RECIPIENT_A, U256::from(DEMO_TRANSFER_WEI)),
        CallDescriptor::transfer(BATCH_RECIPIENT_B, U256::from(DEMO_TRANSFER_WEI)),
        CallDescriptor::contract_call(
            BASE_USDC,
            erc20_transfer(BATCH_RECIPIENT_A, U256::from(DEMO_USDC_TRANSFER)),
        ),
    ]
}

/// USDC approval for `MOCK_TRANSFER`, then the transfer that spends it
///
/// The second call only succeeds after the first has taken effect on chain,
/// so this batch is always submitted non-atomically.
pub fn approve_and_transfer_calls() -> Vec<CallDescriptor> {
    let amount = U256::from(TEN_CENTS_USDC);
    vec![
        CallDescriptor::contract_call(BASE_USDC, erc20_approve(MOCK_TRANSFER, amount)),
        CallDescriptor::contract_call(MOCK_TRANSFER, mock_transfer(amount)),
    ]
}
