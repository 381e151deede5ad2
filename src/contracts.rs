//! Centralized Contract Definitions
//!
//! The closed set of function and event signatures this client speaks,
//! each paired with its argument and return type lists for the codec.
//! Declared once here instead of being rebuilt ad hoc at every call site.

use crate::codec::TypeTag;

use TypeTag::{Address, Uint256, Uint8};

/// A typed function signature: canonical string plus its codec schema.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSig {
    pub signature: &'static str,
    pub params: &'static [TypeTag],
    pub returns: &'static [TypeTag],
}

// ── DefiCore (AMM factory) ───────────────────────────────────────────

pub const CREATE_POOL: FunctionSig = FunctionSig {
    signature: "createPool(address,address,uint256,uint256)",
    params: &[Address, Address, Uint256, Uint256],
    returns: &[],
};

pub const BEST_POOL: FunctionSig = FunctionSig {
    signature: "bestPool(address,address,uint256)",
    params: &[Address, Address, Uint256],
    returns: &[Address],
};

/// Emitted by `createPool`; the creator sits in `topics[1]` and the new
/// pool address in the first word of the log data.
pub const POOL_CREATED_EVENT: &str =
    "PoolCreated(address,address,address,address,uint256,uint256,uint256)";

// ── Pool contract ────────────────────────────────────────────────────

pub const ADD_LIQUIDITY: FunctionSig = FunctionSig {
    signature: "addLiquidity(uint256,uint256)",
    params: &[Uint256, Uint256],
    returns: &[],
};

pub const ADD_LIQUIDITY_ONE_TOKEN: FunctionSig = FunctionSig {
    signature: "addLiquidityWithOneToken(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const REMOVE_LIQUIDITY: FunctionSig = FunctionSig {
    signature: "removeLiquidity(uint256)",
    params: &[Uint256],
    returns: &[],
};

pub const SWAP: FunctionSig = FunctionSig {
    signature: "swap(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const LIQUIDITY_0: FunctionSig = FunctionSig {
    signature: "liquidity0()",
    params: &[],
    returns: &[Uint256],
};

pub const LIQUIDITY_1: FunctionSig = FunctionSig {
    signature: "liquidity1()",
    params: &[],
    returns: &[Uint256],
};

pub const TOKEN_0: FunctionSig = FunctionSig {
    signature: "token0()",
    params: &[],
    returns: &[Address],
};

pub const TOKEN_1: FunctionSig = FunctionSig {
    signature: "token1()",
    params: &[],
    returns: &[Address],
};

pub const LP_SHARES: FunctionSig = FunctionSig {
    signature: "lpShares(address)",
    params: &[Address],
    returns: &[Uint256],
};

pub const TOTAL_SHARES: FunctionSig = FunctionSig {
    signature: "totalShares()",
    params: &[],
    returns: &[Uint256],
};

// ── LendingCore ──────────────────────────────────────────────────────
// Note the inconsistent argument orders between lendTokenA and
// lendTokenB; they match the deployed contract and must not be "fixed".

pub const LEND_TOKEN_A: FunctionSig = FunctionSig {
    signature: "lendTokenA(uint256,address)",
    params: &[Uint256, Address],
    returns: &[],
};

pub const LEND_TOKEN_B: FunctionSig = FunctionSig {
    signature: "lendTokenB(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const BORROW_TOKEN_A: FunctionSig = FunctionSig {
    signature: "borrowTokenA(uint256,uint256,address)",
    params: &[Uint256, Uint256, Address],
    returns: &[],
};

pub const BORROW_TOKEN_B: FunctionSig = FunctionSig {
    signature: "borrowTokenB(uint256,uint256,address)",
    params: &[Uint256, Uint256, Address],
    returns: &[],
};

pub const REPAY_LOAN: FunctionSig = FunctionSig {
    signature: "repayLoan(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const WITHDRAW_TOKEN_A: FunctionSig = FunctionSig {
    signature: "withdrawTokenA(address)",
    params: &[Address],
    returns: &[],
};

pub const WITHDRAW_TOKEN_B: FunctionSig = FunctionSig {
    signature: "withdrawTokenB(address)",
    params: &[Address],
    returns: &[],
};

pub const LIQUIDATE: FunctionSig = FunctionSig {
    signature: "liquidate(address,address)",
    params: &[Address, Address],
    returns: &[],
};

pub const LOANS: FunctionSig = FunctionSig {
    signature: "loans(address,address)",
    params: &[Address, Address],
    returns: &[Uint256, Uint256, Uint8],
};

pub const SHARES: FunctionSig = FunctionSig {
    signature: "shares(address,address)",
    params: &[Address, Address],
    returns: &[Uint256, Uint256],
};

pub const GET_HEALTH_FACTOR: FunctionSig = FunctionSig {
    signature: "getHealthFactor(address,address)",
    params: &[Address, Address],
    returns: &[Uint256],
};

pub const TOTAL_TOKEN_A_STAKED: FunctionSig = FunctionSig {
    signature: "totalTokenAStaked(address)",
    params: &[Address],
    returns: &[Uint256],
};

pub const TOTAL_INTEREST_TOKEN_A: FunctionSig = FunctionSig {
    signature: "totalInterestTokenA(address)",
    params: &[Address],
    returns: &[Uint256],
};

pub const TOTAL_TOKEN_B_STAKED: FunctionSig = FunctionSig {
    signature: "totalTokenBStaked(address)",
    params: &[Address],
    returns: &[Uint256],
};

pub const TOTAL_INTEREST_TOKEN_B: FunctionSig = FunctionSig {
    signature: "totalInterestTokenB(address)",
    params: &[Address],
    returns: &[Uint256],
};

// ── Arbitrage contract ───────────────────────────────────────────────

pub const FIND_BEST_ARBITRAGE: FunctionSig = FunctionSig {
    signature: "findBestArbitrage(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const EXECUTE_ARBITRAGE: FunctionSig = FunctionSig {
    signature: "executeArbitrage(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const BEST_PATH: FunctionSig = FunctionSig {
    signature: "bestPath()",
    params: &[],
    returns: &[Address, Address, Address, Uint256],
};

// ── ERC20 ────────────────────────────────────────────────────────────

pub const APPROVE: FunctionSig = FunctionSig {
    signature: "approve(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};

pub const MINT: FunctionSig = FunctionSig {
    signature: "mint(address,uint256)",
    params: &[Address, Uint256],
    returns: &[],
};
