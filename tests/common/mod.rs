//! Shared fixtures for integration tests
//!
//! Contracts are hand-assembled bytecode seeded into an in-memory database,
//! so no test needs network access.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, U256};
use revm::{
    bytecode::Bytecode,
    database::{CacheDB, EmptyDB},
    state::AccountInfo,
};

/// Externally owned account sending every test transaction
pub const SENDER: Address = address!("c0ffee254729296a45a3885639ac7e10f9d54979");
/// Contract the test transactions call into
pub const ENTRY: Address = address!("1000000000000000000000000000000000000001");
/// Contract called by the entry contract
pub const CHILD: Address = address!("2000000000000000000000000000000000000002");
/// Contract outside the trusted set
pub const UNTRUSTED: Address = address!("3000000000000000000000000000000000000003");

/// `STOP`
pub const STOP: &[u8] = &[0x00];
/// `REVERT(0, 0)`
pub const REVERT: &[u8] = &[0x60, 0x00, 0x60, 0x00, 0xfd];
/// The designated invalid instruction
pub const INVALID: &[u8] = &[0xfe];

/// `DELEGATECALL(gas, target, 0, 0, 0, 0)`, drop the result, then `tail`
pub fn delegate_to(target: Address, tail: &[u8]) -> Vec<u8> {
    let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
    code.extend_from_slice(target.as_slice());
    code.extend_from_slice(&[0x5a, 0xf4, 0x50]);
    code.extend_from_slice(tail);
    code
}

/// `DELEGATECALL(gas, target, 0xffffffff, 1, 0, 0)`, then `tail`
///
/// The argument range needs 4 GiB of memory, so the instruction halts out of
/// gas before the callee is entered.
pub fn oversized_delegate_to(target: Address, tail: &[u8]) -> Vec<u8> {
    let mut code = vec![
        0x60, 0x00, 0x60, 0x00, 0x60, 0x01, 0x63, 0xff, 0xff, 0xff, 0xff, 0x73,
    ];
    code.extend_from_slice(target.as_slice());
    code.extend_from_slice(&[0x5a, 0xf4]);
    code.extend_from_slice(tail);
    code
}

/// `CREATE(0, 0, 0)`, then `CREATE2(0, 0, 0, 0)`, dropping both results
pub const CREATE_BOTH: &[u8] = &[
    0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0xf0, 0x50, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60,
    0x00, 0xf5, 0x50, 0x00,
];

/// `CALL(gas, target, 0, 0, 0, 0, 0)`, drop the result, then `tail`
pub fn call_to(target: Address, tail: &[u8]) -> Vec<u8> {
    let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
    code.extend_from_slice(target.as_slice());
    code.extend_from_slice(&[0x5a, 0xf1, 0x50]);
    code.extend_from_slice(tail);
    code
}

/// In-memory state with a funded sender and the given contracts
pub fn seeded_db(contracts: &[(Address, Vec<u8>)]) -> CacheDB<EmptyDB> {
    let mut db = CacheDB::new(EmptyDB::default());
    db.insert_account_info(
        SENDER,
        AccountInfo {
            balance: U256::from(10u128.pow(20)),
            ..Default::default()
        },
    );
    for (address, code) in contracts {
        let bytecode = Bytecode::new_raw(Bytes::copy_from_slice(code));
        db.insert_account_info(
            *address,
            AccountInfo {
                balance: U256::ZERO,
                nonce: 1,
                code_hash: bytecode.hash_slow(),
                code: Some(bytecode),
            },
        );
    }
    db
}
