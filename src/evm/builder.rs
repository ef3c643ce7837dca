//! EVM construction over in-memory state
//!
//! Every EVM built here wraps the given database in a `CacheDB`, so accounts
//! can be seeded with `insert_account_info` and executed transactions are
//! committed to the cache, never to the backing database.

use revm::{
    context::Context,
    database::{CacheDB, DatabaseRef},
    handler::{MainBuilder, MainContext, MainnetContext},
    inspector::NoOpInspector,
};

use crate::{traits::TraceInspector, TraceEvm};

pub type DefaultEvm<DB> = TraceEvm<CacheDB<DB>, NoOpInspector>;
pub type InspectorEvm<DB, INSP> = TraceEvm<CacheDB<DB>, INSP>;

fn create_evm_internal<DB, INSP>(db: DB, tracer: INSP) -> TraceEvm<CacheDB<DB>, INSP>
where
    DB: DatabaseRef,
{
    let mut ctx = Context::mainnet().with_db(CacheDB::new(db));
    let cfg = &mut ctx.cfg;
    cfg.disable_eip3607 = true;
    cfg.limit_contract_code_size = None;
    cfg.disable_block_gas_limit = true;
    cfg.disable_base_fee = true;
    let evm = ctx.build_mainnet_with_inspector(tracer);
    TraceEvm::new(evm)
}

/// Create an EVM instance without a tracer
///
/// # Example
/// ```no_run
/// use revm::database::EmptyDB;
/// use revm_safe_trace::create_evm;
///
/// let evm = create_evm(EmptyDB::default());
/// ```
pub fn create_evm<DB>(db: DB) -> DefaultEvm<DB>
where
    DB: DatabaseRef,
{
    create_evm_internal(db, NoOpInspector)
}

/// Create an EVM instance driving `tracer`
///
/// # Simulation Settings
/// - Transactions from accounts with code are accepted (EIP-3607 disabled)
/// - No contract size limit
/// - Block gas limit and base fee checks disabled
///
/// # Example
/// ```no_run
/// use revm::database::EmptyDB;
/// use revm_safe_trace::{create_evm_with_tracer, CallTracer};
///
/// let evm = create_evm_with_tracer(EmptyDB::default(), CallTracer::new());
/// ```
pub fn create_evm_with_tracer<DB, INSP>(db: DB, tracer: INSP) -> InspectorEvm<DB, INSP>
where
    DB: DatabaseRef,
    INSP: TraceInspector<MainnetContext<CacheDB<DB>>>,
{
    create_evm_internal(db, tracer)
}
