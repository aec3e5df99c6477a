pub mod ledger;
pub mod role_sync;
