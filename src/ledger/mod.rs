mod ledger;
mod memory;

pub use ledger::{NewProduct, StockLedger};
pub use memory::MemoryStockLedger;
