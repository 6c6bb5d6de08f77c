pub mod dto;
pub mod ledger;
pub mod ports;
pub mod sweep;
pub mod use_cases;
