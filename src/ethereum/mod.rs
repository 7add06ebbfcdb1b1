//! Ethereum Panel Module
//!
//! Single-transaction wallet actions: connect, sign, send and chain switch.

mod panel;


pub use panel::{DEMO_MESSAGE, EthereumPanel, TxStatus, typed_data_message};
