//! コード実行サービスへのアダプタ実装
//!
//! ## 実装
//!
//! - `piston`: Piston 互換 API（HTTP）を使った実装

pub mod piston;

pub use piston::PistonExecutionClient;
