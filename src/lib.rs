//! tanamao - TaNaMao task management library
//!
//! Core functionality for the tnm CLI: role-aware task lifecycle,
//! performance aggregation, and directory access for retail pharmacy
//! chains.
//!
//! # Core Concepts
//!
//! - **Tasks**: units of store work with a one-directional lifecycle
//!   (pendente, em_progresso, concluida) plus a terminal overdue state
//!   (atrasada) applied by an explicit sweep
//! - **Roles**: gerente, colaborador, supervisor, matriz_adm; every
//!   lifecycle operation checks the acting user against the task
//! - **Delegation**: managers reassign pending, delegable tasks; the
//!   suggested-delegate list is advisory
//! - **Performance**: completed-over-assigned percentages per user,
//!   store, and region, recomputed from the task set on every query
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tanamao.toml`
//! - `error`: Error types and result aliases
//! - `model`: Domain records and closed enums
//! - `lifecycle`: Pure transition rules and the overdue sweep
//! - `stats`: Performance aggregation
//! - `directory`: Read-only user/store/region views
//! - `repository`: Task persistence abstraction (memory and JSON file)
//! - `storage`: `.tanamao/` layout and atomic file I/O
//! - `lock`: File locking for concurrent CLI invocations
//! - `actor`: Acting-user resolution
//! - `ids`: Task id generation
//! - `seed`: Deterministic demo dataset

pub mod actor;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod lock;
pub mod model;
pub mod output;
pub mod repository;
pub mod seed;
pub mod stats;
pub mod storage;

pub use error::{Error, Result};
