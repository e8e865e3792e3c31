//! Core domain models and business logic for entity-relationship diagrams

pub mod canvas;
pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod generator_code;
pub mod helper;
pub mod history;
pub mod layout;
pub mod observe;
pub mod ordering;
pub mod routing;
mod schema;
pub mod sql;
pub mod store;
#[cfg(test)]
mod tests;

pub use canvas::*;
pub use command::Command;
pub use config::{Config, ConfigError};
pub use document::{Document, DocumentData};
pub use editor::EditorState;
pub use error::{DispatchError, DocumentError};
pub use generator_code::generate_code;
pub use helper::Id;
pub use observe::{Change, Field, Notification, SubscriptionHandle, Target};
pub use ordering::{order_by_name_asc, order_by_relationship};
pub use schema::*;
pub use sql::{DdlOptions, generate_ddl, generate_ddl_with};
pub use store::Store;
