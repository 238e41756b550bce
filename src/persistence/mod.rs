// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! Storage of the workspace read model. The projection produces one
//! [`WorkspaceUnitOfWork`] per event; a [`WorkspaceStore`] commits it atomically.
//!
//! ## Components
//!
//! - **Unit of work**: keyed mutations of the workspace table
//! - **In-memory store**: tests and single-process deployments
//! - **JetStream store**: the table as one document in a NATS KV bucket

mod errors;
mod jetstream_workspace_store;
mod unit_of_work;
mod workspace_store;

pub use errors::ReadModelError;
pub use jetstream_workspace_store::JetStreamWorkspaceStore;
pub use unit_of_work::{WorkspaceMutation, WorkspaceTable, WorkspaceUnitOfWork};
pub use workspace_store::{InMemoryWorkspaceStore, WorkspaceStore};
