//! Collaborators of the export orchestrator.
//!
//! Each submodule pairs a trait with the implementation the CLI wires in:
//!
//! - [`crypto`] - payload encryption ([`crypto::AesGcmEncrypter`])
//! - [`remote`] - remote hosting API ([`remote::HttpRemoteClient`])
//! - [`git`] - pushing repository contents ([`git::GitCliPusher`])
//! - [`jobs`] - background job engine ([`jobs::InMemoryJobEngine`])
//! - [`store`] - local repository metadata ([`store::InMemoryRepositoryStore`])
//! - [`events`] - completion notifications ([`events::BroadcastPublisher`])
//!
//! Tests substitute their own implementations of the traits.

pub mod crypto;
pub mod events;
pub mod git;
pub mod jobs;
pub mod remote;
pub mod store;
