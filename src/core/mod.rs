//! Core business logic for Gitport.
//!
//! # Export Workflow
//!
//! 1. **Submit**: one encrypted job per repository under the space's job group
//! 2. **Decode**: the job handler reads its payload back
//! 3. **Resolve**: the live repository record is looked up
//! 4. **Create**: an empty repository is created on the remote host
//! 5. **Push**: every ref is mirrored to the remote
//! 6. **Reconcile**: a failed push deletes the remote repository again
//! 7. **Notify**: a completion event is published
//!
//! Progress of a batch is read back per space with
//! [`export::RepositoryExporter::progress`].

pub mod export;
