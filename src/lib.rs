//! rfacter - host fact resolution library.
//!
//! Facts are named pieces of information about the host (mounted
//! filesystems, BIOS vendor, hypervisor, ...). Each one is computed by a
//! resolver reading an external source and cached for the life of the
//! [`resolver::ResolverRegistry`] that owns the resolver.
//!
//! - [`source`] - external inputs: files, commands, filesystem statistics,
//!   the management interface
//! - [`resolver`] - resolvers and their caches
//! - [`facts`] - fact catalog, bindings and the batch manager

pub mod facts;
pub mod fmt;
pub mod resolver;
pub mod source;
