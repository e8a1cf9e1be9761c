#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]
#![warn(clippy::pedantic)]
#![warn(
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
#![allow(
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::match_same_arms
)]

mod builder;
mod config;
mod errors;
mod gate;
mod members;
mod metrics;
mod pool;

pub use self::{
    builder::PoolBuilder, config::PoolConfig, errors::PoolError, metrics::PoolMetrics,
    pool::Pool,
};

use std::time::Duration;

use async_trait::async_trait;

/// The current pool status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// Whether the pool hands out resources.
    pub open: bool,

    /// The resources waiting to be acquired.
    pub available: usize,

    /// The resources currently borrowed.
    pub acquired: usize,
}

/// Borrowing and membership operations of a resource pool.
///
/// Resources are identified by equality: two values that compare equal are
/// the same resource as far as the pool is concerned. The pool never creates
/// or disposes of resources, it only tracks which ones are lent out.
///
/// None of the operations fail with an error. Expected conditions such as a
/// closed pool, an elapsed timeout or an unknown resource are reported as
/// [`None`] or `false`.
#[async_trait]
pub trait ResourcePool<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    /// Allows resources to be acquired. Calling this on an open pool does
    /// nothing.
    fn open(&self);

    /// Indicates whether resources can currently be acquired.
    fn is_open(&self) -> bool;

    /// Waits until every acquired resource has been released and then closes
    /// the pool.
    async fn close(&self);

    /// Closes the pool without waiting for acquired resources. They stay
    /// tracked as acquired until removed.
    async fn close_now(&self);

    /// Adds a resource to the tail of the available queue.
    ///
    /// Returns `false` if an equal resource is already tracked.
    async fn add(&self, resource: R) -> bool;

    /// Removes a resource, waiting for it to be released first if it is
    /// currently acquired.
    ///
    /// Returns `false` if the resource is not tracked, or if it was no longer
    /// available once the wait ended.
    async fn remove(&self, resource: &R) -> bool;

    /// Removes a resource whether or not it is currently acquired.
    ///
    /// Returns `false` if the resource is not tracked.
    async fn remove_now(&self, resource: &R) -> bool;

    /// Takes the oldest available resource, waiting for one if necessary.
    ///
    /// Returns [`None`] once the pool is closed.
    async fn acquire(&self) -> Option<R>;

    /// Like [`ResourcePool::acquire()`] but gives up after `timeout`.
    async fn acquire_timeout(&self, timeout: Duration) -> Option<R>;

    /// Hands an acquired resource back to the pool.
    ///
    /// Does nothing if the pool is closed or the resource isn't acquired.
    async fn release(&self, resource: &R);
}
