//! Operations composed from listings, mutations and job polling.

mod cloud_foundry;
mod composer;
mod tracker;

pub use cloud_foundry::{CloudFoundryOperations, CloudFoundryOperationsBuilder};
pub use composer::{
    act_then_await, act_then_await_with, resolve_by_name, Completed, MutationResponse,
};
pub use tracker::{OperationTracker, Phase};
