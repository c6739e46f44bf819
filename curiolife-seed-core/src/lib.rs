#![doc = "curiolife-seed-core: core logic library for seeding CurioLife content."]

//! This crate contains the seed data model, the derivation of nested
//! components, the persistence contracts and the import driver.
//! Transport-specific clients (the REST API) live in the CLI crate.
//!
//! # Usage
//! Load a [`model::SeedData`], pick a [`catalog::Catalog`], then either call
//! [`seed::import_all`] with any [`contract::Publisher`] or
//! [`seed::seed_direct`] with a store such as [`store::FileStore`].

pub mod catalog;
pub mod components;
pub mod contract;
pub mod derive;
pub mod document;
pub mod error;
pub mod guard;
pub mod model;
pub mod permissions;
pub mod schema;
pub mod seed;
pub mod store;
