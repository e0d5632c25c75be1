#![doc = "docs-automation-core: core logic library for docs-automation."]

//! This crate holds the two pipelines behind the `docs-automation` CLI:
//!
//! - Shortdesc normalisation for AsciiDoc trees ([`scan`], [`overrides`],
//!   [`shortdesc`], [`normalize`]).
//! - Release-notes forwarding from saved JIRA filters ([`config`], [`jira`],
//!   [`issues`], [`release_notes`]).
//!
//! Trait seams and shared data types live in [`contract`].

pub mod config;
pub mod contract;
pub mod issues;
pub mod jira;
pub mod normalize;
pub mod overrides;
pub mod release_notes;
pub mod scan;
pub mod shortdesc;
