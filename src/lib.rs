//! Sprint Sim - tick-driven software delivery sprint simulator
//!
//! A fixed team of role-typed workers moves a fixed set of features through
//! Analytics, Development, Code Review and Testing until every feature is
//! done or the day limit runs out.

pub mod core;
pub mod sprint;
