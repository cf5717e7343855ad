//! Payroll Approval & Settlement Engine
//!
//! This crate implements the payroll core of an HR backend: companies with a
//! bank balance, employees, payroll records with a Pending → Approved → Paid
//! approval workflow, and an append-only notification sink, exposed over a
//! JSON HTTP API with role-based authorization.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
