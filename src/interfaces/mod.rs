//! Outer adapters: CSV scenario input and balance output.

pub mod csv;
