//! Domain model module declarations.

pub mod framed;
pub mod operation;
pub mod policy;
pub mod session;
