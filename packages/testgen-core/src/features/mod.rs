//! Feature slices, each depending only on the ones before it
//!
//! - `iteration`  : enumeration protocol, ranges, samples, products
//! - `dependency` : operand dependency enumeration inside and across sections
//! - `template`   : sections, templates and structural enumerators
//! - `branch`     : branch structures, trace search, branch templates

pub mod branch;
pub mod dependency;
pub mod iteration;
pub mod template;
