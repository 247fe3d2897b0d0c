//! Falcon Alias: Andersen-style points-to analysis.
//!
//! Falcon Alias computes, for every name in a program, the set of abstract
//! memory locations that name may refer to. The analysis is flow-insensitive
//! and context-insensitive: program order is ignored, and the whole program is
//! treated as one system of subset constraints solved to a fixed point.
//!
//! Programs are written in a tiny IL with four instructions:
//!
//! * `p = alloca` - `p` points to a fresh abstract location.
//! * `p = q` - `p` may point to anything `q` points to.
//! * `p = *q` - `p` may point to anything pointed to by what `q` points to.
//! * `*p = q` - whatever `p` points to may point to anything `q` points to.
//!
//! ```
//! use falcon_alias::analysis::andersen;
//! use falcon_alias::il;
//!
//! let program: il::Program = "
//!     p0 = alloca
//!     p1 = alloca
//!     *p0 = p1
//!     p2 = *p0
//! "
//! .parse()
//! .unwrap();
//!
//! let environment = andersen::andersen(&program).unwrap();
//! assert_eq!(environment.lookup("p2"), environment.lookup("p1"));
//! ```

#[macro_use]
extern crate log;

pub mod analysis;
mod error;
pub mod graph;
pub mod il;
#[cfg(test)]
mod tests;

pub use error::Error;
