//! Parlance - a build-time translation compiler.
//!
//! Parlance reads a directory of YAML locale files plus a `meta.yml` type
//! declaration file and compiles every translation into a precompiled
//! JavaScript module: plain strings stay strings, parameterized and
//! branched translations become render functions, so applications localize
//! UI text without any runtime parsing.
//!
//! ## Module Structure
//!
//! - `cli`: command-line interface layer (arguments, reporting, watch mode)
//! - `core`: the compilation engine (parsers, type registry, joint
//!   analysis, emission, pipeline driver)

pub mod cli;
pub mod core;
