//! An interactive shell for browsing and manipulating a local filesystem.
//!
//! One line is read, split by [`tokenizer`], parsed into a
//! [`complete_command::CompleteCommand`] and run against a [`system::System`],
//! whose only state is the current directory held by [`session::Session`].

pub mod cli;
pub mod complete_command;
pub mod copy;
pub mod error;
pub mod fs;
pub mod path;
pub mod repl;
pub mod repl_v2;
pub mod session;
pub mod size;
pub mod system;
pub mod tokenizer;
