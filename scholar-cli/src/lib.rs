//! Console front end for the scholar study assistant.
//!
//! The `scholar` binary parses [`cli::Cli`], builds the backends selected on
//! the command line ([`backends`]), indexes the input folder and then runs
//! the interactive loop in [`console`].

pub mod backends;
pub mod cli;
pub mod console;
