pub mod apply;
pub mod clean;
pub mod compact;
pub mod parse;
pub mod restore;

use std::io::Read;
use std::path::PathBuf;

use crate::exceptions::RestitchError;

/// Reads the response text from a file argument, or stdin when none given.
pub(crate) fn read_input(input: Option<PathBuf>) -> Result<String, RestitchError> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
