use std::path::PathBuf;

use crate::exceptions::RestitchError;
use crate::reconcile::cleanup::cleanup_response;

pub fn run(input: Option<PathBuf>) -> Result<(), RestitchError> {
    let raw = super::read_input(input)?;
    println!("{}", cleanup_response(&raw));
    Ok(())
}
