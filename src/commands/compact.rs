use std::path::PathBuf;
use std::str::FromStr;

use crate::compact::{LanguageFamily, compact};
use crate::exceptions::RestitchError;

pub fn run(files: Vec<PathBuf>, language: Option<String>) -> Result<(), RestitchError> {
    let forced = language
        .map(|name| LanguageFamily::from_str(&name))
        .transpose()?;

    for (index, path) in files.iter().enumerate() {
        let content = std::fs::read_to_string(path)?;
        let family = forced.or_else(|| LanguageFamily::from_path(path)).ok_or_else(|| {
            RestitchError::InvalidInput(format!(
                "Cannot infer language for '{}'. Pass --language.",
                path.display()
            ))
        })?;

        if index > 0 {
            println!();
        }
        println!("File: {}", path.display());
        println!("{}", compact(&content, family).trim_end());
    }
    Ok(())
}
