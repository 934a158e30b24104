//! # Keywords Command Implementation
//!
//! Merges keyword lists the way an ebuild generator combines the keywords of
//! its dependencies: one entry per arch, the strongest stability winning.

use anyhow::Result;
use clap::Args;

use java_ebuilder::{Keyword, KeywordSet};

/// Merge keywords and print the strongest per arch
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Keywords such as `amd64`, `~x86` or `-sparc`; an argument may hold
    /// several separated by spaces.
    #[arg(required = true, value_name = "KEYWORD", allow_hyphen_values = true)]
    pub keywords: Vec<String>,
}

/// Execute the `keywords` command.
pub fn execute(args: KeywordsArgs) -> Result<()> {
    let mut set = KeywordSet::new();
    for arg in &args.keywords {
        set.extend(Keyword::parse_line(arg)?);
    }
    println!("{set}");
    Ok(())
}
