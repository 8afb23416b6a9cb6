//! CLI argument definitions using clap
//!
//! Commands:
//! - kbagent add-fact <Attr = Value>
//! - kbagent add-rule <SE ... ENTÃO ...>
//! - kbagent list facts|rules|vars
//! - kbagent forward
//! - kbagent prove|why|how|diagnose <attr> <value>
//! - kbagent import <file>
//! - kbagent shell

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::knowledge::RuleId;

/// kbagent - a small rule-based reasoning engine
#[derive(Parser, Debug)]
#[command(name = "kbagent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base file (overrides the configured path)
    #[arg(long, global = true)]
    pub kb: Option<PathBuf>,

    /// Forward-chaining round cap (overrides the configured value)
    #[arg(long, global = true)]
    pub max_iterations: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Assert a fact, e.g. `Temperatura = 39.2`
    AddFact {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        fact: Vec<String>,
    },

    /// Remove the fact for an attribute
    RemoveFact { attr: String },

    /// Add a rule, e.g. `SE Temperatura > 38 ENTÃO Febre = Sim`
    AddRule {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        rule: Vec<String>,
    },

    /// Remove a rule by id
    RemoveRule { id: RuleId },

    /// List facts, rules or attribute catalogs
    List {
        #[arg(value_enum)]
        target: ListTarget,
    },

    /// Run forward chaining to fixpoint
    Forward,

    /// Try to prove a goal by backward chaining
    Prove {
        attr: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Explain why a fact holds
    Why {
        attr: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show the full derivation of a fact
    How {
        attr: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show which rule conditions block a goal
    Diagnose {
        attr: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Import rules from a text file, one per line
    Import { file: PathBuf },

    /// Start an interactive session on stdin
    Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Facts,
    Rules,
    Vars,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
