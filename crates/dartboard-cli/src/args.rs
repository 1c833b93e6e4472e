use clap::{ArgAction, Parser, Subcommand};

/// Compile design documents into Flutter widget code.
#[derive(Debug, Parser)]
#[command(name = "dartboard", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file overriding the document settings
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write widget files for every artboard and master component, or for
    /// the widget enclosing one node
    Export {
        /// Design document (JSON)
        input: String,
        /// Directory receiving the Dart files
        #[arg(short, long, default_value = "lib")]
        out_dir: String,
        /// Export only the widget containing this node
        #[arg(short, long)]
        node: Option<String>,
    },
    /// Print the code for one node to stdout
    Copy {
        input: String,
        /// Guid of the node to copy
        node: String,
    },
    /// List the widgets a document would export
    Widgets { input: String },
}
