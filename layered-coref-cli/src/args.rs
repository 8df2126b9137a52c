use clap::{Parser, ValueEnum};
use layered_coref::Granularity;
use std::path::PathBuf;

/// Resolve pronouns in a plain-text document and review the result.
#[derive(Debug, Parser)]
#[command(name = "layered-coref", version, about)]
pub struct Cli {
    /// Raw input document; prompted for when missing or invalid
    pub input: Option<PathBuf>,

    /// Folder receiving the tmp artifacts and reviewed text
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Method to run, repeatable; defaults to the config's method list
    #[arg(short = 'm', long = "method")]
    pub methods: Vec<String>,

    /// Pipeline configuration file
    #[arg(short, long, default_value = "layered-coref.toml")]
    pub config: PathBuf,

    /// Diff granularity, overrides the config
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Review every method's output in the terminal
    #[arg(long)]
    pub review: bool,

    /// Print the registered method names and exit
    #[arg(long)]
    pub list_methods: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    Line,
    Word,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Line => Granularity::Line,
            GranularityArg::Word => Granularity::Word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_methods_keep_order() {
        let cli = Cli::try_parse_from([
            "layered-coref",
            "story.txt",
            "-m",
            "capitalized_ner",
            "--method",
            "pronoun_coref",
            "--granularity",
            "word",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("story.txt")));
        assert_eq!(cli.methods, ["capitalized_ner", "pronoun_coref"]);
        assert_eq!(cli.granularity, Some(GranularityArg::Word));
        assert_eq!(cli.config, PathBuf::from("layered-coref.toml"));
        assert!(!cli.review);
    }

    #[test]
    fn test_unknown_granularity_is_rejected() {
        assert!(Cli::try_parse_from(["layered-coref", "--granularity", "char"]).is_err());
    }
}
