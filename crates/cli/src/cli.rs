use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dejure_core::AnnotationSettings;

#[derive(Parser, Debug)]
#[command(name = "dejure", version, about = "Link legal citations to dejure.org")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a text or HTML fragment and print the result
    Annotate {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long, help = "Use a throwaway in-memory cache instead of the SQLite file")]
        no_cache: bool,
        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },
    /// Print the cache key for the input under the effective settings
    Fingerprint {
        file: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Delete expired cache entries
    Purge {
        #[arg(long, help = "Delete every entry, not only expired ones")]
        all: bool,
    },
}

/// Per-invocation overrides of the configured annotation settings.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long, help = "wide or narrow")]
    pub link_style: Option<String>,
    #[arg(long, help = "none, neutral, descriptive, statutes or half")]
    pub tooltip: Option<String>,
    #[arg(long, help = "none, with or auto")]
    pub line_break: Option<String>,
    #[arg(long)]
    pub target: Option<String>,
    #[arg(long = "class")]
    pub css_class: Option<String>,
    #[arg(long, help = "Leave norms unknown to dejure.org unlinked")]
    pub no_fallback: bool,
    #[arg(long = "ignore", value_name = "CITATION", help = "Citation to leave unlinked (repeatable)")]
    pub ignore: Vec<String>,
}

impl Overrides {
    pub fn apply(&self, mut settings: AnnotationSettings) -> AnnotationSettings {
        if let Some(v) = &self.link_style {
            settings.link_style = v.clone();
        }
        if let Some(v) = &self.tooltip {
            settings.tooltip = v.clone();
        }
        if let Some(v) = &self.line_break {
            settings.line_break = v.clone();
        }
        if let Some(v) = &self.target {
            settings.target = v.clone();
        }
        if let Some(v) = &self.css_class {
            settings.css_class = v.clone();
        }
        if self.no_fallback {
            settings.fallback_to_secondary_source = false;
        }
        if !self.ignore.is_empty() {
            settings.ignore = self.ignore.clone();
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_annotate_with_overrides() {
        let cli = Cli::try_parse_from([
            "dejure",
            "annotate",
            "input.html",
            "--link-style",
            "narrow",
            "--ignore",
            "1 BvR 12/05",
            "--ignore",
            "2 BvE 1/20",
            "--no-cache",
        ])
        .unwrap();

        let Commands::Annotate { file, overrides, no_cache, json } = cli.command else {
            panic!("expected annotate");
        };
        assert_eq!(file, Some(PathBuf::from("input.html")));
        assert!(no_cache);
        assert!(!json);

        let settings = overrides.apply(AnnotationSettings::default());
        assert_eq!(settings.link_style, "narrow");
        assert_eq!(settings.ignore, vec!["1 BvR 12/05".to_string(), "2 BvE 1/20".to_string()]);
        assert!(settings.fallback_to_secondary_source);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let defaults = AnnotationSettings { target: "_blank".into(), ..Default::default() };
        let settings = Overrides::default().apply(defaults.clone());
        assert_eq!(settings.target, "_blank");
        assert_eq!(settings.tooltip, defaults.tooltip);
        assert_eq!(settings.ignore, defaults.ignore);
    }

    #[test]
    fn parses_purge_all() {
        let cli = Cli::try_parse_from(["dejure", "purge", "--all"]).unwrap();
        assert!(matches!(cli.command, Commands::Purge { all: true }));
    }
}
