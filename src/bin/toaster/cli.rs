use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rejoue un scénario de notifications toast", long_about = None)]
pub struct Cli {
    /// Scénario JSON à rejouer (liste d'étapes `{ "at": ..., "action": ... }`).
    #[arg(long, value_name = "PATH")]
    pub script: PathBuf,

    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suit l'horloge murale au lieu d'avancer le temps instantanément.
    #[arg(long, action = ArgAction::SetTrue)]
    pub realtime: bool,

    /// Temps laissé aux minuteurs après la dernière étape (ex. "30s").
    #[arg(long, value_parser = parse_duration, default_value = "30s")]
    pub drain: Duration,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "toaster=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Affiche le document final sur la sortie standard.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn drain_defaults_to_thirty_seconds() {
        let cli = match Cli::try_parse_from(["toaster", "--script", "steps.json"]) {
            Ok(cli) => cli,
            Err(err) => panic!("arguments should parse: {err}"),
        };
        assert_eq!(cli.drain, Duration::from_secs(30));
        assert!(!cli.realtime);
        assert!(cli.config.is_none());
    }

    #[test]
    fn script_is_required() {
        assert!(Cli::try_parse_from(["toaster"]).is_err());
    }
}
