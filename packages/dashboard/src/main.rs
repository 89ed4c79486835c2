#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point: loads a scene and replays date selections as text.

use std::path::PathBuf;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use covid_dash::{Dashboard, DashboardConfig, Interaction, TextRenderer};
use covid_dash_series::{CsvRecordSource, DatasetLoader};

#[derive(Parser)]
#[command(name = "covid_dash", about = "National trend and state cross-section case dashboard")]
struct Cli {
    /// TOML config file (defaults to the embedded configuration)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scene name, substituted into `us-{scene}.csv` and `us-states-{scene}.csv`
    #[arg(long)]
    scene: Option<String>,
    /// Directory or URL prefix holding the scene files (defaults to the
    /// sample data shipped with this package)
    #[arg(long)]
    data: Option<String>,
    /// First date to load (YYYY-MM-DD, inclusive)
    #[arg(long)]
    start: Option<String>,
    /// Last date to load (YYYY-MM-DD, inclusive)
    #[arg(long)]
    end: Option<String>,
    /// Date to select, as if clicked on the trend view. May be repeated and
    /// mixed with `--slider`; interactions are applied in command-line order
    /// and the first rejected one aborts the run.
    #[arg(long)]
    select: Vec<String>,
    /// Slider position to select. May be repeated and mixed with `--select`.
    #[arg(long)]
    slider: Vec<usize>,
}

impl Cli {
    fn resolve_config(&self) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_path(path)?,
            None => DashboardConfig::embedded()?,
        };
        if let Some(scene) = &self.scene {
            config.scene.clone_from(scene);
        }
        if let Some(data) = &self.data {
            config.data.clone_from(data);
        }
        if let Some(start) = &self.start {
            config.start.clone_from(start);
        }
        if let Some(end) = &self.end {
            config.end.clone_from(end);
        }
        config.validate()?;
        Ok(config)
    }
}

/// `--select` and `--slider` values merged back into command-line order.
fn interactions(matches: &ArgMatches) -> Vec<Interaction> {
    let mut ordered = Vec::new();
    if let (Some(indices), Some(dates)) = (
        matches.indices_of("select"),
        matches.get_many::<String>("select"),
    ) {
        ordered.extend(
            indices
                .zip(dates)
                .map(|(i, date)| (i, Interaction::TrendClick(date.clone()))),
        );
    }
    if let (Some(indices), Some(ordinals)) = (
        matches.indices_of("slider"),
        matches.get_many::<usize>("slider"),
    ) {
        ordered.extend(
            indices
                .zip(ordinals)
                .map(|(i, ordinal)| (i, Interaction::Slider(*ordinal))),
        );
    }
    ordered.sort_by_key(|(i, _)| *i);
    ordered.into_iter().map(|(_, interaction)| interaction).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let config = cli.resolve_config()?;

    log::info!(
        "Loading scene '{}' from {} ({} to {})",
        config.scene,
        config.data,
        config.start,
        config.end
    );
    let loader = DatasetLoader::new(CsvRecordSource::new(), config.data.clone());
    let mut dashboard = Dashboard::new(config, TextRenderer::new(std::io::stdout()));
    dashboard.load(&loader).await?;

    dashboard.on_date_selected(|event| {
        log::info!("Selected {} (slider position {})", event.date, event.ordinal);
    })?;

    dashboard.replay(&interactions(&matches))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        Cli::command()
            .try_get_matches_from(std::iter::once("covid_dash").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn interactions_keep_command_line_order() {
        let matches = parse(&[
            "--slider",
            "2",
            "--select",
            "2020-03-01",
            "--slider",
            "0",
            "--select",
            "2020-03-05",
        ]);

        assert_eq!(
            interactions(&matches),
            [
                Interaction::Slider(2),
                Interaction::TrendClick("2020-03-01".to_string()),
                Interaction::Slider(0),
                Interaction::TrendClick("2020-03-05".to_string()),
            ]
        );
    }

    #[test]
    fn no_interactions_without_flags() {
        assert!(interactions(&parse(&["--scene", "full"])).is_empty());
    }

    #[test]
    fn cli_overrides_embedded_config() {
        let matches = parse(&["--scene", "march", "--start", "2020-03-02"]);
        let config = Cli::from_arg_matches(&matches)
            .unwrap()
            .resolve_config()
            .unwrap();

        assert_eq!(config.scene, "march");
        assert_eq!(config.start, "2020-03-02");
        assert_eq!(config.end, "2020-03-15");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let matches = parse(&["--end", "March 15"]);
        assert!(
            Cli::from_arg_matches(&matches)
                .unwrap()
                .resolve_config()
                .is_err()
        );
    }
}
