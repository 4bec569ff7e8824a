use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use modalgate::config::Settings;
use modalgate::locale::DirectoryLocales;
use modalgate::options::TerminalColorScheme;
use modalgate::presenter::TerminalPresenter;
use modalgate::sound::CommandPlayer;
use modalgate::{ModalController, Outcome, Scenario};

use super::lookup::LookupCommand;
use super::show::{ensure_closable, ScenarioCommand, ShowCommand};

/// modalgate - modal warning dialogs for your terminal
#[derive(Parser)]
#[command(
    name = "modalgate",
    version,
    about = "Modal warning dialogs for your terminal",
    long_about = r#"modalgate shows a modal warning dialog and exits with the user's choice.

Exit codes: 0 continue, 1 cancel, 2 settings, 3 help, 4 danger.

Examples:
  modalgate confirm --message "Delete the branch?"
  modalgate danger --lang de --timeout 30
  modalgate show --title Deploy --no-confirmation --settings
  modalgate lookup tr buttons.continue"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Default dialog language
    #[arg(short = 'l', long = "lang", global = true)]
    pub lang: Option<String>,

    /// Default theme: dark, light or auto
    #[arg(short = 't', long = "theme", global = true)]
    pub theme: Option<String>,

    /// Configuration file to use instead of the default search paths
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a dialog built from command line options
    Show(ShowCommand),
    /// Plain confirmation
    Confirm(ScenarioCommand),
    /// Irreversible action, gated behind a checkbox
    Danger(ScenarioCommand),
    /// Work attempted outside permitted hours
    WorkingTime(ScenarioCommand),
    /// Explicit acceptance of responsibility
    Responsibility(ScenarioCommand),
    /// Print a localized string
    Lookup(LookupCommand),
}

impl Cli {
    /// Run the selected command and return the process exit code
    pub async fn execute(self) -> Result<i32> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut settings = Settings::init(self.config.as_deref()).await?;
        if let Some(lang) = self.lang {
            settings.language = Some(lang);
        }
        if let Some(theme) = self.theme {
            settings.theme = Some(theme);
        }
        settings.validate()?;
        debug!("Configuration initialized");

        // Lookup needs no dialog; everything else shows one
        let (options, scenario) = match self.command {
            Commands::Lookup(cmd) => return cmd.execute(&settings).await.map(|_| 0),
            Commands::Show(cmd) => {
                let options = cmd.options()?;
                let scenario = options.scenario.unwrap_or_default();
                (options, scenario)
            }
            Commands::Confirm(cmd) => (cmd.options()?, Scenario::Confirmation),
            Commands::Danger(cmd) => (cmd.options()?, Scenario::DangerousAction),
            Commands::WorkingTime(cmd) => (cmd.options()?, Scenario::WorkingTimeViolation),
            Commands::Responsibility(cmd) => (cmd.options()?, Scenario::Responsibility),
        };

        let controller = build_controller(&settings)?;
        ensure_closable(&controller, &options.clone().with_scenario(scenario))?;

        let outcome = match scenario {
            Scenario::Generic => controller.show(options).await?,
            Scenario::Confirmation => controller.show_confirmation(options).await?,
            Scenario::DangerousAction => controller.show_dangerous_action(options).await?,
            Scenario::WorkingTimeViolation => {
                controller.show_working_time_violation(options).await?
            }
            Scenario::Responsibility => {
                controller
                    .show_confirmation_with_responsibility(options)
                    .await?
            }
        };

        info!("Dialog closed with {}", outcome);
        println!("{}", outcome);
        Ok(exit_code(outcome))
    }
}

fn build_controller(settings: &Settings) -> Result<ModalController> {
    let mut builder = ModalController::builder(TerminalPresenter::new())
        .with_sound_player(CommandPlayer::system_default())
        .with_color_scheme(TerminalColorScheme)
        .with_options(settings.controller_options()?);

    if let Some(dir) = &settings.locale_dir {
        debug!("Using locale directory: {}", dir.display());
        builder = builder.with_locale_source(DirectoryLocales::new(dir.clone()));
    }

    Ok(builder.build())
}

fn exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Continue => 0,
        Outcome::Cancel => 1,
        Outcome::Settings => 2,
        Outcome::Help => 3,
        Outcome::Danger => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["modalgate", "danger", "--lang", "de", "--theme", "dark"])
            .unwrap();
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert_eq!(cli.theme.as_deref(), Some("dark"));
        assert!(matches!(cli.command, Commands::Danger(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Outcome::Continue), 0);
        assert_eq!(exit_code(Outcome::Cancel), 1);
        assert!(Outcome::ALL
            .iter()
            .filter(|o| !matches!(o, Outcome::Continue | Outcome::Cancel))
            .all(|o| exit_code(*o) >= 2));
    }
}
