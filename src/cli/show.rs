use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing::debug;

use modalgate::options::{FixedColorScheme, OptionResolver};
use modalgate::{DialogConfig, IconKind, ModalController, Outcome, ShowOptions};

/// Options shared by every dialog command
#[derive(Args, Debug, Default)]
pub struct ScenarioCommand {
    /// Dialog title
    #[arg(long)]
    pub title: Option<String>,

    /// Dialog message; use `-` to read it from stdin
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Auto-dismiss with `cancel` after this many seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<i64>,

    /// Play the alert sound, optionally from a specific file
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub sound: Option<String>,

    /// JSON file with dialog options; command line flags take precedence
    #[arg(long = "options", value_name = "FILE")]
    pub options_file: Option<PathBuf>,
}

impl ScenarioCommand {
    pub fn options(&self) -> Result<ShowOptions> {
        let mut options = match &self.options_file {
            Some(path) => {
                debug!("Reading dialog options from {}", path.display());
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => ShowOptions::new(),
        };

        if let Some(title) = &self.title {
            options = options.with_title(title);
        }
        if let Some(message) = self.get_message()? {
            options = options.with_message(message);
        }
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(timeout);
        }
        match self.sound.as_deref() {
            Some("") => options.sound = Some(true),
            Some(path) => options = options.with_sound(path),
            None => {}
        }

        Ok(options)
    }

    fn get_message(&self) -> Result<Option<String>> {
        match self.message.as_deref() {
            Some("-") => {
                if io::stdin().is_terminal() {
                    return Err(anyhow!("--message - expects the message on stdin"));
                }
                debug!("Reading message from stdin");
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
                Ok(Some(buffer.trim_end().to_string()))
            }
            Some(message) => Ok(Some(message.to_string())),
            None => Ok(None),
        }
    }
}

/// Show a dialog built entirely from command line options
#[derive(Args, Debug)]
pub struct ShowCommand {
    #[command(flatten)]
    pub common: ScenarioCommand,

    /// Icon: warning, danger, info, success or question
    #[arg(long)]
    pub icon: Option<IconKind>,

    /// Label of the continue button
    #[arg(long)]
    pub confirm_label: Option<String>,

    /// Label of the cancel button
    #[arg(long)]
    pub cancel_label: Option<String>,

    /// Show continue without the confirmation checkbox
    #[arg(long)]
    pub no_confirmation: bool,

    /// Checkbox text
    #[arg(long)]
    pub confirmation_text: Option<String>,

    /// Start with every control disabled
    #[arg(long)]
    pub disabled: bool,

    /// Extra controls to show: settings, help, danger (repeatable)
    #[arg(long = "button", value_name = "CONTROL")]
    pub buttons: Vec<Outcome>,

    /// Controls to hide: continue, cancel (repeatable)
    #[arg(long = "hide", value_name = "CONTROL")]
    pub hidden: Vec<Outcome>,
}

impl ShowCommand {
    pub fn options(&self) -> Result<ShowOptions> {
        let mut options = self.common.options()?;

        if let Some(icon) = self.icon {
            options = options.with_icon(icon);
        }
        if let Some(label) = &self.confirm_label {
            options.confirm_label = Some(label.clone());
        }
        if let Some(label) = &self.cancel_label {
            options.cancel_label = Some(label.clone());
        }
        if self.no_confirmation {
            options = options.require_confirmation(false);
        }
        if let Some(text) = &self.confirmation_text {
            options.confirmation_text = Some(text.clone());
        }
        if self.disabled {
            options = options.initially_disabled(true);
        }
        for control in &self.buttons {
            options = options.with_button(*control, true);
        }
        for control in &self.hidden {
            options = options.with_button(*control, false);
        }

        Ok(options)
    }
}

/// Refuse dialogs that no key press or timer could ever close
pub fn ensure_closable(controller: &ModalController, options: &ShowOptions) -> Result<()> {
    // Theme does not matter here, so skip the terminal probe
    let config = OptionResolver::new(controller.locales(), &FixedColorScheme(false))
        .resolve(options, &controller.settings());

    if !can_close(&config) {
        bail!("The dialog could never be closed: show a control that can be enabled or set --timeout");
    }
    Ok(())
}

fn can_close(config: &DialogConfig) -> bool {
    if config.timeout.is_some() {
        return true;
    }

    // Only the checkbox can lift `initially_disabled`, and only for continue
    if config.initially_disabled {
        return config.require_confirmation && config.buttons.contains(Outcome::Continue);
    }

    !config.buttons.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use modalgate::presenter::RecordingPresenter;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        show: ShowCommand,
    }

    fn parse(args: &[&str]) -> ShowOptions {
        let mut argv = vec!["show"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().show.options().unwrap()
    }

    #[test]
    fn test_flags_map_onto_options() {
        let options = parse(&[
            "--title",
            "Deploy",
            "--timeout",
            "30",
            "--icon",
            "danger",
            "--no-confirmation",
            "--button",
            "settings",
            "--hide",
            "cancel",
        ]);

        assert_eq!(options.title.as_deref(), Some("Deploy"));
        assert_eq!(options.timeout, Some(30));
        assert_eq!(options.icon, Some(IconKind::Danger));
        assert_eq!(options.require_confirmation, Some(false));
        assert_eq!(options.show_settings, Some(true));
        assert_eq!(options.show_cancel, Some(false));
        assert_eq!(options.sound, None);
    }

    #[test]
    fn test_sound_flag_with_and_without_path() {
        assert_eq!(parse(&["--sound"]).sound, Some(true));
        let options = parse(&["--sound", "/tmp/beep.wav"]);
        assert_eq!(options.sound_path, Some(PathBuf::from("/tmp/beep.wav")));
    }

    #[test]
    fn test_options_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialog.json");
        std::fs::write(
            &path,
            r#"{"title": "From file", "message": "Kept", "autoDismissTimeout": true}"#,
        )
        .unwrap();

        let options = parse(&["--options", path.to_str().unwrap(), "--title", "From flag"]);
        assert_eq!(options.title.as_deref(), Some("From flag"));
        assert_eq!(options.message.as_deref(), Some("Kept"));
        assert_eq!(options.auto_dismiss_timeout, Some(true));
    }

    fn closable(args: &[&str], controller: &ModalController) -> bool {
        ensure_closable(controller, &parse(args)).is_ok()
    }

    #[test]
    fn test_dialogs_without_a_way_out_are_rejected() {
        let controller = ModalController::builder(RecordingPresenter::new()).build();

        assert!(!closable(&["--disabled", "--no-confirmation"], &controller));
        assert!(!closable(&["--hide", "continue", "--hide", "cancel"], &controller));
        assert!(!closable(&["--disabled", "--hide", "continue"], &controller));

        assert!(closable(&[], &controller));
        assert!(closable(&["--disabled"], &controller));
        assert!(closable(&["--hide", "continue", "--hide", "cancel", "--button", "help"], &controller));
        assert!(closable(&["--disabled", "--no-confirmation", "--timeout", "10"], &controller));
    }

    #[test]
    fn test_global_timeout_keeps_dialog_closable() {
        let controller = ModalController::builder(RecordingPresenter::new()).build();
        controller.set_timeout(Some(5));
        assert!(closable(&["--hide", "continue", "--hide", "cancel"], &controller));
    }
}
