//! Dialog lifecycle controller
//!
//! The controller is responsible for:
//! - resolving options into a [`DialogConfig`] and rendering it
//! - holding the single pending completion of the open dialog
//! - gating the continue control behind the confirmation checkbox
//! - arming and disarming the auto-dismiss countdown
//! - resolving each dialog exactly once and returning to idle

use super::countdown::Countdown;
use super::types::{ModalError, ModalResult, Outcome};
use crate::locale::{normalize_language, BuiltinLocales, LocaleResolver, LocaleSource};
use crate::options::{
    normalize_timeout, ButtonSet, ColorSchemeProbe, DialogConfig, GlobalSettings, OptionResolver,
    ShowOptions, TerminalColorScheme, ThemeSetting,
};
use crate::presenter::{DialogView, Presenter, UiEvent};
use crate::sound::{SilentPlayer, SoundPlayer};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Initial global settings of a controller
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub language: Option<String>,
    pub theme: Option<ThemeSetting>,
    pub timeout: Option<i64>,
    pub sound_path: Option<PathBuf>,
}

impl ControllerOptions {
    fn into_settings(self) -> GlobalSettings {
        let defaults = GlobalSettings::default();
        GlobalSettings {
            language: self
                .language
                .as_deref()
                .map(normalize_language)
                .unwrap_or(defaults.language),
            theme: self.theme.unwrap_or(defaults.theme),
            timeout: self.timeout.and_then(normalize_timeout),
            sound_path: self.sound_path.unwrap_or(defaults.sound_path),
        }
    }
}

/// Builder for [`ModalController`] collaborators
pub struct ModalControllerBuilder {
    presenter: Arc<dyn Presenter>,
    locale_source: Arc<dyn LocaleSource>,
    sound: Arc<dyn SoundPlayer>,
    color_scheme: Arc<dyn ColorSchemeProbe>,
    options: ControllerOptions,
}

impl ModalControllerBuilder {
    pub fn with_locale_source(mut self, source: impl LocaleSource + 'static) -> Self {
        self.locale_source = Arc::new(source);
        self
    }

    pub fn with_sound_player(mut self, player: impl SoundPlayer + 'static) -> Self {
        self.sound = Arc::new(player);
        self
    }

    pub fn with_color_scheme(mut self, probe: impl ColorSchemeProbe + 'static) -> Self {
        self.color_scheme = Arc::new(probe);
        self
    }

    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> ModalController {
        ModalController {
            inner: Arc::new(Inner {
                presenter: self.presenter,
                locales: LocaleResolver::new(self.locale_source),
                sound: self.sound,
                color_scheme: self.color_scheme,
                settings: RwLock::new(self.options.into_settings()),
                instance: Mutex::new(ModalInstance::default()),
                generations: AtomicU64::new(0),
            }),
        }
    }
}

pub(crate) struct Inner {
    presenter: Arc<dyn Presenter>,
    locales: LocaleResolver,
    sound: Arc<dyn SoundPlayer>,
    color_scheme: Arc<dyn ColorSchemeProbe>,
    settings: RwLock<GlobalSettings>,
    instance: Mutex<ModalInstance>,
    generations: AtomicU64,
}

/// State of the open dialog; empty while idle
#[derive(Default)]
struct ModalInstance {
    generation: u64,
    view: Option<Box<dyn DialogView>>,
    pending: Option<oneshot::Sender<Outcome>>,
    visible: ButtonSet,
    enabled: ButtonSet,
    confirmation_gate: bool,
    countdown: Option<Countdown>,
    event_pump: Option<JoinHandle<()>>,
}

impl ModalInstance {
    fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_open() && self.generation == generation
    }

    /// Disarm timers and hand back the pending completion with the view.
    ///
    /// Returns `None` when idle, which makes every close path idempotent.
    /// The view is detached by [`ModalController::resolve`] once the
    /// instance lock is released.
    fn teardown(&mut self) -> Option<Closing> {
        let pending = self.pending.take()?;

        // Stop everything that could still call back into this dialog
        if let Some(countdown) = self.countdown.take() {
            countdown.disarm();
        }
        if let Some(pump) = self.event_pump.take() {
            pump.abort();
        }

        // Back to idle
        let view = self.view.take();
        self.visible = ButtonSet::empty();
        self.enabled = ButtonSet::empty();
        self.confirmation_gate = false;

        Some(Closing { pending, view })
    }

    fn set_enabled(&mut self, control: Outcome, enabled: bool) -> bool {
        if !self.visible.contains(control) {
            return false;
        }

        self.enabled.set(control, enabled);
        if let Some(view) = self.view.as_mut() {
            view.set_enabled(control, enabled);
        }
        true
    }
}

/// A dialog taken out of [`ModalInstance`], waiting to be resolved
struct Closing {
    pending: oneshot::Sender<Outcome>,
    view: Option<Box<dyn DialogView>>,
}

/// Completion of one dialog. Resolves exactly once.
///
/// If the controller is dropped while the dialog is open, the dialog
/// resolves with [`Outcome::Cancel`].
#[must_use = "a dialog's outcome is only observed by awaiting it"]
pub struct PendingDialog {
    receiver: oneshot::Receiver<Outcome>,
}

impl Future for PendingDialog {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        Pin::new(&mut self.get_mut().receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Outcome::Cancel))
    }
}

/// Owns at most one open dialog. Cloning yields another handle to the same
/// controller.
#[derive(Clone)]
pub struct ModalController {
    inner: Arc<Inner>,
}

impl ModalController {
    /// Controller with built-in locales, no sound and terminal color-scheme
    /// detection
    pub fn new(presenter: impl Presenter + 'static, options: ControllerOptions) -> Self {
        Self::builder(presenter).with_options(options).build()
    }

    pub fn builder(presenter: impl Presenter + 'static) -> ModalControllerBuilder {
        ModalControllerBuilder {
            presenter: Arc::new(presenter),
            locale_source: Arc::new(BuiltinLocales),
            sound: Arc::new(SilentPlayer),
            color_scheme: Arc::new(TerminalColorScheme),
            options: ControllerOptions::default(),
        }
    }

    pub(crate) fn upgrade(inner: &Weak<Inner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    fn lock_instance(&self) -> MutexGuard<'_, ModalInstance> {
        self.inner
            .instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_settings(&self) -> RwLockReadGuard<'_, GlobalSettings> {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_settings(&self) -> RwLockWriteGuard<'_, GlobalSettings> {
        self.inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a dialog and wait for its outcome
    pub async fn show(&self, options: ShowOptions) -> ModalResult<Outcome> {
        Ok(self.open(options).await?.await)
    }

    /// Render a dialog and return its pending completion without waiting.
    ///
    /// Fails with [`ModalError::NoSurface`] when the presenter cannot render
    /// and with [`ModalError::AlreadyOpen`] while another dialog is pending.
    pub async fn open(&self, options: ShowOptions) -> ModalResult<PendingDialog> {
        if self.is_open() {
            return Err(ModalError::AlreadyOpen);
        }

        let settings = self.settings();
        let language = OptionResolver::effective_language(&options, &settings);
        self.inner.locales.load_with_fallback(&language).await;

        let config = OptionResolver::new(&self.inner.locales, self.inner.color_scheme.as_ref())
            .resolve(&options, &settings);
        self.present(config)
    }

    fn present(&self, config: DialogConfig) -> ModalResult<PendingDialog> {
        let mut instance = self.lock_instance();
        if instance.is_open() {
            return Err(ModalError::AlreadyOpen);
        }

        // Render first so a missing surface leaves the controller idle
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut view = self.inner.presenter.render(&config, events_tx)?;
        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = oneshot::channel();

        // Continue waits for the checkbox; initially_disabled overrides all
        let visible = config.buttons;
        let mut enabled = visible;
        if config.require_confirmation {
            enabled.set(Outcome::Continue, false);
        }
        if config.initially_disabled {
            enabled = ButtonSet::empty();
        }
        for control in visible.iter() {
            view.set_enabled(control, enabled.contains(control));
        }

        // Timers hold weak handles so a dropped controller cancels them
        let weak = Arc::downgrade(&self.inner);
        let countdown = config.timeout.map(|seconds| {
            debug!("Arming {}s countdown for dialog {}", seconds, generation);
            let countdown = Countdown::arm(
                weak.clone(),
                generation,
                seconds,
                config.cancel_label.clone(),
                config.language.clone(),
            );
            if visible.contains(Outcome::Cancel) {
                view.set_label(Outcome::Cancel, &countdown.label(&self.inner.locales));
            }
            countdown
        });

        *instance = ModalInstance {
            generation,
            view: Some(view),
            pending: Some(sender),
            visible,
            enabled,
            confirmation_gate: config.require_confirmation,
            countdown,
            event_pump: Some(tokio::spawn(pump_events(weak, generation, events_rx))),
        };
        drop(instance);

        // Sound failures never affect the dialog
        if config.sound {
            let _ = self.inner.sound.play(&config.sound_path);
        }

        info!(
            "Opened dialog {} (language: {}, theme: {:?}, timeout: {:?})",
            generation, config.language, config.theme, config.timeout
        );
        Ok(PendingDialog { receiver })
    }

    /// Resolve the open dialog with `outcome`.
    ///
    /// Returns false, doing nothing, when no dialog is open.
    pub fn close(&self, outcome: Outcome) -> bool {
        let closing = self.lock_instance().teardown();
        Self::resolve(closing, outcome)
    }

    fn resolve(closing: Option<Closing>, outcome: Outcome) -> bool {
        let Some(Closing { pending, view }) = closing else {
            return false;
        };

        // Detach before waking the caller so the surface is gone first
        if let Some(mut view) = view {
            view.detach();
        }

        // The receiver may be gone already; the dialog is closed either way
        let _ = pending.send(outcome);
        info!("Dialog resolved with '{}'", outcome);
        true
    }

    fn close_if_current(&self, generation: u64, outcome: Outcome) -> bool {
        let mut instance = self.lock_instance();
        if !instance.is_current(generation) {
            return false;
        }
        let closing = instance.teardown();
        drop(instance);
        Self::resolve(closing, outcome)
    }

    /// Enable or disable a visible control of the open dialog
    pub fn set_enabled(&self, control: Outcome, enabled: bool) -> bool {
        let mut instance = self.lock_instance();
        instance.is_open() && instance.set_enabled(control, enabled)
    }

    /// Whether a control of the open dialog currently accepts clicks
    pub fn is_enabled(&self, control: Outcome) -> bool {
        let instance = self.lock_instance();
        instance.is_open() && instance.enabled.contains(control)
    }

    pub fn is_open(&self) -> bool {
        self.lock_instance().is_open()
    }

    /// Returns whether the event pump should keep running
    fn handle_event(&self, generation: u64, event: UiEvent) -> bool {
        match event {
            UiEvent::Clicked(control) => {
                {
                    let instance = self.lock_instance();
                    if !instance.is_current(generation) {
                        return false;
                    }
                    if !instance.enabled.contains(control) {
                        debug!("Ignoring click on disabled control '{}'", control);
                        return true;
                    }
                }
                !self.close_if_current(generation, control)
            }
            UiEvent::ConfirmationToggled(checked) => {
                let mut instance = self.lock_instance();
                if !instance.is_current(generation) {
                    return false;
                }
                if instance.confirmation_gate {
                    instance.set_enabled(Outcome::Continue, checked);
                }
                true
            }
        }
    }

    /// Returns whether the tick task should keep running
    pub(crate) fn on_tick(&self, generation: u64) -> bool {
        let mut instance = self.lock_instance();
        if !instance.is_current(generation) {
            return false;
        }
        let Some(countdown) = instance.countdown.as_mut() else {
            return false;
        };

        if countdown.tick() == 0 {
            let closing = instance.teardown();
            drop(instance);
            Self::resolve(closing, Outcome::Cancel);
            return false;
        }

        let remaining = countdown.remaining();
        let label = countdown.label(&self.inner.locales);
        if instance.visible.contains(Outcome::Cancel) {
            if let Some(view) = instance.view.as_mut() {
                view.set_label(Outcome::Cancel, &label);
            }
        }
        debug!("Dialog {} closes in {}s", generation, remaining);
        true
    }

    pub(crate) fn on_deadline(&self, generation: u64) {
        if self.close_if_current(generation, Outcome::Cancel) {
            debug!("Dialog {} reached its deadline", generation);
        }
    }

    /// Change the default language, loading its strings first
    pub async fn set_language(&self, language: &str) {
        let language = normalize_language(language);
        self.inner.locales.load_with_fallback(&language).await;
        self.write_settings().language = language;
    }

    pub fn language(&self) -> String {
        self.read_settings().language.clone()
    }

    /// Set the default theme from `dark`, `light` or `auto`
    pub fn set_theme(&self, theme: &str) -> ModalResult<()> {
        let theme: ThemeSetting = theme.parse()?;
        self.set_theme_setting(theme);
        Ok(())
    }

    pub fn set_theme_setting(&self, theme: ThemeSetting) {
        self.write_settings().theme = theme;
    }

    pub fn theme(&self) -> ThemeSetting {
        self.read_settings().theme
    }

    /// Default auto-dismiss timeout; `None`, zero or negative disables it
    pub fn set_timeout(&self, seconds: Option<i64>) {
        self.write_settings().timeout = seconds.and_then(normalize_timeout);
    }

    pub fn set_sound_path(&self, path: impl Into<PathBuf>) {
        self.write_settings().sound_path = path.into();
    }

    /// Snapshot of the current global settings
    pub fn settings(&self) -> GlobalSettings {
        self.read_settings().clone()
    }

    pub fn locales(&self) -> &LocaleResolver {
        &self.inner.locales
    }
}

async fn pump_events(
    controller: Weak<Inner>,
    generation: u64,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(controller) = ModalController::upgrade(&controller) else {
            break;
        };
        if !controller.handle_event(generation, event) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{FixedColorScheme, Theme};
    use crate::presenter::RecordingPresenter;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    fn controller() -> (ModalController, RecordingPresenter) {
        let presenter = RecordingPresenter::new();
        let controller = ModalController::builder(presenter.clone())
            .with_color_scheme(FixedColorScheme(false))
            .build();
        (controller, presenter)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn ungated() -> ShowOptions {
        ShowOptions::new().require_confirmation(false)
    }

    #[tokio::test]
    async fn test_click_continue_resolves_continue() {
        let (controller, presenter) = controller();
        let options = ungated()
            .with_title("T")
            .with_message("M")
            .with_button(Outcome::Cancel, true)
            .with_button(Outcome::Continue, true);

        let pending = controller.open(options).await.unwrap();
        let config = presenter.config().unwrap();
        assert_eq!(config.title, "T");
        assert_eq!(config.message, "M");

        assert!(presenter.click(Outcome::Continue));
        assert_eq!(pending.await, Outcome::Continue);
        assert!(!controller.is_open());
        assert!(!presenter.is_attached());
    }

    #[tokio::test]
    async fn test_confirmation_gates_only_continue() {
        let (controller, presenter) = controller();
        let options = ShowOptions::new()
            .with_button(Outcome::Settings, true)
            .with_button(Outcome::Help, true)
            .with_button(Outcome::Danger, true);

        let pending = controller.open(options).await.unwrap();
        assert!(!presenter.is_enabled(Outcome::Continue));
        for control in [Outcome::Cancel, Outcome::Settings, Outcome::Help, Outcome::Danger] {
            assert!(presenter.is_enabled(control), "{} should be enabled", control);
        }

        presenter.click(Outcome::Continue);
        settle().await;
        assert!(controller.is_open());

        presenter.toggle_confirmation(true);
        settle().await;
        assert!(presenter.is_enabled(Outcome::Continue));

        presenter.toggle_confirmation(false);
        settle().await;
        assert!(!controller.is_enabled(Outcome::Continue));
        assert!(presenter.is_enabled(Outcome::Help));

        presenter.click(Outcome::Help);
        assert_eq!(pending.await, Outcome::Help);
    }

    #[tokio::test]
    async fn test_checked_confirmation_allows_continue() {
        let (controller, presenter) = controller();
        let pending = controller.open(ShowOptions::new()).await.unwrap();

        presenter.toggle_confirmation(true);
        presenter.click(Outcome::Continue);
        assert_eq!(pending.await, Outcome::Continue);
    }

    #[tokio::test]
    async fn test_initially_disabled_overrides_everything() {
        let (controller, presenter) = controller();
        let pending = controller
            .open(ungated().initially_disabled(true))
            .await
            .unwrap();

        assert!(!presenter.is_enabled(Outcome::Continue));
        assert!(!presenter.is_enabled(Outcome::Cancel));

        presenter.click(Outcome::Cancel);
        settle().await;
        assert!(controller.is_open());

        assert!(controller.set_enabled(Outcome::Cancel, true));
        assert!(!controller.set_enabled(Outcome::Help, true));
        presenter.click(Outcome::Cancel);
        assert_eq!(pending.await, Outcome::Cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_resolves_cancel_and_stops_ticking() {
        let (controller, presenter) = controller();
        let start = Instant::now();

        let pending = controller.open(ungated().with_timeout(30)).await.unwrap();
        assert_eq!(presenter.label(Outcome::Cancel).as_deref(), Some("Cancel (30)"));

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(presenter.label(Outcome::Cancel).as_deref(), Some("Cancel (28)"));

        assert_eq!(pending.await, Outcome::Cancel);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(30), "{:?}", elapsed);
        assert!(elapsed <= Duration::from_secs(31), "{:?}", elapsed);

        let updates = presenter.label_updates();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(presenter.label_updates(), updates);
        assert!(!presenter.is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_legacy_timeout_behaves_like_numeric_timeout() {
        let (controller, _presenter) = controller();

        let legacy = ShowOptions {
            auto_dismiss_timeout: Some(true),
            auto_dismiss_timeout_seconds: Some(5),
            ..ungated()
        };
        let start = Instant::now();
        assert_eq!(controller.show(legacy).await.unwrap(), Outcome::Cancel);
        let legacy_elapsed = start.elapsed();

        let start = Instant::now();
        assert_eq!(
            controller.show(ungated().with_timeout(5)).await.unwrap(),
            Outcome::Cancel
        );
        assert_eq!(start.elapsed(), legacy_elapsed);
        assert_eq!(legacy_elapsed, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timers_do_not_touch_next_dialog() {
        let (controller, presenter) = controller();

        let first = controller.open(ungated().with_timeout(10)).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        presenter.click(Outcome::Continue);
        assert_eq!(first.await, Outcome::Continue);

        let second = controller.open(ungated()).await.unwrap();
        sleep(Duration::from_secs(20)).await;
        assert!(controller.is_open());
        assert_eq!(presenter.label_updates(), 0);

        assert!(controller.close(Outcome::Settings));
        assert_eq!(second.await, Outcome::Settings);
    }

    #[tokio::test]
    async fn test_close_twice_resolves_once() {
        let (controller, _presenter) = controller();
        assert!(!controller.close(Outcome::Cancel));

        let pending = controller.open(ShowOptions::new()).await.unwrap();
        assert!(controller.close(Outcome::Danger));
        assert!(!controller.close(Outcome::Cancel));
        assert_eq!(pending.await, Outcome::Danger);
    }

    /// Records whether the instance lock was free when its view detached
    #[derive(Clone, Default)]
    struct DetachWatcher {
        controller: Arc<Mutex<Weak<Inner>>>,
        lock_free_on_detach: Arc<Mutex<Option<bool>>>,
    }

    struct WatchedView(DetachWatcher);

    impl DialogView for WatchedView {
        fn set_enabled(&mut self, _control: Outcome, _enabled: bool) {}

        fn set_label(&mut self, _control: Outcome, _label: &str) {}

        fn detach(&mut self) {
            let inner = self.0.controller.lock().unwrap().upgrade().unwrap();
            let free = inner.instance.try_lock().is_ok();
            *self.0.lock_free_on_detach.lock().unwrap() = Some(free);
        }
    }

    impl Presenter for DetachWatcher {
        fn render(
            &self,
            _config: &DialogConfig,
            _events: mpsc::UnboundedSender<UiEvent>,
        ) -> ModalResult<Box<dyn DialogView>> {
            Ok(Box::new(WatchedView(self.clone())))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_detaches_outside_the_instance_lock() {
        let watcher = DetachWatcher::default();
        let controller = ModalController::builder(watcher.clone())
            .with_color_scheme(FixedColorScheme(false))
            .build();
        *watcher.controller.lock().unwrap() = Arc::downgrade(&controller.inner);

        let pending = controller.open(ungated()).await.unwrap();
        assert!(controller.close(Outcome::Help));
        assert_eq!(pending.await, Outcome::Help);
        assert_eq!(*watcher.lock_free_on_detach.lock().unwrap(), Some(true));

        // Timer-driven closes take the same path
        *watcher.lock_free_on_detach.lock().unwrap() = None;
        let pending = controller.open(ungated().with_timeout(2)).await.unwrap();
        assert_eq!(pending.await, Outcome::Cancel);
        assert_eq!(*watcher.lock_free_on_detach.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_second_open_is_rejected() {
        let (controller, presenter) = controller();
        let pending = controller.open(ShowOptions::new()).await.unwrap();

        assert!(matches!(
            controller.open(ShowOptions::new()).await,
            Err(ModalError::AlreadyOpen)
        ));
        assert_eq!(presenter.renders(), 1);

        controller.close(Outcome::Cancel);
        assert_eq!(pending.await, Outcome::Cancel);
        assert!(controller.open(ShowOptions::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_surface_fails_show() {
        let controller = ModalController::new(RecordingPresenter::unavailable(), Default::default());
        assert!(matches!(
            controller.show(ShowOptions::new()).await,
            Err(ModalError::NoSurface(_))
        ));
        assert!(!controller.is_open());
    }

    #[tokio::test]
    async fn test_dropping_controller_cancels_pending_dialog() {
        let (controller, _presenter) = controller();
        let pending = controller.open(ShowOptions::new()).await.unwrap();
        drop(controller);
        assert_eq!(pending.await, Outcome::Cancel);
    }

    #[tokio::test]
    async fn test_per_call_language_does_not_change_global_language() {
        let (controller, presenter) = controller();
        let pending = controller
            .open(ShowOptions::new().with_language("de"))
            .await
            .unwrap();

        let config = presenter.config().unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.title, "Warnung");
        assert_eq!(controller.language(), "en");

        controller.close(Outcome::Cancel);
        let _ = pending.await;
    }

    #[tokio::test]
    async fn test_global_settings() {
        let presenter = RecordingPresenter::new();
        let controller = ModalController::builder(presenter.clone())
            .with_color_scheme(FixedColorScheme(true))
            .with_options(ControllerOptions {
                language: Some("TR".to_string()),
                theme: Some(ThemeSetting::Auto),
                timeout: Some(-3),
                sound_path: None,
            })
            .build();

        assert_eq!(controller.language(), "tr");
        assert_eq!(controller.theme(), ThemeSetting::Auto);
        assert_eq!(controller.settings().timeout, None);

        assert!(matches!(
            controller.set_theme("neon"),
            Err(ModalError::InvalidTheme(_))
        ));
        assert_eq!(controller.theme(), ThemeSetting::Auto);

        controller.set_timeout(Some(12));
        assert_eq!(controller.settings().timeout, Some(12));
        controller.set_sound_path("/tmp/alert.wav");
        assert_eq!(controller.settings().sound_path, PathBuf::from("/tmp/alert.wav"));

        let pending = controller.open(ShowOptions::new()).await.unwrap();
        let config = presenter.config().unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.timeout, Some(12));
        assert_eq!(config.cancel_label, "İptal");
        controller.close(Outcome::Cancel);
        let _ = pending.await;

        controller.set_theme("light").unwrap();
        assert_eq!(controller.theme(), ThemeSetting::Light);
    }

    struct CountingPlayer {
        plays: Arc<AtomicUsize>,
    }

    impl SoundPlayer for CountingPlayer {
        fn play(&self, _path: &Path) -> anyhow::Result<()> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("no audio device")
        }
    }

    #[tokio::test]
    async fn test_sound_failures_are_swallowed() {
        let plays = Arc::new(AtomicUsize::new(0));
        let presenter = RecordingPresenter::new();
        let controller = ModalController::builder(presenter.clone())
            .with_sound_player(CountingPlayer {
                plays: plays.clone(),
            })
            .build();

        let pending = controller.open(ShowOptions::new()).await.unwrap();
        controller.close(Outcome::Cancel);
        let _ = pending.await;
        assert_eq!(plays.load(Ordering::SeqCst), 0);

        let pending = controller
            .open(ShowOptions::new().with_sound("missing.wav"))
            .await
            .unwrap();
        assert_eq!(plays.load(Ordering::SeqCst), 1);
        assert!(controller.is_open());
        controller.close(Outcome::Cancel);
        assert_eq!(pending.await, Outcome::Cancel);
    }
}
