//! # Tap Command
//!
//! Turns one keypad label into an engine transition plus its side effects.
//!
//! ## Tap Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tap("7")                                                               │
//! │     │                                                                   │
//! │     ├─ 1. parse label ─────────── UnknownButton? ──► error, no change   │
//! │     │                                                                   │
//! │     ├─ 2. CalcState::apply ────── always, synchronous                   │
//! │     │                                                                   │
//! │     ├─ 3. DigitAccepted? ──────── FxHandle::spawn_burst(key centre)     │
//! │     │                             driver gone? ──► warn, no hearts      │
//! │     │                                                                   │
//! │     └─ 4. EasterEgg? ──────────── open link (display already updated)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use heartcalc_core::{CalcButton, EditMode};
use heartcalc_fx::{FxHandle, Point};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::layout::ButtonGrid;
use crate::state::{AppConfig, CalcState};

/// Opens external links.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Hands links to the platform browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }
}

/// What the caller shows after a tap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TapResponse {
    pub display: String,
    pub edit_mode: EditMode,
    pub clear_label: String,

    /// Where hearts were released, for digit taps.
    pub burst_origin: Option<Point>,

    pub easter_egg: bool,
}

/// Everything a tap touches.
#[derive(Clone)]
pub struct TapContext {
    pub calc: CalcState,
    pub fx: FxHandle,
    pub grid: ButtonGrid,
    pub config: Arc<AppConfig>,
    pub opener: Arc<dyn LinkOpener>,
}

impl TapContext {
    pub fn new(calc: CalcState, fx: FxHandle, config: Arc<AppConfig>) -> Self {
        TapContext {
            calc,
            fx,
            grid: ButtonGrid::default(),
            config,
            opener: Arc::new(SystemOpener),
        }
    }

    pub fn with_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }
}

/// Applies one keypad label.
///
/// The engine transition always happens. A burst is released only for
/// digit taps; if the fx driver is gone the tap still succeeds without one.
pub async fn tap(ctx: &TapContext, label: &str) -> AppResult<TapResponse> {
    let button: CalcButton = label.parse()?;
    let outcome = ctx.calc.apply(button);

    let mut burst_origin = None;
    if outcome.accepted_digit().is_some() {
        if let Some(origin) = ctx.grid.origin_for(button, &ctx.config.screen) {
            match ctx.fx.spawn_burst(origin).await {
                Ok(()) => burst_origin = Some(origin),
                Err(err) => warn!(error = %err, %button, "Particle burst dropped"),
            }
        }
    }

    let easter_egg = outcome.is_easter_egg();
    let response = TapResponse {
        clear_label: outcome.edit_mode.clear_label().to_string(),
        display: outcome.display,
        edit_mode: outcome.edit_mode,
        burst_origin,
        easter_egg,
    };
    debug!(%button, display = %response.display, "Tap applied");

    if response.easter_egg {
        open_easter_egg(ctx);
    }

    Ok(response)
}

/// Applies every whitespace-separated label on a line, stopping at the
/// first unknown one.
pub async fn tap_line(ctx: &TapContext, line: &str) -> AppResult<Option<TapResponse>> {
    let mut last = None;
    for label in line.split_whitespace() {
        last = Some(tap(ctx, label).await?);
    }
    Ok(last)
}

fn open_easter_egg(ctx: &TapContext) {
    let settings = &ctx.config.easter_egg;
    if !settings.open_link {
        info!(url = %settings.url, "Easter egg reached, link opening disabled");
        return;
    }

    info!(url = %settings.url, "Easter egg reached, opening link");
    if let Err(err) = ctx.opener.open(&settings.url) {
        warn!(error = %err, "Failed to open easter egg link");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use heartcalc_fx::{FxDriver, ManualClock, ParticleScheduler};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl LinkOpener for RecordingOpener {
        fn open(&self, url: &str) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn context(config: AppConfig) -> (TapContext, Arc<RecordingOpener>) {
        let tick = config.fx.timing.tick();
        let scheduler = ParticleScheduler::new(config.fx.clone());
        let fx = FxDriver::new(scheduler, ManualClock::default(), tick).start();
        let opener = Arc::new(RecordingOpener::default());
        let ctx = TapContext::new(CalcState::from_config(&config), fx, Arc::new(config))
            .with_opener(opener.clone());
        (ctx, opener)
    }

    #[tokio::test]
    async fn test_digit_tap_releases_burst() {
        let (ctx, _) = context(AppConfig::default());

        let response = tap(&ctx, "7").await.unwrap();
        assert_eq!(response.display, "7");
        assert_eq!(response.clear_label, "⌫");
        assert_eq!(response.burst_origin, Some(Point::new(53.25, 507.25)));
        assert_eq!(ctx.fx.snapshot().await.unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_non_digit_taps_release_nothing() {
        let (ctx, _) = context(AppConfig::default());

        for label in ["+", "%", "-/+", "AC", "=", "."] {
            let response = tap(&ctx, label).await.unwrap();
            assert_eq!(response.burst_origin, None);
        }
        assert!(ctx.fx.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_line_evaluates() {
        let (ctx, _) = context(AppConfig::default());

        let response = tap_line(&ctx, "2 + 3 × 4 =").await.unwrap().unwrap();
        assert_eq!(response.display, "14");
        assert_eq!(response.clear_label, "AC");
        assert!(!response.easter_egg);
        assert_eq!(ctx.fx.snapshot().await.unwrap().len(), 45);
    }

    #[tokio::test]
    async fn test_unknown_label_leaves_state_alone() {
        let (ctx, _) = context(AppConfig::default());
        tap(&ctx, "5").await.unwrap();

        let err = tap(&ctx, "sqrt").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownButton(_)));
        assert_eq!(ctx.calc.snapshot().display, "5");
    }

    #[tokio::test]
    async fn test_easter_egg_opens_link_after_result() {
        let (ctx, opener) = context(AppConfig::default());

        let response = tap_line(&ctx, "7 0 0 + 7 7 =").await.unwrap().unwrap();
        assert_eq!(response.display, "777");
        assert!(response.easter_egg);
        assert_eq!(
            *opener.opened.lock().unwrap(),
            vec![ctx.config.easter_egg.url.clone()]
        );
    }

    #[tokio::test]
    async fn test_configured_easter_egg_result() {
        let mut config = AppConfig::default();
        config.easter_egg.result = "42".to_string();
        let (ctx, opener) = context(config);

        let response = tap_line(&ctx, "7 7 7 =").await.unwrap().unwrap();
        assert!(!response.easter_egg);

        tap(&ctx, "AC").await.unwrap();
        let response = tap_line(&ctx, "6 × 7 =").await.unwrap().unwrap();
        assert!(response.easter_egg);
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tap_survives_stopped_fx_driver() {
        let (ctx, _) = context(AppConfig::default());
        ctx.fx.shutdown().await.unwrap();
        assert!(ctx.fx.snapshot().await.is_err());

        let response = tap(&ctx, "7").await.unwrap();
        assert_eq!(response.display, "7");
        assert_eq!(response.burst_origin, None);
        assert_eq!(ctx.calc.snapshot().display, "7");
    }

    #[tokio::test]
    async fn test_evaluation_failure_is_a_display_not_an_error() {
        let (ctx, _) = context(AppConfig::default());

        let response = tap_line(&ctx, "1 ÷ 0 =").await.unwrap().unwrap();
        assert_eq!(response.display, "Error");
        assert_eq!(response.clear_label, "AC");
    }

    #[tokio::test]
    async fn test_easter_egg_link_can_be_disabled() {
        let mut config = AppConfig::default();
        config.easter_egg.open_link = false;
        let (ctx, opener) = context(config);

        let response = tap_line(&ctx, "7 7 7 =").await.unwrap().unwrap();
        assert!(response.easter_egg);
        assert!(opener.opened.lock().unwrap().is_empty());
    }
}
