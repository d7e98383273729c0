//! A live, unlocked invite: the rendered page plus the background tasks
//! that keep its countdown and decor current.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clock::Clock;
use crate::details::Details;
use crate::error::InviteResult;
use crate::render::{
    CountdownTicker, DecorView, InvitePage, RenderOptions, RsvpClick, ThemeMode, render,
    watch_decor,
};

/// Owns everything an open invite needs. Must be created inside a tokio
/// runtime; dropping it stops the countdown and the decor binding.
pub struct InviteSession {
    details: Arc<Details>,
    calendar_url: String,
    options: RenderOptions,
    clock: Arc<dyn Clock>,
    page: InvitePage,
    ticker: CountdownTicker,
    modes: watch::Sender<ThemeMode>,
    decor: watch::Receiver<DecorView>,
    decor_task: JoinHandle<()>,
}

impl InviteSession {
    pub fn start(
        details: Details,
        calendar_url: impl Into<String>,
        options: RenderOptions,
        clock: Arc<dyn Clock>,
    ) -> InviteResult<Self> {
        let details = Arc::new(details);
        let calendar_url = calendar_url.into();

        let mut options = options;
        options.now = clock.now();
        let page = render(&details, &calendar_url, &options)?;

        let (modes, mode_rx) = watch::channel(options.theme_mode);
        let (decor, decor_task) = watch_decor(Arc::clone(&details), mode_rx);

        let mut ticker = CountdownTicker::new();
        ticker.start(&page.countdown, Arc::clone(&clock));

        Ok(InviteSession {
            details,
            calendar_url,
            options,
            clock,
            page,
            ticker,
            modes,
            decor,
            decor_task,
        })
    }

    pub fn details(&self) -> &Arc<Details> {
        &self.details
    }

    /// The page as last rendered. Countdown and decor move on without a
    /// rerender; see [`InviteSession::snapshot`].
    pub fn page(&self) -> &InvitePage {
        &self.page
    }

    /// The page with the live countdown text and decor filled in.
    pub fn snapshot(&self) -> InvitePage {
        let mut page = self.page.clone();
        page.countdown.text = self.ticker.current();
        page.decor = self.decor.borrow().clone();
        page
    }

    pub fn countdown(&self) -> watch::Receiver<String> {
        self.ticker.subscribe()
    }

    pub fn countdown_text(&self) -> String {
        self.ticker.current()
    }

    pub fn is_counting(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn decor(&self) -> watch::Receiver<DecorView> {
        self.decor.clone()
    }

    pub fn theme_mode(&self) -> ThemeMode {
        *self.modes.borrow()
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.options.theme_mode = mode;
        self.modes.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        });
    }

    /// Render the page again from the same document. The previous
    /// countdown task is stopped before the new one starts.
    pub fn rerender(&mut self) -> InviteResult<()> {
        self.options.now = self.clock.now();
        let page = render(&self.details, &self.calendar_url, &self.options)?;

        self.ticker.stop();
        self.ticker.start(&page.countdown, Arc::clone(&self.clock));
        self.page = page;

        debug!("invite re-rendered");
        Ok(())
    }

    /// Swap in a freshly loaded document. The decor binding is rebuilt
    /// around it so nothing keeps reading the old one.
    pub fn replace_details(&mut self, details: Details) -> InviteResult<()> {
        let details = Arc::new(details);
        self.options.now = self.clock.now();
        let page = render(&details, &self.calendar_url, &self.options)?;

        self.decor_task.abort();
        let (decor, decor_task) = watch_decor(Arc::clone(&details), self.modes.subscribe());
        self.decor = decor;
        self.decor_task = decor_task;

        self.ticker.stop();
        self.ticker.start(&page.countdown, Arc::clone(&self.clock));

        self.details = details;
        self.page = page;
        Ok(())
    }

    /// Click on the in-page RSVP button.
    pub fn click_rsvp(&mut self) -> Option<RsvpClick> {
        self.page.rsvp.as_mut()?.click()
    }
}

impl Drop for InviteSession {
    fn drop(&mut self) {
        self.ticker.stop();
        self.decor_task.abort();
    }
}
