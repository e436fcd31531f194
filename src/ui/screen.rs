use keyrace::{runtime::Clock, store::KeyValueStore};
use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::{leaderboard::render_leaderboard, render_menu, render_race, render_results},
};

/// A UI Screen boundary: responsible for rendering one `AppState`
pub trait Screen<S: KeyValueStore, C: Clock> {
    fn render(&self, app: &App<S, C>, f: &mut Frame);
}

pub struct MenuScreen;

impl<S: KeyValueStore, C: Clock> Screen<S, C> for MenuScreen {
    fn render(&self, app: &App<S, C>, f: &mut Frame) {
        let area = f.area();
        render_menu(app, area, f.buffer_mut());
    }
}

/// Live race: gauges, highlighted passage and status line
pub struct RaceScreen;

impl<S: KeyValueStore, C: Clock> Screen<S, C> for RaceScreen {
    fn render(&self, app: &App<S, C>, f: &mut Frame) {
        let area = f.area();
        render_race(app, area, f.buffer_mut());
    }
}

pub struct ResultsScreen;

impl<S: KeyValueStore, C: Clock> Screen<S, C> for ResultsScreen {
    fn render(&self, app: &App<S, C>, f: &mut Frame) {
        let area = f.area();
        render_results(app, area, f.buffer_mut());
    }
}

pub struct LeaderboardScreen;

impl<S: KeyValueStore, C: Clock> Screen<S, C> for LeaderboardScreen {
    fn render(&self, app: &App<S, C>, f: &mut Frame) {
        let area = f.area();
        render_leaderboard(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<S: KeyValueStore, C: Clock>(state: AppState) -> Box<dyn Screen<S, C>> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Race => Box::new(RaceScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Leaderboard => Box::new(LeaderboardScreen),
    }
}
