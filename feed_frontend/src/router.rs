use std::collections::VecDeque;
use std::fmt;

use log::{info, warn};

pub const POSTS_SEGMENT: &str = "posts";
pub const POSTS_PATH: &str = "/posts";
/// Segment of every detail route, whatever the post id is.
pub const POST_DETAIL_SEGMENT: &str = "[id]";

/// Navigation capability handed to post cards.
pub trait Router {
    /// Re-fetch the current view's data without leaving it.
    fn refresh(&mut self);
    fn push(&mut self, path: &str);
    fn segment(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Posts,
    Post(String),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let rest = trimmed.strip_prefix(POSTS_PATH)?;
        if rest.is_empty() {
            return Some(Route::Posts);
        }
        let id = rest.strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Route::Post(id.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Posts => POSTS_PATH.to_string(),
            Route::Post(id) => format!("{POSTS_PATH}/{id}"),
        }
    }

    pub fn segment(&self) -> &'static str {
        match self {
            Route::Posts => POSTS_SEGMENT,
            Route::Post(_) => POST_DETAIL_SEGMENT,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Refresh,
    Push(Route),
}

/// Router backing the desktop app. Commands are queued and applied by the
/// app between frames, so a card never touches view state directly.
#[derive(Debug)]
pub struct AppRouter {
    current: Route,
    pending: VecDeque<NavCommand>,
}

impl AppRouter {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            pending: VecDeque::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Pops the next command, moving `current` along for pushes.
    pub fn next_command(&mut self) -> Option<NavCommand> {
        let command = self.pending.pop_front()?;
        if let NavCommand::Push(route) = &command {
            info!("navigating {} -> {}", self.current, route);
            self.current = route.clone();
        }
        Some(command)
    }
}

impl Router for AppRouter {
    fn refresh(&mut self) {
        self.pending.push_back(NavCommand::Refresh);
    }

    fn push(&mut self, path: &str) {
        match Route::parse(path) {
            Some(route) => self.pending.push_back(NavCommand::Push(route)),
            None => warn!("ignoring navigation to unknown path {path}"),
        }
    }

    fn segment(&self) -> Option<&str> {
        // Segment reflects where the user is now, ignoring queued pushes.
        Some(self.current.segment())
    }
}
