//! Behaviour of a single post card, kept apart from the egui drawing code.
//!
//! A card is a pure function of the post, the viewer session and its
//! capability set, plus the small amount of transient state in
//! [`PostCardState`]. Requests themselves are issued by the app; the card
//! only decides whether one may start and what happens when it finishes.

use anyhow::Result;
use log::{debug, error};

use crate::config::CardVariant;
use crate::models::{Post, Session};
use crate::router::{Router, POSTS_PATH, POSTS_SEGMENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCardCapabilities {
    /// Like requests, loading indicators, author highlighting, comment link.
    pub authenticated_actions: bool,
    /// Author-only delete with confirmation.
    pub delete: bool,
}

impl PostCardCapabilities {
    pub const RICH: Self = Self {
        authenticated_actions: true,
        delete: true,
    };
    pub const REDUCED: Self = Self {
        authenticated_actions: false,
        delete: false,
    };
}

impl From<CardVariant> for PostCardCapabilities {
    fn from(variant: CardVariant) -> Self {
        match variant {
            CardVariant::Rich => Self::RICH,
            CardVariant::Reduced => Self::REDUCED,
        }
    }
}

pub fn current_user_liked(post: &Post, session: Option<&Session>) -> bool {
    session.is_some_and(|session| {
        post.likes
            .iter()
            .any(|like| like.user_id == session.user_id())
    })
}

pub fn is_author(post: &Post, session: Option<&Session>) -> bool {
    session.is_some_and(|session| post.user_id == session.user_id())
}

pub fn comment_count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} comment")
    } else {
        format!("{count} comments")
    }
}

/// What a card shows for a given viewer, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub liked: bool,
    pub like_count: usize,
    pub comment_label: String,
    /// Comment count links to the detail view instead of being plain text.
    pub comment_link: bool,
    pub highlight_avatar: bool,
    /// Heart reacts to hover and shows a spinner while liking.
    pub heart_interactive: bool,
    /// A click on the heart turns into a like request.
    pub can_like: bool,
    pub show_delete: bool,
}

impl CardLayout {
    pub fn new(
        post: &Post,
        session: Option<&Session>,
        capabilities: PostCardCapabilities,
    ) -> Self {
        let author = is_author(post, session);
        Self {
            liked: current_user_liked(post, session),
            like_count: post.likes.len(),
            comment_label: comment_count_label(post.comments.len()),
            comment_link: capabilities.authenticated_actions,
            highlight_avatar: capabilities.authenticated_actions && author,
            heart_interactive: capabilities.authenticated_actions,
            can_like: capabilities.authenticated_actions && session.is_some(),
            show_delete: capabilities.delete && author,
        }
    }
}

/// What the user did to a card during the last frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostCardAction {
    Like,
    OpenDelete,
    OpenDetail,
}

/// Buttons of the delete confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDialogAction {
    Cancel,
    Confirm,
}

/// While a confirmation modal is up the cards behind it stay inert.
pub fn any_confirm_open<'a>(cards: impl IntoIterator<Item = &'a PostCardState>) -> bool {
    cards.into_iter().any(|card| card.confirm_open)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostCardState {
    pub like_loading: bool,
    pub delete_loading: bool,
    pub confirm_open: bool,
}

impl PostCardState {
    /// Returns true when an add-like request should be sent.
    pub fn request_like(
        &mut self,
        capabilities: PostCardCapabilities,
        session: Option<&Session>,
    ) -> bool {
        if !capabilities.authenticated_actions || session.is_none() || self.like_loading {
            return false;
        }
        self.like_loading = true;
        true
    }

    pub fn finish_like(&mut self, post_id: &str, result: &Result<()>, router: &mut dyn Router) {
        self.like_loading = false;
        match result {
            Ok(()) => router.refresh(),
            Err(err) => debug!("like on post {post_id} failed: {err:#}"),
        }
    }

    /// Returns true when the confirmation modal was opened.
    pub fn open_delete_confirm(
        &mut self,
        capabilities: PostCardCapabilities,
        post: &Post,
        session: Option<&Session>,
    ) -> bool {
        if !capabilities.delete || !is_author(post, session) {
            return false;
        }
        self.confirm_open = true;
        true
    }

    pub fn close_delete_confirm(&mut self) {
        self.confirm_open = false;
    }

    /// Returns true when a delete request should be sent.
    pub fn request_delete(&mut self) -> bool {
        if !self.confirm_open || self.delete_loading {
            return false;
        }
        self.delete_loading = true;
        true
    }

    pub fn finish_delete(&mut self, post_id: &str, result: &Result<()>, router: &mut dyn Router) {
        self.delete_loading = false;
        match result {
            Ok(()) => {
                self.close_delete_confirm();
                if router.segment() == Some(POSTS_SEGMENT) {
                    router.refresh();
                } else {
                    router.push(POSTS_PATH);
                }
            }
            Err(err) => error!("failed to delete post {post_id}: {err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::PostApi;
    use crate::app::messages::AppMessage;
    use crate::app::tasks;
    use crate::app::ui::icons::{heart_colors, like_count_color, LIKED_COLOR, MUTED_COLOR};
    use crate::models::{Like, SessionUser};
    use crate::router::{AppRouter, NavCommand, Route};

    #[derive(Default)]
    struct RecordingRouter {
        segment: String,
        refreshes: usize,
        pushes: Vec<String>,
    }

    impl RecordingRouter {
        fn on(segment: &str) -> Self {
            Self {
                segment: segment.to_string(),
                ..Default::default()
            }
        }
    }

    impl Router for RecordingRouter {
        fn refresh(&mut self) {
            self.refreshes += 1;
        }

        fn push(&mut self, path: &str) {
            self.pushes.push(path.to_string());
        }

        fn segment(&self) -> Option<&str> {
            Some(&self.segment)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddLike(String),
        DeletePost(String),
    }

    /// Records calls and answers with a fixed outcome.
    struct MockApi {
        calls: Mutex<Vec<Call>>,
        succeed: bool,
    }

    impl MockApi {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                succeed,
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn outcome(&self) -> Result<()> {
            if self.succeed {
                Ok(())
            } else {
                Err(anyhow!("HTTP status server error (500)"))
            }
        }
    }

    impl PostApi for MockApi {
        fn add_like(&self, post_id: &str) -> Result<()> {
            self.calls.lock().unwrap().push(Call::AddLike(post_id.into()));
            self.outcome()
        }

        fn delete_post(&self, post_id: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::DeletePost(post_id.into()));
            self.outcome()
        }
    }

    fn session(user_id: &str) -> Session {
        Session {
            user: SessionUser {
                id: user_id.into(),
                name: Some("Viewer".into()),
                email: None,
                image: None,
            },
            expires: None,
        }
    }

    fn post(author: &str, likers: &[&str]) -> Post {
        Post {
            id: "p1".into(),
            user_id: author.into(),
            name: "Author".into(),
            avatar: String::new(),
            created_at: "2023-03-01T12:00:00.000Z".into(),
            content: "hello".into(),
            likes: likers
                .iter()
                .enumerate()
                .map(|(i, user)| Like {
                    id: format!("l{i}"),
                    post_id: "p1".into(),
                    user_id: user.to_string(),
                })
                .collect(),
            comments: Vec::new(),
        }
    }

    fn recv(rx: &mpsc::Receiver<AppMessage>) -> (String, Result<()>) {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppMessage::LikeFinished { post_id, result }
            | AppMessage::DeleteFinished { post_id, result } => (post_id, result),
            _ => panic!("unexpected message"),
        }
    }

    #[test]
    fn liked_iff_viewer_is_among_likers() {
        let liked = post("a", &["b", "viewer"]);
        let not_liked = post("a", &["b"]);
        let viewer = session("viewer");
        assert!(current_user_liked(&liked, Some(&viewer)));
        assert!(!current_user_liked(&not_liked, Some(&viewer)));
        assert!(!current_user_liked(&liked, None));
    }

    #[test]
    fn author_check_needs_a_session() {
        let p = post("a", &[]);
        assert!(is_author(&p, Some(&session("a"))));
        assert!(!is_author(&p, Some(&session("b"))));
        assert!(!is_author(&p, None));
    }

    #[test]
    fn rich_layout_for_author() {
        let p = post("a", &["a"]);
        let layout = CardLayout::new(&p, Some(&session("a")), PostCardCapabilities::RICH);
        assert_eq!(
            layout,
            CardLayout {
                liked: true,
                like_count: 1,
                comment_label: "0 comments".into(),
                comment_link: true,
                highlight_avatar: true,
                heart_interactive: true,
                can_like: true,
                show_delete: true,
            }
        );
    }

    #[test]
    fn rich_layout_for_other_viewer() {
        let p = post("a", &[]);
        let layout = CardLayout::new(&p, Some(&session("b")), PostCardCapabilities::RICH);
        assert!(!layout.show_delete);
        assert!(!layout.highlight_avatar);
        assert!(layout.comment_link);
        assert!(layout.can_like);
    }

    #[test]
    fn rich_layout_for_anonymous_viewer() {
        let p = post("a", &["a"]);
        let layout = CardLayout::new(&p, None, PostCardCapabilities::RICH);
        assert!(!layout.liked);
        assert!(!layout.show_delete);
        assert!(!layout.highlight_avatar);
        assert!(layout.heart_interactive);
        assert!(!layout.can_like);
    }

    #[test]
    fn reduced_layout_never_shows_delete() {
        let p = post("a", &["a"]);
        let layout = CardLayout::new(&p, Some(&session("a")), PostCardCapabilities::REDUCED);
        assert!(layout.liked);
        assert!(!layout.show_delete);
        assert!(!layout.highlight_avatar);
        assert!(!layout.comment_link);
        assert!(!layout.heart_interactive);
        assert!(!layout.can_like);
        assert_eq!(layout.comment_label, "0 comments");
    }

    #[test]
    fn unliked_post_renders_empty_heart_and_zero_count() {
        let p = post("someone-else", &[]);
        let layout = CardLayout::new(&p, Some(&session("viewer")), PostCardCapabilities::RICH);
        let colors = heart_colors(layout.liked, false, layout.heart_interactive);
        assert_eq!(colors.fill, None);
        assert_eq!(colors.stroke, MUTED_COLOR);
        assert_eq!(like_count_color(layout.liked), MUTED_COLOR);
        assert_eq!(layout.like_count, 0);

        let liked = post("someone-else", &["viewer"]);
        let layout = CardLayout::new(&liked, Some(&session("viewer")), PostCardCapabilities::RICH);
        assert_eq!(heart_colors(layout.liked, false, true).fill, Some(LIKED_COLOR));
        assert_eq!(like_count_color(layout.liked), LIKED_COLOR);
    }

    #[test]
    fn open_modal_is_detected() {
        let closed = PostCardState::default();
        let open = PostCardState {
            confirm_open: true,
            ..Default::default()
        };
        assert!(!any_confirm_open([&closed, &closed]));
        assert!(any_confirm_open([&closed, &open]));
    }

    #[test]
    fn deleting_post_named_posts_from_its_page_goes_to_listing() {
        let mut state = PostCardState {
            confirm_open: true,
            delete_loading: true,
            ..Default::default()
        };
        let mut router = AppRouter::new(Route::Post("posts".into()));
        state.finish_delete("posts", &Ok(()), &mut router);
        assert_eq!(router.next_command(), Some(NavCommand::Push(Route::Posts)));
        assert_eq!(router.next_command(), None);
    }

    #[test]
    fn pluralizes_comment_count() {
        assert_eq!(comment_count_label(0), "0 comments");
        assert_eq!(comment_count_label(1), "1 comment");
        assert_eq!(comment_count_label(2), "2 comments");
        assert_eq!(comment_count_label(11), "11 comments");
    }

    #[test]
    fn anonymous_like_sends_nothing() {
        let mut state = PostCardState::default();
        assert!(!state.request_like(PostCardCapabilities::RICH, None));
        assert!(!state.like_loading);
    }

    #[test]
    fn reduced_card_never_likes_or_deletes() {
        let viewer = session("a");
        let p = post("a", &[]);
        let mut state = PostCardState::default();
        assert!(!state.request_like(PostCardCapabilities::REDUCED, Some(&viewer)));
        assert!(!state.open_delete_confirm(PostCardCapabilities::REDUCED, &p, Some(&viewer)));
        assert!(!state.confirm_open);
    }

    #[test]
    fn like_in_flight_refuses_a_second_click() {
        let viewer = session("v");
        let mut state = PostCardState::default();
        assert!(state.request_like(PostCardCapabilities::RICH, Some(&viewer)));
        assert!(!state.request_like(PostCardCapabilities::RICH, Some(&viewer)));
    }

    #[test]
    fn already_liked_post_still_sends_like() {
        let viewer = session("v");
        let p = post("a", &["v"]);
        assert!(current_user_liked(&p, Some(&viewer)));
        let mut state = PostCardState::default();
        assert!(state.request_like(PostCardCapabilities::RICH, Some(&viewer)));
    }

    #[test]
    fn like_failure_clears_loading_without_refresh() {
        let mut state = PostCardState {
            like_loading: true,
            ..Default::default()
        };
        let mut router = RecordingRouter::on("posts");
        state.finish_like("p1", &Err(anyhow!("connection refused")), &mut router);
        assert!(!state.like_loading);
        assert_eq!(router.refreshes, 0);
        assert!(router.pushes.is_empty());
    }

    #[test]
    fn delete_modal_only_opens_for_author() {
        let p = post("a", &[]);
        let mut state = PostCardState::default();
        assert!(!state.open_delete_confirm(PostCardCapabilities::RICH, &p, Some(&session("b"))));
        assert!(!state.open_delete_confirm(PostCardCapabilities::RICH, &p, None));
        assert!(state.open_delete_confirm(PostCardCapabilities::RICH, &p, Some(&session("a"))));
        assert!(state.confirm_open);
        state.close_delete_confirm();
        assert!(!state.confirm_open);
    }

    #[test]
    fn delete_requires_open_modal() {
        let mut state = PostCardState::default();
        assert!(!state.request_delete());
        state.confirm_open = true;
        assert!(state.request_delete());
        assert!(!state.request_delete());
    }

    #[test]
    fn delete_success_on_detail_route_navigates_to_listing() {
        let mut state = PostCardState {
            confirm_open: true,
            delete_loading: true,
            ..Default::default()
        };
        let mut router = RecordingRouter::on("p1");
        state.finish_delete("p1", &Ok(()), &mut router);
        assert!(!state.confirm_open);
        assert_eq!(router.refreshes, 0);
        assert_eq!(router.pushes, vec!["/posts".to_string()]);
    }

    #[test]
    fn delete_failure_keeps_modal_open() {
        let mut state = PostCardState {
            confirm_open: true,
            delete_loading: true,
            ..Default::default()
        };
        let mut router = RecordingRouter::on("posts");
        state.finish_delete("p1", &Err(anyhow!("HTTP status client error (403)")), &mut router);
        assert!(state.confirm_open);
        assert!(!state.delete_loading);
        assert_eq!(router.refreshes, 0);
        assert!(router.pushes.is_empty());
    }

    #[test]
    fn like_round_trip_refreshes_once() {
        let p = post("someone-else", &[]);
        let viewer = session("viewer");
        assert!(!current_user_liked(&p, Some(&viewer)));
        assert_eq!(p.likes.len(), 0);

        let api = MockApi::new(true);
        let (tx, rx) = mpsc::channel();
        let mut state = PostCardState::default();
        let mut router = RecordingRouter::on("posts");

        assert!(state.request_like(PostCardCapabilities::RICH, Some(&viewer)));
        tasks::add_like(api.clone(), tx, p.id.clone());
        let (post_id, result) = recv(&rx);
        state.finish_like(&post_id, &result, &mut router);

        assert_eq!(api.calls(), vec![Call::AddLike("p1".into())]);
        assert_eq!(router.refreshes, 1);
        assert!(!state.like_loading);
    }

    #[test]
    fn failed_like_round_trip_never_refreshes() {
        let viewer = session("viewer");
        let api = MockApi::new(false);
        let (tx, rx) = mpsc::channel();
        let mut state = PostCardState::default();
        let mut router = RecordingRouter::on("posts");

        assert!(state.request_like(PostCardCapabilities::RICH, Some(&viewer)));
        tasks::add_like(api.clone(), tx, "p1".into());
        let (post_id, result) = recv(&rx);
        state.finish_like(&post_id, &result, &mut router);

        assert_eq!(router.refreshes, 0);
        assert!(!state.like_loading);
    }

    #[test]
    fn delete_round_trip_on_listing_refreshes_and_closes() {
        let p = post("viewer", &[]);
        let viewer = session("viewer");
        let api = MockApi::new(true);
        let (tx, rx) = mpsc::channel();
        let mut state = PostCardState::default();
        let mut router = RecordingRouter::on("posts");

        assert!(state.open_delete_confirm(PostCardCapabilities::RICH, &p, Some(&viewer)));
        assert!(state.request_delete());
        tasks::delete_post(api.clone(), tx, p.id.clone());
        let (post_id, result) = recv(&rx);
        state.finish_delete(&post_id, &result, &mut router);

        assert_eq!(api.calls(), vec![Call::DeletePost("p1".into())]);
        assert_eq!(router.refreshes, 1);
        assert!(router.pushes.is_empty());
        assert!(!state.confirm_open);
        assert!(!state.delete_loading);
    }
}
