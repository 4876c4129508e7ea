use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub created_at: String,
    pub content: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user: CommentAuthor,
    pub created_at: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Signed-in viewer as reported by the auth session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    #[serde(default)]
    pub expires: Option<String>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Raw body of `GET /api/auth/session`. An anonymous viewer gets `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl SessionResponse {
    pub fn into_session(self) -> Option<Session> {
        let expires = self.expires;
        self.user.map(|user| Session { user, expires })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIdInput {
    pub post_id: String,
}

impl PostIdInput {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn post_reads_camel_case_fields() {
        let raw = r#"{
            "id": "p1",
            "userId": "u1",
            "name": "Ada",
            "avatar": "https://cdn.example/ada.png",
            "createdAt": "2023-03-01T12:00:00.000Z",
            "content": "hello",
            "likes": [{ "id": "l1", "postId": "p1", "userId": "u2" }],
            "comments": [{
                "id": "c1",
                "user": { "name": "Bob", "image": null },
                "createdAt": "2023-03-02T08:30:00.000Z",
                "content": "hi"
            }]
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.user_id, "u1");
        assert_eq!(
            post.likes,
            vec![Like {
                id: "l1".into(),
                post_id: "p1".into(),
                user_id: "u2".into(),
            }]
        );
        assert_eq!(post.comments[0].user.name, "Bob");
        assert_eq!(post.comments[0].user.image, None);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let raw = r#"{"id":"p1","userId":"u1","name":"Ada","createdAt":"x","content":"c"}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.avatar, "");
    }

    #[test]
    fn empty_session_body_is_anonymous() {
        let response: SessionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_session(), None);
    }

    #[test]
    fn session_body_with_user_is_signed_in() {
        let raw = r#"{"user":{"id":"u1","name":"Ada","email":"ada@example.com","image":null},"expires":"2026-11-01T00:00:00.000Z"}"#;
        let response: SessionResponse = serde_json::from_str(raw).unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.user_id(), "u1");
        assert_eq!(session.user.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn post_id_body_uses_camel_case() {
        let body = serde_json::to_value(PostIdInput::new("p9")).unwrap();
        assert_eq!(body, serde_json::json!({ "postId": "p9" }));
    }
}
