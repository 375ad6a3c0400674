//! Community data records
//!
//! Users, posts, ranking entries and comments as the site exchanges them,
//! plus the closed category and platform tags every post carries. Records
//! serialize with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a known category or platform tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

/// Content category of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostCategory {
    /// Streaming services such as Netflix or Disney+
    Ott,
    Youtube,
    Webtoon,
    Movie,
    Drama,
    Anime,
    Book,
    Game,
    Music,
    Other,
}

impl PostCategory {
    pub const ALL: [PostCategory; 10] = [
        PostCategory::Ott,
        PostCategory::Youtube,
        PostCategory::Webtoon,
        PostCategory::Movie,
        PostCategory::Drama,
        PostCategory::Anime,
        PostCategory::Book,
        PostCategory::Game,
        PostCategory::Music,
        PostCategory::Other,
    ];

    /// Wire tag of the category
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Ott => "ott",
            PostCategory::Youtube => "youtube",
            PostCategory::Webtoon => "webtoon",
            PostCategory::Movie => "movie",
            PostCategory::Drama => "drama",
            PostCategory::Anime => "anime",
            PostCategory::Book => "book",
            PostCategory::Game => "game",
            PostCategory::Music => "music",
            PostCategory::Other => "other",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseTagError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Platform where the recommended content can be found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Netflix,
    DisneyPlus,
    Tving,
    Wavve,
    Youtube,
    NaverWebtoon,
    KakaoWebtoon,
    /// Movie theaters
    Theater,
    Tv,
    Spotify,
    Melon,
    Steam,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 13] = [
        Platform::Netflix,
        Platform::DisneyPlus,
        Platform::Tving,
        Platform::Wavve,
        Platform::Youtube,
        Platform::NaverWebtoon,
        Platform::KakaoWebtoon,
        Platform::Theater,
        Platform::Tv,
        Platform::Spotify,
        Platform::Melon,
        Platform::Steam,
        Platform::Other,
    ];

    /// Wire tag of the platform
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Netflix => "netflix",
            Platform::DisneyPlus => "disney-plus",
            Platform::Tving => "tving",
            Platform::Wavve => "wavve",
            Platform::Youtube => "youtube",
            Platform::NaverWebtoon => "naver-webtoon",
            Platform::KakaoWebtoon => "kakao-webtoon",
            Platform::Theater => "theater",
            Platform::Tv => "tv",
            Platform::Spotify => "spotify",
            Platform::Melon => "melon",
            Platform::Steam => "steam",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseTagError {
                kind: "platform",
                value: s.to_string(),
            })
    }
}

/// A community member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recommendation post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: User,
    pub category: PostCategory,
    pub platform: Platform,
    /// 1 to 5
    pub rating: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub likes: u64,
    pub views: u64,
    pub comment_count: u64,
    #[serde(default)]
    pub is_recommended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post as listed in the home feed ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingPost {
    pub id: String,
    pub title: String,
    pub author: User,
    pub category: PostCategory,
    pub platform: Platform,
    pub rating: u8,
    pub likes: u64,
    pub views: u64,
    pub comment_count: u64,
    /// Position in the ranking, starting at 1
    pub rank: u32,
    pub created_at: DateTime<Utc>,
}

/// A comment on a post, optionally replying to another comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: User,
    pub post_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Whether this comment is a reply in a thread
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Login form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Signup form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Policy checkboxes of the signup form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreements {
    pub terms_of_service: bool,
    pub privacy_policy: bool,
}

/// Result of a successful login or signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Identity provider offered on the login page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Kakao,
    Naver,
}

/// Envelope around every API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Requested page, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
}

/// Position of a page within a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Describes `params.page` of `total_items`; a zero limit yields no pages
    pub fn new(params: PaginationParams, total_items: u64) -> Self {
        let total_pages = if params.limit == 0 {
            0
        } else {
            total_items.div_ceil(u64::from(params.limit)) as u32
        };

        Self {
            current_page: params.page,
            total_pages,
            total_items,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Latest,
    Popular,
    Rating,
    Views,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Post search filters; unset fields do not filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PostCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: PostCategory,
    pub count: u64,
}

/// Site-wide counters shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub active_users: u64,
    #[serde(default)]
    pub top_categories: Vec<CategoryCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pagination_flags() {
        let first = Pagination::new(PaginationParams { page: 1, limit: 10 }, 25);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(PaginationParams { page: 3, limit: 10 }, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let empty = Pagination::new(PaginationParams { page: 1, limit: 0 }, 25);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_api_response_shape() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 3 }));

        let json = serde_json::to_value(ApiResponse::<u8>::failure("not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "not found" })
        );
    }

    #[test]
    fn test_search_params_wire_names() {
        let params: SearchParams = serde_json::from_str(
            r#"{"category":"webtoon","minRating":4,"sortBy":"popular","order":"desc"}"#,
        )
        .unwrap();
        assert_eq!(params.category, Some(PostCategory::Webtoon));
        assert_eq!(params.min_rating, Some(4));
        assert_eq!(params.sort_by, Some(SortBy::Popular));
        assert_eq!(params.order, Some(SortOrder::Desc));
        assert_eq!(params.platform, None);
    }

    #[test]
    fn test_social_provider_tags() {
        let provider: SocialProvider = serde_json::from_str("\"kakao\"").unwrap();
        assert_eq!(provider, SocialProvider::Kakao);
    }

    fn sample_user() -> User {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        User {
            id: "u1".to_string(),
            username: "띵작러버".to_string(),
            email: "lover@example.com".to_string(),
            avatar: None,
            bio: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for category in PostCategory::ALL {
            assert_eq!(category.as_str().parse::<PostCategory>(), Ok(category));
        }
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "vhs".parse::<Platform>().unwrap_err();
        assert_eq!(err.to_string(), "unknown platform 'vhs'");
    }

    #[test]
    fn test_serde_tag_matches_as_str() {
        let json = serde_json::to_string(&Platform::DisneyPlus).unwrap();
        assert_eq!(json, "\"disney-plus\"");
        let parsed: Platform = serde_json::from_str("\"naver-webtoon\"").unwrap();
        assert_eq!(parsed, Platform::NaverWebtoon);
    }

    #[test]
    fn test_user_uses_camel_case_and_skips_empty_fields() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn test_comment_reply_detection() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let mut comment = Comment {
            id: "c1".to_string(),
            content: "동의합니다".to_string(),
            author: sample_user(),
            post_id: "p1".to_string(),
            parent_id: None,
            likes: 0,
            created_at: ts,
            updated_at: ts,
        };
        assert!(!comment.is_reply());
        comment.parent_id = Some("c0".to_string());
        assert!(comment.is_reply());
    }
}
