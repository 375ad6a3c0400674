//! Display formatting utilities
//!
//! Functions that turn post data into the text shown on cards and lists:
//! category and platform labels, relative timestamps, abbreviated counters,
//! star ratings and truncated titles.

use crate::locale::Locale;
use crate::models::{Platform, PostCategory};
use crate::traits::Clock;
use chrono::{DateTime, Utc};

const FULL_STAR: &str = "⭐";
const EMPTY_STAR: &str = "☆";
const MAX_STARS: usize = 5;

const ELLIPSIS: &str = "...";

/// Display name of a category
pub fn category_name(category: PostCategory, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match category {
            PostCategory::Ott => "OTT",
            PostCategory::Youtube => "YouTube",
            PostCategory::Webtoon => "Webtoon",
            PostCategory::Movie => "Movie",
            PostCategory::Drama => "Drama",
            PostCategory::Anime => "Anime",
            PostCategory::Book => "Book",
            PostCategory::Game => "Game",
            PostCategory::Music => "Music",
            PostCategory::Other => "Other",
        },
        Locale::Ko => match category {
            PostCategory::Ott => "OTT",
            PostCategory::Youtube => "유튜브",
            PostCategory::Webtoon => "웹툰",
            PostCategory::Movie => "영화",
            PostCategory::Drama => "드라마",
            PostCategory::Anime => "애니메이션",
            PostCategory::Book => "책",
            PostCategory::Game => "게임",
            PostCategory::Music => "음악",
            PostCategory::Other => "기타",
        },
    }
}

/// Emoji shown next to a category
pub fn category_icon(category: PostCategory) -> &'static str {
    match category {
        PostCategory::Ott => "📺",
        PostCategory::Youtube => "📹",
        PostCategory::Webtoon => "📖",
        PostCategory::Movie => "🎬",
        PostCategory::Drama => "📺",
        PostCategory::Anime => "🎌",
        PostCategory::Book => "📚",
        PostCategory::Game => "🎮",
        PostCategory::Music => "🎵",
        PostCategory::Other => "📌",
    }
}

/// Display name of a platform
pub fn platform_name(platform: Platform, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match platform {
            Platform::Netflix => "Netflix",
            Platform::DisneyPlus => "Disney+",
            Platform::Tving => "TVING",
            Platform::Wavve => "Wavve",
            Platform::Youtube => "YouTube",
            Platform::NaverWebtoon => "Naver Webtoon",
            Platform::KakaoWebtoon => "Kakao Webtoon",
            Platform::Theater => "Theater",
            Platform::Tv => "TV",
            Platform::Spotify => "Spotify",
            Platform::Melon => "Melon",
            Platform::Steam => "Steam",
            Platform::Other => "Other",
        },
        Locale::Ko => match platform {
            Platform::Netflix => "넷플릭스",
            Platform::DisneyPlus => "디즈니+",
            Platform::Tving => "티빙",
            Platform::Wavve => "웨이브",
            Platform::Youtube => "유튜브",
            Platform::NaverWebtoon => "네이버 웹툰",
            Platform::KakaoWebtoon => "카카오 웹툰",
            Platform::Theater => "영화관",
            Platform::Tv => "TV",
            Platform::Spotify => "스포티파이",
            Platform::Melon => "멜론",
            Platform::Steam => "스팀",
            Platform::Other => "기타",
        },
    }
}

/// Badge color class of a platform
pub fn platform_color(platform: Platform) -> &'static str {
    match platform {
        Platform::Netflix => "bg-red-500",
        Platform::DisneyPlus => "bg-blue-600",
        Platform::Tving => "bg-green-500",
        Platform::Wavve => "bg-purple-500",
        Platform::Youtube => "bg-red-600",
        Platform::NaverWebtoon => "bg-green-600",
        Platform::KakaoWebtoon => "bg-yellow-500",
        Platform::Theater => "bg-gray-600",
        Platform::Tv => "bg-blue-500",
        Platform::Spotify => "bg-green-400",
        Platform::Melon => "bg-yellow-400",
        Platform::Steam => "bg-gray-700",
        Platform::Other => "bg-gray-500",
    }
}

/// Elapsed time rounded down to its largest whole unit
///
/// Variants are ordered from shortest to longest, so comparing two values
/// compares their magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelativeTime {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Weeks(i64),
    /// 30-day months
    Months(i64),
    /// 365-day years
    Years(i64),
}

impl RelativeTime {
    /// Buckets a number of elapsed seconds
    ///
    /// Negative values (timestamps in the future) count as just now.
    pub fn from_seconds(seconds: i64) -> Self {
        if seconds < 60 {
            return RelativeTime::JustNow;
        }

        let minutes = seconds / 60;
        if minutes < 60 {
            return RelativeTime::Minutes(minutes);
        }

        let hours = minutes / 60;
        if hours < 24 {
            return RelativeTime::Hours(hours);
        }

        let days = hours / 24;
        if days < 7 {
            return RelativeTime::Days(days);
        }

        let weeks = days / 7;
        if weeks < 4 {
            return RelativeTime::Weeks(weeks);
        }

        let months = days / 30;
        if months < 12 {
            return RelativeTime::Months(months);
        }

        RelativeTime::Years(days / 365)
    }

    pub fn render(self, locale: Locale) -> String {
        match locale {
            Locale::En => match self {
                RelativeTime::JustNow => "just now".to_string(),
                RelativeTime::Minutes(n) => ago(n, "minute"),
                RelativeTime::Hours(n) => ago(n, "hour"),
                RelativeTime::Days(n) => ago(n, "day"),
                RelativeTime::Weeks(n) => ago(n, "week"),
                RelativeTime::Months(n) => ago(n, "month"),
                RelativeTime::Years(n) => ago(n, "year"),
            },
            Locale::Ko => match self {
                RelativeTime::JustNow => "방금 전".to_string(),
                RelativeTime::Minutes(n) => format!("{}분 전", n),
                RelativeTime::Hours(n) => format!("{}시간 전", n),
                RelativeTime::Days(n) => format!("{}일 전", n),
                RelativeTime::Weeks(n) => format!("{}주 전", n),
                RelativeTime::Months(n) => format!("{}개월 전", n),
                RelativeTime::Years(n) => format!("{}년 전", n),
            },
        }
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Formats `date` relative to `now`, e.g. "3 hours ago"
pub fn format_relative_time_at(date: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let seconds = (now - date).num_milliseconds().div_euclid(1000);
    RelativeTime::from_seconds(seconds).render(locale)
}

/// Formats `date` relative to the clock's current instant
pub fn format_relative_time(date: DateTime<Utc>, clock: &dyn Clock, locale: Locale) -> String {
    format_relative_time_at(date, clock.now(), locale)
}

/// Abbreviates large counters: 1000 -> "1K", 1500000 -> "1.5M"
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        return abbreviate(n as f64 / 1_000_000.0, 'M');
    }
    if n >= 1_000 {
        return abbreviate(n as f64 / 1_000.0, 'K');
    }
    n.to_string()
}

fn abbreviate(value: f64, suffix: char) -> String {
    let mut text = to_one_decimal(value);
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    text.push(suffix);
    text
}

/// One decimal place, exact ties rounded up
///
/// `{:.1}` rounds ties to even. The only doubles sitting exactly halfway
/// between two tenths are odd multiples of 0.25, so those are rounded up
/// by hand; everything else has an unambiguous nearest tenth.
fn to_one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (value * 10.0).ceil() as u64;
        return format!("{}.{}", tenths / 10, tenths % 10);
    }
    format!("{:.1}", value)
}

/// Renders a rating as five stars, filled up to the rounded-down rating
///
/// Ratings outside 0..=5 are clamped.
pub fn rating_stars(rating: f64) -> String {
    let full = rating.clamp(0.0, MAX_STARS as f64).floor() as usize;
    FULL_STAR.repeat(full) + &EMPTY_STAR.repeat(MAX_STARS - full)
}

/// Cuts text to `max_len` characters and appends "..." when it was longer
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FixedClock;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_every_tag_has_display_values() {
        for category in PostCategory::ALL {
            assert!(!category_name(category, Locale::En).is_empty());
            assert!(!category_name(category, Locale::Ko).is_empty());
            assert!(!category_icon(category).is_empty());
        }
        for platform in Platform::ALL {
            assert!(!platform_name(platform, Locale::Ko).is_empty());
            assert!(platform_color(platform).starts_with("bg-"));
        }
    }

    #[test]
    fn test_korean_names() {
        assert_eq!(category_name(PostCategory::Anime, Locale::Ko), "애니메이션");
        assert_eq!(platform_name(Platform::DisneyPlus, Locale::Ko), "디즈니+");
    }

    #[test]
    fn test_relative_time_buckets() {
        let cases = [
            (Duration::seconds(30), "just now"),
            (Duration::minutes(1), "1 minute ago"),
            (Duration::minutes(59), "59 minutes ago"),
            (Duration::hours(3), "3 hours ago"),
            (Duration::days(2), "2 days ago"),
            (Duration::days(14), "2 weeks ago"),
            (Duration::days(90), "3 months ago"),
            (Duration::days(800), "2 years ago"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(
                format_relative_time_at(now() - elapsed, now(), Locale::En),
                expected
            );
        }
    }

    #[test]
    fn test_relative_time_keeps_thirty_day_months() {
        // 28 and 29 days fall past the week bucket but short of one month
        assert_eq!(
            format_relative_time_at(now() - Duration::days(29), now(), Locale::En),
            "0 months ago"
        );
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        assert_eq!(
            format_relative_time_at(now() + Duration::hours(1), now(), Locale::En),
            "just now"
        );
    }

    #[test]
    fn test_relative_time_korean_with_clock() {
        let clock = FixedClock(now());
        assert_eq!(
            format_relative_time(now() - Duration::hours(3), &clock, Locale::Ko),
            "3시간 전"
        );
    }

    #[test]
    fn test_relative_time_is_monotonic() {
        let mut previous = RelativeTime::JustNow;
        for seconds in (0..3 * 365 * 86_400_i64).step_by(3_607) {
            let bucket = RelativeTime::from_seconds(seconds);
            assert!(bucket >= previous, "{:?} < {:?} at {}s", bucket, previous, seconds);
            previous = bucket;
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1K");
        assert_eq!(format_number(1234), "1.2K");
        assert_eq!(format_number(15_300), "15.3K");
        assert_eq!(format_number(1_500_000), "1.5M");
        assert_eq!(format_number(2_000_000), "2M");
    }

    #[test]
    fn test_format_number_rounds_ties_up() {
        assert_eq!(format_number(1250), "1.3K");
        assert_eq!(format_number(2250), "2.3K");
        assert_eq!(format_number(1750), "1.8K");
        assert_eq!(format_number(1_250_000), "1.3M");
        assert_eq!(format_number(999_750), "999.8K");
        // 1.15 is stored just below the tie and rounds down
        assert_eq!(format_number(1150), "1.1K");
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(3.0), "⭐⭐⭐☆☆");
        assert_eq!(rating_stars(4.7), "⭐⭐⭐⭐☆");
        assert_eq!(rating_stars(0.0).chars().count(), 5);
        assert_eq!(rating_stars(9.0), "⭐⭐⭐⭐⭐");
        assert_eq!(rating_stars(-1.0), "☆☆☆☆☆");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("a longer title", 8), "a longer...");
        assert_eq!(truncate_text("오징어 게임 시즌2", 3), "오징어...");
    }

    #[test]
    fn test_truncate_text_is_idempotent() {
        let once = truncate_text("an overly long review title", 10);
        assert_eq!(truncate_text(&once, 10), once);
    }
}
