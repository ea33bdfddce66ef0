//! Human-readable descriptions of API attributes
//!
//! Tables are in display order. Attributes without an entry are printed under
//! their raw key.

pub const BOARD_LABELS: &[(&str, &str)] = &[
    ("board", "Board directory"),
    ("title", "Board title"),
    ("ws_board", "Work safe"),
    ("per_page", "Threads on each index page"),
    ("pages", "Total pages"),
    ("max_filesize", "Max size for non .webm attachments (KB)"),
    ("max_webm_filesize", "Max size for .webm attachments (KB)"),
    ("max_comment_chars", "Max characters in post comments"),
    ("max_webm_duration", "Max duration of .webm attachments (seconds)"),
    ("bump_limit", "Max replies allowed before thread stops bumping"),
    (
        "image_limit",
        "Max image replies per thread before image replies are discarded",
    ),
    ("cooldowns", "Cooldowns"),
    ("meta_description", "SEO content meta description"),
    ("spoilers", "Are spoilers enabled"),
    ("custom_spoilers", "Number of custom spoilers"),
    ("is_archived", "Are archives enabled"),
    ("board_flags", "Flag codes mapped to flag names"),
    ("country_flags", "Are poster country flags enabled"),
    ("user_ids", "Are poster ID tags enabled"),
    ("oekaki", "Can users submit via Oekaki app"),
    ("sjis_tags", "Can users SJIS drawings"),
    ("code_tags", "Board supports code syntax highlighting"),
    ("math_tags", "Board supports TeX"),
    ("text_only", "Image posting disabled"),
    ("forced_anon", "Name field disabled"),
    ("webm_audio", "Are .webm attachments allowed audio"),
    ("require_subject", "Do OPs require a subject"),
    ("min_image_width", "Minimum image width (pixels)"),
    ("min_image_height", "Minimum image height (pixels)"),
];

pub const POST_LABELS: &[(&str, &str)] = &[
    ("no", "Numeric post ID"),
    ("resto", "ID of parent thread"),
    ("sticky", "Is thread pinned"),
    ("closed", "Is thread closed"),
    ("now", "Creation time in EST/EDT timezone"),
    ("time", "Creation time (UNIX)"),
    ("name", "Name user posted with"),
    ("trip", "User tripcode"),
    ("id", "Poster ID"),
    ("capcode", "Capcode identifier"),
    ("country", "Poster country code (ISO 3166-2 alpha-2)"),
    ("country_name", "Country name"),
    ("sub", "Subject text"),
    ("com", "Comment"),
    ("tim", "Image upload time (UNIX + microtime)"),
    ("filename", "Filename from device"),
    ("ext", "Filetype"),
    ("fsize", "Attachment size (bytes)"),
    ("md5", "Filehash (MD5)"),
    ("w", "Image width"),
    ("h", "Image height"),
    ("tn_w", "Thumbnail width"),
    ("tn_h", "Thumbnail height"),
    ("filedeleted", "Is file deleted"),
    ("spoiler", "Is image spoilered"),
    ("omitted_posts", "Total replies minus previewed replies"),
    ("omitted_images", "Total images minus previewed images"),
    ("replies", "Total replies"),
    ("images", "Total images"),
    ("last_modified", "Thread last modified (UNIX)"),
    ("semantic_url", "SEO URL slug"),
    ("unique_ips", "Total unique posters"),
    ("archived", "Is thread archived"),
    ("archived_on", "UNIX timestamp post was archived"),
];

/// Looks up the description of `key` in `table`
pub fn label<'a>(table: &[(&'a str, &'a str)], key: &'a str) -> &'a str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}
