//! Bot-challenge detection.
//!
//! Runs on every fetched body before extraction; a hit aborts the
//! invocation with [`crate::ScrapeError::Blocked`] and no partial result.

/// Page-text fingerprints of CAPTCHA and JS-verification interstitials.
const CHALLENGE_MARKERS: [&str; 5] = [
    "captcha",
    "robot check",
    "access denied",
    "just a moment",
    "enable javascript",
];

/// Returns `true` when the fetched body or the post-redirect URL indicates
/// a bot challenge instead of real product markup.
#[must_use]
pub fn is_blocked(body: &str, final_url: &str) -> bool {
    let lowered = body.to_lowercase();
    if CHALLENGE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return true;
    }
    // Amazon redirects challenged sessions to its CAPTCHA validation path.
    final_url.to_lowercase().contains("/errors/validatecaptcha")
}
