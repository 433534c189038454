// Static lookup tables (duration buckets, voices, footage queries)

use crate::domain::TargetDuration;

/// Voice used when the requested key is unknown
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Query used when the template is unknown
pub const DEFAULT_FOOTAGE_QUERY: &str = "abstract background";

const VOICES: &[(&str, &str)] = &[
    ("female_1", "21m00Tcm4TlvDq8ikWAM"),
    ("female_2", "EXAVITQu4vr4xnEDKpAd"),
    ("male_1", "pNInz6obpgDQGcFmaJgB"),
    ("male_2", "TxGEqnHWrfWFTfGW9XjX"),
];

const FOOTAGE_QUERIES: &[(&str, &str)] = &[
    ("motivational", "sunrise mountain motivation"),
    ("tech", "technology digital abstract"),
    ("nature", "nature landscape forest"),
    ("fitness", "fitness workout gym"),
    ("food", "cooking food kitchen"),
    ("travel", "travel city aerial"),
    ("business", "business office teamwork"),
    ("educational", "library books study"),
];

/// Approximate spoken word count for a duration bucket
pub fn target_word_count(duration: TargetDuration) -> u32 {
    match duration {
        TargetDuration::Short => 75,
        TargetDuration::Medium => 150,
        TargetDuration::Long => 225,
    }
}

/// Approximate length in seconds for a duration bucket
pub fn target_seconds(duration: TargetDuration) -> u32 {
    match duration {
        TargetDuration::Short => 30,
        TargetDuration::Medium => 60,
        TargetDuration::Long => 90,
    }
}

/// Resolve a logical voice key ("female_1") to a provider voice id
pub fn resolve_voice(key: &str) -> &'static str {
    VOICES
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_VOICE_ID)
}

/// Map a template/category to a stock-footage search query
pub fn footage_query(template: &str) -> &'static str {
    FOOTAGE_QUERIES
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(template))
        .map(|(_, q)| *q)
        .unwrap_or(DEFAULT_FOOTAGE_QUERY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counts() {
        assert_eq!(target_word_count(TargetDuration::Short), 75);
        assert_eq!(target_word_count(TargetDuration::Medium), 150);
        assert_eq!(target_word_count(TargetDuration::Long), 225);
    }

    #[test]
    fn test_voice_lookup_with_default() {
        assert_eq!(resolve_voice("male_1"), "pNInz6obpgDQGcFmaJgB");
        assert_eq!(resolve_voice("FEMALE_2"), "EXAVITQu4vr4xnEDKpAd");
        assert_eq!(resolve_voice("robot_9"), DEFAULT_VOICE_ID);
        assert_eq!(resolve_voice(""), DEFAULT_VOICE_ID);
    }

    #[test]
    fn test_footage_query_with_default() {
        assert_eq!(footage_query("food"), "cooking food kitchen");
        assert_eq!(footage_query("Tech"), "technology digital abstract");
        assert_eq!(footage_query("unknown"), DEFAULT_FOOTAGE_QUERY);
    }
}
