/*!
 * Tests for ambiguous-term flagging against the local context window
 */

use aquarelle::phase::flagger::{AmbiguityFlagger, FlaggerConfig};
use aquarelle::phase::{FlagReason, PhaseLexicon};
use crate::common;

fn flag(texts: &[&str]) -> Vec<aquarelle::phase::ReviewFlag> {
    let entries = common::entries_from_texts(texts);
    AmbiguityFlagger::default().flag(&entries, &PhaseLexicon::default())
}

#[test]
fn test_flag_withIsolatedAmbiguousTerm_shouldFlagIt() {
    let neutral = common::neutral_texts(7);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[3] = "我们接着画这里";

    let flags = flag(&texts);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].cue_index, 4);
    assert_eq!(flags[0].matched_term, "画");
    assert_eq!(flags[0].reason, FlagReason::AmbiguousTermNoContext);
    assert_eq!(flags[0].original_text, "我们接着画这里");
}

#[test]
fn test_flag_withStrongSignalInSameCue_shouldResolveSilently() {
    let neutral = common::neutral_texts(7);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[3] = "用铅笔画这里";

    assert!(flag(&texts).is_empty());
}

#[test]
fn test_flag_withStrongSignalInNeighborCue_shouldResolveSilently() {
    let neutral = common::neutral_texts(7);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[3] = "我们接着画这里";
    texts[5] = "蘸一点颜料";

    assert!(flag(&texts).is_empty());
}

#[test]
fn test_flag_withStrongSignalOutsideRadius_shouldStillFlag() {
    let neutral = common::neutral_texts(9);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[1] = "我们接着画这里";
    texts[5] = "蘸一点颜料";

    let flags = flag(&texts);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].cue_index, 2);
}

#[test]
fn test_flag_withBrushAndPencilKeywords_shouldNotFlagEmbeddedPen() {
    // 毛笔 and 铅笔 are whole keywords; the embedded 笔 never counts
    let texts = vec!["拿起毛笔", "换一支铅笔"];
    assert!(flag(&texts).is_empty());
}

#[test]
fn test_flag_withTwoDistinctAmbiguousTerms_shouldFlagEach() {
    let neutral = common::neutral_texts(9);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[4] = "这支笔画起来很顺";

    let flags = flag(&texts);
    assert_eq!(flags.len(), 2);
    let terms: Vec<&str> = flags.iter().map(|f| f.matched_term.as_str()).collect();
    assert!(terms.contains(&"画"));
    assert!(terms.contains(&"笔"));
}

#[test]
fn test_flag_withWiderRadius_shouldResolveFartherNeighbors() {
    let neutral = common::neutral_texts(9);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[1] = "我们接着画这里";
    texts[5] = "蘸一点颜料";

    let entries = common::entries_from_texts(&texts);
    let flagger = AmbiguityFlagger::new(FlaggerConfig { context_radius: 4 });
    assert!(flagger.flag(&entries, &PhaseLexicon::default()).is_empty());
}
