/*!
 * Tests for three-pass phase boundary detection
 */

use aquarelle::phase::detector::{DetectorConfig, PhaseBoundaryDetector};
use aquarelle::phase::{ConfidenceSource, FlagReason, PhaseBoundary, PhaseLabel, PhaseLexicon};
use crate::common;

fn detect(texts: &[&str]) -> (PhaseBoundary, Vec<aquarelle::phase::ReviewFlag>) {
    let entries = common::entries_from_texts(texts);
    PhaseBoundaryDetector::default().detect(&entries, &PhaseLexicon::default())
}

/// A 60-cue document with an explicit transition at cue 40
#[test]
fn test_detect_withExplicitTransitionAtCue40_shouldShortCircuit() {
    let neutral = common::neutral_texts(60);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[39] = "好，线稿完成，可以上色了";
    // Keyword noise elsewhere must not matter once a transition exists
    texts[10] = "先蘸一点颜料";

    let (boundary, flags) = detect(&texts);
    assert_eq!(boundary.boundary_cue_index, Some(40));
    assert_eq!(boundary.confidence_source, ConfidenceSource::ExplicitTransition);
    assert!(flags.is_empty());

    assert_eq!(boundary.phase_of(39), PhaseLabel::Sketch);
    assert_eq!(boundary.phase_of(40), PhaseLabel::Paint);
    assert_eq!(boundary.phase_of(60), PhaseLabel::Paint);
}

#[test]
fn test_detect_withFirstOfSeveralTransitions_shouldWin() {
    let neutral = common::neutral_texts(20);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[7] = "现在上色";
    texts[15] = "继续上色，开始涂色";

    let (boundary, _) = detect(&texts);
    assert_eq!(boundary.boundary_cue_index, Some(8));
}

/// Sketch terms first, then a sustained run of paint terms: the cumulative
/// score crosses at the first paint cue and stays non-negative
#[test]
fn test_detect_withKeywordScoreCrossing_shouldFindBoundary() {
    let mut texts = vec!["先用铅笔起稿", "注意构图和比例", "把轮廓勾勒出来"];
    // 3 sketch cues contribute -6 in total; paint cues then climb past zero
    let paint = [
        "调一点颜料",
        "用水彩打湿纸面",
        "开始渲染天空的颜色",
        "晕染要趁湿",
        "再叠加一层颜料",
        "蘸水洗掉多余的颜料",
        "继续铺色",
        "最后叠色收尾",
        "调和一下颜料",
        "铺底完成",
    ];
    texts.extend_from_slice(&paint);
    let neutral = common::neutral_texts(10);
    texts.extend(neutral.iter().map(String::as_str));

    let (boundary, flags) = detect(&texts);
    assert_eq!(boundary.confidence_source, ConfidenceSource::KeywordScore);
    assert!(flags.is_empty());

    let b = boundary.boundary_cue_index.unwrap();
    // The crossing happens somewhere in the paint run, never in the sketch run
    assert!(b > 3 && b <= 13, "boundary {} outside the paint run", b);
}

#[test]
fn test_detect_withSingleCueNoiseSpike_shouldNotCross() {
    // One early paint cue inside a long sketch run: lookahead rejects it
    let mut texts = vec!["调一点颜料"];
    for _ in 0..10 {
        texts.push("铅笔线条轻一点");
    }
    let (boundary, _) = detect(&texts);
    assert_ne!(boundary.confidence_source, ConfidenceSource::KeywordScore);
}

#[test]
fn test_detect_withBalancedSignalsButHighPaintDensity_shouldFallBackToPaint() {
    // Per-cue score is zero throughout, so the cumulative never crosses;
    // the paint-keyword density still says paint
    let texts = vec![
        "铅笔放下，拿起颜料",
        "橡皮和水彩都在桌上",
        "线条上有颜色",
        "草稿旁边是调色盘",
    ];
    let (boundary, flags) = detect(&texts);
    assert_eq!(boundary.boundary_cue_index, Some(1));
    assert_eq!(boundary.confidence_source, ConfidenceSource::DensityFallback);

    // Sketch terms under a paint verdict are contradictory evidence
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].cue_index, 1);
    assert_eq!(flags[0].reason, FlagReason::PhaseBoundaryUncertain);
    assert_eq!(flags[0].matched_term, "铅笔");
}

#[test]
fn test_detect_withNoSignals_shouldFallBackToSketch() {
    let neutral = common::neutral_texts(12);
    let texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    let (boundary, flags) = detect(&texts);
    assert_eq!(boundary.boundary_cue_index, None);
    assert_eq!(boundary.confidence_source, ConfidenceSource::DensityFallback);
    assert!(flags.is_empty());
}

#[test]
fn test_detect_withSketchFallbackButPaintEvidence_shouldFlagUncertainty() {
    // One paint cue followed by sketch cues: the crossing is not
    // sustained, density stays under threshold, the verdict is sketch,
    // and the contradicting paint cue gets flagged
    let neutral = common::neutral_texts(19);
    let mut texts: Vec<&str> = neutral.iter().map(String::as_str).collect();
    texts[6] = "加一点颜料";
    texts[8] = "换一支铅笔和橡皮";

    let (boundary, flags) = detect(&texts);
    assert_eq!(boundary.boundary_cue_index, None);
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].cue_index, 7);
    assert_eq!(flags[0].reason, FlagReason::PhaseBoundaryUncertain);
    assert_eq!(flags[0].matched_term, "颜料");
}

#[test]
fn test_detect_shouldBeDeterministic() {
    let texts = common::lesson_texts();
    let entries = common::entries_from_texts(&texts);
    let lexicon = PhaseLexicon::default();
    let detector = PhaseBoundaryDetector::new(DetectorConfig::default());

    let (first, _) = detector.detect(&entries, &lexicon);
    let (second, _) = detector.detect(&entries, &lexicon);
    assert_eq!(first, second);
}
