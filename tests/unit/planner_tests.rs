/*!
 * Tests for window planning: coverage, overlap, boundary splitting
 */

use aquarelle::errors::TranslationError;
use aquarelle::phase::{ConfidenceSource, PhaseBoundary, PhaseLabel};
use aquarelle::subtitle_processor::SubtitleCollection;
use aquarelle::translation::document::SubtitleDocument;
use aquarelle::translation::planner::{BatchPlanner, PlannerConfig, Window};
use crate::common;

fn document(cues: usize) -> SubtitleDocument {
    let texts = common::neutral_texts(cues);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let collection = SubtitleCollection::new("test.srt".into(), common::entries_from_texts(&refs));
    SubtitleDocument::from_collection(&collection)
}

fn boundary_at(cue: Option<usize>) -> PhaseBoundary {
    PhaseBoundary {
        boundary_cue_index: cue,
        confidence_source: ConfidenceSource::ExplicitTransition,
    }
}

fn plan(cues: usize, boundary: Option<usize>, config: PlannerConfig) -> (SubtitleDocument, Vec<Window>) {
    let mut doc = document(cues);
    let windows = BatchPlanner::new(config)
        .plan(&mut doc, &boundary_at(boundary))
        .unwrap();
    (doc, windows)
}

/// Cores must partition the position range with no gaps or overlaps
fn assert_core_coverage(windows: &[Window], len: usize) {
    let mut expected = 0;
    for window in windows {
        assert_eq!(window.core.start, expected, "gap or overlap in cores");
        assert!(window.core.end > window.core.start);
        assert!(window.range.start <= window.core.start);
        assert_eq!(window.range.end, window.core.end);
        expected = window.core.end;
    }
    assert_eq!(expected, len);
}

#[test]
fn test_plan_with60CuesNoBoundarySplit_shouldMatchReferenceExample() {
    let (_, windows) = plan(60, None, PlannerConfig { batch_size: 35, overlap: 5 });

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].core, 0..35);
    assert_eq!(windows[0].range, 0..35);
    assert_eq!(windows[1].core, 35..60);
    assert_eq!(windows[1].range, 30..60);
    assert_core_coverage(&windows, 60);
}

#[test]
fn test_plan_withBoundaryInsideWindow_shouldSplitAtBoundary() {
    // Boundary at cue 40 (position 39) falls inside the second core [35,70)
    let (doc, windows) = plan(80, Some(40), PlannerConfig { batch_size: 35, overlap: 5 });

    assert_core_coverage(&windows, 80);
    assert_eq!(windows.len(), 4);
    assert_eq!(windows[1].core, 35..39);
    assert_eq!(windows[1].phase, PhaseLabel::Sketch);
    assert_eq!(windows[2].core, 39..70);
    assert_eq!(windows[2].range, 34..70);
    assert_eq!(windows[2].phase, PhaseLabel::Paint);

    // Entries are stamped with their phase
    assert_eq!(doc.entries[38].phase, PhaseLabel::Sketch);
    assert_eq!(doc.entries[39].phase, PhaseLabel::Paint);
}

#[test]
fn test_plan_withBoundaryOnWindowEdge_shouldNotSplit() {
    // Boundary at cue 36 is position 35, exactly where the second core starts
    let (_, windows) = plan(60, Some(36), PlannerConfig { batch_size: 35, overlap: 5 });

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].phase, PhaseLabel::Sketch);
    assert_eq!(windows[1].phase, PhaseLabel::Paint);
    assert_core_coverage(&windows, 60);
}

#[test]
fn test_plan_withBoundaryAtFirstCue_shouldLabelEverythingPaint() {
    let (doc, windows) = plan(10, Some(1), PlannerConfig { batch_size: 35, overlap: 5 });

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].phase, PhaseLabel::Paint);
    assert!(doc.entries.iter().all(|e| e.phase == PhaseLabel::Paint));
}

#[test]
fn test_plan_withNullBoundary_shouldLabelEverythingSketch() {
    let (doc, windows) = plan(10, None, PlannerConfig { batch_size: 35, overlap: 5 });

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].core, 0..10);
    assert_eq!(windows[0].phase, PhaseLabel::Sketch);
    assert!(doc.entries.iter().all(|e| e.phase == PhaseLabel::Sketch));
}

#[test]
fn test_fromCollection_beforePlanning_shouldLeaveEveryEntryUnresolved() {
    let doc = document(10);
    assert!(doc.entries.iter().all(|e| e.phase == PhaseLabel::Unresolved));

    // Planning replaces the unresolved label on every cue
    let (doc, _) = plan(10, Some(5), PlannerConfig { batch_size: 35, overlap: 5 });
    assert!(doc.entries.iter().all(|e| e.phase != PhaseLabel::Unresolved));
}

#[test]
fn test_plan_withExactMultipleOfBatchSize_shouldNotEmitEmptyWindow() {
    let (_, windows) = plan(70, None, PlannerConfig { batch_size: 35, overlap: 5 });
    assert_eq!(windows.len(), 2);
    assert_core_coverage(&windows, 70);
}

#[test]
fn test_plan_withOverlapNotBelowBatchSize_shouldError() {
    let mut doc = document(10);
    let result = BatchPlanner::new(PlannerConfig { batch_size: 5, overlap: 5 })
        .plan(&mut doc, &boundary_at(None));
    assert!(matches!(result, Err(TranslationError::InvalidPlan(_))));
}

#[test]
fn test_plan_withManyWindows_shouldKeepCoverage() {
    let (_, windows) = plan(137, Some(50), PlannerConfig { batch_size: 10, overlap: 3 });
    assert_core_coverage(&windows, 137);
    // Every window is single-phase
    for window in &windows {
        assert!(window.core.end <= 49 || window.core.start >= 49);
    }
}
