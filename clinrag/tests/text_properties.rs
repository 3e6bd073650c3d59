//! Property tests for chunking and noise filtering invariants.

use clinrag::{BoundaryChunker, Chunker, NoiseFilter, NoisePolicy};
use proptest::prelude::*;

/// Text built from words, sentence ends, line and paragraph breaks.
fn arb_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        6 => "[a-zA-Zé]{1,12}".prop_map(|w| format!("{w} ")),
        1 => Just(". ".to_string()),
        1 => Just("\n".to_string()),
        1 => Just("\n\n".to_string()),
        1 => "[0-9]{1,3}".prop_map(|n| format!("{n}\n")),
    ];
    proptest::collection::vec(token, 1..300).prop_map(|tokens| tokens.concat())
}

/// Glue passages back together by dropping the overlap from all but the first.
fn reconstruct(passages: &[String], overlap: usize) -> String {
    let mut text = String::new();
    for (i, passage) in passages.iter().enumerate() {
        if i == 0 {
            text.push_str(passage);
        } else {
            text.extend(passage.chars().skip(overlap));
        }
    }
    text
}

mod prop_chunking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn passages_are_bounded_and_overlap_exactly(
            text in arb_text(),
            size in 8usize..200,
            overlap_ratio in 0.0f64..0.9,
        ) {
            let overlap = ((size as f64) * overlap_ratio) as usize;
            let chunker = BoundaryChunker::new(size, overlap).unwrap();
            let passages: Vec<String> = chunker
                .chunk("doc", &text)
                .unwrap()
                .into_iter()
                .map(|p| p.text)
                .collect();

            for passage in &passages {
                prop_assert!(passage.chars().count() <= size);
            }
            for pair in passages.windows(2) {
                let prev: Vec<char> = pair[0].chars().collect();
                let tail: String = prev[prev.len() - overlap..].iter().collect();
                let head: String = pair[1].chars().take(overlap).collect();
                prop_assert_eq!(tail, head);
            }
            prop_assert_eq!(reconstruct(&passages, overlap), text);
        }

        #[test]
        fn ids_are_unique_and_positional(text in arb_text()) {
            let passages = BoundaryChunker::new(40, 10).unwrap().chunk("guide", &text).unwrap();
            for (i, passage) in passages.iter().enumerate() {
                prop_assert_eq!(&passage.id, &format!("guide_{i}"));
                prop_assert_eq!(passage.chunk_index(), Some(i));
            }
        }
    }
}

mod prop_noise {
    use super::*;

    fn arb_page() -> impl Strategy<Value = String> {
        let line = prop_oneof![
            4 => "[a-zA-Z ]{0,70}",
            1 => "[0-9]{1,3}",
            1 => "[0-9]{1,2} ?[-/] ?[0-9]{1,2}",
            1 => "(Page|PAGE|page) [0-9]{1,3}( of [0-9]{1,3})?",
            1 => "[IVX]{1,4}\\.?",
            1 => Just("Clinical Guidelines Header".to_string()),
            1 => Just("   ".to_string()),
        ];
        proptest::collection::vec(line, 0..25).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn cleaning_is_idempotent(pages in proptest::collection::vec(arb_page(), 1..5)) {
            let text = pages.join("\n");
            for policy in [NoisePolicy::RepeatedLines, NoisePolicy::ShortLines] {
                let filter = NoiseFilter::new(policy);
                let once = filter.clean(&text);
                let twice = filter.clean(&once);
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn cleaned_text_has_no_long_blank_runs(pages in proptest::collection::vec(arb_page(), 1..5)) {
            let cleaned = NoiseFilter::default().clean(&pages.join("\n"));
            prop_assert!(!cleaned.contains("\n\n\n"));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }
    }
}

#[test]
fn line_seen_three_times_is_removed_and_single_line_kept() {
    let text = "Malaria Guidelines 2024\nIntro text on diagnosis\n\
                Malaria Guidelines 2024\nOnly mentioned once\n\
                Malaria Guidelines 2024\nClosing remarks";
    let cleaned = NoiseFilter::default().clean(text);
    assert!(!cleaned.contains("Malaria Guidelines 2024"));
    assert!(cleaned.contains("Only mentioned once"));
}
